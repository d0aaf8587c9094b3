/// Notifications the drawing surface sends to its host.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    /// The visible content changed and should be repainted
    RedrawRequested,
    /// The surface was sized for the first time
    Initialized { width: u32, height: u32 },
    /// The physical buffer was re-created at a new size
    Resized { width: u32, height: u32 },
    /// Line art was extracted from the background image
    OverlayReady { ink_pixels: usize },
    /// The background image could not be loaded; drawing continues without line art
    BackgroundFailed { source: String, reason: String },
    /// The number of retained snapshots changed
    HistoryChanged { depth: usize },
}
