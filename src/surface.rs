//! The drawing surface: one owned object holding the pixel buffers, the
//! line-art overlay and the undo history.
//!
//! Tools paint into an ink-free base buffer, and only that base is
//! snapshotted. Line art is composited into a separate display buffer,
//! which is what gets shown and exported.
//!
//! Every operation takes `&mut self`, so buffer mutations are strictly
//! sequential. Until the surface has been sized every operation is a no-op.

use std::cell::RefCell;

use egui::{Pos2, Rect, Vec2};
use image::{Rgba, RgbaImage};

use crate::canvas::{ActiveStroke, Canvas, LineArt, Viewport};
use crate::color::BACKGROUND;
use crate::command::{Command, CommandOutcome, ExportedImage};
use crate::event::{EventBus, EventHandler, SurfaceEvent};
use crate::history::SnapshotHistory;
use crate::input::InputEvent;
use crate::loader::{BackgroundSource, PendingBackground};
use crate::state::InteractionState;
use crate::tool::{ToolKind, ToolSettings};

#[derive(Debug)]
pub struct DrawingSurface {
    canvas: Option<Canvas>,
    /// Decoded background image, kept so line art can be re-extracted on resize
    background_image: Option<RgbaImage>,
    overlay: Option<LineArt>,
    history: SnapshotHistory,
    interaction: InteractionState,
    background: Rgba<u8>,
    pending_background: Option<PendingBackground>,
    /// Bumped whenever the visible pixels change
    version: u64,
    bus: EventBus,
    queued: RefCell<Vec<SurfaceEvent>>,
}

impl Default for DrawingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawingSurface {
    pub fn new() -> Self {
        Self {
            canvas: None,
            background_image: None,
            overlay: None,
            history: SnapshotHistory::new(),
            interaction: InteractionState::Idle,
            background: BACKGROUND,
            pending_background: None,
            version: 0,
            bus: EventBus::new(),
            queued: RefCell::new(Vec::new()),
        }
    }

    // ---------------------------------------------------------------------
    // Notifications

    pub fn subscribe(&self, handler: Box<dyn EventHandler>) {
        self.bus.subscribe(handler);
    }

    /// Take the events queued since the last call.
    pub fn drain_events(&self) -> Vec<SurfaceEvent> {
        std::mem::take(&mut *self.queued.borrow_mut())
    }

    fn notify(&self, event: SurfaceEvent) {
        self.bus.emit(&event);
        self.queued.borrow_mut().push(event);
    }

    fn content_changed(&mut self) {
        self.version = self.version.wrapping_add(1);
        self.notify(SurfaceEvent::RedrawRequested);
    }

    // ---------------------------------------------------------------------
    // Queries

    /// The visible pixels: base buffer with line art on top.
    pub fn buffer(&self) -> Option<&RgbaImage> {
        self.canvas.as_ref().map(Canvas::display)
    }

    pub fn viewport(&self) -> Option<&Viewport> {
        self.canvas.as_ref().map(Canvas::viewport)
    }

    pub fn physical_size(&self) -> Option<[u32; 2]> {
        self.viewport().map(Viewport::physical_size)
    }

    pub fn overlay(&self) -> Option<&LineArt> {
        self.overlay.as_ref()
    }

    pub fn history_depth(&self) -> usize {
        self.history.depth()
    }

    pub fn can_undo(&self) -> bool {
        self.canvas.is_some() && self.history.can_undo()
    }

    pub fn is_stroking(&self) -> bool {
        self.interaction.is_stroking()
    }

    pub fn is_loading_background(&self) -> bool {
        self.pending_background.is_some()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    // ---------------------------------------------------------------------
    // Coordinates

    /// Re-create the buffer for a new displayed size and device pixel ratio.
    ///
    /// The existing base is stretched into the new buffer and the line art
    /// is re-extracted at the new size. An active stroke is ended first so
    /// that it never straddles two buffers.
    pub fn resize(&mut self, display_size: Vec2, pixels_per_point: f32) {
        let Some(viewport) = Viewport::new(display_size, pixels_per_point) else {
            log::debug!("Ignoring resize to empty surface {:?}", display_size);
            return;
        };

        if let Some(canvas) = &mut self.canvas {
            let current = canvas.viewport();
            if current.physical_size() == viewport.physical_size()
                && current.pixels_per_point() == pixels_per_point
            {
                let bounds = Rect::from_min_size(current.bounds().min, display_size);
                canvas.viewport_mut().set_bounds(bounds);
                return;
            }
        }

        self.end_stroke();

        let [width, height] = viewport.physical_size();
        let first = self.canvas.is_none();
        let canvas = match self.canvas.take() {
            Some(previous) => {
                let mut resized = Canvas::resampled(previous.base(), viewport);
                resized.viewport_mut().set_bounds(Rect::from_min_size(
                    previous.viewport().bounds().min,
                    display_size,
                ));
                resized
            }
            None => Canvas::new(viewport, self.background),
        };
        self.canvas = Some(canvas);

        if first {
            log::info!("Surface initialised at {}x{} physical pixels", width, height);
            self.notify(SurfaceEvent::Initialized { width, height });
        } else {
            log::info!("Surface resized to {}x{} physical pixels", width, height);
            self.notify(SurfaceEvent::Resized { width, height });
        }

        self.rebuild_overlay();
        self.compose();
        if let Some(canvas) = &self.canvas {
            self.history.reset(canvas.base());
        }
        self.notify(SurfaceEvent::HistoryChanged {
            depth: self.history.depth(),
        });
        self.content_changed();
    }

    /// Record where the surface currently sits on screen.
    pub fn set_display_bounds(&mut self, bounds: Rect) {
        if let Some(canvas) = &mut self.canvas {
            canvas.viewport_mut().set_bounds(bounds);
        }
    }

    pub fn to_physical(&self, logical: Pos2) -> Pos2 {
        self.viewport()
            .map_or(Pos2::ZERO, |viewport| viewport.to_physical(logical))
    }

    pub fn to_logical(&self, physical: Pos2) -> Pos2 {
        self.viewport()
            .map_or(Pos2::ZERO, |viewport| viewport.to_logical(physical))
    }

    // ---------------------------------------------------------------------
    // Strokes and fills

    /// Start a stroke at a logical point. The bucket tool fills instead.
    pub fn begin_stroke(&mut self, logical: Pos2, tool: ToolKind, color: Rgba<u8>, width: u32) {
        if !tool.draws_strokes() {
            self.end_stroke();
            self.fill_at(logical, color);
            return;
        }
        if self.canvas.is_none() {
            log::debug!("Dropping stroke start on uninitialised surface");
            return;
        }
        // A second press without a release settles the previous stroke first.
        self.end_stroke();

        let Some(canvas) = &mut self.canvas else {
            return;
        };
        let color = if tool == ToolKind::Eraser {
            self.background
        } else {
            color
        };
        let viewport = *canvas.viewport();
        let at = viewport.clamp_physical(viewport.to_physical(logical));
        let physical_width = viewport.physical_width(width.max(1) as f32);

        let stroke = ActiveStroke::new(at, color, physical_width);
        if let Some(dirty) = stroke.stamp(canvas.base_mut()) {
            canvas.refresh(dirty, self.overlay.as_ref());
        }
        self.interaction = InteractionState::Stroking(stroke);
        self.content_changed();
    }

    /// Extend the active stroke to a logical point and rasterize the new segment.
    pub fn continue_stroke(&mut self, logical: Pos2) {
        let (Some(canvas), Some(stroke)) = (&mut self.canvas, self.interaction.stroke_mut()) else {
            return;
        };
        let viewport = *canvas.viewport();
        let to = viewport.clamp_physical(viewport.to_physical(logical));
        if let Some(dirty) = stroke.extend(canvas.base_mut(), to) {
            canvas.refresh(dirty, self.overlay.as_ref());
        }
        self.content_changed();
    }

    /// Finish the active stroke and snapshot.
    pub fn end_stroke(&mut self) {
        let Some(stroke) = self.interaction.take_stroke() else {
            return;
        };
        log::debug!("Stroke ended after {} segments", stroke.segments());
        self.settle();
    }

    /// Flood-fill the region under a logical point. Line art bounds the
    /// region; a seed on the line art itself fills nothing.
    pub fn fill_at(&mut self, logical: Pos2, color: Rgba<u8>) -> usize {
        let Some(canvas) = &mut self.canvas else {
            log::debug!("Dropping fill on uninitialised surface");
            return 0;
        };
        let viewport = *canvas.viewport();
        let seed = viewport.pixel_at(viewport.to_physical(logical));

        if let Some(overlay) = &self.overlay {
            if overlay.is_ink(seed[0], seed[1]) {
                log::debug!("Fill at {:?} starts on line art, ignoring", seed);
                return 0;
            }
        }

        let filled = canvas.fill(seed, color);
        if filled == 0 {
            log::debug!("Fill at {:?} changed nothing", seed);
            return 0;
        }
        log::info!("Filled {} pixels from {:?}", filled, seed);
        self.compose();
        self.settle();
        filled
    }

    // ---------------------------------------------------------------------
    // Commands

    pub fn execute(&mut self, command: Command) -> CommandOutcome {
        match command {
            Command::Clear => {
                if self.clear() {
                    CommandOutcome::Applied
                } else {
                    CommandOutcome::Ignored
                }
            }
            Command::Undo => {
                if self.undo() {
                    CommandOutcome::Applied
                } else {
                    CommandOutcome::Ignored
                }
            }
            Command::Export { file_name } => match self.export(&file_name) {
                Some(export) => CommandOutcome::Exported(export),
                None => CommandOutcome::Ignored,
            },
        }
    }

    /// Reset to the background color, re-apply line art and snapshot.
    pub fn clear(&mut self) -> bool {
        self.end_stroke();
        let Some(canvas) = &mut self.canvas else {
            return false;
        };
        canvas.clear(self.background);
        self.compose();
        self.settle();
        true
    }

    /// Restore the previous settled state. The initial state is never removed.
    pub fn undo(&mut self) -> bool {
        self.end_stroke();
        let Some(canvas) = &mut self.canvas else {
            return false;
        };
        let Some(previous) = self.history.undo() else {
            log::debug!("Nothing to undo");
            return false;
        };
        if !canvas.restore(previous) {
            return false;
        }
        log::info!("Undo, {} snapshots left", self.history.depth());

        self.compose();
        self.notify(SurfaceEvent::HistoryChanged {
            depth: self.history.depth(),
        });
        self.content_changed();
        true
    }

    /// A copy of exactly what is displayed. Never mutates the buffer.
    pub fn export(&self, file_name: &str) -> Option<ExportedImage> {
        let canvas = self.canvas.as_ref()?;
        Some(ExportedImage {
            file_name: file_name.to_owned(),
            image: canvas.display().clone(),
        })
    }

    // ---------------------------------------------------------------------
    // Input

    /// Route a pointer event using the current tool configuration.
    pub fn handle_input(&mut self, event: &InputEvent, settings: &ToolSettings) {
        let Some(viewport) = self.viewport().copied() else {
            log::debug!("Dropping {:?} on uninitialised surface", event);
            return;
        };
        match event {
            InputEvent::PointerDown { position } => {
                let logical = viewport.screen_to_logical(*position);
                if settings.tool.draws_strokes() {
                    self.begin_stroke(logical, settings.tool, settings.rgba(), settings.width());
                } else {
                    self.end_stroke();
                    self.fill_at(logical, settings.rgba());
                }
            }
            InputEvent::PointerMove { position } => {
                if self.interaction.is_stroking() {
                    self.continue_stroke(viewport.screen_to_logical(*position));
                }
            }
            InputEvent::PointerUp { .. } | InputEvent::PointerLeave { .. } => self.end_stroke(),
        }
    }

    // ---------------------------------------------------------------------
    // Background image and line art

    /// Start loading a background image without blocking. Failures are
    /// reported through [`SurfaceEvent::BackgroundFailed`].
    pub fn load_background(&mut self, source: &str) {
        match BackgroundSource::parse(source) {
            Ok(source) => {
                log::info!("Loading background from {}", source.describe());
                self.pending_background = Some(PendingBackground::spawn(source));
            }
            Err(err) => {
                log::warn!("Cannot load background {:?}: {}", source, err);
                self.notify(SurfaceEvent::BackgroundFailed {
                    source: source.to_owned(),
                    reason: err.to_string(),
                });
            }
        }
    }

    /// Check on a pending background load. Returns true once line art has
    /// been extracted.
    pub fn poll_background(&mut self) -> bool {
        let Some(result) = self.pending_background.as_ref().and_then(PendingBackground::poll)
        else {
            return false;
        };
        let Some(pending) = self.pending_background.take() else {
            return false;
        };

        match result {
            Ok(image) => {
                self.set_background_image(image);
                self.overlay.is_some()
            }
            Err(err) => {
                log::error!("Failed to load background {}: {}", pending.description(), err);
                self.notify(SurfaceEvent::BackgroundFailed {
                    source: pending.description().to_owned(),
                    reason: err.to_string(),
                });
                false
            }
        }
    }

    /// Use decoded pixels as the line-art source, replacing any previous
    /// line art. Extraction happens now if the surface is sized, otherwise
    /// on the first resize.
    ///
    /// The base buffer is untouched, so no snapshot is taken.
    pub fn set_background_image(&mut self, image: RgbaImage) {
        self.end_stroke();
        self.background_image = Some(image);
        self.overlay = None;
        if self.canvas.is_none() {
            return;
        }
        self.rebuild_overlay();
        self.compose();
        self.content_changed();
    }

    fn rebuild_overlay(&mut self) {
        let (Some(source), Some(size)) = (&self.background_image, self.physical_size()) else {
            return;
        };
        self.overlay = LineArt::extract_centered(source, size);
        if let Some(overlay) = &self.overlay {
            self.notify(SurfaceEvent::OverlayReady {
                ink_pixels: overlay.ink_pixels(),
            });
        }
    }

    fn compose(&mut self) {
        if let Some(canvas) = &mut self.canvas {
            canvas.compose(self.overlay.as_ref());
        }
    }

    /// Finish a mutation by snapshotting the base buffer. The display
    /// buffer must already be up to date.
    fn settle(&mut self) {
        if let Some(canvas) = &self.canvas {
            self.history.snapshot(canvas.base());
        }
        self.notify(SurfaceEvent::HistoryChanged {
            depth: self.history.depth(),
        });
        self.content_changed();
    }
}
