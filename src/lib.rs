#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod canvas;
pub mod color;
pub mod command;
pub mod error;
pub mod event;
pub mod history;
pub mod input;
pub mod loader;
pub mod panels;
pub mod renderer;
pub mod state;
pub mod surface;
pub mod tool;

pub use app::TraceApp;
pub use canvas::{LineArt, Viewport};
pub use command::{Command, CommandOutcome, ExportedImage};
pub use error::{SurfaceError, SurfaceResult};
pub use event::SurfaceEvent;
pub use history::{SnapshotHistory, HISTORY_LIMIT};
pub use input::{InputEvent, InputHandler};
pub use renderer::Renderer;
pub use surface::DrawingSurface;
pub use tool::{ToolKind, ToolSettings};
