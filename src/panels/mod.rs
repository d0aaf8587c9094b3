mod central_panel;
mod letter_guide;
mod tools_panel;

pub use central_panel::central_panel;
pub use letter_guide::{paint_guide, TraceMode};
pub use tools_panel::tools_panel;
