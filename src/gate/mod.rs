pub mod gate;
pub mod preview;

pub use gate::{Gate, GateDecision, DEFAULT_PATH, LOGIN_PATH};
pub use preview::{PreviewConfig, PreviewMode};
