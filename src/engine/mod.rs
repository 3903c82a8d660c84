// * Page-resident command surface: message protocol plus the content engine.

pub mod content_script;
pub mod messages;

pub use content_script::ContentEngine;
pub use messages::{Command, EngineError, JumpKind, JumpTarget, Response};
