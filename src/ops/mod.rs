// * Operations: logging setup shared by the binary and embedders.

pub mod telemetry;

pub use telemetry::{init_tracing, init_tracing_pretty, init_tracing_with_level, try_init_tracing};
