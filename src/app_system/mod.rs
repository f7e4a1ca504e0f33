//! System orchestration, startup, and shutdown logic.

pub mod app;
pub mod telemetry;

pub use app::*;
pub use telemetry::*;
