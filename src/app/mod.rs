mod orchestrator;
mod runtime;
mod types;


pub use orchestrator::McControlApp;
pub use types::ShutdownReason;
