mod handlers;
mod server;
#[cfg(test)]
mod tests;

pub use handlers::ToggleResponse;
pub use server::{DashboardServer, DashboardServerBuilder, ServerState};
