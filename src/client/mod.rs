//! Client management
//!
//! Per-connection state, the registry of connected clients, and the
//! command loop that serves each connection.

pub mod handler;
pub mod registry;
pub mod state;

pub use handler::handle_client;
pub use registry::ClientRegistry;
pub use state::Client;
