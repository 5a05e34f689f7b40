pub mod account;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod middleware;
pub mod protocol;
pub mod server;
pub mod session;

pub use server::Server;
pub use session::SessionWorkflow;
