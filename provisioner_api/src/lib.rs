// Provisioner API Server Library
//
// This library provides the HTTP API server for the prototype provisioner.
// It exposes REST endpoints for provisioning resource sets from templates
// and for listing what has been provisioned.

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use routes::build_router;
pub use server::ApiServer;
pub use state::ApiState;
