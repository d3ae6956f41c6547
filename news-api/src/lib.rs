pub mod auth;
pub mod config;
pub mod routes;

pub use auth::{JwtAuthenticator, UserDirectory};
pub use config::ServiceConfig;
pub use routes::{router, AppState};
