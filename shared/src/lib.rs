pub mod backup;
pub mod config;
pub mod errors;
pub mod models;
pub mod restore;
pub mod services;
pub mod telemetry;

pub use backup::*;
pub use config::*;
pub use errors::*;
pub use models::*;
pub use restore::*;
pub use services::*;
pub use telemetry::*;
