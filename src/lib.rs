pub mod api;
pub mod cluster;
pub mod error;
pub mod generate;
pub mod loader;
pub mod openapi;
pub mod resolve;
pub mod telemetry;

pub use error::Error;
pub use generate::{generate, GenerateOptions};
