pub mod compute;
pub mod config;
pub mod driver;
pub mod entities;
pub mod error;
pub mod render;

pub use config::Tuning;
pub use driver::FrameDriver;
pub use error::ConfigError;
