pub mod config;
pub mod error;
pub mod family;
pub mod inputs;
pub mod request;

pub use config::Config;
pub use error::*;
pub use family::*;
pub use request::*;
