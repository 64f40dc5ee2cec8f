pub mod config;
pub mod error;
pub mod notice;

pub use config::Config;
pub use error::*;
pub use notice::*;
