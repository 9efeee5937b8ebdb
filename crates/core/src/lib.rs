pub mod config;
pub mod error;
pub mod incident;
pub mod run;

pub use config::Config;
pub use error::*;
pub use incident::*;
pub use run::*;
