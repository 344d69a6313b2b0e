mod discovery;
mod error;
mod includes;
mod reader;
pub mod requirements;

pub use error::Error;
pub use requirements::{Dependencies, Requirements, Scope, CONFIG_FILE};
