//! Conf module: parser configuration model and loading.

pub mod load;
pub mod model;

pub use load::{ConfigError, CONFIG_FILE_ENV, DEFAULT_CONFIG_PATH};
pub use model::ParserConfig;
