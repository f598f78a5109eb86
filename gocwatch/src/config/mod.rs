//! User configuration in `~/.gocwatch/config.ini`.
//!
//! Settings structs live in [`settings`], constants in [`defaults`], INI
//! parsing in `parser` and serialization in `writer`.
//!
//! # Example
//!
//! ```
//! use gocwatch::config::ConfigFile;
//!
//! let mut config = ConfigFile::default();
//! config.apply_overrides(|key| (key == "HOPPIE_LOGON").then(|| "secret".to_string()));
//!
//! assert_eq!(config.hoppie.logon.as_deref(), Some("secret"));
//! assert_eq!(config.hoppie.station, "HPFGOC");
//! ```

pub mod defaults;
mod file;
mod parser;
pub mod settings;
mod writer;

pub use defaults::*;
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::*;
