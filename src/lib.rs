pub mod attribute;
pub mod config;
pub mod conventional;
pub mod discover;
pub mod domain;
pub mod error;
pub mod git;
pub mod tagger;
pub mod ui;

pub use config::Config;
pub use domain::{Module, Version, VersionBump};
pub use error::{ModtagError, Result};
pub use tagger::Tagger;
