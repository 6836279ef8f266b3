//! Domain values - pure version and module rules independent of git

pub mod module;
pub mod version;

pub use module::Module;
pub use version::{Version, VersionBump};
