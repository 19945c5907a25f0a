pub mod config;
pub mod depot;
pub mod error;
pub mod project;
pub mod version;

pub use depot::{compose_path_variable, compose_value, DepotOverride, DepotPath};
pub use error::{Error, Result};
pub use project::JuliaProject;
pub use version::JuliaVersion;
