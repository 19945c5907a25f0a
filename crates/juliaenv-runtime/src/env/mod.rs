//! Project environments: install shared/path projects into a depot and read
//! their `Project.toml`.
//!
//! Callers pass a session and the project; this module runs Pkg and returns
//! where the project ended up.

pub mod builder;
pub mod manifest;
