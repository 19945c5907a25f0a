//! juliaenv configuration layer
//!
//! Every environment variable read goes through this module; other code
//! accesses structured config instead of calling `std::env::var` directly.
//!
//! - `loader`: env_or, env_optional, env_bool and the set/remove wrappers
//! - `schema`: JuliaConfig, ObservabilityConfig
//! - `env_keys`: key constants (with aliases)

pub mod env_keys;
pub mod loader;
pub mod schema;

pub use loader::{
    env_bool, env_optional, env_or, env_raw, load_dotenv, load_dotenv_from_dir, remove_env_var,
    set_env_var, ScopedEnvVar,
};
pub use schema::{JuliaConfig, ObservabilityConfig};
