pub mod backend;
pub mod bootstrap;
pub mod call;
pub mod env;
pub mod log;
pub mod process;
pub mod session;
pub mod verify;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use backend::{BackendError, JuliaBackend};
pub use bootstrap::{run_shared_env_scenario, LifecycleState, ScenarioReport};
pub use call::{Invocation, PackageSpec, Query, Statement};
pub use env::builder::{install_project, InstallOptions, InstalledProject};
pub use process::ProcessBackend;
pub use session::{InterpreterSession, JuliaRuntime};
pub use verify::{shared_environment_report, verify_shared_environment, SharedEnvReport};
