//! Command handlers against the in-memory Julia.

use std::sync::Arc;

use juliaenv::commands::{depot, env, install, verify};
use juliaenv_core::config::env_keys::julia::JULIA_DEPOT_PATH;
use juliaenv_core::config::{remove_env_var, set_env_var, JuliaConfig};
use juliaenv_runtime::testing::FakeJulia;
use juliaenv_runtime::{JuliaRuntime, LifecycleState};
use serial_test::serial;

fn fake_runtime() -> JuliaRuntime {
    JuliaRuntime::new(Arc::new(FakeJulia::new()), JuliaConfig::default())
}

#[test]
#[serial(process_env)]
fn test_compose_with_unset_variable() {
    remove_env_var(JULIA_DEPOT_PATH);
    let tmp = tempfile::tempdir().unwrap();
    let value = depot::cmd_compose(tmp.path()).unwrap();
    assert_eq!(value, tmp.path().to_string_lossy());
    assert!(std::env::var_os(JULIA_DEPOT_PATH).is_none());
}

#[cfg(unix)]
#[test]
#[serial(process_env)]
fn test_compose_with_existing_variable() {
    set_env_var(JULIA_DEPOT_PATH, "/srv/a:/srv/b");
    let tmp = tempfile::tempdir().unwrap();
    let value = depot::cmd_compose(tmp.path()).unwrap();
    assert_eq!(value, format!("{}:/srv/a:/srv/b", tmp.path().display()));
    let parts: Vec<&str> = value.split(':').collect();
    assert_eq!(&parts[1..], &["/srv/a", "/srv/b"]);
    remove_env_var(JULIA_DEPOT_PATH);
}

#[test]
#[serial(process_env)]
fn test_compose_rejects_missing_dir() {
    let tmp = tempfile::tempdir().unwrap();
    assert!(depot::cmd_compose(&tmp.path().join("missing")).is_err());
}

#[test]
#[serial(process_env)]
fn test_show_lists_entries_as_json() {
    let a = tempfile::tempdir().unwrap();
    set_env_var(JULIA_DEPOT_PATH, a.path());
    let out = depot::cmd_show(true).unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["default"], false);
    assert_eq!(
        value["entries"][0].as_str().unwrap(),
        a.path().to_string_lossy()
    );
    remove_env_var(JULIA_DEPOT_PATH);
}

#[cfg(unix)]
#[test]
#[serial(process_env)]
fn test_show_reports_trailing_delimiter() {
    let a = tempfile::tempdir().unwrap();
    set_env_var(JULIA_DEPOT_PATH, format!("{}:", a.path().display()));
    let value: serde_json::Value = serde_json::from_str(&depot::cmd_show(true).unwrap()).unwrap();
    assert_eq!(value["append_defaults"], true);
    assert_eq!(value["entries"].as_array().unwrap().len(), 1);
    assert!(depot::cmd_show(false).unwrap().contains("default depots"));
    remove_env_var(JULIA_DEPOT_PATH);
}

#[test]
#[serial(process_env)]
fn test_install_then_verify_with_depot_flag() {
    remove_env_var(JULIA_DEPOT_PATH);
    let runtime = fake_runtime();
    let tmp = tempfile::tempdir().unwrap();

    let installed = install::cmd_install(
        &runtime,
        "@pysr_test_env",
        Some(tmp.path()),
        &[],
        true,
    )
    .unwrap();
    assert!(installed.freshly_installed);
    assert!(install::render_installed(&installed).contains("Installed @pysr_test_env"));

    let again = install::cmd_install(&runtime, "@pysr_test_env", Some(tmp.path()), &[], true)
        .unwrap();
    assert_eq!(again.dir, installed.dir);
    assert!(!again.freshly_installed);

    let report = verify::cmd_verify(&runtime, "@pysr_test_env", Some(tmp.path())).unwrap();
    assert!(report.matches);
    assert_eq!(report.env_dir, tmp.path().join("environments"));
    // --depot never touches the process environment
    assert!(std::env::var_os(JULIA_DEPOT_PATH).is_none());
}

#[test]
#[serial(process_env)]
fn test_install_rejects_bad_package_name() {
    let runtime = fake_runtime();
    let tmp = tempfile::tempdir().unwrap();
    let err = install::cmd_install(
        &runtime,
        "@env",
        Some(tmp.path()),
        &["Not A Package".to_string()],
        false,
    )
    .unwrap_err();
    assert!(err.to_string().contains("--package"));
}

#[test]
#[serial(process_env)]
fn test_verify_path_project_is_mismatch() {
    let runtime = fake_runtime();
    let depot_dir = tempfile::tempdir().unwrap();
    let elsewhere = tempfile::tempdir().unwrap();
    let project = elsewhere.path().join("proj").display().to_string();
    let err = verify::cmd_verify(&runtime, &project, Some(depot_dir.path())).unwrap_err();
    assert!(err.to_string().contains("shared environments"));
}

#[test]
#[serial(process_env)]
fn test_check_restores_absent_variable() {
    remove_env_var(JULIA_DEPOT_PATH);
    let runtime = fake_runtime();
    let report = verify::cmd_check(&runtime, "@pysr_test_env", None).unwrap();
    assert!(report.shared_env.matches);
    assert_eq!(report.states.last(), Some(&LifecycleState::EnvironmentRestored));
    assert!(verify::render_scenario(&report).contains("EnvironmentRestored"));
    assert!(std::env::var_os(JULIA_DEPOT_PATH).is_none());
    // scratch depot is cleaned up
    assert!(!report.depot_dir.exists());
}

#[test]
#[serial(process_env)]
fn test_env_list_and_remove() {
    let runtime = fake_runtime();
    let tmp = tempfile::tempdir().unwrap();
    install::cmd_install(&runtime, "@alpha", Some(tmp.path()), &[], true).unwrap();
    install::cmd_install(&runtime, "@beta", Some(tmp.path()), &[], true).unwrap();

    let (root, entries) = env::list_environments(Some(tmp.path())).unwrap();
    assert_eq!(root, tmp.path().join("environments"));
    let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["alpha", "beta"]);
    assert!(entries.iter().all(|e| e.has_project && e.size > 0));
    assert!(env::cmd_list(Some(tmp.path())).unwrap().contains("@alpha"));

    assert!(!env::cmd_remove("@alpha", Some(tmp.path()), true, true).unwrap());
    assert!(root.join("alpha").exists());
    assert!(env::cmd_remove("@alpha", Some(tmp.path()), false, true).unwrap());
    assert!(!root.join("alpha").exists());

    assert!(env::cmd_remove("../beta", Some(tmp.path()), false, true).is_err());
    assert!(env::cmd_remove("gamma", Some(tmp.path()), false, true).is_err());
}
