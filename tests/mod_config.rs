use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

// Single test: it mutates the process environment and the global logger.
#[test]
fn env_config_file_and_log_dir_are_honoured() {
    let dir = tempdir().unwrap();
    let explicit = dir.path().join("explicit.toml");
    let from_env = dir.path().join("from_env.toml");
    fs::write(&explicit, "enforce_checks = false\n").unwrap();
    fs::write(
        &from_env,
        "enforce_checks = true\nwarn_on_wrong_data = true\nlog_level = \"warn\"\n",
    )
    .unwrap();
    let log_dir = dir.path().join("env_logs");

    // SAFETY: no other test in this binary reads or writes the environment.
    unsafe {
        std::env::set_var("DOCGUARD_CONFIG", &from_env);
        std::env::set_var("DOCGUARD_LOG_RETENTION", "5");
        std::env::set_var("DOCGUARD_LOG_LEVEL", "trace");
        std::env::set_var("DOCGUARD_LOG_DIR", &log_dir);
    }

    let cfg = docguard::load_config(Some(&explicit));
    assert_eq!(cfg.enforce_checks, Some(false));
    assert_eq!(cfg.warn_on_wrong_data, Some(true));
    assert_eq!(cfg.log_level.as_deref(), Some("warn"));
    assert_eq!(cfg.log_retention, Some(5));
    assert_eq!(cfg.log_dir, Some(log_dir.clone()));

    let cfg = docguard::load_config(None);
    assert_eq!(cfg.enforce_checks, Some(true));
    assert_eq!(cfg.log_level.as_deref(), Some("warn"));

    fs::write(&from_env, "enforce_checks = [not toml").unwrap();
    let cfg = docguard::load_config(None);
    assert_eq!(cfg.enforce_checks, None);
    assert_eq!(cfg.log_level.as_deref(), Some("trace"));

    docguard::logger::configure_from_env().unwrap();
    log::info!("env configured");
    log::info!(target: docguard::logger::AUDIT_TARGET, "env audit");
    assert!(log_dir.join("app.log").exists());
    assert!(log_dir.join("audit.log").exists());

    unsafe {
        std::env::remove_var("DOCGUARD_LOG_DIR");
    }
    let cfg = docguard::load_config(None);
    assert_eq!(cfg.log_dir, None::<PathBuf>);
}
