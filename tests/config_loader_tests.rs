use rentals::config::{ConfigError, ConfigLoader};
use std::{
    env, fs,
    path::PathBuf,
    sync::{Mutex, MutexGuard, OnceLock},
};
use tempfile::TempDir;

const VARS: [&str; 8] = [
    "RENTALS_PROFILE",
    "RENTALS_API_BIND_ADDR",
    "RENTALS_LOG_LEVEL",
    "RENTALS_OPERATOR_TOKEN",
    "RENTALS_OPERATOR_TOKENS",
    "RENTALS_DATABASE_URL",
    "RENTALS_DEFAULT_PAGE_SIZE",
    "RENTALS_MAX_PAGE_SIZE",
];

fn env_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

fn env_guard() -> MutexGuard<'static, ()> {
    env_lock()
        .lock()
        .unwrap_or_else(|poison| poison.into_inner())
}

fn clear_env() {
    for var in VARS {
        unsafe {
            env::remove_var(var);
        }
    }
}

fn write_env_file(dir: &TempDir, name: &str, contents: &str) {
    let path = dir.path().join(name);
    fs::write(path, contents).unwrap();
}

fn loader(dir: &TempDir) -> ConfigLoader {
    ConfigLoader::with_base_dir(PathBuf::from(dir.path()))
}

#[test]
fn loads_defaults_with_only_a_token() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    write_env_file(&temp_dir, ".env", "RENTALS_OPERATOR_TOKEN=local-token\n");

    let cfg = loader(&temp_dir).load().expect("config loads with defaults");

    assert_eq!(cfg.profile, "local");
    assert_eq!(cfg.api_bind_addr, "0.0.0.0:8080");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.operator_tokens, vec!["local-token".to_string()]);
    assert_eq!(cfg.default_page_size, 50);
    assert_eq!(cfg.max_page_size, 100);
    cfg.bind_addr().expect("default bind addr parses");
    clear_env();
}

#[test]
fn missing_operator_token_is_rejected() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    let err = loader(&temp_dir).load().unwrap_err();
    assert!(matches!(err, ConfigError::MissingOperatorTokens));
}

#[test]
fn layered_env_files_apply_in_order() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    write_env_file(&temp_dir, ".env", "RENTALS_API_BIND_ADDR=127.0.0.1:3000\n");
    write_env_file(
        &temp_dir,
        ".env.test",
        "RENTALS_API_BIND_ADDR=192.168.0.10:5000\n",
    );
    write_env_file(
        &temp_dir,
        ".env.test.local",
        "RENTALS_API_BIND_ADDR=10.0.0.5:6000\n",
    );

    // Select profile via .env.local before profile-specific files load.
    write_env_file(
        &temp_dir,
        ".env.local",
        "RENTALS_PROFILE=test\nRENTALS_API_BIND_ADDR=127.0.0.1:4000\nRENTALS_OPERATOR_TOKEN=layered-token\n",
    );

    let cfg = loader(&temp_dir)
        .load()
        .expect("config loads with layered env files");

    assert_eq!(cfg.profile, "test");
    assert_eq!(cfg.api_bind_addr, "10.0.0.5:6000");
    clear_env();
}

#[test]
fn os_environment_has_highest_precedence() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    write_env_file(
        &temp_dir,
        ".env",
        "RENTALS_API_BIND_ADDR=127.0.0.1:3000\nRENTALS_OPERATOR_TOKEN=file-token\n",
    );

    unsafe {
        env::set_var("RENTALS_API_BIND_ADDR", "0.0.0.0:9090");
        env::set_var("RENTALS_OPERATOR_TOKENS", "alpha, beta,,");
    }

    let cfg = loader(&temp_dir).load().expect("config loads with env override");
    assert_eq!(cfg.api_bind_addr, "0.0.0.0:9090");
    assert_eq!(
        cfg.operator_tokens,
        vec!["alpha".to_string(), "beta".to_string()]
    );

    clear_env();
}

#[test]
fn invalid_bind_addr_returns_error() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    write_env_file(
        &temp_dir,
        ".env",
        "RENTALS_API_BIND_ADDR=not-an-address\nRENTALS_OPERATOR_TOKEN=token\n",
    );

    let err = loader(&temp_dir).load().unwrap_err();
    assert!(matches!(err, ConfigError::InvalidBindAddr { .. }));
    clear_env();
}

#[test]
fn page_sizes_are_checked_against_each_other() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    write_env_file(
        &temp_dir,
        ".env",
        "RENTALS_OPERATOR_TOKEN=token\nRENTALS_DEFAULT_PAGE_SIZE=30\nRENTALS_MAX_PAGE_SIZE=20\n",
    );

    let err = loader(&temp_dir).load().unwrap_err();
    assert!(matches!(
        err,
        ConfigError::InvalidDefaultPageSize { value: 30, max: 20 }
    ));
    clear_env();
}
