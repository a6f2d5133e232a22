use nhl_data::config::Config;
use nhl_data::constants::env_vars;
use serial_test::serial;
use std::path::PathBuf;
use tempfile::tempdir;

/// Every variable `Config::apply_env_overrides` reads.
#[cfg(target_os = "linux")]
const OVERRIDE_VARS: [&str; 7] = [
    env_vars::DEFAULT_BASE_URL,
    env_vars::STATS_BASE_URL,
    env_vars::HTTP_TIMEOUT,
    env_vars::DATA_DIR,
    env_vars::LOG_FILE,
    env_vars::S3_BUCKET_NAME,
    env_vars::S3_PREFIX,
];

/// Points the platform config directory at a temporary one and clears the
/// override variables for the duration of `f`. Only Linux honours
/// `XDG_CONFIG_HOME` for this.
#[cfg(target_os = "linux")]
fn with_config_home<R>(f: impl FnOnce(&std::path::Path) -> R) -> R {
    let dir = tempdir().unwrap();
    let saved: Vec<_> = std::iter::once("XDG_CONFIG_HOME")
        .chain(OVERRIDE_VARS)
        .map(|name| (name, std::env::var_os(name)))
        .collect();
    unsafe {
        for name in OVERRIDE_VARS {
            std::env::remove_var(name);
        }
        std::env::set_var("XDG_CONFIG_HOME", dir.path());
    }
    let result = f(dir.path());
    unsafe {
        for (name, value) in saved {
            match value {
                Some(value) => std::env::set_var(name, value),
                None => std::env::remove_var(name),
            }
        }
    }
    result
}

#[cfg(target_os = "linux")]
#[test]
#[serial]
fn test_load_without_file_uses_defaults() {
    unsafe {
        std::env::set_var(env_vars::S3_BUCKET_NAME, "leaked-bucket");
    }
    with_config_home(|home| {
        let config = Config::load().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(
            Config::get_config_path(),
            home.join("nhl_data").join("config.toml").to_string_lossy()
        );
    });
    assert_eq!(
        std::env::var(env_vars::S3_BUCKET_NAME).as_deref(),
        Ok("leaked-bucket")
    );
    unsafe {
        std::env::remove_var(env_vars::S3_BUCKET_NAME);
    }
}

#[cfg(target_os = "linux")]
#[test]
#[serial]
fn test_save_then_load_with_env_override() {
    with_config_home(|_| {
        let saved = Config {
            stats_base_url: "http://stats.internal/rest".to_string(),
            data_dir: PathBuf::from("/srv/moneypuck"),
            ..Config::default()
        };
        saved.save().unwrap();

        unsafe {
            std::env::set_var(env_vars::DATA_DIR, "/tmp/override");
            std::env::set_var(env_vars::S3_PREFIX, "nhl-data/");
        }
        let loaded = Config::load();
        unsafe {
            std::env::remove_var(env_vars::DATA_DIR);
            std::env::remove_var(env_vars::S3_PREFIX);
        }

        let loaded = loaded.unwrap();
        assert_eq!(loaded.stats_base_url, "http://stats.internal/rest");
        assert_eq!(loaded.data_dir, PathBuf::from("/tmp/override"));
        assert_eq!(loaded.s3_prefix.as_deref(), Some("nhl-data/"));
    });
}

#[cfg(target_os = "linux")]
#[test]
#[serial]
fn test_invalid_file_is_rejected() {
    with_config_home(|home| {
        let path = home.join("nhl_data").join("config.toml");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "default_base_url = \"api-web.nhle.com\"\n").unwrap();

        assert!(matches!(
            Config::load(),
            Err(nhl_data::AppError::Config(_))
        ));
    });
}

#[test]
fn test_malformed_toml() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "http_timeout_seconds = \"thirty\"").unwrap();

    assert!(matches!(
        Config::load_from_path(&path.to_string_lossy()),
        Err(nhl_data::AppError::TomlDeserialize(_))
    ));
}
