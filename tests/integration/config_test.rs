use tempfile::TempDir;

use tnsed::core::config::Config;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert!(config.tnsnames_path.is_none());
    assert!(config.ping_command.is_none());
    assert!(config.check_timeout_secs.is_none());
}

#[test]
fn test_config_save_load_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tnsed").join("config.json");

    let config = Config {
        tnsnames_path: Some("/etc/oracle/tnsnames.ora".to_string()),
        gateway_path: Some("/opt/gateway/SQL.ini".to_string()),
        max_parallel_checks: Some(8),
        ping_command: Some("mock-tnsping".to_string()),
        check_timeout_secs: Some(3),
    };

    config.save_to(&path).unwrap();
    let loaded = Config::load_from(&path).unwrap();

    assert_eq!(loaded.tnsnames_path, config.tnsnames_path);
    assert_eq!(loaded.gateway_path, config.gateway_path);
    assert_eq!(loaded.max_parallel_checks, Some(8));
    assert_eq!(loaded.ping_command, config.ping_command);
    assert_eq!(loaded.check_timeout_secs, Some(3));
}

#[test]
fn test_corrupted_config_degrades_to_default() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{not json at all").unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert!(loaded.tnsnames_path.is_none());
}

#[test]
fn test_empty_config_degrades_to_default() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "   \n").unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert!(loaded.max_parallel_checks.is_none());
}
