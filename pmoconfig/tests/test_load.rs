use pmoconfig::Config;
use serde_yaml::Value;

#[test]
fn test_load_writes_merged_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load_config(dir.path().to_str().unwrap()).unwrap();

    let written = std::fs::read_to_string(dir.path().join("config.yaml")).unwrap();
    assert!(written.contains("time_observer_interval_ms"));
    assert_eq!(config.path(), Some(dir.path().join("config.yaml").as_path()));
}

#[test]
fn test_file_values_override_defaults() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("config.yaml"),
        "player:\n  time_observer_interval_ms: 250\n",
    )
    .unwrap();

    let config = Config::load_config(dir.path().to_str().unwrap()).unwrap();
    assert_eq!(config.get_u64(&["player", "time_observer_interval_ms"]), Some(250));
    // untouched keys still come from the embedded document
    assert!(config.get_bool_or(&["player", "log_events"], false));
}

#[test]
fn test_set_value_persists_across_loads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().to_str().unwrap();

    let config = Config::load_config(path).unwrap();
    config
        .set_value(&["player", "memory_cache"], Value::Bool(true))
        .unwrap();

    let reloaded = Config::load_config(path).unwrap();
    assert!(reloaded.get_bool_or(&["player", "memory_cache"], false));
}
