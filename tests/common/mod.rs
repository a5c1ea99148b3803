use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use julesync::config::Config;
use julesync::credentials::MemoryCredentialStore;
use julesync::storage::MemoryStore;
use julesync::SyncContext;

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

/// Config pointing at a mock server with a fast poll interval.
#[allow(dead_code)]
pub fn config_for(base_url: &str) -> Config {
    let mut config = Config::default();
    config.api.base_url = base_url.to_string();
    config.api.timeout_seconds = 5;
    config.poll.interval_ms = 100;
    config
}

/// Context over in-memory stores, authenticated with `api_key`.
#[allow(dead_code)]
pub fn memory_context(base_url: &str, api_key: &str) -> SyncContext {
    SyncContext::new(
        &config_for(base_url),
        Arc::new(MemoryCredentialStore::with_key(api_key)),
        Arc::new(MemoryStore::default()),
    )
    .expect("failed to build context")
}
