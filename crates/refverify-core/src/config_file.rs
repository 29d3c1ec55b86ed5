use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub search: Option<SearchConfig>,
    pub concurrency: Option<ConcurrencyConfig>,
    pub server: Option<ServerConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchConfig {
    pub endpoint: Option<String>,
    pub mailto: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConcurrencyConfig {
    pub max_concurrent_lookups: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_addr: Option<String>,
    pub max_upload_mb: Option<usize>,
}

/// Platform config directory path: `<config_dir>/refverify/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("refverify").join("config.toml"))
}

/// Load config by cascading CWD `.refverify.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".refverify.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparseable config file");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        search: Some(SearchConfig {
            endpoint: overlay
                .search
                .as_ref()
                .and_then(|s| s.endpoint.clone())
                .or_else(|| base.search.as_ref().and_then(|s| s.endpoint.clone())),
            mailto: overlay
                .search
                .as_ref()
                .and_then(|s| s.mailto.clone())
                .or_else(|| base.search.as_ref().and_then(|s| s.mailto.clone())),
            timeout_secs: overlay
                .search
                .as_ref()
                .and_then(|s| s.timeout_secs)
                .or_else(|| base.search.as_ref().and_then(|s| s.timeout_secs)),
        }),
        concurrency: Some(ConcurrencyConfig {
            max_concurrent_lookups: overlay
                .concurrency
                .as_ref()
                .and_then(|c| c.max_concurrent_lookups)
                .or_else(|| {
                    base.concurrency
                        .as_ref()
                        .and_then(|c| c.max_concurrent_lookups)
                }),
        }),
        server: Some(ServerConfig {
            bind_addr: overlay
                .server
                .as_ref()
                .and_then(|s| s.bind_addr.clone())
                .or_else(|| base.server.as_ref().and_then(|s| s.bind_addr.clone())),
            max_upload_mb: overlay
                .server
                .as_ref()
                .and_then(|s| s.max_upload_mb)
                .or_else(|| base.server.as_ref().and_then(|s| s.max_upload_mb)),
        }),
    }
}
