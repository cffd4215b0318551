/// Configuration manager with hot-reload capability

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{info, warn};

use super::Config;
use crate::error::ConfigError;

pub struct ConfigManager {
    config_path: PathBuf,
    current_config: Arc<RwLock<Config>>,
    last_modified: Arc<RwLock<Option<SystemTime>>>,
}

impl ConfigManager {
    /// A missing file starts from defaults and is picked up once it appears
    pub fn new(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config_path = path.as_ref().to_path_buf();
        let config = Config::load_or_default(&config_path)?;
        let last_modified = modified_time(&config_path);

        Ok(Self {
            config_path,
            current_config: Arc::new(RwLock::new(config)),
            last_modified: Arc::new(RwLock::new(last_modified)),
        })
    }

    pub async fn get_config(&self) -> Config {
        self.current_config.read().await.clone()
    }

    /// Reload when the file changed since the last load. A broken edit keeps the
    /// current config. Returns whether a new config was applied.
    pub async fn reload_if_changed(&self) -> bool {
        reload(&self.config_path, &self.current_config, &self.last_modified).await
    }

    pub fn start_hot_reload(&self, every: Duration) -> JoinHandle<()> {
        let config_path = self.config_path.clone();
        let current_config = Arc::clone(&self.current_config);
        let last_modified = Arc::clone(&self.last_modified);

        tokio::spawn(async move {
            let mut reload_timer = interval(every);
            loop {
                reload_timer.tick().await;
                reload(&config_path, &current_config, &last_modified).await;
            }
        })
    }
}

async fn reload(
    path: &Path,
    current_config: &RwLock<Config>,
    last_modified: &RwLock<Option<SystemTime>>,
) -> bool {
    let Some(modified) = modified_time(path) else {
        return false;
    };

    let last = *last_modified.read().await;
    if last.map_or(false, |last| modified <= last) {
        return false;
    }

    match Config::load_from_file(path) {
        Ok(new_config) => {
            *current_config.write().await = new_config;
            *last_modified.write().await = Some(modified);
            info!(path = %path.display(), "🔄 Configuration reloaded successfully");
            true
        }
        Err(e) => {
            *last_modified.write().await = Some(modified);
            warn!(error = %e, "⚠️ Failed to reload configuration - keeping current");
            false
        }
    }
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(path: &Path, weight: f64) {
        std::fs::write(
            path,
            format!("[thresholds.honeypot]\nweight = {:.1}\n", weight),
        )
        .unwrap();
    }

    fn bump_mtime(path: &Path, secs: u64) {
        let file = std::fs::File::options().write(true).open(path).unwrap();
        file.set_modified(SystemTime::now() + Duration::from_secs(secs))
            .unwrap();
    }

    #[tokio::test]
    async fn test_reload_applies_edits() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sentinel.toml");
        write_config(&path, 40.0);

        let manager = ConfigManager::new(&path).unwrap();
        assert_eq!(manager.get_config().await.thresholds.honeypot.weight, 40.0);
        assert!(!manager.reload_if_changed().await);

        write_config(&path, 55.0);
        bump_mtime(&path, 10);

        assert!(manager.reload_if_changed().await);
        assert_eq!(manager.get_config().await.thresholds.honeypot.weight, 55.0);
    }

    #[tokio::test]
    async fn test_broken_edit_keeps_current_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sentinel.toml");
        write_config(&path, 40.0);
        let manager = ConfigManager::new(&path).unwrap();

        std::fs::write(&path, "[thresholds.honeypot\nweight = ").unwrap();
        bump_mtime(&path, 10);

        assert!(!manager.reload_if_changed().await);
        assert_eq!(manager.get_config().await.thresholds.honeypot.weight, 40.0);
    }

    #[tokio::test]
    async fn test_missing_file_starts_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("later.toml");
        let manager = ConfigManager::new(&path).unwrap();
        assert_eq!(manager.get_config().await, Config::default());

        write_config(&path, 25.0);
        assert!(manager.reload_if_changed().await);
        assert_eq!(manager.get_config().await.thresholds.honeypot.weight, 25.0);
    }
}
