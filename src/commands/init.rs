//! Init command implementation

use crate::config::Config;
use crate::error::{Error, Result};
use std::path::PathBuf;
use tracing::info;

/// Initialize docent configuration
pub async fn cmd_init(base_dir: Option<PathBuf>, force: bool) -> Result<Config> {
    let base = base_dir.unwrap_or_else(Config::default_base_dir);
    let config_path = base.join("config.toml");

    if config_path.exists() && !force {
        return Err(Error::Config(format!(
            "Config already exists at {}. Use --force to overwrite.",
            config_path.display()
        )));
    }

    std::fs::create_dir_all(&base)?;

    let mut config = Config::default();
    config.paths.base_dir = base;
    config.paths.config_file = config_path;
    config.save()?;

    info!("Initialized docent at {:?}", config.paths.base_dir);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_writes_config() {
        let tmp = TempDir::new().unwrap();
        let config = cmd_init(Some(tmp.path().to_path_buf()), false).await.unwrap();
        assert!(config.paths.config_file.exists());
    }

    #[tokio::test]
    async fn test_init_refuses_overwrite_without_force() {
        let tmp = TempDir::new().unwrap();
        cmd_init(Some(tmp.path().to_path_buf()), false).await.unwrap();

        let err = cmd_init(Some(tmp.path().to_path_buf()), false)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        // --force succeeds
        cmd_init(Some(tmp.path().to_path_buf()), true).await.unwrap();
    }
}
