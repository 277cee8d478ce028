//! Init-config command implementation.

use anyhow::Result;
use std::path::Path;
use tracing::info;

use crate::config::Config;
use crate::render::write_atomic;

/// Write the default configuration to `config_path`
pub fn run(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        anyhow::bail!(
            "Config file {:?} already exists (use --force to overwrite)",
            config_path
        );
    }

    write_atomic(config_path, &Config::generate_default_yaml()?)?;
    info!("Wrote default configuration to {:?}", config_path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_writes_loadable_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cidrcap.yaml");
        run(&path, false).unwrap();
        assert_eq!(Config::load(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_init_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cidrcap.yaml");
        std::fs::write(&path, "max_blocks: 3\n").unwrap();

        assert!(run(&path, false).is_err());
        assert_eq!(Config::load(&path).unwrap().max_blocks, 3);

        run(&path, true).unwrap();
        assert_eq!(Config::load(&path).unwrap().max_blocks, 60);
    }
}
