//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use furnish_commerce::prelude::*;
use furnish_observability::{LogFormat, LogLevel, RequestId, StructuredLogger};
use furnish_storefront::{FileWishlistStorage, Storefront, StorefrontConfig};

use crate::output::Output;

const CONFIG_NAMES: [&str; 2] = ["furnish.toml", ".furnish.toml"];

/// Execution context for CLI commands.
pub struct Context {
    pub config: StorefrontConfig,
    /// File the configuration came from, if any.
    pub config_path: Option<PathBuf>,
    pub output: Output,
    pub cwd: PathBuf,
    pub logger: StructuredLogger,
}

impl Context {
    /// Load the configuration file, then apply `FURNISH_*` environment overrides.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let config_path = match config_path {
            Some(path) => Some(PathBuf::from(path)),
            None => find_config(&cwd),
        };

        let mut config = match &config_path {
            Some(path) => StorefrontConfig::load(path)
                .with_context(|| format!("Failed to load config file: {}", path.display()))?,
            None => StorefrontConfig::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());

        let level = if output.is_verbose() {
            LogLevel::Debug
        } else {
            config.logging.level()
        };
        let logger = StructuredLogger::new(RequestId::generate())
            .with_component("furnish-cli")
            .with_min_level(level)
            .with_format(LogFormat::Human);

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
            logger,
        })
    }

    /// Storefront services for this invocation.
    pub fn storefront(&self) -> Storefront {
        Storefront::new(self.config.clone(), self.logger.clone())
    }

    /// Directory holding the local wishlist.
    pub fn data_dir(&self) -> PathBuf {
        match &self.config.wishlist.data_dir {
            Some(dir) => self.resolve_path(dir),
            None => dirs_path().join("furnish"),
        }
    }

    pub fn wishlist(&self) -> WishlistStore<FileWishlistStorage> {
        WishlistStore::new(
            FileWishlistStorage::in_dir(self.data_dir()),
            self.logger.child("wishlist"),
        )
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if Path::new(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.cwd.join(path)
        }
    }
}

/// Nearest config file in `start` or one of its parents.
fn find_config(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .flat_map(|dir| CONFIG_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.is_file())
}

/// Get the platform-specific data directory.
fn dirs_path() -> PathBuf {
    if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home).join(".local").join("share")
    } else {
        PathBuf::from("/tmp")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "furnish-cli-{}-{}",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_find_config_walks_up() {
        let root = temp_dir("walk");
        let nested = root.join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(root.join(".furnish.toml"), "").unwrap();

        assert_eq!(find_config(&nested), Some(root.join(".furnish.toml")));

        std::fs::write(nested.join("furnish.toml"), "").unwrap();
        assert_eq!(find_config(&nested), Some(nested.join("furnish.toml")));

        std::fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_data_dir_override_is_relative_to_cwd() {
        let mut config = StorefrontConfig::default();
        config.wishlist.data_dir = Some("state".to_string());
        let ctx = Context {
            config,
            config_path: None,
            output: Output::new(false, true),
            cwd: PathBuf::from("/work"),
            logger: StructuredLogger::default(),
        };
        assert_eq!(ctx.data_dir(), PathBuf::from("/work/state"));
    }
}
