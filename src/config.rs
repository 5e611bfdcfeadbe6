//! Configuration file handling.
//!
//! The configuration file is stored at `$GOFINANCES_HOME/config.json`. It records the signed-in
//! user, whose id selects the store key holding that user's transactions. The transactions
//! themselves live in `$GOFINANCES_HOME/gofinances.sqlite`.

use crate::db::Db;
use crate::error::{ErrorType, IntoResult, Res};
use crate::model::UserProfile;
use crate::store::StoreKey;
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

const APP_NAME: &str = "gofinances";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";
const STORE_SQLITE: &str = "gofinances.sqlite";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$GOFINANCES_HOME` and from there it loads `config.json`.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    sqlite_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the data directory, an initial `config.json` and an empty SQLite store.
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the root of the data directory, e.g.
    ///   `$HOME/gofinances`
    /// - `user` - The signed-in user, if any. Without one, transactions are stored under the
    ///   global key.
    ///
    /// # Errors
    /// - Returns an error if the directory already holds a store or any file operation fails.
    pub(crate) async fn create(dir: impl Into<PathBuf>, user: Option<UserProfile>) -> Res<Self> {
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the gofinances home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let sqlite_path = root.join(STORE_SQLITE);
        Db::init(&sqlite_path)
            .await
            .context("Unable to create the SQLite store")?;

        let config_path = root.join(CONFIG_JSON);
        let config_file = ConfigFile {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            user,
        };
        config_file.save(&config_path).await?;
        debug!("Created config at {}", config_path.display());

        Ok(Self {
            root,
            config_path,
            sqlite_path,
            config_file,
        })
    }

    /// This will
    /// - validate that the home directory and the config file exist
    /// - load and validate the config file
    /// - return the loaded configuration object
    pub async fn load(home: impl Into<PathBuf>) -> Result<Self> {
        Self::load_inner(home.into()).await.pub_result(ErrorType::Config)
    }

    async fn load_inner(maybe_relative: PathBuf) -> Res<Self> {
        if !maybe_relative.is_dir() {
            bail!(
                "The gofinances home directory is missing '{}', run 'gofinances init' first",
                maybe_relative.display()
            )
        }
        let root = utils::canonicalize(&maybe_relative).await?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;

        Ok(Self {
            sqlite_path: root.join(STORE_SQLITE),
            root,
            config_path,
            config_file,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn sqlite_path(&self) -> &Path {
        &self.sqlite_path
    }

    /// The configured signed-in user, if any.
    pub fn user(&self) -> Option<&UserProfile> {
        self.config_file.user.as_ref()
    }

    /// The key under which the configured user's transactions are stored.
    pub fn store_key(&self) -> StoreKey {
        StoreKey::from_profile(self.user())
    }

    /// Opens the SQLite store, upgrading its schema if needed.
    pub(crate) async fn open_store(&self) -> Res<Db> {
        Db::load(&self.sqlite_path).await
    }
}

/// Represents the serialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "gofinances",
///   "config_version": 1,
///   "user": {
///     "id": "1f9e2c0b",
///     "name": "Maria Silva",
///     "photo": "https://example.com/maria.png"
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "gofinances"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// The signed-in user. When absent the global transactions key is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<UserProfile>,
}

impl ConfigFile {
    async fn load(path: &Path) -> Res<Self> {
        let config: ConfigFile = utils::deserialize(path).await?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        anyhow::ensure!(
            config.config_version <= CONFIG_VERSION,
            "Config file version {} is newer than this program supports ({})",
            config.config_version,
            CONFIG_VERSION
        );

        Ok(config)
    }

    async fn save(&self, path: &Path) -> Res<()> {
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(path, data)
            .await
            .context("Unable to write config file")
    }
}
