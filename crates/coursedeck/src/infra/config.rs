//! Configuration management utilities.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs_next::{config_dir, data_dir};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

static DEFAULT_CONFIG: Lazy<&'static str> =
    Lazy::new(|| include_str!("../../assets/default-config.toml"));
static DEFAULT_WORKSPACE_CONFIG_PATH: &str = ".coursedeck/config.toml";
const FALLBACK_DATA_DIR: &str = ".coursedeck";

/// Layered configuration loaded from defaults, user, workspace, an explicit file, and env.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default)]
    pub storage: Storage,
    #[serde(default)]
    pub catalog: CatalogSource,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub logging: Logging,
    #[serde(default)]
    pub keybindings: Keybindings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Defaults {
    #[serde(default = "Defaults::default_category")]
    pub category: String,
    #[serde(default = "Defaults::default_seed_bookmarks")]
    pub seed_bookmarks: bool,
}

impl Defaults {
    fn default_category() -> String {
        "all".into()
    }

    fn default_seed_bookmarks() -> bool {
        true
    }
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            category: Self::default_category(),
            seed_bookmarks: Self::default_seed_bookmarks(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Storage {
    #[serde(default)]
    pub data_dir: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSource {
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ui {
    #[serde(default = "Ui::default_tick_rate_ms")]
    pub tick_rate_ms: u64,
    #[serde(default = "Ui::default_status_ttl_secs")]
    pub status_ttl_secs: u64,
}

impl Ui {
    fn default_tick_rate_ms() -> u64 {
        120
    }

    fn default_status_ttl_secs() -> u64 {
        4
    }
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            tick_rate_ms: Self::default_tick_rate_ms(),
            status_ttl_secs: Self::default_status_ttl_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Logging {
    #[serde(default = "Logging::default_level")]
    pub level: String,
}

impl Logging {
    fn default_level() -> String {
        "warn".into()
    }
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keybindings {
    #[serde(default = "Keybindings::default_up")]
    pub up: String,
    #[serde(default = "Keybindings::default_down")]
    pub down: String,
    #[serde(default = "Keybindings::default_bookmark")]
    pub bookmark: String,
    #[serde(default = "Keybindings::default_confirm")]
    pub confirm: String,
    #[serde(default = "Keybindings::default_cancel")]
    pub cancel: String,
}

impl Keybindings {
    fn default_up() -> String {
        "k".into()
    }

    fn default_down() -> String {
        "j".into()
    }

    fn default_bookmark() -> String {
        "b".into()
    }

    fn default_confirm() -> String {
        "y".into()
    }

    fn default_cancel() -> String {
        "n".into()
    }
}

impl Default for Keybindings {
    fn default() -> Self {
        Self {
            up: Self::default_up(),
            down: Self::default_down(),
            bookmark: Self::default_bookmark(),
            confirm: Self::default_confirm(),
            cancel: Self::default_cancel(),
        }
    }
}

/// Environment overrides for critical settings.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    category: Option<String>,
    data_dir: Option<String>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            category: env::var("COURSEDECK_CATEGORY").ok(),
            data_dir: env::var("COURSEDECK_DATA_DIR").ok(),
        }
    }

    #[cfg(test)]
    fn for_tests(category: &str, data_dir: &str) -> Self {
        Self {
            category: Some(category.to_owned()),
            data_dir: Some(data_dir.to_owned()),
        }
    }
}

impl Config {
    /// Load configuration from defaults, user/global config, workspace config, and env overrides.
    pub fn load() -> Result<Self> {
        Self::load_with_extra(None)
    }

    /// Like [`Config::load`], with one more file layered above the workspace config.
    pub fn load_with_extra(extra: Option<&Path>) -> Result<Self> {
        let env = EnvOverrides::from_env();
        let global = global_config_path();
        let workspace = workspace_config_path()?;
        Self::load_with_layers(global, workspace, extra.map(Path::to_path_buf), env)
    }

    fn load_with_layers(
        global: Option<PathBuf>,
        workspace: Option<PathBuf>,
        extra: Option<PathBuf>,
        env_overrides: EnvOverrides,
    ) -> Result<Self> {
        let mut layers: Vec<Config> = Vec::new();

        layers.push(Self::from_str(&DEFAULT_CONFIG)?);

        if let Some(global_path) = global.filter(|path| path.exists()) {
            layers.push(Self::from_file(&global_path)?);
        }

        if let Some(workspace_path) = workspace.filter(|path| path.exists()) {
            layers.push(Self::from_file(&workspace_path)?);
        }

        // An explicitly requested file must exist.
        if let Some(extra_path) = extra {
            layers.push(Self::from_file(&extra_path)?);
        }

        let merged = layers.into_iter().reduce(Config::merge).unwrap_or_default();
        Ok(apply_env_overrides(merged, env_overrides))
    }

    fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(&data)
            .with_context(|| format!("invalid config file: {}", path.display()))
    }

    fn from_str(contents: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(contents).with_context(|| "failed to parse TOML config".to_string())?;
        Ok(config)
    }

    fn merge(self, other: Self) -> Self {
        Self {
            defaults: merge_defaults(self.defaults, other.defaults),
            storage: Storage {
                data_dir: if other.storage.data_dir.is_empty() {
                    self.storage.data_dir
                } else {
                    other.storage.data_dir
                },
            },
            catalog: CatalogSource {
                path: other.catalog.path.or(self.catalog.path),
            },
            ui: merge_ui(self.ui, other.ui),
            logging: Logging {
                level: choose(self.logging.level, other.logging.level, Logging::default_level),
            },
            keybindings: merge_keybindings(self.keybindings, other.keybindings),
        }
    }

    /// Directory for notes and logs.
    pub fn data_dir(&self) -> PathBuf {
        if !self.storage.data_dir.is_empty() {
            return PathBuf::from(&self.storage.data_dir);
        }
        data_dir()
            .map(|base| base.join("coursedeck"))
            .unwrap_or_else(|| PathBuf::from(FALLBACK_DATA_DIR))
    }
}

fn merge_defaults(base: Defaults, overlay: Defaults) -> Defaults {
    Defaults {
        category: choose(base.category, overlay.category, Defaults::default_category),
        seed_bookmarks: if overlay.seed_bookmarks != Defaults::default_seed_bookmarks() {
            overlay.seed_bookmarks
        } else {
            base.seed_bookmarks
        },
    }
}

fn merge_ui(base: Ui, overlay: Ui) -> Ui {
    Ui {
        tick_rate_ms: if overlay.tick_rate_ms != Ui::default_tick_rate_ms() {
            overlay.tick_rate_ms
        } else {
            base.tick_rate_ms
        },
        status_ttl_secs: if overlay.status_ttl_secs != Ui::default_status_ttl_secs() {
            overlay.status_ttl_secs
        } else {
            base.status_ttl_secs
        },
    }
}

fn merge_keybindings(base: Keybindings, overlay: Keybindings) -> Keybindings {
    Keybindings {
        up: choose(base.up, overlay.up, Keybindings::default_up),
        down: choose(base.down, overlay.down, Keybindings::default_down),
        bookmark: choose(base.bookmark, overlay.bookmark, Keybindings::default_bookmark),
        confirm: choose(base.confirm, overlay.confirm, Keybindings::default_confirm),
        cancel: choose(base.cancel, overlay.cancel, Keybindings::default_cancel),
    }
}

fn choose(base: String, overlay: String, default_fn: fn() -> String) -> String {
    if overlay != default_fn() {
        overlay
    } else {
        base
    }
}

fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|base| base.join("coursedeck/config.toml"))
}

fn workspace_config_path() -> Result<Option<PathBuf>> {
    let cwd = env::current_dir()?;
    let root = find_workspace_root(&cwd).unwrap_or(cwd);
    Ok(Some(root.join(DEFAULT_WORKSPACE_CONFIG_PATH)))
}

fn find_workspace_root(start: &Path) -> Option<PathBuf> {
    let mut current = start;
    loop {
        if current.join(DEFAULT_WORKSPACE_CONFIG_PATH).exists() || current.join(".git").exists() {
            return Some(current.to_path_buf());
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => return None,
        }
    }
}

fn apply_env_overrides(mut config: Config, env: EnvOverrides) -> Config {
    if let Some(category) = env.category {
        config.defaults.category = category;
    }
    if let Some(data_dir) = env.data_dir {
        config.storage.data_dir = data_dir;
    }
    config
}
