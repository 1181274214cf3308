use anyhow::{Context, Result, anyhow, bail};
use chrono::NaiveTime;
use dirs::home_dir;
use serde::{Deserialize, Serialize};
use std::fs;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

const APP_DIR: &str = ".routinelog";
const CONFIG_FILE: &str = "config.json";
const DEFAULT_AUTO_LOG_TIME: &str = "00:05";
pub const DEFAULT_USER_ID: &str = "local";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub db_path: PathBuf,
    pub api_port: u16,
    pub default_user_id: String,
    pub auto_log_enabled: bool,
    pub auto_log_time: String,
    pub plan_max_days: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_root_dir().join("db").join("routinelog.db"),
            api_port: 7891,
            default_user_id: DEFAULT_USER_ID.to_string(),
            auto_log_enabled: false,
            auto_log_time: DEFAULT_AUTO_LOG_TIME.to_string(),
            plan_max_days: 366,
        }
    }
}

impl Config {
    pub fn config_path() -> Result<PathBuf> {
        Ok(default_root_dir().join(CONFIG_FILE))
    }

    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        let content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))
    }

    pub fn load_or_init() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_or_init_at(&config_path)
    }

    // Defaults are written only when no file exists; an unreadable file is an error.
    pub fn load_or_init_at(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            return Self::load_from(config_path);
        }

        let config = Self::default();
        config.save_to(config_path)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;
        set_mode_600(config_path)?;

        Ok(())
    }

    pub fn ensure_bootstrap_files(&self) -> Result<()> {
        let root = default_root_dir();
        fs::create_dir_all(&root)
            .with_context(|| format!("Failed to create root directory: {}", root.display()))?;

        if let Some(parent) = self.db_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create DB directory: {}", parent.display()))?;
        }

        Ok(())
    }

    pub fn parse_auto_log_time(&self) -> Result<NaiveTime> {
        parse_hhmm(&self.auto_log_time)
    }

    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match normalize_config_key(key) {
            "db_path" => {
                self.db_path = expand_home(value);
            }
            "api_port" => {
                self.api_port = value
                    .parse::<u16>()
                    .map_err(|_| anyhow!("api_port must be a number"))?;
            }
            "default_user_id" => {
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    bail!("default_user_id must not be empty");
                }
                self.default_user_id = trimmed.to_string();
            }
            "auto_log_enabled" => {
                self.auto_log_enabled = value
                    .parse::<bool>()
                    .map_err(|_| anyhow!("auto_log_enabled must be true/false"))?;
            }
            "auto_log_time" => {
                parse_hhmm(value)?;
                self.auto_log_time = value.to_string();
            }
            "plan_max_days" => {
                self.plan_max_days = value
                    .parse::<u32>()
                    .map_err(|_| anyhow!("plan_max_days must be a number"))?
                    .max(1);
            }
            _ => {
                bail!(
                    "Unsupported config key: {key}. Supported keys: db_path|db.path, api_port|api.port, default_user_id|user.id, auto_log_enabled|auto_log.enabled, auto_log_time|auto_log.time, plan_max_days|plan.max_days"
                );
            }
        }

        Ok(())
    }

    pub fn get_value(&self, key: &str) -> Option<String> {
        match normalize_config_key(key) {
            "db_path" => Some(self.db_path.display().to_string()),
            "api_port" => Some(self.api_port.to_string()),
            "default_user_id" => Some(self.default_user_id.clone()),
            "auto_log_enabled" => Some(self.auto_log_enabled.to_string()),
            "auto_log_time" => Some(self.auto_log_time.clone()),
            "plan_max_days" => Some(self.plan_max_days.to_string()),
            _ => None,
        }
    }
}

fn normalize_config_key(key: &str) -> &str {
    match key {
        "db_path" | "db.path" => "db_path",
        "api_port" | "api.port" => "api_port",
        "default_user_id" | "user.id" => "default_user_id",
        "auto_log_enabled" | "auto_log.enabled" => "auto_log_enabled",
        "auto_log_time" | "auto_log.time" => "auto_log_time",
        "plan_max_days" | "plan.max_days" => "plan_max_days",
        _ => key,
    }
}

pub fn parse_hhmm(value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .with_context(|| format!("Invalid time format: {value}. Example: 08:00 (24-hour format)"))
}

pub fn expand_home(raw: &str) -> PathBuf {
    raw.strip_prefix("~/")
        .and_then(|stripped| home_dir().map(|home| home.join(stripped)))
        .unwrap_or_else(|| PathBuf::from(raw))
}

fn default_root_dir() -> PathBuf {
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

fn set_mode_600(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))
            .with_context(|| format!("Failed to set file permissions: {}", path.display()))?;
    }

    Ok(())
}
