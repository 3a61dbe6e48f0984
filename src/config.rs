/// 应用配置管理
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::RiskThresholds;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// JSON 数据库路径（为空时使用默认数据目录）
    pub data_file: Option<PathBuf>,
    /// 未指定 --user 时使用的用户名
    pub default_user: Option<String>,
    /// “需要注意”区间的上限天数（含）
    pub medium_risk_days: i64,
    /// 数据库损坏时是否备份后从空数据开始
    pub recover_corrupt_state: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: None,
            default_user: None,
            medium_risk_days: RiskThresholds::default().medium_max,
            recover_corrupt_state: false,
        }
    }
}

impl Config {
    pub fn database_path(&self) -> PathBuf {
        self.data_file
            .clone()
            .unwrap_or_else(crate::fs::default_database_path)
    }

    pub fn thresholds(&self) -> RiskThresholds {
        RiskThresholds::with_medium_max(self.medium_risk_days)
    }
}

/// 获取配置文件路径
/// Linux: ~/.config/deadline-guardian/config.toml
/// macOS: ~/Library/Application Support/deadline-guardian/config.toml
/// Windows: %APPDATA%\deadline-guardian\config.toml
pub fn get_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("deadline-guardian")
        .join("config.toml")
}

/// 加载配置
pub fn load_config() -> Result<Config> {
    load_config_from(&get_config_path())
}

pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        // 配置文件不存在，返回默认配置
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;

    Ok(config)
}

/// 保存配置
pub fn save_config(config: &Config) -> Result<()> {
    save_config_to(config, &get_config_path())
}

pub fn save_config_to(config: &Config, path: &Path) -> Result<()> {
    // 确保目录存在
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;

    Ok(())
}

/// 设置默认用户
pub fn set_default_user(user: String) -> Result<()> {
    let user = user.trim().to_string();
    if user.is_empty() {
        anyhow::bail!("Tên người dùng không được để trống");
    }

    let mut config = load_config()?;
    config.default_user = Some(user.clone());
    save_config(&config)?;
    println!("✓ Người dùng mặc định: {}", user);
    Ok(())
}

/// 设置数据库路径
pub fn set_data_file(path: PathBuf) -> Result<()> {
    let mut config = load_config()?;
    config.data_file = Some(path);
    save_config(&config)?;
    println!("✓ Tệp dữ liệu: {}", config.database_path().display());
    Ok(())
}

/// 设置“需要注意”区间上限
pub fn set_medium_risk_days(days: i64) -> Result<()> {
    let min = RiskThresholds::default().high_max + 1;
    if days < min {
        anyhow::bail!("Số ngày medium-risk phải ≥ {}", min);
    }

    let mut config = load_config()?;
    config.medium_risk_days = days;
    save_config(&config)?;
    println!("✓ Ngưỡng cần chú ý: ≤ {} ngày", days);
    Ok(())
}

/// 显示当前配置
pub fn show_config() -> Result<()> {
    let config = load_config()?;
    println!("Cấu hình hiện tại:");
    println!("  Người dùng mặc định: {}", config.default_user.as_deref().unwrap_or("-"));
    println!("  Tệp dữ liệu:         {}", config.database_path().display());
    println!("  Ngưỡng cần chú ý:    ≤ {} ngày", config.medium_risk_days);
    println!("  Tự phục hồi khi hỏng: {}", config.recover_corrupt_state);
    println!();
    println!("Tệp cấu hình: {}", get_config_path().display());
    Ok(())
}
