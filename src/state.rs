/// 界面状态持久化
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 应用状态（用于持久化）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppState {
    /// 上次登录的用户
    pub last_user: Option<String>,
    /// 上次选中的任务索引
    pub selected_task: usize,
}

/// 获取状态文件路径
pub fn get_state_file_path() -> PathBuf {
    crate::fs::get_data_dir().join("state.json")
}

/// 从应用中提取状态
pub fn extract_state(app: &crate::app::App) -> AppState {
    AppState {
        last_user: app.username().map(|s| s.to_string()),
        selected_task: app.selected_task,
    }
}

/// 保存状态到文件
pub fn save_state_to(state: &AppState, path: &Path) -> Result<()> {
    // 确保目录存在
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(state)?;
    std::fs::write(path, json)?;

    Ok(())
}

/// 从文件加载状态
pub fn load_state() -> Result<AppState> {
    load_state_from(&get_state_file_path())
}

pub fn load_state_from(path: &Path) -> Result<AppState> {
    if !path.exists() {
        return Ok(AppState::default());
    }

    let content = std::fs::read_to_string(path)?;
    let state: AppState = serde_json::from_str(&content)?;

    Ok(state)
}
