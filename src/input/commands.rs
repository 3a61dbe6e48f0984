/// 应用命令枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    // ===== 退出 =====
    Quit,

    // ===== 导航 =====
    /// 选择上一项（任务或步骤）
    Up,
    /// 选择下一项（任务或步骤）
    Down,
    /// 聚焦任务列表
    FocusTasks,
    /// 聚焦步骤清单
    FocusSteps,
    /// 在两个面板之间切换
    ToggleFocus,

    // ===== 任务操作 =====
    /// 勾选/取消勾选当前步骤
    ToggleStep,
    /// 创建新任务
    NewTask,
    /// 删除当前任务
    DeleteTask,
    /// 从磁盘重新加载当前用户的数据
    Reload,

    // ===== 用户 =====
    /// 切换用户
    SwitchUser,

    /// 显示帮助
    Help,
}
