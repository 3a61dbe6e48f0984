use crate::cli::GlobalArgs;
use crate::config::Config;
use crate::core::{Award, Evaluation, Tracker};
use crate::error::GuardianError;
use crate::fs::JsonFileStore;
use crate::models::{parse_date, Category, Task};
use crate::ui::dialogs::{AddTaskForm, ConfirmAction, DialogType};
use anyhow::Result;
use chrono::NaiveDate;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, warn};

/// 通知级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// 通知消息
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
    pub created_at: Instant,
}

impl Notification {
    /// 检查通知是否已过期（3秒后自动消失）
    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed().as_secs() >= 3
    }
}

/// 应用模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// 正常模式 - 导航和勾选
    Normal,
    /// 对话框模式
    Dialog,
    /// 帮助模式 - 显示快捷键
    Help,
}

/// 当前聚焦的面板
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Tasks,
    Steps,
}

/// 应用状态
pub struct App {
    /// 当前用户的任务会话（未登录时为 None）
    pub tracker: Option<Tracker<JsonFileStore>>,
    pub config: Config,
    pub db_path: PathBuf,
    /// 界面状态文件
    pub state_path: PathBuf,
    /// 固定的“今天”；为空时每次读取本地日期
    pub pinned_today: Option<NaiveDate>,
    pub mode: Mode,
    pub focus: Focus,
    pub selected_task: usize,
    pub selected_step: usize,
    /// 当前显示的对话框
    pub dialog: Option<DialogType>,
    /// 通知消息
    pub notification: Option<Notification>,
}

impl App {
    /// 创建新的应用实例
    pub fn new(global: &GlobalArgs) -> Result<Self> {
        let config = crate::config::load_config()?;
        let db_path = crate::cli::database_path(global, &config);
        let saved = crate::state::load_state().unwrap_or_default();

        let mut app = Self {
            tracker: None,
            config,
            db_path,
            state_path: crate::state::get_state_file_path(),
            pinned_today: None,
            mode: Mode::Normal,
            focus: Focus::Tasks,
            selected_task: 0,
            selected_step: 0,
            dialog: None,
            notification: None,
        };

        match crate::cli::resolve_user(global, &app.config) {
            Some(user) => {
                // 数据库损坏时直接报错退出（除非配置了自动恢复）
                app.tracker = Some(app.open_tracker(&user)?);
                app.selected_task = saved.selected_task;
                app.clamp_selection();
                app.refresh();
            }
            None => app.open_login_dialog(),
        }

        debug!(
            user = app.username().unwrap_or("-"),
            db = %app.db_path.display(),
            "app initialized"
        );

        Ok(app)
    }

    fn open_tracker(&self, user: &str) -> Result<Tracker<JsonFileStore>, GuardianError> {
        let store = JsonFileStore::new(&self.db_path);
        Ok(Tracker::open_with(store, user, self.config.recover_corrupt_state)?
            .with_thresholds(self.config.thresholds()))
    }

    /// 跨过午夜的会话也使用当天日期
    pub fn today(&self) -> NaiveDate {
        self.pinned_today.unwrap_or_else(crate::cli::today)
    }

    pub fn username(&self) -> Option<&str> {
        self.tracker.as_ref().map(|t| t.username())
    }

    pub fn tasks(&self) -> &[Task] {
        self.tracker.as_ref().map(|t| t.tasks()).unwrap_or(&[])
    }

    pub fn evaluations(&self) -> Vec<Evaluation> {
        self.tracker
            .as_ref()
            .map(|t| t.evaluations(self.today()))
            .unwrap_or_default()
    }

    pub fn selected(&self) -> Option<&Task> {
        self.tasks().get(self.selected_task)
    }

    /// 处理键盘输入
    pub fn handle_key(&mut self, key: crossterm::event::KeyEvent) -> bool {
        use crate::input::handle_key_input;
        handle_key_input(self, key)
    }

    /// Per-interaction pass: badge rule + full save
    pub fn refresh(&mut self) {
        let Some(tracker) = self.tracker.as_mut() else {
            return;
        };

        match tracker.refresh() {
            Ok(awards) => self.announce(&awards),
            Err(e) => {
                warn!(error = %e, "refresh failed");
                self.show_notification(format!("Lưu dữ liệu thất bại: {}", e), NotificationLevel::Error);
            }
        }
    }

    /// 从磁盘重新读取当前用户的数据（例如 CLI 在另一个终端修改过）
    pub fn reload(&mut self) {
        let Some(user) = self.username().map(str::to_string) else {
            return;
        };

        match self.open_tracker(&user) {
            Ok(tracker) => {
                self.tracker = Some(tracker);
                self.clamp_selection();
                self.refresh();
                debug!(user = %user, "reloaded from disk");
            }
            Err(e) => {
                warn!(error = %e, "reload failed");
                self.show_notification(format!("Không tải lại được dữ liệu: {}", e), NotificationLevel::Error);
            }
        }
    }

    fn announce(&mut self, awards: &[Award]) {
        if let Some(last) = awards.last() {
            self.show_notification(
                format!("🎉 Hoàn thành \"{}\"! +1 huy hiệu (tổng {})", last.task_name, last.badges),
                NotificationLevel::Success,
            );
        }
    }

    /// 登录（或切换用户）
    pub fn login(&mut self, username: &str) -> bool {
        match self.open_tracker(username) {
            Ok(tracker) => {
                self.tracker = Some(tracker);
                self.selected_task = 0;
                self.selected_step = 0;
                self.focus = Focus::Tasks;
                self.refresh();
                self.save_state();
                self.show_notification(format!("Xin chào, {}!", username.trim()), NotificationLevel::Info);
                true
            }
            Err(GuardianError::InvalidUsername) => {
                self.show_notification("Vui lòng nhập tên để sử dụng app".to_string(), NotificationLevel::Warning);
                false
            }
            Err(e) => {
                warn!(error = %e, "login failed");
                self.show_notification(format!("Không mở được dữ liệu: {}", e), NotificationLevel::Error);
                false
            }
        }
    }

    /// Validate and submit the add-task form. Returns the error shown in
    /// the form when the submission is rejected.
    pub fn submit_task(&mut self, name: &str, deadline: &str, category: Category) -> Result<(), String> {
        let today = self.today();
        let Some(tracker) = self.tracker.as_mut() else {
            return Err("Chưa đăng nhập".to_string());
        };

        if name.trim().is_empty() {
            return Err("Tên bài tập không được để trống".to_string());
        }
        let deadline = parse_date(deadline).ok_or_else(|| "Ngày nộp phải có dạng YYYY-MM-DD".to_string())?;

        match tracker.create_task(name, deadline, category, today) {
            Ok(index) => {
                self.selected_task = index;
                self.selected_step = 0;
                self.save_state();
                self.show_notification("Đã tạo kế hoạch thành công!".to_string(), NotificationLevel::Success);
                Ok(())
            }
            Err(GuardianError::InvalidDeadline { .. }) => Err("Deadline không hợp lệ!".to_string()),
            Err(e) => Err(e.to_string()),
        }
    }

    /// 切换选中步骤的完成状态
    pub fn toggle_selected_step(&mut self) {
        let (task, step) = (self.selected_task, self.selected_step);
        let Some(tracker) = self.tracker.as_mut() else {
            return;
        };

        match tracker.toggle_step(task, step) {
            Ok(Some(award)) => self.announce(&[award]),
            Ok(None) => {}
            Err(e) => self.show_notification(e.to_string(), NotificationLevel::Error),
        }
    }

    pub fn delete_task(&mut self, index: usize) {
        let Some(tracker) = self.tracker.as_mut() else {
            return;
        };

        match tracker.remove(index) {
            Ok(task) => {
                self.clamp_selection();
                self.save_state();
                self.show_notification(format!("Đã xoá \"{}\"", task.name), NotificationLevel::Info);
            }
            Err(e) => self.show_notification(e.to_string(), NotificationLevel::Error),
        }
    }

    pub fn open_login_dialog(&mut self) {
        self.dialog = Some(DialogType::login());
        self.mode = Mode::Dialog;
    }

    pub fn open_add_dialog(&mut self) {
        if self.tracker.is_none() {
            self.open_login_dialog();
            return;
        }
        self.dialog = Some(DialogType::AddTask(AddTaskForm::new(self.today())));
        self.mode = Mode::Dialog;
    }

    pub fn open_delete_dialog(&mut self) {
        let Some(task) = self.selected() else {
            return;
        };
        self.dialog = Some(DialogType::Confirm {
            title: "Xoá bài tập".to_string(),
            message: format!("Xoá \"{}\"? Huy hiệu đã nhận vẫn được giữ.", task.name),
            yes_selected: false,
            action: ConfirmAction::DeleteTask(self.selected_task),
        });
        self.mode = Mode::Dialog;
    }

    pub fn close_dialog(&mut self) {
        self.dialog = None;
        self.mode = Mode::Normal;
    }

    pub fn select_next(&mut self) {
        match self.focus {
            Focus::Tasks => {
                if self.selected_task + 1 < self.tasks().len() {
                    self.selected_task += 1;
                    self.selected_step = 0;
                }
            }
            Focus::Steps => {
                let steps = self.selected().map(|t| t.plan.len()).unwrap_or(0);
                if self.selected_step + 1 < steps {
                    self.selected_step += 1;
                }
            }
        }
    }

    pub fn select_prev(&mut self) {
        match self.focus {
            Focus::Tasks => {
                if self.selected_task > 0 {
                    self.selected_task -= 1;
                    self.selected_step = 0;
                }
            }
            Focus::Steps => {
                self.selected_step = self.selected_step.saturating_sub(1);
            }
        }
    }

    /// 选中索引不越界
    pub fn clamp_selection(&mut self) {
        let len = self.tasks().len();
        if self.selected_task >= len {
            self.selected_task = len.saturating_sub(1);
        }
        let steps = self.selected().map(|t| t.plan.len()).unwrap_or(0);
        if self.selected_step >= steps {
            self.selected_step = steps.saturating_sub(1);
        }
    }

    pub fn save_state(&self) {
        let state = crate::state::extract_state(self);
        if let Err(e) = crate::state::save_state_to(&state, &self.state_path) {
            warn!(error = %e, "failed to save ui state");
        }
    }

    /// 显示通知消息
    pub fn show_notification(&mut self, message: String, level: NotificationLevel) {
        self.notification = Some(Notification {
            message,
            level,
            created_at: Instant::now(),
        });
    }

    /// 清除已过期的通知
    pub fn clear_expired_notification(&mut self) {
        if let Some(ref notification) = self.notification {
            if notification.is_expired() {
                self.notification = None;
            }
        }
    }
}

#[cfg(test)]
impl App {
    /// 测试用：指定数据库路径和日期，不读取用户配置
    pub fn for_test(db_path: PathBuf, today: NaiveDate) -> Self {
        Self {
            tracker: None,
            config: Config::default(),
            state_path: db_path.with_file_name("state.json"),
            db_path,
            pinned_today: Some(today),
            mode: Mode::Normal,
            focus: Focus::Tasks,
            selected_task: 0,
            selected_step: 0,
            dialog: None,
            notification: None,
        }
    }
}
