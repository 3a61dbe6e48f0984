use chrono::{Days, NaiveDate};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use tui_textarea::TextArea;

use crate::models::{Category, DATE_FORMAT};

/// 确认操作类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteTask(usize),
}

/// 新建任务表单的字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Deadline,
    Category,
}

/// 新建任务表单：名称、截止日期、类型
pub struct AddTaskForm {
    pub name: TextArea<'static>,
    pub deadline: TextArea<'static>,
    pub category: usize,
    pub field: FormField,
    /// 上一次提交被拒绝的原因
    pub error: Option<String>,
}

impl AddTaskForm {
    pub fn new(today: NaiveDate) -> Self {
        // 默认截止日期为明天
        let tomorrow = today.checked_add_days(Days::new(1)).unwrap_or(today);

        Self {
            name: single_line_input(String::new(), "Tên bài tập"),
            deadline: single_line_input(tomorrow.format(DATE_FORMAT).to_string(), "YYYY-MM-DD"),
            category: 0,
            field: FormField::Name,
            error: None,
        }
    }

    pub fn category(&self) -> Category {
        Category::ALL[self.category % Category::ALL.len()]
    }

    pub fn cycle_category(&mut self, forward: bool) {
        let len = Category::ALL.len();
        self.category = if forward {
            (self.category + 1) % len
        } else {
            (self.category + len - 1) % len
        };
    }

    pub fn next_field(&mut self) {
        self.field = match self.field {
            FormField::Name => FormField::Deadline,
            FormField::Deadline => FormField::Category,
            FormField::Category => FormField::Name,
        };
    }

    pub fn prev_field(&mut self) {
        self.field = match self.field {
            FormField::Name => FormField::Category,
            FormField::Deadline => FormField::Name,
            FormField::Category => FormField::Deadline,
        };
    }

    /// 当前聚焦的文本输入框（类型字段没有输入框）
    pub fn focused_input(&mut self) -> Option<&mut TextArea<'static>> {
        match self.field {
            FormField::Name => Some(&mut self.name),
            FormField::Deadline => Some(&mut self.deadline),
            FormField::Category => None,
        }
    }

    pub fn name_value(&self) -> String {
        first_line(&self.name)
    }

    pub fn deadline_value(&self) -> String {
        first_line(&self.deadline)
    }
}

/// 对话框类型
pub enum DialogType {
    /// 登录（输入用户名）
    Login {
        textarea: TextArea<'static>,
        error: Option<String>,
    },
    /// 新建任务
    AddTask(AddTaskForm),
    /// 确认对话框
    Confirm {
        title: String,
        message: String,
        yes_selected: bool,
        action: ConfirmAction,
    },
}

impl DialogType {
    pub fn login() -> Self {
        DialogType::Login {
            textarea: single_line_input(String::new(), "Nhập tên của bạn"),
            error: None,
        }
    }
}

fn single_line_input(initial: String, placeholder: &str) -> TextArea<'static> {
    let mut textarea = TextArea::new(vec![initial]);
    textarea.move_cursor(tui_textarea::CursorMove::End);
    textarea.set_placeholder_text(placeholder);
    textarea.set_cursor_line_style(Style::default());
    textarea.set_style(
        Style::default()
            .fg(Color::Rgb(236, 239, 244))  // Nord snow storm
            .bg(Color::Rgb(46, 52, 64)),    // Nord polar night
    );
    textarea
}

pub fn first_line(textarea: &TextArea<'_>) -> String {
    textarea
        .lines()
        .first()
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

/// 渲染居中的对话框
pub fn render_dialog(f: &mut Frame, dialog: &DialogType) {
    let area = match dialog {
        DialogType::AddTask(_) => centered_rect(60, 60, f.area()),
        _ => centered_rect(50, 35, f.area()),
    };

    // 清空对话框区域
    f.render_widget(Clear, area);

    match dialog {
        DialogType::Login { textarea, error } => render_login_dialog(f, area, textarea, error.as_deref()),
        DialogType::AddTask(form) => render_add_task_dialog(f, area, form),
        DialogType::Confirm {
            title,
            message,
            yes_selected,
            ..
        } => render_confirm_dialog(f, area, title, message, *yes_selected),
    }
}

fn dialog_block(title: &str, border: Color) -> Block<'_> {
    Block::default()
        .title(format!("  {}  ", title))
        .title_alignment(Alignment::Left)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .border_type(ratatui::widgets::BorderType::Rounded)
        .style(Style::default().bg(Color::Rgb(46, 52, 64)))  // Nord background
}

/// 输入框边框：聚焦=青色，否则灰色
fn input_block(label: &str, focused: bool) -> Block<'_> {
    let color = if focused {
        Color::Rgb(136, 192, 208)  // Nord cyan
    } else {
        Color::Rgb(76, 86, 106)
    };
    Block::default()
        .title(format!(" {} ", label))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .border_type(ratatui::widgets::BorderType::Rounded)
}

fn render_error_line(f: &mut Frame, area: Rect, error: Option<&str>) {
    if let Some(error) = error {
        let paragraph = Paragraph::new(format!("✗ {}", error))
            .style(Style::default().fg(Color::Rgb(191, 97, 106)))  // Nord red
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }
}

/// 渲染登录对话框
fn render_login_dialog(f: &mut Frame, area: Rect, textarea: &TextArea<'static>, error: Option<&str>) {
    let block = dialog_block("🔐 Đăng nhập", Color::Rgb(76, 86, 106));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // 提示文本
            Constraint::Length(3), // 输入框
            Constraint::Length(2), // 错误
            Constraint::Min(0),
            Constraint::Length(1), // 帮助
        ])
        .split(inner);

    let prompt = Paragraph::new("Nhập tên của bạn để xem và lưu bài tập")
        .style(Style::default().fg(Color::Rgb(129, 161, 193)));  // Nord frost color
    f.render_widget(prompt, chunks[0]);

    let input_area = chunks[1];
    let block = input_block("Tên", true);
    let input_inner = block.inner(input_area);
    f.render_widget(block, input_area);
    f.render_widget(textarea, input_inner);

    render_error_line(f, chunks[2], error);

    let help = Paragraph::new("Enter đăng nhập  Esc thoát")
        .style(Style::default().fg(Color::Rgb(129, 161, 193)))
        .alignment(Alignment::Center);
    f.render_widget(help, chunks[4]);
}

/// 渲染新建任务对话框
fn render_add_task_dialog(f: &mut Frame, area: Rect, form: &AddTaskForm) {
    let block = dialog_block("➕ Thêm bài tập mới", Color::Rgb(76, 86, 106));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // 名称
            Constraint::Length(3), // 截止日期
            Constraint::Length(3), // 类型
            Constraint::Length(2), // 错误
            Constraint::Min(0),
            Constraint::Length(1), // 帮助
        ])
        .split(inner);

    let name_block = input_block("Tên bài tập", form.field == FormField::Name);
    let name_inner = name_block.inner(chunks[0]);
    f.render_widget(name_block, chunks[0]);
    f.render_widget(&form.name, name_inner);

    let deadline_block = input_block("Ngày nộp (YYYY-MM-DD)", form.field == FormField::Deadline);
    let deadline_inner = deadline_block.inner(chunks[1]);
    f.render_widget(deadline_block, chunks[1]);
    f.render_widget(&form.deadline, deadline_inner);

    // 类型选择：← → 切换
    let selected = form.category();
    let spans: Vec<Span> = Category::ALL
        .iter()
        .flat_map(|c| {
            let style = if *c == selected {
                Style::default()
                    .fg(Color::Rgb(46, 52, 64))
                    .bg(Color::Rgb(136, 192, 208))
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Rgb(216, 222, 233))
            };
            [Span::styled(format!(" {} ", c.display_name()), style), Span::raw(" ")]
        })
        .collect();
    let category_block = input_block("Loại bài (← →)", form.field == FormField::Category);
    f.render_widget(Paragraph::new(Line::from(spans)).block(category_block), chunks[2]);

    render_error_line(f, chunks[3], form.error.as_deref());

    let help = Paragraph::new("Tab chuyển ô  Enter/Ctrl+S tạo kế hoạch  Esc huỷ")
        .style(Style::default().fg(Color::Rgb(129, 161, 193)))
        .alignment(Alignment::Center);
    f.render_widget(help, chunks[5]);
}

/// 渲染确认对话框
fn render_confirm_dialog(
    f: &mut Frame,
    area: Rect,
    title: &str,
    message: &str,
    yes_selected: bool,
) {
    let block = dialog_block(title, Color::Rgb(235, 203, 139));  // Nord yellow for warnings
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // 消息
            Constraint::Length(3), // 按钮
        ])
        .split(inner);

    // 消息文本
    let message_text = Paragraph::new(message)
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Rgb(216, 222, 233)));  // Nord snow storm
    f.render_widget(message_text, chunks[0]);

    let button_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(chunks[1]);

    // 否按钮 (n) - 放在左侧
    let no_style = if !yes_selected {
        Style::default()
            .bg(Color::Rgb(191, 97, 106))   // Nord 柔和红色
            .fg(Color::Rgb(46, 52, 64))
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(Color::Rgb(191, 97, 106))
            .add_modifier(Modifier::DIM)
    };
    let no_button = Paragraph::new("[ n ] Không")
        .style(no_style)
        .alignment(Alignment::Center);
    f.render_widget(no_button, button_chunks[1]);

    // 是按钮 (y) - 放在右侧
    let yes_style = if yes_selected {
        Style::default()
            .bg(Color::Rgb(163, 190, 140))  // Nord 柔和绿色
            .fg(Color::Rgb(46, 52, 64))
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(Color::Rgb(163, 190, 140))
            .add_modifier(Modifier::DIM)
    };
    let yes_button = Paragraph::new("[ y ] Có")
        .style(yes_style)
        .alignment(Alignment::Center);
    f.render_widget(yes_button, button_chunks[2]);
}

/// 创建一个居中的矩形区域
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_date;

    #[test]
    fn test_form_defaults() {
        let form = AddTaskForm::new(parse_date("2024-12-31").unwrap());
        assert_eq!(form.name_value(), "");
        assert_eq!(form.deadline_value(), "2025-01-01");
        assert_eq!(form.category(), Category::Presentation);
        assert_eq!(form.field, FormField::Name);
    }

    #[test]
    fn test_form_cycles_fields_and_categories() {
        let mut form = AddTaskForm::new(parse_date("2024-01-01").unwrap());

        form.next_field();
        assert_eq!(form.field, FormField::Deadline);
        form.next_field();
        assert_eq!(form.field, FormField::Category);
        assert!(form.focused_input().is_none());
        form.next_field();
        assert_eq!(form.field, FormField::Name);
        form.prev_field();
        assert_eq!(form.field, FormField::Category);

        form.cycle_category(false);
        assert_eq!(form.category(), Category::ShortAssignment);
        form.cycle_category(true);
        form.cycle_category(true);
        assert_eq!(form.category(), Category::Essay);
    }

    #[test]
    fn test_centered_rect_inside() {
        let outer = Rect::new(0, 0, 100, 40);
        let inner = centered_rect(60, 50, outer);
        assert_eq!(inner.width, 60);
        assert_eq!(inner.height, 20);
        assert_eq!(inner.x, 20);
    }
}
