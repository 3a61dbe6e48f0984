use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::ui::dialogs::centered_rect;

/// 渲染帮助面板
pub fn render(f: &mut Frame, area: Rect) {
    // 渲染半透明背景遮罩
    render_backdrop(f, area);

    let popup_area = centered_rect(70, 70, area);

    // 清空弹窗区域
    f.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Phím tắt (ESC hoặc ? để đóng) ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .border_type(ratatui::widgets::BorderType::Rounded)
        .style(Style::default().bg(Color::Black));

    f.render_widget(block.clone(), popup_area);

    let inner = block.inner(popup_area);

    // 分成两列
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(inner);

    let navigation_help = vec![
        heading("Di chuyển"),
        Line::from(""),
        key_line("j, ↓", "Mục kế tiếp"),
        key_line("k, ↑", "Mục trước"),
        key_line("h, ←", "Danh sách bài tập"),
        key_line("l, →", "Kế hoạch từng ngày"),
        key_line("Tab", "Đổi khung"),
        key_line("q", "Thoát"),
        key_line("?", "Trợ giúp"),
    ];

    let task_help = vec![
        heading("Bài tập"),
        Line::from(""),
        key_line("a, n", "Thêm bài tập mới"),
        key_line("Space, x", "Đánh dấu bước đã xong"),
        key_line("d", "Xoá bài tập"),
        key_line("u", "Đổi người dùng"),
        key_line("r", "Tải lại dữ liệu từ đĩa"),
        Line::from(""),
        heading("Mẹo"),
        Line::from(""),
        Line::from("• Mọi thao tác đều tự động lưu"),
        Line::from("• Xong 100% nhận 1 huy hiệu"),
        Line::from("• 1 / 5 / 10 huy hiệu lên cấp"),
    ];

    let nav_widget = Paragraph::new(navigation_help)
        .block(Block::default().borders(Borders::RIGHT))
        .wrap(Wrap { trim: false });

    let task_widget = Paragraph::new(task_help).wrap(Wrap { trim: false });

    f.render_widget(nav_widget, columns[0]);
    f.render_widget(task_widget, columns[1]);
}

fn heading(text: &str) -> Line<'_> {
    Line::from(Span::styled(
        text,
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    ))
}

fn key_line<'a>(keys: &'a str, description: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{:<11}", keys), Style::default().fg(Color::Cyan)),
        Span::raw(description),
    ])
}

/// 渲染半透明背景遮罩
fn render_backdrop(f: &mut Frame, area: Rect) {
    let block = Block::default().style(Style::default().bg(Color::Rgb(0, 0, 0)));
    f.render_widget(block, area);
}
