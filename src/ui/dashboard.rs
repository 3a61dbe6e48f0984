use crate::core::Dashboard;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// 渲染顶部仪表盘：徽章、等级、任务总数、紧急任务数
pub fn render(f: &mut Frame, area: Rect, dashboard: &Dashboard) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    let level = dashboard.level.title().unwrap_or("Chưa có danh hiệu");

    render_metric(f, columns[0], "🏅 Huy hiệu", dashboard.badges.to_string(), Color::Rgb(235, 203, 139));
    render_metric(f, columns[1], "Danh hiệu", level.to_string(), Color::Rgb(180, 142, 173));
    render_metric(
        f,
        columns[2],
        "📚 Bài tập",
        format!("{} ({} xong)", dashboard.total_tasks, dashboard.completed_tasks),
        Color::Rgb(136, 192, 208),
    );

    // 有紧急任务时红色提醒
    let urgent_color = if dashboard.urgent_tasks > 0 {
        Color::Rgb(191, 97, 106)
    } else {
        Color::Rgb(163, 190, 140)
    };
    render_metric(f, columns[3], "🔥 Bài gấp", dashboard.urgent_tasks.to_string(), urgent_color);
}

fn render_metric(f: &mut Frame, area: Rect, label: &str, value: String, color: Color) {
    let block = Block::default()
        .title(format!(" {} ", label))
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .border_type(ratatui::widgets::BorderType::Rounded);

    let paragraph = Paragraph::new(Line::from(Span::styled(
        value,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(block);

    f.render_widget(paragraph, area);
}
