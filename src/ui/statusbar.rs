use crate::app::{App, Focus, Mode};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// 渲染状态栏：模式 + 用户 + 快捷键提示
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let mode_text = match app.mode {
        Mode::Normal => match app.focus {
            Focus::Tasks => ("BÀI TẬP", Color::Green),
            Focus::Steps => ("KẾ HOẠCH", Color::Cyan),
        },
        Mode::Dialog => ("HỘP THOẠI", Color::Magenta),
        Mode::Help => ("TRỢ GIÚP", Color::Blue),
    };

    let hints = match app.focus {
        Focus::Tasks => "a thêm  d xoá  Enter/l mở kế hoạch  u đổi người  ? trợ giúp  q thoát",
        Focus::Steps => "Space/x đánh dấu  h quay lại  a thêm  ? trợ giúp  q thoát",
    };

    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", mode_text.0),
            Style::default()
                .fg(Color::Black)
                .bg(mode_text.1)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" 👤 {} ", app.username().unwrap_or("-"))),
        Span::styled(format!("| {} ", app.today()), Style::default().fg(Color::Gray)),
        Span::styled(format!("| {}", hints), Style::default().fg(Color::DarkGray)),
    ]);

    let paragraph = Paragraph::new(line).style(Style::default().bg(Color::Black));

    f.render_widget(paragraph, area);
}
