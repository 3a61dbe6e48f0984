use crate::app::{App, Focus};
use crate::core::Evaluation;
use crate::models::{Task, DATE_FORMAT};
use crate::ui::tasks::risk_color;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph},
    Frame,
};

/// 渲染选中任务的每日计划
pub fn render(f: &mut Frame, area: Rect, app: &App, task: &Task, eval: &Evaluation) {
    let is_focused = app.focus == Focus::Steps;
    let border_color = if is_focused { Color::White } else { Color::DarkGray };

    let block = Block::default()
        .title(format!(" {} · {} ", task.name, task.category))
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .border_type(ratatui::widgets::BorderType::Rounded);

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // 截止日期 + 风险
            Constraint::Length(1), // 进度条
            Constraint::Length(1),
            Constraint::Min(0),    // 步骤
            Constraint::Length(1), // 完成提示
        ])
        .split(inner);

    let info = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("📅 Hạn nộp: ", Style::default().fg(Color::Gray)),
            Span::raw(task.deadline.as_str()),
            Span::styled(format!("  ({})", eval.countdown.describe()), Style::default().fg(Color::Gray)),
        ]),
        Line::from(Span::styled(
            format!("● {}", eval.risk.label()),
            Style::default().fg(risk_color(eval.risk)).add_modifier(Modifier::BOLD),
        )),
    ]);
    f.render_widget(info, chunks[0]);

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Rgb(136, 192, 208)).bg(Color::Rgb(59, 66, 82)))
        .percent(u16::from(eval.percent))
        .label(format!("{}/{} · {}%", eval.completed, eval.total, eval.percent));
    f.render_widget(gauge, chunks[1]);

    let items: Vec<ListItem> = task
        .plan
        .iter()
        .enumerate()
        .map(|(i, step)| {
            let is_selected = is_focused && i == app.selected_step;

            let checkbox = if step.done {
                Span::styled("[x] ", Style::default().fg(Color::Green))
            } else {
                Span::raw("[ ] ")
            };

            let label_style = if step.done {
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT)
            } else {
                Style::default()
            };

            let style = if is_selected {
                Style::default()
                    .bg(Color::Rgb(41, 98, 218))
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            ListItem::new(Line::from(vec![
                Span::raw(" "),
                checkbox,
                Span::styled(
                    format!("{}  ", step.date.format(DATE_FORMAT)),
                    Style::default().fg(Color::Gray),
                ),
                Span::styled(step.label.as_str(), label_style),
            ]))
            .style(style)
        })
        .collect();

    let mut state = ListState::default();
    if is_focused && !task.plan.is_empty() {
        state.select(Some(app.selected_step));
    }
    f.render_stateful_widget(List::new(items), chunks[3], &mut state);

    if eval.is_complete() {
        let done = Paragraph::new("🎉 HOÀN THÀNH!")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD));
        f.render_widget(done, chunks[4]);
    }
}

/// 没有任务时的占位面板
pub fn render_empty(f: &mut Frame, area: Rect, message: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .border_type(ratatui::widgets::BorderType::Rounded);

    let paragraph = Paragraph::new(message)
        .block(block)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);

    f.render_widget(paragraph, area);
}
