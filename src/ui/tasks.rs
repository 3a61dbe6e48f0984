use crate::app::{App, Focus};
use crate::cli::countdown_short;
use crate::core::{Evaluation, Risk};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

/// 风险等级对应的颜色
pub fn risk_color(risk: Risk) -> Color {
    match risk {
        Risk::High => Color::Red,
        Risk::Medium => Color::Yellow,
        Risk::Safe => Color::Green,
    }
}

/// 渲染任务列表
pub fn render(f: &mut Frame, area: Rect, app: &App, evaluations: &[Evaluation]) {
    let is_focused = app.focus == Focus::Tasks;

    // 简洁配色：聚焦=白色，非聚焦=灰色
    let (border_color, title_style) = if is_focused {
        (Color::White, Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
    } else {
        (Color::DarkGray, Style::default().fg(Color::Gray))
    };

    let items: Vec<ListItem> = app
        .tasks()
        .iter()
        .zip(evaluations)
        .enumerate()
        .map(|(i, (task, eval))| {
            let is_selected = i == app.selected_task;

            let style = if is_selected && is_focused {
                Style::default()
                    .bg(Color::Rgb(41, 98, 218))
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else if is_selected {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            // 选中指示器
            let selection_indicator = if is_selected {
                Span::styled("▶ ", Style::default().fg(Color::White))
            } else {
                Span::raw("  ")
            };

            let status = if eval.is_complete() {
                Span::styled("✓ ", Style::default().fg(Color::Green))
            } else {
                Span::styled("● ", Style::default().fg(risk_color(eval.risk)))
            };

            ListItem::new(Line::from(vec![
                Span::raw(" "),
                selection_indicator,
                status,
                Span::raw(task.name.as_str()),
                Span::styled(
                    format!("  {}%  {}", eval.percent, countdown_short(eval.countdown)),
                    Style::default().fg(Color::Gray),
                ),
            ]))
            .style(style)
        })
        .collect();

    let title = format!(" Bài tập ({}) ", app.tasks().len());

    let list = List::new(items).block(
        Block::default()
            .title(title)
            .title_alignment(ratatui::layout::Alignment::Center)
            .title_style(title_style)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .border_type(ratatui::widgets::BorderType::Rounded),
    );

    let mut state = ListState::default();
    if !app.tasks().is_empty() {
        state.select(Some(app.selected_task));
    }

    f.render_stateful_widget(list, area, &mut state);
}
