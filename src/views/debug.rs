use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::app::App;
use crate::fetch::{QueryKey, QueryStatus};
use crate::theme::ResolvedTheme;

/// Short cache state for one key: `loading`, `cached`, `failed: ...` or `-`.
fn status_span(status: QueryStatus<()>, theme: &ResolvedTheme) -> Span<'static> {
    match status {
        QueryStatus { error: Some(e), .. } => Span::styled(
            format!("failed: {}", e.user_message()),
            theme.error_style(),
        ),
        QueryStatus { loading: true, .. } => {
            Span::styled("loading", Style::default().fg(theme.story_score))
        }
        QueryStatus { data: Some(()), .. } => Span::styled("cached", theme.dim_style()),
        _ => Span::styled("-", theme.dim_style()),
    }
}

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let controller = &app.controller;

    let block = Block::default()
        .title(format!(" Debug ({} {:?}) ", theme.name, theme.variant))
        .borders(Borders::ALL)
        .border_style(theme.dim_style());

    let mut lines = vec![Line::from(vec![
        Span::styled("Phase: ", theme.dim_style()),
        Span::styled(format!("{:?}", controller.phase()), Style::default().fg(theme.foreground)),
        Span::styled("  gen ", theme.dim_style()),
        Span::raw(controller.generation().to_string()),
        Span::styled("  revealed ", theme.dim_style()),
        Span::raw(format!(
            "{}/{}",
            controller.reveal_count(),
            controller
                .ids_len()
                .map_or_else(|| "?".to_string(), |n| n.to_string())
        )),
        Span::styled("  cached ", theme.dim_style()),
        Span::raw(app.cache.cached_story_count().to_string()),
        Span::styled("  ids ", theme.dim_style()),
        status_span(app.cache.key_status(QueryKey::Ids(app.feed)), theme),
    ])];

    let task_count = app.debug.running_tasks.len();
    lines.push(Line::from(vec![
        Span::styled("Tasks: ", theme.dim_style()),
        Span::styled(
            task_count.to_string(),
            Style::default().fg(if task_count > 0 {
                theme.story_score
            } else {
                theme.foreground
            }),
        ),
    ]));

    // Oldest tasks are the interesting ones; cap so the log stays visible
    let inner_height = area.height.saturating_sub(2) as usize;
    let task_lines = task_count.min(inner_height.saturating_sub(2) / 2);
    for task in app.debug.running_tasks.iter().take(task_lines) {
        let mut spans = vec![
            Span::styled(format!("  [{}] ", task.id), theme.dim_style()),
            Span::styled(task.description.as_str(), Style::default().fg(theme.foreground)),
            Span::styled(
                format!(" ({:.1?}) ", task.started_at.elapsed()),
                Style::default().fg(theme.story_time),
            ),
        ];
        if let Some(key) = task.key {
            spans.push(status_span(app.cache.key_status(key), theme));
        }
        lines.push(Line::from(spans));
    }
    if task_count > task_lines {
        lines.push(Line::from(Span::styled(
            format!("  … {} more", task_count - task_lines),
            theme.dim_style(),
        )));
    }

    // Recent log entries, newest first
    let log_lines = inner_height.saturating_sub(lines.len());
    for entry in app.debug.log.iter().rev().take(log_lines) {
        lines.push(Line::from(Span::styled(
            format!("  {}", entry.message),
            theme.dim_style(),
        )));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
