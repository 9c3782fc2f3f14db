use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::theme::ResolvedTheme;

fn panel<'a>(title: &'a str, theme: &ResolvedTheme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style())
        .title(title)
        .padding(Padding::vertical(1))
}

/// A headline and the error detail, centered in a bordered block.
pub fn render_error(
    frame: &mut Frame,
    headline: &str,
    detail: &str,
    theme: &ResolvedTheme,
    area: Rect,
) {
    let lines = vec![
        Line::from(Span::styled(
            headline.to_string(),
            theme.error_style().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(detail.to_string(), theme.dim_style())),
    ];
    let widget = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(panel("Error", theme));
    frame.render_widget(widget, area);
}

/// A single dimmed line centered in a bordered block.
pub fn render_notice(frame: &mut Frame, text: &str, title: &str, theme: &ResolvedTheme, area: Rect) {
    let widget = Paragraph::new(Line::from(Span::styled(text.to_string(), theme.dim_style())))
        .alignment(Alignment::Center)
        .block(panel(title, theme));
    frame.render_widget(widget, area);
}
