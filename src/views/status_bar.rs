use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::theme::ResolvedTheme;

/// Builder for the one-line footer.
///
/// Layout: `[Label] [loading?] position | help` with `help` right-aligned
/// when there is room.
pub struct StatusBar<'a> {
    theme: &'a ResolvedTheme,
    label: &'a str,
    loading_text: Option<String>,
    position: Option<(usize, usize)>,
    ranked: Option<usize>,
    help_text: String,
}

impl<'a> StatusBar<'a> {
    pub fn new(theme: &'a ResolvedTheme) -> Self {
        Self {
            theme,
            label: "",
            loading_text: None,
            position: None,
            ranked: None,
            help_text: String::new(),
        }
    }

    pub fn label(mut self, label: &'a str) -> Self {
        self.label = label;
        self
    }

    pub fn loading(mut self, text: impl Into<String>) -> Self {
        self.loading_text = Some(text.into());
        self
    }

    /// One-based cursor position among the shown stories.
    pub fn position(mut self, current: usize, shown: usize) -> Self {
        self.position = Some((current, shown));
        self
    }

    /// Length of the full ranking.
    pub fn ranked(mut self, total: usize) -> Self {
        self.ranked = Some(total);
        self
    }

    pub fn help(mut self, text: impl Into<String>) -> Self {
        self.help_text = text.into();
        self
    }

    pub fn render(self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled(format!(" {} ", self.label), self.theme.status_bar_style()),
            Span::raw(" "),
        ];

        if let Some(loading) = self.loading_text {
            spans.push(Span::styled(loading, self.theme.spinner_style()));
            spans.push(Span::raw(" "));
        }

        if let Some((current, shown)) = self.position {
            let text = match self.ranked {
                Some(total) => format!("{current}/{shown} of {total}"),
                None => format!("{current}/{shown}"),
            };
            spans.push(Span::styled(text, self.theme.dim_style()));
        }

        let left = Line::from(spans);
        let help = Span::styled(self.help_text, self.theme.dim_style());
        let needed = (left.width() + help.width() + 1) as u16;

        if needed <= area.width {
            let [left_area, right_area] =
                Layout::horizontal([Constraint::Min(0), Constraint::Length(help.width() as u16)])
                    .areas(area);
            frame.render_widget(Paragraph::new(left), left_area);
            frame.render_widget(Paragraph::new(Line::from(help)), right_area);
        } else {
            let mut spans = left.spans;
            spans.push(Span::raw(" | "));
            spans.push(help);
            frame.render_widget(Paragraph::new(Line::from(spans)), area);
        }
    }
}
