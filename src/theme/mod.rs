mod builtin;
mod detect;
pub mod loader;

pub use builtin::{all_themes, by_name, default_for_variant};
pub use detect::detect_terminal_theme;
pub use loader::load_theme_file;

use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeVariant {
    #[default]
    Dark,
    Light,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    #[serde(default)]
    pub meta: ThemeMeta,
    pub colors: ThemeColors,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThemeMeta {
    pub author: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub variant: ThemeVariant,
}

/// A color as written in a theme file: a name (`"yellow"`), a hex string
/// (`"#ff6600"`), an `{ r, g, b }` table or a 256-color index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ThemeColor {
    Rgb { r: u8, g: u8, b: u8 },
    Indexed(u8),
    Named(String),
}

impl ThemeColor {
    pub fn to_color(&self) -> Color {
        match self {
            ThemeColor::Rgb { r, g, b } => Color::Rgb(*r, *g, *b),
            ThemeColor::Indexed(idx) => Color::Indexed(*idx),
            ThemeColor::Named(name) if name.starts_with('#') => Self::parse_hex(name),
            ThemeColor::Named(name) => Self::parse_named(name),
        }
    }

    fn parse_named(name: &str) -> Color {
        match name.to_lowercase().replace('_', "").as_str() {
            "black" => Color::Black,
            "red" => Color::Red,
            "green" => Color::Green,
            "yellow" => Color::Yellow,
            "blue" => Color::Blue,
            "magenta" => Color::Magenta,
            "cyan" => Color::Cyan,
            "gray" | "grey" => Color::Gray,
            "darkgray" | "darkgrey" => Color::DarkGray,
            "lightred" => Color::LightRed,
            "lightgreen" => Color::LightGreen,
            "lightyellow" => Color::LightYellow,
            "lightblue" => Color::LightBlue,
            "lightmagenta" => Color::LightMagenta,
            "lightcyan" => Color::LightCyan,
            "white" => Color::White,
            _ => Color::Reset,
        }
    }

    fn parse_hex(hex: &str) -> Color {
        let hex = hex.trim_start_matches('#');
        if hex.len() == 6
            && let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            )
        {
            return Color::Rgb(r, g, b);
        }
        Color::Reset
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeColors {
    pub foreground: ThemeColor,
    pub foreground_dim: ThemeColor,
    pub border: ThemeColor,
    pub selection_bg: ThemeColor,
    pub primary: ThemeColor,
    pub error: ThemeColor,
    pub story_title: ThemeColor,
    pub story_tag: ThemeColor,
    pub story_domain: ThemeColor,
    pub story_score: ThemeColor,
    pub story_author: ThemeColor,
    pub story_comments: ThemeColor,
    pub story_time: ThemeColor,
    pub skeleton: ThemeColor,
    pub status_bar_bg: ThemeColor,
    pub status_bar_fg: ThemeColor,
    pub spinner: ThemeColor,
}

#[derive(Debug, Clone)]
pub struct ResolvedTheme {
    pub name: String,
    pub variant: ThemeVariant,
    pub foreground: Color,
    pub foreground_dim: Color,
    pub border: Color,
    pub selection_bg: Color,
    pub primary: Color,
    pub error: Color,
    pub story_title: Color,
    pub story_tag: Color,
    pub story_domain: Color,
    pub story_score: Color,
    pub story_author: Color,
    pub story_comments: Color,
    pub story_time: Color,
    pub skeleton: Color,
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
    pub spinner: Color,
}

impl ResolvedTheme {
    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn selection_style(&self) -> Style {
        Style::default()
            .bg(self.selection_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn dim_style(&self) -> Style {
        Style::default().fg(self.foreground_dim)
    }

    pub fn active_tab_style(&self) -> Style {
        Style::default()
            .fg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error)
    }

    pub fn spinner_style(&self) -> Style {
        Style::default().fg(self.spinner)
    }

    pub fn status_bar_style(&self) -> Style {
        Style::default()
            .bg(self.status_bar_bg)
            .fg(self.status_bar_fg)
    }

    pub fn story_title_style(&self) -> Style {
        Style::default().fg(self.story_title)
    }

    pub fn story_tag_style(&self) -> Style {
        Style::default()
            .fg(self.story_tag)
            .add_modifier(Modifier::BOLD)
    }

    pub fn skeleton_style(&self) -> Style {
        Style::default().fg(self.skeleton)
    }
}

impl From<Theme> for ResolvedTheme {
    fn from(theme: Theme) -> Self {
        let c = theme.colors;
        ResolvedTheme {
            name: theme.name,
            variant: theme.meta.variant,
            foreground: c.foreground.to_color(),
            foreground_dim: c.foreground_dim.to_color(),
            border: c.border.to_color(),
            selection_bg: c.selection_bg.to_color(),
            primary: c.primary.to_color(),
            error: c.error.to_color(),
            story_title: c.story_title.to_color(),
            story_tag: c.story_tag.to_color(),
            story_domain: c.story_domain.to_color(),
            story_score: c.story_score.to_color(),
            story_author: c.story_author.to_color(),
            story_comments: c.story_comments.to_color(),
            story_time: c.story_time.to_color(),
            skeleton: c.skeleton.to_color(),
            status_bar_bg: c.status_bar_bg.to_color(),
            status_bar_fg: c.status_bar_fg.to_color(),
            spinner: c.spinner.to_color(),
        }
    }
}
