use super::{ResolvedTheme, Theme, ThemeColor, ThemeColors, ThemeMeta, ThemeVariant};

pub fn all_themes() -> Vec<Theme> {
    vec![hn_dark(), hn_light(), terminal_dark(), terminal_light()]
}

pub fn by_name(name: &str) -> Option<Theme> {
    all_themes().into_iter().find(|t| t.name == name)
}

pub fn default_for_variant(variant: ThemeVariant) -> ResolvedTheme {
    match variant {
        ThemeVariant::Dark => hn_dark().into(),
        ThemeVariant::Light => hn_light().into(),
    }
}

fn named(s: &str) -> ThemeColor {
    ThemeColor::Named(s.to_string())
}

const HN_ORANGE: &str = "#ff6600";

/// Orange accents on a dark terminal.
pub fn hn_dark() -> Theme {
    Theme {
        name: "hn-dark".to_string(),
        meta: ThemeMeta {
            author: Some("hnfeed".to_string()),
            description: Some("Hacker News orange on a dark background".to_string()),
            variant: ThemeVariant::Dark,
        },
        colors: ThemeColors {
            foreground: named("#e8e6e3"),
            foreground_dim: named("#828282"),
            border: named("#5a5a5a"),
            selection_bg: named("#3a2a1e"),
            primary: named(HN_ORANGE),
            error: named("#ff5555"),
            story_title: named("#e8e6e3"),
            story_tag: named(HN_ORANGE),
            story_domain: named("#828282"),
            story_score: named(HN_ORANGE),
            story_author: named("#a8a8a8"),
            story_comments: named("#a8a8a8"),
            story_time: named("#828282"),
            skeleton: named("#3c3c3c"),
            status_bar_bg: named(HN_ORANGE),
            status_bar_fg: named("black"),
            spinner: named(HN_ORANGE),
        },
    }
}

/// The news.ycombinator.com palette for light terminals.
pub fn hn_light() -> Theme {
    Theme {
        name: "hn-light".to_string(),
        meta: ThemeMeta {
            author: Some("hnfeed".to_string()),
            description: Some("Hacker News orange on a light background".to_string()),
            variant: ThemeVariant::Light,
        },
        colors: ThemeColors {
            foreground: named("black"),
            foreground_dim: named("#828282"),
            border: named("#b4b4a8"),
            selection_bg: named("#f6e3d0"),
            primary: named(HN_ORANGE),
            error: named("#c00000"),
            story_title: named("black"),
            story_tag: named(HN_ORANGE),
            story_domain: named("#828282"),
            story_score: named(HN_ORANGE),
            story_author: named("#5a5a5a"),
            story_comments: named("#5a5a5a"),
            story_time: named("#828282"),
            skeleton: named("#e0e0d8"),
            status_bar_bg: named(HN_ORANGE),
            status_bar_fg: named("white"),
            spinner: named(HN_ORANGE),
        },
    }
}

/// Terminal palette only, for terminals without truecolor.
pub fn terminal_dark() -> Theme {
    Theme {
        name: "terminal-dark".to_string(),
        meta: ThemeMeta {
            author: Some("hnfeed".to_string()),
            description: Some("Dark theme using the 16 terminal colors".to_string()),
            variant: ThemeVariant::Dark,
        },
        colors: ThemeColors {
            foreground: named("white"),
            foreground_dim: named("gray"),
            border: named("darkgray"),
            selection_bg: named("darkgray"),
            primary: named("yellow"),
            error: named("red"),
            story_title: named("white"),
            story_tag: named("magenta"),
            story_domain: named("gray"),
            story_score: named("yellow"),
            story_author: named("cyan"),
            story_comments: named("green"),
            story_time: named("gray"),
            skeleton: named("darkgray"),
            status_bar_bg: named("blue"),
            status_bar_fg: named("white"),
            spinner: named("yellow"),
        },
    }
}

pub fn terminal_light() -> Theme {
    Theme {
        name: "terminal-light".to_string(),
        meta: ThemeMeta {
            author: Some("hnfeed".to_string()),
            description: Some("Light theme using the 16 terminal colors".to_string()),
            variant: ThemeVariant::Light,
        },
        colors: ThemeColors {
            foreground: named("black"),
            foreground_dim: named("darkgray"),
            border: named("darkgray"),
            selection_bg: named("lightblue"),
            primary: named("blue"),
            error: named("red"),
            story_title: named("black"),
            story_tag: named("magenta"),
            story_domain: named("darkgray"),
            story_score: named("red"),
            story_author: named("blue"),
            story_comments: named("green"),
            story_time: named("darkgray"),
            skeleton: named("gray"),
            status_bar_bg: named("blue"),
            status_bar_fg: named("white"),
            spinner: named("blue"),
        },
    }
}
