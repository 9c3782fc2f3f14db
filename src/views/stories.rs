use std::sync::Arc;

use chrono::{DateTime, Utc};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::api::{ItemKind, Story, StoryType};
use crate::app::App;
use crate::feed::Phase;
use crate::format::{display_domain, story_tag};
use crate::help::stories_help;
use crate::keys::{global_keymap, stories_keymap};
use crate::theme::ResolvedTheme;
use crate::time::format_relative_age;
use crate::views::common::{render_error, render_notice};
use crate::views::spinner::spinner_frame;
use crate::views::status_bar::StatusBar;

const SKELETON_ROWS: usize = 5;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let [tabs, list, status] = Layout::vertical([
        Constraint::Length(1), // Feed tabs
        Constraint::Min(0),    // Story list
        Constraint::Length(1), // Status bar
    ])
    .areas(area);

    render_feed_tabs(frame, app, tabs);
    render_story_list(frame, app, list);
    render_status_bar(frame, app, status);
}

fn render_feed_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let mut spans: Vec<Span> = StoryType::all()
        .iter()
        .enumerate()
        .flat_map(|(i, feed)| {
            let style = if *feed == app.feed {
                theme.active_tab_style()
            } else {
                theme.dim_style()
            };
            [
                Span::styled(format!("[{}]", i + 1), theme.dim_style()),
                Span::styled(feed.label(), style),
                Span::raw("  "),
            ]
        })
        .collect();

    if app.should_show_spinner() {
        spans.push(Span::styled(
            spinner_frame(app.loading_start),
            theme.spinner_style(),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn list_block<'a>(app: &App) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border_style())
        .title(format!("{} Stories", app.feed.label()))
}

fn render_story_list(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let controller = &app.controller;

    if let Phase::Errored(message) = controller.phase() {
        render_error(frame, "Failed to load stories", &message, theme, area);
        return;
    }

    let stories = controller.visible_slice();
    if stories.is_empty() {
        if controller.is_loading() {
            render_skeletons(frame, app, area);
        } else if controller.phase() == Phase::Exhausted {
            render_notice(frame, "No stories found", &format!("{} Stories", app.feed.label()), theme, area);
        } else {
            frame.render_widget(list_block(app), area);
        }
        return;
    }

    let now = app.clock.now();
    let mut items: Vec<ListItem> = stories
        .iter()
        .enumerate()
        .map(|(i, story)| story_to_list_item(story, i + 1, theme, now))
        .collect();
    if controller.is_loading_more() {
        items.push(ListItem::new(Line::from(vec![
            Span::raw("     "),
            Span::styled("loading more…", theme.dim_style().add_modifier(Modifier::ITALIC)),
        ])));
    }

    let list = List::new(items)
        .block(list_block(app))
        .highlight_style(theme.selection_style())
        .highlight_symbol("▶ ");

    let mut state = ListState::default();
    state.select(Some(app.selected_index));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_skeletons(frame: &mut Frame, app: &App, area: Rect) {
    let style = app.theme.skeleton_style();
    let items: Vec<ListItem> = (0..SKELETON_ROWS)
        .map(|i| {
            let width = 28 + (i * 7) % 20;
            ListItem::new(vec![
                Line::from(vec![Span::raw("     "), Span::styled("░".repeat(width), style)]),
                Line::from(vec![Span::raw("     "), Span::styled("░".repeat(width / 2), style)]),
            ])
        })
        .collect();
    frame.render_widget(List::new(items).block(list_block(app)), area);
}

fn comment_count(n: u32) -> String {
    if n == 1 {
        "1 comment".to_string()
    } else {
        format!("{n} comments")
    }
}

fn story_to_list_item(
    story: &Arc<Story>,
    rank: usize,
    theme: &ResolvedTheme,
    now: DateTime<Utc>,
) -> ListItem<'static> {
    let mut title = vec![Span::styled(format!("{:>3}. ", rank), theme.dim_style())];
    let tag = story_tag(&story.title).or((story.kind == ItemKind::Job).then_some("Job"));
    if let Some(tag) = tag {
        title.push(Span::styled(format!("[{tag}]"), theme.story_tag_style()));
        title.push(Span::raw(" "));
    }
    title.push(Span::styled(
        story.display_title().to_string(),
        theme.story_title_style(),
    ));
    let domain = display_domain(story);
    if !domain.is_empty() {
        title.push(Span::styled(
            format!(" ({domain})"),
            Style::default().fg(theme.story_domain),
        ));
    }

    let mut meta = vec![
        Span::raw("     "),
        Span::styled(
            format!("▲ {}", story.score),
            Style::default().fg(theme.story_score),
        ),
        Span::raw(" | "),
        Span::styled(
            format!("by {}", story.author()),
            Style::default().fg(theme.story_author),
        ),
        Span::raw(" | "),
        Span::styled(
            format_relative_age(story.time, now),
            Style::default().fg(theme.story_time),
        ),
    ];
    if let Some(count) = story.descendants {
        meta.push(Span::raw(" | "));
        meta.push(Span::styled(
            comment_count(count),
            Style::default().fg(theme.story_comments),
        ));
    }

    ListItem::new(vec![Line::from(title), Line::from(meta)])
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let keymap = global_keymap().extend(stories_keymap());
    let controller = &app.controller;
    let shown = controller.visible_len();

    let mut bar = StatusBar::new(&app.theme)
        .label(app.feed.label())
        .help(stories_help().format(&keymap, false));
    if controller.is_loading_more() {
        bar = bar.loading(format!("{} loading more…", spinner_frame(app.loading_start)));
    } else if controller.is_loading() {
        bar = bar.loading(format!("{} loading…", spinner_frame(app.loading_start)));
    }
    if shown > 0 {
        bar = bar.position(app.selected_index + 1, shown);
        if let Some(total) = controller.ids_len() {
            bar = bar.ranked(total);
        }
    }
    bar.render(frame, area);
}
