//! Help text generated from keymaps.

use crate::app::Message;
use crate::keys::{Keymap, format_key};

/// A single help item representing one or more related actions.
pub struct HelpItem {
    /// Messages to look up keys for. Keys are joined with "/".
    messages: Vec<Message>,
    label: &'static str,
}

impl HelpItem {
    pub fn new(message: Message, label: &'static str) -> Self {
        Self {
            messages: vec![message],
            label,
        }
    }

    /// Paired actions, e.g. j/k for next/prev.
    pub fn pair(first: Message, second: Message, label: &'static str) -> Self {
        Self {
            messages: vec![first, second],
            label,
        }
    }

    fn keys(&self, keymap: &Keymap) -> Option<String> {
        let keys: Vec<String> = self
            .messages
            .iter()
            .filter_map(|msg| {
                keymap
                    .find_key(msg)
                    .map(|(code, mods)| format_key(code, mods))
            })
            .collect();
        if keys.is_empty() {
            None
        } else {
            Some(keys.join("/"))
        }
    }

    /// `keys:label`, or None if nothing is bound.
    pub fn format(&self, keymap: &Keymap) -> Option<String> {
        self.keys(keymap).map(|keys| format!("{}:{}", keys, self.label))
    }

    /// (`keys`, label) for the overlay table.
    pub fn format_for_overlay(&self, keymap: &Keymap) -> Option<(String, &'static str)> {
        self.keys(keymap).map(|keys| (keys, self.label))
    }
}

pub struct HelpConfig {
    pub expanded: Vec<HelpItem>,
    pub compact: Vec<HelpItem>,
}

impl HelpConfig {
    pub fn format(&self, keymap: &Keymap, show_expanded: bool) -> String {
        let items = if show_expanded {
            &self.expanded
        } else {
            &self.compact
        };
        items
            .iter()
            .filter_map(|item| item.format(keymap))
            .collect::<Vec<_>>()
            .join("  ")
    }
}

/// Status bar help for the stories view.
pub fn stories_help() -> HelpConfig {
    use Message::{
        NextFeed, OpenDiscussion, OpenUrl, PrevFeed, Quit, Refresh, SelectFirst, SelectLast,
        SelectNext, SelectPrev, ToggleDebug, ToggleHelp,
    };
    HelpConfig {
        expanded: vec![
            HelpItem::pair(SelectNext, SelectPrev, "nav"),
            HelpItem::pair(SelectFirst, SelectLast, "top/bottom"),
            HelpItem::pair(PrevFeed, NextFeed, "feeds"),
            HelpItem::new(OpenUrl, "open"),
            HelpItem::new(OpenDiscussion, "discussion"),
            HelpItem::new(Refresh, "refresh"),
            HelpItem::new(ToggleDebug, "debug"),
            HelpItem::new(Quit, "quit"),
            HelpItem::new(ToggleHelp, "hide"),
        ],
        compact: vec![
            HelpItem::pair(PrevFeed, NextFeed, "feeds"),
            HelpItem::new(ToggleHelp, "help"),
            HelpItem::new(Quit, "quit"),
        ],
    }
}

/// Rows of the help overlay.
pub fn stories_overlay_items() -> Vec<HelpItem> {
    use Message::{
        NextFeed, OpenDiscussion, OpenUrl, PageDown, PageUp, PrevFeed, Quit, Refresh,
        SelectFirst, SelectLast, SelectNext, SelectPrev, SwitchFeed, ToggleDebug, ToggleHelp,
    };
    use crate::api::StoryType;
    vec![
        HelpItem::pair(SelectNext, SelectPrev, "navigate"),
        HelpItem::pair(SelectFirst, SelectLast, "top/bottom"),
        HelpItem::pair(PageDown, PageUp, "page down/up"),
        HelpItem::pair(PrevFeed, NextFeed, "switch feeds"),
        HelpItem::new(SwitchFeed(StoryType::Top), "top stories"),
        HelpItem::new(SwitchFeed(StoryType::New), "new stories"),
        HelpItem::new(SwitchFeed(StoryType::Best), "best stories"),
        HelpItem::new(OpenUrl, "open link"),
        HelpItem::new(OpenDiscussion, "open discussion"),
        HelpItem::new(Refresh, "refresh"),
        HelpItem::new(ToggleDebug, "debug"),
        HelpItem::new(Quit, "quit"),
        HelpItem::new(ToggleHelp, "close"),
    ]
}
