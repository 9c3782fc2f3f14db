use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::api::StoryType;

#[derive(Parser, Debug)]
#[command(name = "hnfeed")]
#[command(about = "Browse Hacker News rankings from the terminal", long_about = None)]
pub struct Cli {
    /// Listing to open: top, new or best
    #[arg(short, long)]
    pub feed: Option<StoryType>,

    /// Stories revealed per page
    #[arg(long, value_name = "N")]
    pub page_size: Option<usize>,

    /// Base URL of the item API
    #[arg(long, value_name = "URL")]
    pub api_base_url: Option<String>,

    /// Theme name or path to a TOML theme file
    #[arg(short, long)]
    pub theme: Option<String>,

    /// Force dark mode (overrides auto-detection)
    #[arg(long, conflicts_with = "light")]
    pub dark: bool,

    /// Force light mode (overrides auto-detection)
    #[arg(long, conflicts_with = "dark")]
    pub light: bool,

    /// Custom config directory (default: ~/.config/hnfeed)
    #[arg(long, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Enable verbose logging (prints log path, sets DEBUG level)
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print a ranking without starting the TUI
    List(ListArgs),
    /// Manage themes
    Theme(ThemeArgs),
    /// Write a settings file with every option at its default
    InitConfig {
        /// Replace an existing settings file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Listing to print (defaults to the configured feed)
    #[arg(short, long)]
    pub feed: Option<StoryType>,

    /// Number of stories to print
    #[arg(short = 'n', long, default_value_t = 10)]
    pub count: usize,

    /// Output format (text or json)
    #[arg(long, default_value = "text")]
    pub format: ListFormat,
}

#[derive(Args, Debug)]
pub struct ThemeArgs {
    #[command(subcommand)]
    pub command: ThemeCommands,
}

#[derive(Subcommand, Debug)]
pub enum ThemeCommands {
    /// List available themes
    List {
        /// Show detailed information about each theme
        #[arg(short, long)]
        verbose: bool,
    },
    /// Show a theme's configuration
    Show {
        /// Theme name to show
        name: String,

        /// Output format (toml or json)
        #[arg(short, long, default_value = "toml")]
        format: OutputFormat,
    },
    /// Show path where custom themes can be placed
    Path,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Toml,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid format: {s}. Use 'toml' or 'json'")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for ListFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid format: {s}. Use 'text' or 'json'")),
        }
    }
}
