mod api;
mod app;
mod cli;
mod event;
mod feed;
mod fetch;
mod format;
mod help;
mod keys;
mod listing;
mod logging;
mod settings;
mod theme;
mod time;
mod tui;
mod views;

#[cfg(test)]
mod test_utils;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use ratatui::Frame;

use api::HnClient;
use app::{App, Message};
use cli::{Cli, Commands, ListArgs, OutputFormat, ThemeArgs, ThemeCommands};
use event::Event;
use fetch::QueryCache;
use settings::{RuntimeConfig, Settings};
use theme::{
    ResolvedTheme, ThemeVariant, all_themes, by_name, default_for_variant, detect_terminal_theme,
    load_theme_file,
};
use tui::EventHandler;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_dir = settings::config_dir(cli.config_dir.as_ref());

    match &cli.command {
        Some(Commands::Theme(theme_args)) => {
            return handle_theme_command(theme_args, config_dir.as_ref());
        }
        Some(Commands::InitConfig { force }) => {
            return init_config(config_dir.as_deref(), *force);
        }
        _ => {}
    }

    let settings = load_settings(config_dir.as_deref());
    let config = RuntimeConfig::resolve(&cli, &settings);

    if let Some(Commands::List(args)) = &cli.command {
        logging::init_stderr(cli.verbose)?;
        return run_list(args, &config).await;
    }

    let _log_guard = match &config_dir {
        Some(dir) => Some(logging::init_file(dir, cli.verbose)?),
        None => None,
    };
    run_tui(&cli, &config, config_dir.as_ref()).await
}

fn load_settings(config_dir: Option<&Path>) -> Settings {
    config_dir
        .map(|dir| {
            let path = settings::settings_path(dir);
            Settings::load(&path).unwrap_or_else(|e| {
                eprintln!("Warning: {:#}", e);
                Settings::default()
            })
        })
        .unwrap_or_default()
}

fn init_config(config_dir: Option<&Path>, force: bool) -> Result<()> {
    let dir = config_dir.context("Could not determine config directory")?;
    let path = settings::settings_path(dir);
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Pass --force to overwrite it.",
            path.display()
        );
    }
    Settings::with_defaults().save(&path)?;
    println!("{}", path.display());
    Ok(())
}

fn build_cache(config: &RuntimeConfig) -> Result<Arc<QueryCache>> {
    let client = HnClient::new(&config.api_base_url)
        .with_context(|| format!("Invalid API base URL '{}'", config.api_base_url))?;
    Ok(Arc::new(QueryCache::new(Arc::new(client), config.retry)))
}

async fn run_list(args: &ListArgs, config: &RuntimeConfig) -> Result<()> {
    let cache = build_cache(config)?;
    let feed = args.feed.unwrap_or(config.feed);
    let stories = listing::collect(&cache, feed, args.count, config.page_size)
        .await
        .with_context(|| format!("Failed to load {} stories", feed.label()))?;
    print!("{}", listing::render(&stories, args.format, chrono::Utc::now())?);
    Ok(())
}

fn handle_theme_command(args: &ThemeArgs, config_dir: Option<&PathBuf>) -> Result<()> {
    match &args.command {
        ThemeCommands::List { verbose } => {
            let themes = all_themes();
            if *verbose {
                for theme in themes {
                    println!(
                        "{:<20} {:?}  {}",
                        theme.name,
                        theme.meta.variant,
                        theme.meta.description.as_deref().unwrap_or("")
                    );
                }
            } else {
                for theme in themes {
                    println!("{}", theme.name);
                }
            }
        }
        ThemeCommands::Show { name, format } => {
            let theme = by_name(name).with_context(|| format!("Theme '{}' not found", name))?;

            match format {
                OutputFormat::Toml => {
                    let toml = theme::loader::theme_to_toml(&theme)
                        .context("Failed to serialize theme")?;
                    println!("{}", toml);
                }
                OutputFormat::Json => {
                    let json = serde_json::to_string_pretty(&theme)
                        .context("Failed to serialize theme to JSON")?;
                    println!("{}", json);
                }
            }
        }
        ThemeCommands::Path => {
            if let Some(config_dir) = config_dir {
                println!("{}", settings::themes_dir(config_dir).display());
            } else {
                eprintln!("Could not determine config directory");
            }
        }
    }
    Ok(())
}

fn resolve_theme(
    cli: &Cli,
    config: &RuntimeConfig,
    config_dir: Option<&PathBuf>,
) -> Result<ResolvedTheme> {
    let variant = if cli.dark {
        ThemeVariant::Dark
    } else if cli.light {
        ThemeVariant::Light
    } else {
        detect_terminal_theme()
    };

    if let Some(theme_arg) = &config.theme {
        let path = Path::new(theme_arg);
        if path.exists() && path.extension().map(|e| e == "toml").unwrap_or(false) {
            let theme = load_theme_file(path)?;
            return Ok(theme.into());
        }

        if let Some(theme) = by_name(theme_arg) {
            return Ok(theme.into());
        }

        if let Some(config_dir) = config_dir {
            let custom_path = settings::themes_dir(config_dir).join(format!("{}.toml", theme_arg));
            if custom_path.exists() {
                let theme = load_theme_file(&custom_path)?;
                return Ok(theme.into());
            }
        }

        anyhow::bail!(
            "Theme '{}' not found. Use 'hnfeed theme list' to see available themes.",
            theme_arg
        );
    }

    Ok(default_for_variant(variant))
}

async fn run_tui(cli: &Cli, config: &RuntimeConfig, config_dir: Option<&PathBuf>) -> Result<()> {
    let resolved_theme = resolve_theme(cli, config, config_dir)?;
    let cache = build_cache(config)?;
    let mut terminal = tui::init()?;
    let mut app = App::new(resolved_theme, cache, config.feed, config.page_size);
    let mut events = EventHandler::new(100);
    let mut last_height: Option<u16> = None;

    app.load_feed();

    let result = loop {
        if let Err(e) = terminal.draw(|frame| render(&app, frame)) {
            break Err(e.into());
        }

        // Track viewport height changes for incremental reveal
        match terminal.size() {
            Ok(size) if last_height != Some(size.height) => {
                last_height = Some(size.height);
                app.update(Message::UpdateViewportHeight(size.height));
            }
            Ok(_) => {}
            Err(e) => break Err(e.into()),
        }

        // Poll async results (non-blocking)
        while let Ok(result) = app.result_rx.try_recv() {
            app.handle_async_result(result);
        }

        if app.should_quit {
            break Ok(());
        }

        match events.next().await {
            Ok(Event::Key(key)) => {
                if let Some(msg) = keys::handle_key(key, &app) {
                    app.update(msg);
                }
            }
            Ok(Event::Tick | Event::Resize) => {}
            Err(e) => break Err(e),
        }
    };

    tui::restore()?;
    result
}

fn render(app: &App, frame: &mut Frame) {
    use ratatui::layout::{Constraint, Layout};

    let area = frame.area();

    // Split area for debug pane if visible
    let (main_area, debug_area) = if app.debug.visible {
        let chunks = Layout::vertical([
            Constraint::Min(0),     // Main content
            Constraint::Length(10), // Debug pane
        ])
        .split(area);
        (chunks[0], Some(chunks[1]))
    } else {
        (area, None)
    };

    views::stories::render(frame, app, main_area);

    if let Some(debug_area) = debug_area {
        views::debug::render(frame, app, debug_area);
    }

    views::help_overlay::render(frame, app, area);
}
