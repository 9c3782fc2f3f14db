use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use futures::StreamExt;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::time::{Interval, MissedTickBehavior};

use crate::event::Event;

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

pub fn init() -> Result<Tui> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    execute!(io::stdout(), EnterAlternateScreen).context("Failed to enter alternate screen")?;
    install_panic_hook();
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    terminal.clear()?;
    Ok(terminal)
}

pub fn restore() -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(io::stdout(), LeaveAlternateScreen, crossterm::cursor::Show)
        .context("Failed to leave alternate screen")?;
    Ok(())
}

/// Leave the alternate screen before a panic message is printed.
fn install_panic_hook() {
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore();
        hook(info);
    }));
}

/// Merges crossterm input with a fixed tick so spinners keep moving while
/// no keys arrive.
pub struct EventHandler {
    stream: EventStream,
    tick: Interval,
}

impl EventHandler {
    pub fn new(tick_ms: u64) -> Self {
        let mut tick = tokio::time::interval(Duration::from_millis(tick_ms));
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self {
            stream: EventStream::new(),
            tick,
        }
    }

    pub async fn next(&mut self) -> Result<Event> {
        loop {
            tokio::select! {
                _ = self.tick.tick() => return Ok(Event::Tick),
                event = self.stream.next() => match event {
                    Some(Ok(CrosstermEvent::Key(key))) if key.kind == KeyEventKind::Press => {
                        return Ok(Event::Key(key));
                    }
                    Some(Ok(CrosstermEvent::Resize(_, _))) => return Ok(Event::Resize),
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e).context("Failed to read terminal event"),
                    None => anyhow::bail!("Terminal event stream closed"),
                },
            }
        }
    }
}
