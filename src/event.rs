use crossterm::event::KeyEvent;

/// Terminal input folded down to what the app reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    Tick,
    Resize,
}
