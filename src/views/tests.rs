//! Helpers for rendering views into plain text.

use ratatui::{Frame, Terminal, backend::TestBackend};

/// Draw with `render_fn` on a `width` x `height` test terminal and return
/// the buffer as text, one line per row.
pub fn render_to_string<F>(width: u16, height: u16, render_fn: F) -> String
where
    F: FnOnce(&mut Frame),
{
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(render_fn).unwrap();
    let buffer = terminal.backend().buffer().clone();
    let mut output = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            output.push_str(buffer[(x, y)].symbol());
        }
        output.push('\n');
    }
    output
}

/// [`render_to_string`] with trailing spaces and blank leading or trailing
/// rows removed, for inline snapshots.
pub fn render_trimmed<F>(width: u16, height: u16, render_fn: F) -> String
where
    F: FnOnce(&mut Frame),
{
    render_to_string(width, height, render_fn)
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim_matches('\n')
        .to_string()
}
