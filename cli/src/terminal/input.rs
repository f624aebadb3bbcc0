use std::io::{self, BufRead, IsTerminal, Write};

use crossterm::{
    cursor::MoveTo,
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{Clear, ClearType, disable_raw_mode, enable_raw_mode},
};

/// Restores cooked mode when dropped, even if reading the key failed.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

pub fn clear_screen() -> io::Result<()> {
    if !io::stdout().is_terminal() {
        return Ok(());
    }
    execute!(io::stdout(), Clear(ClearType::All), MoveTo(0, 0))
}

/// Reads one trimmed line from stdin. `None` means stdin was closed.
pub async fn prompt(label: &str) -> io::Result<Option<String>> {
    let mut stdout = io::stdout();
    write!(stdout, "{label}")?;
    stdout.flush()?;

    tokio::task::spawn_blocking(read_trimmed_line)
        .await
        .map_err(io::Error::other)?
}

fn read_trimmed_line() -> io::Result<Option<String>> {
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line)? {
        0 => Ok(None),
        _ => Ok(Some(line.trim().to_string())),
    }
}

/// Blocks until a key is pressed. Without a terminal a full line is read.
pub async fn wait_for_key(msg: &str) -> io::Result<()> {
    let mut stdout = io::stdout();
    writeln!(stdout, "{msg}")?;
    stdout.flush()?;

    tokio::task::spawn_blocking(|| {
        if !io::stdin().is_terminal() {
            return read_trimmed_line().map(|_| ());
        }

        let _guard = RawModeGuard::enable()?;
        loop {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(());
                }
            }
        }
    })
    .await
    .map_err(io::Error::other)?
}
