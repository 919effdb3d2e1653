use super::keys::{action_for, dispatch};
use anyhow::{anyhow, Result};
use crossterm::event::{self, Event};
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::{cursor, ExecutableCommand, QueueableCommand};
use netdash_monitor::{AppState, Monitor, Renderer};
use netdash_render::{render_dashboard, UiOpts};
use std::io::{self, Write};
use std::time::{Duration, Instant};

const INPUT_POLL: Duration = Duration::from_millis(100);

pub struct Tui {
    stdout: io::Stdout,
}

impl Tui {
    pub fn setup() -> Result<Self> {
        let mut stdout = io::stdout();
        terminal::enable_raw_mode().map_err(|err| anyhow!("failed to enter raw mode: {err}"))?;
        enter_screen(&mut stdout, || {
            let _ = terminal::disable_raw_mode();
        })?;
        Ok(Self { stdout })
    }

    pub fn teardown(&mut self) {
        let _ = self.stdout.execute(cursor::Show);
        let _ = self.stdout.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
        let _ = self.stdout.flush();
    }

    /// Restores the terminal before the default panic message is printed.
    pub fn install_panic_hook() {
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let mut tui = Tui {
                stdout: io::stdout(),
            };
            tui.teardown();
            original_hook(panic_info);
        }));
    }
}

/// Switches to the alternate screen with a hidden cursor. On failure `restore`
/// runs before the error is returned, so raw mode is never left behind.
fn enter_screen<W: Write>(out: &mut W, restore: impl FnOnce()) -> Result<()> {
    let entered = out
        .execute(terminal::EnterAlternateScreen)
        .and_then(|out| out.execute(cursor::Hide).map(|_| ()));
    if let Err(err) = entered {
        restore();
        return Err(anyhow!("failed to prepare terminal: {err}"));
    }
    Ok(())
}

pub struct TerminalRenderer {
    stdout: io::Stdout,
    opts: UiOpts,
}

impl TerminalRenderer {
    pub fn new(opts: UiOpts) -> Self {
        Self {
            stdout: io::stdout(),
            opts,
        }
    }
}

impl Renderer for TerminalRenderer {
    fn render(&mut self, state: &AppState) -> Result<()> {
        let (width, height) = terminal::size()?;
        let frame = render_dashboard(state, &self.opts, width, height);

        self.stdout.queue(Clear(ClearType::All))?;
        for (row, line) in frame.lines().take(height as usize).enumerate() {
            self.stdout
                .queue(cursor::MoveTo(0, row as u16))?
                .queue(Print(line))?;
        }
        self.stdout.flush()?;
        Ok(())
    }
}

/// Drives the dashboard until a quit key is pressed: input, timer ticks and
/// completed background work all land on this thread.
pub fn event_loop(monitor: &mut Monitor<TerminalRenderer>) -> Result<()> {
    loop {
        let now = Instant::now();
        let wait = monitor
            .state()
            .timer
            .remaining(now)
            .map_or(INPUT_POLL, |due| due.min(INPUT_POLL));

        if event::poll(wait)? {
            match event::read()? {
                Event::Key(key) => {
                    if let Some(action) = action_for(&key) {
                        if !dispatch(monitor, action, Instant::now())? {
                            return Ok(());
                        }
                    }
                }
                Event::Resize(_, _) => monitor.render()?,
                _ => {}
            }
        }

        monitor.tick(Instant::now())?;
        monitor.poll_pending()?;
    }
}
