//! Serial console dashboard.
//!
//! Renders each refresh as a log line and takes operator commands typed on
//! the console.  A reader thread blocks on the input stream and forwards
//! raw lines over an `mpsc` channel; the control thread only ever drains
//! the channel without blocking, so it stays the single writer of the
//! control state.
//!
//! ```text
//!  stdin ──▶ [console-rx thread] ──mpsc──▶ poll_command() ──▶ RefreshLoop
//! ```

use std::io::{self, BufRead};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use log::{info, warn};

use crate::app::commands::AppCommand;
use crate::app::events::{Confirmation, DashboardView};
use crate::app::ports::DashboardPort;

const READER_STACK_BYTES: usize = 4 * 1024;

pub struct ConsoleDashboard {
    lines: Receiver<String>,
    disconnected: bool,
}

impl ConsoleDashboard {
    /// Start reading commands from `input` on a dedicated thread.
    pub fn spawn<R>(input: R) -> io::Result<Self>
    where
        R: BufRead + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("console-rx".into())
            .stack_size(READER_STACK_BYTES)
            .spawn(move || {
                for line in input.lines() {
                    match line {
                        Ok(line) => {
                            if tx.send(line).is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            warn!("console: input error: {}", e);
                            break;
                        }
                    }
                }
            })?;
        info!("console: type on | off | resume | schedule HH:MM HH:MM");
        Ok(Self::from_receiver(rx))
    }

    /// Read commands from the process's standard input.
    pub fn stdin() -> io::Result<Self> {
        Self::spawn(io::BufReader::new(io::stdin()))
    }

    /// Use an existing line source.
    pub fn from_receiver(lines: Receiver<String>) -> Self {
        Self {
            lines,
            disconnected: false,
        }
    }
}

impl DashboardPort for ConsoleDashboard {
    fn render(&mut self, view: &DashboardView) {
        info!(
            "DASH | {} | T={} | RH={} | relay={} | schedule {}",
            view.updated_at.format("%Y-%m-%d %H:%M:%S"),
            view.reading.temperature(),
            view.reading.humidity(),
            view.status,
            view.window,
        );
        if let Some(banner) = view.override_banner() {
            warn!("DASH | {}", banner);
        }
    }

    fn poll_command(&mut self) -> Option<AppCommand> {
        loop {
            match self.lines.try_recv() {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    match line.parse() {
                        Ok(cmd) => return Some(cmd),
                        Err(e) => warn!("console: '{}' rejected: {}", line, e),
                    }
                }
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Disconnected) => {
                    if !self.disconnected {
                        self.disconnected = true;
                        warn!("console: input closed, commands disabled");
                    }
                    return None;
                }
            }
        }
    }

    fn confirm(&mut self, confirmation: &Confirmation) {
        info!("NOTICE | {}", confirmation.message());
    }
}
