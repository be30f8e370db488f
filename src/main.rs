mod cli;
mod clock;
mod logging;
mod pump;
mod stopwatch;
mod ui;

use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedSender};

use crate::cli::Arguments;
use crate::clock::Clock;
use crate::logging::{init_logging, LoggingConfig};
use crate::pump::Pump;
use crate::stopwatch::StopwatchSession;

const KEY_ENTER: char = '\n';

/// Messages delivered to the event loop.
#[derive(Debug, Clone, PartialEq)]
pub enum AppOp {
    Rawkeys(Vec<char>),
    Pump(u64),
    Quit,
}

struct WebWatchApp<W: Write> {
    session: StopwatchSession,
    out: W,
    plain: bool,
    help_visible: bool,
}

impl<W: Write> WebWatchApp<W> {
    fn new(session: StopwatchSession, out: W, plain: bool) -> Self {
        Self {
            session,
            out,
            plain,
            help_visible: false,
        }
    }

    fn redraw(&mut self) -> io::Result<()> {
        if self.help_visible {
            return ui::draw_help(&mut self.out, self.plain);
        }
        ui::draw_stopwatch(&mut self.out, self.session.timer(), self.plain)
    }

    /// Returns false once the app should exit.
    fn handle_op(&mut self, op: AppOp) -> io::Result<bool> {
        match op {
            AppOp::Rawkeys(keys) => {
                for key in keys {
                    if !self.handle_key(key) {
                        return Ok(false);
                    }
                }
                self.redraw()?;
            }
            AppOp::Pump(generation) => {
                // Plain output only changes on key presses
                if self.session.handle_pump(generation) && !self.plain && !self.help_visible {
                    self.redraw()?;
                }
            }
            AppOp::Quit => return Ok(false),
        }
        Ok(true)
    }

    fn handle_key(&mut self, key: char) -> bool {
        // Any key dismisses help
        if self.help_visible {
            self.help_visible = false;
            return true;
        }

        match key {
            KEY_ENTER | '\r' | ' ' => self.session.toggle(),
            'l' => self.session.lap(),
            'r' => self.session.reset(),
            'h' | '?' => self.help_visible = true,
            'q' => return false,
            _ => log::debug!("ignoring key {:?}", key),
        }
        true
    }

    fn shutdown(&mut self) {
        self.session.shutdown();
    }
}

async fn read_keys(sender: UnboundedSender<AppOp>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let op = match lines.next_line().await {
            Ok(Some(line)) => {
                let mut keys: Vec<char> = line.trim_end().chars().collect();
                if keys.is_empty() {
                    keys.push(KEY_ENTER);
                }
                AppOp::Rawkeys(keys)
            }
            Ok(None) => AppOp::Quit,
            Err(e) => {
                log::error!("failed to read stdin: {}", e);
                AppOp::Quit
            }
        };
        let quit = op == AppOp::Quit;
        if sender.send(op).is_err() || quit {
            break;
        }
    }
}

async fn event_loop(arguments: Arguments) -> anyhow::Result<()> {
    let (sender, mut receiver) = mpsc::unbounded_channel();

    let input = tokio::spawn(read_keys(sender.clone()));
    let pump = Pump::new(sender, arguments.interval_ms);
    let session = StopwatchSession::new(pump, Clock::new());
    let mut app = WebWatchApp::new(session, io::stdout(), arguments.plain);

    app.redraw()?;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        let op = tokio::select! {
            op = receiver.recv() => match op {
                Some(op) => op,
                None => break,
            },
            _ = &mut ctrl_c => AppOp::Quit,
        };
        if !app.handle_op(op)? {
            break;
        }
    }

    app.shutdown();
    input.abort();
    log::info!("exiting");
    Ok(())
}

fn run(arguments: Arguments) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_io()
        .enable_time()
        .build()?;
    let result = runtime.block_on(event_loop(arguments));
    // The stdin reader may still be parked in a blocking read
    runtime.shutdown_background();
    result
}

fn main() -> ExitCode {
    let arguments = Arguments::parse();
    init_logging(LoggingConfig {
        env_filter: arguments.log_filter.clone(),
        ..LoggingConfig::default()
    });
    log::debug!("starting with {:?}", arguments);

    match run(arguments) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("webwatch failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
