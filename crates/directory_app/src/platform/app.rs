use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use directory_core::{update, ListingState, Msg};
use directory_engine::EngineHandle;
use directory_logging::{directory_debug, directory_info, directory_warn, request_scope};

use super::cli::Cli;
use super::effects::EffectRunner;
use super::logging;
use super::persistence;
use super::ui::commands::{parse_command, Command, HELP};
use super::ui::map::ViewSize;
use super::ui::render::{Renderer, TerminalRenderer};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub fn run_app() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::initialize(cli.log_destination(), cli.log_level());

    let config = cli.listing_config();
    let kind = config.kind;
    let engine = EngineHandle::with_reqwest(&cli.base_url, cli.fetch_settings())
        .with_context(|| format!("cannot use backend at {}", cli.base_url))?;

    let initial_query = cli
        .query
        .clone()
        .or_else(|| persistence::load_query(&cli.state_dir, kind));
    directory_info!(
        "Starting {} listing against {} (query {:?})",
        kind.collection(),
        cli.base_url,
        initial_query
    );

    let runner = EffectRunner::new(engine, kind, cli.state_dir.clone(), ViewSize::default());
    let mut controller = Controller::new(
        ListingState::new(config),
        runner,
        TerminalRenderer::new(io::stdout()),
    );
    let input = spawn_input_reader();

    println!("{HELP}");
    controller.dispatch(Msg::Init {
        query_string: initial_query,
    });

    loop {
        match input.try_recv() {
            Ok(line) => match parse_command(&line) {
                Command::Dispatch(msgs) => {
                    for msg in msgs {
                        controller.dispatch(msg);
                    }
                }
                Command::Help => println!("{HELP}"),
                Command::Quit => break,
                Command::Unknown(text) => println!("unknown command: {text} (try `help`)"),
            },
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                directory_debug!("input closed; waiting for outstanding requests");
                controller.settle(cli.fetch_settings().request_timeout);
                break;
            }
        }
        controller.pump(POLL_INTERVAL);
    }

    let _ = io::stdout().flush();
    directory_info!("Exiting");
    Ok(())
}

fn spawn_input_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    directory_warn!("Failed to read input: {}", err);
                    break;
                }
            }
        }
    });
    rx
}

/// Owns the listing state and feeds every message through `update`.
pub struct Controller<R: Renderer> {
    state: ListingState,
    runner: EffectRunner,
    renderer: R,
}

impl<R: Renderer> Controller<R> {
    pub fn new(state: ListingState, runner: EffectRunner, renderer: R) -> Self {
        Self {
            state,
            runner,
            renderer,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> &ListingState {
        &self.state
    }

    #[cfg(test)]
    pub fn runner(&self) -> &EffectRunner {
        &self.runner
    }

    #[cfg(test)]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn dispatch(&mut self, msg: Msg) {
        let _scope = match &msg {
            Msg::ListingLoaded { seq, .. } => Some(request_scope(*seq)),
            _ => None,
        };
        if let Msg::ListingLoaded { seq, .. } = &msg {
            if *seq != self.state.latest_seq() {
                directory_debug!("discarding stale listing (latest is {})", self.state.latest_seq());
            }
        }

        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let dirty = state.consume_dirty();
        self.state = state;

        if dirty {
            self.renderer.render(&self.state.view());
        }
        self.runner.run(effects, &mut self.renderer);
    }

    /// Dispatches the next engine completion, if one arrives within `timeout`.
    pub fn pump(&mut self, timeout: Duration) -> bool {
        match self.runner.next_msg(timeout) {
            Some(msg) => {
                self.dispatch(msg);
                true
            }
            None => false,
        }
    }

    /// Pumps until no backend call is outstanding or `timeout` has passed.
    pub fn settle(&mut self, timeout: Duration) {
        let deadline = Instant::now() + timeout;
        while self.runner.in_flight() > 0 {
            let now = Instant::now();
            if now >= deadline {
                directory_warn!("{} requests still outstanding", self.runner.in_flight());
                break;
            }
            self.pump(deadline - now);
        }
    }
}
