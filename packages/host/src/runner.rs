//! Host execution logic: startup wiring and the tick loop.

use std::{path::PathBuf, sync::Arc, time::Duration};

use rand::{Rng, SeedableRng, rngs::StdRng};
use spinwheel_core::{
    domain::{EngagementGate, HoldSource, RoundPhase, SessionConfig, is_allowed},
    infrastructure::{
        ChatServer, ChatSession, InMemoryParticipantRegistry, SessionError, load_session_config,
    },
    usecase::{JoinParticipantUseCase, RoundSettings, RoundStateMachine},
};
use tokio::time::{Instant, MissedTickBehavior};

use crate::{
    console::{HELP_TEXT, HostCommand, spawn_console},
    countdown::Countdown,
    formatter::StatusFormatter,
    signal::shutdown_signal,
};

/// Options of one host run.
#[derive(Debug, Clone)]
pub struct HostOptions {
    pub config_path: PathBuf,
    pub server: ChatServer,
    pub tick: Duration,
    pub countdown_secs: u32,
}

/// Whether the tick loop keeps running after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// State driven by the tick loop. Only the tick loop touches the state machine.
pub struct HostLoop<R> {
    machine: RoundStateMachine<R>,
    countdown: Countdown,
    session: Option<ChatSession>,
    last_phase: RoundPhase,
}

impl<R: Rng> HostLoop<R> {
    pub fn new(
        machine: RoundStateMachine<R>,
        countdown: Countdown,
        session: Option<ChatSession>,
    ) -> Self {
        let last_phase = machine.phase();
        Self {
            machine,
            countdown,
            session,
            last_phase,
        }
    }

    pub fn machine(&self) -> &RoundStateMachine<R> {
        &self.machine
    }

    /// Advance the round by `dt` seconds and report what changed.
    pub fn tick(&mut self, dt: f32) {
        self.machine.tick(dt);

        if self.countdown.take_expired() {
            tracing::info!("Join countdown finished");
        }

        self.observe_phase();
    }

    /// Run one console command.
    pub fn dispatch(&mut self, command: HostCommand) -> Flow {
        match command {
            HostCommand::Open => {
                self.machine.set_engagement(true);
            }
            HostCommand::Close => {
                self.machine.set_engagement(false);
            }
            HostCommand::Toggle => {
                self.machine.toggle_engagement();
            }
            HostCommand::Spin => {
                if !self.machine.spin_trigger() {
                    println!("Cannot spin now (need 2+ participants, joins closed, no winner shown)");
                }
            }
            HostCommand::Hold => {
                if !self.machine.hold_start(HoldSource::Key) {
                    println!("Nothing to reset");
                }
            }
            HostCommand::Release => {
                self.machine.hold_release(HoldSource::Key);
            }
            HostCommand::Status => print!("{}", self.status()),
            HostCommand::List => {
                let snapshot = self.machine.snapshot();
                print!(
                    "{}",
                    StatusFormatter::format_participants(&snapshot.participants, snapshot.winner_index)
                );
            }
            HostCommand::Help => print!("{}", HELP_TEXT),
            HostCommand::Quit => return Flow::Quit,
        }

        self.observe_phase();
        Flow::Continue
    }

    /// Parse and run one console line.
    pub fn handle_input(&mut self, line: &str) -> Flow {
        match line.parse::<HostCommand>() {
            Ok(command) => self.dispatch(command),
            Err(e) => {
                println!("{}", e);
                Flow::Continue
            }
        }
    }

    pub fn status(&self) -> String {
        StatusFormatter::format_status(
            &self.machine.snapshot(),
            self.countdown.remaining(),
            self.session.as_ref().map(ChatSession::status),
        )
    }

    /// Hand the chat session over for shutdown.
    pub fn take_session(&mut self) -> Option<ChatSession> {
        self.session.take()
    }

    fn observe_phase(&mut self) {
        let phase = self.machine.phase();
        if phase == self.last_phase {
            return;
        }

        tracing::debug!(
            "Phase {} -> {}",
            StatusFormatter::format_phase(self.last_phase),
            StatusFormatter::format_phase(phase)
        );
        if phase == RoundPhase::WinnerDisplay
            && self.last_phase == RoundPhase::Spinning
            && let Some(celebration) = &self.machine.state().celebration
        {
            print!("{}", StatusFormatter::format_winner(celebration));
        }
        self.last_phase = phase;
    }
}

/// Load the session config, falling back to an empty one.
pub fn load_config_or_default(path: &std::path::Path) -> SessionConfig {
    match load_session_config(path) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("{}", e);
            SessionConfig::default()
        }
    }
}

fn start_chat(
    config: &SessionConfig,
    server: &ChatServer,
    join: JoinParticipantUseCase,
) -> Option<ChatSession> {
    match ChatSession::start(config, server, join) {
        Ok(session) => Some(session),
        Err(e @ SessionError::IncompleteConfig) => {
            tracing::warn!("{}", e);
            None
        }
        Err(e) => {
            tracing::error!("Chat session failed: {}", e);
            None
        }
    }
}

/// Start the chat session on the blocking pool.
///
/// Resolution and connecting block for up to a few seconds per address.
pub async fn connect_chat(
    config: SessionConfig,
    server: ChatServer,
    join: JoinParticipantUseCase,
) -> Option<ChatSession> {
    match tokio::task::spawn_blocking(move || start_chat(&config, &server, join)).await {
        Ok(session) => session,
        Err(e) => {
            tracing::error!("Chat session task failed: {}", e);
            None
        }
    }
}

/// Run the wheel host until quit, EOF or a shutdown signal
///
/// # Arguments
///
/// * `options` - Config path, chat server, tick interval and countdown length
pub async fn run_host(options: HostOptions) {
    let config = load_config_or_default(&options.config_path);

    let authorized = is_allowed(&config.nickname, &config.room);
    tracing::info!(
        "Stream {} authorized",
        if authorized { "is" } else { "is not" }
    );

    // Initialize dependencies in order:
    // 1. Registry and gate
    // 2. Round state machine
    // 3. Chat session
    let registry = Arc::new(InMemoryParticipantRegistry::new());
    let gate = EngagementGate::new();
    let countdown = Countdown::new();

    let settings = RoundSettings {
        host: config.host_nickname().map(str::to_string),
        countdown_secs: options.countdown_secs,
        authorized,
    };
    let machine = RoundStateMachine::new(
        registry.clone(),
        gate.clone(),
        Box::new(countdown.clone()),
        StdRng::from_entropy(),
        settings,
    );
    machine.seed_host();

    let join = JoinParticipantUseCase::new(registry, gate);
    let session = connect_chat(config, options.server, join).await;

    let mut host = HostLoop::new(machine, countdown, session);
    let mut input_rx = spawn_console();
    print!("{}", HELP_TEXT);

    let mut ticker = tokio::time::interval(options.tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last_tick = Instant::now();

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            now = ticker.tick() => {
                let dt = now.saturating_duration_since(last_tick).as_secs_f32();
                last_tick = now;
                host.tick(dt);
            }
            line = input_rx.recv() => {
                let Some(line) = line else {
                    tracing::info!("Console closed");
                    break;
                };
                if host.handle_input(&line) == Flow::Quit {
                    break;
                }
            }
            _ = &mut shutdown => break,
        }
    }

    if let Some(session) = host.take_session()
        && let Err(e) = tokio::task::spawn_blocking(move || session.shutdown()).await
    {
        tracing::error!("Failed to stop chat session: {}", e);
    }

    tracing::info!("Host shutdown complete");
}
