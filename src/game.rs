//! Game state machine
//!
//! Sequences menu -> in progress -> won / lost / quit and owns the tick
//! scheduler lifecycle. Terminal phases are left only through a fresh start,
//! which rebuilds the whole session.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::settings::Settings;
use crate::sim::{Direction, Session, Terminal, tick};

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first start
    Menu,
    /// Ticking
    InProgress,
    Won,
    Lost,
    /// Player abandoned the session
    Quit,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Menu => "menu",
            GamePhase::InProgress => "in_progress",
            GamePhase::Won => "won",
            GamePhase::Lost => "lost",
            GamePhase::Quit => "quit",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, GamePhase::Won | GamePhase::Lost | GamePhase::Quit)
    }
}

/// Abstract player input, whatever device produced it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Command {
    Start,
    StepPaddle(Direction),
    MovePaddleTo(f32),
    Quit,
}

/// Transition triggers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Start,
    Lose,
    Win,
    Quit,
}

/// Next phase for an action, if the transition is allowed
fn next_phase(phase: GamePhase, action: Action) -> Option<GamePhase> {
    match (phase, action) {
        (GamePhase::Menu, Action::Start) => Some(GamePhase::InProgress),

        (GamePhase::InProgress, Action::Lose) => Some(GamePhase::Lost),
        (GamePhase::InProgress, Action::Win) => Some(GamePhase::Won),
        (GamePhase::InProgress, Action::Quit) => Some(GamePhase::Quit),

        // Full reset from any terminal phase
        (phase, Action::Start) if phase.is_terminal() => Some(GamePhase::InProgress),

        _ => None,
    }
}

/// Periodic tick driver (an interval timer, a frame loop, a test harness)
pub trait Scheduler {
    /// Begin invoking [`Game::on_tick`] every `period`
    fn start(&mut self, period: Duration);
    /// Stop invoking ticks
    fn stop(&mut self);
}

/// Receives phase changes and terminal outcomes
pub trait Observer {
    fn on_phase_changed(&mut self, _from: GamePhase, _to: GamePhase) {}
    fn on_won(&mut self) {}
    fn on_lost(&mut self) {}
}

impl Observer for () {}

/// The game: phase, current session and tick lifecycle
pub struct Game<S: Scheduler, O: Observer = ()> {
    settings: Settings,
    phase: GamePhase,
    session: Option<Session>,
    scheduler: S,
    observer: O,
    /// Whether the scheduler is currently running
    ticking: bool,
    /// Seed of the first session; later sessions add their index
    base_seed: u64,
    sessions_started: u64,
}

impl<S: Scheduler, O: Observer> Game<S, O> {
    pub fn new(settings: Settings, seed: u64, scheduler: S, observer: O) -> Self {
        Self {
            settings,
            phase: GamePhase::Menu,
            session: None,
            scheduler,
            observer,
            ticking: false,
            base_seed: seed,
            sessions_started: 0,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Current (or most recently finished) session
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut Session> {
        self.session.as_mut()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_ticking(&self) -> bool {
        self.ticking
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Dispatch an input command
    pub fn handle(&mut self, command: Command) -> Result<(), ConfigError> {
        match command {
            Command::Start => self.start_session()?,
            Command::StepPaddle(direction) => {
                self.step_paddle(direction);
            }
            Command::MovePaddleTo(x) => self.move_paddle_to(x),
            Command::Quit => {
                self.quit();
            }
        }
        Ok(())
    }

    /// Build a fresh session and begin ticking
    ///
    /// Does nothing while a session is already in progress. A configuration
    /// error leaves the phase untouched.
    pub fn start_session(&mut self) -> Result<(), ConfigError> {
        let Some(next) = next_phase(self.phase, Action::Start) else {
            log::debug!("Start ignored in phase {}", self.phase.as_str());
            return Ok(());
        };

        let seed = self.base_seed.wrapping_add(self.sessions_started);
        let session = Session::new(&self.settings, seed)?;
        self.sessions_started += 1;
        self.session = Some(session);
        log::info!("Session {} started with seed {}", self.sessions_started, seed);

        self.set_phase(next);
        self.start_ticking();
        Ok(())
    }

    /// Halt ticking; safe to call any number of times
    pub fn stop_session(&mut self) {
        self.stop_ticking();
    }

    /// Step the paddle; false when ignored or already at the bound
    pub fn step_paddle(&mut self, direction: Direction) -> bool {
        match self.live_session() {
            Some(session) => session.paddle.step(direction),
            None => false,
        }
    }

    /// Move the paddle to follow a pointer
    pub fn move_paddle_to(&mut self, x: f32) {
        if let Some(session) = self.live_session() {
            session.paddle.move_to(x);
        }
    }

    /// Abandon the running session; false if nothing was in progress
    pub fn quit(&mut self) -> bool {
        match next_phase(self.phase, Action::Quit) {
            Some(next) => {
                self.stop_ticking();
                self.set_phase(next);
                log::info!("Session quit");
                true
            }
            None => false,
        }
    }

    /// Scheduler callback: advance one tick while in progress
    ///
    /// Stray callbacks after the session ended are ignored.
    pub fn on_tick(&mut self) -> Option<Terminal> {
        if self.phase != GamePhase::InProgress {
            return None;
        }
        let session = self.session.as_mut()?;
        let terminal = tick(session)?;

        let action = match terminal {
            Terminal::Lost => Action::Lose,
            Terminal::Won => Action::Win,
        };
        if let Some(next) = next_phase(self.phase, action) {
            self.stop_ticking();
            self.set_phase(next);
            match terminal {
                Terminal::Won => self.observer.on_won(),
                Terminal::Lost => self.observer.on_lost(),
            }
        }
        Some(terminal)
    }

    fn live_session(&mut self) -> Option<&mut Session> {
        if self.phase == GamePhase::InProgress {
            self.session.as_mut()
        } else {
            None
        }
    }

    fn set_phase(&mut self, next: GamePhase) {
        let from = self.phase;
        self.phase = next;
        log::info!("Phase {} -> {}", from.as_str(), next.as_str());
        self.observer.on_phase_changed(from, next);
    }

    fn start_ticking(&mut self) {
        if !self.ticking {
            self.ticking = true;
            self.scheduler.start(self.settings.playfield.tick_period());
        }
    }

    fn stop_ticking(&mut self) {
        if self.ticking {
            self.ticking = false;
            self.scheduler.stop();
        }
    }
}
