//! Game session state machine.
//!
//! `NotStarted -> Countdown -> Playing -> Ended`, with `retry` looping back to
//! `Countdown` and `exit` returning to `NotStarted`. The session owns the live
//! score, the current round, the round clock, the best-score table and the
//! sound board; it talks to the page only through [`Screen`], [`Scheduler`]
//! and the board's `AudioSink`.

mod ports;

pub use ports::{Scheduler, Screen};

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::audio::{Cue, SoundBoard};
use crate::config::{COUNTDOWN_PERIOD, COUNTDOWN_STEPS, GameConfig, TICK_PERIOD};
use crate::error::{GameError, Result};
use crate::palette::{PALETTE, Rgb};
use crate::round::{self, Round};
use crate::score::{ScoreKey, ScoreStore};
use crate::timer::{Tick, TickToken, TimerEngine};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    Countdown,
    Playing,
    Ended,
}

/// Outcome of a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Right color; carries the new live score.
    Correct(u32),
    /// Wrong color; the session has ended with this final score.
    Wrong(u32),
}

/// Everything a session needs from outside.
pub struct Ports {
    pub screen: Box<dyn Screen>,
    pub scheduler: Box<dyn Scheduler>,
    pub sound: SoundBoard,
    pub scores: ScoreStore,
}

pub struct GameSession {
    phase: Phase,
    config: GameConfig,
    countdown_left: u8,
    live_score: u32,
    round: Option<Round>,
    timer: TimerEngine,
    screen: Box<dyn Screen>,
    scheduler: Box<dyn Scheduler>,
    sound: SoundBoard,
    scores: ScoreStore,
    rng: StdRng,
}

impl GameSession {
    pub fn new(ports: Ports) -> Self {
        Self::with_rng(ports, StdRng::from_os_rng())
    }

    /// Deterministic rounds, for tests and replays.
    pub fn with_seed(ports: Ports, seed: u64) -> Self {
        Self::with_rng(ports, StdRng::seed_from_u64(seed))
    }

    fn with_rng(ports: Ports, rng: StdRng) -> Self {
        Self {
            phase: Phase::NotStarted,
            config: GameConfig::default(),
            countdown_left: 0,
            live_score: 0,
            round: None,
            timer: TimerEngine::new(),
            screen: ports.screen,
            scheduler: ports.scheduler,
            sound: ports.sound,
            scores: ports.scores,
            rng,
        }
    }

    // --- Queries ---------------------------------------------------------

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn live_score(&self) -> u32 {
        self.live_score
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn countdown_left(&self) -> u8 {
        self.countdown_left
    }

    pub fn remaining_label(&self) -> String {
        self.timer.remaining_label()
    }

    pub fn key(&self) -> ScoreKey {
        ScoreKey::new(self.config.difficulty, self.config.color_mode)
    }

    pub fn best_score(&self) -> u32 {
        self.scores.get(self.key())
    }

    pub fn sound_mut(&mut self) -> &mut SoundBoard {
        &mut self.sound
    }

    /// Shows the best score for `key` while no session is running (menu
    /// selection changed). Ignored mid-session.
    pub fn preview_best(&mut self, key: ScoreKey) {
        if matches!(self.phase, Phase::NotStarted | Phase::Ended) {
            let best = self.scores.get(key);
            self.screen.show_best_score(best);
        }
    }

    // --- Transitions -----------------------------------------------------

    pub fn start(&mut self, config: GameConfig) -> Result<()> {
        self.expect_phase("start", Phase::NotStarted)?;
        config.validate()?;
        self.config = config;
        log::debug!("session start: {config:?}");

        self.sound.unlock();
        self.screen.show_game();
        self.begin_countdown();
        self.sound.start_music();
        Ok(())
    }

    /// One lead-in step. The last step starts the first round.
    pub fn countdown_tick(&mut self) -> Result<()> {
        self.expect_phase("countdown_tick", Phase::Countdown)?;
        self.countdown_left = self.countdown_left.saturating_sub(1);
        if self.countdown_left > 0 {
            self.screen.show_countdown(Some(self.countdown_left));
            return Ok(());
        }

        self.screen.show_countdown(None);
        self.scheduler.cancel();
        self.phase = Phase::Playing;
        self.next_round()?;
        let token = self.timer.start(self.config.difficulty.round_duration());
        self.arm_clock(token);
        Ok(())
    }

    /// Delivers one round-clock tick. Stale tokens are ignored.
    pub fn timer_tick(&mut self, token: TickToken) -> Tick {
        let tick = self.timer.tick(token);
        match tick {
            Tick::Running(_) => self.screen.show_time(&self.timer.remaining_label()),
            Tick::Expired => {
                self.screen.show_time(&self.timer.remaining_label());
                log::debug!("time up at score {}", self.live_score);
                self.sound.play(Cue::Wrong);
                self.finish();
            }
            Tick::Ignored => {}
        }
        tick
    }

    pub fn select(&mut self, color: Rgb) -> Result<Selection> {
        self.expect_phase("select", Phase::Playing)?;
        let hit = self.round.as_ref().is_some_and(|r| r.is_target(color));
        if !hit {
            log::debug!("wrong pick {color} at score {}", self.live_score);
            self.sound.play(Cue::Wrong);
            self.finish();
            return Ok(Selection::Wrong(self.live_score));
        }

        self.sound.play(Cue::Correct);
        self.live_score += 1;
        self.screen.show_live_score(self.live_score);
        self.record_best();
        self.next_round()?;
        let token = self.timer.reset(self.config.difficulty.round_duration());
        self.arm_clock(token);
        Ok(Selection::Correct(self.live_score))
    }

    /// Plays again with the same settings.
    pub fn retry(&mut self) -> Result<()> {
        self.expect_phase("retry", Phase::Ended)?;
        self.screen.hide_game_over();
        self.begin_countdown();
        Ok(())
    }

    /// Discards the session and returns to the menu.
    pub fn exit(&mut self) -> Result<()> {
        self.expect_phase("exit", Phase::Ended)?;
        self.phase = Phase::NotStarted;
        self.live_score = 0;
        self.round = None;
        self.screen.hide_game_over();
        self.screen.show_menu();
        Ok(())
    }

    // --- Internals -------------------------------------------------------

    fn expect_phase(&self, op: &'static str, phase: Phase) -> Result<()> {
        if self.phase != phase {
            return Err(GameError::InvalidState {
                op,
                phase: self.phase,
            });
        }
        Ok(())
    }

    fn begin_countdown(&mut self) {
        self.timer.stop();
        self.live_score = 0;
        self.round = None;
        self.countdown_left = COUNTDOWN_STEPS;
        self.phase = Phase::Countdown;

        let best = self.best_score();
        self.screen.show_live_score(0);
        self.screen.show_best_score(best);
        self.screen.clear_round();
        self.screen.show_countdown(Some(self.countdown_left));
        self.scheduler.start_countdown(COUNTDOWN_PERIOD);
    }

    fn next_round(&mut self) -> Result<()> {
        let round = round::generate(
            &PALETTE,
            self.config.option_count,
            self.config.color_mode,
            &mut self.rng,
        )?;
        self.screen.show_round(&round);
        self.round = Some(round);
        Ok(())
    }

    fn arm_clock(&mut self, token: TickToken) {
        self.screen.show_time(&self.timer.remaining_label());
        self.scheduler.start_round_clock(token, TICK_PERIOD);
    }

    fn record_best(&mut self) {
        let key = self.key();
        if self.scores.record_if_higher(key, self.live_score) {
            self.screen.show_best_score(self.live_score);
        }
    }

    fn finish(&mut self) {
        self.timer.stop();
        self.scheduler.cancel();
        self.phase = Phase::Ended;
        self.screen.show_game_over(self.live_score);
        self.record_best();
    }
}
