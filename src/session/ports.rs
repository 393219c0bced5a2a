// Collaborators the session drives. The browser implementations live in
// `crate::web`; tests use recording fakes.

use std::time::Duration;

use crate::round::Round;
use crate::timer::TickToken;

/// Presentation side effects.
pub trait Screen {
    /// Switches from the main menu to the game container.
    fn show_game(&mut self);
    fn show_menu(&mut self);
    /// `Some(n)` shows lead-in step `n`; `None` hides the lead-in.
    fn show_countdown(&mut self, step: Option<u8>);
    fn show_round(&mut self, round: &Round);
    fn clear_round(&mut self);
    fn show_live_score(&mut self, score: u32);
    fn show_best_score(&mut self, best: u32);
    /// Remaining round time, already formatted ("1.4").
    fn show_time(&mut self, remaining: &str);
    fn show_game_over(&mut self, final_score: u32);
    fn hide_game_over(&mut self);
}

/// Periodic callbacks into the session.
///
/// Only one schedule is active at a time: every `start_*` call replaces the
/// previous schedule and `cancel` clears it. Countdown ticks must be delivered
/// through `GameSession::countdown_tick`, round ticks through
/// `GameSession::timer_tick` with the token given here.
pub trait Scheduler {
    fn start_countdown(&mut self, period: Duration);
    fn start_round_clock(&mut self, token: TickToken, period: Duration);
    fn cancel(&mut self);
}
