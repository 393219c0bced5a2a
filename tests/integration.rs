// Integration tests (native) for the `color-snap` crate.
// These drive a whole session through recording fakes instead of the DOM so
// they run under `cargo test` on the host.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use color_snap::audio::{AudioSink, Cue, SoundBoard};
use color_snap::score::{MemoryBackend, ScoreBackend};
use color_snap::session::{Scheduler, Screen};
use color_snap::{
    ColorMode, Difficulty, GameConfig, GameSession, Phase, Ports, Rgb, Round, ScoreKey,
    ScoreStore, Selection, Tick, TickToken,
};

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Game,
    Menu,
    Countdown(Option<u8>),
    Round(usize),
    ClearRound,
    Live(u32),
    Best(u32),
    Time(String),
    GameOver(u32),
    HideGameOver,
    Cue(Cue),
    Music,
    Clock(TickToken),
    CountdownClock,
    Cancel,
}

type Log = Rc<RefCell<Vec<Event>>>;

struct Recorder(Log);

impl Screen for Recorder {
    fn show_game(&mut self) {
        self.0.borrow_mut().push(Event::Game);
    }
    fn show_menu(&mut self) {
        self.0.borrow_mut().push(Event::Menu);
    }
    fn show_countdown(&mut self, step: Option<u8>) {
        self.0.borrow_mut().push(Event::Countdown(step));
    }
    fn show_round(&mut self, round: &Round) {
        self.0.borrow_mut().push(Event::Round(round.options.len()));
    }
    fn clear_round(&mut self) {
        self.0.borrow_mut().push(Event::ClearRound);
    }
    fn show_live_score(&mut self, score: u32) {
        self.0.borrow_mut().push(Event::Live(score));
    }
    fn show_best_score(&mut self, best: u32) {
        self.0.borrow_mut().push(Event::Best(best));
    }
    fn show_time(&mut self, remaining: &str) {
        self.0.borrow_mut().push(Event::Time(remaining.to_string()));
    }
    fn show_game_over(&mut self, final_score: u32) {
        self.0.borrow_mut().push(Event::GameOver(final_score));
    }
    fn hide_game_over(&mut self) {
        self.0.borrow_mut().push(Event::HideGameOver);
    }
}

impl Scheduler for Recorder {
    fn start_countdown(&mut self, _period: Duration) {
        self.0.borrow_mut().push(Event::CountdownClock);
    }
    fn start_round_clock(&mut self, token: TickToken, _period: Duration) {
        self.0.borrow_mut().push(Event::Clock(token));
    }
    fn cancel(&mut self) {
        self.0.borrow_mut().push(Event::Cancel);
    }
}

impl AudioSink for Recorder {
    fn unlock(&mut self) -> color_snap::Result<()> {
        Ok(())
    }
    fn play_cue(&mut self, cue: Cue) -> color_snap::Result<()> {
        self.0.borrow_mut().push(Event::Cue(cue));
        Ok(())
    }
    fn play_music(&mut self) -> color_snap::Result<()> {
        self.0.borrow_mut().push(Event::Music);
        Ok(())
    }
    fn resume_music(&mut self) -> color_snap::Result<()> {
        Ok(())
    }
    fn pause_music(&mut self) -> color_snap::Result<()> {
        Ok(())
    }
}

#[derive(Clone, Default)]
struct SharedStorage(Rc<RefCell<MemoryBackend>>);

impl ScoreBackend for SharedStorage {
    fn read(&self, key: &str) -> color_snap::Result<Option<String>> {
        self.0.borrow().read(key)
    }
    fn write(&mut self, key: &str, value: &str) -> color_snap::Result<()> {
        self.0.borrow_mut().write(key, value)
    }
}

struct Harness {
    session: GameSession,
    log: Log,
    storage: SharedStorage,
}

impl Harness {
    fn new(storage: SharedStorage, seed: u64) -> Self {
        let log: Log = Rc::default();
        let ports = Ports {
            screen: Box::new(Recorder(log.clone())),
            scheduler: Box::new(Recorder(log.clone())),
            sound: SoundBoard::new(Box::new(Recorder(log.clone()))),
            scores: ScoreStore::load(Box::new(storage.clone())),
        };
        Self {
            session: GameSession::with_seed(ports, seed),
            log,
            storage,
        }
    }

    fn take_log(&self) -> Vec<Event> {
        std::mem::take(&mut *self.log.borrow_mut())
    }

    fn token(&self) -> TickToken {
        self.log
            .borrow()
            .iter()
            .rev()
            .find_map(|e| match e {
                Event::Clock(t) => Some(*t),
                _ => None,
            })
            .expect("round clock armed")
    }

    fn target(&self) -> Rgb {
        self.session.round().expect("round in play").target.color
    }

    fn wrong(&self) -> Rgb {
        let round = self.session.round().expect("round in play");
        round
            .option_colors()
            .find(|c| !round.is_target(*c))
            .expect("a distractor")
    }

    fn stored(&self, key: &str) -> Option<String> {
        self.storage.0.borrow().get(key).map(str::to_string)
    }
}

#[test]
fn normal_game_from_start_to_game_over() {
    let mut h = Harness::new(SharedStorage::default(), 5);
    let config = GameConfig::new(Difficulty::Normal, ColorMode::Normal, 4).unwrap();

    h.session.start(config).unwrap();
    assert_eq!(
        h.take_log(),
        vec![
            Event::Game,
            Event::Live(0),
            Event::Best(0),
            Event::ClearRound,
            Event::Countdown(Some(3)),
            Event::CountdownClock,
            Event::Music,
        ]
    );

    h.session.countdown_tick().unwrap();
    h.session.countdown_tick().unwrap();
    assert_eq!(
        h.take_log(),
        vec![Event::Countdown(Some(2)), Event::Countdown(Some(1))]
    );
    h.session.countdown_tick().unwrap();
    assert_eq!(h.session.phase(), Phase::Playing);
    let token = h.token();
    assert_eq!(
        h.take_log(),
        vec![
            Event::Countdown(None),
            Event::Cancel,
            Event::Round(4),
            Event::Time("2.0".into()),
            Event::Clock(token),
        ]
    );

    for _ in 0..4 {
        h.session.timer_tick(token);
    }
    assert_eq!(h.session.remaining_label(), "1.6");

    let target = h.target();
    assert_eq!(h.session.select(target).unwrap(), Selection::Correct(1));
    assert_eq!(h.session.remaining_label(), "2.0");
    assert_eq!(h.stored("bestScore_normal_normal").as_deref(), Some("1"));
    h.take_log();

    let wrong = h.wrong();
    assert_eq!(h.session.select(wrong).unwrap(), Selection::Wrong(1));
    assert_eq!(h.session.phase(), Phase::Ended);
    assert_eq!(
        h.take_log(),
        vec![Event::Cue(Cue::Wrong), Event::Cancel, Event::GameOver(1)]
    );
    assert_eq!(h.session.best_score(), 1);
}

#[test]
fn hard_streak_keeps_playing_and_counts_up() {
    let mut h = Harness::new(SharedStorage::default(), 99);
    let config = GameConfig::new(Difficulty::Hard, ColorMode::Colorblind, 12).unwrap();
    h.session.start(config).unwrap();
    for _ in 0..3 {
        h.session.countdown_tick().unwrap();
    }

    let mut previous = 0;
    for _ in 0..25 {
        let token = h.token();
        // Answer with most of the second already gone.
        for _ in 0..9 {
            assert!(matches!(h.session.timer_tick(token), Tick::Running(_)));
        }
        let target = h.target();
        match h.session.select(target).unwrap() {
            Selection::Correct(score) => {
                assert_eq!(score, previous + 1);
                previous = score;
            }
            Selection::Wrong(_) => panic!("target rejected"),
        }
        assert_eq!(h.session.phase(), Phase::Playing);
        assert_eq!(h.session.remaining_label(), "1.0");
    }

    let token = h.token();
    let expired = (0..10)
        .map(|_| h.session.timer_tick(token))
        .filter(|t| *t == Tick::Expired)
        .count();
    assert_eq!(expired, 1);
    assert_eq!(h.session.phase(), Phase::Ended);
    assert_eq!(h.session.live_score(), 25);
    assert_eq!(h.stored("bestScore_hard_colorblind").as_deref(), Some("25"));
    assert!(h.take_log().contains(&Event::GameOver(25)));
}

#[test]
fn lower_scores_leave_the_best_alone() {
    let storage = SharedStorage::default();
    storage
        .0
        .borrow_mut()
        .write("bestScore_easy_normal", "3")
        .unwrap();
    let mut h = Harness::new(storage, 1);
    let config = GameConfig::new(Difficulty::Easy, ColorMode::Normal, 2).unwrap();
    h.session.start(config).unwrap();
    assert!(h.take_log().contains(&Event::Best(3)));
    for _ in 0..3 {
        h.session.countdown_tick().unwrap();
    }
    let target = h.target();
    h.session.select(target).unwrap();
    let wrong = h.wrong();
    h.session.select(wrong).unwrap();

    assert_eq!(h.session.best_score(), 3);
    assert_eq!(h.stored("bestScore_easy_normal").as_deref(), Some("3"));
    assert!(!h.take_log().iter().any(|e| matches!(e, Event::Best(_))));
}

#[test]
fn best_scores_persist_across_sessions() {
    let storage = SharedStorage::default();
    {
        let mut h = Harness::new(storage.clone(), 3);
        h.session
            .start(GameConfig::new(Difficulty::Hard, ColorMode::Normal, 3).unwrap())
            .unwrap();
        for _ in 0..3 {
            h.session.countdown_tick().unwrap();
        }
        for _ in 0..2 {
            let target = h.target();
            h.session.select(target).unwrap();
        }
        let wrong = h.wrong();
        h.session.select(wrong).unwrap();
    }

    let store = ScoreStore::load(Box::new(storage));
    assert_eq!(store.get(ScoreKey::new(Difficulty::Hard, ColorMode::Normal)), 2);
    assert_eq!(store.get(ScoreKey::new(Difficulty::Hard, ColorMode::Colorblind)), 0);
}

#[test]
fn retry_and_exit_cycle() {
    let mut h = Harness::new(SharedStorage::default(), 8);
    let config = GameConfig::new(Difficulty::Normal, ColorMode::Normal, 6).unwrap();
    h.session.start(config).unwrap();
    for _ in 0..3 {
        h.session.countdown_tick().unwrap();
    }
    let wrong = h.wrong();
    h.session.select(wrong).unwrap();
    assert_eq!(h.session.live_score(), 0);
    h.take_log();

    h.session.retry().unwrap();
    assert_eq!(h.session.phase(), Phase::Countdown);
    let log = h.take_log();
    assert_eq!(log.first(), Some(&Event::HideGameOver));
    assert!(log.contains(&Event::Countdown(Some(3))));
    assert!(!log.contains(&Event::Music));

    for _ in 0..3 {
        h.session.countdown_tick().unwrap();
    }
    assert_eq!(h.session.round().unwrap().options.len(), 6);
    let wrong = h.wrong();
    h.session.select(wrong).unwrap();
    h.session.exit().unwrap();
    assert_eq!(h.session.phase(), Phase::NotStarted);
    assert_eq!(h.take_log().last(), Some(&Event::Menu));
    assert!(h.session.retry().is_err());
}
