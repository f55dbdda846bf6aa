use autoclicker_core::{
    Action, ClickType, DriverFactory, Error, ErrorCode, InputDriver, MouseButton, Result,
};
use autoclicker_recorder::events::{self, FinishReason, PlaybackEvent, Receiver, UiEvent};
use autoclicker_recorder::{PlaybackConfig, Player};
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Move(i32, i32),
    Click(MouseButton),
    Double,
    Down,
    Up,
    Key(String),
}

#[derive(Default)]
struct Log {
    calls: Mutex<Vec<Call>>,
}

impl Log {
    fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    fn clicks(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Click(_) | Call::Double))
            .count()
    }
}

struct FakeDriver {
    log: Arc<Log>,
    pos: (i32, i32),
}

impl InputDriver for FakeDriver {
    fn cursor_position(&mut self) -> Result<(i32, i32)> {
        Ok(self.pos)
    }

    fn move_cursor(&mut self, x: i32, y: i32) -> Result<()> {
        self.pos = (x, y);
        self.log.calls.lock().push(Call::Move(x, y));
        Ok(())
    }

    fn click(&mut self, button: MouseButton) -> Result<()> {
        self.log.calls.lock().push(Call::Click(button));
        Ok(())
    }

    fn double_click(&mut self) -> Result<()> {
        self.log.calls.lock().push(Call::Double);
        Ok(())
    }

    fn mouse_down(&mut self) -> Result<()> {
        self.log.calls.lock().push(Call::Down);
        Ok(())
    }

    fn mouse_up(&mut self) -> Result<()> {
        self.log.calls.lock().push(Call::Up);
        Ok(())
    }

    fn press_key(&mut self, key: &str) -> Result<()> {
        if key == "bogus" {
            return Err(Error::invalid_input("Unknown key name: bogus"));
        }
        self.log.calls.lock().push(Call::Key(key.to_string()));
        Ok(())
    }
}

fn fake() -> (Arc<Log>, DriverFactory) {
    let log = Arc::new(Log::default());
    let l = log.clone();
    let factory: DriverFactory = Arc::new(move || {
        Ok(Box::new(FakeDriver {
            log: l.clone(),
            pos: (0, 0),
        }) as Box<dyn InputDriver>)
    });
    (log, factory)
}

fn fast(repetitions: u32) -> PlaybackConfig {
    PlaybackConfig {
        interval: 0.0,
        repetitions,
        move_duration: 0.0,
        ..Default::default()
    }
}

fn finish_reason(rx: &Receiver<UiEvent>) -> FinishReason {
    loop {
        match rx.recv_timeout(Duration::from_secs(10)).expect("no finish event") {
            UiEvent::Playback {
                event: PlaybackEvent::Finished(reason),
                ..
            } => return reason,
            _ => continue,
        }
    }
}

#[test]
fn three_left_clicks_then_completes() {
    let (log, factory) = fake();
    let (tx, rx) = events::channel();
    let mut player = Player::new(factory, tx);

    player
        .start(vec![Action::click("A", 10, 10)], fast(3))
        .unwrap();
    player.wait();

    let calls = log.calls();
    let clicks: Vec<_> = calls.iter().filter(|c| matches!(c, Call::Click(_))).collect();
    assert_eq!(clicks, vec![&Call::Click(MouseButton::Left); 3]);
    assert!(!calls.iter().any(|c| matches!(c, Call::Key(_))));
    // every click lands after an exact move to the target
    for (i, c) in calls.iter().enumerate() {
        if matches!(c, Call::Click(_)) {
            assert_eq!(calls[i - 1], Call::Move(10, 10));
        }
    }
    assert!(!player.is_running());
    assert_eq!(finish_reason(&rx), FinishReason::Completed);
}

#[test]
fn walks_filtered_list_n_times_in_order() {
    let (log, factory) = fake();
    let (tx, _rx) = events::channel();
    let mut player = Player::new(factory, tx);

    let actions = vec![
        Action::keystroke("K1", "a"),
        Action::click("C", 5, 5).with_click_type(ClickType::Right),
        Action::keystroke("K2", "b"),
    ];
    player.start(actions, fast(2)).unwrap();
    player.wait();

    let keys_and_clicks: Vec<_> = log
        .calls()
        .into_iter()
        .filter(|c| !matches!(c, Call::Move(..)))
        .collect();
    assert_eq!(
        keys_and_clicks,
        vec![
            Call::Key("a".into()),
            Call::Click(MouseButton::Right),
            Call::Key("b".into()),
            Call::Key("a".into()),
            Call::Click(MouseButton::Right),
            Call::Key("b".into()),
        ]
    );
}

#[test]
fn glide_moves_in_linear_steps() {
    let (log, factory) = fake();
    let (tx, _rx) = events::channel();
    let mut player = Player::new(factory, tx);

    player
        .start(vec![Action::click("A", 100, 50)], fast(1))
        .unwrap();
    player.wait();

    let moves: Vec<_> = log
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            Call::Move(x, y) => Some((x, y)),
            _ => None,
        })
        .collect();
    assert_eq!(moves, vec![(20, 10), (40, 20), (60, 30), (80, 40), (100, 50), (100, 50)]);
}

#[test]
fn hold_presses_and_releases() {
    let (log, factory) = fake();
    let (tx, _rx) = events::channel();
    let mut player = Player::new(factory, tx);

    let hold = Action::click("H", 1, 1)
        .with_click_type(ClickType::Hold)
        .with_hold(0.05);
    player.start(vec![hold], fast(1)).unwrap();
    player.wait();

    let tail: Vec<_> = log
        .calls()
        .into_iter()
        .filter(|c| matches!(c, Call::Down | Call::Up))
        .collect();
    assert_eq!(tail, vec![Call::Down, Call::Up]);
}

#[test]
fn oversized_hold_is_skipped_without_pressing() {
    let (log, factory) = fake();
    let (tx, rx) = events::channel();
    let mut player = Player::new(factory, tx);

    let hold = Action::click("H", 1, 1)
        .with_click_type(ClickType::Hold)
        .with_hold(1e20);
    player
        .start(vec![hold, Action::keystroke("K", "a")], fast(1))
        .unwrap();

    assert_eq!(finish_reason(&rx), FinishReason::Completed);
    let calls = log.calls();
    assert!(!calls.contains(&Call::Down));
    assert!(!calls.contains(&Call::Up));
    assert_eq!(calls.last(), Some(&Call::Key("a".into())));
}

#[test]
fn jittered_clicks_land_within_range() {
    let (log, factory) = fake();
    let (tx, _rx) = events::channel();
    let mut player = Player::new(factory, tx);

    let cfg = PlaybackConfig {
        jitter_enabled: true,
        jitter_range: 3,
        ..fast(20)
    };
    player.start(vec![Action::click("A", 100, 200)], cfg).unwrap();
    player.wait();

    let calls = log.calls();
    let mut targets = Vec::new();
    for pair in calls.windows(2) {
        if let [Call::Move(x, y), Call::Click(MouseButton::Left)] = pair {
            targets.push((*x, *y));
        }
    }
    assert_eq!(targets.len(), 20);
    for (x, y) in &targets {
        assert!((97..=103).contains(x), "x {} out of range", x);
        assert!((197..=203).contains(y), "y {} out of range", y);
    }
}

#[test]
fn stop_ends_run_without_further_actions() {
    let (log, factory) = fake();
    let (tx, rx) = events::channel();
    let mut player = Player::new(factory, tx);

    let cfg = PlaybackConfig {
        infinite: true,
        ..fast(1)
    };
    player.start(vec![Action::click("A", 1, 1)], cfg).unwrap();
    thread::sleep(Duration::from_millis(350));
    player.stop();
    player.stop();
    player.wait();

    let after_stop = log.clicks();
    assert!(after_stop >= 1);
    thread::sleep(Duration::from_millis(300));
    assert_eq!(log.clicks(), after_stop);
    assert!(!player.is_running());
    assert_eq!(finish_reason(&rx), FinishReason::Stopped);
}

#[test]
fn hold_until_stopped_releases_on_stop() {
    let (log, factory) = fake();
    let (tx, _rx) = events::channel();
    let mut player = Player::new(factory, tx);

    let hold = Action::click("H", 1, 1).with_click_type(ClickType::HoldUntilStopped);
    player.start(vec![hold], fast(1)).unwrap();
    thread::sleep(Duration::from_millis(200));
    assert_eq!(log.calls().last(), Some(&Call::Down));
    player.stop();
    player.wait();
    assert_eq!(log.calls().last(), Some(&Call::Up));
}

#[test]
fn bad_key_does_not_end_the_run() {
    let (log, factory) = fake();
    let (tx, rx) = events::channel();
    let mut player = Player::new(factory, tx);

    let actions = vec![Action::keystroke("Bad", "bogus"), Action::keystroke("Ok", "x")];
    player.start(actions, fast(2)).unwrap();
    player.wait();

    assert_eq!(log.calls(), vec![Call::Key("x".into()), Call::Key("x".into())]);
    assert_eq!(finish_reason(&rx), FinishReason::Completed);
}

#[test]
fn rejects_empty_and_double_start() {
    let (_log, factory) = fake();
    let (tx, _rx) = events::channel();
    let mut player = Player::new(factory, tx);

    assert_eq!(
        player.start(vec![], fast(1)).unwrap_err().code,
        ErrorCode::NothingToPlay
    );
    assert!(!player.is_running());

    let cfg = PlaybackConfig {
        infinite: true,
        ..fast(1)
    };
    let first = player.start(vec![Action::click("A", 1, 1)], cfg.clone()).unwrap();
    assert_eq!(
        player
            .start(vec![Action::click("A", 1, 1)], cfg)
            .unwrap_err()
            .code,
        ErrorCode::AlreadyRunning
    );
    assert_eq!(player.current_run(), first);
    player.stop();
    player.wait();
}

#[test]
fn driver_failure_is_an_implicit_stop() {
    let (tx, rx) = events::channel();
    let factory: DriverFactory =
        Arc::new(|| Err(Error::new(ErrorCode::InputFailed, "no display")));
    let mut player = Player::new(factory, tx);

    player.start(vec![Action::click("A", 1, 1)], fast(1)).unwrap();
    player.wait();
    assert!(!player.is_running());
    assert_eq!(
        finish_reason(&rx),
        FinishReason::Failed("no display".to_string())
    );
}

struct PanickingDriver;

impl InputDriver for PanickingDriver {
    fn cursor_position(&mut self) -> Result<(i32, i32)> {
        Ok((0, 0))
    }
    fn move_cursor(&mut self, _x: i32, _y: i32) -> Result<()> {
        Ok(())
    }
    fn click(&mut self, _button: MouseButton) -> Result<()> {
        panic!("driver exploded")
    }
    fn double_click(&mut self) -> Result<()> {
        Ok(())
    }
    fn mouse_down(&mut self) -> Result<()> {
        Ok(())
    }
    fn mouse_up(&mut self) -> Result<()> {
        Ok(())
    }
    fn press_key(&mut self, _key: &str) -> Result<()> {
        Ok(())
    }
}

#[test]
fn worker_panic_is_an_implicit_stop() {
    let (tx, rx) = events::channel();
    let factory: DriverFactory =
        Arc::new(|| Ok(Box::new(PanickingDriver) as Box<dyn InputDriver>));
    let mut player = Player::new(factory, tx);

    player.start(vec![Action::click("A", 1, 1)], fast(1)).unwrap();
    player.wait();
    assert!(!player.is_running());
    assert!(matches!(finish_reason(&rx), FinishReason::Failed(_)));
}

#[test]
fn restart_after_completion() {
    let (log, factory) = fake();
    let (tx, _rx) = events::channel();
    let mut player = Player::new(factory, tx);

    let first = player.start(vec![Action::keystroke("K", "a")], fast(1)).unwrap();
    player.wait();
    let second = player.start(vec![Action::keystroke("K", "b")], fast(1)).unwrap();
    player.wait();
    assert!(second > first);
    assert_eq!(log.calls(), vec![Call::Key("a".into()), Call::Key("b".into())]);
}

#[test]
fn status_before_and_after_each_repetition() {
    let (_log, factory) = fake();
    let (tx, rx) = events::channel();
    let mut player = Player::new(factory, tx);

    player.start(vec![Action::keystroke("K", "a")], fast(2)).unwrap();
    player.wait();

    let statuses: Vec<String> = rx
        .try_iter()
        .filter_map(|e| match e {
            UiEvent::Playback {
                event: PlaybackEvent::Status(s),
                ..
            } => Some(s),
            _ => None,
        })
        .collect();
    assert_eq!(
        statuses,
        vec![
            "Running repetition 1 of 2...",
            "Finished repetition 1 of 2",
            "Running repetition 2 of 2...",
            "Finished repetition 2 of 2",
        ]
    );
}
