//! Playback engine
//!
//! [`Player::start`] snapshots the actions and spawns one worker thread.
//! The worker walks the list `repetitions` times (or until stopped),
//! checking the running flag before every action. It never touches
//! session state: progress and completion are posted as [`UiEvent`]s and
//! the session tears down on its own thread.

use crate::events::{FinishReason, PlaybackEvent, Sender, UiEvent};
use autoclicker_core::{
    check_hold, Action, ActionKind, AppSettings, ClickType, DriverFactory, Error, InputDriver,
    MouseButton, Result, DEFAULT_HOLD_SECS,
};
use rand::Rng;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Floor for the pause after each action, in seconds
pub const MIN_DELAY_SECS: f64 = 0.1;
/// Half-width of the random-delay window, in seconds
pub const RANDOM_DELAY_SECS: f64 = 0.5;
/// Cursor glide samples per second of move duration
pub const MOVE_STEPS_PER_SEC: f64 = 20.0;
pub const MIN_MOVE_STEPS: u32 = 5;

const HOLD_POLL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackConfig {
    /// Seconds to wait after each action
    pub interval: f64,
    /// Passes over the list; ignored when `infinite`
    pub repetitions: u32,
    pub infinite: bool,
    /// Add U(-0.5, 0.5) seconds to every interval
    pub random_delay: bool,
    pub jitter_enabled: bool,
    /// Max pixel offset per axis when jitter is on
    pub jitter_range: i32,
    /// Seconds spent gliding the cursor to each click target
    pub move_duration: f64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            interval: 1.0,
            repetitions: 1,
            infinite: false,
            random_delay: false,
            jitter_enabled: false,
            jitter_range: 3,
            move_duration: 0.5,
        }
    }
}

impl PlaybackConfig {
    pub fn from_settings(settings: &AppSettings) -> Self {
        Self {
            interval: settings.default_interval,
            repetitions: settings.default_repetitions,
            move_duration: settings.mouse_move_duration,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.infinite && self.repetitions == 0 {
            return Err(Error::invalid_input("Repetitions must be at least 1"));
        }
        if !self.interval.is_finite() || self.interval < 0.0 {
            return Err(Error::invalid_input("Interval must be a non-negative number"));
        }
        if !self.move_duration.is_finite() || self.move_duration < 0.0 {
            return Err(Error::invalid_input(
                "Mouse move duration must be a non-negative number",
            ));
        }
        if self.jitter_range < 0 {
            return Err(Error::invalid_input("Jitter range cannot be negative"));
        }
        Ok(())
    }
}

/// Owns the running flag and the (single) worker thread
pub struct Player {
    driver: DriverFactory,
    events: Sender<UiEvent>,
    running: Arc<AtomicBool>,
    worker: Option<thread::JoinHandle<()>>,
    run_id: u64,
}

impl Player {
    pub fn new(driver: DriverFactory, events: Sender<UiEvent>) -> Self {
        Self {
            driver,
            events,
            running: Arc::new(AtomicBool::new(false)),
            worker: None,
            run_id: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Id of the most recently started run
    pub fn current_run(&self) -> u64 {
        self.run_id
    }

    /// Begin a run over `actions` without blocking. Returns the run id.
    pub fn start(&mut self, actions: Vec<Action>, config: PlaybackConfig) -> Result<u64> {
        if actions.is_empty() {
            return Err(Error::nothing_to_play());
        }
        config.validate()?;
        if self.is_running() {
            return Err(Error::already_running());
        }
        if let Some(worker) = self.worker.take() {
            if !worker.is_finished() {
                // stopped, but still finishing its current action
                self.worker = Some(worker);
                return Err(Error::already_running());
            }
            let _ = worker.join();
        }

        self.run_id += 1;
        self.running.store(true, Ordering::SeqCst);

        let job = Playback {
            run: self.run_id,
            actions,
            config,
            running: self.running.clone(),
            events: self.events.clone(),
        };
        let driver = self.driver.clone();
        let spawned = thread::Builder::new()
            .name(format!("playback-{}", self.run_id))
            .spawn(move || job.run(driver));

        match spawned {
            Ok(handle) => {
                self.worker = Some(handle);
                tracing::info!(run = self.run_id, "playback started");
                Ok(self.run_id)
            }
            Err(e) => {
                self.running.store(false, Ordering::SeqCst);
                Err(Error::new(
                    autoclicker_core::ErrorCode::Unknown,
                    format!("Failed to start playback: {}", e),
                ))
            }
        }
    }

    /// Clear the running flag. The worker exits at its next check.
    pub fn stop(&self) {
        if self.running.swap(false, Ordering::SeqCst) {
            tracing::info!(run = self.run_id, "playback stop requested");
        }
    }

    /// Block until the worker has exited
    pub fn wait(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        self.stop();
    }
}

struct Playback {
    run: u64,
    actions: Vec<Action>,
    config: PlaybackConfig,
    running: Arc<AtomicBool>,
    events: Sender<UiEvent>,
}

impl Playback {
    fn run(self, factory: DriverFactory) {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.perform(&factory)));
        let reason = match outcome {
            Ok(Ok(true)) => FinishReason::Completed,
            Ok(Ok(false)) => FinishReason::Stopped,
            Ok(Err(e)) => {
                tracing::error!(run = self.run, "playback failed: {}", e);
                FinishReason::Failed(e.message)
            }
            Err(_) => {
                tracing::error!(run = self.run, "playback worker panicked");
                FinishReason::Failed("Playback stopped unexpectedly".to_string())
            }
        };
        self.running.store(false, Ordering::SeqCst);
        tracing::info!(run = self.run, ?reason, "playback finished");
        self.post(PlaybackEvent::Finished(reason));
    }

    /// Returns `true` if every repetition ran, `false` if stopped early
    fn perform(&self, factory: &DriverFactory) -> Result<bool> {
        let mut driver = factory()?;
        let mut rng = rand::thread_rng();
        let total = if self.config.infinite {
            None
        } else {
            Some(self.config.repetitions as u64)
        };

        let mut rep: u64 = 0;
        while self.is_running() && total.map_or(true, |t| rep < t) {
            self.status(format!("Running repetition {}...", rep_label(rep, total)));

            for action in &self.actions {
                if !self.is_running() {
                    break;
                }
                if let Err(e) = self.execute(driver.as_mut(), action, &mut rng) {
                    tracing::warn!(action = %action.name, "{}", e);
                }
                thread::sleep(action_delay(&self.config, &mut rng));
            }

            if self.is_running() {
                self.status(format!("Finished repetition {}", rep_label(rep, total)));
            }
            rep += 1;
        }

        Ok(self.is_running())
    }

    fn execute<R: Rng + ?Sized>(
        &self,
        driver: &mut dyn InputDriver,
        action: &Action,
        rng: &mut R,
    ) -> Result<()> {
        match &action.kind {
            ActionKind::Click {
                x,
                y,
                click_type,
                hold_duration,
            } => {
                let (tx, ty) = if self.config.jitter_enabled {
                    jitter(*x, *y, self.config.jitter_range, rng)
                } else {
                    (*x, *y)
                };
                glide(driver, tx, ty, self.config.move_duration)?;
                self.click(driver, *click_type, *hold_duration)
            }
            ActionKind::Keystroke { key } => driver.press_key(key),
        }
    }

    fn click(&self, driver: &mut dyn InputDriver, ty: ClickType, hold: f64) -> Result<()> {
        match ty {
            ClickType::Left => driver.click(MouseButton::Left),
            ClickType::Right => driver.click(MouseButton::Right),
            ClickType::Double => driver.double_click(),
            ClickType::Hold => {
                let secs = match check_hold(hold)? {
                    s if s > 0.0 => s,
                    _ => DEFAULT_HOLD_SECS,
                };
                let held = Held::press(driver)?;
                thread::sleep(Duration::from_secs_f64(secs));
                held.release()
            }
            ClickType::HoldUntilStopped => {
                let held = Held::press(driver)?;
                while self.is_running() {
                    thread::sleep(HOLD_POLL);
                }
                held.release()
            }
        }
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn status(&self, text: String) {
        self.post(PlaybackEvent::Status(text));
    }

    fn post(&self, event: PlaybackEvent) {
        let _ = self.events.send(UiEvent::Playback {
            run: self.run,
            event,
        });
    }
}

/// Left button held down; released on drop if not released explicitly
struct Held<'a> {
    driver: Option<&'a mut dyn InputDriver>,
}

impl<'a> Held<'a> {
    fn press(driver: &'a mut dyn InputDriver) -> Result<Self> {
        driver.mouse_down()?;
        Ok(Self {
            driver: Some(driver),
        })
    }

    fn release(mut self) -> Result<()> {
        match self.driver.take() {
            Some(driver) => driver.mouse_up(),
            None => Ok(()),
        }
    }
}

impl Drop for Held<'_> {
    fn drop(&mut self) {
        if let Some(driver) = self.driver.take() {
            if let Err(e) = driver.mouse_up() {
                tracing::warn!("failed to release held button: {}", e);
            }
        }
    }
}

fn rep_label(rep: u64, total: Option<u64>) -> String {
    match total {
        Some(t) => format!("{} of {}", rep + 1, t),
        None => format!("{}", rep + 1),
    }
}

/// Number of glide samples for a move lasting `duration` seconds
pub fn move_steps(duration: f64) -> u32 {
    (duration * MOVE_STEPS_PER_SEC).max(MIN_MOVE_STEPS as f64) as u32
}

/// Target perturbed by up to `range` pixels on each axis
pub fn jitter<R: Rng + ?Sized>(x: i32, y: i32, range: i32, rng: &mut R) -> (i32, i32) {
    let r = range.max(0);
    (
        x.saturating_add(rng.gen_range(-r..=r)),
        y.saturating_add(rng.gen_range(-r..=r)),
    )
}

/// Pause after one action
pub fn action_delay<R: Rng + ?Sized>(config: &PlaybackConfig, rng: &mut R) -> Duration {
    let mut wait = config.interval;
    if config.random_delay {
        wait += rng.gen_range(-RANDOM_DELAY_SECS..=RANDOM_DELAY_SECS);
    }
    Duration::from_secs_f64(wait.max(MIN_DELAY_SECS))
}

/// Move the cursor from where it is to `(x, y)` in straight-line steps
pub fn glide(driver: &mut dyn InputDriver, x: i32, y: i32, duration: f64) -> Result<()> {
    let (cx, cy) = driver.cursor_position()?;
    let steps = move_steps(duration);
    let pause = Duration::from_secs_f64(duration.max(0.0) / steps as f64);

    for i in 1..=steps {
        let t = i as f64 / steps as f64;
        let nx = (cx as f64 + (x as f64 - cx as f64) * t) as i32;
        let ny = (cy as f64 + (y as f64 - cy as f64) * t) as i32;
        driver.move_cursor(nx, ny)?;
        thread::sleep(pause);
    }
    driver.move_cursor(x, y)
}
