//! Session control.
//!
//! A `SessionController` wires the animator, scene, synthesizer, and
//! scheduler together and exposes the two-state lifecycle: stopped or
//! running. Start installs the tick callback; stop cancels it, resets the
//! cut, and leaves any live sparks to expire on their own deadlines.
//!
//! All per-tick work happens in `SessionShared::run_tick` on whatever thread
//! the scheduler uses, so every piece it touches sits behind a lock.

use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::animator::CutAnimator;
use crate::config::{Config, IntroConfig};
use crate::error::Result;
use crate::scene::Scene;
use crate::scheduler::Scheduler;
use crate::synth::{ToneSynthesizer, VolumeControl};

/// Lifecycle state of a cutting session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No ticks running, progress at 0
    #[default]
    Stopped,
    /// Tick loop active
    Running,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Stopped => write!(f, "stopped"),
            SessionState::Running => write!(f, "running"),
        }
    }
}

/// State the tick callback works on
struct SessionShared {
    scene: Arc<Mutex<Scene>>,
    animator: Mutex<CutAnimator>,
    rng: Mutex<StdRng>,
    synth: Arc<ToneSynthesizer>,
    ambient_chance: f64,
}

impl SessionShared {
    /// One animation tick: advance the cut, touch the scene, fire tones
    fn run_tick(&self) {
        let now = Instant::now();
        let Ok(mut rng) = self.rng.lock() else {
            return;
        };

        let update = {
            let Ok(mut animator) = self.animator.lock() else {
                return;
            };
            animator.tick(&mut *rng)
        };

        if let Ok(mut scene) = self.scene.lock() {
            scene.set_cut_extent(update.extent);
            if let Some((x, y)) = update.spark {
                scene.sparks_mut().spawn(x, y, &mut *rng, now);
            }
            scene.sparks_mut().sweep(now);
        }

        if update.cut_tone {
            self.synth.play_cut_tone(&mut *rng);
        }
        if rng.gen_bool(self.ambient_chance) {
            self.synth.play_ambient_tone(&mut *rng);
        }
    }
}

/// Owns one cutting session end to end
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use glasscut::config::Config;
/// use glasscut::scheduler::ThreadScheduler;
/// use glasscut::session::{SessionController, SessionState};
///
/// let controller = SessionController::new(Config::default(), Arc::new(ThreadScheduler::new()));
/// assert_eq!(controller.state(), SessionState::Stopped);
/// ```
pub struct SessionController {
    state: SessionState,
    scheduler: Arc<dyn Scheduler>,
    shared: Arc<SessionShared>,
    synth: Arc<ToneSynthesizer>,
    volume: Arc<VolumeControl>,
    tick_period: Duration,
    intro: IntroConfig,
}

impl SessionController {
    /// Create a stopped session seeded from OS entropy
    pub fn new(config: Config, scheduler: Arc<dyn Scheduler>) -> Self {
        Self::with_rng(config, scheduler, StdRng::from_entropy())
    }

    /// Create a stopped session with an explicit RNG
    ///
    /// Two sessions built from the same configuration and seed make the
    /// same per-tick decisions.
    pub fn with_rng(config: Config, scheduler: Arc<dyn Scheduler>, rng: StdRng) -> Self {
        let volume = Arc::new(VolumeControl::new(config.volume));
        let synth = Arc::new(ToneSynthesizer::new(
            config.cut_tone.clone(),
            config.ambient_tone.clone(),
            volume.clone(),
        ));
        let shared = Arc::new(SessionShared {
            scene: Arc::new(Mutex::new(Scene::new(&config.scene))),
            animator: Mutex::new(CutAnimator::new(&config.animation, &config.scene)),
            rng: Mutex::new(rng),
            synth: synth.clone(),
            ambient_chance: config.animation.ambient_chance.clamp(0.0, 1.0),
        });

        Self {
            state: SessionState::Stopped,
            scheduler,
            shared,
            synth,
            volume,
            tick_period: config.animation.tick_period(),
            intro: config.scene.intro.clone(),
        }
    }

    /// Begin cutting; a no-op while already running
    pub fn start(&mut self) -> Result<()> {
        if self.state == SessionState::Running {
            debug!("Start ignored, session already running");
            return Ok(());
        }

        self.synth.ensure_output();

        let shared = self.shared.clone();
        self.scheduler
            .start(self.tick_period, Box::new(move || shared.run_tick()))?;

        self.state = SessionState::Running;
        if let Ok(mut scene) = self.shared.scene.lock() {
            scene.set_cutting(true);
        }
        debug!("Session started");
        Ok(())
    }

    /// Stop cutting and reset progress; a no-op while already stopped
    ///
    /// The scheduler is cancelled first and cancellation joins the tick
    /// worker, so no tick lands after this returns. Sparks already in the
    /// scene keep their expiry deadlines.
    pub fn stop(&mut self) {
        if self.state == SessionState::Stopped {
            debug!("Stop ignored, session already stopped");
            return;
        }

        self.scheduler.cancel();
        self.state = SessionState::Stopped;

        if let Ok(mut animator) = self.shared.animator.lock() {
            animator.reset();
        }
        if let Ok(mut scene) = self.shared.scene.lock() {
            scene.set_cutting(false);
            scene.reset_cut();
        }
        debug!("Session stopped, progress reset");
    }

    /// Start when stopped, stop when running
    pub fn toggle(&mut self) -> Result<()> {
        match self.state {
            SessionState::Stopped => self.start(),
            SessionState::Running => {
                self.stop();
                Ok(())
            }
        }
    }

    /// Book the startup flourish: a handful of staggered sparks
    ///
    /// The sparks appear over the next couple of seconds as sweeps promote
    /// them, whether or not a session ever starts.
    pub fn schedule_intro(&self, now: Instant) {
        let Ok(mut rng) = self.shared.rng.lock() else {
            return;
        };
        let Ok(mut scene) = self.shared.scene.lock() else {
            return;
        };

        let first = now + Duration::from_millis(self.intro.delay_ms);
        for i in 0..self.intro.count {
            let due = first + Duration::from_millis(self.intro.stagger_ms) * i;
            let x = self.intro.x_base + roll_jitter(&mut rng, self.intro.x_spread);
            let y = self.intro.y_base + roll_jitter(&mut rng, self.intro.y_spread);
            scene.sparks_mut().schedule(x, y, due, &mut *rng);
        }
        debug!("Scheduled {} intro sparks", self.intro.count);
    }

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// True while the tick loop is installed
    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    /// Current progress counter
    pub fn progress(&self) -> u32 {
        self.shared
            .animator
            .lock()
            .map(|animator| animator.progress())
            .unwrap_or(0)
    }

    /// Handle to the scene for views
    pub fn scene(&self) -> Arc<Mutex<Scene>> {
        self.shared.scene.clone()
    }

    /// Handle to the shared volume control
    pub fn volume(&self) -> Arc<VolumeControl> {
        self.volume.clone()
    }

    /// The synthesizer, mostly for its tone counters
    pub fn synth(&self) -> &ToneSynthesizer {
        &self.synth
    }

    /// Period the scheduler is asked for
    pub fn tick_period(&self) -> Duration {
        self.tick_period
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        self.scheduler.cancel();
    }
}

fn roll_jitter(rng: &mut StdRng, spread: f32) -> f32 {
    if spread > 0.0 {
        rng.gen_range(0.0..spread)
    } else {
        0.0
    }
}
