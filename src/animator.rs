//! Cut progress animation.
//!
//! One `CutAnimator` owns the progress counter and turns each tick into a
//! `TickUpdate`: the new cut extent, an optional spark spawn, and whether the
//! cutting tone should fire. It draws randomness only from the RNG handed in,
//! so a seeded run replays exactly.

use rand::Rng;

use crate::config::{AnimationConfig, SceneConfig};

/// Everything one tick decided
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickUpdate {
    /// Progress counter after the tick
    pub progress: u32,
    /// Cut line extent after the tick
    pub extent: f32,
    /// Spark spawn position, if this tick produced one
    pub spark: Option<(f32, f32)>,
    /// True when the cutting tone should fire
    pub cut_tone: bool,
}

/// Advances the cut and decides per-tick side effects
///
/// # Example
///
/// ```
/// use glasscut::animator::CutAnimator;
/// use glasscut::config::{AnimationConfig, SceneConfig};
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
///
/// let mut animator = CutAnimator::new(&AnimationConfig::default(), &SceneConfig::default());
/// let mut rng = StdRng::seed_from_u64(0);
///
/// let update = animator.tick(&mut rng);
/// assert_eq!(update.progress, 2);
/// assert_eq!(update.extent, 42.0);
/// ```
#[derive(Debug)]
pub struct CutAnimator {
    progress: u32,
    step: u32,
    wrap: u32,
    tone_phase: u32,
    spark_chance: f64,
    base_extent: f32,
    kerf_x: f32,
    spark_jitter: f32,
}

impl CutAnimator {
    /// Create an animator at progress 0
    pub fn new(animation: &AnimationConfig, scene: &SceneConfig) -> Self {
        Self {
            progress: 0,
            step: animation.progress_step,
            wrap: animation.wrap_threshold,
            tone_phase: animation.tone_phase,
            spark_chance: animation.spark_chance.clamp(0.0, 1.0),
            base_extent: scene.base_extent,
            kerf_x: scene.kerf_x,
            spark_jitter: scene.spark_jitter,
        }
    }

    /// Current progress counter
    pub fn progress(&self) -> u32 {
        self.progress
    }

    /// Cut line extent for the current progress
    pub fn extent(&self) -> f32 {
        self.base_extent + self.progress as f32
    }

    /// Advance one tick
    ///
    /// Progress wraps modulo the threshold, so it never reaches the threshold
    /// itself. The wrap tick lands on progress 0 and produces neither a spark
    /// nor a tone.
    pub fn tick(&mut self, rng: &mut impl Rng) -> TickUpdate {
        self.progress = (self.progress + self.step) % self.wrap;

        let spark = if self.progress > 0 && rng.gen_bool(self.spark_chance) {
            let jitter = if self.spark_jitter > 0.0 {
                rng.gen_range(0.0..self.spark_jitter)
            } else {
                0.0
            };
            let y = self.base_extent + self.progress as f32;
            Some((self.kerf_x + jitter, y))
        } else {
            None
        };

        let cut_tone = self.progress > 0 && self.progress % self.tone_phase == 0;

        TickUpdate {
            progress: self.progress,
            extent: self.extent(),
            spark,
            cut_tone,
        }
    }

    /// Return the cut to progress 0
    pub fn reset(&mut self) {
        self.progress = 0;
    }
}
