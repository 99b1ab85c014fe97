//! Spark particles thrown off the cut line.
//!
//! Each spark lives for a fixed lifetime and drifts along a random vector
//! rolled at spawn time. Expiry is deadline based: a spark carries its own
//! removal instant and outlives whatever spawned it, so sparks emitted just
//! before a session stops still fade out on their own schedule. Sweeps run
//! wherever the field is already being touched, on animation ticks and on
//! view frames.

use std::time::{Duration, Instant};

use rand::Rng;

/// A single drifting particle
#[derive(Debug, Clone, Copy)]
pub struct Spark {
    x: f32,
    y: f32,
    drift_x: f32,
    drift_y: f32,
    born: Instant,
    expires: Instant,
}

impl Spark {
    /// Time since the spark appeared
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.born)
    }

    /// True once the removal deadline has passed
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires
    }

    /// Spawn position, before any drift
    pub fn origin(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    /// Position at `now`, moved along the drift vector over the lifetime
    pub fn drifted(&self, now: Instant) -> (f32, f32) {
        let lifetime = self.expires.saturating_duration_since(self.born);
        let t = if lifetime.is_zero() {
            1.0
        } else {
            (self.age(now).as_secs_f32() / lifetime.as_secs_f32()).min(1.0)
        };
        (self.x + self.drift_x * t, self.y + self.drift_y * t)
    }
}

/// A spark booked for a future instant, not yet visible
#[derive(Debug, Clone, Copy)]
struct PendingSpark {
    x: f32,
    y: f32,
    drift_x: f32,
    drift_y: f32,
    due: Instant,
}

/// All live and scheduled sparks in the scene
#[derive(Debug)]
pub struct SparkField {
    sparks: Vec<Spark>,
    pending: Vec<PendingSpark>,
    ttl: Duration,
    drift_range: f32,
}

impl SparkField {
    /// Create an empty field with the given lifetime and drift magnitude
    pub fn new(ttl: Duration, drift_range: f32) -> Self {
        Self {
            sparks: Vec::new(),
            pending: Vec::new(),
            ttl,
            drift_range,
        }
    }

    /// Spawn a spark at `(x, y)` immediately, expiring one lifetime from `now`
    pub fn spawn(&mut self, x: f32, y: f32, rng: &mut impl Rng, now: Instant) {
        let (drift_x, drift_y) = self.roll_drift(rng);
        self.sparks.push(Spark {
            x,
            y,
            drift_x,
            drift_y,
            born: now,
            expires: now + self.ttl,
        });
    }

    /// Book a spark to appear at `due`; its lifetime starts when it appears
    ///
    /// The drift vector is rolled here so scheduling order alone determines
    /// the random draws, not the timing of later sweeps.
    pub fn schedule(&mut self, x: f32, y: f32, due: Instant, rng: &mut impl Rng) {
        let (drift_x, drift_y) = self.roll_drift(rng);
        self.pending.push(PendingSpark {
            x,
            y,
            drift_x,
            drift_y,
            due,
        });
    }

    /// Promote due pending sparks and drop expired ones
    pub fn sweep(&mut self, now: Instant) {
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].due <= now {
                let p = self.pending.swap_remove(i);
                self.sparks.push(Spark {
                    x: p.x,
                    y: p.y,
                    drift_x: p.drift_x,
                    drift_y: p.drift_y,
                    born: now,
                    expires: now + self.ttl,
                });
            } else {
                i += 1;
            }
        }
        self.sparks.retain(|s| !s.is_expired(now));
    }

    /// Currently visible sparks
    pub fn sparks(&self) -> &[Spark] {
        &self.sparks
    }

    /// Number of visible sparks
    pub fn len(&self) -> usize {
        self.sparks.len()
    }

    /// True when no sparks are visible
    pub fn is_empty(&self) -> bool {
        self.sparks.is_empty()
    }

    /// Number of booked sparks not yet visible
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    fn roll_drift(&self, rng: &mut impl Rng) -> (f32, f32) {
        if self.drift_range <= 0.0 {
            return (0.0, 0.0);
        }
        (
            rng.gen_range(-self.drift_range..self.drift_range),
            rng.gen_range(-self.drift_range..self.drift_range),
        )
    }
}
