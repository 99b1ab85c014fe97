//! Glasscut - Procedural Glass Cutting Ambience
//!
//! Glasscut loops a decorative glass cutting animation and scores it with
//! procedurally synthesized sound:
//! 1. Animation - a periodic tick advances the cut line, throws off spark
//!    particles, and decides when tones fire
//! 2. Synthesis - disposable voices (sine oscillator, biquad filter,
//!    envelope) built per tone and mixed into a live output or an offline
//!    buffer
//!
//! # Architecture
//!
//! A `SessionController` owns the stopped/running lifecycle. Ticks come from
//! a pluggable `Scheduler`, mutate the shared `Scene`, and request tones
//! from the `ToneSynthesizer`. Views only read the scene: the terminal front
//! end draws it live, and the offline renderer replays the tick loop into a
//! WAV file.

pub mod animator;
pub mod cli;
pub mod config;
pub mod console;
pub mod error;
pub mod render;
pub mod scene;
pub mod scheduler;
pub mod session;
pub mod synth;

pub use error::{GlasscutError, Result};
pub use session::{SessionController, SessionState};
