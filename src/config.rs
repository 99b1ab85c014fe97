//! Session configuration.
//!
//! Every tunable of the engine lives here with its stock value: tick timing,
//! progress geometry, spark behavior, and the two tone presets. A JSON file
//! can override any subset of fields; everything else falls back to the
//! defaults below.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{GlasscutError, Result};
use crate::synth::FilterMode;

/// Tick loop timing and per-tick decision parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Tick period in milliseconds
    pub tick_ms: u64,
    /// Progress units added per tick
    pub progress_step: u32,
    /// Progress wraps to 0 at this value
    pub wrap_threshold: u32,
    /// A cut tone fires when progress is a positive multiple of this
    pub tone_phase: u32,
    /// Per-tick probability of a spark once progress > 0
    pub spark_chance: f64,
    /// Per-tick probability of an ambient tone
    pub ambient_chance: f64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            tick_ms: 50,
            progress_step: 2,
            wrap_threshold: 160,
            tone_phase: 20,
            spark_chance: 0.3,
            ambient_chance: 0.05,
        }
    }
}

impl AnimationConfig {
    /// Tick period as a Duration
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Validate timing and probability ranges
    pub fn validate(&self) -> Result<()> {
        if self.tick_ms == 0 {
            return Err(GlasscutError::InvalidParameter {
                param: "tick_ms".to_string(),
                value: self.tick_ms.to_string(),
                expected: "> 0".to_string(),
            });
        }

        if self.progress_step == 0 {
            return Err(GlasscutError::InvalidParameter {
                param: "progress_step".to_string(),
                value: self.progress_step.to_string(),
                expected: "> 0".to_string(),
            });
        }

        if self.wrap_threshold == 0 {
            return Err(GlasscutError::InvalidParameter {
                param: "wrap_threshold".to_string(),
                value: self.wrap_threshold.to_string(),
                expected: "> 0".to_string(),
            });
        }

        if self.tone_phase == 0 {
            return Err(GlasscutError::InvalidParameter {
                param: "tone_phase".to_string(),
                value: self.tone_phase.to_string(),
                expected: "> 0".to_string(),
            });
        }

        for (name, chance) in [
            ("spark_chance", self.spark_chance),
            ("ambient_chance", self.ambient_chance),
        ] {
            if !(0.0..=1.0).contains(&chance) {
                return Err(GlasscutError::InvalidParameter {
                    param: name.to_string(),
                    value: chance.to_string(),
                    expected: "0.0-1.0".to_string(),
                });
            }
        }

        Ok(())
    }
}

/// Startup sparkle flourish
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IntroConfig {
    /// Delay before the first intro spark in milliseconds
    pub delay_ms: u64,
    /// Number of intro sparks
    pub count: u32,
    /// Gap between intro sparks in milliseconds
    pub stagger_ms: u64,
    /// Spark x position: base plus uniform jitter up to the spread
    pub x_base: f32,
    pub x_spread: f32,
    /// Spark y position: base plus uniform jitter up to the spread
    pub y_base: f32,
    pub y_spread: f32,
}

impl Default for IntroConfig {
    fn default() -> Self {
        Self {
            delay_ms: 500,
            count: 5,
            stagger_ms: 200,
            x_base: 150.0,
            x_spread: 100.0,
            y_base: 100.0,
            y_spread: 50.0,
        }
    }
}

/// Scene geometry and spark behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Cut line extent at progress 0
    pub base_extent: f32,
    /// X position where the cut meets the glass, origin of tick sparks
    pub kerf_x: f32,
    /// Uniform jitter added to a tick spark's x position
    pub spark_jitter: f32,
    /// Drift vector range per axis: uniform in [-range, +range]
    pub drift_range: f32,
    /// Spark lifetime in milliseconds
    pub spark_ttl_ms: u64,
    /// Startup flourish
    pub intro: IntroConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            base_extent: 40.0,
            kerf_x: 145.0,
            spark_jitter: 10.0,
            drift_range: 25.0,
            spark_ttl_ms: 1000,
            intro: IntroConfig::default(),
        }
    }
}

impl SceneConfig {
    /// Spark lifetime as a Duration
    pub fn spark_ttl(&self) -> Duration {
        Duration::from_millis(self.spark_ttl_ms)
    }

    /// Validate geometry ranges
    pub fn validate(&self) -> Result<()> {
        if self.spark_ttl_ms == 0 {
            return Err(GlasscutError::InvalidParameter {
                param: "spark_ttl_ms".to_string(),
                value: self.spark_ttl_ms.to_string(),
                expected: "> 0".to_string(),
            });
        }

        if self.drift_range < 0.0 || self.spark_jitter < 0.0 {
            return Err(GlasscutError::InvalidParameter {
                param: "drift_range/spark_jitter".to_string(),
                value: format!("{}/{}", self.drift_range, self.spark_jitter),
                expected: ">= 0".to_string(),
            });
        }

        Ok(())
    }
}

/// One tone preset: frequency band, filter, and envelope shape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TonePreset {
    /// Lower bound of the random frequency band in Hz
    pub freq_lo: f32,
    /// Upper bound of the random frequency band in Hz
    pub freq_hi: f32,
    /// Filter slope applied to the oscillator
    pub filter: FilterMode,
    /// Filter cutoff in Hz
    pub cutoff_hz: f32,
    /// Envelope attack in milliseconds; 0 starts at the peak
    pub attack_ms: f32,
    /// Envelope duration in milliseconds
    pub duration_ms: f32,
    /// Peak level as a fraction of full volume
    pub level: f32,
}

impl TonePreset {
    /// The short bright cutting tone
    pub fn cut() -> Self {
        Self {
            freq_lo: 2000.0,
            freq_hi: 3000.0,
            filter: FilterMode::HighPass,
            cutoff_hz: 1500.0,
            attack_ms: 10.0,
            duration_ms: 300.0,
            level: 0.1,
        }
    }

    /// The long soft ambient tone
    pub fn ambient() -> Self {
        Self {
            freq_lo: 100.0,
            freq_hi: 150.0,
            filter: FilterMode::LowPass,
            cutoff_hz: 300.0,
            attack_ms: 0.0,
            duration_ms: 2000.0,
            level: 0.05,
        }
    }

    /// Attack length in seconds
    pub fn attack_secs(&self) -> f32 {
        self.attack_ms / 1000.0
    }

    /// Envelope duration in seconds
    pub fn duration_secs(&self) -> f32 {
        self.duration_ms / 1000.0
    }

    /// Validate band, cutoff, and envelope ranges
    pub fn validate(&self) -> Result<()> {
        if self.freq_lo < 20.0 || self.freq_hi > 20000.0 || self.freq_lo >= self.freq_hi {
            return Err(GlasscutError::InvalidParameter {
                param: "freq band".to_string(),
                value: format!("{}-{}", self.freq_lo, self.freq_hi),
                expected: "20-20000 Hz, lo < hi".to_string(),
            });
        }

        if self.cutoff_hz < 20.0 || self.cutoff_hz > 20000.0 {
            return Err(GlasscutError::InvalidParameter {
                param: "cutoff_hz".to_string(),
                value: self.cutoff_hz.to_string(),
                expected: "20-20000 Hz".to_string(),
            });
        }

        if self.duration_ms <= 0.0 {
            return Err(GlasscutError::InvalidParameter {
                param: "duration_ms".to_string(),
                value: self.duration_ms.to_string(),
                expected: "> 0".to_string(),
            });
        }

        if self.attack_ms < 0.0 || self.attack_ms > self.duration_ms {
            return Err(GlasscutError::InvalidParameter {
                param: "attack_ms".to_string(),
                value: self.attack_ms.to_string(),
                expected: "0 to duration_ms".to_string(),
            });
        }

        if !(0.0..=1.0).contains(&self.level) {
            return Err(GlasscutError::InvalidParameter {
                param: "level".to_string(),
                value: self.level.to_string(),
                expected: "0.0-1.0".to_string(),
            });
        }

        Ok(())
    }
}

/// Preset fields as they appear in a config file, each optional
///
/// Gaps in an override fill from that preset's own stock values.
#[derive(Deserialize)]
struct TonePresetPatch {
    freq_lo: Option<f32>,
    freq_hi: Option<f32>,
    filter: Option<FilterMode>,
    cutoff_hz: Option<f32>,
    attack_ms: Option<f32>,
    duration_ms: Option<f32>,
    level: Option<f32>,
}

impl TonePresetPatch {
    fn apply(self, base: TonePreset) -> TonePreset {
        TonePreset {
            freq_lo: self.freq_lo.unwrap_or(base.freq_lo),
            freq_hi: self.freq_hi.unwrap_or(base.freq_hi),
            filter: self.filter.unwrap_or(base.filter),
            cutoff_hz: self.cutoff_hz.unwrap_or(base.cutoff_hz),
            attack_ms: self.attack_ms.unwrap_or(base.attack_ms),
            duration_ms: self.duration_ms.unwrap_or(base.duration_ms),
            level: self.level.unwrap_or(base.level),
        }
    }
}

fn deserialize_cut_tone<'de, D>(deserializer: D) -> std::result::Result<TonePreset, D::Error>
where
    D: serde::Deserializer<'de>,
{
    TonePresetPatch::deserialize(deserializer).map(|patch| patch.apply(TonePreset::cut()))
}

fn deserialize_ambient_tone<'de, D>(deserializer: D) -> std::result::Result<TonePreset, D::Error>
where
    D: serde::Deserializer<'de>,
{
    TonePresetPatch::deserialize(deserializer).map(|patch| patch.apply(TonePreset::ambient()))
}

/// Complete engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub animation: AnimationConfig,
    pub scene: SceneConfig,
    #[serde(deserialize_with = "deserialize_cut_tone")]
    pub cut_tone: TonePreset,
    #[serde(deserialize_with = "deserialize_ambient_tone")]
    pub ambient_tone: TonePreset,
    /// Initial volume level (0-100)
    pub volume: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            animation: AnimationConfig::default(),
            scene: SceneConfig::default(),
            cut_tone: TonePreset::cut(),
            ambient_tone: TonePreset::ambient(),
            volume: 50,
        }
    }
}

impl Config {
    /// Load a configuration from a JSON file and validate it
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every section
    pub fn validate(&self) -> Result<()> {
        self.animation.validate()?;
        self.scene.validate()?;
        self.cut_tone.validate()?;
        self.ambient_tone.validate()?;

        if self.volume > 100 {
            return Err(GlasscutError::InvalidParameter {
                param: "volume".to_string(),
                value: self.volume.to_string(),
                expected: "0-100".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_values_match_stock_session() {
        let config = Config::default();
        assert_eq!(config.animation.tick_ms, 50);
        assert_eq!(config.animation.progress_step, 2);
        assert_eq!(config.animation.wrap_threshold, 160);
        assert_eq!(config.animation.tone_phase, 20);
        assert_eq!(config.scene.base_extent, 40.0);
        assert_eq!(config.scene.spark_ttl_ms, 1000);
        assert_eq!(config.volume, 50);
    }

    #[test]
    fn test_preset_bands() {
        let cut = TonePreset::cut();
        assert_eq!(cut.freq_lo, 2000.0);
        assert_eq!(cut.freq_hi, 3000.0);
        assert_eq!(cut.filter, FilterMode::HighPass);

        let ambient = TonePreset::ambient();
        assert_eq!(ambient.freq_lo, 100.0);
        assert_eq!(ambient.freq_hi, 150.0);
        assert_eq!(ambient.filter, FilterMode::LowPass);
        assert_eq!(ambient.attack_ms, 0.0);
    }

    #[test_case(0, 2, 160, 20 ; "zero tick")]
    #[test_case(50, 0, 160, 20 ; "zero step")]
    #[test_case(50, 2, 0, 20 ; "zero wrap")]
    #[test_case(50, 2, 160, 0 ; "zero phase")]
    fn test_animation_rejects_zero_fields(tick: u64, step: u32, wrap: u32, phase: u32) {
        let animation = AnimationConfig {
            tick_ms: tick,
            progress_step: step,
            wrap_threshold: wrap,
            tone_phase: phase,
            ..AnimationConfig::default()
        };
        assert!(animation.validate().is_err());
    }

    #[test]
    fn test_chance_out_of_range_rejected() {
        let animation = AnimationConfig {
            spark_chance: 1.5,
            ..AnimationConfig::default()
        };
        assert!(animation.validate().is_err());
    }

    #[test]
    fn test_preset_rejects_inverted_band() {
        let preset = TonePreset {
            freq_lo: 3000.0,
            freq_hi: 2000.0,
            ..TonePreset::cut()
        };
        assert!(preset.validate().is_err());
    }

    #[test]
    fn test_preset_rejects_attack_longer_than_duration() {
        let preset = TonePreset {
            attack_ms: 500.0,
            duration_ms: 300.0,
            ..TonePreset::cut()
        };
        assert!(preset.validate().is_err());
    }

    #[test]
    fn test_volume_over_100_rejected() {
        let config = Config {
            volume: 150,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let json = r#"{ "animation": { "tick_ms": 25 }, "volume": 80 }"#;
        let config: Config = serde_json::from_str(json).unwrap();

        assert_eq!(config.animation.tick_ms, 25);
        assert_eq!(config.volume, 80);
        // Untouched fields keep their defaults
        assert_eq!(config.animation.wrap_threshold, 160);
        assert_eq!(config.cut_tone.freq_lo, 2000.0);
    }

    #[test]
    fn test_partial_cut_preset_keeps_stock_fields() {
        let json = r#"{ "cut_tone": { "freq_lo": 2500.0 } }"#;
        let config: Config = serde_json::from_str(json).unwrap();

        assert_eq!(config.cut_tone.freq_lo, 2500.0);
        // The rest of the preset keeps its stock values
        assert_eq!(config.cut_tone.freq_hi, 3000.0);
        assert_eq!(config.cut_tone.filter, FilterMode::HighPass);
        assert_eq!(config.cut_tone.level, 0.1);
        assert_eq!(config.ambient_tone.freq_lo, 100.0);
    }

    #[test]
    fn test_partial_ambient_preset_fills_from_ambient_stock() {
        let json = r#"{ "ambient_tone": { "duration_ms": 1500.0 } }"#;
        let config: Config = serde_json::from_str(json).unwrap();

        assert_eq!(config.ambient_tone.duration_ms, 1500.0);
        // Gaps fill from the ambient preset, not the cut preset
        assert_eq!(config.ambient_tone.freq_hi, 150.0);
        assert_eq!(config.ambient_tone.filter, FilterMode::LowPass);
        assert_eq!(config.ambient_tone.attack_ms, 0.0);
    }

    #[test]
    fn test_merged_preset_is_still_validated() {
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("band.json");
        let mut file = fs::File::create(&path).unwrap();
        write!(file, r#"{{ "cut_tone": {{ "freq_lo": 3500.0 }} }}"#).unwrap();

        let result = Config::load(&path);
        assert!(matches!(
            result,
            Err(GlasscutError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: Config = serde_json::from_str(&json).unwrap();

        assert_eq!(back.animation.tick_ms, config.animation.tick_ms);
        assert_eq!(back.scene.kerf_x, config.scene.kerf_x);
        assert_eq!(back.ambient_tone.duration_ms, config.ambient_tone.duration_ms);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = Config::load(Path::new("/nonexistent/glasscut.json"));
        assert!(matches!(result, Err(GlasscutError::Io(_))));
    }

    #[test]
    fn test_load_from_file() {
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut file = fs::File::create(&path).unwrap();
        write!(file, r#"{{ "animation": {{ "spark_chance": 1.0 }} }}"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.animation.spark_chance, 1.0);
        assert_eq!(config.animation.tick_ms, 50);
    }

    #[test]
    fn test_load_rejects_invalid_config() {
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        let mut file = fs::File::create(&path).unwrap();
        write!(file, r#"{{ "volume": 500 }}"#).unwrap();

        let result = Config::load(&path);
        assert!(matches!(
            result,
            Err(GlasscutError::InvalidParameter { .. })
        ));
    }
}
