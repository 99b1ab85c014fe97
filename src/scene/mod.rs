//! Visual scene model.
//!
//! The scene is plain state: the cut line extent, the spark field, and which
//! control the user should see. The session mutates it under a lock on each
//! tick; views read it when they draw. Nothing here knows about terminals or
//! audio.

mod sparks;

pub use sparks::{Spark, SparkField};

use crate::config::SceneConfig;

/// Which session control is currently offered to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlButton {
    /// Session stopped, offer start
    #[default]
    Start,
    /// Session running, offer stop
    Stop,
}

/// Everything a view needs to draw one frame
#[derive(Debug)]
pub struct Scene {
    cut_extent: f32,
    base_extent: f32,
    kerf_x: f32,
    cutting: bool,
    visible_control: ControlButton,
    sparks: SparkField,
}

impl Scene {
    /// Create a scene at rest from the geometry configuration
    pub fn new(config: &SceneConfig) -> Self {
        Self {
            cut_extent: config.base_extent,
            base_extent: config.base_extent,
            kerf_x: config.kerf_x,
            cutting: false,
            visible_control: ControlButton::Start,
            sparks: SparkField::new(config.spark_ttl(), config.drift_range),
        }
    }

    /// Current length of the cut line
    pub fn cut_extent(&self) -> f32 {
        self.cut_extent
    }

    /// Move the cut line to a new extent
    pub fn set_cut_extent(&mut self, extent: f32) {
        self.cut_extent = extent;
    }

    /// Extent the cut line rests at when no session is running
    pub fn base_extent(&self) -> f32 {
        self.base_extent
    }

    /// X position of the cut line
    pub fn kerf_x(&self) -> f32 {
        self.kerf_x
    }

    /// Pull the cut line back to its resting extent
    pub fn reset_cut(&mut self) {
        self.cut_extent = self.base_extent;
    }

    /// True while a session is running
    pub fn is_cutting(&self) -> bool {
        self.cutting
    }

    /// Flip the running flag and swap the offered control to match
    pub fn set_cutting(&mut self, active: bool) {
        self.cutting = active;
        self.visible_control = if active {
            ControlButton::Stop
        } else {
            ControlButton::Start
        };
    }

    /// Control the user should currently see
    pub fn visible_control(&self) -> ControlButton {
        self.visible_control
    }

    /// Spark field, read-only
    pub fn sparks(&self) -> &SparkField {
        &self.sparks
    }

    /// Spark field for spawning and sweeping
    pub fn sparks_mut(&mut self) -> &mut SparkField {
        &mut self.sparks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_scene_is_at_rest() {
        let scene = Scene::new(&SceneConfig::default());

        assert_eq!(scene.cut_extent(), 40.0);
        assert!(!scene.is_cutting());
        assert_eq!(scene.visible_control(), ControlButton::Start);
        assert!(scene.sparks().is_empty());
    }

    #[test]
    fn test_set_cutting_swaps_control() {
        let mut scene = Scene::new(&SceneConfig::default());

        scene.set_cutting(true);
        assert!(scene.is_cutting());
        assert_eq!(scene.visible_control(), ControlButton::Stop);

        scene.set_cutting(false);
        assert!(!scene.is_cutting());
        assert_eq!(scene.visible_control(), ControlButton::Start);
    }

    #[test]
    fn test_reset_cut_returns_to_base() {
        let mut scene = Scene::new(&SceneConfig::default());

        scene.set_cut_extent(120.0);
        assert_eq!(scene.cut_extent(), 120.0);

        scene.reset_cut();
        assert_eq!(scene.cut_extent(), scene.base_extent());
    }
}
