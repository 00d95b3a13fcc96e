//! Game configuration

use force_engine::config::{AssetConfig, Config, EngineConfig};
use serde::{Deserialize, Serialize};

/// Game configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Engine settings
    pub engine: EngineConfig,

    /// Gameplay settings
    pub gameplay: GameplayConfig,

    /// Headless run settings
    pub run: RunConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        let assets = AssetConfig {
            assets_dir: concat!(env!("CARGO_MANIFEST_DIR"), "/assets").to_string(),
            default_vertex_shader: "shaders/lit.vs".to_string(),
            default_fragment_shader: "shaders/lit.fs".to_string(),
        };
        Self {
            engine: EngineConfig::new().with_fixed_time_step(1.0 / 60.0).with_assets(assets),
            gameplay: GameplayConfig::default(),
            run: RunConfig::default(),
        }
    }
}

impl Config for GameConfig {}

/// Gameplay configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplayConfig {
    /// Seconds between pipe pairs
    pub spawn_interval: f32,

    /// X coordinate new pipes appear at
    pub spawn_x: f32,

    /// Vertical opening between a pipe pair
    pub gap_size: f32,

    /// Lowest gap center
    pub gap_center_min: f32,

    /// Highest gap center
    pub gap_center_max: f32,

    /// Leftward pipe speed in units per second
    pub pipe_speed: f32,

    /// Full pipe size
    pub pipe_size: [f32; 3],

    /// Material file for spawned pipes
    pub pipe_material: String,

    /// The round resets when the player drops below this height
    pub floor_y: f32,

    /// Where the player restarts
    pub player_start: [f32; 3],

    /// Seed for gap placement; random when absent
    pub seed: Option<u64>,
}

impl Default for GameplayConfig {
    fn default() -> Self {
        Self {
            spawn_interval: 1.5,
            spawn_x: 10.0,
            gap_size: 3.5,
            gap_center_min: -1.5,
            gap_center_max: 1.5,
            pipe_speed: 3.0,
            pipe_size: [1.0, 10.0, 1.0],
            pipe_material: "materials/pipe.mat".to_string(),
            floor_y: -5.0,
            player_start: [-2.0, 0.0, 0.0],
            seed: None,
        }
    }
}

/// Headless run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Aggregate-model file loaded before the scene
    pub models_file: String,

    /// Scene file
    pub scene_file: String,

    /// Frames to simulate
    pub max_frames: u64,

    /// The flap key is pressed for one frame every this many frames
    pub flap_every: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            models_file: "models.txt".to_string(),
            scene_file: "flappy.scene".to_string(),
            max_frames: 1800,
            flap_every: 52,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = GameConfig::default();
        assert!(config.engine.validate().is_ok());
        assert!(config.gameplay.gap_center_min <= config.gameplay.gap_center_max);
        assert!(config.engine.assets.assets_dir.ends_with("/assets"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flappy.toml");
        std::fs::write(&path, "[gameplay]\nspawn_interval = 3.0\nseed = 7\n").unwrap();

        let config = GameConfig::load_from_file(&path).unwrap();
        assert_eq!(config.gameplay.spawn_interval, 3.0);
        assert_eq!(config.gameplay.seed, Some(7));
        assert_eq!(config.gameplay.gap_size, 3.5);
        assert_eq!(config.run, RunConfig::default());
    }
}
