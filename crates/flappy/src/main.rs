//! Flappy - a flap-and-dodge game on force_engine
//!
//! Runs headless: the scene is simulated with a scripted flap key and drawn
//! into a recording backend.

use force_engine::foundation::logging;
use force_engine::prelude::*;

mod components;
mod config;

use components::GameManagerComponent;
use config::{GameConfig, RunConfig};

/// Default configuration file, looked up in the working directory
const CONFIG_FILE: &str = "flappy.toml";

/// Totals of a headless session
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Session {
    load_warnings: usize,
    frames: u64,
    draws: usize,
    pipes_spawned: u32,
    resets: u32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args().nth(1).unwrap_or_else(|| CONFIG_FILE.to_string());
    let config = GameConfig::load_or_default(&config_path);
    logging::init_with_level(&config.engine.log_level);

    log::info!("Starting Flappy");
    let session = play(&config)?;

    if session.load_warnings > 0 {
        log::warn!("Loading finished with {} warnings", session.load_warnings);
    }
    log::info!(
        "Simulated {} frames: {} draws, {} pipes spawned, {} resets",
        session.frames,
        session.draws,
        session.pipes_spawned,
        session.resets
    );
    Ok(())
}

/// Load the game and simulate `config.run.max_frames` frames
fn play(config: &GameConfig) -> Result<Session, EngineError> {
    let mut registry = ComponentRegistry::with_builtin();
    components::register(&mut registry, &config.gameplay);

    let mut engine = Engine::new(config.engine.clone(), registry)?;
    let mut backend = RecordingBackend::new();
    let input = KeyboardState::new();

    let models = engine.load_models(&config.run.models_file, &mut backend);
    let scene = engine.load_scene(&config.run.scene_file, &mut backend, &input);

    let mut session = simulate(&mut engine, &mut backend, input, &config.run);
    session.load_warnings = models.warnings.len() + scene.warnings.len();
    Ok(session)
}

/// Run frames with the flap key pressed for one frame every `flap_every`
fn simulate(engine: &mut Engine, backend: &mut RecordingBackend, mut input: KeyboardState, run: &RunConfig) -> Session {
    let delta_time = engine.config().fixed_time_step.unwrap_or(1.0 / 60.0);
    let flap_every = run.flap_every.max(1);
    let mut session = Session::default();

    for frame in 0..run.max_frames {
        input.handle_key_input(KeyCode::Space, frame % flap_every == 0);
        let stats = engine.frame(&input, backend, delta_time);
        session.draws += stats.draws_executed;
        session.frames += 1;
        backend.clear();
    }

    if let Some(manager) = engine
        .scene
        .graph
        .find_by_name("GameManager")
        .and_then(|node| engine.scene.graph.component::<GameManagerComponent>(node))
    {
        session.pipes_spawned = manager.pipes_spawned();
        session.resets = manager.resets();
    }
    session
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short_run(frames: u64) -> GameConfig {
        let mut config = GameConfig::default();
        config.gameplay.seed = Some(3);
        config.run.max_frames = frames;
        config
    }

    #[test]
    fn test_bundled_assets_load_cleanly() {
        let session = play(&short_run(1)).unwrap();
        assert_eq!(session.load_warnings, 0);
        assert_eq!(session.frames, 1);
        // bird body, wing, beak and the two coin groups
        assert_eq!(session.draws, 5);
    }

    #[test]
    fn test_pipes_scroll_in_during_play() {
        let session = play(&short_run(240)).unwrap();
        assert!(session.pipes_spawned >= 4);
        assert!(session.draws > 240 * 5);
    }

    #[test]
    fn test_missing_scene_still_runs() {
        let mut config = short_run(10);
        config.run.scene_file = "nowhere.scene".to_string();
        let session = play(&config).unwrap();
        assert_eq!(session.load_warnings, 1);
        assert_eq!(session.draws, 0);
        assert_eq!(session.frames, 10);
    }
}
