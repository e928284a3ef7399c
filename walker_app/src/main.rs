//! Level walker demo application
//!
//! Loads a level (an OBJ file, or a built-in test level), drops the player
//! onto it and walks around with scripted random input, logging where the
//! collision system keeps the player.
//!
//! ```text
//! level_walker [level.obj] [sandbox.toml | sandbox.ron] [--ticks N] [--seed N]
//! ```

use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sandbox_engine::assets::{MtlError, MtlParser, ObjError, ObjLoader};
use sandbox_engine::foundation::logging;
use sandbox_engine::prelude::*;
use thiserror::Error;

/// Ticks simulated when `--ticks` is not given
const DEFAULT_TICKS: u64 = 600;

/// Seed used when `--seed` is not given
const DEFAULT_SEED: u64 = 7;

/// Ticks between input changes
const INPUT_HOLD_TICKS: u64 = 45;

/// Ticks between position reports
const REPORT_INTERVAL: u64 = 60;

/// Where the player starts, before dropping onto the ground below
const SPAWN_POINT: Vec3 = Vec3::new(1.0, 0.0, 2.0);

#[derive(Error, Debug)]
enum WalkerError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("level: {0}")]
    Level(#[from] ObjError),
    #[error("collision: {0}")]
    Collision(#[from] CollisionError),
    #[error("usage: {0}")]
    Usage(String),
}

/// Parsed command line
#[derive(Debug, Default)]
struct Options {
    level: Option<PathBuf>,
    config: Option<PathBuf>,
    ticks: Option<u64>,
    seed: Option<u64>,
}

impl Options {
    fn parse(args: impl Iterator<Item = String>) -> Result<Self, WalkerError> {
        let mut options = Self::default();
        let mut args = args;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--ticks" => options.ticks = Some(Self::number(args.next(), "--ticks")?),
                "--seed" => options.seed = Some(Self::number(args.next(), "--seed")?),
                _ if arg.ends_with(".obj") => options.level = Some(PathBuf::from(arg)),
                _ if ConfigFormat::from_path(&arg).is_some() => options.config = Some(PathBuf::from(arg)),
                _ => return Err(WalkerError::Usage(format!("unrecognized argument '{}'", arg))),
            }
        }
        Ok(options)
    }

    fn number(value: Option<String>, flag: &str) -> Result<u64, WalkerError> {
        value
            .and_then(|v| v.parse().ok())
            .ok_or_else(|| WalkerError::Usage(format!("{} expects a non-negative integer", flag)))
    }
}

/// Floor, walls, a raised platform and a ramp up to it
fn test_level() -> Mesh {
    let mut level = Mesh::plane(Vec3::zeros(), 20.0);

    // Perimeter walls
    level.append(&Mesh::cuboid(Vec3::new(0.0, 1.5, -20.5), Vec3::new(20.0, 1.5, 0.5)));
    level.append(&Mesh::cuboid(Vec3::new(0.0, 1.5, 20.5), Vec3::new(20.0, 1.5, 0.5)));
    level.append(&Mesh::cuboid(Vec3::new(-20.5, 1.5, 0.0), Vec3::new(0.5, 1.5, 20.0)));
    level.append(&Mesh::cuboid(Vec3::new(20.5, 1.5, 0.0), Vec3::new(0.5, 1.5, 20.0)));

    // Pillar in the middle of the room
    level.append(&Mesh::cuboid(Vec3::new(4.0, 1.5, -4.0), Vec3::new(1.0, 1.5, 1.0)));

    // Platform with a ramp leading up from the -X side
    level.append(&Mesh::cuboid(Vec3::new(-8.0, 0.5, 8.0), Vec3::new(3.0, 0.5, 3.0)));
    let mut ramp = Mesh::default();
    ramp.push_quad([
        Vec3::new(-15.0, 0.0, 10.0),
        Vec3::new(-11.0, 1.0, 10.0),
        Vec3::new(-11.0, 1.0, 6.0),
        Vec3::new(-15.0, 0.0, 6.0),
    ]);
    level.append(&ramp);

    level
}

/// Load the level geometry plus any material libraries it references
fn load_level(path: &Path) -> Result<Mesh, ObjError> {
    let mesh = ObjLoader::load_obj(path)?;

    let text = std::fs::read_to_string(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
    for library in ObjLoader::material_libraries(&text) {
        match MtlParser::load(base_dir.join(&library)) {
            Ok(materials) => {
                for material in materials.values() {
                    log::debug!("Material '{}' diffuse map: {:?}", material.name, material.diffuse_map);
                }
            }
            Err(MtlError::Io(e)) => log::warn!("Material library {} not readable: {}", library, e),
            Err(e) => log::warn!("Material library {} skipped: {}", library, e),
        }
    }
    Ok(mesh)
}

/// Headless walker: collision, camera, controller and scripted input
struct WalkerApp {
    collision: CollisionSystem,
    camera: Camera,
    player: CharacterController,
    input: InputState,
    clock: SimulationClock,
    rng: StdRng,
    spawn: Vec3,
    tick_seconds: f32,
}

impl WalkerApp {
    fn new(config: &SandboxConfig, level: &Mesh, seed: u64) -> Result<Self, WalkerError> {
        let mut collision = CollisionSystem::from_config(&config.collision);
        collision.load_mesh_collision(level)?;

        let spawn = match collision.ground_height(SPAWN_POINT) {
            Some(ground) => Vec3::new(SPAWN_POINT.x, ground, SPAWN_POINT.z),
            None => {
                log::warn!("No ground under the spawn point; spawning in the air");
                SPAWN_POINT
            }
        };

        let player = CharacterController::new(spawn, config.controller.clone());
        let camera = Camera::from_config(player.eye_position(), 16.0 / 9.0, &config.camera);

        let mut input = InputState::new();
        input.set_pointer_locked(true);

        log::info!("Player spawned at {:?}", spawn);
        Ok(Self {
            collision,
            camera,
            player,
            input,
            clock: SimulationClock::new(),
            rng: StdRng::seed_from_u64(seed),
            spawn,
            tick_seconds: config.engine.tick_seconds,
        })
    }

    /// Release held keys and press a new random combination
    fn change_input(&mut self) {
        const KEYS: [KeyCode; 4] = [KeyCode::W, KeyCode::A, KeyCode::S, KeyCode::D];

        for key in KEYS {
            self.input.handle_key_input(key, false);
        }
        self.input.handle_key_input(KEYS[self.rng.gen_range(0..KEYS.len())], true);
        if self.rng.gen_bool(0.3) {
            self.input.handle_key_input(KEYS[self.rng.gen_range(0..KEYS.len())], true);
        }

        log::debug!("Input changed to {:?}", self.input.movement());
    }

    /// Put the player back at the spawn point when nothing is underfoot
    fn respawn_if_off_level(&mut self) -> Option<f32> {
        let position = self.player.position();
        let ground = self.collision.ground_height(position);
        if ground.is_none() && position != self.spawn {
            log::warn!("Walked off the level at {:?}; respawning", position);
            self.player.teleport(self.spawn);
            self.camera.set_position(self.player.eye_position());
            return self.collision.ground_height(self.spawn);
        }
        ground
    }

    fn tick(&mut self) {
        let tick = self.clock.tick_count();
        if tick % INPUT_HOLD_TICKS == 0 {
            self.change_input();
        }
        self.input.handle_mouse_move(self.rng.gen_range(-20.0..20.0), self.rng.gen_range(-2.0..2.0));

        let resolution = self.player.update(&mut self.input, &mut self.camera, &self.collision, self.tick_seconds);
        self.clock.advance(self.tick_seconds);

        if resolution.corrections > 0 {
            log::trace!("Tick {}: {} correction(s)", tick, resolution.corrections);
        }
        let ground = self.respawn_if_off_level();

        if tick % REPORT_INTERVAL == 0 {
            let position = self.player.position();
            match ground {
                Some(ground) => log::info!(
                    "t={:.2}s feet=({:.2}, {:.2}, {:.2}) ground={:.2}",
                    self.clock.total_time(),
                    position.x,
                    position.y,
                    position.z,
                    ground
                ),
                None => log::info!(
                    "t={:.2}s feet=({:.2}, {:.2}, {:.2}) ground=none",
                    self.clock.total_time(),
                    position.x,
                    position.y,
                    position.z
                ),
            }
        }
    }

    fn run(&mut self, ticks: u64) {
        let stopwatch = Stopwatch::start_new();
        for _ in 0..ticks {
            self.tick();
        }
        log::info!(
            "Simulated {} ticks ({:.1}s of play) in {:.2}ms; final feet {:?}, eye {:?}",
            ticks,
            self.clock.total_time(),
            stopwatch.elapsed_millis(),
            self.player.position(),
            self.camera.position
        );
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let options = Options::parse(std::env::args().skip(1))?;

    let config = match &options.config {
        Some(path) => SandboxConfig::load_from_file(&path.to_string_lossy()).map_err(WalkerError::from)?,
        None => SandboxConfig::default(),
    };
    logging::init_with_level(&config.engine.log_level);
    config.validate().map_err(WalkerError::from)?;

    let level = match &options.level {
        Some(path) => load_level(path).map_err(WalkerError::from)?,
        None => {
            log::info!("No level given; using the built-in test level");
            test_level()
        }
    };

    let mut app = WalkerApp::new(&config, &level, options.seed.unwrap_or(DEFAULT_SEED))?;
    app.run(options.ticks.unwrap_or(DEFAULT_TICKS));
    Ok(())
}
