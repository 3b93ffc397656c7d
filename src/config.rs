//! Runner configuration
//!
//! Every tunable number and both static catalogs (background layers and
//! obstacle archetypes) live here. Uses RON for the on-disk form;
//! `RunnerConfig::default()` is the stock game.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chance::Chance;
use crate::geometry::Hitbox;

/// Error type for configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunnerConfig {
    pub screen: ScreenConfig,
    pub world: WorldConfig,
    pub tiles: TileConfig,
    /// Background layers in draw order (back to front)
    pub layers: Vec<LayerSpec>,
    pub obstacles: ObstacleConfig,
    pub player: PlayerConfig,
    /// Seed for the spawn/tile generator; `None` picks one from entropy
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Visible area in screen units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenConfig {
    pub width: f32,
    pub height: f32,
}

/// World scroll speed, in units per frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    pub initial_speed: f32,
    /// Added to the speed after every frame
    pub acceleration: f32,
}

/// Tile recycling parameters shared by all layers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileConfig {
    /// Tiles are appended until the last one reaches this far past the right edge
    pub preload_margin: f32,
    /// Each new tile starts this far inside the previous one to hide seams
    pub overlap: f32,
}

/// One parallax background layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub name: String,
    /// Frames are `{frame_prefix}1.png` .. `{frame_prefix}{frame_count}.png`
    pub frame_prefix: String,
    pub frame_count: u32,
    /// Screen y the bottom of every tile sits on
    pub baseline: f32,
    pub scale: f32,
    /// Multiplier on the world speed (1.0 moves with the obstacles)
    #[serde(default = "unit")]
    pub parallax: f32,
}

fn unit() -> f32 {
    1.0
}

impl LayerSpec {
    /// Path of the zero-based frame `index`
    pub fn frame_path(&self, index: u32) -> String {
        format!("{}{}.png", self.frame_prefix, index + 1)
    }
}

/// Obstacle spawning parameters and the archetype catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleConfig {
    /// Screen y obstacles stand on
    pub baseline: f32,
    /// Per-frame chance to attempt a spawn
    pub spawn_chance: Chance,
    /// Chance that a pairable archetype spawns a second copy
    pub pair_chance: Chance,
    /// No spawn while the newest obstacle's right edge is within this of the right screen edge
    pub min_gap: f32,
    pub catalog: Vec<ArchetypeSpec>,
}

/// An obstacle template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeSpec {
    pub name: String,
    pub sprite: String,
    pub scale: f32,
    #[serde(default)]
    pub hitbox: Hitbox,
    pub score: u32,
    #[serde(default)]
    pub pairable: bool,
}

/// What a second press of the active action does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RepeatInput {
    /// Pressing jump while jumping changes nothing
    #[default]
    Ignore,
    /// Pressing jump while jumping adds another full action duration
    Extend,
}

/// Sprite per locomotion state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSprites {
    pub run_1: String,
    pub run_2: String,
    pub jump: String,
    pub crouch: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub x: f32,
    /// Screen y the player's feet rest on
    pub baseline: f32,
    /// How far the jump sprite is drawn above the baseline
    pub jump_lift: f32,
    pub scale: f32,
    pub sprites: PlayerSprites,
    #[serde(default)]
    pub hitbox: Hitbox,
    /// How long a jump or crouch pose is held
    pub action_ms: u64,
    /// Length of one frame of the run cycle
    pub run_frame_ms: u64,
    #[serde(default)]
    pub repeat_input: RepeatInput,
}

impl PlayerConfig {
    pub fn action_duration(&self) -> Duration {
        Duration::from_millis(self.action_ms)
    }

    pub fn run_frame_duration(&self) -> Duration {
        Duration::from_millis(self.run_frame_ms)
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        let screen = ScreenConfig {
            width: 1280.0,
            height: 720.0,
        };
        Self {
            screen,
            world: WorldConfig {
                initial_speed: 1.75,
                acceleration: 0.00005,
            },
            tiles: TileConfig {
                preload_margin: 50.0,
                overlap: 20.0,
            },
            layers: vec![
                LayerSpec {
                    name: "sky".into(),
                    frame_prefix: "sprites/sky/sky_".into(),
                    frame_count: 1,
                    baseline: 680.0,
                    scale: 1.5,
                    parallax: 0.2,
                },
                LayerSpec {
                    name: "ground".into(),
                    frame_prefix: "sprites/ground/ground_".into(),
                    frame_count: 1,
                    baseline: screen.height + 630.0,
                    scale: 1.0,
                    parallax: 1.0,
                },
                LayerSpec {
                    name: "bush".into(),
                    frame_prefix: "sprites/bush/bush_shadow_".into(),
                    frame_count: 10,
                    baseline: 700.0,
                    scale: 0.4,
                    parallax: 0.6,
                },
            ],
            obstacles: ObstacleConfig {
                baseline: 700.0,
                spawn_chance: Chance::one_in(119),
                pair_chance: Chance::one_in(119),
                min_gap: 400.0,
                catalog: vec![
                    enemy("enemy_1", Hitbox::new(0.0, 0.0, 0.0, 250.0), 10, false),
                    enemy("enemy_2", Hitbox::default(), 5, true),
                    enemy("enemy_3", Hitbox::new(0.0, 0.0, 0.0, 270.0), 15, false),
                    enemy("enemy_4", Hitbox::new(0.0, 0.0, 0.0, 290.0), 20, false),
                ],
            },
            player: PlayerConfig {
                x: 30.0,
                baseline: 710.0,
                jump_lift: 120.0,
                scale: 0.5,
                sprites: PlayerSprites {
                    run_1: "sprites/behula/behula_1.png".into(),
                    run_2: "sprites/behula/behula_2.png".into(),
                    jump: "sprites/behula/behula_3.png".into(),
                    crouch: "sprites/behula/behula_4.png".into(),
                },
                hitbox: Hitbox::default(),
                action_ms: 750,
                run_frame_ms: 125,
                repeat_input: RepeatInput::Ignore,
            },
            seed: None,
        }
    }
}

fn enemy(name: &str, hitbox: Hitbox, score: u32, pairable: bool) -> ArchetypeSpec {
    ArchetypeSpec {
        name: name.into(),
        sprite: format!("sprites/enemy/{}.png", name),
        scale: 0.5,
        hitbox,
        score,
        pairable,
    }
}

impl RunnerConfig {
    /// Load and validate a RON config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron(&text)
    }

    /// Parse and validate RON text
    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        let config: RunnerConfig = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty RON
    pub fn to_ron(&self) -> Result<String, ron::Error> {
        let pretty = ron::ser::PrettyConfig::new().depth_limit(4).indentor("    ".to_string());
        ron::ser::to_string_pretty(self, pretty)
    }

    /// Reject values that would break scrolling or spawning invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.check().map_err(ConfigError::Invalid)
    }

    fn check(&self) -> Result<(), String> {
        if !(self.screen.width > 0.0 && self.screen.height > 0.0) {
            return Err(format!(
                "screen size must be positive, got {}x{}",
                self.screen.width, self.screen.height
            ));
        }
        if !self.world.initial_speed.is_finite() || self.world.initial_speed < 0.0 {
            return Err(format!("world.initial_speed must be >= 0, got {}", self.world.initial_speed));
        }
        if !self.world.acceleration.is_finite() || self.world.acceleration < 0.0 {
            return Err(format!("world.acceleration must be >= 0, got {}", self.world.acceleration));
        }
        if self.tiles.overlap < 0.0 || self.tiles.preload_margin < 0.0 {
            return Err("tiles.overlap and tiles.preload_margin must be >= 0".into());
        }

        for (i, layer) in self.layers.iter().enumerate() {
            let ctx = format!("layers[{}] '{}'", i, layer.name);
            if layer.frame_count == 0 {
                return Err(format!("{}: frame_count must be at least 1", ctx));
            }
            check_scale(layer.scale, &ctx)?;
            if !layer.parallax.is_finite() || layer.parallax < 0.0 {
                return Err(format!("{}: parallax must be >= 0, got {}", ctx, layer.parallax));
            }
            if self.layers[..i].iter().any(|l| l.name == layer.name) {
                return Err(format!("{}: duplicate layer name", ctx));
            }
        }

        let obstacles = &self.obstacles;
        check_chance(obstacles.spawn_chance, "obstacles.spawn_chance")?;
        check_chance(obstacles.pair_chance, "obstacles.pair_chance")?;
        if !obstacles.min_gap.is_finite() || obstacles.min_gap < 0.0 {
            return Err(format!("obstacles.min_gap must be >= 0, got {}", obstacles.min_gap));
        }
        if obstacles.catalog.is_empty() {
            return Err("obstacles.catalog must contain at least one archetype".into());
        }
        for (i, arch) in obstacles.catalog.iter().enumerate() {
            let ctx = format!("obstacles.catalog[{}] '{}'", i, arch.name);
            check_scale(arch.scale, &ctx)?;
            check_hitbox(&arch.hitbox, &ctx)?;
        }

        let player = &self.player;
        check_scale(player.scale, "player")?;
        check_hitbox(&player.hitbox, "player")?;
        if player.run_frame_ms == 0 {
            return Err("player.run_frame_ms must be at least 1".into());
        }
        Ok(())
    }
}

fn check_scale(scale: f32, ctx: &str) -> Result<(), String> {
    if scale.is_finite() && scale > 0.0 {
        Ok(())
    } else {
        Err(format!("{}: scale must be positive, got {}", ctx, scale))
    }
}

pub(crate) fn check_chance(chance: Chance, ctx: &str) -> Result<(), String> {
    if chance.one_in == 0 {
        return Err(format!("{}: one_in must be at least 1", ctx));
    }
    Ok(())
}

fn check_hitbox(hitbox: &Hitbox, ctx: &str) -> Result<(), String> {
    let values = [hitbox.x, hitbox.y, hitbox.w, hitbox.h];
    if values.iter().any(|v| !v.is_finite()) || hitbox.w < 0.0 || hitbox.h < 0.0 {
        return Err(format!("{}: invalid hitbox {:?}", ctx, hitbox));
    }
    Ok(())
}
