//! Frame driver core
//!
//! `Game` owns one of everything (background layers, obstacle field, player
//! and the random source) and steps them in a fixed order each frame:
//!
//! 1. scroll every background layer
//! 2. apply input to the player
//! 3. maybe spawn, then scroll the obstacle field
//! 4. draw layers, obstacles, player
//! 5. advance the player's state timer
//! 6. collision and scoring, against the positions finalised above
//!
//! World speed is measured in units per frame and grows a little every frame.

use std::fmt;
use std::time::Duration;

use rand::Rng;

use crate::assets::TextureLoader;
use crate::collision;
use crate::config::RunnerConfig;
use crate::error::SceneError;
use crate::obstacles::ObstacleField;
use crate::player::Player;
use crate::render::Canvas;
use crate::scroller::LayerScroller;

/// Input sampled for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub jump: bool,
    pub crouch: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Running,
    /// The player hit an obstacle; further frames do nothing
    GameOver,
}

/// End-of-run numbers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub score: u64,
    pub passed: u32,
    pub frames: u64,
    pub spawned: u64,
    pub final_speed: f32,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "score {} ({} passed of {} spawned) after {} frames, final speed {:.3}",
            self.score, self.passed, self.spawned, self.frames, self.final_speed
        )
    }
}

pub struct Game<T, R> {
    scroller: LayerScroller<T>,
    obstacles: ObstacleField<T>,
    player: Player<T>,
    rng: R,
    world_speed: f32,
    acceleration: f32,
    obstacle_baseline: f32,
    show_hitboxes: bool,
    frames: u64,
    over: bool,
}

impl<T: Clone, R: Rng> Game<T, R> {
    /// Load every texture the run needs and set up the scene.
    ///
    /// Config and asset failures all surface here, before the first frame.
    pub fn new<L>(config: &RunnerConfig, loader: &mut L, mut rng: R, now: Duration) -> Result<Self, SceneError>
    where
        L: TextureLoader<Texture = T> + ?Sized,
    {
        config.validate()?;
        let mut scroller = LayerScroller::new(config.screen.width, config.tiles);
        for layer in &config.layers {
            scroller.add_layer(layer, loader, &mut rng)?;
        }
        let obstacles = ObstacleField::new(&config.obstacles, config.screen.width, loader)?;
        let player = Player::new(&config.player, loader, now)?;

        Ok(Self {
            scroller,
            obstacles,
            player,
            rng,
            world_speed: config.world.initial_speed,
            acceleration: config.world.acceleration,
            obstacle_baseline: config.obstacles.baseline,
            show_hitboxes: cfg!(debug_assertions),
            frames: 0,
            over: false,
        })
    }

    pub fn set_show_hitboxes(&mut self, show: bool) {
        self.show_hitboxes = show;
    }

    /// Run one frame. `now` is a monotonic timestamp with at least
    /// millisecond resolution.
    pub fn advance<C: Canvas<T> + ?Sized>(&mut self, now: Duration, input: FrameInput, canvas: &mut C) -> FrameOutcome {
        if self.over {
            return FrameOutcome::GameOver;
        }
        let dx = self.world_speed;

        self.scroller.scroll_all(dx, &mut self.rng);

        if input.jump {
            self.player.on_jump(now);
        } else if input.crouch {
            self.player.on_crouch(now);
        }

        self.obstacles.maybe_spawn(self.obstacle_baseline, &mut self.rng);
        self.obstacles.scroll(dx);

        self.scroller.draw_all(canvas);
        self.obstacles.draw(canvas, self.show_hitboxes);
        self.player.draw(canvas, self.show_hitboxes);

        // The pose drawn above is the one from before this tick; on a
        // release frame collision already checks the running pose.
        self.player.tick(now);

        self.frames += 1;
        self.world_speed += self.acceleration;

        if collision::check_frame(&mut self.player, &mut self.obstacles) {
            self.over = true;
            log::info!("game over: {}", self.summary());
            return FrameOutcome::GameOver;
        }
        FrameOutcome::Running
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    pub fn score(&self) -> u64 {
        self.player.score()
    }

    /// Scroll distance applied next frame
    pub fn world_speed(&self) -> f32 {
        self.world_speed
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn player(&self) -> &Player<T> {
        &self.player
    }

    pub fn obstacles(&self) -> &ObstacleField<T> {
        &self.obstacles
    }

    pub fn scroller(&self) -> &LayerScroller<T> {
        &self.scroller
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            score: self.player.score(),
            passed: self.player.passed(),
            frames: self.frames,
            spawned: self.obstacles.spawned(),
            final_speed: self.world_speed,
        }
    }
}
