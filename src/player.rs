//! Player locomotion state machine
//!
//! There is no physics here. The player loops a two-frame run cycle and can
//! be interrupted by a timed jump or crouch pose that releases back into the
//! run cycle on its own. Each state has its own sprite placement: the jump
//! sprite is simply drawn higher up, so collision geometry follows whatever
//! pose is active.
//!
//! Transitions when the state timer runs out:
//!
//! ```text
//! Run1 -> Run2 -> Run1 -> ...
//! Jump -> Run1
//! Crouch -> Run1
//! ```

use std::time::Duration;

use crate::assets::TextureLoader;
use crate::config::{PlayerConfig, RepeatInput};
use crate::error::SceneError;
use crate::geometry::{Hitbox, Rect, Span};
use crate::render::Canvas;

/// Locomotion / animation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlayerState {
    #[default]
    Run1,
    Run2,
    Jump,
    Crouch,
}

impl PlayerState {
    fn index(self) -> usize {
        match self {
            PlayerState::Run1 => 0,
            PlayerState::Run2 => 1,
            PlayerState::Jump => 2,
            PlayerState::Crouch => 3,
        }
    }

    /// State entered when the current one times out
    pub fn next(self) -> Self {
        match self {
            PlayerState::Run1 => PlayerState::Run2,
            PlayerState::Run2 | PlayerState::Jump | PlayerState::Crouch => PlayerState::Run1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PlayerState::Run1 | PlayerState::Run2 => "run",
            PlayerState::Jump => "jump",
            PlayerState::Crouch => "crouch",
        }
    }
}

/// Sprite and collision geometry for one state
#[derive(Debug, Clone)]
struct Pose<T> {
    texture: T,
    rect: Rect,
    hitbox: Hitbox,
}

pub struct Player<T> {
    poses: [Pose<T>; 4],
    state: PlayerState,
    /// Time left before the automatic transition
    remaining: Duration,
    last_tick: Duration,
    action_duration: Duration,
    run_frame_duration: Duration,
    repeat_input: RepeatInput,
    position_y: f32,
    score: u64,
    passed: u32,
}

impl<T: Clone> Player<T> {
    /// Load all four pose sprites and start running at `now`
    pub fn new<L>(config: &PlayerConfig, loader: &mut L, now: Duration) -> Result<Self, SceneError>
    where
        L: TextureLoader<Texture = T> + ?Sized,
    {
        let sprites = &config.sprites;
        let mut pose = |path: &str, lift: f32| -> Result<Pose<T>, SceneError> {
            let sprite = loader.load(path, config.scale)?;
            Ok(Pose {
                rect: Rect::standing_on(config.x, config.baseline - lift, sprite.width, sprite.height),
                hitbox: config.hitbox.resolve(sprite.width, sprite.height),
                texture: sprite.texture,
            })
        };
        let poses = [
            pose(&sprites.run_1, 0.0)?,
            pose(&sprites.run_2, 0.0)?,
            pose(&sprites.jump, config.jump_lift)?,
            pose(&sprites.crouch, 0.0)?,
        ];

        Ok(Self {
            poses,
            state: PlayerState::Run1,
            remaining: config.run_frame_duration(),
            last_tick: now,
            action_duration: config.action_duration(),
            run_frame_duration: config.run_frame_duration(),
            repeat_input: config.repeat_input,
            position_y: config.baseline,
            score: 0,
            passed: 0,
        })
    }

    pub fn on_jump(&mut self, now: Duration) {
        self.enter_action(PlayerState::Jump, now);
    }

    pub fn on_crouch(&mut self, now: Duration) {
        self.enter_action(PlayerState::Crouch, now);
    }

    fn enter_action(&mut self, action: PlayerState, now: Duration) {
        if self.state == action {
            if self.repeat_input == RepeatInput::Extend {
                self.remaining += self.action_duration;
            }
            return;
        }
        self.state = action;
        self.remaining = self.action_duration;
        self.last_tick = now;
    }

    /// Advance the state timer to `now`.
    ///
    /// At most one transition happens per tick; time left over after a
    /// transition is dropped and the new state starts a fresh run-cycle frame.
    pub fn tick(&mut self, now: Duration) {
        let elapsed = now.saturating_sub(self.last_tick);
        if elapsed >= self.remaining {
            self.state = self.state.next();
            self.remaining = self.run_frame_duration;
        } else {
            self.remaining -= elapsed;
        }
        self.last_tick = now;
    }

    pub fn draw<C: Canvas<T> + ?Sized>(&self, canvas: &mut C, show_hitboxes: bool) {
        let pose = self.pose();
        canvas.draw_sprite(&pose.texture, pose.rect);
        if show_hitboxes {
            canvas.draw_outline(self.hitbox_rect());
        }
    }

    /// Sprite bounds of the active pose
    #[cfg(test)]
    pub fn rect(&self) -> Rect {
        self.pose().rect
    }

    /// Hitbox of the active pose in screen space
    pub fn hitbox_rect(&self) -> Rect {
        let pose = self.pose();
        pose.hitbox.place(&pose.rect)
    }

    pub fn horizontal_span(&self) -> Span {
        self.hitbox_rect().horizontal()
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    /// Time left in the current state
    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    /// Baseline the player runs on
    pub fn position_y(&self) -> f32 {
        self.position_y
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    /// Obstacles credited so far
    pub fn passed(&self) -> u32 {
        self.passed
    }

    /// Only the collision step awards points
    pub(crate) fn credit(&mut self, value: u32) {
        self.score = self.score.saturating_add(u64::from(value));
        self.passed += 1;
    }

    fn pose(&self) -> &Pose<T> {
        &self.poses[self.state.index()]
    }
}
