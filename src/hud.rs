//! Score and frame-time readout
//!
//! Text is only re-formatted when it would change (score) or at a fixed
//! interval (frame time).

use std::time::Duration;

use macroquad::prelude::*;

use crate::game::Game;

/// How often the frame-time text refreshes
pub const FPS_REFRESH: Duration = Duration::from_millis(500);

/// Frame-time readout, refreshed at most every [`FPS_REFRESH`]
#[derive(Debug, Default)]
pub struct FpsReadout {
    last_refresh: Option<Duration>,
    text: String,
}

impl FpsReadout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the time spent on this frame's work
    pub fn update(&mut self, now: Duration, frame_time: Duration) -> &str {
        let due = match self.last_refresh {
            None => true,
            Some(last) => now.saturating_sub(last) > FPS_REFRESH,
        };
        if due {
            let ms = frame_time.as_millis();
            let fps = if ms > 0 { 1000 / ms } else { 0 };
            self.text = format!("{:4}ms {:5}fps", ms, fps);
            self.last_refresh = Some(now);
        }
        &self.text
    }
}

/// Score readout, re-formatted only when the score changes
#[derive(Debug, Default)]
pub struct ScoreReadout {
    shown: Option<u64>,
    text: String,
}

impl ScoreReadout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, score: u64) -> &str {
        if self.shown != Some(score) {
            self.text = format!("Score: {}", score);
            self.shown = Some(score);
        }
        &self.text
    }
}

/// Draw both readouts along the top of the screen
pub fn draw_hud(fps: &str, score: &str) {
    draw_text(fps, 4.0, 20.0, 20.0, WHITE);
    draw_text(score, 200.0, 26.0, 30.0, WHITE);
}

/// One-line dump of the simulation for the debug overlay
pub fn debug_text<T: Clone, R: ::rand::Rng>(game: &Game<T, R>) -> String {
    let scroller = game.scroller();
    let tiles: Vec<String> = scroller
        .layer_names()
        .map(|name| format!("{}:{}", name, scroller.tile_count(name).unwrap_or(0)))
        .collect();
    let player = game.player();
    format!(
        "speed {:.3}  frame {}  obstacles {}  {} {}ms  tiles {}",
        game.world_speed(),
        game.frames(),
        game.obstacles().len(),
        player.state().label(),
        player.remaining().as_millis(),
        tiles.join(" ")
    )
}

pub fn draw_debug(text: &str) {
    draw_text(text, 4.0, screen_height() - 8.0, 18.0, YELLOW);
}

/// Centered banner shown once the run has ended
pub fn draw_game_over(score: u64) {
    let line = format!("Game over - score {}", score);
    let size = measure_text(&line, None, 48, 1.0);
    let x = (screen_width() - size.width) * 0.5;
    let y = screen_height() * 0.5;
    draw_text(&line, x, y, 48.0, WHITE);
}
