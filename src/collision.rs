//! Collision and scoring
//!
//! Runs once per frame after every position for the frame is final. Both
//! tests use hitboxes, never full sprite bounds:
//!
//! - hitboxes overlapping on both axes ends the run
//! - hitboxes overlapping horizontally credits the obstacle's score, once

use crate::geometry::Rect;
use crate::obstacles::ObstacleField;
use crate::player::Player;

/// True when two hitbox rectangles overlap on both axes
pub fn collided(a: &Rect, b: &Rect) -> bool {
    a.intersects(b)
}

/// Check the player against every live obstacle in queue order.
///
/// Returns `true` on the first collision (game over); obstacles after it are
/// not looked at this frame. Otherwise each obstacle whose hitbox span
/// overlaps the player's horizontally pays out its score the first time
/// that happens, whatever the vertical positions.
pub fn check_frame<T: Clone>(player: &mut Player<T>, obstacles: &mut ObstacleField<T>) -> bool {
    let hitbox = player.hitbox_rect();
    let span = player.horizontal_span();

    for obstacle in obstacles.iter_mut() {
        let other = obstacle.hitbox_rect();
        if collided(&hitbox, &other) {
            log::info!(
                "collision: player {:?} ({}) hit obstacle at {:?}",
                hitbox,
                player.state().label(),
                other
            );
            return true;
        }
        if !obstacle.counted && span.overlaps(&obstacle.horizontal_span()) {
            obstacle.counted = true;
            player.credit(obstacle.score);
            log::debug!("+{} (score {})", obstacle.score, player.score());
        }
    }
    false
}
