//! Obstacle Field
//!
//! Live obstacles sit in a queue ordered by spawn time, which is also their
//! left-to-right order on screen since they all scroll at world speed. New
//! obstacles enter at the right edge of the visible area; ones that have
//! scrolled fully past the left edge are dropped from the front.
//!
//! Unlike a background layer, the queue is allowed to be empty.

use std::collections::VecDeque;

use rand::Rng;

use crate::assets::{Sprite, TextureLoader};
use crate::chance::Chance;
use crate::config::{check_chance, ConfigError, ObstacleConfig};
use crate::error::SceneError;
use crate::geometry::{Hitbox, Rect, Span};
use crate::render::Canvas;

/// Index into the archetype catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArchetypeId(pub usize);

/// A catalog entry with its sprite loaded and its hitbox resolved
#[derive(Debug, Clone)]
pub struct Archetype<T> {
    pub name: String,
    pub sprite: Sprite<T>,
    pub hitbox: Hitbox,
    pub score: u32,
    pub pairable: bool,
}

/// A live world entity the player can hit or score against
#[derive(Debug, Clone)]
pub struct Obstacle<T> {
    pub texture: T,
    pub rect: Rect,
    pub hitbox: Hitbox,
    pub score: u32,
    /// Set once the player has been credited for this obstacle
    pub counted: bool,
}

impl<T> Obstacle<T> {
    /// Hitbox in screen space
    pub fn hitbox_rect(&self) -> Rect {
        self.hitbox.place(&self.rect)
    }

    /// Horizontal extent of the hitbox
    pub fn horizontal_span(&self) -> Span {
        self.hitbox_rect().horizontal()
    }
}

/// Spawner, scroller and owner of every live obstacle
pub struct ObstacleField<T> {
    visible_width: f32,
    spawn_chance: Chance,
    pair_chance: Chance,
    min_gap: f32,
    catalog: Vec<Archetype<T>>,
    live: VecDeque<Obstacle<T>>,
    spawned: u64,
}

impl<T: Clone> ObstacleField<T> {
    /// Load every archetype sprite up front so spawning never touches the loader
    pub fn new<L>(config: &ObstacleConfig, visible_width: f32, loader: &mut L) -> Result<Self, SceneError>
    where
        L: TextureLoader<Texture = T> + ?Sized,
    {
        if config.catalog.is_empty() {
            return Err(SceneError::EmptyCatalog);
        }
        check_chance(config.spawn_chance, "obstacles.spawn_chance").map_err(ConfigError::Invalid)?;
        check_chance(config.pair_chance, "obstacles.pair_chance").map_err(ConfigError::Invalid)?;

        let mut catalog = Vec::with_capacity(config.catalog.len());
        for spec in &config.catalog {
            let sprite = loader.load(&spec.sprite, spec.scale)?;
            let hitbox = spec.hitbox.resolve(sprite.width, sprite.height);
            log::debug!(
                "archetype '{}': {}x{} sprite, hitbox {:?}, score {}{}",
                spec.name,
                sprite.width,
                sprite.height,
                hitbox,
                spec.score,
                if spec.pairable { ", pairable" } else { "" }
            );
            catalog.push(Archetype {
                name: spec.name.clone(),
                sprite,
                hitbox,
                score: spec.score,
                pairable: spec.pairable,
            });
        }
        log::info!("obstacle catalog: {} archetype(s)", catalog.len());

        Ok(Self {
            visible_width,
            spawn_chance: config.spawn_chance,
            pair_chance: config.pair_chance,
            min_gap: config.min_gap,
            catalog,
            live: VecDeque::new(),
            spawned: 0,
        })
    }

    /// Once-per-frame spawn decision. Returns how many obstacles were added (0, 1 or 2).
    ///
    /// One coin flip decides whether to try at all; the attempt is dropped
    /// while the newest obstacle is still within `min_gap` of the right edge.
    /// A pairable archetype flips a second, independent coin for a copy placed
    /// one hitbox width further right.
    pub fn maybe_spawn<R: Rng + ?Sized>(&mut self, baseline: f32, rng: &mut R) -> usize {
        if !self.spawn_chance.roll(rng) {
            return 0;
        }
        if let Some(last) = self.live.back() {
            if last.rect.right() > self.visible_width - self.min_gap {
                log::trace!("spawn suppressed, last obstacle right edge at {}", last.rect.right());
                return 0;
            }
        }

        let id = ArchetypeId(rng.gen_range(0..self.catalog.len()));
        let x = self.visible_width;
        self.spawn(id, x, baseline);

        let archetype = &self.catalog[id.0];
        if !archetype.pairable || !self.pair_chance.roll(rng) {
            return 1;
        }
        let offset = archetype.hitbox.w;
        self.spawn(id, x + offset, baseline);
        2
    }

    /// Place one obstacle of archetype `id` with its left edge at `x` and
    /// its sprite bottom on `baseline`. Returns `None` for an id outside the
    /// catalog.
    ///
    /// `x` must not be left of the newest live obstacle: eviction only ever
    /// looks at the front of the queue.
    pub fn spawn(&mut self, id: ArchetypeId, x: f32, baseline: f32) -> Option<&Obstacle<T>> {
        let archetype = self.catalog.get(id.0)?;
        debug_assert!(
            self.live.back().map_or(true, |last| last.rect.x <= x),
            "obstacle spawned at x={} behind the newest one",
            x
        );
        let sprite = &archetype.sprite;
        let obstacle = Obstacle {
            texture: sprite.texture.clone(),
            rect: Rect::standing_on(x, baseline, sprite.width, sprite.height),
            hitbox: archetype.hitbox,
            score: archetype.score,
            counted: false,
        };
        log::debug!("spawned '{}' at x={}", archetype.name, x);
        self.live.push_back(obstacle);
        self.spawned += 1;
        self.live.back()
    }

    /// Slide every obstacle left by `dx`, then drop the ones fully off screen
    pub fn scroll(&mut self, dx: f32) {
        for obstacle in &mut self.live {
            obstacle.rect.scroll(dx);
        }
        while self.live.front().is_some_and(|o| o.rect.is_off_left()) {
            self.live.pop_front();
        }
    }

    /// Draw live obstacles in queue order, optionally with hitbox outlines
    pub fn draw<C: Canvas<T> + ?Sized>(&self, canvas: &mut C, show_hitboxes: bool) {
        for obstacle in &self.live {
            canvas.draw_sprite(&obstacle.texture, obstacle.rect);
            if show_hitboxes {
                canvas.draw_outline(obstacle.hitbox_rect());
            }
        }
    }

    #[cfg(test)]
    pub fn archetype(&self, id: ArchetypeId) -> Option<&Archetype<T>> {
        self.catalog.get(id.0)
    }

    #[cfg(test)]
    pub fn archetype_id(&self, name: &str) -> Option<ArchetypeId> {
        self.catalog.iter().position(|a| a.name == name).map(ArchetypeId)
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &Obstacle<T>> {
        self.live.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Obstacle<T>> {
        self.live.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Obstacles spawned since the field was created
    pub fn spawned(&self) -> u64 {
        self.spawned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ArchetypeSpec, RunnerConfig};
    use crate::testing::{FakeTextures, RecordingCanvas};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const WIDTH: f32 = 1280.0;
    const BASELINE: f32 = 700.0;

    fn arch(name: &str, hitbox: Hitbox, pairable: bool) -> ArchetypeSpec {
        ArchetypeSpec {
            name: name.into(),
            sprite: format!("{}.png", name),
            scale: 1.0,
            hitbox,
            score: 7,
            pairable,
        }
    }

    fn config(catalog: Vec<ArchetypeSpec>, spawn: Chance, pair: Chance) -> ObstacleConfig {
        ObstacleConfig {
            baseline: BASELINE,
            spawn_chance: spawn,
            pair_chance: pair,
            min_gap: 400.0,
            catalog,
        }
    }

    fn field(config: &ObstacleConfig) -> ObstacleField<String> {
        let mut loader = FakeTextures::new(100.0, 150.0);
        ObstacleField::new(config, WIDTH, &mut loader).unwrap()
    }

    #[test]
    fn test_catalog_resolves_hitboxes() {
        let runner = RunnerConfig::default();
        let mut loader = FakeTextures::new(200.0, 600.0);
        let field = ObstacleField::new(&runner.obstacles, WIDTH, &mut loader).unwrap();

        let e1 = field.archetype(field.archetype_id("enemy_1").unwrap()).unwrap();
        assert_eq!((e1.sprite.width, e1.sprite.height), (100.0, 300.0));
        assert_eq!(e1.hitbox, Hitbox::new(0.0, 0.0, 100.0, 250.0));

        let e2 = field.archetype(field.archetype_id("enemy_2").unwrap()).unwrap();
        assert_eq!(e2.hitbox, Hitbox::new(0.0, 0.0, 100.0, 300.0));
        assert!(e2.pairable);
        assert!(field.is_empty());
    }

    #[test]
    fn test_construction_errors() {
        let mut loader = FakeTextures::new(100.0, 100.0);
        let empty = config(vec![], Chance::ALWAYS, Chance::ALWAYS);
        assert!(matches!(
            ObstacleField::new(&empty, WIDTH, &mut loader),
            Err(SceneError::EmptyCatalog)
        ));

        let missing = config(vec![arch("missing", Hitbox::default(), false)], Chance::ALWAYS, Chance::ALWAYS);
        assert!(matches!(
            ObstacleField::new(&missing, WIDTH, &mut loader),
            Err(SceneError::Asset(_))
        ));
    }

    #[test]
    fn test_spawn_at_right_edge_on_baseline() {
        let mut field = field(&config(vec![arch("rock", Hitbox::default(), false)], Chance::ALWAYS, Chance::ALWAYS));
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        assert_eq!(field.maybe_spawn(BASELINE, &mut rng), 1);
        let o = field.iter().next().unwrap();
        assert_eq!(o.rect, Rect::new(WIDTH, 550.0, 100.0, 150.0));
        assert_eq!(o.score, 7);
        assert!(!o.counted);
    }

    #[test]
    fn test_min_gap_suppresses_spawn() {
        let mut field = field(&config(vec![arch("rock", Hitbox::default(), false)], Chance::ALWAYS, Chance::ALWAYS));
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        assert_eq!(field.maybe_spawn(BASELINE, &mut rng), 1);
        assert_eq!(field.maybe_spawn(BASELINE, &mut rng), 0);

        // right edge at WIDTH + 100; needs to reach WIDTH - 400
        field.scroll(499.0);
        assert_eq!(field.maybe_spawn(BASELINE, &mut rng), 0);
        field.scroll(1.0);
        assert_eq!(field.maybe_spawn(BASELINE, &mut rng), 1);
        assert_eq!(field.len(), 2);
    }

    #[test]
    fn test_paired_spawn_offsets_by_hitbox_width() {
        let hitbox = Hitbox::new(10.0, 0.0, 50.0, 0.0);
        let mut field = field(&config(vec![arch("pair", hitbox, true)], Chance::ALWAYS, Chance::ALWAYS));
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        assert_eq!(field.maybe_spawn(BASELINE, &mut rng), 2);
        let xs: Vec<f32> = field.iter().map(|o| o.rect.x).collect();
        assert_eq!(xs, vec![WIDTH, WIDTH + 50.0]);
    }

    #[test]
    fn test_unpairable_never_pairs() {
        let mut field = field(&config(vec![arch("single", Hitbox::default(), false)], Chance::ALWAYS, Chance::ALWAYS));
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(field.maybe_spawn(BASELINE, &mut rng), 1);
        assert_eq!(field.len(), 1);
    }

    #[test]
    fn test_failed_coin_spawns_nothing() {
        let mut field = field(&config(
            vec![arch("rock", Hitbox::default(), false)],
            Chance::one_in(u32::MAX),
            Chance::ALWAYS,
        ));
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let total: usize = (0..1_000).map(|_| field.maybe_spawn(BASELINE, &mut rng)).sum();
        assert_eq!(total, 0);
        assert_eq!(field.spawned(), 0);
    }

    #[test]
    fn test_scroll_tolerates_empty_and_evicts() {
        let mut field = field(&config(vec![arch("rock", Hitbox::default(), false)], Chance::ALWAYS, Chance::ALWAYS));
        field.scroll(10.0);
        assert!(field.is_empty());

        let id = field.archetype_id("rock").unwrap();
        field.spawn(id, 0.0, BASELINE).unwrap();
        field.spawn(id, 500.0, BASELINE).unwrap();

        field.scroll(100.0);
        assert_eq!(field.len(), 2, "right edge exactly 0 is still on screen");
        field.scroll(0.25);
        assert_eq!(field.len(), 1);
        assert_eq!(field.iter().next().unwrap().rect.x, 399.75);

        field.scroll(10_000.0);
        assert!(field.is_empty());
    }

    #[test]
    fn test_spawn_rejects_unknown_archetype() {
        let mut field = field(&config(vec![arch("rock", Hitbox::default(), false)], Chance::ALWAYS, Chance::ALWAYS));
        assert!(field.spawn(ArchetypeId(3), 0.0, BASELINE).is_none());
        assert!(field.is_empty());
        assert_eq!(field.spawned(), 0);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "behind the newest one")]
    fn test_spawn_out_of_order_is_caught() {
        let mut field = field(&config(vec![arch("rock", Hitbox::default(), false)], Chance::ALWAYS, Chance::ALWAYS));
        field.spawn(ArchetypeId(0), 500.0, BASELINE);
        field.spawn(ArchetypeId(0), 100.0, BASELINE);
    }

    #[test]
    fn test_pair_coin_is_separate_from_spawn_coin() {
        let mut field = field(&config(
            vec![arch("pair", Hitbox::default(), true)],
            Chance::ALWAYS,
            Chance::one_in(u32::MAX),
        ));
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert_eq!(field.maybe_spawn(BASELINE, &mut rng), 1);
        assert_eq!(field.len(), 1);
        assert_eq!(field.iter().next().unwrap().rect.x, WIDTH);
    }

    #[test]
    fn test_zero_chance_rejected() {
        let mut loader = FakeTextures::new(100.0, 100.0);
        let rock = vec![arch("rock", Hitbox::default(), false)];
        for (spawn, pair) in [(Chance::one_in(0), Chance::ALWAYS), (Chance::ALWAYS, Chance::one_in(0))] {
            assert!(matches!(
                ObstacleField::new(&config(rock.clone(), spawn, pair), WIDTH, &mut loader),
                Err(SceneError::Config(ConfigError::Invalid(_)))
            ));
        }
    }

    #[test]
    fn test_same_seed_same_spawns() {
        let runner = RunnerConfig::default();
        let run = || {
            let mut loader = FakeTextures::new(200.0, 500.0);
            let mut field = ObstacleField::new(&runner.obstacles, WIDTH, &mut loader).unwrap();
            let mut rng = ChaCha8Rng::seed_from_u64(2024);
            let mut log = Vec::new();
            for frame in 0..20_000 {
                if field.maybe_spawn(BASELINE, &mut rng) > 0 {
                    log.push((frame, field.iter().last().map(|o| o.texture.clone())));
                }
                field.scroll(1.75);
            }
            log
        };
        let first = run();
        assert!(!first.is_empty());
        assert_eq!(first, run());
    }

    #[test]
    fn test_live_count_stays_bounded() {
        let mut field = field(&config(vec![arch("pair", Hitbox::default(), true)], Chance::ALWAYS, Chance::ALWAYS));
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..50_000 {
            field.maybe_spawn(BASELINE, &mut rng);
            field.scroll(3.0);
            assert!(field.len() <= 10);
        }
        assert!(field.spawned() > 100);
    }

    #[test]
    fn test_draw_with_and_without_hitboxes() {
        let hitbox = Hitbox::new(5.0, 20.0, 40.0, 0.0);
        let mut field = field(&config(vec![arch("rock", hitbox, false)], Chance::ALWAYS, Chance::ALWAYS));
        let id = field.archetype_id("rock").unwrap();
        field.spawn(id, 100.0, BASELINE).unwrap();
        field.spawn(id, 700.0, BASELINE).unwrap();

        let mut canvas = RecordingCanvas::default();
        field.draw(&mut canvas, false);
        assert_eq!(canvas.sprites.len(), 2);
        assert!(canvas.outlines.is_empty());
        assert_eq!(canvas.sprites[0].1.x, 100.0);

        canvas.clear();
        field.draw(&mut canvas, true);
        assert_eq!(canvas.outlines, vec![
            Rect::new(105.0, 570.0, 40.0, 150.0),
            Rect::new(705.0, 570.0, 40.0, 150.0),
        ]);
    }
}
