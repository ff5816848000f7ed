//! Session state and core simulation types
//!
//! The core owns all geometry. Renderers read these values and never feed
//! positions back in.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::CollisionSide;
use super::rect::Rect;
use crate::error::ConfigError;
use crate::random_between;
use crate::settings::{Playfield, Settings, Tuning};

/// Paddle step direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

/// Terminal signal emitted by the tick engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Terminal {
    /// Ball fell past the paddle's baseline
    Lost,
    /// Last block destroyed
    Won,
}

/// Something that happened during a tick, for renderers and logs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    CeilingBounce,
    WallBounce,
    PaddleHit { velocity: f32 },
    BlockDestroyed { slot: usize, side: CollisionSide },
    Lost,
    Won,
}

/// The ball: top-left corner plus direction and speed
///
/// Per-tick displacement is `(run * velocity, rise * velocity)`. Reflection
/// flips the sign of `rise` or `run`; paddle hits scale `velocity`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    /// Top-left corner (x = left, y = top)
    pub pos: Vec2,
    /// Vertical direction component (positive is downward)
    pub rise: f32,
    /// Horizontal direction component (positive is rightward)
    pub run: f32,
    /// Scalar speed multiplier, never decreases
    pub velocity: f32,
    /// Cooldown ticks before paddle can be hit again
    #[serde(default)]
    pub paddle_cooldown: u32,
}

impl Ball {
    pub fn new(pos: Vec2, rise: f32, run: f32, velocity: f32) -> Self {
        Self {
            pos,
            rise,
            run,
            velocity,
            paddle_cooldown: 0,
        }
    }

    /// Spawn at the playfield centre with a random direction and speed
    pub fn spawn(
        playfield: &Playfield,
        tuning: &Tuning,
        rng: &mut Pcg32,
    ) -> Result<Self, ConfigError> {
        let (dir_min, dir_max) = tuning.direction_range;
        let (speed_min, speed_max) = tuning.speed_range;
        let rise = random_between(rng, dir_min, dir_max)?;
        let run = random_between(rng, dir_min, dir_max)?;
        let velocity = random_between(rng, speed_min, speed_max)?;
        Ok(Self::new(playfield.ball_start(), rise, run, velocity))
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    /// Displacement applied by one tick
    #[inline]
    pub fn step(&self) -> Vec2 {
        Vec2::new(self.run * self.velocity, self.rise * self.velocity)
    }

    /// Bounding square at the current position
    pub fn bounds(&self, diameter: f32) -> Rect {
        Rect::square(self.pos, diameter)
    }

    /// Scale velocity by `boost`, optionally capped, never decreasing it
    pub fn accelerate(&mut self, boost: f32, cap: Option<f32>) {
        let boosted = self.velocity * boost;
        self.velocity = match cap {
            Some(cap) => boosted.min(cap).max(self.velocity),
            None => boosted,
        };
    }
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    /// Left edge
    pub position: f32,
    pub min_position: f32,
    pub max_position: f32,
    pub width: f32,
    pub height: f32,
    /// Top edge, fixed for the session
    pub top: f32,
    /// Distance covered by one step
    pub step_distance: f32,
}

impl Paddle {
    /// Centred paddle for the given playfield
    pub fn new(playfield: &Playfield, step_distance: f32) -> Self {
        Self {
            position: playfield.width / 2.0 - playfield.paddle_width / 2.0,
            min_position: 0.0,
            max_position: playfield.paddle_max_position(),
            width: playfield.paddle_width,
            height: playfield.paddle_thickness,
            top: playfield.paddle_top(),
            step_distance,
        }
    }

    /// Move one step; returns false (and does nothing) when already at the bound
    pub fn step(&mut self, direction: Direction) -> bool {
        match direction {
            Direction::Left => {
                if self.position <= self.min_position {
                    return false;
                }
                self.position = (self.position - self.step_distance).max(self.min_position);
            }
            Direction::Right => {
                if self.position >= self.max_position {
                    return false;
                }
                self.position = (self.position + self.step_distance).min(self.max_position);
            }
        }
        true
    }

    /// Follow an absolute pointer position, clamped to the allowed range
    pub fn move_to(&mut self, x: f32) {
        if x.is_nan() {
            return;
        }
        self.position = x.clamp(self.min_position, self.max_position);
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.position, self.top, self.width, self.height)
    }
}

/// One destructible block slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub rect: Rect,
    pub alive: bool,
}

/// Aggregate bounds of the alive blocks, used for broad-phase rejection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Minimum left edge
    pub left_most_x: f32,
    /// Maximum right edge
    pub right_most_x: f32,
    /// Maximum bottom edge
    pub lowest_y: f32,
}

impl Envelope {
    /// True when `ball` cannot touch any block inside this envelope
    #[inline]
    pub fn rejects(&self, ball: &Rect) -> bool {
        ball.top() > self.lowest_y
            || ball.right() < self.left_most_x
            || ball.left() > self.right_most_x
    }
}

/// Fixed grid of block slots in row-major order
///
/// Removed blocks stay in their slot as tombstones so slot indices are stable
/// for the whole session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockField {
    slots: Vec<Block>,
    columns: usize,
    alive: usize,
    envelope: Option<Envelope>,
}

impl BlockField {
    /// Lay out `rows * columns` blocks centred horizontally from the top
    pub fn new(playfield: &Playfield) -> Self {
        let mut slots = Vec::with_capacity(playfield.rows * playfield.columns);
        for row in 0..playfield.rows {
            for col in 0..playfield.columns {
                let origin = playfield.block_origin(row, col);
                slots.push(Block {
                    rect: Rect::new(
                        origin.x,
                        origin.y,
                        playfield.block_width,
                        playfield.block_height,
                    ),
                    alive: true,
                });
            }
        }
        Self::from_blocks(slots, playfield.columns)
    }

    /// Build a field from explicit blocks (slot order is scan order)
    pub fn from_blocks(slots: Vec<Block>, columns: usize) -> Self {
        let mut field = Self {
            slots,
            columns,
            alive: 0,
            envelope: None,
        };
        field.recompute();
        field
    }

    pub fn slots(&self) -> &[Block] {
        &self.slots
    }

    /// Grid cell `(row, col)` of a slot
    pub fn cell(&self, slot: usize) -> (usize, usize) {
        let columns = self.columns.max(1);
        (slot / columns, slot % columns)
    }

    pub fn alive_count(&self) -> usize {
        self.alive
    }

    pub fn is_empty(&self) -> bool {
        self.alive == 0
    }

    /// Envelope over alive blocks, `None` once the field is empty
    pub fn envelope(&self) -> Option<Envelope> {
        self.envelope
    }

    /// Alive blocks with their slot index
    pub fn iter_alive(&self) -> impl Iterator<Item = (usize, &Block)> {
        self.slots.iter().enumerate().filter(|(_, b)| b.alive)
    }

    /// Broad phase: true if no alive block can possibly touch `ball`
    pub fn rejects(&self, ball: &Rect) -> bool {
        match self.envelope {
            Some(envelope) => envelope.rejects(ball),
            None => true,
        }
    }

    /// Narrow phase: first alive block (in slot order) overlapping `ball`
    pub fn first_hit(&self, ball: &Rect) -> Option<usize> {
        self.iter_alive()
            .find(|(_, block)| block.rect.overlaps(ball))
            .map(|(slot, _)| slot)
    }

    /// Remove the block in `slot`; returns false if it was already removed
    ///
    /// The envelope is recomputed before returning.
    pub fn remove(&mut self, slot: usize) -> bool {
        match self.slots.get_mut(slot) {
            Some(block) if block.alive => {
                block.alive = false;
                self.recompute();
                true
            }
            _ => false,
        }
    }

    fn recompute(&mut self) {
        let mut alive = 0;
        let mut envelope: Option<Envelope> = None;
        for block in self.slots.iter().filter(|b| b.alive) {
            alive += 1;
            let r = &block.rect;
            envelope = Some(match envelope {
                None => Envelope {
                    left_most_x: r.left(),
                    right_most_x: r.right(),
                    lowest_y: r.bottom(),
                },
                Some(e) => Envelope {
                    left_most_x: e.left_most_x.min(r.left()),
                    right_most_x: e.right_most_x.max(r.right()),
                    lowest_y: e.lowest_y.max(r.bottom()),
                },
            });
        }
        self.alive = alive;
        self.envelope = envelope;
    }
}

/// Everything one play-through needs: the tick function's whole world
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Seed the ball was spawned from
    pub seed: u64,
    pub playfield: Playfield,
    pub tuning: Tuning,
    pub ball: Ball,
    pub paddle: Paddle,
    pub blocks: BlockField,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl Session {
    /// Build a fresh session: centred paddle, full block grid, random ball
    pub fn new(settings: &Settings, seed: u64) -> Result<Self, ConfigError> {
        settings.validate()?;
        let mut rng = Pcg32::seed_from_u64(seed);
        let playfield = settings.playfield;
        let tuning = settings.tuning;
        let ball = Ball::spawn(&playfield, &tuning, &mut rng)?;

        Ok(Self {
            seed,
            paddle: Paddle::new(&playfield, tuning.paddle_step),
            blocks: BlockField::new(&playfield),
            ball,
            playfield,
            tuning,
            time_ticks: 0,
            events: Vec::new(),
        })
    }

    /// Take the events recorded since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn ball_bounds(&self) -> Rect {
        self.ball.bounds(self.playfield.ball_diameter)
    }

    /// Paddle position that centres the paddle under the ball (demo mode)
    pub fn autopilot_target(&self) -> f32 {
        self.ball.left() + self.playfield.ball_diameter / 2.0 - self.paddle.width / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn paddle() -> Paddle {
        Paddle::new(&Playfield::default(), 5.0)
    }

    #[test]
    fn test_paddle_starts_centred() {
        let p = paddle();
        assert_eq!(p.position, 375.0 - 37.5);
        assert_eq!(p.min_position, 0.0);
        assert_eq!(p.max_position, 675.0);
        assert_eq!(p.top, 485.0);
    }

    #[test]
    fn test_paddle_step_at_bound_is_noop() {
        let mut p = paddle();
        p.position = 0.0;
        assert!(!p.step(Direction::Left));
        assert_eq!(p.position, 0.0);

        p.position = 675.0;
        assert!(!p.step(Direction::Right));
        assert_eq!(p.position, 675.0);
    }

    #[test]
    fn test_paddle_step_clamps_partial_move() {
        let mut p = paddle();
        p.position = 2.0;
        assert!(p.step(Direction::Left));
        assert_eq!(p.position, 0.0);

        p.position = 673.0;
        assert!(p.step(Direction::Right));
        assert_eq!(p.position, 675.0);
    }

    #[test]
    fn test_paddle_move_to_ignores_nan() {
        let mut p = paddle();
        let before = p.position;
        p.move_to(f32::NAN);
        assert_eq!(p.position, before);
        p.move_to(f32::INFINITY);
        assert_eq!(p.position, 675.0);
    }

    #[test]
    fn test_block_field_layout() {
        let field = BlockField::new(&Playfield::default());
        assert_eq!(field.slots().len(), 15);
        assert_eq!(field.alive_count(), 15);
        assert_eq!(field.cell(7), (1, 2));

        let env = field.envelope().unwrap();
        assert_eq!(env.left_most_x, 155.5);
        assert_eq!(env.right_most_x, 155.5 + 439.0);
        assert_eq!(env.lowest_y, 2.0 * 31.0 + 15.0);
    }

    #[test]
    fn test_remove_is_once_only() {
        let mut field = BlockField::new(&Playfield::default());
        assert!(field.remove(3));
        assert!(!field.remove(3));
        assert!(!field.remove(99));
        assert_eq!(field.alive_count(), 14);
        assert!(!field.slots()[3].alive);
    }

    #[test]
    fn test_removing_bottom_row_raises_lowest_y() {
        let mut field = BlockField::new(&Playfield::default());
        for slot in 10..15 {
            field.remove(slot);
        }
        assert_eq!(field.envelope().unwrap().lowest_y, 31.0 + 15.0);
    }

    #[test]
    fn test_empty_field_reports_empty() {
        let pf = Playfield {
            rows: 1,
            columns: 1,
            ..Playfield::default()
        };
        let mut field = BlockField::new(&pf);
        assert!(!field.is_empty());
        field.remove(0);
        assert!(field.is_empty());
        assert!(field.envelope().is_none());
        assert!(field.rejects(&Rect::new(0.0, 0.0, 750.0, 500.0)));
    }

    #[test]
    fn test_first_hit_is_slot_order() {
        let field = BlockField::new(&Playfield::default());
        // A ball spanning the gap between slots 0 and 1 touches both; slot 0 wins
        let ball = Rect::square(Vec2::new(228.0, 0.0), 20.0);
        assert!(field.slots()[1].rect.overlaps(&ball));
        assert_eq!(field.first_hit(&ball), Some(0));
    }

    #[test]
    fn test_ball_accelerate_cap_never_slows() {
        let mut ball = Ball::new(Vec2::ZERO, 1.0, 1.0, 10.0);
        ball.accelerate(1.05, Some(10.2));
        assert_eq!(ball.velocity, 10.2);
        ball.accelerate(1.05, Some(10.2));
        assert_eq!(ball.velocity, 10.2);

        // Velocity above the cap is kept, not reduced
        let mut fast = Ball::new(Vec2::ZERO, 1.0, 1.0, 20.0);
        fast.accelerate(1.05, Some(10.0));
        assert_eq!(fast.velocity, 20.0);
    }

    #[test]
    fn test_session_is_deterministic() {
        let settings = Settings::default();
        let a = Session::new(&settings, 7).unwrap();
        let b = Session::new(&settings, 7).unwrap();
        assert_eq!(a.ball.rise, b.ball.rise);
        assert_eq!(a.ball.run, b.ball.run);
        assert_eq!(a.ball.velocity, b.ball.velocity);
        assert_eq!(a.ball.pos, Vec2::new(375.0, 250.0));
        assert!((7.0..10.0).contains(&a.ball.velocity));
    }

    #[test]
    fn test_autopilot_centres_paddle_under_ball() {
        let mut session = Session::new(&Settings::default(), 7).unwrap();
        session.ball.pos = Vec2::new(100.0, 300.0);
        let target = session.autopilot_target();
        session.paddle.move_to(target);
        assert_eq!(session.paddle.position, 110.0 - 37.5);
    }

    #[test]
    fn test_session_rejects_inverted_speed_range() {
        let mut settings = Settings::default();
        settings.tuning.speed_range = (10.0, 7.0);
        let err = Session::new(&settings, 1).unwrap_err();
        assert_eq!(err, ConfigError::InvertedRange { min: 10.0, max: 7.0 });
    }

    proptest! {
        #[test]
        fn prop_steps_stay_in_bounds(steps in proptest::collection::vec(any::<bool>(), 0..400)) {
            let mut p = paddle();
            for right in steps {
                let dir = if right { Direction::Right } else { Direction::Left };
                let before = p.position;
                let moved = p.step(dir);
                prop_assert!(p.position >= p.min_position && p.position <= p.max_position);
                if !moved {
                    prop_assert_eq!(p.position, before);
                }
            }
        }

        #[test]
        fn prop_move_to_clamps(x in -10_000.0f32..10_000.0) {
            let mut p = paddle();
            p.move_to(x);
            prop_assert_eq!(p.position, x.clamp(0.0, 675.0));
        }

        #[test]
        fn prop_envelope_matches_alive_set(
            order in Just((0..15usize).collect::<Vec<_>>()).prop_shuffle()
        ) {
            let mut field = BlockField::new(&Playfield::default());
            for slot in order {
                field.remove(slot);
                let alive: Vec<_> = field.iter_alive().map(|(_, b)| b.rect).collect();
                match field.envelope() {
                    None => prop_assert!(alive.is_empty()),
                    Some(env) => {
                        let left = alive.iter().map(|r| r.left()).fold(f32::INFINITY, f32::min);
                        let right =
                            alive.iter().map(|r| r.right()).fold(f32::NEG_INFINITY, f32::max);
                        let low =
                            alive.iter().map(|r| r.bottom()).fold(f32::NEG_INFINITY, f32::max);
                        prop_assert_eq!(env.left_most_x, left);
                        prop_assert_eq!(env.right_most_x, right);
                        prop_assert_eq!(env.lowest_y, low);
                    }
                }
            }
        }
    }
}
