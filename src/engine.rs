// the turn engine owns the single game state: where the token is and whether
// the game is over. a roll either happens at once (request_roll) or goes
// through a short cosmetic animation driven by tick(), which never blocks
use std::fmt;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::board::{portal_at, Portal, Tile, NUM_TILES, START_TILE};
use crate::config::GameConfig;

pub const DIE_FACES: u8 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Rolling,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Moved,
    /// the roll would have gone past the last tile, the turn is spent in place
    Overshoot,
    Won,
}

/// Everything that happened during one roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Turn {
    pub die: u8,
    pub from: Tile,
    /// `from + die`, may lie past the board on an overshoot
    pub target: Tile,
    /// where the token touched down before any portal
    pub landed: Tile,
    pub position: Tile,
    pub outcome: Outcome,
    pub portal: Option<Portal>,
}

impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rolled a {}. ", self.die)?;
        match (self.outcome, self.portal) {
            (Outcome::Overshoot, _) => write!(f, "Roll too high, stay put."),
            (Outcome::Won, _) => write!(f, "You win!"),
            (Outcome::Moved, Some(portal)) => write!(
                f,
                "Landed on a {} from {} to {}!",
                portal.kind().name(),
                portal.from,
                portal.to
            ),
            (Outcome::Moved, None) => write!(f, "Moved to {}.", self.position),
        }
    }
}

#[derive(Debug, Clone)]
struct RollTimer {
    faces_left: u32,
    next_face: Instant,
    face: Option<u8>,
}

#[derive(Debug, Clone)]
pub struct TurnEngine<R: Rng = StdRng> {
    position: Tile,
    phase: Phase,
    last_roll: Option<u8>,
    rolling: Option<RollTimer>,
    roll_frames: u32,
    roll_frame_interval: Duration,
    rng: R,
}

impl TurnEngine<StdRng> {
    pub fn from_config(config: &GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        TurnEngine::new(rng).with_animation(config.roll_frames, config.roll_frame_interval)
    }
}

impl<R: Rng> TurnEngine<R> {
    pub fn new(rng: R) -> Self {
        let config = GameConfig::default();
        TurnEngine {
            position: START_TILE,
            phase: Phase::Idle,
            last_roll: None,
            rolling: None,
            roll_frames: config.roll_frames,
            roll_frame_interval: config.roll_frame_interval,
            rng,
        }
    }

    pub fn with_animation(mut self, frames: u32, interval: Duration) -> Self {
        self.roll_frames = frames;
        self.roll_frame_interval = interval;
        self
    }

    /// Places the token on `position`, clamped to the board. Landing on the
    /// last tile this way finishes the game.
    pub fn with_position(mut self, position: Tile) -> Self {
        self.position = position.clamp(START_TILE, NUM_TILES);
        self.phase = if self.position == NUM_TILES {
            Phase::Finished
        } else {
            Phase::Idle
        };
        self
    }

    pub fn position(&self) -> Tile {
        self.position
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase == Phase::Idle
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// The die face to show: the committed roll, or the face flashing during
    /// an animation. `None` before the first roll.
    pub fn last_roll(&self) -> Option<u8> {
        self.rolling
            .as_ref()
            .and_then(|timer| timer.face)
            .or(self.last_roll)
    }

    /// Rolls and resolves the move at once. Does nothing unless idle.
    pub fn request_roll(&mut self) -> Option<Turn> {
        if !self.is_idle() {
            return None;
        }
        let die = self.sample_die();
        Some(self.commit(die))
    }

    /// Resolves a move with a given die value instead of a random one.
    pub fn resolve_roll(&mut self, die: u8) -> Option<Turn> {
        if !self.is_idle() || !(1..=DIE_FACES).contains(&die) {
            return None;
        }
        Some(self.commit(die))
    }

    /// Starts the rolling animation. Returns false if a roll can't start now.
    pub fn begin_roll(&mut self, now: Instant) -> bool {
        if !self.is_idle() {
            return false;
        }
        self.phase = Phase::Rolling;
        self.rolling = Some(RollTimer {
            faces_left: self.roll_frames,
            next_face: now,
            face: None,
        });
        true
    }

    /// Advances the rolling animation to `now`. Once every face has been shown
    /// for its interval, the last face becomes the roll and the move resolves.
    pub fn tick(&mut self, now: Instant) -> Option<Turn> {
        let timer = self.rolling.as_mut()?;
        while timer.faces_left > 0 && now >= timer.next_face {
            timer.face = Some(self.rng.random_range(1..=DIE_FACES));
            timer.faces_left -= 1;
            timer.next_face += self.roll_frame_interval;
        }
        if timer.faces_left > 0 || now < timer.next_face {
            return None;
        }
        let face = timer.face;
        self.rolling = None;
        self.phase = Phase::Idle;
        let die = match face {
            Some(die) => die,
            None => self.sample_die(),
        };
        Some(self.commit(die))
    }

    fn sample_die(&mut self) -> u8 {
        self.rng.random_range(1..=DIE_FACES)
    }

    fn commit(&mut self, die: u8) -> Turn {
        let from = self.position;
        let target = from + Tile::from(die);
        self.last_roll = Some(die);

        if target > NUM_TILES {
            return Turn {
                die,
                from,
                target,
                landed: from,
                position: from,
                outcome: Outcome::Overshoot,
                portal: None,
            };
        }

        if target == NUM_TILES {
            self.position = NUM_TILES;
            self.phase = Phase::Finished;
            return Turn {
                die,
                from,
                target,
                landed: target,
                position: target,
                outcome: Outcome::Won,
                portal: None,
            };
        }

        // one hop only, a destination is never followed again
        let portal = portal_at(target);
        self.position = portal.map_or(target, |portal| portal.to);
        Turn {
            die,
            from,
            target,
            landed: target,
            position: self.position,
            outcome: Outcome::Moved,
            portal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::PortalKind;

    fn engine_at(position: Tile) -> TurnEngine {
        TurnEngine::new(StdRng::seed_from_u64(7)).with_position(position)
    }

    #[test]
    fn new_engine_starts_idle_on_tile_one() {
        let engine = engine_at(START_TILE);
        assert_eq!(engine.position(), 1);
        assert_eq!(engine.phase(), Phase::Idle);
        assert_eq!(engine.last_roll(), None);
    }

    #[test]
    fn plain_move() {
        let mut engine = engine_at(1);
        let turn = engine.resolve_roll(1).unwrap();
        assert_eq!(turn.position, 2);
        assert_eq!(turn.outcome, Outcome::Moved);
        assert_eq!(turn.portal, None);
        assert_eq!(engine.last_roll(), Some(1));
    }

    #[test]
    fn ladder_from_four() {
        let mut engine = engine_at(1);
        let turn = engine.resolve_roll(3).unwrap();
        assert_eq!(turn.landed, 4);
        assert_eq!(engine.position(), 14);
        assert_eq!(turn.portal.map(|p| p.kind()), Some(PortalKind::Ladder));
        assert_eq!(turn.to_string(), "Rolled a 3. Landed on a ladder from 4 to 14!");
    }

    #[test]
    fn snake_on_sixty_two() {
        let mut engine = engine_at(56);
        let turn = engine.resolve_roll(6).unwrap();
        assert_eq!(turn.target, 62);
        assert_eq!(engine.position(), 19);
        assert_eq!(turn.portal.map(|p| p.kind()), Some(PortalKind::Snake));
    }

    #[test]
    fn overshoot_stays_put() {
        let mut engine = engine_at(97);
        let turn = engine.resolve_roll(6).unwrap();
        assert_eq!(turn.outcome, Outcome::Overshoot);
        assert_eq!(turn.target, 103);
        assert_eq!(engine.position(), 97);
        assert_eq!(engine.phase(), Phase::Idle);
        assert_eq!(turn.to_string(), "Rolled a 6. Roll too high, stay put.");
    }

    #[test]
    fn exact_roll_wins() {
        let mut engine = engine_at(94);
        let turn = engine.resolve_roll(6).unwrap();
        assert_eq!(turn.outcome, Outcome::Won);
        assert_eq!(engine.position(), 100);
        assert!(engine.is_finished());
    }

    #[test]
    fn finished_engine_ignores_rolls() {
        let mut engine = engine_at(94);
        engine.resolve_roll(6);
        assert_eq!(engine.request_roll(), None);
        assert_eq!(engine.resolve_roll(1), None);
        assert!(!engine.begin_roll(Instant::now()));
        assert_eq!(engine.position(), 100);
        assert_eq!(engine.last_roll(), Some(6));
    }

    #[test]
    fn bad_die_values_are_rejected() {
        let mut engine = engine_at(1);
        assert_eq!(engine.resolve_roll(0), None);
        assert_eq!(engine.resolve_roll(7), None);
        assert_eq!(engine.position(), 1);
    }

    #[test]
    fn with_position_clamps_to_the_board() {
        assert_eq!(engine_at(0).position(), 1);
        let engine = engine_at(250);
        assert_eq!(engine.position(), 100);
        assert!(engine.is_finished());
    }

    #[test]
    fn animation_commits_after_every_face() {
        let interval = Duration::from_millis(100);
        let mut engine = engine_at(1).with_animation(5, interval);
        let start = Instant::now();

        assert!(engine.begin_roll(start));
        assert_eq!(engine.phase(), Phase::Rolling);
        // no second roll while one is in flight
        assert!(!engine.begin_roll(start));
        assert_eq!(engine.request_roll(), None);

        assert_eq!(engine.tick(start), None);
        assert!(engine.last_roll().is_some());
        assert_eq!(engine.tick(start + interval * 4), None);
        assert_eq!(engine.phase(), Phase::Rolling);

        let shown = engine.last_roll();
        let turn = engine.tick(start + interval * 5).unwrap();
        assert_eq!(Some(turn.die), shown);
        assert_ne!(engine.phase(), Phase::Rolling);
        assert_eq!(engine.tick(start + interval * 6), None);
    }

    #[test]
    fn animation_without_frames_rolls_on_first_tick() {
        let mut engine = engine_at(1).with_animation(0, Duration::from_millis(100));
        let start = Instant::now();
        assert!(engine.begin_roll(start));
        let turn = engine.tick(start).unwrap();
        assert!((1..=DIE_FACES).contains(&turn.die));
        assert!(engine.is_idle());
    }

    #[test]
    fn tick_while_idle_does_nothing() {
        let mut engine = engine_at(1);
        assert_eq!(engine.tick(Instant::now()), None);
        assert_eq!(engine.position(), 1);
    }

    #[test]
    fn seeded_engines_agree() {
        let config = GameConfig::default().with_seed(42);
        let mut a = TurnEngine::from_config(&config);
        let mut b = TurnEngine::from_config(&config);
        for _ in 0..20 {
            assert_eq!(a.request_roll(), b.request_roll());
        }
    }
}
