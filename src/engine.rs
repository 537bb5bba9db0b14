//! Game simulation: phases, the per-cell step and the fixed-timestep clock.
//!
//! [`Game`] owns every piece of mutable game state. Hosts drive it with
//! [`Game::advance`] once per frame, forward player intent through the control
//! methods, and read a [`Snapshot`] to draw. Persistence goes through the
//! injected [`ScoreStore`].

use std::ops::RangeInclusive;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

use crate::grid::{self, Cell, Direction, GRID_SIZE};
use crate::records::{Record, ScoreStore, Timestamp};
use crate::snake::Snake;

// Game constants
pub const INITIAL_LENGTH: i32 = 4;
pub const SCORE_PER_FOOD: u32 = 10;
pub const FOOD_PLACEMENT_ATTEMPTS: usize = 1000;
pub const DEFAULT_SPEED: u32 = 8; // cells per second
pub const SPEED_RANGE: RangeInclusive<u32> = 1..=30;

const INITIAL_DIRECTION: Direction = Direction::Right;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum SpeedError {
    #[error("speed must be at least one cell per second")]
    Zero,
}

/// Snake speed in cells per second. Never zero.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Speed(u32);

impl Speed {
    pub fn new(cells_per_second: u32) -> Result<Self, SpeedError> {
        if cells_per_second == 0 {
            return Err(SpeedError::Zero);
        }
        Ok(Self(cells_per_second))
    }

    pub fn get(self) -> u32 { self.0 }

    pub fn step_interval(self) -> Duration { Duration::from_secs(1) / self.0 }
}

impl Default for Speed {
    fn default() -> Self { Self(DEFAULT_SPEED) }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GamePhase {
    Ready,
    Running,
    Paused,
    Over,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Collision {
    Wall,
    Body,
}

/// What a single call to [`Game::step`] did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// Not running, nothing happened.
    Idle,
    Moved,
    Ate,
    Collided(Collision),
}

/// Source of record timestamps.
pub type Clock = fn() -> Timestamp;

pub fn system_clock() -> Timestamp {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as Timestamp)
        .unwrap_or(0)
}

#[derive(Copy, Clone, Debug, Default)]
pub struct GameConfig {
    pub speed: Speed,
    /// Fixed seed for a reproducible food sequence; entropy when `None`.
    pub seed: Option<u64>,
}

/// Read-only view handed to renderers.
#[derive(Copy, Clone, Debug)]
pub struct Snapshot<'a> {
    pub phase: GamePhase,
    pub snake: &'a Snake,
    pub food: Cell,
    pub score: u32,
    pub high_score: u32,
    pub direction: Direction,
    pub speed: Speed,
}

impl Snapshot<'_> {
    pub fn head(&self) -> Option<Cell> { self.snake.head() }
}

// Result of looking one cell ahead, decided before anything is mutated.
enum StepPlan {
    Collide(Collision),
    Advance { head: Cell, grow: bool },
}

pub struct Game {
    phase: GamePhase,
    snake: Snake,
    food: Cell,
    score: u32,
    high_score: u32,
    direction: Direction,
    next_direction: Direction,
    speed: Speed,
    accumulator: Duration,
    rng: ChaCha8Rng,
    store: Box<dyn ScoreStore>,
    clock: Clock,
}

impl Game {
    pub fn new(config: GameConfig, store: Box<dyn ScoreStore>) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let high_score = store.high_score();
        let mut game = Self {
            phase: GamePhase::Ready,
            snake: Snake::default(),
            food: Cell::new(GRID_SIZE / 2, GRID_SIZE / 2),
            score: 0,
            high_score,
            direction: INITIAL_DIRECTION,
            next_direction: INITIAL_DIRECTION,
            speed: config.speed,
            accumulator: Duration::ZERO,
            rng,
            store,
            clock: system_clock,
        };
        game.initialize();
        game
    }

    /// Replaces the clock used to stamp records.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Fresh episode in the Ready phase. The high score is kept.
    pub fn initialize(&mut self) {
        let row = GRID_SIZE / 2;
        self.snake = Snake::from_cells((0..INITIAL_LENGTH).map(|i| Cell::new(i + 2, row)));
        self.direction = INITIAL_DIRECTION;
        self.next_direction = INITIAL_DIRECTION;
        self.score = 0;
        self.accumulator = Duration::ZERO;
        self.place_food();
        self.set_phase(GamePhase::Ready);
    }

    /// Moves the food to a random free cell.
    ///
    /// Random sampling is tried first. If every attempt lands on the snake the
    /// free cells are enumerated and one is picked uniformly. Only a board with
    /// no free cell at all leaves the food on the snake.
    pub fn place_food(&mut self) {
        let mut candidate = self.food;
        for _ in 0..FOOD_PLACEMENT_ATTEMPTS {
            candidate = Cell::new(self.rng.gen_range(0..GRID_SIZE), self.rng.gen_range(0..GRID_SIZE));
            if !self.snake.occupies(candidate) {
                self.food = candidate;
                return;
            }
        }
        let free: Vec<Cell> = grid::cells().filter(|c| !self.snake.occupies(*c)).collect();
        self.food = free.choose(&mut self.rng).copied().unwrap_or(candidate);
    }

    /// Queues a turn for the next step. Reversing onto the neck is ignored.
    pub fn set_direction(&mut self, dir: Direction) {
        if self.direction.is_opposite(dir) {
            return;
        }
        self.next_direction = dir;
    }

    /// Takes effect on the next [`advance`](Self::advance); accumulated time is kept.
    pub fn set_speed(&mut self, speed: Speed) {
        if speed != self.speed {
            tracing::debug!("speed changed: {} -> {} cells/s", self.speed.get(), speed.get());
        }
        self.speed = speed;
    }

    pub fn start(&mut self) {
        match self.phase {
            GamePhase::Running => return,
            GamePhase::Over => self.initialize(),
            GamePhase::Ready | GamePhase::Paused => {}
        }
        self.set_phase(GamePhase::Running);
    }

    pub fn pause(&mut self) {
        if self.phase == GamePhase::Running {
            self.set_phase(GamePhase::Paused);
        }
    }

    pub fn toggle(&mut self) {
        if self.phase == GamePhase::Running { self.pause() } else { self.start() }
    }

    pub fn restart(&mut self) { self.initialize(); }

    /// Feeds frame time into the fixed-timestep clock and runs every step it
    /// has paid for. There is no cap: a long stall is caught up in one call.
    /// Returns the number of steps taken.
    pub fn advance(&mut self, elapsed: Duration) -> usize {
        if self.phase != GamePhase::Running {
            return 0;
        }
        self.accumulator += elapsed;
        let interval = self.speed.step_interval();
        let mut steps = 0;
        while self.phase == GamePhase::Running && self.accumulator >= interval {
            self.step();
            self.accumulator -= interval;
            steps += 1;
        }
        steps
    }

    /// Moves the snake one cell. Does nothing outside the Running phase.
    pub fn step(&mut self) -> StepOutcome {
        if self.phase != GamePhase::Running {
            return StepOutcome::Idle;
        }
        // a reversal that got queued anyway is refused here as well
        if !self.direction.is_opposite(self.next_direction) {
            self.direction = self.next_direction;
        }
        let Some(head) = self.snake.head() else {
            return StepOutcome::Idle;
        };

        match self.plan(head) {
            StepPlan::Collide(collision) => {
                self.game_over(collision);
                StepOutcome::Collided(collision)
            }
            StepPlan::Advance { head, grow } => {
                self.snake.advance(head, grow);
                if grow {
                    self.eat();
                    StepOutcome::Ate
                } else {
                    StepOutcome::Moved
                }
            }
        }
    }

    fn plan(&self, head: Cell) -> StepPlan {
        let next = head.step(self.direction);
        if !next.in_bounds() {
            return StepPlan::Collide(Collision::Wall);
        }
        let grow = next == self.food;
        // the tail cell frees up this step unless the snake grows
        if self.snake.occupies(next) && (grow || self.snake.tail() != Some(next)) {
            return StepPlan::Collide(Collision::Body);
        }
        StepPlan::Advance { head: next, grow }
    }

    fn eat(&mut self) {
        self.score += SCORE_PER_FOOD;
        if self.score > self.high_score {
            self.high_score = self.score;
            self.store.save_high_score(self.high_score);
            tracing::info!("new high score {}", self.high_score);
        }
        self.place_food();
    }

    fn game_over(&mut self, collision: Collision) {
        self.set_phase(GamePhase::Over);
        tracing::info!(
            "game over: cause={:?} score={} length={} best={}",
            collision,
            self.score,
            self.snake.len(),
            self.high_score
        );
        if self.score > 0 {
            self.store.submit(self.score, (self.clock)());
        }
    }

    fn set_phase(&mut self, phase: GamePhase) {
        if phase != self.phase {
            tracing::debug!("phase {:?} -> {:?}", self.phase, phase);
        }
        self.phase = phase;
    }

    pub fn phase(&self) -> GamePhase { self.phase }

    pub fn snake(&self) -> &Snake { &self.snake }

    pub fn food(&self) -> Cell { self.food }

    pub fn score(&self) -> u32 { self.score }

    pub fn high_score(&self) -> u32 { self.high_score }

    pub fn direction(&self) -> Direction { self.direction }

    pub fn pending_direction(&self) -> Direction { self.next_direction }

    pub fn speed(&self) -> Speed { self.speed }

    /// Frame time not yet spent on a step.
    pub fn accumulated(&self) -> Duration { self.accumulator }

    /// Stored records, best first, for display.
    pub fn records(&self) -> Vec<Record> { self.store.records() }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            phase: self.phase,
            snake: &self.snake,
            food: self.food,
            score: self.score,
            high_score: self.high_score,
            direction: self.direction,
            speed: self.speed,
        }
    }
}
