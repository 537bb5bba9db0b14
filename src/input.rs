//! Turns raw keys, key names and touch-pad taps into game actions.

use macroquad::input::KeyCode;

use crate::engine::{Game, GamePhase, SPEED_RANGE, Speed};
use crate::grid::Direction;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Steer(Direction),
    /// Directional tap on the touch pad: steer, and start if not running.
    Tap(Direction),
    Toggle,
    Start,
    Restart,
    SpeedUp,
    SlowDown,
    Quit,
}

/// What the host should do after an action was applied.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// Arrow keys and WASD. Key codes carry no case, so `w` and `W` are the same key.
pub fn direction_for_key(key: KeyCode) -> Option<Direction> {
    match key {
        KeyCode::Up | KeyCode::W => Some(Direction::Up),
        KeyCode::Down | KeyCode::S => Some(Direction::Down),
        KeyCode::Left | KeyCode::A => Some(Direction::Left),
        KeyCode::Right | KeyCode::D => Some(Direction::Right),
        _ => None,
    }
}

pub fn action_for_key(key: KeyCode) -> Option<Action> {
    if let Some(dir) = direction_for_key(key) {
        return Some(Action::Steer(dir));
    }
    match key {
        KeyCode::Space => Some(Action::Toggle),
        KeyCode::Enter | KeyCode::KpEnter => Some(Action::Start),
        KeyCode::R => Some(Action::Restart),
        KeyCode::RightBracket | KeyCode::Equal => Some(Action::SpeedUp),
        KeyCode::LeftBracket | KeyCode::Minus => Some(Action::SlowDown),
        KeyCode::Escape | KeyCode::Q => Some(Action::Quit),
        _ => None,
    }
}

/// Same table for hosts that report keys by name ("ArrowUp", "w", " ", ...).
pub fn action_for_key_name(name: &str) -> Option<Action> {
    let action = match name {
        "ArrowUp" | "w" | "W" => Action::Steer(Direction::Up),
        "ArrowDown" | "s" | "S" => Action::Steer(Direction::Down),
        "ArrowLeft" | "a" | "A" => Action::Steer(Direction::Left),
        "ArrowRight" | "d" | "D" => Action::Steer(Direction::Right),
        " " | "Space" => Action::Toggle,
        "Enter" => Action::Start,
        "r" | "R" => Action::Restart,
        "]" | "=" | "+" => Action::SpeedUp,
        "[" | "-" => Action::SlowDown,
        "Escape" | "q" | "Q" => Action::Quit,
        _ => return None,
    };
    Some(action)
}

/// On-screen directional buttons.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PadButton {
    Up,
    Down,
    Left,
    Right,
}

impl PadButton {
    pub const ALL: [PadButton; 4] = [PadButton::Up, PadButton::Down, PadButton::Left, PadButton::Right];

    pub fn direction(self) -> Direction {
        match self {
            PadButton::Up => Direction::Up,
            PadButton::Down => Direction::Down,
            PadButton::Left => Direction::Left,
            PadButton::Right => Direction::Right,
        }
    }

    pub fn action(self) -> Action { Action::Tap(self.direction()) }
}

/// Applies `action` to the game through its control surface.
pub fn apply(game: &mut Game, action: Action) -> Control {
    match action {
        Action::Steer(dir) => game.set_direction(dir),
        Action::Tap(dir) => {
            game.set_direction(dir);
            if game.phase() != GamePhase::Running {
                game.start();
            }
        }
        Action::Toggle => game.toggle(),
        Action::Start => game.start(),
        Action::Restart => game.restart(),
        Action::SpeedUp => nudge_speed(game, 1),
        Action::SlowDown => nudge_speed(game, -1),
        Action::Quit => return Control::Quit,
    }
    Control::Continue
}

fn nudge_speed(game: &mut Game, delta: i32) {
    let current = game.speed().get();
    let wanted = current.saturating_add_signed(delta).clamp(*SPEED_RANGE.start(), *SPEED_RANGE.end());
    if let Ok(speed) = Speed::new(wanted) {
        game.set_speed(speed);
    }
}
