//! Macroquad drawing of a [`Snapshot`]. Nothing here feeds back into the game.

use macroquad::prelude::*;

use crate::engine::{GamePhase, Snapshot};
use crate::grid::{Cell, Direction, GRID_SIZE};
use crate::input::PadButton;
use crate::records::{Record, Timestamp};

// Palette
const BACKGROUND: Color = Color::new(0.06, 0.07, 0.13, 1.0);
const GRID_LINE: Color = Color::new(1.0, 1.0, 1.0, 0.06);
const BOARD_FILL: Color = Color::new(1.0, 1.0, 1.0, 0.02);
const SNAKE_BODY: Color = Color::new(0.13, 0.77, 0.37, 1.0); // green
const SNAKE_BODY_LIGHT: Color = Color::new(0.43, 0.84, 1.0, 1.0); // cyan
const SNAKE_HEAD: Color = Color::new(1.0, 0.82, 0.4, 1.0); // amber
const SNAKE_EYE: Color = Color::new(0.06, 0.07, 0.13, 1.0);
const FOOD_RIM: Color = Color::new(0.96, 0.62, 0.04, 1.0); // gold
const FOOD_FACE: Color = Color::new(0.99, 0.9, 0.54, 1.0);
const HUD_TEXT: Color = Color::new(0.85, 0.88, 0.95, 1.0);
const DIM_TEXT: Color = Color::new(0.55, 0.6, 0.7, 1.0);
const OVERLAY: Color = Color::new(0.0, 0.0, 0.0, 0.45);
const PAD_FILL: Color = Color::new(1.0, 1.0, 1.0, 0.08);

const HUD_HEIGHT: f32 = 40.0;
const MARGIN: f32 = 16.0;

pub fn background() -> Color { BACKGROUND }

/// Screen-space placement of the board, the side panel and the touch pad.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoardLayout {
    pub origin: Vec2,
    pub cell: f32,
    pub panel: Rect,
    pub pad: [(PadButton, Rect); 4],
}

impl BoardLayout {
    /// Board on the left (landscape) or on top (portrait), panel in the rest.
    pub fn new(screen_w: f32, screen_h: f32) -> Self {
        let body_h = (screen_h - HUD_HEIGHT).max(0.0);
        let (region, panel) = if screen_w >= screen_h {
            let split = screen_w * 0.66;
            (Rect::new(0.0, HUD_HEIGHT, split, body_h), Rect::new(split, HUD_HEIGHT, screen_w - split, body_h))
        } else {
            let split = body_h * 0.66;
            (Rect::new(0.0, HUD_HEIGHT, screen_w, split), Rect::new(0.0, HUD_HEIGHT + split, screen_w, body_h - split))
        };

        let usable = (region.w.min(region.h) - 2.0 * MARGIN).max(GRID_SIZE as f32);
        let cell = (usable / GRID_SIZE as f32).floor().max(1.0);
        let side = cell * GRID_SIZE as f32;
        let origin = vec2(region.x + (region.w - side) * 0.5, region.y + (region.h - side) * 0.5);

        let b = (panel.w.min(panel.h * 0.5) / 3.0 * 0.9).max(1.0);
        let c = vec2(panel.x + panel.w * 0.5, panel.y + panel.h - 1.5 * b - MARGIN);
        let pad = [
            (PadButton::Up, Rect::new(c.x - 0.5 * b, c.y - 1.5 * b, b, b)),
            (PadButton::Down, Rect::new(c.x - 0.5 * b, c.y + 0.5 * b, b, b)),
            (PadButton::Left, Rect::new(c.x - 1.5 * b, c.y - 0.5 * b, b, b)),
            (PadButton::Right, Rect::new(c.x + 0.5 * b, c.y - 0.5 * b, b, b)),
        ];

        Self { origin, cell, panel, pad }
    }

    pub fn board_rect(&self) -> Rect {
        let side = self.cell * GRID_SIZE as f32;
        Rect::new(self.origin.x, self.origin.y, side, side)
    }

    pub fn cell_rect(&self, c: Cell) -> Rect {
        Rect::new(self.origin.x + c.x as f32 * self.cell, self.origin.y + c.y as f32 * self.cell, self.cell, self.cell)
    }

    /// Pad button under a screen point, if any.
    pub fn pad_at(&self, point: Vec2) -> Option<PadButton> {
        self.pad.iter().find(|(_, r)| r.contains(point)).map(|(b, _)| *b)
    }
}

/// Title and hint shown over the board while the game is not running.
pub fn overlay_text(snap: &Snapshot<'_>) -> Option<(String, String)> {
    match snap.phase {
        GamePhase::Running => None,
        GamePhase::Ready => Some(("READY".to_string(), "Space, Enter or tap to start".to_string())),
        GamePhase::Paused => Some(("PAUSED".to_string(), "Space to resume".to_string())),
        GamePhase::Over => Some((
            "GAME OVER".to_string(),
            format!("Score {} - Best {} - R to restart", snap.score, snap.high_score),
        )),
    }
}

/// Short age of a record, e.g. "5m ago".
pub fn format_age(now: Timestamp, then: Timestamp) -> String {
    let secs = now.saturating_sub(then) / 1000;
    match secs {
        0..=59 => "just now".to_string(),
        60..=3_599 => format!("{}m ago", secs / 60),
        3_600..=86_399 => format!("{}h ago", secs / 3_600),
        _ => format!("{}d ago", secs / 86_400),
    }
}

pub fn draw(snap: &Snapshot<'_>, records: &[Record], layout: &BoardLayout, now: Timestamp) {
    draw_hud(snap);
    draw_board(layout);
    draw_food(snap.food, layout);
    draw_snake(snap, layout);
    if let Some((title, hint)) = overlay_text(snap) {
        draw_overlay(&title, &hint, layout);
    }
    draw_records(records, layout, now);
    draw_pad(layout);
}

fn draw_hud(snap: &Snapshot<'_>) {
    let line = format!("Score: {}   Best: {}   Speed: {}/s", snap.score, snap.high_score, snap.speed.get());
    draw_text(&line, MARGIN, 28.0, 24.0, HUD_TEXT);
    let hint = "Arrows/WASD move  Space pause  R restart  [ ] speed";
    let m = measure_text(hint, None, 16, 1.0);
    draw_text(hint, screen_width() - m.width - MARGIN, 26.0, 16.0, DIM_TEXT);
}

fn draw_board(layout: &BoardLayout) {
    let r = layout.board_rect();
    draw_rectangle(r.x, r.y, r.w, r.h, BOARD_FILL);
    let thickness = (layout.cell / 12.0).floor().max(1.0);
    for i in 1..GRID_SIZE {
        let p = i as f32 * layout.cell;
        draw_line(r.x + p, r.y, r.x + p, r.y + r.h, thickness, GRID_LINE);
        draw_line(r.x, r.y + p, r.x + r.w, r.y + p, thickness, GRID_LINE);
    }
    draw_rectangle_lines(r.x, r.y, r.w, r.h, 2.0, GRID_LINE);
}

fn draw_food(food: Cell, layout: &BoardLayout) {
    let r = layout.cell_rect(food);
    let c = r.center();
    let radius = (layout.cell * 0.36).max(3.0);
    draw_circle(c.x, c.y, radius, FOOD_RIM);
    draw_circle(c.x, c.y, radius * 0.72, FOOD_FACE);
}

fn draw_snake(snap: &Snapshot<'_>, layout: &BoardLayout) {
    let pad = (layout.cell * 0.12).floor();
    let len = snap.snake.len().max(1) as f32;
    for (i, c) in snap.snake.cells().enumerate() {
        // tail fades from cyan to green towards the head
        let t = i as f32 / len;
        let color = Color::new(
            SNAKE_BODY_LIGHT.r + (SNAKE_BODY.r - SNAKE_BODY_LIGHT.r) * t,
            SNAKE_BODY_LIGHT.g + (SNAKE_BODY.g - SNAKE_BODY_LIGHT.g) * t,
            SNAKE_BODY_LIGHT.b + (SNAKE_BODY.b - SNAKE_BODY_LIGHT.b) * t,
            1.0,
        );
        let r = layout.cell_rect(c);
        draw_rectangle(r.x + pad, r.y + pad, r.w - 2.0 * pad, r.h - 2.0 * pad, color);
    }

    let Some(head) = snap.head() else { return };
    let r = layout.cell_rect(head);
    let inner = Rect::new(r.x + pad, r.y + pad, r.w - 2.0 * pad, r.h - 2.0 * pad);
    draw_rectangle(inner.x, inner.y, inner.w, inner.h, SNAKE_HEAD);
    draw_rectangle_lines(inner.x, inner.y, inner.w, inner.h, 1.5, WHITE);
    draw_head_marker(inner, snap.direction);
}

fn draw_head_marker(r: Rect, dir: Direction) {
    let c = r.center();
    let (dx, dy) = dir.delta();
    let forward = vec2(dx as f32, dy as f32);
    let side = vec2(-forward.y, forward.x);
    let reach = r.w * 0.35;

    let eye_r = (r.w * 0.08).max(1.0);
    for s in [-1.0, 1.0] {
        let e = c + forward * reach + side * (s * reach);
        draw_circle(e.x, e.y, eye_r, SNAKE_EYE);
    }
    let tip = c + forward * reach;
    let back = c - forward * (reach * 0.5);
    draw_triangle(tip, back + side * (reach * 0.4), back - side * (reach * 0.4), Color::new(0.0, 0.0, 0.0, 0.25));
}

fn draw_overlay(title: &str, hint: &str, layout: &BoardLayout) {
    let r = layout.board_rect();
    draw_rectangle(r.x, r.y, r.w, r.h, OVERLAY);
    let tm = measure_text(title, None, 36, 1.0);
    let y = r.y + r.h * 0.45;
    draw_text(title, r.x + (r.w - tm.width) * 0.5, y, 36.0, SNAKE_HEAD);
    let hm = measure_text(hint, None, 20, 1.0);
    draw_text(hint, r.x + (r.w - hm.width) * 0.5, y + 32.0, 20.0, WHITE);
}

fn draw_records(records: &[Record], layout: &BoardLayout, now: Timestamp) {
    let p = layout.panel;
    let mut y = p.y + MARGIN + 20.0;
    draw_text("TOP 10", p.x + MARGIN, y, 22.0, HUD_TEXT);
    y += 26.0;
    if records.is_empty() {
        draw_text("No records yet", p.x + MARGIN, y, 18.0, DIM_TEXT);
        return;
    }
    for (i, r) in records.iter().enumerate() {
        let line = format!("{:>2}. {:>5}   {}", i + 1, r.score, format_age(now, r.time));
        draw_text(&line, p.x + MARGIN, y, 18.0, if i == 0 { SNAKE_HEAD } else { HUD_TEXT });
        y += 20.0;
    }
}

fn draw_pad(layout: &BoardLayout) {
    for (button, r) in &layout.pad {
        draw_rectangle(r.x, r.y, r.w, r.h, PAD_FILL);
        draw_rectangle_lines(r.x, r.y, r.w, r.h, 1.0, GRID_LINE);
        let c = r.center();
        let (dx, dy) = button.direction().delta();
        let forward = vec2(dx as f32, dy as f32);
        let side = vec2(-forward.y, forward.x);
        let s = r.w * 0.25;
        draw_triangle(c + forward * s, c - forward * s + side * s, c - forward * s - side * s, DIM_TEXT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Game, GameConfig};
    use crate::records::{MemoryStorage, Scoreboard};

    #[test]
    fn board_fits_inside_the_screen() {
        for (w, h) in [(1280.0, 720.0), (390.0, 844.0), (200.0, 200.0)] {
            let l = BoardLayout::new(w, h);
            let b = l.board_rect();
            assert!(b.x >= 0.0 && b.y >= HUD_HEIGHT, "{w}x{h}");
            assert!(b.x + b.w <= w && b.y + b.h <= h, "{w}x{h}");
            assert_eq!(l.cell.fract(), 0.0);
        }
    }

    #[test]
    fn pad_hit_testing_finds_each_button() {
        let l = BoardLayout::new(1280.0, 720.0);
        for (button, r) in l.pad {
            assert_eq!(l.pad_at(r.center()), Some(button));
        }
        assert_eq!(l.pad_at(l.board_rect().center()), None);
    }

    #[test]
    fn overlay_follows_the_phase() {
        let mut g = Game::new(GameConfig { seed: Some(3), ..GameConfig::default() }, Box::new(Scoreboard::new(MemoryStorage::default())));
        assert_eq!(overlay_text(&g.snapshot()).map(|(t, _)| t).as_deref(), Some("READY"));
        g.start();
        assert!(overlay_text(&g.snapshot()).is_none());
        g.pause();
        assert_eq!(overlay_text(&g.snapshot()).map(|(t, _)| t).as_deref(), Some("PAUSED"));
    }

    #[test]
    fn ages_are_coarse() {
        assert_eq!(format_age(10_000, 9_000), "just now");
        assert_eq!(format_age(5 * 60_000, 0), "5m ago");
        assert_eq!(format_age(3 * 3_600_000, 0), "3h ago");
        assert_eq!(format_age(2 * 86_400_000, 0), "2d ago");
        assert_eq!(format_age(0, 5_000), "just now");
    }
}
