//! Board geometry: the square grid, its cells and the four headings.

/// Cells per side of the square board.
pub const GRID_SIZE: i32 = 21;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    /// Unit vector, y grows downwards.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn is_opposite(self, other: Direction) -> bool {
        let (ax, ay) = self.delta();
        let (bx, by) = other.delta();
        ax + bx == 0 && ay + by == 0
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self { Self { x, y } }

    /// Neighbour one cell away. May lie off the board; check with [`in_bounds`].
    pub fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.delta();
        Cell { x: self.x + dx, y: self.y + dy }
    }

    pub fn in_bounds(self) -> bool { in_bounds(self) }
}

pub fn in_bounds(c: Cell) -> bool {
    (0..GRID_SIZE).contains(&c.x) && (0..GRID_SIZE).contains(&c.y)
}

/// Every cell on the board, row by row.
pub fn cells() -> impl Iterator<Item = Cell> {
    (0..GRID_SIZE).flat_map(|y| (0..GRID_SIZE).map(move |x| Cell { x, y }))
}

pub const CELL_COUNT: usize = (GRID_SIZE * GRID_SIZE) as usize;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_negates_the_vector() {
        for d in Direction::ALL {
            let (dx, dy) = d.delta();
            assert_eq!(d.opposite().delta(), (-dx, -dy));
            assert!(d.is_opposite(d.opposite()));
            assert!(!d.is_opposite(d));
        }
    }

    #[test]
    fn bounds_are_half_open() {
        assert!(in_bounds(Cell::new(0, 0)));
        assert!(in_bounds(Cell::new(GRID_SIZE - 1, GRID_SIZE - 1)));
        assert!(!in_bounds(Cell::new(-1, 0)));
        assert!(!in_bounds(Cell::new(0, GRID_SIZE)));
        assert!(!Cell::new(GRID_SIZE, 3).in_bounds());
    }

    #[test]
    fn step_moves_one_cell() {
        let c = Cell::new(5, 5);
        assert_eq!(c.step(Direction::Up), Cell::new(5, 4));
        assert_eq!(c.step(Direction::Down), Cell::new(5, 6));
        assert_eq!(c.step(Direction::Left), Cell::new(4, 5));
        assert_eq!(c.step(Direction::Right), Cell::new(6, 5));
    }

    #[test]
    fn cells_cover_the_board() {
        assert_eq!(cells().count(), CELL_COUNT);
        assert!(cells().all(in_bounds));
    }
}
