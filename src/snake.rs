use std::collections::{HashSet, VecDeque};

use crate::grid::Cell;

/// Snake body stored tail-first, head-last, alongside the set of covered cells.
///
/// Both structures are only mutated together, so `occupied` always equals the
/// set of cells in `body`.
#[derive(Clone, Debug, Default)]
pub struct Snake {
    body: VecDeque<Cell>,
    occupied: HashSet<Cell>,
}

impl Snake {
    /// Builds a snake from cells ordered tail-first. Duplicate cells are skipped.
    pub fn from_cells<I: IntoIterator<Item = Cell>>(cells: I) -> Self {
        let mut snake = Snake::default();
        for c in cells {
            if snake.occupied.insert(c) {
                snake.body.push_back(c);
            }
        }
        snake
    }

    pub fn len(&self) -> usize { self.body.len() }

    pub fn is_empty(&self) -> bool { self.body.is_empty() }

    pub fn head(&self) -> Option<Cell> { self.body.back().copied() }

    pub fn tail(&self) -> Option<Cell> { self.body.front().copied() }

    pub fn occupies(&self, c: Cell) -> bool { self.occupied.contains(&c) }

    /// Cells tail-first.
    pub fn cells(&self) -> impl DoubleEndedIterator<Item = Cell> + ExactSizeIterator + '_ {
        self.body.iter().copied()
    }

    pub fn occupied(&self) -> &HashSet<Cell> { &self.occupied }

    /// Applies one move: the new head goes in, and unless the snake grows the
    /// tail comes out. The tail is released before the head is recorded so a
    /// head entering the vacated tail cell stays in the occupancy set.
    pub(crate) fn advance(&mut self, new_head: Cell, grow: bool) {
        if !grow {
            if let Some(tail) = self.body.pop_front() {
                self.occupied.remove(&tail);
            }
        }
        self.body.push_back(new_head);
        self.occupied.insert(new_head);
    }

    #[cfg(test)]
    pub(crate) fn in_sync(&self) -> bool {
        self.occupied.len() == self.body.len() && self.body.iter().all(|c| self.occupied.contains(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(xs: std::ops::Range<i32>, y: i32) -> Snake {
        Snake::from_cells(xs.map(|x| Cell::new(x, y)))
    }

    #[test]
    fn head_is_last_tail_is_first() {
        let s = row(2..6, 10);
        assert_eq!(s.tail(), Some(Cell::new(2, 10)));
        assert_eq!(s.head(), Some(Cell::new(5, 10)));
        assert_eq!(s.len(), 4);
        assert!(s.in_sync());
    }

    #[test]
    fn advance_without_growth_keeps_length() {
        let mut s = row(2..6, 10);
        s.advance(Cell::new(6, 10), false);
        assert_eq!(s.len(), 4);
        assert!(!s.occupies(Cell::new(2, 10)));
        assert!(s.occupies(Cell::new(6, 10)));
        assert!(s.in_sync());
    }

    #[test]
    fn advance_with_growth_keeps_tail() {
        let mut s = row(2..6, 10);
        s.advance(Cell::new(6, 10), true);
        assert_eq!(s.len(), 5);
        assert_eq!(s.tail(), Some(Cell::new(2, 10)));
        assert!(s.in_sync());
    }

    #[test]
    fn head_may_take_over_the_vacated_tail() {
        // 2x2 loop: tail at (0,0), head at (0,1)
        let mut s = Snake::from_cells([Cell::new(0, 0), Cell::new(1, 0), Cell::new(1, 1), Cell::new(0, 1)]);
        s.advance(Cell::new(0, 0), false);
        assert_eq!(s.head(), Some(Cell::new(0, 0)));
        assert_eq!(s.len(), 4);
        assert!(s.occupies(Cell::new(0, 0)));
        assert!(s.in_sync());
    }

    #[test]
    fn duplicates_are_dropped_on_build() {
        let s = Snake::from_cells([Cell::new(1, 1), Cell::new(1, 1), Cell::new(2, 1)]);
        assert_eq!(s.len(), 2);
        assert!(s.in_sync());
    }
}
