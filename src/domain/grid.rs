/// Grid model: cells, directions and the toroidal board.
///
/// The board is `width × height` cells. Moving off one edge re-enters
/// at the opposite edge; there are no walls.

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Cell { x, y }
    }

    /// Neighbouring cell in `dir`, without wrapping.
    pub fn step(self, dir: Direction) -> Cell {
        let (dx, dy) = dir.delta();
        Cell::new(self.x + dx, self.y + dy)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit vector. Screen coordinates: y grows downward.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up    => (0, -1),
            Direction::Down  => (0, 1),
            Direction::Left  => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up    => Direction::Down,
            Direction::Down  => Direction::Up,
            Direction::Left  => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
}

impl Grid {
    pub fn new(width: i32, height: i32) -> Self {
        Grid { width: width.max(1), height: height.max(1) }
    }

    pub fn area(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    pub fn contains(&self, c: Cell) -> bool {
        c.x >= 0 && c.x < self.width && c.y >= 0 && c.y < self.height
    }

    /// Fold any cell back onto the board (toroidal topology).
    pub fn wrap(&self, c: Cell) -> Cell {
        Cell::new(c.x.rem_euclid(self.width), c.y.rem_euclid(self.height))
    }

    /// Cell reached by moving one step in `dir` from `c`, wrapped.
    pub fn advance(&self, c: Cell, dir: Direction) -> Cell {
        self.wrap(c.step(dir))
    }

    pub fn center(&self) -> Cell {
        Cell::new(self.width / 2, self.height / 2)
    }

    /// Map a continuous position (e.g. pixels or terminal columns, with the
    /// board's top-left corner at the origin) to the cell containing it.
    pub fn cell_at(&self, px: f32, py: f32, cell_w: f32, cell_h: f32) -> Option<Cell> {
        if px < 0.0 || py < 0.0 || cell_w <= 0.0 || cell_h <= 0.0 {
            return None;
        }
        let c = Cell::new((px / cell_w) as i32, (py / cell_h) as i32);
        if self.contains(c) { Some(c) } else { None }
    }

    /// Every cell, row-major.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Cell::new(x, y)))
    }
}
