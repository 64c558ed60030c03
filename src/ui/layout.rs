/// Screen geometry shared by the renderer and the pointer handling.
///
/// ```text
///   row 0   HUD
///   row 1   ┌──────────────┐
///   row 2   │ board cells  │   [ ▲ ]
///           │  (2 cols per │ [◀]   [▶]    on-screen d-pad, right of the
///           │   grid cell) │   [ ▼ ]      board when the terminal is wide
///           └──────────────┘
///           message
///           help
/// ```
///
/// Everything here is pure arithmetic on the terminal size so clicks can
/// be hit-tested against exactly what was drawn.

use crate::domain::grid::{Cell, Direction, Grid};
use crate::sim::world::Difficulty;

/// Terminal columns per grid cell; two columns make a roughly square cell.
pub const CELL_W: u16 = 2;
pub const HUD_ROW: u16 = 0;
const FRAME_ROW: u16 = 1;

const DPAD_BTN_W: u16 = 5;
const DPAD_W: u16 = DPAD_BTN_W * 3 + 2;
const MENU_BTN_W: u16 = 20;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Rect {
    pub col: u16,
    pub row: u16,
    pub w: u16,
    pub h: u16,
}

impl Rect {
    pub const fn new(col: u16, row: u16, w: u16, h: u16) -> Self {
        Rect { col, row, w, h }
    }

    pub fn contains(&self, col: u16, row: u16) -> bool {
        col >= self.col && col < self.col + self.w && row >= self.row && row < self.row + self.h
    }

    pub fn right(&self) -> u16 {
        self.col + self.w
    }

    pub fn bottom(&self) -> u16 {
        self.row + self.h
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MenuButton {
    Difficulty(Difficulty),
    Start,
}

#[derive(Clone, Debug)]
pub struct Layout {
    pub grid: Grid,
    pub term_w: u16,
    pub term_h: u16,
    /// Board cells, border excluded.
    pub board: Rect,
    /// Board including the one-cell border.
    pub frame: Rect,
    pub message_row: u16,
    pub help_row: u16,
    pub dpad: Vec<(Direction, Rect)>,
    pub title_row: u16,
    pub menu: Vec<(MenuButton, Rect)>,
}

impl Layout {
    pub fn new(term_w: u16, term_h: u16, grid: Grid) -> Self {
        let board_w = (grid.width.max(1) as u16).saturating_mul(CELL_W);
        let board_h = grid.height.max(1) as u16;
        let frame = Rect::new(0, FRAME_ROW, board_w + 2, board_h + 2);
        let board = Rect::new(frame.col + 1, frame.row + 1, board_w, board_h);
        let message_row = frame.bottom();
        let help_row = message_row + 1;

        let dpad = Self::dpad_rects(&frame, &board, term_w);

        // Menu is centred on the whole terminal
        let cx = term_w / 2;
        let mid = term_h / 2;
        let btn_col = cx.saturating_sub(MENU_BTN_W / 2);
        let first = mid.saturating_sub(2);
        let mut menu: Vec<(MenuButton, Rect)> = Difficulty::ALL
            .iter()
            .enumerate()
            .map(|(i, d)| {
                (MenuButton::Difficulty(*d), Rect::new(btn_col, first + 2 * i as u16, MENU_BTN_W, 1))
            })
            .collect();
        menu.push((MenuButton::Start, Rect::new(btn_col, first + 7, MENU_BTN_W, 1)));

        Layout {
            grid,
            term_w,
            term_h,
            board,
            frame,
            message_row,
            help_row,
            dpad,
            title_row: mid.saturating_sub(6),
            menu,
        }
    }

    fn dpad_rects(frame: &Rect, board: &Rect, term_w: u16) -> Vec<(Direction, Rect)> {
        let left = frame.right() + 1;
        if left + DPAD_W > term_w || board.h < 3 {
            return vec![];
        }
        let mid = board.row + board.h / 2;
        let w = DPAD_BTN_W;
        vec![
            (Direction::Up, Rect::new(left + w + 1, mid - 1, w, 1)),
            (Direction::Left, Rect::new(left, mid, w, 1)),
            (Direction::Right, Rect::new(left + 2 * (w + 1), mid, w, 1)),
            (Direction::Down, Rect::new(left + w + 1, mid + 1, w, 1)),
        ]
    }

    /// Terminal size needed to show the board, message and help lines.
    pub fn required_size(&self) -> (u16, u16) {
        (self.frame.right(), self.help_row + 1)
    }

    pub fn fits(&self) -> bool {
        let (w, h) = self.required_size();
        self.term_w >= w && self.term_h >= h
    }

    /// Grid cell under a terminal position, if any.
    pub fn board_cell(&self, col: u16, row: u16) -> Option<Cell> {
        let px = col as f32 - self.board.col as f32;
        let py = row as f32 - self.board.row as f32;
        self.grid.cell_at(px, py, CELL_W as f32, 1.0)
    }

    /// Terminal position of a cell's left column.
    pub fn cell_origin(&self, c: Cell) -> (u16, u16) {
        (self.board.col + c.x as u16 * CELL_W, self.board.row + c.y as u16)
    }

    pub fn dpad_hit(&self, col: u16, row: u16) -> Option<Direction> {
        self.dpad.iter().find(|(_, r)| r.contains(col, row)).map(|(d, _)| *d)
    }

    pub fn menu_hit(&self, col: u16, row: u16) -> Option<MenuButton> {
        self.menu.iter().find(|(_, r)| r.contains(col, row)).map(|(b, _)| *b)
    }
}
