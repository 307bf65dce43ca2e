//! Movement shapes for each piece kind.
//!
//! A [Direction] maps a repetition count to a signed displacement in square index space.
//! The four primitives are [UP], [DOWN], [LEFT] and [RIGHT]. Every other shape is a sum of them,
//! for example a knight jump is `UP.times(2).plus(RIGHT)`. Adding a new piece shape only needs a new table.
//!
//! Whether a particular instance of a shape is allowed right now is decided by the move generator.

use std::ops::Add;

use crate::piece::{
    COLOR_FLAG_MASK, PIECE_BISHOP, PIECE_KING, PIECE_KNIGHT, PIECE_MASK, PIECE_PAWN, PIECE_QUEEN, PIECE_ROOK,
};

#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub struct Direction {
    /// Files moved per repetition, positive is towards the h file
    pub file: i8,
    /// Rows moved per repetition, positive is down the board towards white's back rank
    pub rank: i8,
}

pub const UP: Direction = Direction { file: 0, rank: -1 };
pub const DOWN: Direction = Direction { file: 0, rank: 1 };
pub const LEFT: Direction = Direction { file: -1, rank: 0 };
pub const RIGHT: Direction = Direction { file: 1, rank: 0 };

impl Direction {
    pub const fn plus(self, other: Direction) -> Direction {
        Direction {
            file: self.file + other.file,
            rank: self.rank + other.rank,
        }
    }

    pub const fn times(self, n: i8) -> Direction {
        Direction {
            file: self.file * n,
            rank: self.rank * n,
        }
    }

    /// Signed change in square index after `n` repetitions, `UP.displacement(n) == -8 * n`
    #[inline]
    pub const fn displacement(&self, n: u8) -> i16 {
        (self.rank as i16 * 8 + self.file as i16) * n as i16
    }

    #[inline]
    pub const fn file_delta(&self, n: u8) -> i16 {
        self.file as i16 * n as i16
    }
}

impl Add for Direction {
    type Output = Direction;

    fn add(self, rhs: Direction) -> Direction {
        self.plus(rhs)
    }
}

#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub struct MovementDescriptor {
    pub direction: Direction,
    /// Max number of times the direction can be repeated
    pub limit: u8,
}

impl MovementDescriptor {
    pub const fn new(direction: Direction, limit: u8) -> MovementDescriptor {
        MovementDescriptor { direction, limit }
    }
}

/// Longest slide possible on an empty board
pub const MAX_SLIDE: u8 = 7;

const UP_LEFT: Direction = UP.plus(LEFT);
const UP_RIGHT: Direction = UP.plus(RIGHT);
const DOWN_LEFT: Direction = DOWN.plus(LEFT);
const DOWN_RIGHT: Direction = DOWN.plus(RIGHT);

// Pawns go forward first so the double step is tested right after the single step
static WHITE_PAWN_MOVES: [MovementDescriptor; 3] = [
    MovementDescriptor::new(UP, 2),
    MovementDescriptor::new(UP_LEFT, 1),
    MovementDescriptor::new(UP_RIGHT, 1),
];

static BLACK_PAWN_MOVES: [MovementDescriptor; 3] = [
    MovementDescriptor::new(DOWN, 2),
    MovementDescriptor::new(DOWN_LEFT, 1),
    MovementDescriptor::new(DOWN_RIGHT, 1),
];

#[rustfmt::skip]
static KNIGHT_MOVES: [MovementDescriptor; 8] = [
    MovementDescriptor::new(UP.times(2).plus(LEFT), 1),
    MovementDescriptor::new(UP.times(2).plus(RIGHT), 1),
    MovementDescriptor::new(RIGHT.times(2).plus(UP), 1),
    MovementDescriptor::new(RIGHT.times(2).plus(DOWN), 1),
    MovementDescriptor::new(DOWN.times(2).plus(RIGHT), 1),
    MovementDescriptor::new(DOWN.times(2).plus(LEFT), 1),
    MovementDescriptor::new(LEFT.times(2).plus(DOWN), 1),
    MovementDescriptor::new(LEFT.times(2).plus(UP), 1),
];

static BISHOP_MOVES: [MovementDescriptor; 4] = [
    MovementDescriptor::new(UP_LEFT, MAX_SLIDE),
    MovementDescriptor::new(UP_RIGHT, MAX_SLIDE),
    MovementDescriptor::new(DOWN_RIGHT, MAX_SLIDE),
    MovementDescriptor::new(DOWN_LEFT, MAX_SLIDE),
];

static ROOK_MOVES: [MovementDescriptor; 4] = [
    MovementDescriptor::new(UP, MAX_SLIDE),
    MovementDescriptor::new(RIGHT, MAX_SLIDE),
    MovementDescriptor::new(DOWN, MAX_SLIDE),
    MovementDescriptor::new(LEFT, MAX_SLIDE),
];

static QUEEN_MOVES: [MovementDescriptor; 8] = [
    MovementDescriptor::new(UP, MAX_SLIDE),
    MovementDescriptor::new(UP_RIGHT, MAX_SLIDE),
    MovementDescriptor::new(RIGHT, MAX_SLIDE),
    MovementDescriptor::new(DOWN_RIGHT, MAX_SLIDE),
    MovementDescriptor::new(DOWN, MAX_SLIDE),
    MovementDescriptor::new(DOWN_LEFT, MAX_SLIDE),
    MovementDescriptor::new(LEFT, MAX_SLIDE),
    MovementDescriptor::new(UP_LEFT, MAX_SLIDE),
];

static KING_MOVES: [MovementDescriptor; 8] = [
    MovementDescriptor::new(UP, 1),
    MovementDescriptor::new(UP_RIGHT, 1),
    MovementDescriptor::new(RIGHT, 1),
    MovementDescriptor::new(DOWN_RIGHT, 1),
    MovementDescriptor::new(DOWN, 1),
    MovementDescriptor::new(DOWN_LEFT, 1),
    MovementDescriptor::new(LEFT, 1),
    MovementDescriptor::new(UP_LEFT, 1),
];

/// Movement shapes for a piece kind, in the order they are searched. Unknown kinds have none.
pub fn movements_for(kind: u8) -> &'static [MovementDescriptor] {
    if kind & !(PIECE_MASK | COLOR_FLAG_MASK) != 0 {
        return &[];
    }

    match kind & PIECE_MASK {
        PIECE_PAWN => {
            if kind & COLOR_FLAG_MASK == 0 {
                &WHITE_PAWN_MOVES
            } else {
                &BLACK_PAWN_MOVES
            }
        }
        PIECE_KNIGHT => &KNIGHT_MOVES,
        PIECE_BISHOP => &BISHOP_MOVES,
        PIECE_ROOK => &ROOK_MOVES,
        PIECE_QUEEN => &QUEEN_MOVES,
        PIECE_KING => &KING_MOVES,
        _ => &[],
    }
}
