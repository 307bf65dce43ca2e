use crate::error::ChessError;

pub const PIECE_NONE: u8 = 0;
pub const PIECE_PAWN: u8 = 0x1;
pub const PIECE_KNIGHT: u8 = 0x2;
pub const PIECE_BISHOP: u8 = 0x3;
pub const PIECE_ROOK: u8 = 0x4;
pub const PIECE_QUEEN: u8 = 0x5;
pub const PIECE_KING: u8 = 0x6;
pub const PIECE_MASK: u8 = 0x7;

pub const COLOR_BLACK: u8 = 1 << 3;
pub const COLOR_FLAG_MASK: u8 = COLOR_BLACK;

const SQUARE_MASK: u16 = 0x003F;
const KIND_SHIFT: u16 = 8;
const KIND_MASK: u16 = 0x0F00;

/// A piece kind and the square it stands on packed into 16 bits.
///
/// Bits 0-5 hold the square index, bits 8-11 hold the kind. The kind is a piece type
/// from [PIECE_PAWN] to [PIECE_KING] with [COLOR_BLACK] set for black pieces. All other bits are zero.
///
/// For example a white rook on e4 (square 36) is `(PIECE_ROOK << 8) | 36 = 0x0424`.
#[derive(PartialEq, Eq, Copy, Clone, Hash)]
pub struct Piece {
    pub data: u16,
}

impl Piece {
    pub fn new(kind: u8, square_index: u8) -> Result<Piece, ChessError> {
        if square_index > 63 {
            return Err(ChessError::InvalidSquare(square_index));
        }

        if !is_valid_kind(kind) {
            return Err(ChessError::UnknownPieceKind(kind));
        }

        Ok(Piece {
            data: square_index as u16 | ((kind as u16) << KIND_SHIFT),
        })
    }

    #[inline]
    pub fn kind(&self) -> u8 {
        ((self.data & KIND_MASK) >> KIND_SHIFT) as u8
    }

    #[inline]
    pub fn square(&self) -> u8 {
        (self.data & SQUARE_MASK) as u8
    }

    #[inline]
    pub fn piece_type(&self) -> u8 {
        self.kind() & PIECE_MASK
    }

    #[inline]
    pub fn is_white(&self) -> bool {
        self.kind() & COLOR_FLAG_MASK == 0
    }

    /// Same kind at another square. The original value is left alone.
    pub fn relocate(self, new_square_index: u8) -> Result<Piece, ChessError> {
        if new_square_index > 63 {
            return Err(ChessError::InvalidSquare(new_square_index));
        }

        Ok(Piece {
            data: (self.data & KIND_MASK) | new_square_index as u16,
        })
    }

    #[inline]
    pub fn same_color(&self, other: &Piece) -> bool {
        (self.kind() ^ other.kind()) & COLOR_FLAG_MASK == 0
    }
}

impl std::fmt::Debug for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Piece {} at {} ({:#06x})",
            piece_to_name(self.kind()),
            crate::board::index_8x8_to_pos_str(self.square()),
            self.data
        )
    }
}

pub fn is_valid_kind(kind: u8) -> bool {
    kind & !(PIECE_MASK | COLOR_FLAG_MASK) == 0 && (PIECE_PAWN..=PIECE_KING).contains(&(kind & PIECE_MASK))
}

pub fn piece_to_name(kind: u8) -> char {
    let name = match kind & PIECE_MASK {
        PIECE_NONE => return '.',
        PIECE_PAWN => 'p',
        PIECE_KNIGHT => 'n',
        PIECE_BISHOP => 'b',
        PIECE_ROOK => 'r',
        PIECE_QUEEN => 'q',
        PIECE_KING => 'k',
        _ => return '?',
    };

    if kind & COLOR_FLAG_MASK == 0 {
        name.to_ascii_uppercase()
    } else {
        name
    }
}

pub fn name_to_piece(name: char) -> Option<u8> {
    let piece_type = match name.to_ascii_lowercase() {
        'p' => PIECE_PAWN,
        'n' => PIECE_KNIGHT,
        'b' => PIECE_BISHOP,
        'r' => PIECE_ROOK,
        'q' => PIECE_QUEEN,
        'k' => PIECE_KING,
        _ => return None,
    };

    if name.is_ascii_uppercase() {
        Some(piece_type)
    } else {
        Some(piece_type | COLOR_BLACK)
    }
}
