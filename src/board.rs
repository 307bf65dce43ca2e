use std::fmt::Debug;

use log::{debug, trace};

use crate::{
    bitboard::{BIT_SQUARES, INITIAL_OCCUPANCY, bitscan_forward_and_reset, is_set, pretty_print_bitboard},
    error::ChessError,
    piece::{
        COLOR_BLACK, PIECE_BISHOP, PIECE_KING, PIECE_KNIGHT, PIECE_PAWN, PIECE_QUEEN, PIECE_ROOK, Piece,
        name_to_piece, piece_to_name,
    },
};

pub static STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1";

/// Back rank piece types from the a file to the h file
static BACK_RANK: [u8; 8] = [
    PIECE_ROOK,
    PIECE_KNIGHT,
    PIECE_BISHOP,
    PIECE_QUEEN,
    PIECE_KING,
    PIECE_BISHOP,
    PIECE_KNIGHT,
    PIECE_ROOK,
];

/// Row holding white's pawns before they have moved. Black's pawns start on row 1.
pub const WHITE_PAWN_START_RANK: u8 = 6;
pub const BLACK_PAWN_START_RANK: u8 = 1;

#[inline]
pub fn file_8x8(square_index: u8) -> u8 {
    square_index % 8
}

#[inline]
pub fn rank_8x8(square_index: u8) -> u8 {
    square_index / 8
}

/// Square for grid coordinates where (0, 0) is the top left cell
pub fn square_index(file: u8, rank: u8) -> Result<u8, ChessError> {
    if file > 7 || rank > 7 {
        return Err(ChessError::InvalidSquare(rank.saturating_mul(8).saturating_add(file)));
    }

    Ok(rank * 8 + file)
}

/// Converts a square index to algebraic notation, square 0 is a8 and square 63 is h1
pub fn index_8x8_to_pos_str(square_index: u8) -> String {
    if square_index > 63 {
        return format!("?{square_index}");
    }

    format!(
        "{}{}",
        (b'a' + file_8x8(square_index)) as char,
        8 - rank_8x8(square_index)
    )
}

pub fn pos_str_to_index(pos: &str) -> Result<u8, ChessError> {
    let bytes = pos.as_bytes();
    if bytes.len() != 2 {
        return Err(ChessError::InvalidFen(format!("Expected a square like 'e2' but got '{pos}'")));
    }

    match (bytes[0], bytes[1]) {
        (file @ b'a'..=b'h', rank @ b'1'..=b'8') => square_index(file - b'a', b'8' - rank),
        _ => Err(ChessError::InvalidFen(format!("Expected a square like 'e2' but got '{pos}'"))),
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    squares: [Option<Piece>; 64],
    occupied: u64,
    pub white_to_move: bool,
}

impl Board {
    pub fn initial() -> Board {
        let mut board = Board::default();
        board.place_initial_setup();
        board
    }

    /// Clears the board and puts all 32 pieces on their starting squares with white to move
    pub fn place_initial_setup(&mut self) {
        *self = Board::default();

        for (file, piece_type) in BACK_RANK.iter().enumerate() {
            let file = file as u8;
            self.place(piece_type | COLOR_BLACK, file);
            self.place(PIECE_PAWN | COLOR_BLACK, BLACK_PAWN_START_RANK * 8 + file);
            self.place(PIECE_PAWN, WHITE_PAWN_START_RANK * 8 + file);
            self.place(*piece_type, 56 + file);
        }
        debug_assert_eq!(INITIAL_OCCUPANCY, self.occupied);
        debug_assert_eq!(STARTING_FEN, self.to_fen());

        debug!("Placed initial setup");
    }

    // Only called with known good kinds and squares
    fn place(&mut self, kind: u8, square_index: u8) {
        if let Ok(piece) = Piece::new(kind, square_index) {
            self.write_piece(Some(piece), square_index as usize);
        }
    }

    pub fn from_fen(fen: &str) -> Result<Board, ChessError> {
        if !fen.is_ascii() {
            return Err(ChessError::InvalidFen(String::from(
                "Expected FEN to only contain ASCII characters",
            )));
        }

        let fen_pieces: Vec<&str> = fen.split_whitespace().collect();
        if fen_pieces.is_empty() || fen_pieces.len() > 6 {
            return Err(ChessError::InvalidFen(format!(
                "Expected FEN to have 1 to 6 space-delimited parts but it had {}",
                fen_pieces.len()
            )));
        }

        let mut board = Board::default();
        let mut board_index: usize = 0;
        let mut row_length: usize = 0;

        for c in fen_pieces[0].chars() {
            match c {
                '/' => {
                    if board_index >= 64 {
                        return Err(ChessError::InvalidFen(String::from("Piece placement has more than 8 rows")));
                    }
                    if row_length != 8 {
                        return Err(ChessError::InvalidFen(format!(
                            "Row ending at index {board_index} has {row_length} squares instead of 8"
                        )));
                    }
                    row_length = 0;
                }
                '1'..='8' => {
                    let empty = c as usize - '0' as usize;
                    board_index += empty;
                    row_length += empty;
                }
                _ => {
                    let kind = name_to_piece(c).ok_or_else(|| {
                        ChessError::InvalidFen(format!(
                            "Encountered unexpected character {c} while processing piece placement"
                        ))
                    })?;
                    if board_index > 63 {
                        return Err(ChessError::InvalidFen(String::from("Piece placement has more than 64 squares")));
                    }
                    board.write_piece(Some(Piece::new(kind, board_index as u8)?), board_index);
                    board_index += 1;
                    row_length += 1;
                }
            }

            if row_length > 8 {
                return Err(ChessError::InvalidFen(format!("Row ending at index {board_index} is too long")));
            }
        }

        if board_index != 64 {
            return Err(ChessError::InvalidFen(format!(
                "Piece placement covers {board_index} squares instead of 64"
            )));
        }

        // Castling, en passant and the move clocks are not tracked
        match fen_pieces.get(1) {
            None | Some(&"w") => board.white_to_move = true,
            Some(&"b") => board.white_to_move = false,
            Some(other) => {
                return Err(ChessError::InvalidFen(format!(
                    "Encountered unexpected Side to move value '{other}'"
                )));
            }
        }

        trace!("Parsed FEN '{fen}' {board:?}");

        Ok(board)
    }

    pub fn to_fen(&self) -> String {
        let mut result = String::new();

        for rank in 0..8 {
            let mut empty = 0;
            for file in 0..8 {
                match self.squares[rank * 8 + file] {
                    Some(piece) => {
                        if empty > 0 {
                            result.push_str(&empty.to_string());
                            empty = 0;
                        }
                        result.push(piece_to_name(piece.kind()));
                    }
                    None => empty += 1,
                }
            }

            if empty > 0 {
                result.push_str(&empty.to_string());
            }
            if rank < 7 {
                result.push('/');
            }
        }

        result.push_str(if self.white_to_move { " w - - 0 1" } else { " b - - 0 1" });

        result
    }

    #[inline]
    pub fn get_piece(&self, square_index: u8) -> Option<Piece> {
        self.squares.get(square_index as usize).copied().flatten()
    }

    #[inline]
    pub fn is_occupied(&self, square_index: u8) -> bool {
        square_index < 64 && is_set(self.occupied, square_index)
    }

    pub fn occupancy_bitboard(&self) -> u64 {
        self.occupied
    }

    /// Kind of the piece on every square, for drawing the board
    pub fn occupancy(&self) -> [Option<u8>; 64] {
        self.squares.map(|square| square.map(|piece| piece.kind()))
    }

    /// Every piece on the board by increasing square index
    pub fn pieces(&self) -> impl Iterator<Item = Piece> + '_ {
        let mut remaining = self.occupied;
        std::iter::from_fn(move || {
            while remaining != 0 {
                let square_index = bitscan_forward_and_reset(&mut remaining) as usize;
                if let Some(piece) = self.squares[square_index] {
                    return Some(piece);
                }
            }
            None
        })
    }

    /// Moves the piece on `from` to `to`, removing whatever was on `to`. The removed piece is returned.
    ///
    /// Nothing is changed when an error is returned.
    pub fn apply_move(&mut self, from: u8, to: u8) -> Result<Option<Piece>, ChessError> {
        if from > 63 {
            return Err(ChessError::InvalidSquare(from));
        }
        if to > 63 {
            return Err(ChessError::InvalidSquare(to));
        }

        let piece = self.get_piece(from).ok_or(ChessError::NoPieceAtSource(from))?;
        let moved = piece.relocate(to)?;
        if from == to {
            return Ok(None);
        }

        let captured = self.squares[to as usize];
        self.write_piece(None, from as usize);
        self.write_piece(Some(moved), to as usize);
        self.white_to_move = !self.white_to_move;

        debug!(
            "Moved {:?} from {} to {}, captured {:?}",
            piece,
            index_8x8_to_pos_str(from),
            index_8x8_to_pos_str(to),
            captured
        );

        Ok(captured)
    }

    fn write_piece(&mut self, piece: Option<Piece>, square_index: usize) {
        self.squares[square_index] = piece;
        if piece.is_some() {
            self.occupied |= BIT_SQUARES[square_index];
        } else {
            self.occupied &= !BIT_SQUARES[square_index];
        }
    }
}

/// Board drawn with black at the top, `highlighted` squares marked with `*` and `selected` wrapped in brackets
pub fn pretty_print_occupancy(kinds: &[Option<u8>; 64], selected: Option<u8>, highlighted: &[u8]) -> String {
    let mut result = String::new();

    for rank in 0..8u8 {
        result.push_str(&format!("{} ", 8 - rank));
        for file in 0..8u8 {
            let square_index = rank * 8 + file;
            let kind = kinds[square_index as usize];
            let marked = highlighted.contains(&square_index);
            let name = match kind {
                Some(kind) => piece_to_name(kind),
                None if marked => '*',
                None => '.',
            };

            if selected == Some(square_index) {
                result.push_str(&format!("[{name}]"));
            } else if marked && kind.is_some() {
                result.push_str(&format!("*{name}*"));
            } else {
                result.push_str(&format!(" {name} "));
            }
        }
        result.push('\n');
    }
    result.push_str("   a  b  c  d  e  f  g  h");

    result
}

impl Default for Board {
    fn default() -> Self {
        Self {
            squares: [None; 64],
            occupied: 0,
            white_to_move: true,
        }
    }
}

impl Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Board")
            .field("white_to_move", &self.white_to_move)
            .field("occupancy", &format_args!("{:#018x}", self.occupied))
            .finish()?;

        writeln!(f, "\nsquares: \n{}", pretty_print_occupancy(&self.occupancy(), None, &[]))?;
        write!(f, "occupancy: {}", pretty_print_bitboard(self.occupied))
    }
}

#[cfg(test)]
mod board_tests {
    use super::*;

    #[test]
    pub fn initial_setup_has_32_pieces() {
        let board = Board::initial();

        assert_eq!(32, board.pieces().count());
        assert_eq!(INITIAL_OCCUPANCY, board.occupancy_bitboard());
        assert!(board.white_to_move);
    }

    #[test]
    pub fn initial_pawn_ranks() {
        let board = Board::initial();

        for square in 8..16 {
            assert_eq!(Some(PIECE_PAWN | COLOR_BLACK), board.get_piece(square).map(|p| p.kind()));
        }
        for square in 48..56 {
            assert_eq!(Some(PIECE_PAWN), board.get_piece(square).map(|p| p.kind()));
        }
        for square in 16..48 {
            assert!(!board.is_occupied(square));
            assert_eq!(None, board.get_piece(square));
        }
    }

    #[test]
    pub fn initial_back_ranks() {
        let kinds = Board::initial().occupancy();

        assert_eq!(Some(PIECE_ROOK | COLOR_BLACK), kinds[0]);
        assert_eq!(Some(PIECE_KNIGHT | COLOR_BLACK), kinds[1]);
        assert_eq!(Some(PIECE_BISHOP | COLOR_BLACK), kinds[2]);
        assert_eq!(Some(PIECE_QUEEN | COLOR_BLACK), kinds[3]);
        assert_eq!(Some(PIECE_KING | COLOR_BLACK), kinds[4]);
        assert_eq!(Some(PIECE_BISHOP | COLOR_BLACK), kinds[5]);
        assert_eq!(Some(PIECE_KNIGHT | COLOR_BLACK), kinds[6]);
        assert_eq!(Some(PIECE_ROOK | COLOR_BLACK), kinds[7]);
        assert_eq!(Some(PIECE_ROOK), kinds[56]);
        assert_eq!(Some(PIECE_KNIGHT), kinds[57]);
        assert_eq!(Some(PIECE_BISHOP), kinds[58]);
        assert_eq!(Some(PIECE_QUEEN), kinds[59]);
        assert_eq!(Some(PIECE_KING), kinds[60]);
        assert_eq!(Some(PIECE_BISHOP), kinds[61]);
        assert_eq!(Some(PIECE_KNIGHT), kinds[62]);
        assert_eq!(Some(PIECE_ROOK), kinds[63]);
    }

    #[test]
    pub fn stored_squares_match_indices() {
        let board = Board::initial();
        for square in 0..64u8 {
            if let Some(piece) = board.get_piece(square) {
                assert_eq!(square, piece.square());
            }
        }
    }

    #[test]
    pub fn starting_fen_matches_initial_setup() {
        let from_fen = Board::from_fen(STARTING_FEN).unwrap();

        assert_eq!(Board::initial(), from_fen);
        assert_eq!(STARTING_FEN, from_fen.to_fen());
    }

    #[test]
    pub fn fen_side_to_move_is_optional() {
        assert!(Board::from_fen("8/8/8/8/8/8/4P3/8").unwrap().white_to_move);
        assert!(!Board::from_fen("8/8/8/8/8/8/4P3/8 b").unwrap().white_to_move);
        assert!(Board::from_fen("8/8/8/8/8/8/4P3/8 w KQkq - 0 1").unwrap().is_occupied(52));
    }

    #[test]
    pub fn bad_fens_are_rejected() {
        for fen in [
            "",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP",
            "rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR w",
            "rnbqkbnr/ppppppppp/8/8/8/8/PPPPPPP/RNBQKBNR w",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNX w",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR/8 w",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR/ w",
            "8/8/8/8/8/8/8/8/",
        ] {
            assert!(matches!(Board::from_fen(fen), Err(ChessError::InvalidFen(_))), "{fen}");
        }
    }

    #[test]
    pub fn apply_move_relocates_piece() {
        let mut board = Board::initial();

        assert_eq!(Ok(None), board.apply_move(52, 36));

        let pawn = board.get_piece(36).unwrap();
        assert_eq!(36, pawn.square());
        assert_eq!(PIECE_PAWN, pawn.kind());
        assert!(!board.is_occupied(52));
        assert!(board.is_occupied(36));
        assert!(!board.white_to_move);
        assert_eq!(32, board.pieces().count());
    }

    #[test]
    pub fn apply_move_captures_occupant() {
        let mut board = Board::from_fen("8/8/8/3p4/4P3/8/8/8 w").unwrap();
        let black_pawn = board.get_piece(27).unwrap();

        assert_eq!(Ok(Some(black_pawn)), board.apply_move(36, 27));
        assert_eq!(1, board.pieces().count());
        assert_eq!(Some(PIECE_PAWN), board.get_piece(27).map(|p| p.kind()));
        assert_eq!(BIT_SQUARES[27], board.occupancy_bitboard());
    }

    #[test]
    pub fn apply_move_from_empty_square_changes_nothing() {
        let mut board = Board::initial();
        let before = board.clone();

        assert_eq!(Err(ChessError::NoPieceAtSource(36)), board.apply_move(36, 28));
        assert_eq!(before, board);
    }

    #[test]
    pub fn apply_move_with_bad_squares_changes_nothing() {
        let mut board = Board::initial();
        let before = board.clone();

        assert_eq!(Err(ChessError::InvalidSquare(64)), board.apply_move(64, 0));
        assert_eq!(Err(ChessError::InvalidSquare(200)), board.apply_move(52, 200));
        assert_eq!(before, board);
    }

    #[test]
    pub fn square_naming() {
        assert_eq!("a8", index_8x8_to_pos_str(0));
        assert_eq!("e2", index_8x8_to_pos_str(52));
        assert_eq!("h1", index_8x8_to_pos_str(63));
        assert_eq!(Ok(52), pos_str_to_index("e2"));
        assert_eq!(Ok(0), pos_str_to_index("a8"));
        assert!(pos_str_to_index("i2").is_err());
        assert!(pos_str_to_index("e9").is_err());
        assert_eq!(Ok(52), square_index(4, 6));
        assert_eq!(Err(ChessError::InvalidSquare(64)), square_index(8, 7));
    }

    #[test]
    pub fn pretty_print_marks_selection_and_highlights() {
        let printed = pretty_print_occupancy(&Board::initial().occupancy(), Some(52), &[44, 36]);
        let rows: Vec<&str> = printed.lines().collect();

        assert_eq!("8  r  n  b  q  k  b  n  r ", rows[0]);
        assert_eq!("4  .  .  .  .  *  .  .  . ", rows[4]);
        assert_eq!("2  P  P  P  P [P] P  P  P ", rows[6]);
    }
}
