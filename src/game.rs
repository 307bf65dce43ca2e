use log::debug;

use crate::{
    board::{Board, square_index},
    error::ChessError,
    selection::{ClickOutcome, Selection, SelectionState},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GameOptions {
    /// Only let the side to move select pieces
    pub enforce_turn_order: bool,
}

/// Board plus click selection, the whole interface the display layer talks to
#[derive(Debug)]
pub struct Game {
    board: Board,
    selection: SelectionState,
    previous_occupancy: Option<u64>,
}

pub fn initial_position() -> Board {
    Board::initial()
}

impl Game {
    pub fn new(options: GameOptions) -> Game {
        Game::with_board(initial_position(), options)
    }

    pub fn from_fen(fen: &str, options: GameOptions) -> Result<Game, ChessError> {
        Ok(Game::with_board(Board::from_fen(fen)?, options))
    }

    pub fn with_board(board: Board, options: GameOptions) -> Game {
        debug!("New game with {options:?}");

        Game {
            board,
            selection: SelectionState::new(options.enforce_turn_order),
            previous_occupancy: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn selection(&self) -> &Selection {
        self.selection.current()
    }

    pub fn handle_click(&mut self, square_index: u8) -> Result<ClickOutcome, ChessError> {
        self.selection.handle_click(&mut self.board, square_index)
    }

    /// Click at grid coordinates, (0, 0) being the top left cell
    pub fn handle_click_at(&mut self, file: u8, rank: u8) -> Result<ClickOutcome, ChessError> {
        let square = square_index(file, rank)?;
        self.handle_click(square)
    }

    pub fn current_occupancy(&self) -> [Option<u8>; 64] {
        self.board.occupancy()
    }

    /// True when pieces or the selection changed since the last [Self::end_frame]. Always true before the first frame.
    pub fn needs_redraw(&self) -> bool {
        self.previous_occupancy != Some(self.board.occupancy_bitboard()) || self.selection.has_changed()
    }

    pub fn end_frame(&mut self) {
        self.previous_occupancy = Some(self.board.occupancy_bitboard());
        self.selection.end_frame();
    }
}
