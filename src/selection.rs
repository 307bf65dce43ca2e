use log::{debug, error, info};

use crate::{
    board::{Board, index_8x8_to_pos_str},
    error::ChessError,
    move_generator::{Destinations, generate_destinations},
    piece::Piece,
};

#[derive(PartialEq, Eq, Clone, Debug, Default)]
pub enum Selection {
    #[default]
    Idle,
    Selected {
        square: u8,
        destinations: Destinations,
    },
}

impl Selection {
    pub fn selected_square(&self) -> Option<u8> {
        match self {
            Selection::Idle => None,
            Selection::Selected { square, .. } => Some(*square),
        }
    }

    pub fn destinations(&self) -> &[u8] {
        match self {
            Selection::Idle => &[],
            Selection::Selected { destinations, .. } => destinations.as_slice(),
        }
    }
}

/// What a click did
#[derive(PartialEq, Eq, Clone, Debug, Default)]
pub struct ClickOutcome {
    /// Squares to highlight after the click, empty when nothing is selected
    pub highlighted: Destinations,
    /// From and to squares of a move that was made
    pub moved: Option<(u8, u8)>,
    pub captured: Option<Piece>,
}

/// Click to select a piece, click one of its destinations to move it.
///
/// Only square indices are kept here, the pieces themselves live in the [Board].
#[derive(Clone, Debug, Default)]
pub struct SelectionState {
    current: Selection,
    previous: Selection,
    enforce_turn_order: bool,
}

impl SelectionState {
    pub fn new(enforce_turn_order: bool) -> SelectionState {
        SelectionState {
            enforce_turn_order,
            ..Default::default()
        }
    }

    pub fn current(&self) -> &Selection {
        &self.current
    }

    /// Remembers the current selection so [Self::has_changed] can compare against it
    pub fn end_frame(&mut self) {
        self.previous = self.current.clone();
    }

    pub fn has_changed(&self) -> bool {
        self.current != self.previous
    }

    pub fn handle_click(&mut self, board: &mut Board, square_index: u8) -> Result<ClickOutcome, ChessError> {
        if square_index > 63 {
            return Err(ChessError::InvalidSquare(square_index));
        }

        debug!(
            "Click on {} while {:?}",
            index_8x8_to_pos_str(square_index),
            self.current.selected_square().map(index_8x8_to_pos_str)
        );

        let mut outcome = ClickOutcome::default();

        match std::mem::take(&mut self.current) {
            Selection::Idle => {
                if let Some(piece) = self.selectable_piece(board, square_index) {
                    self.select(board, piece);
                }
            }
            Selection::Selected { square, destinations } => {
                let mover = board.get_piece(square);

                if destinations.contains(&square_index) {
                    match board.apply_move(square, square_index) {
                        Ok(captured) => {
                            info!(
                                "{} -> {}",
                                index_8x8_to_pos_str(square),
                                index_8x8_to_pos_str(square_index)
                            );
                            outcome.moved = Some((square, square_index));
                            outcome.captured = captured;
                        }
                        Err(e) => error!("Failed to make selected move: {e}"),
                    }
                } else if square_index != square {
                    // Another piece of the same side takes over the selection, anything else deselects
                    let reselect = self
                        .selectable_piece(board, square_index)
                        .filter(|piece| mover.is_some_and(|m| m.same_color(piece)));

                    if let Some(piece) = reselect {
                        self.select(board, piece);
                    }
                }
            }
        }

        outcome.highlighted = self.current.destinations().iter().copied().collect();

        Ok(outcome)
    }

    fn selectable_piece(&self, board: &Board, square_index: u8) -> Option<Piece> {
        board
            .get_piece(square_index)
            .filter(|piece| !self.enforce_turn_order || piece.is_white() == board.white_to_move)
    }

    fn select(&mut self, board: &Board, piece: Piece) {
        let destinations = generate_destinations(board, piece);
        debug!("Selected {:?} with destinations {:?}", piece, destinations);

        self.current = Selection::Selected {
            square: piece.square(),
            destinations,
        };
    }
}

#[cfg(test)]
mod selection_tests {
    use super::*;

    #[test]
    pub fn starts_idle() {
        let state = SelectionState::default();

        assert_eq!(&Selection::Idle, state.current());
        assert!(!state.has_changed());
    }

    #[test]
    pub fn clicking_empty_square_stays_idle() {
        let mut board = Board::initial();
        let mut state = SelectionState::default();

        let outcome = state.handle_click(&mut board, 36).unwrap();

        assert_eq!(ClickOutcome::default(), outcome);
        assert_eq!(&Selection::Idle, state.current());
    }

    #[test]
    pub fn clicking_piece_selects_it() {
        let mut board = Board::initial();
        let mut state = SelectionState::default();

        let outcome = state.handle_click(&mut board, 52).unwrap();

        assert_eq!(&[44, 36], outcome.highlighted.as_slice());
        assert_eq!(None, outcome.moved);
        assert_eq!(Some(52), state.current().selected_square());
        assert!(state.has_changed());
    }

    #[test]
    pub fn piece_then_invalid_square_goes_idle_without_moving() {
        let mut board = Board::initial();
        let before = board.clone();
        let mut state = SelectionState::default();

        state.handle_click(&mut board, 52).unwrap();
        let outcome = state.handle_click(&mut board, 28).unwrap();

        assert!(outcome.highlighted.is_empty());
        assert_eq!(None, outcome.moved);
        assert_eq!(&Selection::Idle, state.current());
        assert_eq!(before, board);
    }

    #[test]
    pub fn piece_then_destination_moves_once() {
        let mut board = Board::initial();
        let mut state = SelectionState::default();

        state.handle_click(&mut board, 52).unwrap();
        let outcome = state.handle_click(&mut board, 36).unwrap();

        assert_eq!(Some((52, 36)), outcome.moved);
        assert!(outcome.highlighted.is_empty());
        assert_eq!(&Selection::Idle, state.current());
        assert!(!board.is_occupied(52));
        assert_eq!(Some(36), board.get_piece(36).map(|p| p.square()));
        assert_eq!(32, board.pieces().count());

        // The pawn moved so another click on the old square does nothing
        let outcome = state.handle_click(&mut board, 36).unwrap();
        assert_eq!(None, outcome.moved);
    }

    #[test]
    pub fn clicking_own_piece_switches_selection() {
        let mut board = Board::initial();
        let mut state = SelectionState::default();

        state.handle_click(&mut board, 52).unwrap();
        let outcome = state.handle_click(&mut board, 62).unwrap();

        assert_eq!(Some(62), state.current().selected_square());
        assert_eq!(&[45, 47], outcome.highlighted.as_slice());
        assert_eq!(Board::initial(), board);
    }

    #[test]
    pub fn clicking_selected_piece_again_deselects() {
        let mut board = Board::initial();
        let mut state = SelectionState::default();

        state.handle_click(&mut board, 52).unwrap();
        state.handle_click(&mut board, 52).unwrap();

        assert_eq!(&Selection::Idle, state.current());
    }

    #[test]
    pub fn clicking_enemy_piece_out_of_reach_deselects() {
        let mut board = Board::initial();
        let mut state = SelectionState::default();

        state.handle_click(&mut board, 52).unwrap();
        state.handle_click(&mut board, 12).unwrap();

        assert_eq!(&Selection::Idle, state.current());
        assert_eq!(Board::initial(), board);
    }

    #[test]
    pub fn capture_reports_captured_piece() {
        let mut board = Board::from_fen("8/8/8/8/8/3p4/4P3/8 w").unwrap();
        let black_pawn = board.get_piece(43);
        let mut state = SelectionState::default();

        state.handle_click(&mut board, 52).unwrap();
        let outcome = state.handle_click(&mut board, 43).unwrap();

        assert_eq!(Some((52, 43)), outcome.moved);
        assert_eq!(black_pawn, outcome.captured);
        assert_eq!(1, board.pieces().count());
    }

    #[test]
    pub fn out_of_range_click_is_an_error_and_keeps_state() {
        let mut board = Board::initial();
        let mut state = SelectionState::default();

        state.handle_click(&mut board, 52).unwrap();
        assert_eq!(Err(ChessError::InvalidSquare(64)), state.handle_click(&mut board, 64));
        assert_eq!(Some(52), state.current().selected_square());
    }

    #[test]
    pub fn turn_order_is_enforced_when_enabled() {
        let mut board = Board::initial();
        let mut state = SelectionState::new(true);

        state.handle_click(&mut board, 12).unwrap();
        assert_eq!(&Selection::Idle, state.current());

        state.handle_click(&mut board, 52).unwrap();
        state.handle_click(&mut board, 36).unwrap();

        state.handle_click(&mut board, 57).unwrap();
        assert_eq!(&Selection::Idle, state.current());

        state.handle_click(&mut board, 12).unwrap();
        assert_eq!(Some(12), state.current().selected_square());
    }

    #[test]
    pub fn either_side_can_be_selected_by_default() {
        let mut board = Board::initial();
        let mut state = SelectionState::default();

        let outcome = state.handle_click(&mut board, 12).unwrap();

        assert_eq!(&[20, 28], outcome.highlighted.as_slice());
    }

    #[test]
    pub fn end_frame_snapshots_selection() {
        let mut board = Board::initial();
        let mut state = SelectionState::default();

        state.handle_click(&mut board, 52).unwrap();
        assert!(state.has_changed());

        state.end_frame();
        assert!(!state.has_changed());

        state.handle_click(&mut board, 28).unwrap();
        assert!(state.has_changed());
    }
}
