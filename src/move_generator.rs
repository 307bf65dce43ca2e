use log::trace;
use tinyvec::ArrayVec;

use crate::{
    board::{BLACK_PAWN_START_RANK, Board, WHITE_PAWN_START_RANK, file_8x8, index_8x8_to_pos_str, rank_8x8},
    movement::{MovementDescriptor, movements_for},
    piece::{PIECE_BISHOP, PIECE_KING, PIECE_KNIGHT, PIECE_PAWN, PIECE_QUEEN, PIECE_ROOK, Piece},
};

/// A queen in the middle of an empty board reaches 27 squares, nothing reaches more
pub const MAX_DESTINATIONS: usize = 32;

pub type Destinations = ArrayVec<[u8; MAX_DESTINATIONS]>;

/// What to do with one candidate square
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
enum Candidate {
    /// Add the square and keep repeating the direction
    Accept,
    /// Add the square but stop repeating, the piece can't pass through it
    AcceptAndStop,
    /// Skip the square but keep repeating
    Reject,
    /// Skip the square and stop repeating
    RejectAndStop,
}

/// Pseudo legal destination squares for `piece`, in movement table order and then by distance.
///
/// Check is never considered. Unknown kinds produce no destinations.
pub fn generate_destinations(board: &Board, piece: Piece) -> Destinations {
    let mut result = Destinations::new();

    for descriptor in movements_for(piece.kind()) {
        for repetition in 1..=descriptor.limit {
            let candidate = test_candidate(board, piece, descriptor, repetition);
            trace!(
                "{:?} {:?} x{} -> {:?}",
                piece, descriptor.direction, repetition, candidate
            );

            match candidate {
                (Candidate::Accept, Some(target)) => result.push(target),
                (Candidate::AcceptAndStop, Some(target)) => {
                    result.push(target);
                    break;
                }
                (Candidate::Reject, _) => {}
                _ => break,
            }
        }
    }

    result
}

/// Every pseudo legal (from, to) pair for one side, ordered by from square
pub fn generate_all_destinations(board: &Board, white: bool) -> Vec<(u8, u8)> {
    board
        .pieces()
        .filter(|piece| piece.is_white() == white)
        .flat_map(|piece| {
            generate_destinations(board, piece)
                .into_iter()
                .map(move |to| (piece.square(), to))
        })
        .collect()
}

fn test_candidate(
    board: &Board,
    piece: Piece,
    descriptor: &MovementDescriptor,
    repetition: u8,
) -> (Candidate, Option<u8>) {
    let from = piece.square();
    let direction = descriptor.direction;
    let target = from as i16 + direction.displacement(repetition);

    if !(0..64).contains(&target) {
        return (Candidate::RejectAndStop, None);
    }
    let target = target as u8;

    // Index arithmetic wraps from the h file to the a file of the next row, catch it by checking the file
    let file_delta = file_8x8(target) as i16 - file_8x8(from) as i16;
    if file_delta != direction.file_delta(repetition) {
        return (Candidate::RejectAndStop, Some(target));
    }

    let occupant = board.get_piece(target);

    match piece.piece_type() {
        PIECE_PAWN => (test_pawn_candidate(board, piece, target, file_delta, repetition), Some(target)),
        PIECE_KNIGHT => {
            let rank_delta = (rank_8x8(target) as i16 - rank_8x8(from) as i16).abs();
            let l_shaped = matches!((file_delta.abs(), rank_delta), (1, 2) | (2, 1));

            if !l_shaped || occupant.is_some_and(|o| o.same_color(&piece)) {
                (Candidate::Reject, Some(target))
            } else {
                (Candidate::Accept, Some(target))
            }
        }
        PIECE_BISHOP | PIECE_ROOK | PIECE_QUEEN | PIECE_KING => match occupant {
            None => (Candidate::Accept, Some(target)),
            Some(o) if o.same_color(&piece) => (Candidate::RejectAndStop, Some(target)),
            Some(_) => (Candidate::AcceptAndStop, Some(target)),
        },
        _ => (Candidate::RejectAndStop, None),
    }
}

fn test_pawn_candidate(board: &Board, piece: Piece, target: u8, file_delta: i16, repetition: u8) -> Candidate {
    if file_delta != 0 {
        // Diagonal pawn moves are only allowed as captures
        return match board.get_piece(target) {
            Some(o) if !o.same_color(&piece) => Candidate::Accept,
            _ => Candidate::Reject,
        };
    }

    // Pawns never capture straight ahead, and can't double step over a piece either
    if board.is_occupied(target) {
        return Candidate::RejectAndStop;
    }

    if repetition == 2 {
        let start_rank = if piece.is_white() {
            WHITE_PAWN_START_RANK
        } else {
            BLACK_PAWN_START_RANK
        };

        if rank_8x8(piece.square()) != start_rank {
            trace!(
                "Pawn on {} can't double step to {}",
                index_8x8_to_pos_str(piece.square()),
                index_8x8_to_pos_str(target)
            );
            return Candidate::RejectAndStop;
        }
    }

    Candidate::Accept
}
