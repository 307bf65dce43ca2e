#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChessError {
    #[error("Square index {0} is outside of the board")]
    InvalidSquare(u8),

    #[error("No piece at square {0} to move")]
    NoPieceAtSource(u8),

    #[error("Unknown piece kind {0:#04x}")]
    UnknownPieceKind(u8),

    #[error("Invalid FEN: {0}")]
    InvalidFen(String),
}
