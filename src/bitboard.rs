use array_macro::array;

// Square 0 is the top left corner (a8), so bit 0 is a8 and bit 63 is h1
pub const RANK_8: u64 = 0x00000000000000FF;
pub const RANK_7: u64 = 0x000000000000FF00;
pub const RANK_2: u64 = 0x00FF000000000000;
pub const RANK_1: u64 = 0xFF00000000000000;

/// Occupancy of the standard starting position, both back ranks and both pawn ranks
pub const INITIAL_OCCUPANCY: u64 = RANK_8 | RANK_7 | RANK_2 | RANK_1;

pub static BIT_SQUARES: [u64; 64] = array![i => 1 << i; 64];

#[inline]
pub fn is_set(bitboard: u64, square_index: u8) -> bool {
    bitboard & BIT_SQUARES[square_index as usize] != 0
}

/// Prints the board top row first, which is also the order squares are indexed in
pub fn pretty_print_bitboard(val: u64) -> String {
    let mut result = String::new();

    for i in 0..8 {
        let v = (val >> (8 * i)) & 0xFF;
        result = format!("{result}\n{:08b}", (v as u8).reverse_bits());
    }

    result
}

/// Returns the index of the set bit
pub fn bitscan_forward_and_reset(num: &mut u64) -> u32 {
    let val = num.trailing_zeros();

    *num &= !(1 << val);

    val
}
