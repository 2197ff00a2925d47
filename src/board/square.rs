//! Square indexing helpers.
//!
//! Squares are rank-major indices 0..64 with a1 = 0, h1 = 7, a8 = 56,
//! so `1u64 << square` addresses the matching bitboard bit.

use crate::errors::ParseError;

pub type Square = usize;

pub const fn rank_of(sq: Square) -> usize {
    sq / 8
}

pub const fn file_of(sq: Square) -> usize {
    sq % 8
}

pub const fn square_at(rank: usize, file: usize) -> Square {
    rank * 8 + file
}

/// Offsets a square by rank/file deltas, returning `None` off the board.
pub fn offset(sq: Square, d_rank: i32, d_file: i32) -> Option<Square> {
    let rank = rank_of(sq) as i32 + d_rank;
    let file = file_of(sq) as i32 + d_file;
    if (0..8).contains(&rank) && (0..8).contains(&file) {
        Some(square_at(rank as usize, file as usize))
    } else {
        None
    }
}

pub fn coord(sq: Square) -> String {
    let file = (b'a' + file_of(sq) as u8) as char;
    let rank = (b'1' + rank_of(sq) as u8) as char;
    format!("{file}{rank}")
}

pub fn parse_coord(text: &str) -> Result<Square, ParseError> {
    let bytes = text.as_bytes();
    if bytes.len() != 2
        || !(b'a'..=b'h').contains(&bytes[0])
        || !(b'1'..=b'8').contains(&bytes[1])
    {
        return Err(ParseError::InvalidSquare(text.to_owned()));
    }
    Ok(square_at((bytes[1] - b'1') as usize, (bytes[0] - b'a') as usize))
}
