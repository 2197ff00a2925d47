//! Static board evaluation.
//!
//! Material plus piece-square placement, always from the side to
//! move's perspective. Terminal positions are scored here too: a
//! checkmated side sees `-MATE_SCORE`, stalemate and the fifty-move
//! rule are draws.

use crate::board::board::Board;
use crate::board::piece::{Color, PieceKind};
use crate::board::square::{file_of, rank_of, Square};
use crate::move_generation::attack_map::is_in_check;

pub type Score = i32;

pub const MATE_SCORE: Score = 30_000;

const PAWN_VALUE: Score = 100;
const KNIGHT_VALUE: Score = 320;
const BISHOP_VALUE: Score = 330;
const ROOK_VALUE: Score = 500;
const QUEEN_VALUE: Score = 900;

#[rustfmt::skip]
const PAWN_TABLE: [Score; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
    50, 50, 50, 50, 50, 50, 50, 50,
    10, 10, 20, 30, 30, 20, 10, 10,
     5,  5, 10, 25, 25, 10,  5,  5,
     0,  0,  0, 20, 20,  0,  0,  0,
     5, -5,-10,  0,  0,-10, -5,  5,
     5, 10, 10,-20,-20, 10, 10,  5,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
const KNIGHT_TABLE: [Score; 64] = [
   -50,-40,-30,-30,-30,-30,-40,-50,
   -40,-20,  0,  0,  0,  0,-20,-40,
   -30,  0, 10, 15, 15, 10,  0,-30,
   -30,  5, 15, 20, 20, 15,  5,-30,
   -30,  0, 15, 20, 20, 15,  0,-30,
   -30,  5, 10, 15, 15, 10,  5,-30,
   -40,-20,  0,  5,  5,  0,-20,-40,
   -50,-40,-30,-30,-30,-30,-40,-50,
];

#[rustfmt::skip]
const BISHOP_TABLE: [Score; 64] = [
   -20,-10,-10,-10,-10,-10,-10,-20,
   -10,  0,  0,  0,  0,  0,  0,-10,
   -10,  0,  5, 10, 10,  5,  0,-10,
   -10,  5,  5, 10, 10,  5,  5,-10,
   -10,  0, 10, 10, 10, 10,  0,-10,
   -10, 10, 10, 10, 10, 10, 10,-10,
   -10,  5,  0,  0,  0,  0,  5,-10,
   -20,-10,-10,-10,-10,-10,-10,-20,
];

#[rustfmt::skip]
const ROOK_TABLE: [Score; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
     5, 10, 10, 10, 10, 10, 10,  5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
     0,  0,  0,  5,  5,  0,  0,  0,
];

#[rustfmt::skip]
const QUEEN_TABLE: [Score; 64] = [
   -20,-10,-10, -5, -5,-10,-10,-20,
   -10,  0,  0,  0,  0,  0,  0,-10,
   -10,  0,  5,  5,  5,  5,  0,-10,
    -5,  0,  5,  5,  5,  5,  0, -5,
     0,  0,  5,  5,  5,  5,  0, -5,
   -10,  5,  5,  5,  5,  5,  0,-10,
   -10,  0,  5,  0,  0,  0,  0,-10,
   -20,-10,-10, -5, -5,-10,-10,-20,
];

#[rustfmt::skip]
const KING_MIDGAME_TABLE: [Score; 64] = [
   -30,-40,-40,-50,-50,-40,-40,-30,
   -30,-40,-40,-50,-50,-40,-40,-30,
   -30,-40,-40,-50,-50,-40,-40,-30,
   -30,-40,-40,-50,-50,-40,-40,-30,
   -20,-30,-30,-40,-40,-30,-30,-20,
   -10,-20,-20,-20,-20,-20,-20,-10,
    20, 20,  0,  0,  0,  0, 20, 20,
    20, 30, 10,  0,  0, 10, 30, 20,
];

#[rustfmt::skip]
const KING_ENDGAME_TABLE: [Score; 64] = [
   -50,-40,-30,-20,-20,-30,-40,-50,
   -30,-20,-10,  0,  0,-10,-20,-30,
   -30,-10, 20, 30, 30, 20,-10,-30,
   -30,-10, 30, 40, 40, 30,-10,-30,
   -30,-10, 30, 40, 40, 30,-10,-30,
   -30,-10, 20, 30, 30, 20,-10,-30,
   -30,-30,  0,  0,  0,  0,-30,-30,
   -50,-30,-30,-30,-30,-30,-50,-50,
];

/// Evaluates the board for the side to move. `moves_available` is the
/// legal move count for that side, which the caller has just computed
/// anyway; zero means mate or stalemate.
pub fn evaluate(board: &Board, moves_available: usize) -> Score {
    if moves_available == 0 {
        return if is_in_check(board, board.to_move).is_some() {
            -MATE_SCORE
        } else {
            0
        };
    }
    if board.moves_since_pawn_or_capture() >= 50 {
        return 0;
    }

    let endgame = [
        side_in_endgame(board, Color::White),
        side_in_endgame(board, Color::Black),
    ];

    let mut score = 0;
    for sq in 0..64 {
        let piece = board.at(sq);
        if piece.is_empty() {
            continue;
        }
        let sign = if piece.color == board.to_move { 1 } else { -1 };
        score += sign * piece_score(piece.kind, piece.color, sq, endgame[piece.color.index()]);
    }
    score
}

fn piece_score(kind: PieceKind, color: Color, sq: Square, endgame: bool) -> Score {
    let (value, table) = match kind {
        PieceKind::Pawn => (PAWN_VALUE, &PAWN_TABLE),
        PieceKind::Knight => (KNIGHT_VALUE, &KNIGHT_TABLE),
        PieceKind::Bishop => (BISHOP_VALUE, &BISHOP_TABLE),
        PieceKind::Rook => (ROOK_VALUE, &ROOK_TABLE),
        PieceKind::Queen => (QUEEN_VALUE, &QUEEN_TABLE),
        PieceKind::King => {
            let table = if endgame {
                &KING_ENDGAME_TABLE
            } else {
                &KING_MIDGAME_TABLE
            };
            (0, table)
        }
        PieceKind::None => return 0,
    };
    value + table_bonus(table, color, sq)
}

/// Tables are written from white's point of view with the eighth rank
/// on the first row; black reads them mirrored.
fn table_bonus(table: &[Score; 64], color: Color, sq: Square) -> Score {
    let rank = rank_of(sq);
    let row = match color {
        Color::White => 7 - rank,
        Color::Black => rank,
    };
    table[row * 8 + file_of(sq)]
}

/// A side plays the endgame king once its queens are gone, or once the
/// queen has at most one other piece beside it.
fn side_in_endgame(board: &Board, color: Color) -> bool {
    if board.bitboard(color, PieceKind::Queen) == 0 {
        return true;
    }
    let others = board.bitboard(color, PieceKind::Knight).count_ones()
        + board.bitboard(color, PieceKind::Bishop).count_ones()
        + board.bitboard(color, PieceKind::Rook).count_ones();
    others <= 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::move_generation::generator::generate_moves;
    use crate::notation::fen::board_from_fen;

    fn score_of(fen: &str) -> Score {
        let mut board = board_from_fen(fen).expect("FEN should parse");
        let n = generate_moves(&mut board).len();
        evaluate(&board, n)
    }

    #[test]
    fn start_position_is_balanced() {
        let board = Board::new_game();
        assert_eq!(evaluate(&board, 20), 0);
    }

    #[test]
    fn checkmate_scores_mate_for_the_side_to_move() {
        assert_eq!(score_of("6k1/8/8/8/8/8/5PPP/4r1K1 w - - 0 1"), -MATE_SCORE);
    }

    #[test]
    fn stalemate_scores_zero() {
        assert_eq!(score_of("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1"), 0);
    }

    #[test]
    fn fifty_move_rule_scores_zero() {
        assert_eq!(score_of("4k3/4r3/8/8/8/8/8/4K3 b - - 50 40"), 0);
        assert!(score_of("4k3/4r3/8/8/8/8/8/4K3 b - - 49 40") > 0);
    }

    #[test]
    fn extra_material_flips_sign_with_the_side_to_move() {
        let up_a_queen_white = "4k3/8/8/8/8/8/8/3QK3 w - - 0 1";
        let up_a_queen_black = "4k3/8/8/8/8/8/8/3QK3 b - - 0 1";
        assert!(score_of(up_a_queen_white) > 0);
        assert!(score_of(up_a_queen_black) < 0);
    }

    #[test]
    fn endgame_king_prefers_the_center() {
        let centered = score_of("4k3/8/8/8/3K4/8/8/8 w - - 0 1");
        let cornered = score_of("4k3/8/8/8/8/8/8/K7 w - - 0 1");
        assert!(centered > cornered);
    }
}
