//! Long-algebraic (UCI) move text.
//!
//! The wire form carries only the squares and an optional promotion
//! letter; flags, the moved piece and the captured piece are all
//! reconstructed from the board the move is about to be played on.

use crate::board::board::Board;
use crate::board::chess_move::{
    Move, MoveFlags, FLAG_CAPTURE, FLAG_CASTLE, FLAG_EN_PASSANT, FLAG_PROMOTION,
};
use crate::board::piece::{Piece, PieceKind};
use crate::board::square::{coord, file_of, parse_coord, rank_of};
use crate::errors::ParseError;

pub fn move_to_uci(mv: Move) -> String {
    let mut out = String::new();
    out.push_str(&coord(mv.from));
    out.push_str(&coord(mv.to));
    if mv.is(FLAG_PROMOTION) {
        out.push(mv.promoted.letter().to_ascii_lowercase());
    }
    out
}

pub fn uci_to_move(text: &str, board: &Board) -> Result<Move, ParseError> {
    let bad = || ParseError::InvalidUciMove(text.to_owned());
    // length is in bytes; non-ASCII text would slice mid-character below
    if !text.is_ascii() || (text.len() != 4 && text.len() != 5) {
        return Err(bad());
    }

    let from = parse_coord(&text[0..2]).map_err(|_| bad())?;
    let to = parse_coord(&text[2..4]).map_err(|_| bad())?;
    let piece = board.at(from);
    if piece.is_empty() || piece.color != board.to_move {
        return Err(bad());
    }

    let target = board.at(to);
    let mut flags: MoveFlags = 0;
    let mut captured = PieceKind::None;
    if !target.is_empty() {
        if target.color == piece.color {
            return Err(bad());
        }
        flags |= FLAG_CAPTURE;
        captured = target.kind;
    }

    // a pawn sliding diagonally onto an empty square is en passant
    if piece.kind == PieceKind::Pawn && target.is_empty() && file_of(from) != file_of(to) {
        let victim = (to as i32 - 8 * piece.color.forward()) as usize;
        if board.at(victim) != Piece::new(piece.color.opposite(), PieceKind::Pawn) {
            return Err(bad());
        }
        flags |= FLAG_CAPTURE | FLAG_EN_PASSANT;
        captured = PieceKind::Pawn;
    }

    if piece.kind == PieceKind::King && file_of(from).abs_diff(file_of(to)) == 2 {
        flags |= FLAG_CASTLE;
    }

    let mut mv = Move::new(piece, from, to, flags).with_captured(captured);
    if text.len() == 5 {
        if piece.kind != PieceKind::Pawn {
            return Err(bad());
        }
        let promo_rank = piece.color.opposite().back_rank();
        if rank_of(to) != promo_rank {
            return Err(bad());
        }
        let promoted = match text.as_bytes()[4] {
            b'n' => PieceKind::Knight,
            b'b' => PieceKind::Bishop,
            b'r' => PieceKind::Rook,
            b'q' => PieceKind::Queen,
            _ => return Err(bad()),
        };
        mv.flags |= FLAG_PROMOTION;
        mv = mv.with_promoted(promoted);
    } else if piece.kind == PieceKind::Pawn
        && rank_of(to) == piece.color.opposite().back_rank()
    {
        return Err(bad());
    }

    Ok(mv)
}
