//! Legal move generation.
//!
//! Per-kind generators emit pseudo-legal candidates; every candidate is
//! applied, rejected if it leaves the mover's king attacked, and undone
//! again. Pieces are visited in kind order (pawns first, king last),
//! squares low-to-high inside each kind's bitboard, so generation order
//! is deterministic.

use crate::board::board::Board;
use crate::board::chess_move::{
    Move, MoveFlags, FLAG_CAPTURE, FLAG_CASTLE, FLAG_EN_PASSANT, FLAG_PROMOTION,
};
use crate::board::piece::{Color, Piece, PieceKind};
use crate::board::square::{file_of, offset, rank_of, square_at, Square};
use crate::move_generation::attack_map::{
    compute_attacks, is_in_check, AttackMap, DIAGONAL_DIRS, KING_OFFSETS, KNIGHT_OFFSETS,
    ORTHOGONAL_DIRS,
};

const GENERATION_ORDER: [PieceKind; 6] = [
    PieceKind::Pawn,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
    PieceKind::Queen,
    PieceKind::King,
];

const PROMOTION_KINDS: [PieceKind; 4] = [
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Rook,
    PieceKind::Queen,
];

pub fn generate_moves(board: &mut Board) -> Vec<Move> {
    let mut moves = Vec::with_capacity(64);
    generate_moves_into(board, &mut moves);
    moves
}

/// Clears `moves` and fills it with every legal move for the side to
/// move. Needs `&mut` because legality testing plays each candidate on
/// the board and takes it back.
pub fn generate_moves_into(board: &mut Board, moves: &mut Vec<Move>) {
    moves.clear();
    let side = board.to_move;
    let map = compute_attacks(board, side);

    for kind in GENERATION_ORDER {
        let mut bb = board.bitboard(side, kind);
        while bb != 0 {
            let from = bb.trailing_zeros() as Square;
            match kind {
                PieceKind::Pawn => generate_pawn_moves(board, from, moves),
                PieceKind::Bishop => generate_ray_moves(board, from, &DIAGONAL_DIRS, moves),
                PieceKind::Knight => generate_knight_moves(board, from, moves),
                PieceKind::Rook => generate_ray_moves(board, from, &ORTHOGONAL_DIRS, moves),
                PieceKind::Queen => {
                    generate_ray_moves(board, from, &DIAGONAL_DIRS, moves);
                    generate_ray_moves(board, from, &ORTHOGONAL_DIRS, moves);
                }
                PieceKind::King => generate_king_moves(board, from, &map, moves),
                PieceKind::None => {}
            }
            bb &= bb - 1;
        }
    }
}

/// Plays the candidate, keeps it unless the mover's king ends up
/// attacked, and takes it back.
fn validate_and_push(board: &mut Board, moves: &mut Vec<Move>, mv: Move) {
    board.apply(mv);
    if is_in_check(board, mv.color).is_none() {
        moves.push(mv);
    }
    board.undo();
}

fn push_pawn_move(
    board: &mut Board,
    moves: &mut Vec<Move>,
    piece: Piece,
    from: Square,
    to: Square,
    flags: MoveFlags,
    captured: PieceKind,
) {
    let promo_rank = piece.color.opposite().back_rank();
    if rank_of(to) == promo_rank {
        for promoted in PROMOTION_KINDS {
            let mv = Move::new(piece, from, to, flags | FLAG_PROMOTION)
                .with_captured(captured)
                .with_promoted(promoted);
            validate_and_push(board, moves, mv);
        }
    } else {
        let mv = Move::new(piece, from, to, flags).with_captured(captured);
        validate_and_push(board, moves, mv);
    }
}

fn generate_pawn_moves(board: &mut Board, from: Square, moves: &mut Vec<Move>) {
    let piece = board.at(from);
    let side = piece.color;
    let fwd = side.forward();

    if let Some(one) = offset(from, fwd, 0) {
        if board.at(one).is_empty() {
            push_pawn_move(board, moves, piece, from, one, 0, PieceKind::None);

            let home_rank = if side == Color::White { 1 } else { 6 };
            if rank_of(from) == home_rank {
                if let Some(two) = offset(from, 2 * fwd, 0) {
                    if board.at(two).is_empty() {
                        validate_and_push(board, moves, Move::new(piece, from, two, 0));
                    }
                }
            }
        }
    }

    for d_file in [-1, 1] {
        if let Some(to) = offset(from, fwd, d_file) {
            let target = board.at(to);
            if !target.is_empty() && target.color != side && target.kind != PieceKind::King {
                push_pawn_move(board, moves, piece, from, to, FLAG_CAPTURE, target.kind);
            }
        }
    }

    // en passant: the last move was an enemy double pawn push landing
    // right beside this pawn
    if let Some(&last) = board.history.last() {
        if last.kind == PieceKind::Pawn
            && last.color != side
            && file_of(last.from) == file_of(last.to)
            && rank_of(last.from) as i32 - rank_of(last.to) as i32 == 2 * fwd
            && rank_of(last.to) == rank_of(from)
            && (file_of(last.to) as i32 - file_of(from) as i32).abs() == 1
        {
            let to = square_at((rank_of(last.to) as i32 + fwd) as usize, file_of(last.to));
            let mv = Move::new(piece, from, to, FLAG_CAPTURE | FLAG_EN_PASSANT)
                .with_captured(PieceKind::Pawn);
            validate_and_push(board, moves, mv);
        }
    }
}

fn generate_knight_moves(board: &mut Board, from: Square, moves: &mut Vec<Move>) {
    let piece = board.at(from);
    for &(dr, df) in &KNIGHT_OFFSETS {
        if let Some(to) = offset(from, dr, df) {
            push_step(board, moves, piece, from, to);
        }
    }
}

fn generate_ray_moves(
    board: &mut Board,
    from: Square,
    dirs: &[(i32, i32); 4],
    moves: &mut Vec<Move>,
) {
    let piece = board.at(from);
    for &(dr, df) in dirs {
        let mut sq = from;
        while let Some(to) = offset(sq, dr, df) {
            let target = board.at(to);
            if target.is_empty() {
                validate_and_push(board, moves, Move::new(piece, from, to, 0));
                sq = to;
                continue;
            }
            if target.color != piece.color && target.kind != PieceKind::King {
                let mv = Move::new(piece, from, to, FLAG_CAPTURE).with_captured(target.kind);
                validate_and_push(board, moves, mv);
            }
            break;
        }
    }
}

fn generate_king_moves(board: &mut Board, from: Square, map: &AttackMap, moves: &mut Vec<Move>) {
    let piece = board.at(from);
    for &(dr, df) in &KING_OFFSETS {
        if let Some(to) = offset(from, dr, df) {
            if map.is_attacked(to) {
                continue;
            }
            push_step(board, moves, piece, from, to);
        }
    }

    let m = piece.color.index();
    let back = piece.color.back_rank();
    if board.first_king_move[m] != 0 || map.is_attacked(from) {
        return;
    }

    let f1 = square_at(back, 5);
    let g1 = square_at(back, 6);
    if board.first_king_rook_move[m] == 0
        && board.at(f1).is_empty()
        && board.at(g1).is_empty()
        && !map.is_attacked(f1)
        && !map.is_attacked(g1)
    {
        validate_and_push(board, moves, Move::new(piece, from, g1, FLAG_CASTLE));
    }

    let b1 = square_at(back, 1);
    let c1 = square_at(back, 2);
    let d1 = square_at(back, 3);
    if board.first_queen_rook_move[m] == 0
        && board.at(b1).is_empty()
        && board.at(c1).is_empty()
        && board.at(d1).is_empty()
        && !map.is_attacked(c1)
        && !map.is_attacked(d1)
    {
        validate_and_push(board, moves, Move::new(piece, from, c1, FLAG_CASTLE));
    }
}

/// Single-square step for knights and kings: quiet onto empty squares,
/// capture onto enemy non-kings.
fn push_step(board: &mut Board, moves: &mut Vec<Move>, piece: Piece, from: Square, to: Square) {
    let target = board.at(to);
    if target.is_empty() {
        validate_and_push(board, moves, Move::new(piece, from, to, 0));
    } else if target.color != piece.color && target.kind != PieceKind::King {
        let mv = Move::new(piece, from, to, FLAG_CAPTURE).with_captured(target.kind);
        validate_and_push(board, moves, mv);
    }
}
