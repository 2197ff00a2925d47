//! Attack maps and check detection.
//!
//! `compute_attacks` builds the full map of squares the opponent
//! attacks, remembering which piece attacks each square; the combined
//! mask is cached on the board until the next apply/undo. `is_in_check`
//! is the cheap direction-probing variant used inside the legality
//! filter, where rebuilding the whole map per candidate move would be
//! wasted work.

use crate::board::board::Board;
use crate::board::piece::{Color, PieceKind};
use crate::board::square::{offset, Square};

pub const ORTHOGONAL_DIRS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
pub const DIAGONAL_DIRS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
pub const KNIGHT_OFFSETS: [(i32, i32); 8] = [
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
];
pub const KING_OFFSETS: [(i32, i32); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// Squares attacked by the opponent of some color, with per-square
/// attacker identity (attacker square + 1, 0 when unattacked).
pub struct AttackMap {
    pub attackers: [u8; 64],
    pub mask: u64,
    pub king_square: Square,
}

impl AttackMap {
    pub fn is_attacked(&self, sq: Square) -> bool {
        self.attackers[sq] != 0
    }

    fn mark(&mut self, attacker: Square, target: Square) {
        self.attackers[target] = attacker as u8 + 1;
        self.mask |= 1u64 << target;
    }
}

/// Builds the map of every square attacked by `color`'s opponent and
/// caches the combined mask on the board.
pub fn compute_attacks(board: &mut Board, color: Color) -> AttackMap {
    let mut map = AttackMap {
        attackers: [0; 64],
        mask: 0,
        king_square: board.king_square(color),
    };
    let enemy = color.opposite();

    for sq in 0..64 {
        let piece = board.at(sq);
        if piece.is_empty() || piece.color != enemy {
            continue;
        }
        match piece.kind {
            PieceKind::Pawn => {
                for d_file in [-1, 1] {
                    if let Some(target) = offset(sq, enemy.forward(), d_file) {
                        map.mark(sq, target);
                    }
                }
            }
            PieceKind::Knight => {
                for &(dr, df) in &KNIGHT_OFFSETS {
                    if let Some(target) = offset(sq, dr, df) {
                        map.mark(sq, target);
                    }
                }
            }
            PieceKind::King => {
                for &(dr, df) in &KING_OFFSETS {
                    if let Some(target) = offset(sq, dr, df) {
                        map.mark(sq, target);
                    }
                }
            }
            PieceKind::Bishop => mark_rays(board, &mut map, sq, &DIAGONAL_DIRS),
            PieceKind::Rook => mark_rays(board, &mut map, sq, &ORTHOGONAL_DIRS),
            PieceKind::Queen => {
                mark_rays(board, &mut map, sq, &DIAGONAL_DIRS);
                mark_rays(board, &mut map, sq, &ORTHOGONAL_DIRS);
            }
            PieceKind::None => {}
        }
    }

    board.attacked_mask = map.mask;
    board.attacked_valid = true;
    map
}

fn mark_rays(board: &Board, map: &mut AttackMap, from: Square, dirs: &[(i32, i32); 4]) {
    for &(dr, df) in dirs {
        let mut sq = from;
        while let Some(next) = offset(sq, dr, df) {
            map.mark(from, next);
            if !board.at(next).is_empty() {
                break;
            }
            sq = next;
        }
    }
}

/// Whether `color`'s king is attacked, probing outward from the king.
/// Returns the attacker's square.
pub fn is_in_check(board: &Board, color: Color) -> Option<Square> {
    let king = board.king_square(color);
    let enemy = color.opposite();

    // enemy pawns sit one rank ahead of the king, on either diagonal
    for d_file in [-1, 1] {
        if let Some(sq) = offset(king, color.forward(), d_file) {
            let piece = board.at(sq);
            if piece.color == enemy && piece.kind == PieceKind::Pawn {
                return Some(sq);
            }
        }
    }

    if let Some(sq) = probe_rays(board, king, enemy, &DIAGONAL_DIRS, PieceKind::Bishop) {
        return Some(sq);
    }
    if let Some(sq) = probe_rays(board, king, enemy, &ORTHOGONAL_DIRS, PieceKind::Rook) {
        return Some(sq);
    }

    for &(dr, df) in &KNIGHT_OFFSETS {
        if let Some(sq) = offset(king, dr, df) {
            let piece = board.at(sq);
            if piece.color == enemy && piece.kind == PieceKind::Knight {
                return Some(sq);
            }
        }
    }

    for &(dr, df) in &KING_OFFSETS {
        if let Some(sq) = offset(king, dr, df) {
            let piece = board.at(sq);
            if piece.color == enemy && piece.kind == PieceKind::King {
                return Some(sq);
            }
        }
    }

    None
}

fn probe_rays(
    board: &Board,
    king: Square,
    enemy: Color,
    dirs: &[(i32, i32); 4],
    slider: PieceKind,
) -> Option<Square> {
    for &(dr, df) in dirs {
        let mut sq = king;
        while let Some(next) = offset(sq, dr, df) {
            let piece = board.at(next);
            if !piece.is_empty() {
                if piece.color == enemy && (piece.kind == slider || piece.kind == PieceKind::Queen)
                {
                    return Some(next);
                }
                break;
            }
            sq = next;
        }
    }
    None
}
