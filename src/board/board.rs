//! Board state with make/unmake discipline.
//!
//! The 64-entry piece array is the source of truth; per-(kind,color)
//! bitboards are kept in sync for generation and evaluation. Castling
//! rights and the fifty-move clock are tracked as event timestamps:
//! 0 means the event never happened, any other value is the 1-based
//! ply at which it did. `undo` clears a right stamp only when it equals
//! the ply being undone, so rights come back exactly when they should.

use crate::board::chess_move::{Move, FLAG_CAPTURE, FLAG_CASTLE, FLAG_EN_PASSANT, FLAG_PROMOTION};
use crate::board::piece::{Color, Piece, PieceKind};
use crate::board::square::{file_of, square_at, Square};

const BACK_RANK_KINDS: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

const KING_ROOK_FILE: usize = 7;
const QUEEN_ROOK_FILE: usize = 0;

#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    pub pieces: [Piece; 64],
    /// Indexed `[kind][color]`; the `None` slot stays zero.
    piece_bb: [[u64; 2]; 7],
    pub king_bb: [u64; 2],
    pub to_move: Color,
    /// Plies played on this board, including those implied by a
    /// mid-game FEN load.
    pub half_move_counter: u16,
    /// Part of a loaded halfmove clock that reaches further back than
    /// the reconstructed ply count; the stamps cannot represent it.
    pub initial_half_move_clock: u16,
    pub first_king_move: [u16; 2],
    pub first_king_rook_move: [u16; 2],
    pub first_queen_rook_move: [u16; 2],
    pub last_pawn_move: [u16; 2],
    pub last_capture_move: [u16; 2],
    /// Prior stamp values, pushed by `apply` and popped by `undo`.
    pub(crate) prev_pawn_stamps: [Vec<u16>; 2],
    pub(crate) prev_capture_stamps: [Vec<u16>; 2],
    pub history: Vec<Move>,
    pub attacked_mask: u64,
    pub attacked_valid: bool,
}

impl Board {
    /// Empty board, no pieces, white to move.
    pub fn empty() -> Board {
        Board {
            pieces: [Piece::EMPTY; 64],
            piece_bb: [[0; 2]; 7],
            king_bb: [0; 2],
            to_move: Color::White,
            half_move_counter: 0,
            initial_half_move_clock: 0,
            first_king_move: [0; 2],
            first_king_rook_move: [0; 2],
            first_queen_rook_move: [0; 2],
            last_pawn_move: [0; 2],
            last_capture_move: [0; 2],
            prev_pawn_stamps: [Vec::new(), Vec::new()],
            prev_capture_stamps: [Vec::new(), Vec::new()],
            history: Vec::new(),
            attacked_mask: 0,
            attacked_valid: false,
        }
    }

    /// Standard initial position.
    pub fn new_game() -> Board {
        let mut board = Board::empty();
        board.place_initial_pieces();
        board
    }

    pub(crate) fn place_initial_pieces(&mut self) {
        for (file, &kind) in BACK_RANK_KINDS.iter().enumerate() {
            self.set_piece(square_at(0, file), Piece::new(Color::White, kind));
            self.set_piece(square_at(1, file), Piece::new(Color::White, PieceKind::Pawn));
            self.set_piece(square_at(6, file), Piece::new(Color::Black, PieceKind::Pawn));
            self.set_piece(square_at(7, file), Piece::new(Color::Black, kind));
        }
    }

    pub fn at(&self, sq: Square) -> Piece {
        self.pieces[sq]
    }

    pub fn bitboard(&self, color: Color, kind: PieceKind) -> u64 {
        self.piece_bb[kind.index()][color.index()]
    }

    pub fn occupancy(&self, color: Color) -> u64 {
        let c = color.index();
        self.piece_bb[1][c]
            | self.piece_bb[2][c]
            | self.piece_bb[3][c]
            | self.piece_bb[4][c]
            | self.piece_bb[5][c]
            | self.piece_bb[6][c]
    }

    pub fn occupancy_all(&self) -> u64 {
        self.occupancy(Color::White) | self.occupancy(Color::Black)
    }

    pub fn king_square(&self, color: Color) -> Square {
        self.king_bb[color.index()].trailing_zeros() as Square
    }

    pub(crate) fn set_piece(&mut self, sq: Square, piece: Piece) {
        self.clear_square(sq);
        self.pieces[sq] = piece;
        let mask = 1u64 << sq;
        self.piece_bb[piece.kind.index()][piece.color.index()] |= mask;
        if piece.kind == PieceKind::King {
            self.king_bb[piece.color.index()] |= mask;
        }
    }

    pub(crate) fn clear_square(&mut self, sq: Square) {
        let piece = self.pieces[sq];
        if piece.is_empty() {
            return;
        }
        let mask = !(1u64 << sq);
        self.piece_bb[piece.kind.index()][piece.color.index()] &= mask;
        if piece.kind == PieceKind::King {
            self.king_bb[piece.color.index()] &= mask;
        }
        self.pieces[sq] = Piece::EMPTY;
    }

    /// Plays `mv` on the board. The move must belong to the side to
    /// move; callers get moves from the generator or the notation
    /// parsers, which guarantee that.
    pub fn apply(&mut self, mv: Move) {
        assert_eq!(mv.color, self.to_move, "move color must match side to move");
        let mover = mv.color;
        let m = mover.index();
        let op = mover.opposite();
        let stamp = 1 + self.half_move_counter;

        if mv.is(FLAG_CASTLE) {
            let back = mover.back_rank();
            if file_of(mv.to) == 6 {
                self.clear_square(square_at(back, KING_ROOK_FILE));
                self.set_piece(square_at(back, 5), Piece::new(mover, PieceKind::Rook));
            } else {
                self.clear_square(square_at(back, QUEEN_ROOK_FILE));
                self.set_piece(square_at(back, 3), Piece::new(mover, PieceKind::Rook));
            }
        }
        if mv.is(FLAG_EN_PASSANT) {
            // the victim sits one rank behind the target, toward the mover
            let victim = (mv.to as i32 - 8 * mover.forward()) as Square;
            self.clear_square(victim);
        }

        self.clear_square(mv.from);
        let placed = if mv.is(FLAG_PROMOTION) { mv.promoted } else { mv.kind };
        self.set_piece(mv.to, Piece::new(mover, placed));

        match mv.kind {
            PieceKind::King => {
                if self.first_king_move[m] == 0 {
                    self.first_king_move[m] = stamp;
                }
                if mv.is(FLAG_CASTLE) {
                    if file_of(mv.to) == 6 {
                        if self.first_king_rook_move[m] == 0 {
                            self.first_king_rook_move[m] = stamp;
                        }
                    } else if self.first_queen_rook_move[m] == 0 {
                        self.first_queen_rook_move[m] = stamp;
                    }
                }
            }
            PieceKind::Rook => {
                let back = mover.back_rank();
                if mv.from == square_at(back, KING_ROOK_FILE) && self.first_king_rook_move[m] == 0 {
                    self.first_king_rook_move[m] = stamp;
                } else if mv.from == square_at(back, QUEEN_ROOK_FILE)
                    && self.first_queen_rook_move[m] == 0
                {
                    self.first_queen_rook_move[m] = stamp;
                }
            }
            PieceKind::Pawn => {
                self.prev_pawn_stamps[m].push(self.last_pawn_move[m]);
                self.last_pawn_move[m] = stamp;
            }
            _ => {}
        }

        if mv.is(FLAG_CAPTURE) {
            self.prev_capture_stamps[m].push(self.last_capture_move[m]);
            self.last_capture_move[m] = stamp;
            // capturing a rook on its home square forfeits that right
            if mv.captured == PieceKind::Rook {
                let o = op.index();
                let back = op.back_rank();
                if mv.to == square_at(back, KING_ROOK_FILE) && self.first_king_rook_move[o] == 0 {
                    self.first_king_rook_move[o] = stamp;
                } else if mv.to == square_at(back, QUEEN_ROOK_FILE)
                    && self.first_queen_rook_move[o] == 0
                {
                    self.first_queen_rook_move[o] = stamp;
                }
            }
        }

        self.to_move = op;
        self.half_move_counter += 1;
        self.attacked_mask = 0;
        self.attacked_valid = false;
        self.history.push(mv);
    }

    /// Exact inverse of the most recent `apply`.
    pub fn undo(&mut self) {
        assert!(!self.history.is_empty(), "undo requires a non-empty history");
        let mv = self.history[self.history.len() - 1];
        let mover = mv.color;
        let m = mover.index();
        let op = mover.opposite();
        // the ply being undone is the one the current counter names
        let stamp = self.half_move_counter;

        if mv.is(FLAG_CASTLE) {
            let back = mover.back_rank();
            if file_of(mv.to) == 6 {
                self.clear_square(square_at(back, 5));
                self.set_piece(square_at(back, KING_ROOK_FILE), Piece::new(mover, PieceKind::Rook));
            } else {
                self.clear_square(square_at(back, 3));
                self.set_piece(square_at(back, QUEEN_ROOK_FILE), Piece::new(mover, PieceKind::Rook));
            }
        }

        self.clear_square(mv.to);
        let moved = if mv.is(FLAG_PROMOTION) { PieceKind::Pawn } else { mv.kind };
        self.set_piece(mv.from, Piece::new(mover, moved));
        if mv.is(FLAG_EN_PASSANT) {
            let victim = (mv.to as i32 - 8 * mover.forward()) as Square;
            self.set_piece(victim, Piece::new(op, PieceKind::Pawn));
        } else if mv.is(FLAG_CAPTURE) {
            self.set_piece(mv.to, Piece::new(op, mv.captured));
        }

        match mv.kind {
            PieceKind::King => {
                if self.first_king_move[m] == stamp {
                    self.first_king_move[m] = 0;
                }
                if mv.is(FLAG_CASTLE) {
                    if file_of(mv.to) == 6 {
                        if self.first_king_rook_move[m] == stamp {
                            self.first_king_rook_move[m] = 0;
                        }
                    } else if self.first_queen_rook_move[m] == stamp {
                        self.first_queen_rook_move[m] = 0;
                    }
                }
            }
            PieceKind::Rook => {
                if self.first_king_rook_move[m] == stamp {
                    self.first_king_rook_move[m] = 0;
                } else if self.first_queen_rook_move[m] == stamp {
                    self.first_queen_rook_move[m] = 0;
                }
            }
            PieceKind::Pawn => {
                self.last_pawn_move[m] = self.prev_pawn_stamps[m].pop().unwrap_or(0);
            }
            _ => {}
        }

        if mv.is(FLAG_CAPTURE) {
            self.last_capture_move[m] = self.prev_capture_stamps[m].pop().unwrap_or(0);
            if mv.captured == PieceKind::Rook {
                let o = op.index();
                if self.first_king_rook_move[o] == stamp {
                    self.first_king_rook_move[o] = 0;
                } else if self.first_queen_rook_move[o] == stamp {
                    self.first_queen_rook_move[o] = 0;
                }
            }
        }

        self.to_move = mover;
        self.half_move_counter -= 1;
        self.attacked_mask = 0;
        self.attacked_valid = false;
        self.history.pop();
    }

    /// Half-moves since the last pawn move or capture by either side.
    pub fn moves_since_pawn_or_capture(&self) -> u16 {
        let newest = self
            .last_pawn_move
            .iter()
            .chain(self.last_capture_move.iter())
            .copied()
            .max()
            .unwrap_or(0);
        if newest == 0 {
            // no stamp reaches behind the loaded position; the
            // load-time carry covers the remainder of the clock
            return self.half_move_counter + self.initial_half_move_clock;
        }
        self.half_move_counter.saturating_sub(newest)
    }

    /// Text board for terminal output, white at the bottom.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("  a b c d e f g h\n");
        for rank in (0..8).rev() {
            out.push(char::from(b'1' + rank as u8));
            out.push(' ');
            for file in 0..8 {
                let piece = self.pieces[square_at(rank, file)];
                if piece.is_empty() {
                    out.push('.');
                } else {
                    out.push(piece.fen_char());
                }
                if file < 7 {
                    out.push(' ');
                }
            }
            out.push(' ');
            out.push(char::from(b'1' + rank as u8));
            out.push('\n');
        }
        out.push_str("  a b c d e f g h");
        out
    }
}

impl Default for Board {
    fn default() -> Board {
        Board::new_game()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::chess_move::FLAG_CAPTURE;
    use crate::board::square::parse_coord;

    fn sq(s: &str) -> Square {
        parse_coord(s).expect("test square should parse")
    }

    fn quiet(board: &Board, from: &str, to: &str) -> Move {
        Move::new(board.at(sq(from)), sq(from), sq(to), 0)
    }

    #[test]
    fn initial_position_counts() {
        let board = Board::new_game();
        assert_eq!(board.bitboard(Color::White, PieceKind::Pawn).count_ones(), 8);
        assert_eq!(board.bitboard(Color::Black, PieceKind::Pawn).count_ones(), 8);
        assert_eq!(board.occupancy_all().count_ones(), 32);
        assert_eq!(board.king_square(Color::White), sq("e1"));
        assert_eq!(board.king_square(Color::Black), sq("e8"));
        assert_eq!(board.to_move, Color::White);
    }

    #[test]
    fn apply_then_undo_restores_everything() {
        let mut board = Board::new_game();
        let reference = board.clone();

        board.apply(quiet(&board, "e2", "e4"));
        assert_eq!(board.to_move, Color::Black);
        assert_eq!(board.half_move_counter, 1);
        assert_eq!(board.history.len(), 1);
        assert!(board.at(sq("e2")).is_empty());
        assert_eq!(board.at(sq("e4")).kind, PieceKind::Pawn);

        board.undo();
        assert_eq!(board, reference);
    }

    #[test]
    fn capture_updates_and_restores_clock_stamp() {
        let mut board = Board::new_game();
        board.apply(quiet(&board, "e2", "e4"));
        board.apply(quiet(&board, "d7", "d5"));
        let capture = Move::new(board.at(sq("e4")), sq("e4"), sq("d5"), FLAG_CAPTURE)
            .with_captured(PieceKind::Pawn);
        board.apply(capture);

        assert_eq!(board.last_capture_move[Color::White.index()], 3);
        assert_eq!(board.moves_since_pawn_or_capture(), 0);
        assert_eq!(board.at(sq("d5")).color, Color::White);

        board.undo();
        assert_eq!(board.last_capture_move[Color::White.index()], 0);
        assert_eq!(board.at(sq("d5")).color, Color::Black);
        assert_eq!(board.at(sq("e4")).color, Color::White);
    }

    #[test]
    fn king_move_stamps_castle_right_and_undo_clears_it() {
        let mut board = Board::new_game();
        board.apply(quiet(&board, "e2", "e4"));
        board.apply(quiet(&board, "e7", "e5"));
        board.apply(quiet(&board, "e1", "e2"));

        let w = Color::White.index();
        assert_eq!(board.first_king_move[w], 3);

        board.undo();
        assert_eq!(board.first_king_move[w], 0);
    }

    #[test]
    fn rook_captured_on_home_square_forfeits_right() {
        // white knight sitting on g6 takes the h8 rook
        let mut board = Board::new_game();
        board.clear_square(sq("g6"));
        board.set_piece(sq("g6"), Piece::new(Color::White, PieceKind::Knight));
        let capture = Move::new(board.at(sq("g6")), sq("g6"), sq("h8"), FLAG_CAPTURE)
            .with_captured(PieceKind::Rook);
        board.apply(capture);

        let b = Color::Black.index();
        assert_eq!(board.first_king_rook_move[b], 1);
        assert_eq!(board.first_queen_rook_move[b], 0);

        board.undo();
        assert_eq!(board.first_king_rook_move[b], 0);
        assert_eq!(board.at(sq("h8")).kind, PieceKind::Rook);
    }

    #[test]
    fn castle_moves_rook_and_undo_puts_it_back() {
        let mut board = Board::new_game();
        board.clear_square(sq("f1"));
        board.clear_square(sq("g1"));
        let castle = Move::new(board.at(sq("e1")), sq("e1"), sq("g1"), FLAG_CASTLE);
        board.apply(castle);

        assert_eq!(board.at(sq("g1")).kind, PieceKind::King);
        assert_eq!(board.at(sq("f1")).kind, PieceKind::Rook);
        assert!(board.at(sq("h1")).is_empty());
        let w = Color::White.index();
        assert_eq!(board.first_king_move[w], 1);
        assert_eq!(board.first_king_rook_move[w], 1);

        board.undo();
        assert_eq!(board.at(sq("e1")).kind, PieceKind::King);
        assert_eq!(board.at(sq("h1")).kind, PieceKind::Rook);
        assert_eq!(board.first_king_move[w], 0);
        assert_eq!(board.first_king_rook_move[w], 0);
    }

    #[test]
    fn render_shows_initial_position() {
        let board = Board::new_game();
        let text = board.render();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "  a b c d e f g h");
        assert_eq!(lines[1], "8 r n b q k b n r 8");
        assert_eq!(lines[2], "7 p p p p p p p p 7");
        assert_eq!(lines[3], "6 . . . . . . . . 6");
        assert_eq!(lines[8], "1 R N B Q K B N R 1");
    }

    #[test]
    #[should_panic(expected = "move color must match side to move")]
    fn apply_rejects_wrong_color() {
        let mut board = Board::new_game();
        let mv = quiet(&board, "e7", "e5");
        board.apply(mv);
    }
}
