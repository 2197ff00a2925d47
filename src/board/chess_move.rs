//! Move records and their fixed-width encoding.
//!
//! A move is a plain record; the packed `u32` form exists for the
//! serialization boundary and defines equality (two moves are the same
//! move iff their encodings match). The null move is the all-zero
//! encoding, which no real move can produce because a real move always
//! carries a nonzero piece kind.

use std::fmt;

use crate::board::piece::{Color, Piece, PieceKind};
use crate::board::square::{coord, Square};

pub type MoveFlags = u8;

pub const FLAG_CAPTURE: MoveFlags = 1 << 0;
pub const FLAG_EN_PASSANT: MoveFlags = 1 << 1;
pub const FLAG_CASTLE: MoveFlags = 1 << 2;
pub const FLAG_PROMOTION: MoveFlags = 1 << 3;

#[derive(Debug, Clone, Copy)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub color: Color,
    pub kind: PieceKind,
    pub flags: MoveFlags,
    pub promoted: PieceKind,
    pub captured: PieceKind,
}

impl Move {
    pub const NULL: Move = Move {
        from: 0,
        to: 0,
        color: Color::White,
        kind: PieceKind::None,
        flags: 0,
        promoted: PieceKind::None,
        captured: PieceKind::None,
    };

    pub const fn new(piece: Piece, from: Square, to: Square, flags: MoveFlags) -> Move {
        Move {
            from,
            to,
            color: piece.color,
            kind: piece.kind,
            flags,
            promoted: PieceKind::None,
            captured: PieceKind::None,
        }
    }

    pub const fn with_captured(mut self, captured: PieceKind) -> Move {
        self.captured = captured;
        self
    }

    pub const fn with_promoted(mut self, promoted: PieceKind) -> Move {
        self.promoted = promoted;
        self
    }

    pub const fn is(self, flag: MoveFlags) -> bool {
        self.flags & flag != 0
    }

    pub fn is_null(self) -> bool {
        self.encode() == 0
    }

    /// Packs into `promoted | flags | from | to | color | kind | captured`,
    /// low bits first.
    pub fn encode(self) -> u32 {
        self.promoted.code()
            | (self.flags as u32) << 3
            | (self.from as u32) << 7
            | (self.to as u32) << 13
            | (self.color.index() as u32) << 19
            | self.kind.code() << 20
            | self.captured.code() << 23
    }

    pub fn decode(data: u32) -> Option<Move> {
        Some(Move {
            promoted: PieceKind::from_code(data & 0x7)?,
            flags: ((data >> 3) & 0xf) as MoveFlags,
            from: ((data >> 7) & 0x3f) as Square,
            to: ((data >> 13) & 0x3f) as Square,
            color: if (data >> 19) & 0x1 == 0 {
                Color::White
            } else {
                Color::Black
            },
            kind: PieceKind::from_code((data >> 20) & 0x7)?,
            captured: PieceKind::from_code((data >> 23) & 0x7)?,
        })
    }
}

impl PartialEq for Move {
    fn eq(&self, other: &Move) -> bool {
        self.encode() == other.encode()
    }
}

impl Eq for Move {}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = Piece::new(self.color, self.kind).fen_char();
        if self.is(FLAG_CASTLE) {
            let side = if self.to > self.from { "O-O" } else { "O-O-O" };
            return write!(f, "{letter} {side}");
        }
        let join = if self.is(FLAG_CAPTURE) { 'x' } else { '-' };
        write!(f, "{letter} {}{join}{}", coord(self.from), coord(self.to))?;
        if self.is(FLAG_PROMOTION) {
            write!(f, "={}", self.promoted.letter())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::square::parse_coord;

    fn sq(s: &str) -> Square {
        parse_coord(s).expect("test square should parse")
    }

    #[test]
    fn null_move_is_all_zero() {
        assert_eq!(Move::NULL.encode(), 0);
        assert!(Move::NULL.is_null());
        let real = Move::new(Piece::new(Color::White, PieceKind::Pawn), sq("e2"), sq("e4"), 0);
        assert!(!real.is_null());
    }

    #[test]
    fn codec_round_trip() {
        let mv = Move::new(
            Piece::new(Color::Black, PieceKind::Pawn),
            sq("a2"),
            sq("b1"),
            FLAG_CAPTURE | FLAG_PROMOTION,
        )
        .with_captured(PieceKind::Rook)
        .with_promoted(PieceKind::Queen);
        let decoded = Move::decode(mv.encode()).expect("encoding should decode");
        assert_eq!(decoded, mv);
        assert_eq!(decoded.captured, PieceKind::Rook);
        assert_eq!(decoded.promoted, PieceKind::Queen);
    }

    #[test]
    fn display_matches_move_text_format() {
        let king = Piece::new(Color::White, PieceKind::King);
        let quiet = Move::new(king, sq("e4"), sq("e5"), 0);
        assert_eq!(quiet.to_string(), "K e4-e5");

        let capture = Move::new(Piece::new(Color::Black, PieceKind::Queen), sq("a1"), sq("a8"), FLAG_CAPTURE);
        assert_eq!(capture.to_string(), "q a1xa8");

        let promo = Move::new(Piece::new(Color::White, PieceKind::Pawn), sq("a7"), sq("a8"), FLAG_PROMOTION)
            .with_promoted(PieceKind::Rook);
        assert_eq!(promo.to_string(), "P a7-a8=R");

        let castle = Move::new(king, sq("e1"), sq("g1"), FLAG_CASTLE);
        assert_eq!(castle.to_string(), "K O-O");
        let long_castle = Move::new(king, sq("e1"), sq("c1"), FLAG_CASTLE);
        assert_eq!(long_castle.to_string(), "K O-O-O");
    }
}
