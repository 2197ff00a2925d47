//! Standard algebraic notation, resolved against the legal move list.
//!
//! The resolver never trusts the text alone: it generates the legal
//! moves for the position and keeps the unique one the token selects.
//! No match and more than one match are both errors.

use crate::board::board::Board;
use crate::board::chess_move::{Move, FLAG_CAPTURE, FLAG_CASTLE};
use crate::board::piece::PieceKind;
use crate::board::square::{file_of, rank_of};
use crate::errors::ParseError;
use crate::move_generation::generator::generate_moves;

pub fn san_to_move(text: &str, board: &mut Board) -> Result<Move, ParseError> {
    let moves = generate_moves(board);
    let san = text.trim_end_matches(['+', '#']);
    if san.is_empty() {
        return Err(ParseError::InvalidSan(text.to_owned()));
    }

    if san == "O-O" || san == "O-O-O" {
        let castle_file = if san == "O-O" { 6 } else { 2 };
        return moves
            .iter()
            .find(|mv| mv.is(FLAG_CASTLE) && file_of(mv.to) == castle_file)
            .copied()
            .ok_or_else(|| ParseError::InvalidSan(text.to_owned()));
    }

    let (promoted, body) = match san.split_once('=') {
        Some((body, promo)) => {
            let kind = match promo {
                "N" => PieceKind::Knight,
                "B" => PieceKind::Bishop,
                "R" => PieceKind::Rook,
                "Q" => PieceKind::Queen,
                _ => return Err(ParseError::InvalidSan(text.to_owned())),
            };
            (kind, body)
        }
        None => (PieceKind::None, san),
    };

    let mut chars: Vec<char> = body.chars().collect();
    let kind = match chars.first() {
        Some('K') => PieceKind::King,
        Some('Q') => PieceKind::Queen,
        Some('R') => PieceKind::Rook,
        Some('B') => PieceKind::Bishop,
        Some('N') => PieceKind::Knight,
        _ => PieceKind::Pawn,
    };
    if kind != PieceKind::Pawn {
        chars.remove(0);
    }

    let mut is_capture = false;
    chars.retain(|&c| {
        if c == 'x' {
            is_capture = true;
            false
        } else {
            true
        }
    });

    if chars.len() < 2 || chars.len() > 4 {
        return Err(ParseError::InvalidSan(text.to_owned()));
    }
    let dest: String = chars.split_off(chars.len() - 2).into_iter().collect();
    let to = crate::board::square::parse_coord(&dest)
        .map_err(|_| ParseError::InvalidSan(text.to_owned()))?;

    let mut from_file = None;
    let mut from_rank = None;
    for c in chars {
        match c {
            'a'..='h' => from_file = Some((c as u8 - b'a') as usize),
            '1'..='8' => from_rank = Some((c as u8 - b'1') as usize),
            _ => return Err(ParseError::InvalidSan(text.to_owned())),
        }
    }

    let mut candidates = moves.iter().filter(|mv| {
        mv.kind == kind
            && mv.to == to
            && mv.promoted == promoted
            && from_file.map_or(true, |f| file_of(mv.from) == f)
            && from_rank.map_or(true, |r| rank_of(mv.from) == r)
            && (!is_capture || mv.is(FLAG_CAPTURE))
    });

    match (candidates.next(), candidates.next()) {
        (Some(&mv), None) => Ok(mv),
        _ => Err(ParseError::InvalidSan(text.to_owned())),
    }
}
