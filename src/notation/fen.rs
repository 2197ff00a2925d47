//! FEN input and output.
//!
//! Emission reads everything straight off the board: castling letters
//! come from the right stamps, the en-passant target from the last
//! history move, the clocks from the counters. Parsing builds a fresh
//! board and reconstructs the counters, so a failed parse never leaves
//! a half-written board behind.

use crate::board::board::Board;
use crate::board::chess_move::Move;
use crate::board::piece::{Color, Piece, PieceKind};
use crate::board::square::{coord, file_of, parse_coord, rank_of, square_at};
use crate::errors::ParseError;

pub const INITIAL_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

pub fn board_to_fen(board: &Board) -> String {
    let mut fen = String::new();

    for rank in (0..8).rev() {
        let mut empty_run = 0;
        for file in 0..8 {
            let piece = board.at(square_at(rank, file));
            if piece.is_empty() {
                empty_run += 1;
                continue;
            }
            if empty_run > 0 {
                fen.push(char::from(b'0' + empty_run));
                empty_run = 0;
            }
            fen.push(piece.fen_char());
        }
        if empty_run > 0 {
            fen.push(char::from(b'0' + empty_run));
        }
        if rank > 0 {
            fen.push('/');
        }
    }

    fen.push(' ');
    fen.push(if board.to_move == Color::White { 'w' } else { 'b' });

    fen.push(' ');
    let mut any_castling = false;
    for (color, letters) in [(Color::White, ['K', 'Q']), (Color::Black, ['k', 'q'])] {
        let c = color.index();
        if board.first_king_move[c] != 0 {
            continue;
        }
        if board.first_king_rook_move[c] == 0 {
            fen.push(letters[0]);
            any_castling = true;
        }
        if board.first_queen_rook_move[c] == 0 {
            fen.push(letters[1]);
            any_castling = true;
        }
    }
    if !any_castling {
        fen.push('-');
    }

    fen.push(' ');
    match en_passant_target(board) {
        Some(sq) => fen.push_str(&coord(sq)),
        None => fen.push('-'),
    }

    fen.push_str(&format!(
        " {} {}",
        board.moves_since_pawn_or_capture(),
        1 + board.half_move_counter / 2
    ));
    fen
}

/// The square a pawn could capture onto en passant, when the last move
/// was a double pawn push.
fn en_passant_target(board: &Board) -> Option<usize> {
    let last = *board.history.last()?;
    if last.kind != PieceKind::Pawn {
        return None;
    }
    let dir = last.color.forward();
    if rank_of(last.to) as i32 != rank_of(last.from) as i32 + 2 * dir {
        return None;
    }
    Some(square_at(
        (rank_of(last.from) as i32 + dir) as usize,
        file_of(last.from),
    ))
}

pub fn board_from_fen(fen: &str) -> Result<Board, ParseError> {
    let fields: Vec<&str> = fen.split_whitespace().collect();
    if fields.len() != 6 {
        return Err(ParseError::InvalidFen(format!(
            "expected 6 fields, got {}",
            fields.len()
        )));
    }

    let mut board = Board::empty();
    parse_placement(&mut board, fields[0])?;

    board.to_move = match fields[1] {
        "w" => Color::White,
        "b" => Color::Black,
        other => {
            return Err(ParseError::InvalidFen(format!("bad side to move: {other}")));
        }
    };

    let mut rights = [[false; 2]; 2];
    if fields[2] != "-" {
        for c in fields[2].chars() {
            match c {
                'K' => rights[Color::White.index()][0] = true,
                'Q' => rights[Color::White.index()][1] = true,
                'k' => rights[Color::Black.index()][0] = true,
                'q' => rights[Color::Black.index()][1] = true,
                other => {
                    return Err(ParseError::InvalidFen(format!("bad castling field: {other}")));
                }
            }
        }
    }

    let half_move_clock: u16 = fields[4]
        .parse()
        .map_err(|_| ParseError::InvalidFen(format!("bad halfmove clock: {}", fields[4])))?;
    let full_move_counter: u16 = fields[5]
        .parse()
        .map_err(|_| ParseError::InvalidFen(format!("bad fullmove number: {}", fields[5])))?;
    if full_move_counter == 0 {
        return Err(ParseError::InvalidFen("fullmove number must be positive".to_owned()));
    }

    board.half_move_counter =
        (full_move_counter - 1) * 2 + if board.to_move == Color::Black { 1 } else { 0 };
    board.initial_half_move_clock = half_move_clock.saturating_sub(board.half_move_counter);

    // 0 keeps a right alive, so a forfeited right gets the current ply,
    // floored at 1 for positions claiming forfeiture at ply zero
    let forfeited = board.half_move_counter.max(1);
    for color in [Color::White, Color::Black] {
        let c = color.index();
        let (king_side, queen_side) = (rights[c][0], rights[c][1]);
        board.first_king_move[c] = if king_side || queen_side { 0 } else { forfeited };
        board.first_king_rook_move[c] = if king_side { 0 } else { forfeited };
        board.first_queen_rook_move[c] = if queen_side { 0 } else { forfeited };
    }

    let backdated = board.half_move_counter.saturating_sub(half_move_clock);
    board.last_pawn_move = [backdated; 2];
    board.last_capture_move = [backdated; 2];

    if fields[3] != "-" {
        synthesize_en_passant(&mut board, fields[3])?;
    }

    Ok(board)
}

fn parse_placement(board: &mut Board, placement: &str) -> Result<(), ParseError> {
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(ParseError::InvalidFen(format!(
            "expected 8 ranks, got {}",
            ranks.len()
        )));
    }
    for (row, text) in ranks.iter().enumerate() {
        let rank = 7 - row;
        let mut file = 0;
        for c in text.chars() {
            if let Some(n) = c.to_digit(10) {
                if !(1..=8).contains(&n) {
                    return Err(ParseError::InvalidFen(format!("bad empty run: {c}")));
                }
                file += n as usize;
            } else {
                let piece = Piece::from_fen_char(c)
                    .ok_or_else(|| ParseError::InvalidFen(format!("bad piece letter: {c}")))?;
                if file >= 8 {
                    return Err(ParseError::InvalidFen(format!("rank overflow: {text}")));
                }
                board.set_piece(square_at(rank, file), piece);
                file += 1;
            }
        }
        if file != 8 {
            return Err(ParseError::InvalidFen(format!("short rank: {text}")));
        }
    }
    for color in [Color::White, Color::Black] {
        if board.bitboard(color, PieceKind::King).count_ones() != 1 {
            return Err(ParseError::InvalidFen(format!("{color:?} must have exactly one king")));
        }
    }
    Ok(())
}

/// Plants the enemy double pawn push into history so generation and
/// re-emission both see the en-passant opportunity.
fn synthesize_en_passant(board: &mut Board, target: &str) -> Result<(), ParseError> {
    let sq = parse_coord(target)
        .map_err(|_| ParseError::InvalidFen(format!("bad en passant target: {target}")))?;
    let dir = board.to_move.forward();
    let enemy = board.to_move.opposite();
    let from_rank = rank_of(sq) as i32 + dir;
    let to_rank = rank_of(sq) as i32 - dir;
    if !(0..8).contains(&from_rank) || !(0..8).contains(&to_rank) {
        return Err(ParseError::InvalidFen(format!("bad en passant target: {target}")));
    }
    let to = square_at(to_rank as usize, file_of(sq));
    if board.at(to) != Piece::new(enemy, PieceKind::Pawn) {
        return Err(ParseError::InvalidFen(format!(
            "en passant target {target} has no matching pawn"
        )));
    }
    let mv = Move::new(
        Piece::new(enemy, PieceKind::Pawn),
        square_at(from_rank as usize, file_of(sq)),
        to,
        0,
    );
    // balance the stamp stack so a later undo of this move stays sound
    let e = enemy.index();
    board.prev_pawn_stamps[e].push(board.last_pawn_move[e]);
    board.history.push(mv);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::move_generation::generator::generate_moves;
    use crate::notation::long_algebraic::uci_to_move;

    fn play(board: &mut Board, uci_moves: &[&str]) {
        for text in uci_moves {
            let mv = uci_to_move(text, board).expect("scripted move should parse");
            board.apply(mv);
        }
    }

    #[test]
    fn initial_position_fen() {
        let board = Board::new_game();
        assert_eq!(board_to_fen(&board), INITIAL_POSITION_FEN);
    }

    #[test]
    fn fen_after_a_double_push_names_the_en_passant_target() {
        let mut board = Board::new_game();
        play(&mut board, &["e2e4"]);
        assert_eq!(
            board_to_fen(&board),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );
    }

    #[test]
    fn initial_fen_round_trips() {
        let board = board_from_fen(INITIAL_POSITION_FEN).expect("FEN should parse");
        assert_eq!(board_to_fen(&board), INITIAL_POSITION_FEN);
        assert_eq!(board.to_move, Color::White);
        assert_eq!(board.half_move_counter, 0);
    }

    #[test]
    fn mid_game_fen_round_trips_with_clocks() {
        let fen = "2kr2nr/pppq1ppp/2npb3/2b1p3/2B1P3/2NP1N2/PPPB1PPP/R2Q1RK1 w - - 5 8";
        let board = board_from_fen(fen).expect("FEN should parse");
        assert_eq!(board.half_move_counter, 14);
        assert_eq!(board.moves_since_pawn_or_capture(), 5);
        assert_eq!(board_to_fen(&board), fen);
    }

    #[test]
    fn en_passant_fen_round_trips_and_generates_the_capture() {
        let fen = "rnbqkbnr/ppp1pppp/8/8/3pP3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 2";
        let mut board = board_from_fen(fen).expect("FEN should parse");
        assert_eq!(board_to_fen(&board), fen);

        let moves = generate_moves(&mut board);
        assert!(moves.iter().any(|mv| mv.to_string() == "p d4xe3"));
    }

    #[test]
    fn loaded_moves_continue_the_counters() {
        let mut board =
            board_from_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 3 20").expect("FEN should parse");
        assert_eq!(board.half_move_counter, 38);
        assert_eq!(board.moves_since_pawn_or_capture(), 3);

        play(&mut board, &["e2e4"]);
        assert_eq!(board.moves_since_pawn_or_capture(), 0);
        assert_eq!(board_to_fen(&board), "4k3/8/8/8/4P3/8/8/4K3 b - e3 0 20");
    }

    #[test]
    fn halfmove_clock_deeper_than_the_ply_count_is_preserved() {
        // clock 10 at fullmove 2: the stamps can only reach back 2
        // plies, the rest rides on the load-time carry
        let fen = "4k3/8/8/8/8/8/8/4K3 w - - 10 2";
        let mut board = board_from_fen(fen).expect("FEN should parse");
        assert_eq!(board.moves_since_pawn_or_capture(), 10);
        assert_eq!(board_to_fen(&board), fen);

        play(&mut board, &["e1e2"]);
        assert_eq!(board_to_fen(&board), "4k3/8/8/8/8/8/4K3/8 b - - 11 2");
    }

    #[test]
    fn rejects_malformed_fens() {
        assert!(board_from_fen("").is_err());
        assert!(board_from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP w KQkq - 0 1").is_err());
        assert!(board_from_fen(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1"
        )
        .is_err());
        assert!(board_from_fen(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KXkq - 0 1"
        )
        .is_err());
        assert!(board_from_fen(
            "rnbqkbnr/ppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
        )
        .is_err());
        // two white kings
        assert!(board_from_fen("4k3/8/8/8/8/8/8/3KK3 w - - 0 1").is_err());
    }

    #[test]
    fn forfeited_rights_stay_forfeited_through_a_round_trip() {
        let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1";
        let board = board_from_fen(fen).expect("FEN should parse");
        assert_eq!(board_to_fen(&board), fen);
    }
}
