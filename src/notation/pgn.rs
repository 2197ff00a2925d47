//! Single-game PGN reading and writing.
//!
//! The reader is a small expect/soft-expect scanner: a tag-pair
//! section, then numbered movetext with an optional result marker.
//! Move tokens are collected as text; `replay` pushes them through the
//! SAN resolver, so a syntactically fine but unplayable game fails at
//! the offending move.

use crate::board::board::Board;
use crate::errors::ParseError;
use crate::notation::san::san_to_move;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    WhiteWins,
    BlackWins,
    Draw,
    Ongoing,
}

impl GameResult {
    pub fn marker(self) -> &'static str {
        match self {
            GameResult::WhiteWins => "1-0",
            GameResult::BlackWins => "0-1",
            GameResult::Draw => "1/2-1/2",
            GameResult::Ongoing => "*",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PgnGame {
    pub tags: Vec<(String, String)>,
    pub moves: Vec<String>,
    pub result: GameResult,
}

impl PgnGame {
    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Applies the game to `board` through the SAN resolver.
    pub fn replay(&self, board: &mut Board) -> Result<(), ParseError> {
        for san in &self.moves {
            let mv = san_to_move(san, board)?;
            board.apply(mv);
        }
        Ok(())
    }
}

pub fn parse_pgn(text: &str) -> Result<PgnGame, ParseError> {
    let mut s = Scanner::new(text);
    let mut tags = Vec::new();

    loop {
        s.skip_whitespace();
        if !s.soft_expect('[') {
            break;
        }
        let name = s.scan_while(|c| c.is_ascii_alphanumeric());
        if name.is_empty() {
            return Err(s.error("expected tag name"));
        }
        s.skip_whitespace();
        let value = s.scan_quoted()?;
        s.expect(']')?;
        tags.push((name, value));
    }

    let mut moves = Vec::new();
    let mut result = GameResult::Ongoing;
    'movetext: loop {
        s.skip_whitespace();
        if let Some(r) = s.soft_result() {
            result = r;
            break;
        }
        if s.at_end() || !s.peek().is_ascii_digit() {
            break;
        }
        s.scan_while(|c| c.is_ascii_digit());
        s.skip_whitespace();
        if !s.soft_expect('.') {
            return Err(s.error("expected '.' after move number"));
        }
        while s.soft_expect('.') {}

        for _ in 0..2 {
            s.skip_whitespace();
            if let Some(r) = s.soft_result() {
                result = r;
                break 'movetext;
            }
            if s.at_end() {
                break 'movetext;
            }
            let token = s.scan_while(is_san_char);
            if token.is_empty() {
                return Err(s.error("expected a move"));
            }
            moves.push(token);
            s.skip_whitespace();
            if s.at_end() {
                break 'movetext;
            }
        }
    }

    Ok(PgnGame { tags, moves, result })
}

/// Seven-tag-roster writer; the date is the day of writing.
pub fn write_pgn(white: &str, black: &str, moves: &[String], result: GameResult) -> String {
    let date = chrono::Local::now().format("%Y.%m.%d");
    let mut out = String::new();
    out.push_str("[Event \"Casual game\"]\n");
    out.push_str("[Site \"?\"]\n");
    out.push_str(&format!("[Date \"{date}\"]\n"));
    out.push_str("[Round \"-\"]\n");
    out.push_str(&format!("[White \"{white}\"]\n"));
    out.push_str(&format!("[Black \"{black}\"]\n"));
    out.push_str(&format!("[Result \"{}\"]\n\n", result.marker()));

    for (i, pair) in moves.chunks(2).enumerate() {
        out.push_str(&format!("{}. ", i + 1));
        for san in pair {
            out.push_str(san);
            out.push(' ');
        }
    }
    out.push_str(result.marker());
    out.push('\n');
    out
}

fn is_san_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '=' | '+' | '#' | '-')
}

struct Scanner<'a> {
    text: &'a str,
    pos: usize,
    line: usize,
    col: usize,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Scanner<'a> {
        Scanner {
            text,
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn peek(&self) -> char {
        self.text[self.pos..].chars().next().unwrap_or('\0')
    }

    fn bump(&mut self) -> char {
        let c = self.peek();
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        c
    }

    fn error(&self, message: &str) -> ParseError {
        ParseError::InvalidPgn {
            line: self.line,
            col: self.col,
            message: message.to_owned(),
        }
    }

    fn soft_expect(&mut self, expected: char) -> bool {
        if !self.at_end() && self.peek() == expected {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), ParseError> {
        if self.soft_expect(expected) {
            Ok(())
        } else {
            Err(self.error(&format!("expected '{expected}'")))
        }
    }

    fn soft_expect_str(&mut self, expected: &str) -> bool {
        if self.text[self.pos..].starts_with(expected) {
            for _ in 0..expected.chars().count() {
                self.bump();
            }
            true
        } else {
            false
        }
    }

    fn soft_result(&mut self) -> Option<GameResult> {
        if self.soft_expect_str("1-0") {
            Some(GameResult::WhiteWins)
        } else if self.soft_expect_str("0-1") {
            Some(GameResult::BlackWins)
        } else if self.soft_expect_str("1/2-1/2") {
            Some(GameResult::Draw)
        } else if self.soft_expect('*') {
            Some(GameResult::Ongoing)
        } else {
            None
        }
    }

    fn skip_whitespace(&mut self) {
        while !self.at_end() && self.peek().is_whitespace() {
            self.bump();
        }
    }

    fn scan_while(&mut self, keep: impl Fn(char) -> bool) -> String {
        let mut out = String::new();
        while !self.at_end() && keep(self.peek()) {
            out.push(self.bump());
        }
        out
    }

    fn scan_quoted(&mut self) -> Result<String, ParseError> {
        self.expect('"')?;
        let mut out = String::new();
        loop {
            if self.at_end() {
                return Err(self.error("unterminated string"));
            }
            let c = self.bump();
            if c == '"' {
                return Ok(out);
            }
            out.push(c);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notation::fen::board_to_fen;

    const ITALIAN: &str = "\
[Event \"Test game\"]
[White \"Alice\"]
[Black \"Bob\"]

1. e4 e5 2. Nf3 Nc6 3. Bc4 Bc5 4. O-O d6 5. d3 Be6
6. Bd2 Qd7 7. Nc3 O-O-O 1/2-1/2
";

    #[test]
    fn parses_tags_moves_and_result() {
        let game = parse_pgn(ITALIAN).expect("PGN should parse");
        assert_eq!(game.tag("White"), Some("Alice"));
        assert_eq!(game.tag("Black"), Some("Bob"));
        assert_eq!(game.moves.len(), 14);
        assert_eq!(game.moves[0], "e4");
        assert_eq!(game.moves[6], "O-O");
        assert_eq!(game.result, GameResult::Draw);
    }

    #[test]
    fn replay_reaches_the_expected_position() {
        let game = parse_pgn(ITALIAN).expect("PGN should parse");
        let mut board = Board::new_game();
        game.replay(&mut board).expect("game should replay");
        assert_eq!(
            board_to_fen(&board),
            "2kr2nr/pppq1ppp/2npb3/2b1p3/2B1P3/2NP1N2/PPPB1PPP/R2Q1RK1 w - - 5 8"
        );
    }

    #[test]
    fn movetext_without_result_is_ongoing() {
        let game = parse_pgn("1. e4 e5 2. Nf3").expect("PGN should parse");
        assert_eq!(game.moves.len(), 3);
        assert_eq!(game.result, GameResult::Ongoing);
    }

    #[test]
    fn errors_carry_stream_positions() {
        let err = parse_pgn("[Event \"unterminated]\n1. e4").expect_err("should fail");
        match err {
            ParseError::InvalidPgn { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other:?}"),
        }

        let err = parse_pgn("1 e4 e5").expect_err("should fail");
        match err {
            ParseError::InvalidPgn { line, col, .. } => {
                assert_eq!(line, 1);
                assert_eq!(col, 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unplayable_move_fails_on_replay() {
        let game = parse_pgn("1. e4 e4").expect("PGN should parse");
        let mut board = Board::new_game();
        assert!(game.replay(&mut board).is_err());
    }

    #[test]
    fn written_game_parses_back() {
        let moves: Vec<String> = ["e4", "e5", "Nf3"].iter().map(|s| s.to_string()).collect();
        let text = write_pgn("Alice", "Bob", &moves, GameResult::Ongoing);
        assert!(text.contains("[White \"Alice\"]"));
        assert!(text.contains("[Date \""));

        let game = parse_pgn(&text).expect("written PGN should parse");
        assert_eq!(game.moves, moves);
        assert_eq!(game.result, GameResult::Ongoing);
        assert_eq!(game.tag("Black"), Some("Bob"));
    }
}
