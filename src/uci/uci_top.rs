//! UCI protocol front end and command loop.
//!
//! Parses the lifecycle commands, maintains the current position,
//! routes `go` to the engine and emits protocol-compliant output.
//! Search is synchronous, so `stop` repeats the most recent best move
//! rather than interrupting anything.

use std::io::{self, BufRead, Write};

use crate::board::board::Board;
use crate::move_generation::generator::generate_moves;
use crate::notation::fen::board_from_fen;
use crate::notation::long_algebraic::{move_to_uci, uci_to_move};
use crate::search::engine::{Engine, DEFAULT_SEARCH_DEPTH};

const UCI_ENGINE_NAME: &str = "Cedar Chess";
const UCI_ENGINE_AUTHOR: &str = "the cedar_chess authors";

pub fn run_stdio_loop() -> io::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut uci = UciState::new();

    for line in stdin.lock().lines() {
        let line = line?;
        let should_quit = uci.handle_command(&line, &mut stdout)?;
        stdout.flush()?;
        if should_quit {
            break;
        }
    }

    Ok(())
}

struct UciState {
    board: Board,
    engine: Engine,
    depth: u32,
    last_best: Option<String>,
}

impl UciState {
    fn new() -> Self {
        let mut engine = Engine::with_depth(DEFAULT_SEARCH_DEPTH);
        engine.start();
        Self {
            board: Board::new_game(),
            engine,
            depth: DEFAULT_SEARCH_DEPTH,
            last_best: None,
        }
    }

    fn handle_command(&mut self, line: &str, out: &mut impl Write) -> io::Result<bool> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(false);
        }

        let mut parts = trimmed.split_whitespace();
        let cmd = parts.next().unwrap_or_default();

        match cmd {
            "uci" => {
                writeln!(out, "id name {}", UCI_ENGINE_NAME)?;
                writeln!(out, "id author {}", UCI_ENGINE_AUTHOR)?;
                writeln!(out, "uciok")?;
            }
            "isready" => {
                writeln!(out, "readyok")?;
            }
            "ucinewgame" => {
                self.board = Board::new_game();
                self.last_best = None;
            }
            "position" => {
                if let Err(err) = self.handle_position(trimmed) {
                    writeln!(out, "info string position error: {}", err)?;
                }
            }
            "go" => {
                self.handle_go(trimmed, out)?;
            }
            "stop" => {
                // search is synchronous; the best we can do is repeat
                // the last answer
                match &self.last_best {
                    Some(best) => writeln!(out, "bestmove {}", best)?,
                    None => writeln!(out, "bestmove 0000")?,
                }
            }
            "quit" => {
                return Ok(true);
            }
            _ => {
                // unknown commands are ignored for UCI compatibility
            }
        }

        Ok(false)
    }

    fn handle_position(&mut self, line: &str) -> Result<(), String> {
        let mut tokens = line.split_whitespace().peekable();
        let _ = tokens.next(); // "position"

        let mut board = match tokens.next() {
            Some("startpos") => Board::new_game(),
            Some("fen") => {
                let mut fen_parts = Vec::<&str>::new();
                while let Some(next) = tokens.peek() {
                    if *next == "moves" {
                        break;
                    }
                    fen_parts.push(tokens.next().unwrap_or_default());
                }
                if fen_parts.is_empty() {
                    return Err("missing FEN after 'position fen'".to_owned());
                }
                board_from_fen(&fen_parts.join(" ")).map_err(|e| e.to_string())?
            }
            Some(other) => return Err(format!("unsupported position token '{}'", other)),
            None => return Err("incomplete position command".to_owned()),
        };

        if tokens.peek().copied() == Some("moves") {
            let _ = tokens.next();
            for lan in tokens {
                let mv = uci_to_move(lan, &board).map_err(|e| e.to_string())?;
                if !generate_moves(&mut board).contains(&mv) {
                    return Err(format!("illegal move '{}'", lan));
                }
                board.apply(mv);
            }
        }

        self.board = board;
        Ok(())
    }

    fn handle_go(&mut self, line: &str, out: &mut impl Write) -> io::Result<()> {
        if let Some(depth) = parse_go_depth(line) {
            if depth != self.depth {
                self.depth = depth;
                self.engine = Engine::with_depth(depth);
                self.engine.start();
            }
        }

        let chosen = self.engine.best_move(&mut self.board);
        if chosen.is_null() {
            self.last_best = None;
            writeln!(out, "bestmove 0000")?;
        } else {
            let lan = move_to_uci(chosen);
            writeln!(out, "bestmove {}", lan)?;
            self.last_best = Some(lan);
        }
        Ok(())
    }
}

fn parse_go_depth(line: &str) -> Option<u32> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let at = tokens.iter().position(|&t| t == "depth")?;
    tokens.get(at + 1)?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::piece::Color;
    use crate::notation::fen::board_to_fen;

    fn run(state: &mut UciState, line: &str) -> String {
        let mut out = Vec::new();
        state
            .handle_command(line, &mut out)
            .expect("command should be handled");
        String::from_utf8(out).expect("output should be UTF-8")
    }

    #[test]
    fn uci_handshake_identifies_the_engine() {
        let mut state = UciState::new();
        let out = run(&mut state, "uci");
        assert!(out.contains("id name Cedar Chess"));
        assert!(out.ends_with("uciok\n"));
        assert_eq!(run(&mut state, "isready"), "readyok\n");
    }

    #[test]
    fn position_startpos_with_moves_updates_state() {
        let mut state = UciState::new();
        state
            .handle_position("position startpos moves e2e4 e7e5 g1f3")
            .expect("position command should parse");
        assert_eq!(state.board.to_move, Color::Black);
        assert_eq!(state.board.history.len(), 3);
    }

    #[test]
    fn position_fen_without_moves_updates_state() {
        let mut state = UciState::new();
        state
            .handle_position("position fen 4k3/8/8/8/8/8/4P3/4K3 w - - 0 1")
            .expect("position fen should parse");
        assert_eq!(board_to_fen(&state.board), "4k3/8/8/8/8/8/4P3/4K3 w - - 0 1");
    }

    #[test]
    fn go_reports_a_playable_best_move() {
        let mut state = UciState::new();
        run(&mut state, "position startpos");
        let out = run(&mut state, "go depth 2");
        let best = out
            .trim()
            .strip_prefix("bestmove ")
            .expect("go should report a bestmove");
        assert!(uci_to_move(best, &state.board).is_ok());

        // stop repeats the same answer
        assert_eq!(run(&mut state, "stop"), format!("bestmove {}\n", best));
    }

    #[test]
    fn go_in_a_mated_position_reports_the_null_move() {
        let mut state = UciState::new();
        run(
            &mut state,
            "position fen 6k1/8/8/8/8/8/5PPP/4r1K1 w - - 0 1",
        );
        assert_eq!(run(&mut state, "go"), "bestmove 0000\n");
    }

    #[test]
    fn bad_position_is_reported_not_fatal() {
        let mut state = UciState::new();
        let out = run(&mut state, "position fen not-a-fen 0 1 2 3 4");
        assert!(out.contains("position error"));

        let out = run(&mut state, "position startpos moves e2e5");
        assert!(out.contains("position error"));
    }

    #[test]
    fn quit_ends_the_loop_and_unknown_commands_are_ignored() {
        let mut state = UciState::new();
        let mut out = Vec::new();
        assert!(!state
            .handle_command("flarb", &mut out)
            .expect("unknown command should be ignored"));
        assert!(state.handle_command("quit", &mut out).expect("quit should be handled"));
        assert!(out.is_empty());
    }
}
