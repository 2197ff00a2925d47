//! Negamax alpha-beta search behind a small engine state machine.
//!
//! The engine must be started before it will search, and while a
//! search runs it reports itself busy; a `best_move` call in any other
//! state than ready yields the null move. Root moves that tie for the
//! best score are decided by a uniform random pick, so equal positions
//! do not always replay the same game.

use rand::prelude::IndexedRandom;

use crate::board::board::Board;
use crate::board::chess_move::Move;
use crate::move_generation::generator::generate_moves_into;
use crate::search::evaluate::{evaluate, Score};

pub const DEFAULT_SEARCH_DEPTH: u32 = 3;

/// Wider than any evaluation, so mate scores still fit inside the
/// alpha-beta window.
const INFINITY_SCORE: Score = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    NotStarted,
    Ready,
    Busy,
}

/// Called with the chosen move, the search depth and its score.
pub type SearchObserver = Box<dyn FnMut(Move, u32, Score)>;

pub struct Engine {
    state: EngineState,
    depth: u32,
    observer: Option<SearchObserver>,
    /// Recycled per-ply move lists, so a search allocates only on its
    /// deepest first descent.
    buffers: Vec<Vec<Move>>,
}

impl Engine {
    pub fn new() -> Engine {
        Engine::with_depth(DEFAULT_SEARCH_DEPTH)
    }

    pub fn with_depth(depth: u32) -> Engine {
        Engine {
            state: EngineState::NotStarted,
            depth: depth.max(1),
            observer: None,
            buffers: Vec::new(),
        }
    }

    pub fn start(&mut self) {
        if self.state == EngineState::NotStarted {
            self.state = EngineState::Ready;
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn set_observer(&mut self, observer: SearchObserver) {
        self.observer = Some(observer);
    }

    /// Searches the position and returns the chosen move, or the null
    /// move when the engine is not ready or the side to move has no
    /// legal moves.
    pub fn best_move(&mut self, board: &mut Board) -> Move {
        if self.state != EngineState::Ready {
            return Move::NULL;
        }
        self.state = EngineState::Busy;

        let mut root_moves = self.take_buffer();
        generate_moves_into(board, &mut root_moves);
        if root_moves.is_empty() {
            self.give_back(root_moves);
            self.state = EngineState::Ready;
            return Move::NULL;
        }

        let mut best_score = -INFINITY_SCORE;
        let mut best_moves: Vec<Move> = Vec::new();
        for &mv in &root_moves {
            board.apply(mv);
            let score = -self.search(board, self.depth - 1, -INFINITY_SCORE, INFINITY_SCORE);
            board.undo();
            if score > best_score {
                best_score = score;
                best_moves.clear();
                best_moves.push(mv);
            } else if score == best_score {
                best_moves.push(mv);
            }
        }
        self.give_back(root_moves);

        let mut rng = rand::rng();
        let chosen = best_moves.as_slice().choose(&mut rng).copied().unwrap_or(Move::NULL);
        if let Some(observer) = self.observer.as_mut() {
            observer(chosen, self.depth, best_score);
        }

        self.state = EngineState::Ready;
        chosen
    }

    fn search(&mut self, board: &mut Board, depth: u32, mut alpha: Score, beta: Score) -> Score {
        let mut moves = self.take_buffer();
        generate_moves_into(board, &mut moves);

        if depth == 0 || moves.is_empty() {
            let score = evaluate(board, moves.len());
            self.give_back(moves);
            return score;
        }

        let mut best = -INFINITY_SCORE;
        for i in 0..moves.len() {
            let mv = moves[i];
            board.apply(mv);
            let value = -self.search(board, depth - 1, -beta, -alpha);
            board.undo();
            if value > best {
                best = value;
            }
            if best > alpha {
                alpha = best;
            }
            if alpha >= beta {
                break;
            }
        }
        self.give_back(moves);
        best
    }

    fn take_buffer(&mut self) -> Vec<Move> {
        self.buffers.pop().unwrap_or_default()
    }

    fn give_back(&mut self, mut buffer: Vec<Move>) {
        buffer.clear();
        self.buffers.push(buffer);
    }
}

impl Default for Engine {
    fn default() -> Engine {
        Engine::new()
    }
}
