//! Crate root module declarations for the Cedar Chess engine.
//!
//! This file exposes all top-level subsystems (board state, move
//! generation, search, notation, and UCI protocol handling) so
//! binaries, tests, and external tooling can import stable module
//! paths.

pub mod errors;

pub mod board {
    pub mod board;
    pub mod chess_move;
    pub mod piece;
    pub mod square;
}

pub mod move_generation {
    pub mod attack_map;
    pub mod generator;
}

pub mod search {
    pub mod engine;
    pub mod evaluate;
}

pub mod notation {
    pub mod fen;
    pub mod long_algebraic;
    pub mod pgn;
    pub mod san;
}

pub mod uci {
    pub mod uci_top;
}
