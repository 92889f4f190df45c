//! Game data models reflected from the authority.

pub mod tictactoe;
