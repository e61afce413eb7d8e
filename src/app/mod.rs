mod commands;
mod form;
mod help;
mod state;

pub use state::*;
