use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),
    #[error("input stream closed")]
    InputClosed,
}

pub type Result<T> = std::result::Result<T, GameError>;
