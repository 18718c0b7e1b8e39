pub mod board;
pub mod config;
pub mod engine;
pub mod error;
pub mod game;
pub mod input;
pub mod render;
pub mod terminal;

pub use board::{portal_at, tile_to_grid, GridPos, Portal, PortalKind, Tile, NUM_TILES};
pub use config::GameConfig;
pub use engine::{Outcome, Phase, Turn, TurnEngine};
pub use error::GameError;
pub use game::LadderGame;
