use anyhow::Context;
use snakeladder::{GameConfig, LadderGame};

fn main() -> anyhow::Result<()> {
    let mut game = LadderGame::with_config(GameConfig::default());
    game.play().context("snake and ladder game stopped")?;
    Ok(())
}
