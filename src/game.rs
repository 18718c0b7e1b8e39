// the game loop: read input, advance the turn engine, draw a frame.
// frames are drawn at a fixed rate and nothing in the loop ever sleeps for
// longer than a few milliseconds, rolls and portal pauses run on timers
use std::sync::mpsc::TryRecvError;
use std::thread;
use std::time::{Duration, Instant};

use circular_buffer::CircularBuffer;

use crate::board::Tile;
use crate::config::GameConfig;
use crate::engine::{Turn, TurnEngine};
use crate::error::{GameError, Result};
use crate::input::{InputDecoder, InputEvent};
use crate::render::{dice_button, Frame, Renderer};
use crate::terminal::{present, spawn_stdin_channel, RawTerminal};

const MESSAGE_LOG_LEN: usize = 5;

/// The most recent game messages, oldest first.
#[derive(Debug)]
pub struct MessageLog {
    lines: CircularBuffer<MESSAGE_LOG_LEN, String>,
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageLog {
    pub fn new() -> Self {
        MessageLog {
            lines: CircularBuffer::new(),
        }
    }

    /// Adds a line, dropping the oldest once the log is full.
    pub fn push(&mut self, line: String) {
        self.lines.push_back(line);
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|line| line.as_str())
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

// the token rests where it landed before a snake or ladder moves it
#[derive(Debug, Clone, Copy)]
struct PortalPause {
    landed: Tile,
    until: Instant,
}

#[derive(Debug)]
pub struct LadderGame {
    config: GameConfig,
    engine: TurnEngine,
    renderer: Renderer,
    decoder: InputDecoder,
    log: MessageLog,
    pause: Option<PortalPause>,
    quit: bool,
}

impl LadderGame {
    pub fn new() -> Self {
        Self::with_config(GameConfig::default())
    }

    pub fn with_config(config: GameConfig) -> Self {
        LadderGame {
            engine: TurnEngine::from_config(&config),
            renderer: Renderer::new(config.color),
            decoder: InputDecoder::new(),
            log: MessageLog::new(),
            pause: None,
            quit: false,
            config,
        }
    }

    pub fn engine(&self) -> &TurnEngine {
        &self.engine
    }

    pub fn messages(&self) -> &MessageLog {
        &self.log
    }

    pub fn has_quit(&self) -> bool {
        self.quit
    }

    /// Tile the token is drawn on. During a portal pause this is the tile
    /// the roll landed on rather than the portal's destination.
    pub fn token_tile(&self) -> Tile {
        match self.pause {
            Some(pause) => pause.landed,
            None => self.engine.position(),
        }
    }

    pub fn play(&mut self) -> Result<()> {
        // raw stdin for the lifetime of the loop, restored on any exit path
        let terminal = RawTerminal::enter()?;
        // spawn a thread to read from stdin
        let stdin_channel = spawn_stdin_channel();
        let frame_time = self.config.frame_time();
        let mut frame_start: Option<Instant> = None;
        loop {
            // receive input from pipe
            loop {
                match stdin_channel.try_recv() {
                    Ok(key) => self.decoder.push(key),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => return Err(GameError::InputClosed),
                }
            }
            while let Some(event) = self.decoder.next_event() {
                self.handle_event(event, Instant::now());
            }
            if self.quit {
                break;
            }
            if frame_start.is_some_and(|start| start.elapsed() < frame_time) {
                // wait for next frame
                thread::sleep(Duration::from_millis(3));
                continue;
            }
            let now = Instant::now();
            frame_start = Some(now);
            self.update(now);
            present(&self.render())?;
        }
        drop(terminal);
        self.display_final_screen();
        Ok(())
    }

    pub fn handle_event(&mut self, event: InputEvent, now: Instant) {
        match event {
            InputEvent::Quit => self.quit = true,
            InputEvent::Roll => self.request_roll(now),
            InputEvent::Click { col, row } => {
                // only clicks on the dice count as a roll
                if dice_button().contains(col, row) {
                    self.request_roll(now);
                }
            }
        }
    }

    fn request_roll(&mut self, now: Instant) {
        if self.pause.is_some() || !self.engine.is_idle() {
            return;
        }
        self.engine.begin_roll(now);
    }

    /// Advances timers to `now`, returning the turn that resolved, if any.
    pub fn update(&mut self, now: Instant) -> Option<Turn> {
        if self.pause.is_some_and(|pause| now >= pause.until) {
            self.pause = None;
        }
        let turn = self.engine.tick(now)?;
        self.log.push(turn.to_string());
        if turn.portal.is_some() && !self.config.portal_pause.is_zero() {
            self.pause = Some(PortalPause {
                landed: turn.landed,
                until: now + self.config.portal_pause,
            });
        }
        Some(turn)
    }

    pub fn render(&self) -> String {
        let frame = Frame {
            token: self.token_tile(),
            phase: self.engine.phase(),
            die: self.engine.last_roll(),
            messages: self.log.iter().collect(),
        };
        self.renderer.render(&frame)
    }

    fn display_final_screen(&self) {
        if self.engine.is_finished() {
            println!("You Win! Final Score: {}", self.engine.position());
        } else {
            println!("Game stopped on tile {}", self.engine.position());
        }
    }
}

impl Default for LadderGame {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Phase;

    fn quick_game(seed: u64) -> LadderGame {
        let config = GameConfig::default()
            .with_seed(seed)
            .with_roll_animation(2, Duration::from_millis(10))
            .with_portal_pause(Duration::from_millis(50))
            .with_color(false);
        LadderGame::with_config(config)
    }

    #[test]
    fn message_log_keeps_the_latest_lines() {
        let mut log = MessageLog::new();
        for i in 0..8 {
            log.push(format!("line {}", i));
        }
        assert_eq!(log.len(), MESSAGE_LOG_LEN);
        assert_eq!(log.iter().next(), Some("line 3"));
        assert_eq!(log.iter().last(), Some("line 7"));
    }

    #[test]
    fn click_outside_the_dice_does_nothing() {
        let mut game = quick_game(1);
        let now = Instant::now();
        game.handle_event(InputEvent::Click { col: 1, row: 1 }, now);
        assert_eq!(game.engine().phase(), Phase::Idle);
    }

    #[test]
    fn click_on_the_dice_rolls() {
        let mut game = quick_game(1);
        let button = dice_button();
        let now = Instant::now();
        game.handle_event(InputEvent::Click { col: button.col + 1, row: button.row + 1 }, now);
        assert_eq!(game.engine().phase(), Phase::Rolling);

        assert_eq!(game.update(now), None);
        let turn = game.update(now + Duration::from_millis(20)).unwrap();
        assert_eq!(game.messages().len(), 1);
        assert_eq!(game.messages().iter().next(), Some(turn.to_string().as_str()));
        assert_eq!(game.engine().position(), turn.position);
    }

    #[test]
    fn quit_key_stops_the_game() {
        let mut game = quick_game(1);
        game.handle_event(InputEvent::Quit, Instant::now());
        assert!(game.has_quit());
    }

    #[test]
    fn rolls_wait_out_the_portal_pause() {
        // roll until a portal fires, then check the token waits on the landed tile
        let mut game = quick_game(3);
        let mut now = Instant::now();
        for _ in 0..500 {
            if game.engine().is_finished() {
                break;
            }
            game.handle_event(InputEvent::Roll, now);
            now += Duration::from_millis(20);
            let Some(turn) = game.update(now) else {
                continue;
            };
            let Some(portal) = turn.portal else {
                continue;
            };
            assert_eq!(game.token_tile(), portal.from);
            game.handle_event(InputEvent::Roll, now);
            assert_eq!(game.engine().phase(), Phase::Idle);

            now += Duration::from_millis(50);
            game.update(now);
            assert_eq!(game.token_tile(), portal.to);
            return;
        }
        panic!("no portal in 500 rolls");
    }
}
