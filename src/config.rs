use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// frames drawn per second by the game loop
    pub fps: u32,
    /// die faces flashed before a roll commits
    pub roll_frames: u32,
    pub roll_frame_interval: Duration,
    /// how long the token rests on a snake or ladder before it moves
    pub portal_pause: Duration,
    /// fixed seed for the die, random when `None`
    pub seed: Option<u64>,
    pub color: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            fps: 30,
            roll_frames: 5,
            roll_frame_interval: Duration::from_millis(100),
            portal_pause: Duration::from_millis(500),
            seed: None,
            color: true,
        }
    }
}

impl GameConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = fps.max(1);
        self
    }

    pub fn with_roll_animation(mut self, frames: u32, interval: Duration) -> Self {
        self.roll_frames = frames;
        self.roll_frame_interval = interval;
        self
    }

    pub fn with_portal_pause(mut self, pause: Duration) -> Self {
        self.portal_pause = pause;
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn frame_time(&self) -> Duration {
        Duration::from_secs(1) / self.fps.max(1)
    }

    /// Total time a roll spends in the rolling animation.
    pub fn roll_duration(&self) -> Duration {
        self.roll_frame_interval * self.roll_frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_classic_pacing() {
        let config = GameConfig::default();
        assert_eq!(config.frame_time(), Duration::from_secs(1) / 30);
        assert_eq!(config.roll_duration(), Duration::from_millis(500));
        assert_eq!(config.seed, None);
    }

    #[test]
    fn zero_fps_is_clamped() {
        let config = GameConfig::default().with_fps(0);
        assert_eq!(config.fps, 1);
        assert_eq!(config.frame_time(), Duration::from_secs(1));
    }
}
