use std::time::Duration;

use crate::geometry::Pos;

pub const STEP_TIME: Duration = Duration::from_millis(150);
pub const DEATH_ANIM_TIME: Duration = Duration::from_secs(1);
pub const STARTING_APPLES: [Pos; 2] = [Pos::new(1, 1), Pos::new(10, 10)];

/// Built once at startup and handed to the game.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Draw quadrant corner markers on the grid
    pub debug: bool,
    pub color: bool,
    /// Pause between ticks
    pub step_time: Duration,
    /// Length of the whole shrink-out after death
    pub death_anim_time: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            debug: false,
            color: true,
            step_time: STEP_TIME,
            death_anim_time: DEATH_ANIM_TIME,
        }
    }
}

impl Settings {
    pub fn new(debug: bool, color: bool) -> Self {
        Settings {
            debug,
            color,
            ..Default::default()
        }
    }

    /// No sleeping at all, for driving the loop in tests.
    pub fn instant() -> Self {
        Settings {
            step_time: Duration::ZERO,
            death_anim_time: Duration::ZERO,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert!(!settings.debug);
        assert!(settings.color);
        assert_eq!(settings.step_time, Duration::from_millis(150));
        assert_eq!(settings.death_anim_time, Duration::from_secs(1));
    }

    #[test]
    fn test_flags() {
        let settings = Settings::new(true, false);
        assert!(settings.debug);
        assert!(!settings.color);
        assert_eq!(settings.step_time, STEP_TIME);
    }
}
