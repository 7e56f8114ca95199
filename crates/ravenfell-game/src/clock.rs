/// Seconds in one in-game day.
pub const SECONDS_IN_A_DAY: f64 = 86_400.0;

/// Length of a real-time second in game time. In the original, one real
/// second is twenty in-game seconds.
pub const TIME_SCALE: f64 = SECONDS_IN_A_DAY / 4_320.0;

/// Hour the night ends and begins (6am / 6pm).
const NIGHT_END_HOUR: f64 = 6.0;
const NIGHT_START_HOUR: f64 = 18.0;

/// Time of day, in seconds since midnight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clock {
    seconds: f64,
}

impl Clock {
    pub fn new(hours: u32, minutes: u32, seconds: u32) -> Self {
        debug_assert!(hours < 24 && minutes < 60 && seconds < 60);
        Self {
            seconds: (hours as f64) * 3600.0 + (minutes as f64) * 60.0 + seconds as f64,
        }
    }

    /// Advances by in-game seconds. Returns how many midnights were crossed.
    pub fn tick(&mut self, game_seconds: f64) -> u32 {
        self.seconds += game_seconds;
        let mut days = 0;
        while self.seconds >= SECONDS_IN_A_DAY {
            self.seconds -= SECONDS_IN_A_DAY;
            days += 1;
        }
        days
    }

    /// 0.0 at midnight, 0.5 at noon.
    pub fn daytime_percent(&self) -> f64 {
        self.seconds / SECONDS_IN_A_DAY
    }

    pub fn hours(&self) -> f64 {
        self.seconds / 3600.0
    }

    /// Whether lampposts and night music are on (6pm to 6am).
    pub fn night_lights_active(&self) -> bool {
        let hours = self.hours();
        !(NIGHT_END_HOUR..NIGHT_START_HOUR).contains(&hours)
    }
}

/// Day counter, advanced when the clock crosses midnight. Drives moon
/// phases in exterior sky generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Date {
    pub day: u32,
}

impl Date {
    pub fn new(day: u32) -> Self {
        Self { day }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_scale_is_twenty() {
        assert!((TIME_SCALE - 20.0).abs() < 1.0e-9);
    }

    #[test]
    fn test_daytime_percent() {
        assert_eq!(Clock::new(0, 0, 0).daytime_percent(), 0.0);
        assert!((Clock::new(12, 0, 0).daytime_percent() - 0.5).abs() < 1.0e-9);
    }

    #[test]
    fn test_midnight_wrap_counts_days() {
        let mut clock = Clock::new(23, 59, 0);
        let days = clock.tick(120.0);
        assert_eq!(days, 1);
        assert!(clock.hours() < 1.0);
    }

    #[test]
    fn test_night_lights_window() {
        assert!(Clock::new(22, 0, 0).night_lights_active());
        assert!(Clock::new(3, 0, 0).night_lights_active());
        assert!(!Clock::new(12, 0, 0).night_lights_active());
        assert!(!Clock::new(6, 0, 0).night_lights_active());
        assert!(Clock::new(18, 0, 0).night_lights_active());
    }
}
