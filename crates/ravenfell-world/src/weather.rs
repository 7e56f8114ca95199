use crate::rng::WorldRng;

/// How long one lightning bolt stays visible.
const BOLT_SECONDS: f64 = 0.35;

/// Seconds between bolts: BOLT_GAP_BASE plus up to BOLT_GAP_SPREAD.
const BOLT_GAP_BASE: f64 = 3.0;
const BOLT_GAP_SPREAD: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherType {
    Clear,
    Overcast,
    Rain,
    Snow,
}

/// Static weather choice for the active exterior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeatherDefinition {
    pub weather_type: WeatherType,
    /// Only meaningful with rain.
    pub thunderstorm: bool,
}

impl WeatherDefinition {
    pub fn clear() -> Self {
        Self {
            weather_type: WeatherType::Clear,
            thunderstorm: false,
        }
    }

    pub fn overcast() -> Self {
        Self {
            weather_type: WeatherType::Overcast,
            thunderstorm: false,
        }
    }

    pub fn rain(thunderstorm: bool) -> Self {
        Self {
            weather_type: WeatherType::Rain,
            thunderstorm,
        }
    }

    pub fn snow() -> Self {
        Self {
            weather_type: WeatherType::Snow,
            thunderstorm: false,
        }
    }

    /// View distance in voxels under this weather.
    pub fn fog_distance(&self) -> f64 {
        match self.weather_type {
            WeatherType::Clear => 100.0,
            WeatherType::Overcast => 60.0,
            WeatherType::Rain => 45.0,
            WeatherType::Snow => 35.0,
        }
    }
}

#[derive(Debug, Clone)]
struct Thunderstorm {
    seconds_until_next_bolt: f64,
    bolt_seconds_remaining: Option<f64>,
}

/// Live weather state. Currently only thunderstorms carry any: the bolt
/// clock that the sky instance turns into a flashing lightning object.
#[derive(Debug, Clone)]
pub struct WeatherInstance {
    thunderstorm: Option<Thunderstorm>,
}

impl WeatherInstance {
    pub fn new(def: WeatherDefinition) -> Self {
        let thunderstorm = (def.weather_type == WeatherType::Rain && def.thunderstorm).then(|| {
            Thunderstorm {
                seconds_until_next_bolt: BOLT_GAP_BASE,
                bolt_seconds_remaining: None,
            }
        });
        Self { thunderstorm }
    }

    pub fn update(&mut self, dt: f64, rng: &mut WorldRng) {
        let Some(storm) = self.thunderstorm.as_mut() else {
            return;
        };

        if let Some(remaining) = storm.bolt_seconds_remaining.as_mut() {
            *remaining -= dt;
            if *remaining <= 0.0 {
                storm.bolt_seconds_remaining = None;
                storm.seconds_until_next_bolt =
                    BOLT_GAP_BASE + rng.next_bounded(BOLT_GAP_SPREAD) as f64;
            }
        } else {
            storm.seconds_until_next_bolt -= dt;
            if storm.seconds_until_next_bolt <= 0.0 {
                storm.bolt_seconds_remaining = Some(BOLT_SECONDS);
            }
        }
    }

    /// Progress of the active lightning bolt, or None when no bolt is up.
    pub fn lightning_bolt_percent(&self) -> Option<f64> {
        let storm = self.thunderstorm.as_ref()?;
        let remaining = storm.bolt_seconds_remaining?;
        Some(1.0 - (remaining / BOLT_SECONDS).clamp(0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_storm_weather_never_bolts() {
        let mut rng = WorldRng::new(1);
        let mut inst = WeatherInstance::new(WeatherDefinition::rain(false));
        for _ in 0..1000 {
            inst.update(0.1, &mut rng);
            assert!(inst.lightning_bolt_percent().is_none());
        }
    }

    #[test]
    fn test_thunderstorm_bolt_cycle() {
        let mut rng = WorldRng::new(1);
        let mut inst = WeatherInstance::new(WeatherDefinition::rain(true));

        // First bolt arrives after the base gap.
        let mut saw_bolt = false;
        for _ in 0..200 {
            inst.update(0.1, &mut rng);
            if inst.lightning_bolt_percent().is_some() {
                saw_bolt = true;
                break;
            }
        }
        assert!(saw_bolt, "storm should produce a bolt");

        // Bolt expires and the gap resets.
        for _ in 0..10 {
            inst.update(0.1, &mut rng);
        }
        assert!(inst.lightning_bolt_percent().is_none());
    }

    #[test]
    fn test_fog_tightens_with_weather() {
        assert!(WeatherDefinition::clear().fog_distance() > WeatherDefinition::snow().fog_distance());
    }
}
