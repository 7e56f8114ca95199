//! Live sky state for one map level: celestial object directions driven by
//! time of day and latitude, looping object animations, and thunderstorm
//! lightning. Only the active sky is updated each frame.

use std::f64::consts::TAU;

use glam::DVec3;
use log::warn;
use ravenfell_core::services::{TextureId, TextureMapper};

use crate::map::{SkyDefinition, SkyInfoDefinition, SkyObjectDefinition};
use crate::rng::WorldRng;
use crate::weather::WeatherInstance;

/// Days in one moon cycle.
const MOON_CYCLE_DAYS: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SkyObjectKind {
    Sun,
    Moon,
    Star { brightness: u8 },
    Lightning,
}

#[derive(Debug, Clone, Copy)]
struct SkyAnimation {
    frame_count: u32,
    total_seconds: f64,
    current_seconds: f64,
}

/// One placed sky object with its current transformed direction.
#[derive(Debug, Clone)]
pub struct SkyObjectInstance {
    pub kind: SkyObjectKind,
    /// None for point stars, which render without a texture.
    pub texture: Option<TextureId>,
    /// Direction at midnight, before the daily rotation.
    base_direction: DVec3,
    /// Current direction after the daily rotation.
    pub direction: DVec3,
    /// Lightning objects are only visible while a bolt is active.
    pub visible: bool,
    anim: Option<SkyAnimation>,
    /// Offset into the daily rotation (moon phases).
    phase_offset: f64,
}

impl SkyObjectInstance {
    /// Current animation frame index.
    pub fn anim_frame(&self) -> u32 {
        match &self.anim {
            Some(anim) if anim.total_seconds > 0.0 => {
                let percent = anim.current_seconds / anim.total_seconds;
                ((percent * anim.frame_count as f64) as u32).min(anim.frame_count - 1)
            }
            _ => 0,
        }
    }
}

/// Runtime sky for one sky definition.
pub struct SkyInstance {
    background_texture: TextureId,
    objects: Vec<SkyObjectInstance>,
    lightning_indices: Vec<usize>,
    active_lightning: Option<usize>,
}

impl SkyInstance {
    /// Builds the sky's object list, resolving textures. The background
    /// texture is essential to scene correctness; a missing object texture
    /// only skips that object.
    pub fn init(
        sky_def: &SkyDefinition,
        sky_info: &SkyInfoDefinition,
        current_day: u32,
        textures: &mut dyn TextureMapper,
    ) -> Self {
        let background_texture = textures
            .texture_id(&sky_def.background_texture)
            .unwrap_or_else(|| {
                panic!(
                    "missing sky background texture \"{}\"",
                    sky_def.background_texture
                )
            });

        let mut objects = Vec::new();
        let mut lightning_indices = Vec::new();

        if let Some(sun_index) = sky_def.sun_object_index {
            if let Some((texture, def)) = resolve_object(sky_info, textures, sun_index) {
                objects.push(SkyObjectInstance {
                    kind: SkyObjectKind::Sun,
                    texture: Some(texture),
                    base_direction: DVec3::new(0.0, -1.0, 0.0),
                    direction: DVec3::new(0.0, -1.0, 0.0),
                    visible: true,
                    anim: anim_from(def.anim_frame_count, def.anim_seconds),
                    phase_offset: 0.0,
                });
            }
        }

        let moon_phase = (current_day % MOON_CYCLE_DAYS) as f64 / MOON_CYCLE_DAYS as f64;
        for (moon, &object_index) in sky_def.moon_object_indices.iter().enumerate() {
            if let Some((texture, def)) = resolve_object(sky_info, textures, object_index) {
                objects.push(SkyObjectInstance {
                    kind: SkyObjectKind::Moon,
                    texture: Some(texture),
                    base_direction: DVec3::new(0.0, -1.0, 0.0),
                    direction: DVec3::new(0.0, -1.0, 0.0),
                    visible: true,
                    anim: anim_from(def.anim_frame_count, def.anim_seconds),
                    phase_offset: moon_phase + (moon as f64 + 1.0) * 0.25,
                });
            }
        }

        for star in &sky_def.star_placements {
            objects.push(SkyObjectInstance {
                kind: SkyObjectKind::Star {
                    brightness: star.brightness,
                },
                texture: None,
                base_direction: star.direction,
                direction: star.direction,
                visible: true,
                anim: None,
                phase_offset: 0.0,
            });
        }

        for &object_index in &sky_def.lightning_object_indices {
            if let Some((texture, def)) = resolve_object(sky_info, textures, object_index) {
                objects.push(SkyObjectInstance {
                    kind: SkyObjectKind::Lightning,
                    texture: Some(texture),
                    base_direction: DVec3::new(0.0, 0.0, 1.0),
                    direction: DVec3::new(0.0, 0.0, 1.0),
                    visible: false,
                    anim: anim_from(def.anim_frame_count, def.anim_seconds),
                    phase_offset: 0.0,
                });
                lightning_indices.push(objects.len() - 1);
            }
        }

        Self {
            background_texture,
            objects,
            lightning_indices,
            active_lightning: None,
        }
    }

    pub fn background_texture(&self) -> TextureId {
        self.background_texture
    }

    pub fn objects(&self) -> &[SkyObjectInstance] {
        &self.objects
    }

    /// Advances celestial transforms, object animations, and lightning.
    pub fn update(
        &mut self,
        dt: f64,
        latitude: f64,
        daytime_percent: f64,
        weather: &WeatherInstance,
        rng: &mut WorldRng,
    ) {
        for object in &mut self.objects {
            match object.kind {
                SkyObjectKind::Sun | SkyObjectKind::Moon => {
                    object.direction =
                        celestial_direction(daytime_percent + object.phase_offset, latitude);
                }
                SkyObjectKind::Star { .. } => {
                    object.direction =
                        rotate_about_x(object.base_direction, daytime_percent * TAU);
                }
                SkyObjectKind::Lightning => {}
            }

            if let Some(anim) = object.anim.as_mut() {
                if anim.total_seconds > 0.0 {
                    anim.current_seconds = (anim.current_seconds + dt) % anim.total_seconds;
                }
            }
        }

        self.update_lightning(weather, rng);
    }

    fn update_lightning(&mut self, weather: &WeatherInstance, rng: &mut WorldRng) {
        let bolt_percent = weather.lightning_bolt_percent();
        let visibility_changed = self.active_lightning.is_some() != bolt_percent.is_some();

        if visibility_changed {
            if bolt_percent.is_some() && !self.lightning_indices.is_empty() {
                // A new bolt: pick one of the bolt objects and a fresh spot
                // on the horizon for it.
                let pick = rng.next_bounded(self.lightning_indices.len() as u32) as usize;
                let index = self.lightning_indices[pick];
                let angle = rng.next_f64() * TAU;
                let object = &mut self.objects[index];
                object.direction = DVec3::new(angle.cos(), 0.15, angle.sin()).normalize();
                object.visible = true;
                self.active_lightning = Some(index);
            } else if let Some(index) = self.active_lightning.take() {
                self.objects[index].visible = false;
            }
        }
    }
}

/// Resolves one sky object's texture, or skips the object with a warning.
fn resolve_object<'a>(
    sky_info: &'a SkyInfoDefinition,
    textures: &mut dyn TextureMapper,
    object_index: usize,
) -> Option<(TextureId, &'a SkyObjectDefinition)> {
    let def = sky_info.object(object_index);
    match textures.texture_id(&def.texture) {
        Some(id) => Some((id, def)),
        None => {
            warn!("missing sky object texture \"{}\", skipping", def.texture);
            None
        }
    }
}

fn anim_from(frame_count: u32, total_seconds: f64) -> Option<SkyAnimation> {
    (frame_count > 1).then_some(SkyAnimation {
        frame_count,
        total_seconds,
        current_seconds: 0.0,
    })
}

/// Direction of a sun/moon at the given fraction of its daily cycle.
/// Midnight puts the object at the nadir; noon at the zenith, tilted
/// toward the horizon by latitude.
fn celestial_direction(cycle_percent: f64, latitude: f64) -> DVec3 {
    let angle = cycle_percent * TAU;
    let tilt = latitude * std::f64::consts::FRAC_PI_4;
    let raw_y = -angle.cos();
    let raw_z = angle.sin();
    DVec3::new(-raw_y * tilt.sin(), raw_y * tilt.cos(), raw_z).normalize()
}

fn rotate_about_x(v: DVec3, angle: f64) -> DVec3 {
    let (sin, cos) = angle.sin_cos();
    DVec3::new(v.x, v.y * cos - v.z * sin, v.y * sin + v.z * cos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ravenfell_core::services::HashTextureMapper;

    use crate::map::SkyStarPlacement;
    use crate::weather::WeatherDefinition;

    fn exterior_sky() -> (SkyDefinition, SkyInfoDefinition) {
        let mut info = SkyInfoDefinition::default();
        let sun = info.add_object(SkyObjectDefinition {
            texture: "SUN".to_string(),
            anim_frame_count: 1,
            anim_seconds: 0.0,
        });
        let bolt = info.add_object(SkyObjectDefinition {
            texture: "BOLT".to_string(),
            anim_frame_count: 4,
            anim_seconds: 0.4,
        });

        let def = SkyDefinition {
            background_texture: "SKY_DAY".to_string(),
            sun_object_index: Some(sun),
            moon_object_indices: Vec::new(),
            lightning_object_indices: vec![bolt],
            star_placements: vec![SkyStarPlacement {
                direction: DVec3::new(0.0, 1.0, 0.0),
                brightness: 200,
            }],
        };
        (def, info)
    }

    #[test]
    fn test_sun_below_horizon_at_midnight() {
        let (def, info) = exterior_sky();
        let mut textures = HashTextureMapper;
        let mut sky = SkyInstance::init(&def, &info, 0, &mut textures);

        let weather = WeatherInstance::new(WeatherDefinition::clear());
        let mut rng = WorldRng::new(1);

        sky.update(0.016, 0.0, 0.0, &weather, &mut rng);
        let sun = sky
            .objects()
            .iter()
            .find(|o| o.kind == SkyObjectKind::Sun)
            .expect("sun exists");
        assert!(sun.direction.y < 0.0, "midnight sun is below the horizon");

        sky.update(0.016, 0.0, 0.50, &weather, &mut rng);
        let sun = sky
            .objects()
            .iter()
            .find(|o| o.kind == SkyObjectKind::Sun)
            .expect("sun exists");
        assert!(sun.direction.y > 0.0, "noon sun is above the horizon");
    }

    #[test]
    fn test_lightning_follows_storm_bolts() {
        let (def, info) = exterior_sky();
        let mut textures = HashTextureMapper;
        let mut sky = SkyInstance::init(&def, &info, 0, &mut textures);

        let mut weather = WeatherInstance::new(WeatherDefinition::rain(true));
        let mut rng = WorldRng::new(3);

        let mut bolt_seen = false;
        for _ in 0..400 {
            weather.update(0.05, &mut rng);
            sky.update(0.05, 0.0, 0.25, &weather, &mut rng);

            let bolt_visible = sky
                .objects()
                .iter()
                .any(|o| o.kind == SkyObjectKind::Lightning && o.visible);
            assert_eq!(bolt_visible, weather.lightning_bolt_percent().is_some());
            bolt_seen |= bolt_visible;
        }
        assert!(bolt_seen, "storm should have flashed at least once");
    }

    #[test]
    fn test_missing_object_texture_skipped() {
        struct OnlyBackground;
        impl TextureMapper for OnlyBackground {
            fn texture_id(&mut self, name: &str) -> Option<TextureId> {
                (name == "SKY_DAY").then_some(TextureId(1))
            }
        }

        let (def, info) = exterior_sky();
        let mut textures = OnlyBackground;
        let sky = SkyInstance::init(&def, &info, 0, &mut textures);

        // Sun and bolt are skipped; the star has no texture and stays.
        assert_eq!(sky.objects().len(), 1);
        assert!(matches!(sky.objects()[0].kind, SkyObjectKind::Star { .. }));
    }

    #[test]
    #[should_panic]
    fn test_missing_background_is_fatal() {
        struct NoTextures;
        impl TextureMapper for NoTextures {
            fn texture_id(&mut self, _name: &str) -> Option<TextureId> {
                None
            }
        }

        let (def, info) = exterior_sky();
        let mut textures = NoTextures;
        let _ = SkyInstance::init(&def, &info, 0, &mut textures);
    }
}
