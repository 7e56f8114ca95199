//! Seams to the engine's external collaborators. The world simulation never
//! talks to a renderer, audio device, or texture loader directly; it goes
//! through these traits so the core stays headless and testable.

use crate::coord::CoordDouble3;

/// Renderer-usable texture handle. Opaque to the world simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// Audio asset handle. Opaque to the world simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SoundId(pub u32);

/// Coarse music selection requested by map transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicKind {
    Interior,
    Exterior { night: bool },
    /// Short fanfare layered on top when entering a city.
    CityJingle,
}

/// Resolves texture asset names to renderer-usable IDs.
pub trait TextureMapper {
    fn texture_id(&mut self, name: &str) -> Option<TextureId>;
}

/// Receives scene lifecycle notifications so GPU-side resources can be
/// created or freed. Only invoked on (re)activation, never during
/// steady-state chunk streaming.
pub trait RenderResourceSink {
    fn on_scene_activated(&mut self);
    fn on_scene_freed(&mut self);
}

/// Fire-and-forget audio playback. No return value is consumed by the core.
pub trait AudioPlayer {
    fn play_sound(&mut self, sound: SoundId);
    fn play_sound_at(&mut self, sound: SoundId, position: CoordDouble3);
    fn set_music(&mut self, music: MusicKind);
}

/// No-op audio player for headless runs.
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioPlayer for NullAudio {
    fn play_sound(&mut self, _sound: SoundId) {}
    fn play_sound_at(&mut self, _sound: SoundId, _position: CoordDouble3) {}
    fn set_music(&mut self, _music: MusicKind) {}
}

/// No-op render sink for headless runs.
#[derive(Debug, Default)]
pub struct NullRenderer;

impl RenderResourceSink for NullRenderer {
    fn on_scene_activated(&mut self) {}
    fn on_scene_freed(&mut self) {}
}

/// Texture mapper that derives a stable ID from the asset name. Useful for
/// headless runs where no real texture loading happens.
#[derive(Debug, Default)]
pub struct HashTextureMapper;

impl TextureMapper for HashTextureMapper {
    fn texture_id(&mut self, name: &str) -> Option<TextureId> {
        // FNV-1a over the name bytes.
        let mut hash: u32 = 0x811C_9DC5;
        for byte in name.bytes() {
            hash ^= byte as u32;
            hash = hash.wrapping_mul(0x0100_0193);
        }
        Some(TextureId(hash))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_texture_mapper_stable() {
        let mut mapper = HashTextureMapper;
        let a = mapper.texture_id("SKY_DAY").expect("always resolves");
        let b = mapper.texture_id("SKY_DAY").expect("always resolves");
        assert_eq!(a, b);
        let c = mapper.texture_id("SKY_NIGHT").expect("always resolves");
        assert_ne!(a, c);
    }
}
