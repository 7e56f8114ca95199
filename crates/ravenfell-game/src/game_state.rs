//! Container for everything active while a player is loaded: the map stack,
//! the player, clock/date, weather, and the one-shot level-up override.
//! Created on player load, dropped on return to the main menu.

use glam::DVec3;
use log::debug;
use ravenfell_core::coord::{ChunkInt2, CoordDouble3, CoordInt3, VoxelDouble2, voxel_center_xz};
use ravenfell_core::services::{AudioPlayer, RenderResourceSink, TextureMapper};
use ravenfell_world::generation::{
    generate_city, generate_interior, generate_wilderness, CityGenInfo, ExteriorSkyGenInfo,
    InteriorGenInfo, WildGenInfo,
};
use ravenfell_world::map::MapDefinition;
use ravenfell_world::map_instance::MapInstance;
use ravenfell_world::rng::WorldRng;
use ravenfell_world::weather::{WeatherDefinition, WeatherInstance};

use crate::clock::{Clock, Date, TIME_SCALE};
use crate::error::MapStackError;
use crate::options::Options;
use crate::player::Player;

/// External collaborators threaded through the per-frame and transition
/// paths. The core never owns these.
pub struct Services<'a> {
    pub textures: &'a mut dyn TextureMapper,
    pub renderer: &'a mut dyn RenderResourceSink,
    pub audio: &'a mut dyn AudioPlayer,
}

/// A map definition and its live instance, as one stack entry.
pub struct MapPair {
    pub definition: MapDefinition,
    pub instance: MapInstance,
}

/// Hook run instead of the default behavior when the player enters a
/// level-up voxel. Consumed on use.
pub type LevelUpOverride = Box<dyn FnOnce(&mut GameState)>;

pub struct GameState {
    player: Player,
    /// Stack of active maps. Multiple entries exist while the player is in
    /// an interior nested in an exterior; the top is the active map. Never
    /// empty once the session has an initial map.
    maps: Vec<MapPair>,
    /// Where the player re-appears in the enclosing map when the nested
    /// interior is popped.
    return_coord: Option<CoordInt3>,
    /// City generation parameters cached for city gate round-trips, which
    /// regenerate both sides from these seeds.
    city_gen_cache: Option<(CityGenInfo, ExteriorSkyGenInfo)>,
    on_level_up_voxel_enter: Option<LevelUpOverride>,
    options: Options,
    clock: Clock,
    date: Date,
    latitude: f64,
    weather_def: WeatherDefinition,
    weather_inst: WeatherInstance,
    rng: WorldRng,
}

impl GameState {
    pub fn new(
        player: Player,
        options: Options,
        clock: Clock,
        date: Date,
        latitude: f64,
        weather_def: WeatherDefinition,
        rng_seed: u32,
    ) -> Self {
        Self {
            player,
            maps: Vec::new(),
            return_coord: None,
            city_gen_cache: None,
            on_level_up_voxel_enter: None,
            options,
            clock,
            date,
            latitude,
            weather_def,
            weather_inst: WeatherInstance::new(weather_def),
            rng: WorldRng::new(rng_seed),
        }
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn date(&self) -> Date {
        self.date
    }

    pub fn weather_def(&self) -> WeatherDefinition {
        self.weather_def
    }

    pub fn daytime_percent(&self) -> f64 {
        self.clock.daytime_percent()
    }

    pub fn map_count(&self) -> usize {
        self.maps.len()
    }

    pub fn has_active_map(&self) -> bool {
        !self.maps.is_empty()
    }

    /// True while the active interior sits inside an exterior.
    pub fn is_active_map_nested(&self) -> bool {
        self.maps.len() > 1
    }

    pub fn active_map_def(&self) -> &MapDefinition {
        &self.maps.last().expect("no active map").definition
    }

    pub fn active_map_inst(&self) -> &MapInstance {
        &self.maps.last().expect("no active map").instance
    }

    pub fn active_map_inst_mut(&mut self) -> &mut MapInstance {
        &mut self.maps.last_mut().expect("no active map").instance
    }

    /// Split borrow of the active map pair, for callers that need the
    /// definition and the mutable instance at once.
    pub fn active_map_split_mut(&mut self) -> (&MapDefinition, &mut MapInstance) {
        let pair = self.maps.last_mut().expect("no active map");
        (&pair.definition, &mut pair.instance)
    }

    pub fn return_coord(&self) -> Option<CoordInt3> {
        self.return_coord
    }

    /// Arms the one-shot override for level-up voxel entry.
    pub fn set_on_level_up_voxel_enter(&mut self, hook: LevelUpOverride) {
        self.on_level_up_voxel_enter = Some(hook);
    }

    pub fn has_level_up_override(&self) -> bool {
        self.on_level_up_voxel_enter.is_some()
    }

    pub(crate) fn take_level_up_override(&mut self) -> Option<LevelUpOverride> {
        self.on_level_up_voxel_enter.take()
    }

    pub(crate) fn city_gen_cache(&self) -> Option<&(CityGenInfo, ExteriorSkyGenInfo)> {
        self.city_gen_cache.as_ref()
    }

    /// Clears the stack and makes a freshly generated interior the only
    /// map, as when traveling to a dungeon from the world map. On failure
    /// the prior map state is untouched.
    pub fn try_set_interior(
        &mut self,
        gen: &InteriorGenInfo,
        services: &mut Services,
    ) -> Result<(), MapStackError> {
        let definition = generate_interior(gen)?;
        let instance = MapInstance::init(&definition, self.date.day, services.textures);

        self.replace_stack(MapPair {
            definition,
            instance,
        });
        self.city_gen_cache = None;
        self.place_player_at_start();
        self.activate_top(services);
        Ok(())
    }

    /// Clears the stack and makes a freshly generated city the only map.
    /// The generation parameters are cached for later gate toggles.
    pub fn try_set_city(
        &mut self,
        gen: &CityGenInfo,
        sky_gen: &ExteriorSkyGenInfo,
        services: &mut Services,
    ) -> Result<(), MapStackError> {
        let definition = generate_city(gen, sky_gen)?;
        let instance = MapInstance::init(&definition, self.date.day, services.textures);

        self.replace_stack(MapPair {
            definition,
            instance,
        });
        self.city_gen_cache = Some((gen.clone(), *sky_gen));
        self.place_player_at_start();
        self.activate_top(services);
        Ok(())
    }

    /// Clears the stack and makes a freshly generated wilderness the only
    /// map. The wilderness has no start level; the player lands on the
    /// given coordinate (computed by the gate transition).
    pub fn try_set_wilderness(
        &mut self,
        gen: &WildGenInfo,
        sky_gen: &ExteriorSkyGenInfo,
        start: CoordInt3,
        services: &mut Services,
    ) -> Result<(), MapStackError> {
        let definition = generate_wilderness(gen, sky_gen)?;
        let instance = MapInstance::init(&definition, self.date.day, services.textures);

        self.replace_stack(MapPair {
            definition,
            instance,
        });
        self.place_player_at_voxel(start);
        self.activate_top(services);
        Ok(())
    }

    /// Generates an interior and pushes it on top of the existing map,
    /// recording where the player should return on pop. Fails when no map
    /// exists; that is a world-map travel, not an enter.
    pub fn try_push_interior(
        &mut self,
        gen: &InteriorGenInfo,
        return_coord: CoordInt3,
        services: &mut Services,
    ) -> Result<(), MapStackError> {
        if self.maps.is_empty() {
            return Err(MapStackError::NoActiveMap);
        }

        let definition = generate_interior(gen)?;
        let instance = MapInstance::init(&definition, self.date.day, services.textures);

        self.maps.push(MapPair {
            definition,
            instance,
        });
        self.return_coord = Some(return_coord);
        debug!("pushed interior, stack depth {}", self.maps.len());

        self.place_player_at_start();
        self.activate_top(services);
        Ok(())
    }

    /// Pops the top map and re-activates the one beneath, restoring the
    /// player to the recorded return coordinate. There must always be an
    /// active map, so popping the last entry fails.
    pub fn try_pop_map(&mut self, services: &mut Services) -> Result<(), MapStackError> {
        if self.maps.len() <= 1 {
            return Err(MapStackError::PopWouldEmptyStack);
        }

        self.maps.pop();
        debug!("popped interior, stack depth {}", self.maps.len());

        if let Some(return_coord) = self.return_coord.take() {
            self.place_player_at_voxel(return_coord);
        }
        self.activate_top(services);
        Ok(())
    }

    /// Advances the session clock and weather. Crossing the night boundary
    /// flips streetlights in the active level.
    pub fn tick(&mut self, dt: f64) {
        let was_night = self.clock.night_lights_active();
        self.date.day += self.clock.tick(dt * TIME_SCALE);
        self.weather_inst.update(dt, &mut self.rng);

        let is_night = self.clock.night_lights_active();
        if was_night != is_night {
            if let Some(pair) = self.maps.last_mut() {
                pair.instance
                    .active_level_mut()
                    .entity_chunk_manager_mut()
                    .set_night_lights_active(is_night);
            }
        }
    }

    /// One frame of simulation for the active map: clock, weather, chunk
    /// streaming, voxel instances, sky.
    pub fn update(&mut self, dt: f64, services: &mut Services) {
        self.tick(dt);

        let player = self.player.position();
        let latitude = self.latitude;
        let daytime_percent = self.clock.daytime_percent();
        let chunk_distance = self.options.chunk_distance;

        let pair = self.maps.last_mut().expect("no active map");
        pair.instance.update(
            dt,
            player,
            &pair.definition,
            latitude,
            daytime_percent,
            chunk_distance,
            &self.weather_inst,
            &mut self.rng,
            services.audio,
        );
    }

    /// End-of-frame dirty flag clearing, after render/audio consumed them.
    pub fn clean_up(&mut self) {
        if let Some(pair) = self.maps.last_mut() {
            pair.instance.clean_up();
        }
    }

    /// Runs the newly-active map for one tick at zero elapsed time so the
    /// renderer never sees a frame with empty chunk state.
    pub(crate) fn prime_active(&mut self, services: &mut Services) {
        let player = self.player.position();
        let latitude = self.latitude;
        let daytime_percent = self.clock.daytime_percent();
        let chunk_distance = self.options.chunk_distance;

        let pair = self.maps.last_mut().expect("no active map");
        pair.instance.update(
            0.0,
            player,
            &pair.definition,
            latitude,
            daytime_percent,
            chunk_distance,
            &self.weather_inst,
            &mut self.rng,
            services.audio,
        );
    }

    fn replace_stack(&mut self, pair: MapPair) {
        self.maps.clear();
        self.return_coord = None;
        self.maps.push(pair);
    }

    fn activate_top(&mut self, services: &mut Services) {
        self.prime_active(services);
        let pair = self.maps.last_mut().expect("no active map");
        pair.instance.active_level_mut().set_active(services.renderer);
    }

    /// Moves the player to the active map's start point.
    fn place_player_at_start(&mut self) {
        let pair = self.maps.last().expect("no active map");
        let Some(&point) = pair.definition.start_points().first() else {
            return;
        };
        let level_index = pair.definition.start_level_index().unwrap_or(0);
        let ceiling_scale = pair
            .definition
            .level_info_for_level(level_index)
            .ceiling_scale();
        let coord = level_point_to_coord(point, ceiling_scale + Player::HEIGHT);
        self.player.teleport(coord);
        self.player.set_velocity_to_zero();
    }

    /// Moves the player to the center of a voxel in the active map.
    fn place_player_at_voxel(&mut self, coord: CoordInt3) {
        let pair = self.maps.last().expect("no active map");
        let ceiling_scale = pair.definition.level_info_for_level(0).ceiling_scale();
        let center = voxel_center_xz(glam::IVec2::new(coord.voxel.x, coord.voxel.z));
        self.player.teleport(CoordDouble3::new(
            coord.chunk,
            DVec3::new(center.x, ceiling_scale + Player::HEIGHT, center.y),
        ));
        self.player.set_velocity_to_zero();
    }
}

/// Converts a level-space start point to a world coordinate.
fn level_point_to_coord(point: VoxelDouble2, y: f64) -> CoordDouble3 {
    CoordDouble3::new(ChunkInt2::ZERO, DVec3::new(point.x, y, point.y)).normalized()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use glam::IVec2;
    use ravenfell_core::coord::VoxelInt3;
    use ravenfell_core::services::{HashTextureMapper, NullAudio, NullRenderer};
    use ravenfell_world::generation::InteriorType;
    use ravenfell_world::map::MapType;

    pub(crate) fn test_game_state() -> GameState {
        GameState::new(
            Player::new(
                CoordDouble3::new(IVec2::new(0, 0), DVec3::new(1.5, 1.5, 1.5)),
                DVec3::new(1.0, 0.0, 0.0),
            ),
            Options {
                chunk_distance: 1,
                ..Options::default()
            },
            Clock::new(10, 0, 0),
            Date::new(12),
            0.25,
            WeatherDefinition::clear(),
            0xABCD,
        )
    }

    pub(crate) fn city_gen() -> CityGenInfo {
        CityGenInfo {
            name: "Stonehaven".to_string(),
            city_seed: 0xC171_5EED,
            sky_seed: 0x5B7A_A110,
            reserved_blocks: vec![0],
            blocks_per_side: 2,
        }
    }

    pub(crate) fn sky_gen() -> ExteriorSkyGenInfo {
        ExteriorSkyGenInfo {
            weather: WeatherDefinition::clear(),
            star_count: 16,
            sky_seed: 0x57A2,
        }
    }

    pub(crate) fn dungeon_gen() -> InteriorGenInfo {
        InteriorGenInfo {
            name: "Mould's Deep".to_string(),
            interior_type: InteriorType::Dungeon,
            seed: 99,
        }
    }

    macro_rules! services {
        ($t:ident, $r:ident, $a:ident, $s:ident) => {
            let mut $t = HashTextureMapper;
            let mut $r = NullRenderer;
            let mut $a = NullAudio;
            let mut $s = Services {
                textures: &mut $t,
                renderer: &mut $r,
                audio: &mut $a,
            };
        };
    }

    #[test]
    fn test_push_requires_existing_map() {
        let mut state = test_game_state();
        services!(t, r, a, s);

        let result = state.try_push_interior(
            &dungeon_gen(),
            CoordInt3::new(IVec2::new(0, 0), VoxelInt3::new(1, 1, 1)),
            &mut s,
        );
        assert!(matches!(result, Err(MapStackError::NoActiveMap)));
        assert!(!state.has_active_map());
    }

    #[test]
    fn test_push_and_pop_restores_return_position() {
        let mut state = test_game_state();
        services!(t, r, a, s);

        state
            .try_set_city(&city_gen(), &sky_gen(), &mut s)
            .expect("city generates");
        assert_eq!(state.map_count(), 1);
        assert!(!state.is_active_map_nested());

        let return_coord = CoordInt3::new(IVec2::new(0, 0), VoxelInt3::new(20, 1, 21));
        state
            .try_push_interior(&dungeon_gen(), return_coord, &mut s)
            .expect("interior generates");
        assert_eq!(state.map_count(), 2);
        assert!(state.is_active_map_nested());
        assert_eq!(state.active_map_def().map_type(), MapType::Interior);
        assert_eq!(state.return_coord(), Some(return_coord));

        state.try_pop_map(&mut s).expect("pop succeeds");
        assert_eq!(state.map_count(), 1);
        assert_eq!(state.active_map_def().map_type(), MapType::City);

        let player_voxel = state.player().position().voxel();
        assert_eq!(player_voxel.chunk, return_coord.chunk);
        assert_eq!(player_voxel.voxel.x, return_coord.voxel.x);
        assert_eq!(player_voxel.voxel.z, return_coord.voxel.z);
        assert_eq!(state.return_coord(), None);
    }

    #[test]
    fn test_pop_on_single_map_fails_and_preserves_stack() {
        let mut state = test_game_state();
        services!(t, r, a, s);

        state
            .try_set_city(&city_gen(), &sky_gen(), &mut s)
            .expect("city generates");

        let result = state.try_pop_map(&mut s);
        assert!(matches!(result, Err(MapStackError::PopWouldEmptyStack)));
        assert_eq!(state.map_count(), 1);
        assert_eq!(state.active_map_def().map_type(), MapType::City);
    }

    #[test]
    fn test_failed_generation_keeps_prior_map() {
        let mut state = test_game_state();
        services!(t, r, a, s);

        state
            .try_set_city(&city_gen(), &sky_gen(), &mut s)
            .expect("city generates");

        let mut bad_gen = city_gen();
        bad_gen.blocks_per_side = 0;
        let result = state.try_set_city(&bad_gen, &sky_gen(), &mut s);
        assert!(matches!(result, Err(MapStackError::Generation(_))));

        assert_eq!(state.map_count(), 1);
        assert_eq!(state.active_map_def().map_type(), MapType::City);
        // Gate cache still points at the working city.
        assert_eq!(state.city_gen_cache().expect("cached").0, city_gen());
    }

    #[test]
    fn test_set_map_primes_chunks() {
        let mut state = test_game_state();
        services!(t, r, a, s);

        state
            .try_set_interior(&dungeon_gen(), &mut s)
            .expect("interior generates");

        // One zero-dt tick ran, so the player's surroundings exist already.
        let player_chunk = state.player().position().chunk;
        let manager = state.active_map_inst().active_level().voxel_chunk_manager();
        assert!(manager.try_get_chunk(player_chunk).is_some());
        assert_eq!(manager.chunk_count(), 9, "radius 1 around the player");
    }

    #[test]
    fn test_level_up_override_is_one_shot() {
        let mut state = test_game_state();
        assert!(!state.has_level_up_override());

        state.set_on_level_up_voxel_enter(Box::new(|_state| {}));
        assert!(state.has_level_up_override());

        let hook = state.take_level_up_override();
        assert!(hook.is_some());
        assert!(!state.has_level_up_override());
        assert!(state.take_level_up_override().is_none());
    }

    #[test]
    fn test_night_boundary_flips_streetlights() {
        let mut state = test_game_state();
        services!(t, r, a, s);

        state
            .try_set_city(&city_gen(), &sky_gen(), &mut s)
            .expect("city generates");

        // 10:00 is day. Tick far enough to pass 18:00 (game time runs at
        // twenty times real time): 8 game hours ~ 1440 real seconds.
        assert!(!state.clock().night_lights_active());
        state.tick(1500.0);
        assert!(state.clock().night_lights_active());
    }
}
