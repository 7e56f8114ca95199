//! Live counterpart of a MapDefinition: one LevelInstance per level, one
//! SkyInstance per sky, and the currently active indices. Initialization
//! dispatches on map type; per-frame update goes only to the active pair.

use ravenfell_core::coord::CoordDouble3;
use ravenfell_core::services::{AudioPlayer, TextureMapper};

use crate::level::LevelInstance;
use crate::map::{MapDefinition, MapType};
use crate::rng::WorldRng;
use crate::sky::SkyInstance;
use crate::weather::WeatherInstance;

pub struct MapInstance {
    levels: Vec<LevelInstance>,
    skies: Vec<SkyInstance>,
    active_level_index: usize,
    active_sky_index: usize,
}

impl MapInstance {
    /// Builds the runtime state for a map definition. Start-level invariants
    /// are asserted here: the definition layer already validated generation
    /// parameters, so a violation is a programming error.
    pub fn init(
        map_def: &MapDefinition,
        current_day: u32,
        textures: &mut dyn TextureMapper,
    ) -> Self {
        match map_def.map_type() {
            MapType::Interior => Self::init_interior(map_def, textures),
            MapType::City => Self::init_city(map_def, current_day, textures),
            MapType::Wilderness => Self::init_wild(map_def, current_day, textures),
        }
    }

    fn init_interior(map_def: &MapDefinition, textures: &mut dyn TextureMapper) -> Self {
        assert_eq!(map_def.map_type(), MapType::Interior);

        let levels = (0..map_def.level_count())
            .map(|i| LevelInstance::new(map_def.level_info_for_level(i).ceiling_scale()))
            .collect();

        // Interiors ignore the day; their skies have no celestial objects.
        let current_day = 0;
        let skies = (0..map_def.sky_count())
            .map(|i| {
                SkyInstance::init(
                    map_def.sky(i),
                    map_def.sky_info_for_sky(i),
                    current_day,
                    textures,
                )
            })
            .collect();

        let start_level_index = map_def
            .start_level_index()
            .expect("interior map requires a start level index");

        Self {
            levels,
            skies,
            active_level_index: start_level_index,
            active_sky_index: map_def.sky_index_for_level(start_level_index),
        }
    }

    fn init_city(
        map_def: &MapDefinition,
        current_day: u32,
        textures: &mut dyn TextureMapper,
    ) -> Self {
        assert_eq!(map_def.map_type(), MapType::City);

        let start_level_index = map_def
            .start_level_index()
            .expect("city map requires a start level index");
        assert_eq!(start_level_index, 0, "city start level must be 0");

        Self {
            levels: vec![LevelInstance::new(
                map_def.level_info_for_level(0).ceiling_scale(),
            )],
            skies: vec![SkyInstance::init(
                map_def.sky(0),
                map_def.sky_info_for_sky(0),
                current_day,
                textures,
            )],
            active_level_index: 0,
            active_sky_index: 0,
        }
    }

    fn init_wild(
        map_def: &MapDefinition,
        current_day: u32,
        textures: &mut dyn TextureMapper,
    ) -> Self {
        assert_eq!(map_def.map_type(), MapType::Wilderness);
        assert!(
            map_def.start_level_index().is_none(),
            "wilderness has no start level; the player is placed externally"
        );

        Self {
            levels: vec![LevelInstance::new(
                map_def.level_info_for_level(0).ceiling_scale(),
            )],
            skies: vec![SkyInstance::init(
                map_def.sky(0),
                map_def.sky_info_for_sky(0),
                current_day,
                textures,
            )],
            active_level_index: 0,
            active_sky_index: 0,
        }
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn level(&self, index: usize) -> &LevelInstance {
        &self.levels[index]
    }

    pub fn level_mut(&mut self, index: usize) -> &mut LevelInstance {
        &mut self.levels[index]
    }

    pub fn active_level_index(&self) -> usize {
        self.active_level_index
    }

    pub fn active_level(&self) -> &LevelInstance {
        &self.levels[self.active_level_index]
    }

    pub fn active_level_mut(&mut self) -> &mut LevelInstance {
        &mut self.levels[self.active_level_index]
    }

    pub fn sky_count(&self) -> usize {
        self.skies.len()
    }

    pub fn active_sky_index(&self) -> usize {
        self.active_sky_index
    }

    pub fn active_sky(&self) -> &SkyInstance {
        &self.skies[self.active_sky_index]
    }

    pub fn active_sky_mut(&mut self) -> &mut SkyInstance {
        &mut self.skies[self.active_sky_index]
    }

    /// Switches the active level, re-deriving the active sky from the map
    /// definition's per-level sky mapping. Sky and level are never set
    /// independently, so they cannot fall out of step.
    pub fn set_active_level_index(&mut self, level_index: usize, map_def: &MapDefinition) {
        assert!(level_index < self.levels.len());
        self.active_level_index = level_index;
        self.active_sky_index = map_def.sky_index_for_level(level_index);
        debug_assert!(self.active_sky_index < self.skies.len());
    }

    /// Per-frame update of the active level and sky. Non-active levels and
    /// skies are frozen.
    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        dt: f64,
        player: CoordDouble3,
        map_def: &MapDefinition,
        latitude: f64,
        daytime_percent: f64,
        chunk_distance: i32,
        weather: &WeatherInstance,
        rng: &mut WorldRng,
        audio: &mut dyn AudioPlayer,
    ) {
        let level_param = match map_def.map_type() {
            MapType::Wilderness => None,
            _ => Some(self.active_level_index),
        };

        self.levels[self.active_level_index].update(
            dt,
            player,
            level_param,
            map_def,
            chunk_distance,
            audio,
        );

        self.skies[self.active_sky_index].update(dt, latitude, daytime_percent, weather, rng);
    }

    /// End-of-frame dirty flag clearing for the active level.
    pub fn clean_up(&mut self) {
        self.levels[self.active_level_index].clean_up();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;
    use ravenfell_core::services::HashTextureMapper;

    use crate::map::{LevelDefinition, LevelInfoDefinition, SkyDefinition, SkyInfoDefinition};

    fn three_level_interior(start_level_index: usize) -> MapDefinition {
        let levels = (0..3)
            .map(|_| LevelDefinition::new(16, 3, 16).expect("valid dims"))
            .collect();
        MapDefinition::interior(
            levels,
            vec![LevelInfoDefinition::new(1.0)],
            vec![0, 0, 0],
            vec![SkyDefinition::interior("SKY_INT".to_string())],
            vec![SkyInfoDefinition::default()],
            vec![0],
            vec![0, 0, 0],
            start_level_index,
            vec![DVec2::new(8.0, 8.0)],
        )
        .expect("valid interior")
    }

    #[test]
    fn test_interior_start_level_selected() {
        let map_def = three_level_interior(1);
        let mut textures = HashTextureMapper;
        let inst = MapInstance::init(&map_def, 0, &mut textures);

        assert_eq!(inst.level_count(), 3);
        assert_eq!(inst.active_level_index(), 1);
        assert_eq!(inst.sky_count(), 1);
        assert_eq!(inst.active_sky_index(), 0);
    }

    #[test]
    fn test_set_active_level_rederives_sky() {
        let map_def = three_level_interior(0);
        let mut textures = HashTextureMapper;
        let mut inst = MapInstance::init(&map_def, 0, &mut textures);

        inst.set_active_level_index(2, &map_def);
        assert_eq!(inst.active_level_index(), 2);
        assert_eq!(inst.active_sky_index(), map_def.sky_index_for_level(2));
    }

    #[test]
    #[should_panic]
    fn test_set_active_level_out_of_bounds_panics() {
        let map_def = three_level_interior(0);
        let mut textures = HashTextureMapper;
        let mut inst = MapInstance::init(&map_def, 0, &mut textures);
        inst.set_active_level_index(3, &map_def);
    }
}
