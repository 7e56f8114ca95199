/// Errors from map/level/sky generation. These are recoverable: callers
/// report them and keep the prior map state.
#[derive(Debug, thiserror::Error)]
pub enum GenError {
    #[error("map has no levels")]
    NoLevels,

    #[error("start level index {0} out of range for {1} levels")]
    StartLevelOutOfRange(usize, usize),

    #[error("interior map requires a start level index")]
    MissingStartLevel,

    #[error("city map start level index must be 0, got {0}")]
    CityStartLevelNotZero(usize),

    #[error("wilderness map must not have a start level index")]
    UnexpectedStartLevel,

    #[error("level {level} references missing level info {info}")]
    MissingLevelInfo { level: usize, info: usize },

    #[error("level {level} references missing sky {sky}")]
    MissingSky { level: usize, sky: usize },

    #[error("level dimensions must be positive")]
    ZeroLevelDims,

    #[error("city must be at least one block per side")]
    ZeroCityBlocks,

    #[error("reserved block list is empty")]
    NoReservedBlocks,

    #[error("map name is empty")]
    EmptyName,

    #[error("tile payload rejected: {0}")]
    BadTilePayload(#[from] ravenfell_assets::AssetError),
}
