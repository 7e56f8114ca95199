use ravenfell_world::GenError;

/// Failures from the map-stack operations. Generation failures are
/// recoverable: the caller reports them and the prior map state stands.
#[derive(Debug, thiserror::Error)]
pub enum MapStackError {
    #[error("map generation failed: {0}")]
    Generation(#[from] GenError),

    #[error("cannot push an interior without an existing map")]
    NoActiveMap,

    #[error("cannot pop the last remaining map")]
    PopWouldEmptyStack,
}
