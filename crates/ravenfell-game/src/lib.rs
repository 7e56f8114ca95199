//! Session-level game state: the map stack that nests an interior inside an
//! exterior, the clock and weather that drive the active map, the player,
//! and the stateless transition logic that moves between maps and levels.

pub mod clock;
pub mod error;
pub mod game_state;
pub mod options;
pub mod player;
pub mod transition;

pub use error::MapStackError;
pub use game_state::{GameState, Services};

