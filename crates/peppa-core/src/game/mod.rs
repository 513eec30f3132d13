pub mod snapshot;
pub mod state;

pub use snapshot::GameSnapshot;
pub use state::{Action, GameState, GameStatus, Rejection};
