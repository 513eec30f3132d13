pub mod policy;
pub mod roster;

pub use policy::{HeuristicPolicy, Policy, PolicyContext};
pub use roster::{AI_NAMES, HUMAN_NAME, pick_bot_names, table_names};
