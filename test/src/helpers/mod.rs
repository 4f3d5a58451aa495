mod positions;
mod replay;

pub use positions::{fill_chunk, pos_in_chunk, water_at};
pub use replay::{random_workload, replay, ReplayEvent};
