mod update_task;
pub use update_task::{TaskKey, UpdateTask};

mod chunk_bucket;
pub use chunk_bucket::{ChunkBucket, InsertOutcome};

mod failure_tracker;
pub use failure_tracker::FailureTracker;

mod world_state;
pub use world_state::WorldState;

mod deferred_queue;
pub use deferred_queue::DeferredQueue;
