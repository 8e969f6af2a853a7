//! Redis implementation of the checkpoint store.

mod checkpoint;

pub use checkpoint::RedisCheckpointStore;
