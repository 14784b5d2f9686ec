pub mod backend;

pub use backend::RedisVisitorStore;

/// Re-export the `redis` crate so tests can issue raw commands without an
/// extra dependency.
pub use redis;
