/// Re-export `Config` from `snuggle-core` for use within this crate.
///
/// Environment parsing lives in `snuggle-core` so integration tests can build
/// a `Config` without depending on the server binary.
pub use snuggle_core::config::{Config, StoreMode};
