pub mod config;
pub mod error;
pub mod memory;
pub mod store;
pub mod visitor;

pub use memory::MemoryVisitorStore;
pub use store::VisitorStore;
