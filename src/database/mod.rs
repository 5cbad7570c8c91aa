pub mod db;
pub mod memory;

pub use db::Database;
pub use memory::MemoryStore;
