//! User persistence.

pub mod memory;
pub mod sqlite;
pub mod r#trait;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use r#trait::UserStore;
