pub mod memory;
pub mod sqlite;

pub use memory::InMemoryVoucherRepository;
pub use sqlite::SqliteVoucherRepository;
