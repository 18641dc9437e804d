pub mod history;
pub mod postgres;

pub use history::{HistoryStore, InMemoryHistoryStore, PgHistoryStore};
pub use postgres::create_pool;
