pub mod postgres;
pub mod users;

pub use postgres::create_pool;
pub use users::{InMemoryUserRepository, PgUserRepository, UserRepository};
