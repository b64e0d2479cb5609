
pub use test_postgres::TestPostgres;
pub use test_qdrant::{DIMENSIONS, TestQdrant};
