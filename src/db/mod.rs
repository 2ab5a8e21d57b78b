//! Database client seam: statements in, closable row streams out.

mod client;
mod postgres;
mod record;
mod stream;

pub use client::DatabaseClient;
pub use postgres::PgClient;
pub use record::{Record, RowReader};
pub use stream::RowStream;
