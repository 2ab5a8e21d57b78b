use crate::db::RowStream;
use crate::sql::QueryBuf;

/// Executes one statement and streams its rows.
///
/// Implementations own pooling, transactions and retries. The returned stream
/// must release its cursor when dropped or closed.
pub trait DatabaseClient: Send + Sync {
    fn fetch(&self, query: QueryBuf) -> RowStream;
}
