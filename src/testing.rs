//! Scripted in-process `DatabaseClient` for unit and router tests.

use crate::db::{DatabaseClient, Record, RowStream};
use crate::error::AppError;
use crate::sql::{QueryBuf, SqlValue};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

type Script = Vec<Result<Record, AppError>>;

/// Answers each `fetch` with the next scripted result set (empty once the
/// script runs out) and records every statement it was given.
#[derive(Default)]
pub struct ScriptedClient {
    scripts: Mutex<VecDeque<Script>>,
    executed: Mutex<Vec<QueryBuf>>,
    released: Arc<AtomicUsize>,
}

impl ScriptedClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_rows(&self, rows: Vec<Record>) {
        self.push_results(rows.into_iter().map(Ok).collect());
    }

    pub fn push_results(&self, rows: Script) {
        self.scripts.lock().unwrap().push_back(rows);
    }

    pub fn executed(&self) -> Vec<QueryBuf> {
        self.executed.lock().unwrap().clone()
    }

    /// How many row streams have released their cursor so far.
    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

impl DatabaseClient for ScriptedClient {
    fn fetch(&self, query: QueryBuf) -> RowStream {
        self.executed.lock().unwrap().push(query);
        let rows = self.scripts.lock().unwrap().pop_front().unwrap_or_default();
        let released = self.released.clone();
        RowStream::new(Box::pin(futures::stream::iter(rows))).on_release(move || {
            released.fetch_add(1, Ordering::SeqCst);
        })
    }
}

pub fn row(values: Vec<SqlValue>) -> Record {
    Record::new(values)
}

pub fn text(s: &str) -> SqlValue {
    SqlValue::Text(s.to_string())
}
