//! In-memory [`Database`] double for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::core::traits::{Database, RowSet};
use crate::core::value::TypedValue;
use crate::error::{CrudError, Result};

/// A statement the double received.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub sql: String,
    pub params: Vec<TypedValue>,
}

enum Response {
    Rows(RowSet),
    Affected(u64),
    Error(CrudError),
}

/// Replays scripted responses in order and records every call.
///
/// An exhausted script answers with an empty row set or zero affected rows.
#[derive(Default)]
pub struct MockDatabase {
    responses: Mutex<VecDeque<Response>>,
    calls: Mutex<Vec<Call>>,
}

impl MockDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_rows(&self, rows: RowSet) {
        self.responses.lock().unwrap().push_back(Response::Rows(rows));
    }

    pub fn push_affected(&self, count: u64) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Response::Affected(count));
    }

    pub fn push_error(&self, err: CrudError) {
        self.responses.lock().unwrap().push_back(Response::Error(err));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn next(&self, sql: &str, params: &[TypedValue]) -> Option<Response> {
        self.calls.lock().unwrap().push(Call {
            sql: sql.to_string(),
            params: params.to_vec(),
        });
        self.responses.lock().unwrap().pop_front()
    }
}

#[async_trait]
impl Database for MockDatabase {
    async fn query(&self, sql: &str, params: &[TypedValue]) -> Result<RowSet> {
        match self.next(sql, params) {
            Some(Response::Rows(rows)) => Ok(rows),
            Some(Response::Error(e)) => Err(e),
            Some(Response::Affected(_)) => Err(CrudError::Statement(format!(
                "script expected execute, got query: {}",
                sql
            ))),
            None => Ok(RowSet::default()),
        }
    }

    async fn execute(&self, sql: &str, params: &[TypedValue]) -> Result<u64> {
        match self.next(sql, params) {
            Some(Response::Affected(n)) => Ok(n),
            Some(Response::Error(e)) => Err(e),
            Some(Response::Rows(_)) => Err(CrudError::Statement(format!(
                "script expected query, got execute: {}",
                sql
            ))),
            None => Ok(0),
        }
    }
}
