use thiserror::Error;

use common::types::RecordKind;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot connect to {0}: {1}")]
    Connection(String, tokio_postgres::Error),
    #[error("failed to prepare {0} query: {1}")]
    Prepare(RecordKind, tokio_postgres::Error),
    #[error("{0} query failed: {1}")]
    Query(RecordKind, tokio_postgres::Error),
    #[error("malformed {0} row: {1}")]
    Decode(RecordKind, tokio_postgres::Error),
}
