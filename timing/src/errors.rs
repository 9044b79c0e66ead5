use thiserror::Error;

use common::types::{InputIndex, LogicalTime, RecordKind};

#[derive(Debug, Error)]
pub enum TimingError {
    #[error("no {kind} newer than {threshold} after {attempts} polls")]
    Timeout {
        kind: RecordKind,
        threshold: LogicalTime,
        attempts: u64,
    },
    #[error("input {0} not found")]
    MissingInput(InputIndex),
    #[error("input {0} has no logical time")]
    MissingInputTime(InputIndex),
    #[error("no input has a logical time yet")]
    NoInputs,
}
