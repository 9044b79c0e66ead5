use std::fmt::Display;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::UnknownVariantError;

/// Logical timestamp assigned to a record by the rollup node when it is written.
pub type LogicalTime = i64;

/// Position of an input in the rollup's input feed.
pub type InputIndex = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Input,
    Notice,
    Report,
}

impl RecordKind {
    pub fn table(&self) -> &'static str {
        match self {
            Self::Input => "inputs",
            Self::Notice => "notices",
            Self::Report => "reports",
        }
    }
}

impl Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let formatted = match self {
            Self::Input => "input",
            Self::Notice => "notice",
            Self::Report => "report",
        };

        write!(f, "{formatted}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRecord {
    pub index: InputIndex,
    pub msg_sender: Vec<u8>,
    pub tx_hash: Vec<u8>,
    pub block_number: i64,
    pub timestamp: NaiveDateTime,
    pub payload: Vec<u8>,
    pub time: Option<LogicalTime>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoticeRecord {
    pub input_index: InputIndex,
    pub index: i64,
    pub payload: Vec<u8>,
    pub time: Option<LogicalTime>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRecord {
    pub input_index: InputIndex,
    pub index: i64,
    pub payload: Vec<u8>,
    pub time: Option<LogicalTime>,
}

impl ReportRecord {
    /// Decodes the status object the dapp attaches to every processed input.
    ///
    /// Returns `None` when the payload is not such an object.
    pub fn outcome(&self) -> Option<ReportOutcome> {
        serde_json::from_slice(&self.payload).ok()
    }
}

/// Status report emitted by the dapp after handling an advance request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportOutcome {
    pub error: bool,
    pub message: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}

/// How a confirming record is paired with the input it is timed against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Correlation {
    /// Use the input whose index matches the confirming record's `input_index`.
    #[default]
    InputIndex,
    /// Use the most recent input at the time the duration is computed.
    ///
    /// Only meaningful when no other writer submits inputs during a measurement.
    LatestInput,
}

impl FromStr for Correlation {
    type Err = UnknownVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "input-index" => Ok(Self::InputIndex),
            "latest-input" => Ok(Self::LatestInput),
            _ => Err(UnknownVariantError::new("correlation", s)),
        }
    }
}

impl Display for Correlation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InputIndex => write!(f, "input-index"),
            Self::LatestInput => write!(f, "latest-input"),
        }
    }
}

/// Record kind whose arrival marks an action as processed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConfirmWith {
    #[default]
    Report,
    Notice,
}

impl ConfirmWith {
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Report => RecordKind::Report,
            Self::Notice => RecordKind::Notice,
        }
    }
}

impl FromStr for ConfirmWith {
    type Err = UnknownVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "report" => Ok(Self::Report),
            "notice" => Ok(Self::Notice),
            _ => Err(UnknownVariantError::new("confirmation kind", s)),
        }
    }
}

impl Display for ConfirmWith {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind())
    }
}
