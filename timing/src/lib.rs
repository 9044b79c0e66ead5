//! Action-to-record timing against the indexer database.
//!
//! A measurement captures the newest confirmation time, runs an action, waits for a
//! confirmation newer than that baseline and reports the logical time elapsed between the
//! correlated input and its confirmation.

pub mod baseline;
pub mod coordinator;
pub mod errors;
pub mod poll;
pub mod wait;

pub use baseline::{latest_input_time, latest_notice_time, latest_report_time};
pub use coordinator::{Confirmation, Coordinator, Measurement};
pub use poll::{PollPolicy, Polled};
pub use wait::{wait_for_new_notice, wait_for_new_report};
