mod builder;
pub use crate::builder::*;

mod client;
pub use crate::client::*;

pub mod contracts;
pub mod deployments;
pub mod errors;
pub mod payload;
pub mod submission;

mod serde_utils;

pub use crate::deployments::Deployments;
pub use crate::payload::DappCall;
pub use crate::submission::PendingSubmission;
