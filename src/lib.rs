#![warn(missing_debug_implementations, rust_2018_idioms, unreachable_pub)]
#![deny(rustdoc::broken_intra_doc_links)]
#![doc(test(
    no_crate_inject,
    attr(deny(warnings, rust_2018_idioms), allow(dead_code, unused_variables))
))]

//! # Latency benchmark for rollup dapps.
//!
//! > rollup-bench times how long a rollup takes to process an input, from the moment it is
//! > submitted on chain until the node's indexer records its outcome.
//!
//! Every measurement follows the same protocol: read the newest logical time of the confirming
//! record kind, run the on-chain action, poll the indexer database until a newer record shows
//! up, and subtract the logical time of the input it belongs to.
//!
//! ## Quickstart: `prelude`
//!
//! The prelude imports the coordinator, the record stores and the submission client.
//!
//! ```no_run
//! # #[allow(unused)]
//! use rollup_bench::prelude::*;
//! ```
//!
//! ## Breakdown of exported modules
//!
//! ### `timing`
//!
//! `Coordinator` runs measurements against any `RecordStore`. The baseline readers and
//! threshold waits it is built from are exported as well, together with the `PollPolicy`
//! bounding every wait.
//!
//! ### `store`
//!
//! The `RecordStore` trait and its two implementations: `PostgresStore`, reading the indexer's
//! tables, and `MemoryStore`, an in-process store for tests and benches.
//!
//! ### `client`
//!
//! `BenchClient` deploys and mints the benchmark token, deposits into the portal and submits
//! dapp calls through the input box. It is built with `ClientBuilder`.
//!
//! ### `config`
//!
//! The layered configuration shared by every component.
//!
//! ### `types`
//!
//! Records as stored by the indexer and the measurement modes.
//!
//! ### `errors`
//!
//! Errors used across rollup-bench.

pub mod client {
    pub use client::{
        contracts, BenchClient, ClientBuilder, DappCall, Deployments, PendingSubmission,
        SignerClient,
    };
}

pub mod config {
    pub use config::{BaseConfig, CliConfig, Config, DatabaseConfig};
}

pub mod store {
    pub use store::{MemoryStore, PostgresStore, RecordStore};
}

pub mod timing {
    pub use timing::*;
}

pub mod types {
    pub use common::types::*;
}

pub mod prelude {
    pub use crate::client::*;
    pub use crate::config::*;
    pub use crate::errors::*;
    pub use crate::store::*;
    pub use crate::timing::*;
    pub use crate::types::*;
}

pub mod errors {
    pub use client::errors::*;
    pub use common::errors::*;
    pub use config::ConfigError;
    pub use store::errors::*;
    pub use timing::errors::*;
}
