//! Request/response schema for every admin RPC
//!
//! Every response carries the uniform status pair `err` / `hint_message`.
//! Optional request fields are omitted from the wire when unset.

pub mod app;
pub mod backup;
pub mod bulk_load;
pub mod cluster;
pub mod compaction;
pub mod duplication;
pub mod split;

pub use app::*;
pub use backup::*;
pub use bulk_load::*;
pub use cluster::*;
pub use compaction::*;
pub use duplication::*;
pub use split::*;
