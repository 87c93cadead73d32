//! The long-running tasks a node is assembled from. Each binary spawns the
//! subset it needs onto its executor threads, see `schedule` in the crate
//! root.

pub mod aggregator;
pub mod capture;
pub mod dispatcher;
pub mod keepalive;
pub mod sampler;
pub mod sender;
pub mod session;
