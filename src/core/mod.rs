//! Process-facing surfaces: the HTTP server and the scan scheduler

pub mod http;
pub mod scheduler;

pub use http::*;
pub use scheduler::*;
