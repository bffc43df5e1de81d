//! ck-ingest: real-time curve data over a loopback TCP line protocol.

pub mod protocol;
pub mod server;

pub use protocol::{DEFAULT_STREAM_ID, StreamSample, parse_line};
pub use server::{DEFAULT_INGEST_PORT, IngestConfig, IngestServer};
