#![warn(rust_2018_idioms)]

// re-export sub-crates
pub use rtcp;
pub use rtp;
pub use srtp;
pub use util;

pub mod api;
pub mod error;
pub mod relay;
pub mod rtp_transceiver;
pub mod track;
pub mod transport;

pub use error::Error;

/// Equal to UDP MTU
pub(crate) const RECEIVE_MTU: usize = 1460;

/// Bitrate advertised in REMB feedback unless configured otherwise. High enough
/// that a browser publishing simulcast keeps its full resolution layer on.
pub(crate) const DEFAULT_TARGET_BITRATE: u64 = 10_000_000;
