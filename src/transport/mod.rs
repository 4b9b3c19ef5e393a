//! Seams to the secure transport.
//!
//! The receive path never sees ciphertext. Whatever establishes DTLS and
//! derives the SRTP keys hands this crate a [`SecureTransport`] that can open
//! one decrypted read stream per SSRC, plus writers for the outbound RTP and
//! RTCP directions.

pub mod mock;
pub mod srtp_transport;

use crate::error::Result;
use crate::rtp_transceiver::SSRC;

use async_trait::async_trait;
use std::sync::Arc;

/// ReadStream is a decrypted, authenticated datagram stream bound to a
/// single SSRC. Each read returns exactly one RTP or RTCP datagram.
#[async_trait]
pub trait ReadStream {
    async fn read(&self, buf: &mut [u8]) -> Result<usize>;

    /// close tears the stream down. Pending and future reads fail.
    async fn close(&self) -> Result<()>;
}

/// SecureTransport opens per-SSRC read streams on the SRTP and SRTCP sessions.
#[async_trait]
pub trait SecureTransport {
    async fn open_rtp_read_stream(&self, ssrc: SSRC) -> Result<Arc<dyn ReadStream + Send + Sync>>;

    async fn open_rtcp_read_stream(&self, ssrc: SSRC)
        -> Result<Arc<dyn ReadStream + Send + Sync>>;
}

/// RTPWriter is used by outbound tracks to emit RTP packets.
#[async_trait]
pub trait RTPWriter {
    async fn write_rtp(&self, pkt: &rtp::packet::Packet) -> Result<usize>;
}

/// RTCPWriter is used to send feedback back to the remote sender.
#[async_trait]
pub trait RTCPWriter {
    async fn write_rtcp(&self, pkts: &[Box<dyn rtcp::packet::Packet + Send + Sync>])
        -> Result<usize>;
}
