
pub mod track_local_static_rtp;

use crate::error::Result;
use crate::rtp_transceiver::SSRC;

use async_trait::async_trait;
use util::Unmarshal;

/// TrackLocalWriter is the outbound side a simulcast layer is republished on.
/// Packets handed to it must already carry [`TrackLocalWriter::ssrc`].
#[async_trait]
pub trait TrackLocalWriter {
    /// ssrc is the synchronization source the track publishes under.
    fn ssrc(&self) -> SSRC;

    /// write_rtp encrypts a RTP packet and writes to the connection.
    /// A write on a track nobody reads any more fails with ErrClosedPipe.
    async fn write_rtp(&self, p: &rtp::packet::Packet) -> Result<usize>;

    /// write encrypts and writes a full RTP packet
    async fn write(&self, mut b: &[u8]) -> Result<usize> {
        let pkt = rtp::packet::Packet::unmarshal(&mut b)?;
        self.write_rtp(&pkt).await
    }
}
