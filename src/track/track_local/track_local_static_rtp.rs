use super::*;
use crate::error::Error;
use crate::rtp_transceiver::PayloadType;
use crate::transport::RTPWriter;

use std::sync::Arc;
use tokio::sync::Mutex;

/// TrackLocalStaticRTP is a TrackLocalWriter that forwards RTP packets
/// as-is to whatever write stream it is currently bound to.
pub struct TrackLocalStaticRTP {
    write_stream: Mutex<Option<Arc<dyn RTPWriter + Send + Sync>>>,
    ssrc: SSRC,
    payload_type: Option<PayloadType>,
    id: String,
    stream_id: String,
}

impl std::fmt::Debug for TrackLocalStaticRTP {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackLocalStaticRTP")
            .field("ssrc", &self.ssrc)
            .field("payload_type", &self.payload_type)
            .field("id", &self.id)
            .field("stream_id", &self.stream_id)
            .finish()
    }
}

impl TrackLocalStaticRTP {
    /// returns a TrackLocalStaticRTP publishing under a random SSRC.
    pub fn new(id: String, stream_id: String) -> Self {
        Self::with_ssrc(rand::random::<u32>(), id, stream_id)
    }

    pub fn with_ssrc(ssrc: SSRC, id: String, stream_id: String) -> Self {
        TrackLocalStaticRTP {
            write_stream: Mutex::new(None),
            ssrc,
            payload_type: None,
            id,
            stream_id,
        }
    }

    /// with_payload_type rewrites the payload type of every packet written,
    /// for when the outbound side negotiated a different one.
    pub fn with_payload_type(mut self, payload_type: PayloadType) -> Self {
        self.payload_type = Some(payload_type);
        self
    }

    /// id is the unique identifier for this Track.
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// stream_id is the group this track belongs too.
    pub fn stream_id(&self) -> &str {
        self.stream_id.as_str()
    }

    /// bind attaches the write stream packets go out on.
    pub async fn bind(&self, write_stream: Arc<dyn RTPWriter + Send + Sync>) {
        let mut ws = self.write_stream.lock().await;
        *ws = Some(write_stream);
    }

    /// unbind detaches the write stream. Writes fail with ErrClosedPipe until bound again.
    pub async fn unbind(&self) {
        let mut ws = self.write_stream.lock().await;
        *ws = None;
    }

    pub async fn is_bound(&self) -> bool {
        self.write_stream.lock().await.is_some()
    }
}

#[async_trait]
impl TrackLocalWriter for TrackLocalStaticRTP {
    fn ssrc(&self) -> SSRC {
        self.ssrc
    }

    async fn write_rtp(&self, p: &rtp::packet::Packet) -> Result<usize> {
        let write_stream = {
            let ws = self.write_stream.lock().await;
            ws.clone()
        };
        let write_stream = write_stream.ok_or(Error::ErrClosedPipe)?;

        if let Some(payload_type) = self.payload_type {
            let mut pkt = p.clone();
            pkt.header.payload_type = payload_type;
            write_stream.write_rtp(&pkt).await
        } else {
            write_stream.write_rtp(p).await
        }
    }
}
