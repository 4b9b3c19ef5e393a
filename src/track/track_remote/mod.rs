#[cfg(test)]
mod track_remote_test;

use crate::error::{Error, Result};
use crate::rtp_transceiver::rtp_codec::RTPCodecType;
use crate::rtp_transceiver::rtp_receiver::latch::Latch;
use crate::rtp_transceiver::rtp_receiver::RTPReceiverInternal;
use crate::rtp_transceiver::{RTCRtpDecodingParameters, SSRC};
use crate::transport::ReadStream;

use arc_swap::ArcSwapOption;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Weak};
use util::Unmarshal;

/// The pair of read streams a layer is bound to once its SSRC is known.
pub(crate) struct LayerStreams {
    pub(crate) rtp_read_stream: Arc<dyn ReadStream + Send + Sync>,
    pub(crate) rtcp_read_stream: Arc<dyn ReadStream + Send + Sync>,

    rtp_closed: AtomicBool,
    rtcp_closed: AtomicBool,
}

impl LayerStreams {
    pub(crate) fn new(
        rtp_read_stream: Arc<dyn ReadStream + Send + Sync>,
        rtcp_read_stream: Arc<dyn ReadStream + Send + Sync>,
    ) -> Self {
        LayerStreams {
            rtp_read_stream,
            rtcp_read_stream,
            rtp_closed: AtomicBool::new(false),
            rtcp_closed: AtomicBool::new(false),
        }
    }

    /// close closes RTCP, then RTP, stopping at the first failure. A stream
    /// is never closed twice, so calling close again retries only what is
    /// still open.
    pub(crate) async fn close(&self) -> Result<()> {
        if !self.rtcp_closed.load(Ordering::SeqCst) {
            self.rtcp_read_stream.close().await?;
            self.rtcp_closed.store(true, Ordering::SeqCst);
        }
        if !self.rtp_closed.load(Ordering::SeqCst) {
            self.rtp_read_stream.close().await?;
            self.rtp_closed.store(true, Ordering::SeqCst);
        }
        Ok(())
    }
}

/// SimulcastLayer is one negotiated encoding of a [`TrackRemote`]. A track
/// that is not simulcast has exactly one layer, usually with an empty RID.
pub struct SimulcastLayer {
    rid: String,
    ssrc: AtomicU32,
    ready: Latch,
    pub(crate) streams: ArcSwapOption<LayerStreams>,

    track: Weak<TrackRemote>,
    receiver: Weak<RTPReceiverInternal>,
}

impl std::fmt::Debug for SimulcastLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulcastLayer")
            .field("rid", &self.rid)
            .field("ssrc", &self.ssrc())
            .field("ready", &self.is_ready())
            .finish()
    }
}

impl SimulcastLayer {
    /// rid gets the RTP stream id of this layer, empty if the track is not simulcast.
    pub fn rid(&self) -> &str {
        self.rid.as_str()
    }

    /// ssrc gets the SSRC of the layer, zero while it has not been learned yet.
    pub fn ssrc(&self) -> SSRC {
        self.ssrc.load(Ordering::SeqCst)
    }

    /// id is the local identifier of the layer, derived from its SSRC.
    pub fn id(&self) -> String {
        self.ssrc().to_string()
    }

    /// is_ready reports whether the layer's read streams are open.
    pub fn is_ready(&self) -> bool {
        self.ready.is_set()
    }

    /// track returns the track owning this layer, if it is still alive.
    pub fn track(&self) -> Option<Arc<TrackRemote>> {
        self.track.upgrade()
    }

    /// read reads one raw RTP datagram for this layer. It waits for the
    /// owning receiver to start receiving and for the layer to be bound,
    /// and fails once the receiver is stopped.
    pub async fn read(&self, b: &mut [u8]) -> Result<usize> {
        let receiver = self.receiver.upgrade().ok_or(Error::ErrClosedPipe)?;
        receiver.read_rtp(b, self).await
    }

    /// read_rtp is a convenience method that wraps read and unmarshals the packet.
    pub async fn read_rtp(&self) -> Result<rtp::packet::Packet> {
        let receive_mtu = self
            .receiver
            .upgrade()
            .map(|r| r.receive_mtu)
            .ok_or(Error::ErrClosedPipe)?;

        let mut b = vec![0u8; receive_mtu];
        let n = self.read(&mut b).await?;

        let mut buf = &b[..n];
        Ok(rtp::packet::Packet::unmarshal(&mut buf)?)
    }

    pub(crate) fn set_ssrc(&self, ssrc: SSRC) {
        self.ssrc.store(ssrc, Ordering::SeqCst);
    }

    pub(crate) fn bind(&self, streams: Arc<LayerStreams>) {
        self.streams.store(Some(streams));
        self.ready.set();
    }

    pub(crate) async fn wait_ready(&self) {
        self.ready.wait().await
    }
}

/// TrackRemote represents a single inbound media source. It owns one
/// [`SimulcastLayer`] per negotiated encoding, in negotiation order.
#[derive(Debug)]
pub struct TrackRemote {
    kind: RTPCodecType,
    layers: Vec<Arc<SimulcastLayer>>,
}

impl TrackRemote {
    pub(crate) fn new(
        kind: RTPCodecType,
        encodings: &[RTCRtpDecodingParameters],
        receiver: Weak<RTPReceiverInternal>,
    ) -> Arc<Self> {
        Arc::new_cyclic(|track| TrackRemote {
            kind,
            layers: encodings
                .iter()
                .map(|encoding| {
                    Arc::new(SimulcastLayer {
                        rid: encoding.rid.clone(),
                        ssrc: AtomicU32::new(encoding.ssrc),
                        ready: Latch::new(),
                        streams: ArcSwapOption::empty(),
                        track: track.clone(),
                        receiver: receiver.clone(),
                    })
                })
                .collect(),
        })
    }

    /// kind gets the kind of the track
    pub fn kind(&self) -> RTPCodecType {
        self.kind
    }

    /// is_simulcast is true when the track carries more than one layer.
    pub fn is_simulcast(&self) -> bool {
        self.layers.len() > 1
    }

    /// layers returns every layer in negotiation order.
    pub fn layers(&self) -> &[Arc<SimulcastLayer>] {
        &self.layers
    }

    /// layer looks a layer up by RID.
    pub fn layer(&self, rid: &str) -> Option<&Arc<SimulcastLayer>> {
        self.layers.iter().find(|l| l.rid() == rid)
    }

    /// layer_by_ssrc looks a layer up by its current SSRC.
    pub fn layer_by_ssrc(&self, ssrc: SSRC) -> Option<&Arc<SimulcastLayer>> {
        self.layers.iter().find(|l| l.ssrc() == ssrc)
    }
}
