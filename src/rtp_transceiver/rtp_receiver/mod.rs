
pub(crate) mod latch;
pub mod rtp_receiver_state;

use crate::error::{Error, Result};
use crate::rtp_transceiver::rtp_codec::RTPCodecType;
use crate::rtp_transceiver::{RTCRtpReceiveParameters, SSRC};
use crate::track::track_remote::{LayerStreams, SimulcastLayer, TrackRemote};
use crate::transport::SecureTransport;

use arc_swap::ArcSwapOption;
use latch::Latch;
pub use rtp_receiver_state::RTCRtpReceiverState;
use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

pub type OnTrackHdlrFn = Box<
    dyn (FnMut(Arc<TrackRemote>) -> Pin<Box<dyn Future<Output = ()> + Send + 'static>>)
        + Send
        + Sync,
>;

pub(crate) struct RTPReceiverInternal {
    pub(crate) receive_mtu: usize,

    state: AtomicU8,
    received: Latch,
    closed: CancellationToken,
    track: ArcSwapOption<TrackRemote>,
}

impl RTPReceiverInternal {
    fn state(&self) -> RTCRtpReceiverState {
        self.state.load(Ordering::SeqCst).into()
    }

    fn set_state(&self, state: RTCRtpReceiverState) {
        self.state.store(state as u8, Ordering::SeqCst);
    }

    /// wait_received parks until receive completed and hands back its track.
    async fn wait_received(&self) -> Result<Arc<TrackRemote>> {
        if self.closed.is_cancelled() {
            return Err(Error::ErrClosedPipe);
        }

        tokio::select! {
            biased;
            _ = self.closed.cancelled() => Err(Error::ErrClosedPipe),
            _ = self.received.wait() => self.track.load_full().ok_or(Error::ErrClosedPipe),
        }
    }

    /// wait_bound parks until the layer has its read streams.
    async fn wait_bound(&self, layer: &SimulcastLayer) -> Result<Arc<LayerStreams>> {
        tokio::select! {
            biased;
            _ = self.closed.cancelled() => Err(Error::ErrClosedPipe),
            _ = layer.wait_ready() => layer.streams.load_full().ok_or(Error::ErrClosedPipe),
        }
    }

    /// read_rtp should only be called by a layer, this only exists so we can keep state in one place
    pub(crate) async fn read_rtp(&self, b: &mut [u8], layer: &SimulcastLayer) -> Result<usize> {
        self.wait_received().await?;
        let streams = self.wait_bound(layer).await?;

        tokio::select! {
            biased;
            _ = self.closed.cancelled() => Err(Error::ErrClosedPipe),
            result = streams.rtp_read_stream.read(b) => result,
        }
    }

    async fn read_rtcp_for(&self, b: &mut [u8], layer: &SimulcastLayer) -> Result<usize> {
        let streams = self.wait_bound(layer).await?;

        tokio::select! {
            biased;
            _ = self.closed.cancelled() => Err(Error::ErrClosedPipe),
            result = streams.rtcp_read_stream.read(b) => result,
        }
    }

    async fn read(&self, b: &mut [u8]) -> Result<usize> {
        let track = self.wait_received().await?;
        let layer = track
            .layers()
            .first()
            .ok_or(Error::ErrRTPReceiverForRIDTrackStreamNotFound)?;
        self.read_rtcp_for(b, layer).await
    }

    async fn read_simulcast(&self, b: &mut [u8], rid: &str) -> Result<usize> {
        let track = self.wait_received().await?;
        let layer = track
            .layer(rid)
            .ok_or(Error::ErrRTPReceiverForRIDTrackStreamNotFound)?;
        self.read_rtcp_for(b, layer).await
    }
}

/// RTCRtpReceiver allows an application to inspect the receipt of a TrackRemote.
///
/// `receive` may succeed at most once; `stop` is idempotent and irreversible.
/// Every task built on top of a receiver should hang off
/// [`RTCRtpReceiver::cancellation_token`] so it ends when the receiver stops.
pub struct RTCRtpReceiver {
    kind: RTPCodecType,
    transport: Arc<dyn SecureTransport + Send + Sync>,

    // guards receive, bind_layer and stop; true once receive was attempted
    receive_called: Mutex<bool>,
    on_track_handler: Arc<ArcSwapOption<Mutex<OnTrackHdlrFn>>>,

    pub(crate) internal: Arc<RTPReceiverInternal>,
}

impl RTCRtpReceiver {
    pub fn new(
        receive_mtu: usize,
        kind: RTPCodecType,
        transport: Arc<dyn SecureTransport + Send + Sync>,
    ) -> Self {
        RTCRtpReceiver {
            kind,
            transport,
            receive_called: Mutex::new(false),
            on_track_handler: Arc::new(ArcSwapOption::empty()),

            internal: Arc::new(RTPReceiverInternal {
                receive_mtu,
                state: AtomicU8::new(RTCRtpReceiverState::Created as u8),
                received: Latch::new(),
                closed: CancellationToken::new(),
                track: ArcSwapOption::empty(),
            }),
        }
    }

    pub fn kind(&self) -> RTPCodecType {
        self.kind
    }

    /// transport returns the secure transport the receiver reads from
    pub fn transport(&self) -> Arc<dyn SecureTransport + Send + Sync> {
        Arc::clone(&self.transport)
    }

    /// track returns the TrackRemote produced by receive, if it succeeded
    pub fn track(&self) -> Option<Arc<TrackRemote>> {
        self.internal.track.load_full()
    }

    pub fn state(&self) -> RTCRtpReceiverState {
        self.internal.state()
    }

    pub fn receive_mtu(&self) -> usize {
        self.internal.receive_mtu
    }

    /// have_received reports whether receive completed successfully.
    pub fn have_received(&self) -> bool {
        self.internal.received.is_set()
    }

    /// cancellation_token returns a token that is cancelled when the receiver stops.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.internal.closed.child_token()
    }

    /// on_track sets a handler that is called once with the track after
    /// receive succeeds. The handler runs on its own task, so it may read
    /// from the track without holding up receive.
    pub fn on_track(&self, f: OnTrackHdlrFn) {
        self.on_track_handler.store(Some(Arc::new(Mutex::new(f))));
    }

    fn do_track(&self, track: Arc<TrackRemote>) {
        let on_track_handler = Arc::clone(&self.on_track_handler);
        tokio::spawn(async move {
            if let Some(handler) = on_track_handler.load_full() {
                let mut f = handler.lock().await;
                f(track).await;
            } else {
                log::trace!("on_track unset, track is only reachable through the receiver");
            }
        });
    }

    /// receive initialize the track and starts all the transports
    pub async fn receive(&self, parameters: &RTCRtpReceiveParameters) -> Result<Arc<TrackRemote>> {
        let track = {
            let mut receive_called = self.receive_called.lock().await;

            if parameters.encodings.is_empty() {
                return Err(Error::ErrRTPReceiverNoEncodings);
            }
            let mut rids = HashSet::new();
            if !parameters.encodings.iter().all(|e| rids.insert(e.rid.as_str())) {
                return Err(Error::ErrRTPReceiverDuplicateRID);
            }
            if self.internal.state() == RTCRtpReceiverState::Stopped {
                return Err(Error::ErrRTPReceiverStopped);
            }
            if *receive_called {
                return Err(Error::ErrRTPReceiverReceiveAlreadyCalled);
            }
            *receive_called = true;

            let track = TrackRemote::new(
                self.kind,
                &parameters.encodings,
                Arc::downgrade(&self.internal),
            );

            // open everything before publishing anything, so a failure
            // leaves no layer half bound
            let mut bound: Vec<(Arc<SimulcastLayer>, Arc<LayerStreams>)> = vec![];
            for layer in track.layers() {
                let ssrc = layer.ssrc();
                if ssrc == 0 {
                    log::debug!("layer rid={:?} has no ssrc yet, binding later", layer.rid());
                    continue;
                }

                match self.open_layer_streams(ssrc).await {
                    Ok(streams) => bound.push((Arc::clone(layer), streams)),
                    Err(err) => {
                        for (_, streams) in &bound {
                            close_quietly(streams).await;
                        }
                        return Err(err);
                    }
                }
            }

            for (layer, streams) in bound {
                layer.bind(streams);
            }

            self.internal.track.store(Some(Arc::clone(&track)));
            self.internal.set_state(RTCRtpReceiverState::Receiving);
            self.internal.received.set();

            track
        };

        log::debug!(
            "RTPReceiver receiving {} track with {} layer(s)",
            self.kind,
            track.layers().len()
        );

        self.do_track(Arc::clone(&track));

        Ok(track)
    }

    /// bind_layer binds a layer whose SSRC was unknown at receive time, once
    /// the SSRC has been learned.
    pub async fn bind_layer(&self, rid: &str, ssrc: SSRC) -> Result<()> {
        let _receive_called = self.receive_called.lock().await;

        if ssrc == 0 {
            return Err(Error::ErrRTPReceiverZeroSSRC);
        }
        if self.internal.state() == RTCRtpReceiverState::Stopped {
            return Err(Error::ErrRTPReceiverStopped);
        }

        let track = self
            .internal
            .track
            .load_full()
            .ok_or(Error::ErrRTPReceiverForRIDTrackStreamNotFound)?;
        let layer = track
            .layer(rid)
            .ok_or(Error::ErrRTPReceiverForRIDTrackStreamNotFound)?;
        if layer.is_ready() {
            return Err(Error::ErrRTPReceiverLayerAlreadyBound);
        }

        let streams = self.open_layer_streams(ssrc).await?;
        layer.set_ssrc(ssrc);
        layer.bind(streams);

        log::debug!("RTPReceiver bound layer rid={rid:?} to ssrc {ssrc}");

        Ok(())
    }

    async fn open_layer_streams(&self, ssrc: SSRC) -> Result<Arc<LayerStreams>> {
        let rtp_read_stream = self.transport.open_rtp_read_stream(ssrc).await?;
        let rtcp_read_stream = match self.transport.open_rtcp_read_stream(ssrc).await {
            Ok(rtcp_read_stream) => rtcp_read_stream,
            Err(err) => {
                if let Err(close_err) = rtp_read_stream.close().await {
                    log::warn!("failed to close RTP read stream for ssrc {ssrc}: {close_err}");
                }
                return Err(err);
            }
        };

        Ok(Arc::new(LayerStreams::new(rtp_read_stream, rtcp_read_stream)))
    }

    /// read reads incoming RTCP for this RTPReceiver
    pub async fn read(&self, b: &mut [u8]) -> Result<usize> {
        self.internal.read(b).await
    }

    /// read_simulcast reads incoming RTCP for this RTPReceiver for given rid
    pub async fn read_simulcast(&self, b: &mut [u8], rid: &str) -> Result<usize> {
        self.internal.read_simulcast(b, rid).await
    }

    /// read_rtcp is a convenience method that wraps Read and unmarshal for you.
    pub async fn read_rtcp(&self) -> Result<Vec<Box<dyn rtcp::packet::Packet + Send + Sync>>> {
        let mut b = vec![0u8; self.internal.receive_mtu];
        let n = self.read(&mut b).await?;

        let mut buf = &b[..n];
        Ok(rtcp::packet::unmarshal(&mut buf)?)
    }

    /// read_simulcast_rtcp is a convenience method that wraps ReadSimulcast and unmarshal for you
    pub async fn read_simulcast_rtcp(
        &self,
        rid: &str,
    ) -> Result<Vec<Box<dyn rtcp::packet::Packet + Send + Sync>>> {
        let mut b = vec![0u8; self.internal.receive_mtu];
        let n = self.read_simulcast(&mut b, rid).await?;

        let mut buf = &b[..n];
        Ok(rtcp::packet::unmarshal(&mut buf)?)
    }

    /// stop irreversibly stops the RTPReceiver.
    ///
    /// Closing a stream that fails aborts the stop and returns that error;
    /// the receiver stays in Receiving and a later stop retries.
    pub async fn stop(&self) -> Result<()> {
        let _receive_called = self.receive_called.lock().await;

        if self.internal.state() == RTCRtpReceiverState::Stopped {
            return Ok(());
        }

        self.internal.closed.cancel();

        if self.internal.received.is_set() {
            if let Some(track) = self.internal.track.load_full() {
                for layer in track.layers() {
                    if let Some(streams) = layer.streams.load_full() {
                        streams.close().await?;
                        layer.streams.store(None);
                    }
                }
            }
        }

        self.internal.set_state(RTCRtpReceiverState::Stopped);
        log::debug!("RTPReceiver stopped");

        Ok(())
    }
}

async fn close_quietly(streams: &LayerStreams) {
    if let Err(err) = streams.rtcp_read_stream.close().await {
        log::warn!("failed to close RTCP read stream: {err}");
    }
    if let Err(err) = streams.rtp_read_stream.close().await {
        log::warn!("failed to close RTP read stream: {err}");
    }
}
