//! Relay inbound simulcast layers onto outbound tracks.
//!
//! A [`TrackRelay`] is attached to one [`RTCRtpReceiver`](crate::rtp_transceiver::rtp_receiver::RTCRtpReceiver).
//! When the receiver announces its track, the relay starts two tasks per
//! layer: a [`LayerReader`] feeding the shared [`Forwarder`], and a
//! [`FeedbackScheduler`] keeping the remote sender producing keyframes at
//! full bitrate. Every task hangs off a token derived from the receiver, so
//! stopping the receiver ends them all.


pub mod feedback;
pub mod forwarder;
pub mod layer_reader;

use crate::api::setting_engine::SettingEngine;
use crate::error::{Error, Result};
use crate::rtp_transceiver::rtp_receiver::OnTrackHdlrFn;
use crate::rtp_transceiver::SSRC;
use crate::track::track_remote::TrackRemote;
use crate::transport::RTCPWriter;

use feedback::FeedbackScheduler;
use forwarder::Forwarder;
use layer_reader::LayerReader;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// LayerFailure reports a layer whose reader gave up. Only that layer is
/// torn down; its siblings keep running.
#[derive(Debug)]
pub struct LayerFailure {
    pub rid: String,
    pub ssrc: SSRC,
    pub error: Error,
}

/// TrackRelay owns the per-layer tasks republishing one inbound track.
pub struct TrackRelay {
    forwarder: Arc<Forwarder>,
    rtcp_writer: Arc<dyn RTCPWriter + Send + Sync>,
    setting_engine: Arc<SettingEngine>,

    close_token: CancellationToken,
    started: AtomicBool,
    tasks: Mutex<Vec<JoinHandle<()>>>,

    failures_tx: mpsc::UnboundedSender<LayerFailure>,
    failures_rx: Mutex<Option<mpsc::UnboundedReceiver<LayerFailure>>>,
}

impl TrackRelay {
    pub(crate) fn new(
        forwarder: Forwarder,
        rtcp_writer: Arc<dyn RTCPWriter + Send + Sync>,
        setting_engine: Arc<SettingEngine>,
        close_token: CancellationToken,
    ) -> Self {
        let (failures_tx, failures_rx) = mpsc::unbounded_channel();

        TrackRelay {
            forwarder: Arc::new(forwarder),
            rtcp_writer,
            setting_engine,
            close_token,
            started: AtomicBool::new(false),
            tasks: Mutex::new(vec![]),
            failures_tx,
            failures_rx: Mutex::new(Some(failures_rx)),
        }
    }

    pub fn forwarder(&self) -> &Arc<Forwarder> {
        &self.forwarder
    }

    /// is_closed reports whether the relay was closed, directly or because
    /// its receiver stopped.
    pub fn is_closed(&self) -> bool {
        self.close_token.is_cancelled()
    }

    /// take_failures hands out the channel layer failures are reported on.
    /// It returns None after the first call.
    pub async fn take_failures(&self) -> Option<mpsc::UnboundedReceiver<LayerFailure>> {
        let mut failures_rx = self.failures_rx.lock().await;
        failures_rx.take()
    }

    /// on_track starts a reader and, unless feedback is disabled, a feedback
    /// scheduler for every layer of track. A relay serves a single track.
    pub async fn on_track(&self, track: Arc<TrackRemote>) -> Result<()> {
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(Error::ErrTrackRelayAlreadyStarted);
        }
        if self.close_token.is_cancelled() {
            return Err(Error::ErrClosedPipe);
        }

        let mut tasks = self.tasks.lock().await;
        for layer in track.layers() {
            let layer_token = self.close_token.child_token();

            if self.setting_engine.feedback_enabled() {
                let scheduler = FeedbackScheduler::new(
                    Arc::clone(layer),
                    Arc::clone(&self.rtcp_writer),
                    self.setting_engine.feedback_interval(),
                    self.setting_engine.target_bitrate(),
                    layer_token.clone(),
                );
                tasks.push(tokio::spawn(async move { scheduler.run().await }));
            }

            let reader = LayerReader::new(
                Arc::clone(layer),
                Arc::clone(&self.forwarder),
                layer_token.clone(),
            );
            let failures_tx = self.failures_tx.clone();
            tasks.push(tokio::spawn(async move {
                if let Err(error) = reader.run().await {
                    let rid = reader.layer().rid().to_owned();
                    let ssrc = reader.layer().ssrc();
                    log::warn!("layer rid={rid:?} ssrc={ssrc} stopped: {error}");

                    layer_token.cancel();
                    let _ = failures_tx.send(LayerFailure { rid, ssrc, error });
                }
            }));
        }

        log::debug!(
            "TrackRelay started {} layer(s), feedback {}",
            track.layers().len(),
            if self.setting_engine.feedback_enabled() {
                "on"
            } else {
                "off"
            }
        );

        Ok(())
    }

    /// on_track_handler adapts the relay into a receiver on_track handler.
    pub fn on_track_handler(self: &Arc<Self>) -> OnTrackHdlrFn {
        let relay = Arc::clone(self);
        Box::new(move |track: Arc<TrackRemote>| {
            let relay = Arc::clone(&relay);
            Box::pin(async move {
                if let Err(err) = relay.on_track(track).await {
                    log::warn!("TrackRelay failed to start: {err}");
                }
            })
        })
    }

    /// close cancels every layer task and waits for them to finish.
    pub async fn close(&self) {
        self.close_token.cancel();

        let tasks: Vec<JoinHandle<()>> = {
            let mut tasks = self.tasks.lock().await;
            tasks.drain(..).collect()
        };
        for task in tasks {
            if let Err(err) = task.await {
                log::warn!("TrackRelay task ended abnormally: {err}");
            }
        }
    }
}
