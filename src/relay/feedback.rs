use crate::track::track_remote::SimulcastLayer;
use crate::transport::RTCPWriter;

use rtcp::payload_feedbacks::picture_loss_indication::PictureLossIndication;
use rtcp::payload_feedbacks::receiver_estimated_maximum_bitrate::ReceiverEstimatedMaximumBitrate;
use std::sync::Arc;
use tokio::time::{Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// FeedbackScheduler asks the sender of one layer for a keyframe and
/// advertises the target bitrate for it, once per interval.
pub struct FeedbackScheduler {
    layer: Arc<SimulcastLayer>,
    rtcp_writer: Arc<dyn RTCPWriter + Send + Sync>,
    interval: Duration,
    target_bitrate: u64,
    close_token: CancellationToken,
}

impl FeedbackScheduler {
    pub fn new(
        layer: Arc<SimulcastLayer>,
        rtcp_writer: Arc<dyn RTCPWriter + Send + Sync>,
        interval: Duration,
        target_bitrate: u64,
        close_token: CancellationToken,
    ) -> Self {
        FeedbackScheduler {
            layer,
            rtcp_writer,
            interval,
            target_bitrate,
            close_token,
        }
    }

    /// run ticks until the token is cancelled. The first tick is one
    /// interval after start.
    pub async fn run(&self) {
        let mut ticker = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = self.close_token.cancelled() => return,
                _ = ticker.tick() => self.tick().await,
            }
        }
    }

    /// tick sends a PLI and then a REMB for the layer. Failures are logged
    /// and the next tick tries again.
    pub async fn tick(&self) {
        let media_ssrc = self.layer.ssrc();
        if media_ssrc == 0 {
            log::trace!(
                "layer rid={:?} has no ssrc yet, skipping feedback",
                self.layer.rid()
            );
            return;
        }

        if let Err(err) = self
            .rtcp_writer
            .write_rtcp(&[Box::new(PictureLossIndication {
                sender_ssrc: 0,
                media_ssrc,
            })])
            .await
        {
            log::warn!("failed to send PLI for ssrc {media_ssrc}: {err}");
        }

        if let Err(err) = self
            .rtcp_writer
            .write_rtcp(&[Box::new(ReceiverEstimatedMaximumBitrate {
                sender_ssrc: 0,
                bitrate: self.target_bitrate as f32,
                ssrcs: vec![media_ssrc],
            })])
            .await
        {
            log::warn!("failed to send REMB for ssrc {media_ssrc}: {err}");
        }
    }
}
