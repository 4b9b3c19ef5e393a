use super::forwarder::Forwarder;
use crate::error::{Error, Result};
use crate::track::track_remote::SimulcastLayer;

use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// LayerReader pumps one simulcast layer into the [`Forwarder`] until the
/// layer fails or its token is cancelled.
pub struct LayerReader {
    layer: Arc<SimulcastLayer>,
    forwarder: Arc<Forwarder>,
    close_token: CancellationToken,
}

impl LayerReader {
    pub fn new(
        layer: Arc<SimulcastLayer>,
        forwarder: Arc<Forwarder>,
        close_token: CancellationToken,
    ) -> Self {
        LayerReader {
            layer,
            forwarder,
            close_token,
        }
    }

    pub fn layer(&self) -> &Arc<SimulcastLayer> {
        &self.layer
    }

    /// run reads and forwards packets in arrival order. It returns Ok once
    /// cancelled; any read or forward error ends the loop and is returned.
    pub async fn run(&self) -> Result<()> {
        let rid = self.layer.rid();
        if !self.forwarder.has(rid) {
            return Err(Error::ErrOutboundTrackNotFound(rid.to_owned()));
        }

        loop {
            let result = tokio::select! {
                biased;
                _ = self.close_token.cancelled() => return Ok(()),
                result = self.layer.read_rtp() => result,
            };

            let pkt = match result {
                Ok(pkt) => pkt,
                // the receiver stopped underneath us
                Err(_) if self.close_token.is_cancelled() => return Ok(()),
                Err(err) => return Err(err),
            };

            self.forwarder.forward(rid, pkt).await?;
        }
    }
}
