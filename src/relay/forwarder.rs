use crate::error::{Error, Result};
use crate::track::track_local::TrackLocalWriter;

use std::collections::HashMap;
use std::sync::Arc;

/// Forwarder republishes inbound layer packets on the outbound track
/// registered for the layer's RID.
///
/// The RID to track mapping is handed over at construction and never changes
/// afterwards, so readers of every layer can share one Forwarder.
pub struct Forwarder {
    outbound_tracks: HashMap<String, Arc<dyn TrackLocalWriter + Send + Sync>>,
}

impl Forwarder {
    pub fn new(outbound_tracks: HashMap<String, Arc<dyn TrackLocalWriter + Send + Sync>>) -> Self {
        Forwarder { outbound_tracks }
    }

    /// has reports whether an outbound track is registered for rid.
    pub fn has(&self, rid: &str) -> bool {
        self.outbound_tracks.contains_key(rid)
    }

    /// forward stamps pkt with the SSRC of the outbound track for rid and
    /// writes it there. A write on a track whose viewer already went away is
    /// not an error.
    pub async fn forward(&self, rid: &str, mut pkt: rtp::packet::Packet) -> Result<()> {
        let outbound = self
            .outbound_tracks
            .get(rid)
            .ok_or_else(|| Error::ErrOutboundTrackNotFound(rid.to_owned()))?;

        pkt.header.ssrc = outbound.ssrc();

        match outbound.write_rtp(&pkt).await {
            Ok(_) => Ok(()),
            Err(err) if err.is_closed_pipe() => {
                log::trace!("dropping packet for rid={rid:?}, outbound track closed");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }
}
