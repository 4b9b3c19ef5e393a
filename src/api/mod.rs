#[cfg(test)]
mod api_test;

pub mod setting_engine;

use crate::relay::forwarder::Forwarder;
use crate::relay::TrackRelay;
use crate::rtp_transceiver::rtp_codec::RTPCodecType;
use crate::rtp_transceiver::rtp_receiver::RTCRtpReceiver;
use crate::track::track_local::TrackLocalWriter;
use crate::transport::{RTCPWriter, SecureTransport};

use setting_engine::*;
use std::collections::HashMap;
use std::sync::Arc;

/// API bundles the constructors of this crate so that every object they
/// build shares one [`SettingEngine`].
pub struct API {
    pub(crate) setting_engine: Arc<SettingEngine>,
}

impl API {
    pub fn setting_engine(&self) -> &SettingEngine {
        &self.setting_engine
    }

    /// new_rtp_receiver constructs a new RTPReceiver
    pub fn new_rtp_receiver(
        &self,
        kind: RTPCodecType,
        transport: Arc<dyn SecureTransport + Send + Sync>,
    ) -> RTCRtpReceiver {
        RTCRtpReceiver::new(self.setting_engine.get_receive_mtu(), kind, transport)
    }

    /// new_track_relay builds a relay that republishes every layer of the
    /// receiver's track on the outbound track registered for its RID, and
    /// installs it as the receiver's on_track handler.
    ///
    /// The relay's tasks end when the receiver stops or the relay is closed.
    pub fn new_track_relay(
        &self,
        receiver: &RTCRtpReceiver,
        outbound_tracks: HashMap<String, Arc<dyn TrackLocalWriter + Send + Sync>>,
        rtcp_writer: Arc<dyn RTCPWriter + Send + Sync>,
    ) -> Arc<TrackRelay> {
        let relay = Arc::new(TrackRelay::new(
            Forwarder::new(outbound_tracks),
            rtcp_writer,
            Arc::clone(&self.setting_engine),
            receiver.cancellation_token(),
        ));
        receiver.on_track(relay.on_track_handler());

        relay
    }
}

#[derive(Default)]
pub struct APIBuilder {
    setting_engine: Option<Arc<SettingEngine>>,
}

impl APIBuilder {
    pub fn new() -> Self {
        APIBuilder::default()
    }

    pub fn build(mut self) -> API {
        API {
            setting_engine: if let Some(setting_engine) = self.setting_engine.take() {
                setting_engine
            } else {
                Arc::new(SettingEngine::default())
            },
        }
    }

    /// WithSettingEngine allows providing a SettingEngine to the API.
    /// Settings should not be changed after passing the engine to an API.
    pub fn with_setting_engine(mut self, setting_engine: SettingEngine) -> Self {
        self.setting_engine = Some(Arc::new(setting_engine));
        self
    }
}
