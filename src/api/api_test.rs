use super::*;
use crate::error::Result;
use crate::transport::mock::{MockRTCPWriter, MockTransport};
use tokio::time::Duration;

#[test]
fn test_new_api() -> Result<()> {
    let mut s = SettingEngine::default();
    s.set_receive_mtu(1200);
    s.set_feedback_interval(Duration::from_secs(1))?;

    let api = APIBuilder::new().with_setting_engine(s).build();

    assert_eq!(api.setting_engine().get_receive_mtu(), 1200);
    assert_eq!(api.setting_engine().feedback_interval(), Duration::from_secs(1));

    let api = APIBuilder::new().build();
    assert_eq!(*api.setting_engine(), SettingEngine::default());

    Ok(())
}

#[tokio::test]
async fn test_api_new_rtp_receiver() {
    let mut s = SettingEngine::default();
    s.set_receive_mtu(1200);
    let api = APIBuilder::new().with_setting_engine(s).build();

    let receiver = api.new_rtp_receiver(RTPCodecType::Audio, Arc::new(MockTransport::new()));
    assert_eq!(receiver.kind(), RTPCodecType::Audio);
    assert_eq!(receiver.receive_mtu(), 1200);
    assert!(receiver.track().is_none());
}

#[tokio::test]
async fn test_api_track_relay_follows_receiver() -> Result<()> {
    let api = APIBuilder::new().build();
    let receiver = api.new_rtp_receiver(RTPCodecType::Video, Arc::new(MockTransport::new()));

    let relay = api.new_track_relay(&receiver, HashMap::new(), Arc::new(MockRTCPWriter::new()));
    assert!(!relay.is_closed());

    receiver.stop().await?;
    assert!(relay.is_closed());

    Ok(())
}
