use super::*;

fn encodings(layers: &[(&str, SSRC)]) -> Vec<RTCRtpDecodingParameters> {
    layers
        .iter()
        .map(|(rid, ssrc)| RTCRtpDecodingParameters::new(*rid, *ssrc))
        .collect()
}

#[test]
fn test_track_remote_layers() {
    let track = TrackRemote::new(
        RTPCodecType::Video,
        &encodings(&[("q", 1), ("h", 2), ("f", 0)]),
        Weak::new(),
    );

    assert_eq!(track.kind(), RTPCodecType::Video);
    assert!(track.is_simulcast());
    assert_eq!(track.layers().len(), 3);
    assert_eq!(track.layer("h").map(|l| l.ssrc()), Some(2));
    assert_eq!(track.layer_by_ssrc(1).map(|l| l.rid()), Some("q"));
    assert!(track.layer_by_ssrc(42).is_none());

    let f = track.layer("f").expect("layer f");
    assert_eq!(f.ssrc(), 0);
    assert!(!f.is_ready());

    for layer in track.layers() {
        let owner = layer.track().expect("track is alive");
        assert!(Arc::ptr_eq(&owner, &track));
    }
}

#[test]
fn test_track_remote_single_layer_is_not_simulcast() {
    let track = TrackRemote::new(RTPCodecType::Audio, &encodings(&[("", 5)]), Weak::new());
    assert!(!track.is_simulcast());
    assert_eq!(track.layers()[0].id(), "5");
}

#[test]
fn test_simulcast_layer_outlives_track() {
    let track = TrackRemote::new(RTPCodecType::Video, &encodings(&[("", 5)]), Weak::new());
    let layer = Arc::clone(&track.layers()[0]);
    drop(track);
    assert!(layer.track().is_none());
}

#[tokio::test]
async fn test_simulcast_layer_read_without_receiver() {
    let track = TrackRemote::new(RTPCodecType::Video, &encodings(&[("", 5)]), Weak::new());
    let layer = &track.layers()[0];

    let mut b = vec![0u8; 64];
    assert!(matches!(layer.read(&mut b).await, Err(Error::ErrClosedPipe)));
    assert!(matches!(layer.read_rtp().await, Err(Error::ErrClosedPipe)));
}
