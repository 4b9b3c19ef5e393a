use super::*;

#[test]
fn test_setting_engine_defaults() {
    let s = SettingEngine::default();

    assert_eq!(s.get_receive_mtu(), RECEIVE_MTU);
    assert_eq!(s.feedback_interval(), Duration::from_secs(3));
    assert_eq!(s.target_bitrate(), 10_000_000);
    assert!(s.feedback_enabled());
}

#[test]
fn test_set_receive_mtu() {
    let mut s = SettingEngine::default();

    s.set_receive_mtu(9000);
    assert_eq!(s.get_receive_mtu(), 9000);

    s.set_receive_mtu(0);
    assert_eq!(s.get_receive_mtu(), RECEIVE_MTU);
}

#[test]
fn test_set_feedback_interval() -> Result<()> {
    let mut s = SettingEngine::default();

    assert!(
        matches!(
            s.set_feedback_interval(Duration::ZERO),
            Err(Error::ErrSettingEngineZeroFeedbackInterval)
        ),
        "Setting engine should refuse a zero feedback interval."
    );
    assert_eq!(s.feedback_interval(), DEFAULT_FEEDBACK_INTERVAL);

    s.set_feedback_interval(Duration::from_secs(1))?;
    assert_eq!(s.feedback_interval(), Duration::from_secs(1));

    Ok(())
}

#[test]
fn test_disable_feedback() {
    let mut s = SettingEngine::default();

    s.disable_feedback(true);
    assert!(!s.feedback_enabled());
    s.disable_feedback(false);
    assert!(s.feedback_enabled());
}

#[test]
fn test_setting_engine_from_json() -> Result<()> {
    let s = SettingEngine::from_json(
        r#"{"feedback_interval":{"secs":1,"nanos":0},"target_bitrate":2500000}"#,
    )?;
    assert_eq!(s.feedback_interval(), Duration::from_secs(1));
    assert_eq!(s.target_bitrate(), 2_500_000);
    assert_eq!(s.get_receive_mtu(), RECEIVE_MTU);
    assert!(s.feedback_enabled());

    let result =
        SettingEngine::from_json(r#"{"feedback_interval":{"secs":0,"nanos":0}}"#);
    assert!(matches!(
        result,
        Err(Error::ErrSettingEngineZeroFeedbackInterval)
    ));

    let result = SettingEngine::from_json("{not json");
    assert!(matches!(result, Err(Error::ErrSerdeJson(_))));

    Ok(())
}

#[test]
fn test_setting_engine_json_round_trip() -> Result<()> {
    let mut s = SettingEngine::default();
    s.set_target_bitrate(1_000_000);
    s.disable_feedback(true);

    let json = serde_json::to_string(&s)?;
    assert_eq!(SettingEngine::from_json(&json)?, s);

    Ok(())
}
