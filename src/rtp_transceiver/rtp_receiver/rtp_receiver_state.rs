use std::fmt;

/// RTCRtpReceiverState tracks the lifecycle of an RTCRtpReceiver.
/// Transitions only ever move forward: Created, then Receiving, then Stopped.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub enum RTCRtpReceiverState {
    #[default]
    Unspecified = 0,

    /// Created indicates that no stream has been opened yet.
    Created = 1,

    /// Receiving indicates that receive completed and the read streams are open.
    Receiving = 2,

    /// Stopped is terminal, the receiver can not be used again.
    Stopped = 3,
}

const RTP_RECEIVER_STATE_CREATED_STR: &str = "created";
const RTP_RECEIVER_STATE_RECEIVING_STR: &str = "receiving";
const RTP_RECEIVER_STATE_STOPPED_STR: &str = "stopped";

impl From<&str> for RTCRtpReceiverState {
    fn from(raw: &str) -> Self {
        match raw {
            RTP_RECEIVER_STATE_CREATED_STR => RTCRtpReceiverState::Created,
            RTP_RECEIVER_STATE_RECEIVING_STR => RTCRtpReceiverState::Receiving,
            RTP_RECEIVER_STATE_STOPPED_STR => RTCRtpReceiverState::Stopped,
            _ => RTCRtpReceiverState::Unspecified,
        }
    }
}

impl From<u8> for RTCRtpReceiverState {
    fn from(v: u8) -> Self {
        match v {
            1 => RTCRtpReceiverState::Created,
            2 => RTCRtpReceiverState::Receiving,
            3 => RTCRtpReceiverState::Stopped,
            _ => RTCRtpReceiverState::Unspecified,
        }
    }
}

impl fmt::Display for RTCRtpReceiverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            RTCRtpReceiverState::Created => RTP_RECEIVER_STATE_CREATED_STR,
            RTCRtpReceiverState::Receiving => RTP_RECEIVER_STATE_RECEIVING_STR,
            RTCRtpReceiverState::Stopped => RTP_RECEIVER_STATE_STOPPED_STR,
            RTCRtpReceiverState::Unspecified => "Unspecified",
        };
        write!(f, "{s}")
    }
}
