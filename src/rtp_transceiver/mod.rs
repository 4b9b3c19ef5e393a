use serde::{Deserialize, Serialize};

pub mod rtp_codec;
pub mod rtp_receiver;

/// SSRC represents a synchronization source
/// A synchronization source is a randomly chosen
/// value meant to be globally unique within a particular
/// RTP session. Used to identify a single stream of media.
/// https://tools.ietf.org/html/rfc3550#section-3
#[allow(clippy::upper_case_acronyms)]
pub type SSRC = u32;

/// PayloadType identifies the format of the RTP payload and determines
/// its interpretation by the application. Each codec in a RTP Session
/// will have a different PayloadType
/// https://tools.ietf.org/html/rfc3550#section-3
pub type PayloadType = u8;

/// RTPDecodingParameters describes one negotiated encoding on the receive side.
/// `rid` is empty for a track that is not simulcast; `ssrc` is zero when the
/// encoding was only announced by RID and its SSRC is learned later.
/// http://draft.ortc.org/#dom-rtcrtpdecodingparameters
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RTCRtpDecodingParameters {
    #[serde(default)]
    pub rid: String,
    #[serde(default)]
    pub ssrc: SSRC,
}

impl RTCRtpDecodingParameters {
    pub fn new(rid: impl Into<String>, ssrc: SSRC) -> Self {
        RTCRtpDecodingParameters {
            rid: rid.into(),
            ssrc,
        }
    }
}

/// RTPReceiveParameters contains the RTP stack settings used by receivers
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RTCRtpReceiveParameters {
    pub encodings: Vec<RTCRtpDecodingParameters>,
}
