use serde::{Deserialize, Serialize};
use std::fmt;

const RTP_CODEC_TYPE_AUDIO_STR: &str = "audio";
const RTP_CODEC_TYPE_VIDEO_STR: &str = "video";
const RTP_CODEC_TYPE_UNSPECIFIED_STR: &str = "Unspecified";

/// RTPCodecType determines the type of a codec
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RTPCodecType {
    #[default]
    Unspecified = 0,

    /// RTPCodecTypeAudio indicates this is an audio codec
    Audio = 1,

    /// RTPCodecTypeVideo indicates this is a video codec
    Video = 2,
}

impl From<&str> for RTPCodecType {
    fn from(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            RTP_CODEC_TYPE_AUDIO_STR => RTPCodecType::Audio,
            RTP_CODEC_TYPE_VIDEO_STR => RTPCodecType::Video,
            _ => RTPCodecType::Unspecified,
        }
    }
}

impl From<u8> for RTPCodecType {
    fn from(v: u8) -> Self {
        match v {
            1 => RTPCodecType::Audio,
            2 => RTPCodecType::Video,
            _ => RTPCodecType::Unspecified,
        }
    }
}

impl fmt::Display for RTPCodecType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            RTPCodecType::Audio => RTP_CODEC_TYPE_AUDIO_STR,
            RTPCodecType::Video => RTP_CODEC_TYPE_VIDEO_STR,
            RTPCodecType::Unspecified => RTP_CODEC_TYPE_UNSPECIFIED_STR,
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_rtp_codec_type_string() {
        let tests = vec![
            ("Unspecified", RTPCodecType::Unspecified),
            ("audio", RTPCodecType::Audio),
            ("Video", RTPCodecType::Video),
        ];

        for (raw, expected) in tests {
            assert_eq!(RTPCodecType::from(raw), expected, "parsing {raw}");
        }

        assert_eq!(RTPCodecType::Video.to_string(), "video");
        assert_eq!(RTPCodecType::from(1u8), RTPCodecType::Audio);
    }
}
