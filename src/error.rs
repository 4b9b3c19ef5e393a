use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// ErrClosedPipe indicates a read or write on a stream, track or receiver
    /// that has already been closed.
    #[error("io: read/write on closed pipe")]
    ErrClosedPipe,

    /// ErrShortBuffer indicates the caller supplied buffer can not hold the
    /// next datagram.
    #[error("io: short buffer")]
    ErrShortBuffer,

    #[error("no encodings provided")]
    ErrRTPReceiverNoEncodings,
    #[error("encodings must have unique RIDs")]
    ErrRTPReceiverDuplicateRID,
    #[error("Receive has already been called")]
    ErrRTPReceiverReceiveAlreadyCalled,
    #[error("RTPReceiver has been stopped")]
    ErrRTPReceiverStopped,
    #[error("no trackStreams found for RID")]
    ErrRTPReceiverForRIDTrackStreamNotFound,
    #[error("simulcast layer is already bound to an SSRC")]
    ErrRTPReceiverLayerAlreadyBound,
    #[error("SSRC must not be zero")]
    ErrRTPReceiverZeroSSRC,

    /// ErrOutboundTrackNotFound means negotiation produced a layer nobody
    /// registered an outbound track for.
    #[error("no outbound track registered for rid {0:?}")]
    ErrOutboundTrackNotFound(String),

    #[error("track relay has already been started")]
    ErrTrackRelayAlreadyStarted,

    #[error("feedback interval must be greater than zero")]
    ErrSettingEngineZeroFeedbackInterval,

    #[error("IoError: {0}")]
    ErrIoError(#[from] std::io::Error),
    #[error("UtilError: {0}")]
    ErrUtilError(#[from] util::Error),
    #[error("RtcpError: {0}")]
    ErrRtcpError(#[from] rtcp::Error),
    #[error("RtpError: {0}")]
    ErrRtpError(#[from] rtp::Error),
    #[error("SrtpError: {0}")]
    ErrSrtpError(#[from] srtp::Error),
    #[error("SerdeJsonError: {0}")]
    ErrSerdeJson(#[from] serde_json::Error),

    #[error("{0}")]
    ErrOthers(String),
}

impl Error {
    pub fn new(msg: String) -> Self {
        Error::ErrOthers(msg)
    }

    /// is_closed_pipe reports whether the error only means the other end has
    /// already gone away, which writers treat as a normal shutdown race.
    pub fn is_closed_pipe(&self) -> bool {
        matches!(
            self,
            Error::ErrClosedPipe
                | Error::ErrUtilError(util::Error::ErrBufferClosed)
                | Error::ErrSrtpError(srtp::Error::Util(util::Error::ErrBufferClosed))
        )
    }
}
