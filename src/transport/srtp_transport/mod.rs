#[cfg(test)]
mod srtp_transport_test;

use super::*;
use crate::error::Error;

/// SrtpTransport adapts a pair of keyed SRTP/SRTCP sessions to the
/// [`SecureTransport`], [`RTPWriter`] and [`RTCPWriter`] seams.
#[derive(Clone)]
pub struct SrtpTransport {
    srtp_session: Arc<srtp::session::Session>,
    srtcp_session: Arc<srtp::session::Session>,
}

impl SrtpTransport {
    pub fn new(
        srtp_session: Arc<srtp::session::Session>,
        srtcp_session: Arc<srtp::session::Session>,
    ) -> Self {
        SrtpTransport {
            srtp_session,
            srtcp_session,
        }
    }

    pub fn srtp_session(&self) -> Arc<srtp::session::Session> {
        Arc::clone(&self.srtp_session)
    }

    pub fn srtcp_session(&self) -> Arc<srtp::session::Session> {
        Arc::clone(&self.srtcp_session)
    }
}

#[async_trait]
impl SecureTransport for SrtpTransport {
    async fn open_rtp_read_stream(&self, ssrc: SSRC) -> Result<Arc<dyn ReadStream + Send + Sync>> {
        let stream = self.srtp_session.open(ssrc).await;
        Ok(Arc::new(SrtpReadStream(stream)))
    }

    async fn open_rtcp_read_stream(
        &self,
        ssrc: SSRC,
    ) -> Result<Arc<dyn ReadStream + Send + Sync>> {
        let stream = self.srtcp_session.open(ssrc).await;
        Ok(Arc::new(SrtpReadStream(stream)))
    }
}

#[async_trait]
impl RTPWriter for SrtpTransport {
    async fn write_rtp(&self, pkt: &rtp::packet::Packet) -> Result<usize> {
        self.srtp_session.write_rtp(pkt).await.map_err(closed_pipe)
    }
}

#[async_trait]
impl RTCPWriter for SrtpTransport {
    async fn write_rtcp(
        &self,
        pkts: &[Box<dyn rtcp::packet::Packet + Send + Sync>],
    ) -> Result<usize> {
        let mut n = 0;
        for p in pkts {
            n += self
                .srtcp_session
                .write_rtcp(p.as_ref())
                .await
                .map_err(closed_pipe)?;
        }
        Ok(n)
    }
}

/// SrtpReadStream wraps one demuxed SRTP or SRTCP stream.
pub struct SrtpReadStream(Arc<srtp::stream::Stream>);

#[async_trait]
impl ReadStream for SrtpReadStream {
    async fn read(&self, buf: &mut [u8]) -> Result<usize> {
        self.0.read(buf).await.map_err(closed_pipe)
    }

    async fn close(&self) -> Result<()> {
        Ok(self.0.close().await?)
    }
}

/// closed_pipe reports a session whose connection or stream buffer is gone
/// as ErrClosedPipe, so writers can tell a departed peer from a failure.
pub(crate) fn closed_pipe(err: srtp::Error) -> Error {
    match err {
        srtp::Error::Util(util::Error::ErrBufferClosed) => Error::ErrClosedPipe,
        err => Error::ErrSrtpError(err),
    }
}
