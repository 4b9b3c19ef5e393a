use super::mock_stream::MockReadStream;
use crate::error::{Error, Result};
use crate::rtp_transceiver::SSRC;
use crate::transport::{ReadStream, SecureTransport};

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Default)]
struct StreamTable {
    streams: HashMap<SSRC, Arc<MockReadStream>>,
    opened: Vec<SSRC>,
    fail_open: HashSet<SSRC>,
}

impl StreamTable {
    fn get_or_create(&mut self, ssrc: SSRC) -> Arc<MockReadStream> {
        Arc::clone(
            self.streams
                .entry(ssrc)
                .or_insert_with(|| Arc::new(MockReadStream::new(ssrc))),
        )
    }
}

/// MockTransport hands out [`MockReadStream`]s keyed by SSRC, the same way an
/// SRTP session demuxes by SSRC. Streams exist as soon as either side asks
/// for them, so tests can queue packets before the receiver opens a stream.
#[derive(Default)]
pub struct MockTransport {
    rtp: Mutex<StreamTable>,
    rtcp: Mutex<StreamTable>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn rtp_stream(&self, ssrc: SSRC) -> Arc<MockReadStream> {
        let mut rtp = self.rtp.lock().await;
        rtp.get_or_create(ssrc)
    }

    pub async fn rtcp_stream(&self, ssrc: SSRC) -> Arc<MockReadStream> {
        let mut rtcp = self.rtcp.lock().await;
        rtcp.get_or_create(ssrc)
    }

    /// fail_rtp_open makes opening the RTP read stream for ssrc fail.
    pub async fn fail_rtp_open(&self, ssrc: SSRC) {
        let mut rtp = self.rtp.lock().await;
        rtp.fail_open.insert(ssrc);
    }

    /// fail_rtcp_open makes opening the RTCP read stream for ssrc fail.
    pub async fn fail_rtcp_open(&self, ssrc: SSRC) {
        let mut rtcp = self.rtcp.lock().await;
        rtcp.fail_open.insert(ssrc);
    }

    /// opened_rtp lists the SSRCs whose RTP stream was opened, in open order.
    pub async fn opened_rtp(&self) -> Vec<SSRC> {
        let rtp = self.rtp.lock().await;
        rtp.opened.clone()
    }

    pub async fn opened_rtcp(&self) -> Vec<SSRC> {
        let rtcp = self.rtcp.lock().await;
        rtcp.opened.clone()
    }
}

#[async_trait]
impl SecureTransport for MockTransport {
    async fn open_rtp_read_stream(&self, ssrc: SSRC) -> Result<Arc<dyn ReadStream + Send + Sync>> {
        let mut rtp = self.rtp.lock().await;
        if rtp.fail_open.contains(&ssrc) {
            return Err(Error::new(format!(
                "mock transport: failed to open RTP stream for ssrc {ssrc}"
            )));
        }
        rtp.opened.push(ssrc);
        Ok(rtp.get_or_create(ssrc))
    }

    async fn open_rtcp_read_stream(
        &self,
        ssrc: SSRC,
    ) -> Result<Arc<dyn ReadStream + Send + Sync>> {
        let mut rtcp = self.rtcp.lock().await;
        if rtcp.fail_open.contains(&ssrc) {
            return Err(Error::new(format!(
                "mock transport: failed to open RTCP stream for ssrc {ssrc}"
            )));
        }
        rtcp.opened.push(ssrc);
        Ok(rtcp.get_or_create(ssrc))
    }
}
