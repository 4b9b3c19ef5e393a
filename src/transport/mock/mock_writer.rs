use crate::error::{Error, Result};
use crate::transport::{RTCPWriter, RTPWriter};

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{mpsc, Mutex};
use util::MarshalSize;

type RTCPPackets = Vec<Box<dyn rtcp::packet::Packet + Send + Sync>>;

/// MockRTPWriter records every RTP packet written to it.
pub struct MockRTPWriter {
    tx: mpsc::UnboundedSender<rtp::packet::Packet>,
    rx: Mutex<mpsc::UnboundedReceiver<rtp::packet::Packet>>,
    closed: AtomicBool,
    failing: AtomicBool,
}

impl Default for MockRTPWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRTPWriter {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        MockRTPWriter {
            tx,
            rx: Mutex::new(rx),
            closed: AtomicBool::new(false),
            failing: AtomicBool::new(false),
        }
    }

    /// set_closed makes writes fail with ErrClosedPipe.
    pub fn set_closed(&self, closed: bool) {
        self.closed.store(closed, Ordering::SeqCst);
    }

    /// set_failing makes writes fail with a non-recoverable error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// written_rtp waits for the next packet written.
    pub async fn written_rtp(&self) -> Option<rtp::packet::Packet> {
        let mut rx = self.rx.lock().await;
        rx.recv().await
    }

    pub async fn try_written_rtp(&self) -> Option<rtp::packet::Packet> {
        let mut rx = self.rx.lock().await;
        rx.try_recv().ok()
    }
}

#[async_trait]
impl RTPWriter for MockRTPWriter {
    async fn write_rtp(&self, pkt: &rtp::packet::Packet) -> Result<usize> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(Error::ErrClosedPipe);
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::new("mock writer: write failed".to_owned()));
        }
        let n = pkt.marshal_size();
        self.tx.send(pkt.clone()).map_err(|_| Error::ErrClosedPipe)?;
        Ok(n)
    }
}

/// MockRTCPWriter records every batch of RTCP packets written to it.
pub struct MockRTCPWriter {
    tx: mpsc::UnboundedSender<RTCPPackets>,
    rx: Mutex<mpsc::UnboundedReceiver<RTCPPackets>>,
    failing: AtomicBool,
}

impl Default for MockRTCPWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRTCPWriter {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        MockRTCPWriter {
            tx,
            rx: Mutex::new(rx),
            failing: AtomicBool::new(false),
        }
    }

    /// set_failing makes writes fail. Failed batches are not recorded.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// written_rtcp waits for the next batch written.
    pub async fn written_rtcp(&self) -> Option<RTCPPackets> {
        let mut rx = self.rx.lock().await;
        rx.recv().await
    }

    pub async fn try_written_rtcp(&self) -> Option<RTCPPackets> {
        let mut rx = self.rx.lock().await;
        rx.try_recv().ok()
    }
}

#[async_trait]
impl RTCPWriter for MockRTCPWriter {
    async fn write_rtcp(
        &self,
        pkts: &[Box<dyn rtcp::packet::Packet + Send + Sync>],
    ) -> Result<usize> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::new("mock writer: rtcp write failed".to_owned()));
        }
        let n = pkts.iter().map(|p| p.marshal_size()).sum();
        let batch: RTCPPackets = pkts.iter().map(|p| p.cloned()).collect();
        self.tx.send(batch).map_err(|_| Error::ErrClosedPipe)?;
        Ok(n)
    }
}
