use crate::error::{Error, Result};
use crate::rtp_transceiver::SSRC;
use crate::transport::ReadStream;

use async_trait::async_trait;
use bytes::Bytes;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;
use util::Marshal;

/// MockReadStream is a queue of plaintext datagrams for one SSRC. Tests push
/// datagrams in with the `write*` methods and the code under test reads them
/// back through [`ReadStream`].
pub struct MockReadStream {
    ssrc: SSRC,
    tx: mpsc::UnboundedSender<Bytes>,
    rx: Mutex<mpsc::UnboundedReceiver<Bytes>>,
    closed: CancellationToken,
    fail_close: AtomicBool,
    close_count: AtomicUsize,
}

impl MockReadStream {
    pub fn new(ssrc: SSRC) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        MockReadStream {
            ssrc,
            tx,
            rx: Mutex::new(rx),
            closed: CancellationToken::new(),
            fail_close: AtomicBool::new(false),
            close_count: AtomicUsize::new(0),
        }
    }

    pub fn ssrc(&self) -> SSRC {
        self.ssrc
    }

    /// write queues one raw datagram.
    pub fn write(&self, raw: Bytes) -> Result<()> {
        if self.closed.is_cancelled() {
            return Err(Error::ErrClosedPipe);
        }
        self.tx.send(raw).map_err(|_| Error::ErrClosedPipe)
    }

    pub fn write_rtp(&self, pkt: &rtp::packet::Packet) -> Result<()> {
        self.write(pkt.marshal()?)
    }

    pub fn write_rtcp(&self, pkts: &[Box<dyn rtcp::packet::Packet + Send + Sync>]) -> Result<()> {
        self.write(rtcp::packet::marshal(pkts)?)
    }

    /// set_fail_close makes subsequent close calls fail without closing.
    pub fn set_fail_close(&self, fail: bool) {
        self.fail_close.store(fail, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.is_cancelled()
    }

    /// close_count counts every close attempt, failed ones included.
    pub fn close_count(&self) -> usize {
        self.close_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReadStream for MockReadStream {
    async fn read(&self, buf: &mut [u8]) -> Result<usize> {
        if self.closed.is_cancelled() {
            return Err(Error::ErrClosedPipe);
        }

        let mut rx = self.rx.lock().await;
        let raw = tokio::select! {
            biased;
            _ = self.closed.cancelled() => return Err(Error::ErrClosedPipe),
            raw = rx.recv() => raw.ok_or(Error::ErrClosedPipe)?,
        };

        if raw.len() > buf.len() {
            return Err(Error::ErrShortBuffer);
        }
        buf[..raw.len()].copy_from_slice(&raw);
        Ok(raw.len())
    }

    async fn close(&self) -> Result<()> {
        self.close_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_close.load(Ordering::SeqCst) {
            return Err(Error::new(format!(
                "mock stream {}: close failed",
                self.ssrc
            )));
        }
        self.closed.cancel();
        Ok(())
    }
}
