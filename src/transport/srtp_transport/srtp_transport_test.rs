use super::*;
use crate::relay::forwarder::Forwarder;
use crate::track::track_local::track_local_static_rtp::TrackLocalStaticRTP;
use crate::track::track_local::TrackLocalWriter;

use async_trait::async_trait;
use bytes::Bytes;
use rtcp::payload_feedbacks::picture_loss_indication::PictureLossIndication;
use srtp::config::{Config, SessionKeys};
use srtp::protection_profile::ProtectionProfile;
use srtp::session::Session;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use util::{Conn, Unmarshal};

const TEST_SSRC: u32 = 5000;

fn config() -> Config {
    Config {
        profile: ProtectionProfile::Aes128CmHmacSha1_80,
        keys: SessionKeys {
            local_master_key: vec![
                0xE1, 0xF9, 0x7A, 0x0D, 0x3E, 0x01, 0x8B, 0xE0, 0xD6, 0x4F, 0xA3, 0x2C, 0x06, 0xDE,
                0x41, 0x39,
            ],
            local_master_salt: vec![
                0x0E, 0xC6, 0x75, 0xAD, 0x49, 0x8A, 0xFE, 0xEB, 0xB6, 0x96, 0x0B, 0x3A, 0xAB, 0xE6,
            ],
            remote_master_key: vec![
                0xE1, 0xF9, 0x7A, 0x0D, 0x3E, 0x01, 0x8B, 0xE0, 0xD6, 0x4F, 0xA3, 0x2C, 0x06, 0xDE,
                0x41, 0x39,
            ],
            remote_master_salt: vec![
                0x0E, 0xC6, 0x75, 0xAD, 0x49, 0x8A, 0xFE, 0xEB, 0xB6, 0x96, 0x0B, 0x3A, 0xAB, 0xE6,
            ],
        },

        local_rtp_options: None,
        remote_rtp_options: None,

        local_rtcp_options: None,
        remote_rtcp_options: None,
    }
}

async fn udp_pair() -> Result<(UdpSocket, UdpSocket)> {
    let ua = UdpSocket::bind("127.0.0.1:0").await?;
    let ub = UdpSocket::bind("127.0.0.1:0").await?;

    ua.connect(ub.local_addr()?).await?;
    ub.connect(ua.local_addr()?).await?;

    Ok((ua, ub))
}

async fn build_srtp_transport_pair() -> Result<(SrtpTransport, SrtpTransport)> {
    let (rtp_a, rtp_b) = udp_pair().await?;
    let (rtcp_a, rtcp_b) = udp_pair().await?;

    let a = SrtpTransport::new(
        Arc::new(Session::new(Arc::new(rtp_a), config(), true).await?),
        Arc::new(Session::new(Arc::new(rtcp_a), config(), false).await?),
    );
    let b = SrtpTransport::new(
        Arc::new(Session::new(Arc::new(rtp_b), config(), true).await?),
        Arc::new(Session::new(Arc::new(rtcp_b), config(), false).await?),
    );

    Ok((a, b))
}

/// ClosedConn behaves like a connection whose peer already went away.
struct ClosedConn;

#[async_trait]
impl Conn for ClosedConn {
    async fn connect(&self, _addr: SocketAddr) -> util::Result<()> {
        Err(util::Error::ErrBufferClosed)
    }

    async fn recv(&self, _buf: &mut [u8]) -> util::Result<usize> {
        Err(util::Error::ErrBufferClosed)
    }

    async fn recv_from(&self, _buf: &mut [u8]) -> util::Result<(usize, SocketAddr)> {
        Err(util::Error::ErrBufferClosed)
    }

    async fn send(&self, _buf: &[u8]) -> util::Result<usize> {
        Err(util::Error::ErrBufferClosed)
    }

    async fn send_to(&self, _buf: &[u8], _target: SocketAddr) -> util::Result<usize> {
        Err(util::Error::ErrBufferClosed)
    }

    fn local_addr(&self) -> util::Result<SocketAddr> {
        Err(util::Error::ErrBufferClosed)
    }

    fn remote_addr(&self) -> Option<SocketAddr> {
        None
    }

    async fn close(&self) -> util::Result<()> {
        Ok(())
    }

    fn as_any(&self) -> &(dyn std::any::Any + Send + Sync) {
        self
    }
}

async fn build_closed_srtp_transport() -> Result<SrtpTransport> {
    Ok(SrtpTransport::new(
        Arc::new(Session::new(Arc::new(ClosedConn), config(), true).await?),
        Arc::new(Session::new(Arc::new(ClosedConn), config(), false).await?),
    ))
}

fn packet(sequence_number: u16) -> rtp::packet::Packet {
    rtp::packet::Packet {
        header: rtp::header::Header {
            version: 2,
            payload_type: 96,
            sequence_number,
            ssrc: TEST_SSRC,
            ..Default::default()
        },
        payload: Bytes::from_static(&[0x00, 0x01, 0x03, 0x04]),
    }
}

#[tokio::test]
async fn test_srtp_transport_rtp_round_trip() -> Result<()> {
    let (a, b) = build_srtp_transport_pair().await?;

    let read_stream = b.open_rtp_read_stream(TEST_SSRC).await?;
    a.write_rtp(&packet(7)).await?;

    let mut buf = vec![0u8; crate::RECEIVE_MTU];
    let n = read_stream.read(&mut buf).await?;
    let mut raw = &buf[..n];
    let pkt = rtp::packet::Packet::unmarshal(&mut raw)?;
    assert_eq!(pkt.header.ssrc, TEST_SSRC);
    assert_eq!(pkt.header.sequence_number, 7);
    assert_eq!(pkt.payload, Bytes::from_static(&[0x00, 0x01, 0x03, 0x04]));

    read_stream.close().await?;
    let result = read_stream.read(&mut buf).await;
    assert!(
        matches!(result, Err(ref err) if err.is_closed_pipe()),
        "read after close should report a closed pipe, got {result:?}"
    );

    Ok(())
}

#[tokio::test]
async fn test_srtp_transport_rtcp_round_trip() -> Result<()> {
    let (a, b) = build_srtp_transport_pair().await?;

    let read_stream = b.open_rtcp_read_stream(TEST_SSRC).await?;
    a.write_rtcp(&[Box::new(PictureLossIndication {
        sender_ssrc: 0,
        media_ssrc: TEST_SSRC,
    })])
    .await?;

    let mut buf = vec![0u8; crate::RECEIVE_MTU];
    let n = read_stream.read(&mut buf).await?;
    let mut raw = &buf[..n];
    let pkts = rtcp::packet::unmarshal(&mut raw)?;
    let pli = pkts[0]
        .as_any()
        .downcast_ref::<PictureLossIndication>()
        .expect("expected a PictureLossIndication");
    assert_eq!(pli.media_ssrc, TEST_SSRC);

    read_stream.close().await?;

    Ok(())
}

#[tokio::test]
async fn test_srtp_transport_write_after_connection_closed() -> Result<()> {
    let transport = build_closed_srtp_transport().await?;

    let result = transport.write_rtp(&packet(1)).await;
    assert!(matches!(result, Err(Error::ErrClosedPipe)));

    let result = transport
        .write_rtcp(&[Box::new(PictureLossIndication {
            sender_ssrc: 0,
            media_ssrc: TEST_SSRC,
        })])
        .await;
    assert!(matches!(result, Err(Error::ErrClosedPipe)));

    Ok(())
}

#[tokio::test]
async fn test_srtp_transport_closed_viewer_is_not_fatal() -> Result<()> {
    let transport = Arc::new(build_closed_srtp_transport().await?);

    let track = Arc::new(TrackLocalStaticRTP::with_ssrc(
        222,
        "video".to_owned(),
        "webrtc-rs".to_owned(),
    ));
    track.bind(transport).await;

    let mut outbound_tracks: HashMap<String, Arc<dyn TrackLocalWriter + Send + Sync>> =
        HashMap::new();
    outbound_tracks.insert(String::new(), track);
    let forwarder = Forwarder::new(outbound_tracks);

    forwarder.forward("", packet(1)).await?;

    Ok(())
}

#[test]
fn test_closed_pipe_classification() {
    let err = closed_pipe(srtp::Error::Util(util::Error::ErrBufferClosed));
    assert!(matches!(err, Error::ErrClosedPipe));

    let err = Error::from(srtp::Error::Util(util::Error::ErrBufferClosed));
    assert!(err.is_closed_pipe());
    assert!(Error::from(util::Error::ErrBufferClosed).is_closed_pipe());
    assert!(Error::ErrClosedPipe.is_closed_pipe());

    let err = closed_pipe(srtp::Error::Util(util::Error::ErrTimeout));
    assert!(matches!(err, Error::ErrSrtpError(_)));
    assert!(!err.is_closed_pipe());
    assert!(!Error::new("other".to_owned()).is_closed_pipe());
}
