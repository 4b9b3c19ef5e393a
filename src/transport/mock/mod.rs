//! In-memory stand-ins for the secure transport, used to drive receivers and
//! relays without a DTLS/SRTP session.

pub mod mock_stream;
pub mod mock_transport;
pub mod mock_writer;

pub use mock_stream::MockReadStream;
pub use mock_transport::MockTransport;
pub use mock_writer::{MockRTCPWriter, MockRTPWriter};
