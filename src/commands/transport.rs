//! Collaborators the dispatcher talks to: the radio transport and the frame codec

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::devices::NetworkAddress;
use crate::zcl::{ClusterId, Command, FrameHeader, IncomingMessage};

/// Delivery options for a data request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DataRequestOptions {
    /// Ask for an APS-level acknowledgement
    pub ack_request: bool,
    /// Force route discovery before sending
    pub discover_route: bool,
    /// Send without using the routing table
    pub skip_routing: bool,
}

/// One outbound frame and how long to wait for its reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataRequest {
    pub network_address: NetworkAddress,
    pub endpoint: u8,
    pub transaction_id: u8,
    pub cluster_id: ClusterId,
    pub options: DataRequestOptions,
    pub timeout: Duration,
    pub payload: Vec<u8>,
}

/// Failure reported by the transport
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("no reply within {after:?}")]
    Timeout { after: Duration },

    #[error("request rejected by coordinator with status {status}")]
    Rejected { status: u8 },

    #[error("transport io error: {0}")]
    Io(String),

    #[error("transport closed")]
    Closed,
}

/// Failure building or decoding a frame
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("can't encode frame: {0}")]
    Encode(String),

    #[error("can't decode frame: {0}")]
    Decode(String),
}

/// Sends a frame to a device and waits for the correlated reply
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request.payload` and return the raw reply bytes
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Timeout` if no reply arrives within
    /// `request.timeout`, or another variant if the request can't be delivered
    async fn data_request(&self, request: DataRequest) -> Result<Vec<u8>, TransportError>;
}

/// Turns structured frames into bytes and back
pub trait FrameCodec: Send + Sync {
    /// Encode a command frame
    ///
    /// # Errors
    ///
    /// Returns `CodecError::Encode` if the command can't be serialized
    fn build_frame(&self, header: &FrameHeader, command: &Command) -> Result<Vec<u8>, CodecError>;

    /// Decode a reply into a structured message
    ///
    /// # Errors
    ///
    /// Returns `CodecError::Decode` if the bytes aren't a recognized message
    fn decode_incoming(&self, bytes: &[u8]) -> Result<IncomingMessage, CodecError>;
}
