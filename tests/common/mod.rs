//! Shared test utilities

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use mesh_steward::commands::{CodecError, DataRequest, FrameCodec, Transport, TransportError};
use mesh_steward::devices::{Device, Endpoint, IeeeAddress, LogicalType, NetworkAddress};
use mesh_steward::zcl::{ClusterId, Command, FrameHeader, IncomingCommand, IncomingMessage, ZclStatus};

/// Global command id of a default response
pub const DEFAULT_RESPONSE: u8 = 0x0b;

/// Reply bytes understood by [`StubCodec`] for a default response
#[must_use]
pub fn default_response(command_id: u8, status: ZclStatus) -> Vec<u8> {
    vec![DEFAULT_RESPONSE, command_id, status.code()]
}

/// Codec that frames `[frame control, command id]` and decodes
/// `[command id, ...]` replies; anything empty is undecodable
#[derive(Debug, Default)]
pub struct StubCodec {
    pub fail_encode: bool,
}

impl FrameCodec for StubCodec {
    fn build_frame(&self, header: &FrameHeader, command: &Command) -> Result<Vec<u8>, CodecError> {
        if self.fail_encode {
            return Err(CodecError::Encode(format!("no encoder for {}", command.shape())));
        }
        let frame_control = if header.disable_default_response { 0x11 } else { 0x01 };
        Ok(vec![frame_control, header.command_id])
    }

    fn decode_incoming(&self, bytes: &[u8]) -> Result<IncomingMessage, CodecError> {
        let command = match bytes {
            [DEFAULT_RESPONSE, command_id, status] => IncomingCommand::DefaultResponse {
                command_id: *command_id,
                status: ZclStatus(*status),
            },
            [command_id, ..] => IncomingCommand::Other {
                command_id: *command_id,
            },
            [] => return Err(CodecError::Decode("empty reply".to_string())),
        };
        Ok(IncomingMessage {
            cluster_id: ClusterId::ON_OFF,
            source_endpoint: 1,
            command,
        })
    }
}

/// Transport that answers every request with a canned result and records it
#[derive(Debug)]
pub struct StubTransport {
    reply: Result<Vec<u8>, TransportError>,
    requests: Mutex<Vec<DataRequest>>,
    calls: AtomicUsize,
}

impl StubTransport {
    #[must_use]
    pub fn replying(bytes: Vec<u8>) -> Self {
        Self::with_reply(Ok(bytes))
    }

    #[must_use]
    pub fn failing(error: TransportError) -> Self {
        Self::with_reply(Err(error))
    }

    fn with_reply(reply: Result<Vec<u8>, TransportError>) -> Self {
        Self {
            reply,
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of times the transport was invoked
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<DataRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn data_request(&self, request: DataRequest) -> Result<Vec<u8>, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().expect("requests lock").push(request);
        tokio::task::yield_now().await;
        self.reply.clone()
    }
}

/// A fully described bulb, as pairing would record it
#[must_use]
pub fn sample_bulb(ieee: &str, nwk: &str) -> Device {
    Device {
        manufacturer: Some("IKEA of Sweden".to_string()),
        model: Some("TRADFRI bulb E27 WS opal 980lm".to_string()),
        logical_type: Some(LogicalType::Router),
        main_powered: Some(true),
        endpoints: vec![Endpoint {
            id: 1,
            profile_id: 0x0104,
            device_id: 0x0220,
            in_clusters: vec![0x0000, 0x0003, 0x0004, 0x0005, 0x0006, 0x0008, 0x0300],
            out_clusters: vec![0x0005, 0x0019],
        }],
        ..Device::new(
            ieee.parse::<IeeeAddress>().expect("valid ieee"),
            nwk.parse::<NetworkAddress>().expect("valid nwk"),
        )
    }
}

/// Path to a fresh snapshot inside a temporary directory
#[must_use]
pub fn temp_db() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("devices.json");
    (dir, path)
}

/// Parse the snapshot file as raw JSON
#[must_use]
pub fn read_snapshot_json(path: &std::path::Path) -> serde_json::Value {
    let content = std::fs::read_to_string(path).expect("snapshot readable");
    serde_json::from_str(&content).expect("snapshot is valid json")
}
