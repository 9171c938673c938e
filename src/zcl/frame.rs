//! Structured frame header and decoded replies

use super::{ClusterId, ZclStatus};

/// Command namespace a frame addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameType {
    /// Profile-wide commands (read attributes, default response, ...)
    Global,
    /// Commands specific to the addressed cluster
    Local,
}

/// Which side of the cluster sent the frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    ClientToServer,
    ServerToClient,
}

/// Header fields the dispatcher decides on; the codec owns everything else
/// (transaction sequence, manufacturer code, payload layout)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub disable_default_response: bool,
    pub frame_type: FrameType,
    pub direction: Direction,
    pub command_id: u8,
}

impl FrameHeader {
    /// Header for a client-to-server cluster command that asks for an explicit acknowledgement
    #[must_use]
    pub const fn cluster_command(command_id: u8) -> Self {
        Self {
            disable_default_response: false,
            frame_type: FrameType::Local,
            direction: Direction::ClientToServer,
            command_id,
        }
    }
}

/// Command carried by a decoded reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncomingCommand {
    /// Acknowledgement of a previously sent command
    DefaultResponse { command_id: u8, status: ZclStatus },
    /// Any other command; only its identifier is kept
    Other { command_id: u8 },
}

/// A reply decoded by the frame codec
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncomingMessage {
    pub cluster_id: ClusterId,
    pub source_endpoint: u8,
    pub command: IncomingCommand,
}
