//! Command dispatch to devices
//!
//! A typed [`Command`](crate::zcl::Command) is resolved to its wire
//! identifier through the [`CommandIndex`], framed by a [`FrameCodec`], sent
//! through a [`Transport`], and the device's default response is turned into
//! a success or a [`CommandError`].

pub mod dispatcher;
pub mod index;
pub mod transport;

use thiserror::Error;

use crate::zcl::{ClusterId, CommandShape, ZclStatus};

pub use dispatcher::{CommandDispatcher, DEFAULT_TIMEOUT};
pub use index::CommandIndex;
pub use transport::{
    CodecError, DataRequest, DataRequestOptions, FrameCodec, Transport, TransportError,
};

/// Why a command didn't complete
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// The cluster is unknown or doesn't accept this command; nothing was sent
    #[error("failed to look up command id for '{shape}' on cluster [{cluster}]")]
    UnknownCommand { cluster: ClusterId, shape: CommandShape },

    /// The frame couldn't be built; nothing was sent
    #[error(transparent)]
    Encoding(CodecError),

    /// Delivery failed or no reply arrived in time
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The device replied with a non-success status
    #[error("unable to run command [{command_id}] on cluster [{cluster}]. Status: [{status}]")]
    Status {
        command_id: u8,
        cluster: ClusterId,
        status: ZclStatus,
    },

    /// The reply decoded but wasn't a default response
    #[error("command [{command_id}] on cluster [{cluster}] got reply command [{reply_command_id}] instead of a default response")]
    UnexpectedReply {
        command_id: u8,
        cluster: ClusterId,
        reply_command_id: u8,
    },
}

impl CommandError {
    /// Whether the failure happened before anything was sent
    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(self, Self::UnknownCommand { .. } | Self::Encoding(_))
    }
}
