//! Command dispatch: resolve, frame, send, interpret

use std::sync::Arc;
use std::time::Duration;

use tracing::{Instrument, Span};

use super::index::CommandIndex;
use super::transport::{DataRequest, DataRequestOptions, FrameCodec, Transport, TransportError};
use super::CommandError;
use crate::devices::NetworkAddress;
use crate::zcl::{ClusterId, Command, FrameHeader, IncomingCommand};

/// How long to wait for a device to acknowledge a command
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Transaction id passed to the transport for every data request
const TRANSACTION_ID: u8 = 1;

/// Slack past the request timeout before the dispatcher gives up on a
/// transport that never returns
///
/// A transport enforces `DataRequest::timeout` itself and may still be
/// reporting its own error when that budget runs out.
const GUARD_GRACE: Duration = Duration::from_secs(2);

/// Issues cluster commands to devices and interprets their acknowledgement
///
/// Holds no mutable state: the index is read-only and each
/// [`issue_command`](Self::issue_command) is a single attempt, so calls for
/// different devices can run concurrently.
pub struct CommandDispatcher {
    index: Arc<CommandIndex>,
    transport: Arc<dyn Transport>,
    codec: Arc<dyn FrameCodec>,
    timeout: Duration,
    span: Span,
}

impl std::fmt::Debug for CommandDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandDispatcher")
            .field("commands", &self.index.len())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl CommandDispatcher {
    /// Create a dispatcher with the default reply timeout
    #[must_use]
    pub fn new(
        index: impl Into<Arc<CommandIndex>>,
        transport: Arc<dyn Transport>,
        codec: Arc<dyn FrameCodec>,
    ) -> Self {
        Self {
            index: index.into(),
            transport,
            codec,
            timeout: DEFAULT_TIMEOUT,
            span: tracing::info_span!("dispatcher"),
        }
    }

    /// Override how long to wait for a reply
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Emit dispatch events inside `span`
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    #[must_use]
    pub fn index(&self) -> &CommandIndex {
        &self.index
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Send `command` to `endpoint` on the device at `network_address` and wait
    /// for its default response
    ///
    /// # Errors
    ///
    /// - `CommandError::UnknownCommand` if `cluster` doesn't accept this command
    ///   (nothing is sent)
    /// - `CommandError::Encoding` if the frame can't be built (nothing is sent)
    /// - `CommandError::Transport` with the transport's error, unchanged
    /// - `CommandError::Status` if the device answered with a non-success status
    /// - `CommandError::UnexpectedReply` if the reply decoded to something other
    ///   than a default response
    pub async fn issue_command(
        &self,
        network_address: NetworkAddress,
        endpoint: u8,
        cluster: ClusterId,
        command: &Command,
    ) -> Result<(), CommandError> {
        let span = tracing::debug_span!(
            parent: &self.span,
            "issue_command",
            nwk = %network_address,
            endpoint,
            cluster = %cluster,
            command = %command.shape(),
        );
        self.issue(network_address, endpoint, cluster, command)
            .instrument(span)
            .await
    }

    async fn issue(
        &self,
        network_address: NetworkAddress,
        endpoint: u8,
        cluster: ClusterId,
        command: &Command,
    ) -> Result<(), CommandError> {
        let Some(command_id) = self.index.lookup(cluster, command) else {
            tracing::warn!("no command id for this command on cluster");
            return Err(CommandError::UnknownCommand {
                cluster,
                shape: command.shape(),
            });
        };

        let header = FrameHeader::cluster_command(command_id);
        let payload = self
            .codec
            .build_frame(&header, command)
            .map_err(CommandError::Encoding)?;

        let request = DataRequest {
            network_address,
            endpoint,
            transaction_id: TRANSACTION_ID,
            cluster_id: cluster,
            options: DataRequestOptions::default(),
            timeout: self.timeout,
            payload,
        };

        tracing::debug!(command_id, bytes = request.payload.len(), "sending command");
        let guard = self.timeout.saturating_add(GUARD_GRACE);
        let response = tokio::time::timeout(guard, self.transport.data_request(request))
            .await
            .unwrap_or_else(|_| {
                tracing::warn!(after = ?guard, "transport ignored its deadline");
                Err(TransportError::Timeout {
                    after: self.timeout,
                })
            })?;

        let message = match self.codec.decode_incoming(&response) {
            Ok(message) => message,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    reply = %hex::encode(&response),
                    "unsupported data response message"
                );
                return Ok(());
            }
        };

        match message.command {
            IncomingCommand::DefaultResponse { command_id: acked, status } => {
                if acked != command_id {
                    tracing::warn!(command_id, acked, "default response acknowledges a different command");
                }
                if status.is_success() {
                    tracing::debug!(command_id, "command acknowledged");
                    Ok(())
                } else {
                    tracing::warn!(command_id, status = %status, "command rejected by device");
                    Err(CommandError::Status {
                        command_id,
                        cluster,
                        status,
                    })
                }
            }
            IncomingCommand::Other { command_id: reply_command_id } => {
                tracing::warn!(command_id, reply_command_id, "reply is not a default response");
                Err(CommandError::UnexpectedReply {
                    command_id,
                    cluster,
                    reply_command_id,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::commands::CodecError;
    use crate::zcl::{IncomingMessage, StandardCatalog, ZclStatus};

    /// Echoes the header back as the payload and acknowledges with a fixed status
    struct HeaderCodec;

    impl FrameCodec for HeaderCodec {
        fn build_frame(&self, header: &FrameHeader, _command: &Command) -> Result<Vec<u8>, CodecError> {
            Ok(vec![u8::from(header.disable_default_response), header.command_id])
        }

        fn decode_incoming(&self, bytes: &[u8]) -> Result<IncomingMessage, CodecError> {
            Ok(IncomingMessage {
                cluster_id: ClusterId::ON_OFF,
                source_endpoint: 1,
                command: IncomingCommand::DefaultResponse {
                    command_id: bytes[1],
                    status: ZclStatus(bytes[0]),
                },
            })
        }
    }

    #[derive(Default)]
    struct LoopbackTransport {
        requests: Mutex<Vec<DataRequest>>,
    }

    #[async_trait]
    impl Transport for LoopbackTransport {
        async fn data_request(&self, request: DataRequest) -> Result<Vec<u8>, TransportError> {
            let reply = vec![ZclStatus::SUCCESS.code(), request.payload[1]];
            self.requests.lock().unwrap().push(request);
            Ok(reply)
        }
    }

    struct SilentTransport;

    #[async_trait]
    impl Transport for SilentTransport {
        async fn data_request(&self, _request: DataRequest) -> Result<Vec<u8>, TransportError> {
            std::future::pending().await
        }
    }

    fn index() -> CommandIndex {
        CommandIndex::build(&StandardCatalog)
    }

    #[tokio::test]
    async fn request_carries_resolved_id_and_defaults() {
        let transport = Arc::new(LoopbackTransport::default());
        let dispatcher = CommandDispatcher::new(index(), transport.clone(), Arc::new(HeaderCodec));

        dispatcher
            .issue_command(NetworkAddress(0x1234), 11, ClusterId::LEVEL_CONTROL, &Command::Stop)
            .await
            .unwrap();

        let requests = transport.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.network_address, NetworkAddress(0x1234));
        assert_eq!(request.endpoint, 11);
        assert_eq!(request.cluster_id, ClusterId::LEVEL_CONTROL);
        assert_eq!(request.transaction_id, 1);
        assert_eq!(request.timeout, DEFAULT_TIMEOUT);
        assert_eq!(request.options, DataRequestOptions::default());
        // default response requested, command id 0x03
        assert_eq!(request.payload, vec![0, 0x03]);
    }

    #[test]
    fn cluster_command_header() {
        let header = FrameHeader::cluster_command(0x42);
        assert!(!header.disable_default_response);
        assert_eq!(header.frame_type, crate::zcl::FrameType::Local);
        assert_eq!(header.direction, crate::zcl::Direction::ClientToServer);
        assert_eq!(header.command_id, 0x42);
    }

    #[tokio::test]
    async fn silent_transport_times_out() {
        let dispatcher = CommandDispatcher::new(index(), Arc::new(SilentTransport), Arc::new(HeaderCodec))
            .with_timeout(Duration::from_millis(50));

        let err = dispatcher
            .issue_command(NetworkAddress(1), 1, ClusterId::ON_OFF, &Command::On)
            .await
            .unwrap_err();

        assert_eq!(
            err,
            CommandError::Transport(TransportError::Timeout {
                after: Duration::from_millis(50)
            })
        );
    }
}
