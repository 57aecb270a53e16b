//! Bridge connection handler feeding deliveries to the dispatcher.

use std::io::{self, BufRead, BufReader, Read, Write};

use tracing::{debug, warn};

use crate::dispatch::Dispatcher;
use crate::transport::{ConnectionHandler, ConnectionStream};

use super::{BUS_TARGET, BusError, DeliveryFrame, JsonlChannel, Output};

/// Maximum size of a single delivery line in bytes, newline excluded.
pub const MAX_FRAME_BYTES: usize = 1024 * 1024;

/// Serves a bridge connection: one delivery per line, processed in order.
#[derive(Debug)]
pub(crate) struct BridgeConnectionHandler {
    dispatcher: Dispatcher,
}

impl BridgeConnectionHandler {
    pub(crate) const fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Reads deliveries from `reader` until end of stream, writing frames to
    /// `writer`.
    ///
    /// Lines that are not deliveries cannot be acknowledged; they produce an
    /// `error` frame and reading continues with the next line.
    pub(crate) fn serve<R: BufRead, W: Write>(&self, mut reader: R, writer: W) {
        let mut channel = JsonlChannel::new(writer);
        loop {
            let line = match read_frame_line(&mut reader) {
                Ok(Some(line)) => line,
                Ok(None) => {
                    debug!(target: BUS_TARGET, "bridge closed the connection");
                    return;
                }
                Err(BusError::Io(error)) => {
                    warn!(target: BUS_TARGET, error = %error, "bridge connection failed");
                    return;
                }
                Err(error) => {
                    if !reject(&mut channel, &error) {
                        return;
                    }
                    continue;
                }
            };

            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }

            match DeliveryFrame::parse(&line) {
                Ok(frame) => {
                    self.dispatcher.process(frame.into_delivery(), &mut channel);
                }
                Err(error) => {
                    if !reject(&mut channel, &error) {
                        return;
                    }
                }
            }
        }
    }
}

impl ConnectionHandler for BridgeConnectionHandler {
    fn handle(&self, stream: ConnectionStream) {
        let writer = match stream.try_clone() {
            Ok(writer) => writer,
            Err(error) => {
                warn!(
                    target: BUS_TARGET,
                    error = %error,
                    "failed to split bridge connection"
                );
                return;
            }
        };
        self.serve(BufReader::new(stream), writer);
    }
}

/// Reports an undecodable line. Returns `false` when the connection is no
/// longer writable.
fn reject<W: Write>(channel: &mut JsonlChannel<W>, error: &BusError) -> bool {
    warn!(target: BUS_TARGET, error = %error, "discarding bridge line");
    match channel.report_error(&error.to_string()) {
        Ok(()) => true,
        Err(write_error) => {
            warn!(
                target: BUS_TARGET,
                error = %write_error,
                "failed to report malformed delivery"
            );
            false
        }
    }
}

/// Reads one newline-terminated line of at most [`MAX_FRAME_BYTES`].
///
/// Returns `Ok(None)` at end of stream. An oversized line is consumed up to
/// its newline and reported as [`BusError::FrameTooLarge`].
fn read_frame_line<R: BufRead>(reader: &mut R) -> Result<Option<Vec<u8>>, BusError> {
    let mut line = Vec::new();
    let limit = u64::try_from(MAX_FRAME_BYTES + 1).unwrap_or(u64::MAX);
    let read = retry_interrupted(|| reader.by_ref().take(limit).read_until(b'\n', &mut line))?;
    if read == 0 {
        return Ok(None);
    }

    if line.last() == Some(&b'\n') {
        line.pop();
    } else if line.len() > MAX_FRAME_BYTES {
        retry_interrupted(|| reader.skip_until(b'\n'))?;
        return Err(BusError::FrameTooLarge {
            limit: MAX_FRAME_BYTES,
        });
    }
    Ok(Some(line))
}

fn retry_interrupted<T>(mut operation: impl FnMut() -> io::Result<T>) -> io::Result<T> {
    loop {
        match operation() {
            Err(error) if error.kind() == io::ErrorKind::Interrupted => {}
            other => return other,
        }
    }
}
