//! Log-line framing for the liblog bridge.
//!
//! Every message becomes one line on the host's stderr:
//!
//! ```text
//! [<priority>/<tag>] <message>\n
//! ```
//!
//! The priority is printed as the caller's raw integer; no severity filtering
//! happens here. Messages are capped at the source runtime's log buffer size
//! before framing.

/// Size of the source runtime's log message buffer, NUL included.
pub const LOG_BUF_SIZE: usize = 1024;

/// Longest message body that survives truncation.
pub const MAX_MESSAGE_LEN: usize = LOG_BUF_SIZE - 1;

/// Accumulates a rendered message, silently dropping bytes past
/// [`MAX_MESSAGE_LEN`].
#[derive(Debug, Default, Clone)]
pub struct MessageBuf {
    bytes: Vec<u8>,
}

impl MessageBuf {
    #[must_use]
    pub fn new() -> Self {
        Self {
            bytes: Vec::with_capacity(128),
        }
    }

    /// Append as much of `chunk` as still fits.
    pub fn push(&mut self, chunk: &[u8]) {
        let room = MAX_MESSAGE_LEN - self.bytes.len();
        let take = chunk.len().min(room);
        self.bytes.extend_from_slice(&chunk[..take]);
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.bytes.len() >= MAX_MESSAGE_LEN
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Cap `msg` at [`MAX_MESSAGE_LEN`] bytes.
#[must_use]
pub fn truncate_message(msg: &[u8]) -> &[u8] {
    &msg[..msg.len().min(MAX_MESSAGE_LEN)]
}

/// Build the complete output line, newline included.
#[must_use]
pub fn frame_line(prio: i32, tag: &[u8], msg: &[u8]) -> Vec<u8> {
    let msg = truncate_message(msg);
    let prio = prio.to_string();
    let mut line = Vec::with_capacity(prio.len() + tag.len() + msg.len() + 5);
    line.push(b'[');
    line.extend_from_slice(prio.as_bytes());
    line.push(b'/');
    line.extend_from_slice(tag);
    line.extend_from_slice(b"] ");
    line.extend_from_slice(msg);
    line.push(b'\n');
    line
}
