//! Protocol replies and framing
//!
//! Control-channel replies and the length-prefixed frames written on the
//! data connection.

/// Acknowledgement sent on the control connection for a valid request.
pub const OK_REPLY: &[u8] = b"OK";

pub const INVALID_HOSTNAME_MESSAGE: &str = "Invalid hostname";
pub const INVALID_PORT_MESSAGE: &str =
    "ERROR: Invalid port number. Port number must be between 1025 and 65535";
pub const INVALID_COMMAND_MESSAGE: &str = "Invalid command";

/// Error text carried in the file-not-found frame.
pub const FILE_NOT_FOUND_MESSAGE: &str = "Error: File not found";

/// Length sentinel marking an error frame.
pub const ERROR_SENTINEL: i64 = -1;

/// Build the fixed-size rejection reply for the control connection.
///
/// The message occupies the start of the buffer and the rest is NUL padding.
/// Messages longer than `reply_len` are cut at `reply_len` bytes.
pub fn error_reply(message: &str, reply_len: usize) -> Vec<u8> {
    let mut reply = vec![0u8; reply_len];
    let n = message.len().min(reply_len);
    reply[..n].copy_from_slice(&message.as_bytes()[..n]);
    reply
}

/// Header preceding a successful payload: `"<len> "`.
pub fn frame_header(len: u64) -> Vec<u8> {
    format!("{} ", len).into_bytes()
}

/// Complete error frame: `"-1 <len> <text>"`.
pub fn error_frame(text: &str) -> Vec<u8> {
    format!("{} {} {}", ERROR_SENTINEL, text.len(), text).into_bytes()
}

/// A listing payload built in memory.
///
/// `declared_len` is accumulated per entry as `name_len + 1` and is what the
/// frame header announces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingFrame {
    declared_len: u64,
    body: Vec<u8>,
}

impl ListingFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one entry name followed by a newline.
    pub fn push_entry(&mut self, name: &[u8]) {
        self.body.extend_from_slice(name);
        self.body.push(b'\n');
        self.declared_len += name.len() as u64 + 1;
    }

    pub fn declared_len(&self) -> u64 {
        self.declared_len
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Header and body as written on the wire.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = frame_header(self.declared_len);
        out.extend_from_slice(&self.body);
        out
    }
}
