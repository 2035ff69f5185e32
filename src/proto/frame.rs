use bytes::Bytes;

/// A decoded RESP reply.
///
/// This enum represents the reply shapes the routing core needs to inspect:
/// - SimpleString: status replies like "OK"
/// - Error: error replies from the server
/// - Integer: numeric replies
/// - BulkString: binary-safe string data
/// - Array: aggregate replies
/// - Null: NULL value
///
/// Bulk payloads are [`Bytes`] so array traversal stays zero-copy over the
/// parser's owned buffer.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// Simple string (+OK).
    SimpleString(Vec<u8>),
    /// Error (-ERR).
    Error(Vec<u8>),
    /// Integer (:1000).
    Integer(i64),
    /// Bulk string ($6\r\nfoobar).
    BulkString(Option<Bytes>),
    /// Array (*2\r\n...).
    Array(Vec<Frame>),
    /// Null ($-1 or *-1).
    Null,
}

impl Frame {
    /// The canonical `OK` status reply.
    #[inline]
    pub fn ok() -> Frame {
        Frame::SimpleString(b"OK".to_vec())
    }

    /// Returns the integer value if this is an Integer frame.
    #[inline]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Frame::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Consumes the frame and returns its elements if this is an Array.
    #[inline]
    pub fn into_array(self) -> Option<Vec<Frame>> {
        match self {
            Frame::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the bulk payload if this is a non-null BulkString.
    #[inline]
    pub fn as_bulk(&self) -> Option<&Bytes> {
        match self {
            Frame::BulkString(Some(data)) => Some(data),
            _ => None,
        }
    }

    /// Returns true if this frame is Null.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Frame::Null)
    }
}
