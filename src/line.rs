//! Line framing for the IRC byte stream.
//!
//! [`LineFramer`] accumulates raw transport bytes and yields complete
//! protocol lines, keeping any unterminated fragment for the next feed.
//! Lines end at `\n`, optionally preceded by `\r`; the terminator is not
//! part of the yielded line. Decoding never fails: invalid byte sequences
//! are replaced with U+FFFD.
//!
//! With the `tokio` feature the framer doubles as a
//! [`tokio_util::codec`] decoder/encoder.

use bytes::BytesMut;
use encoding::Encoding;

use crate::error::{self, ProtocolError};

/// Accumulates bytes and splits them into decoded lines.
#[derive(Debug)]
pub struct LineFramer {
    encoding: &'static Encoding,
    buffer: BytesMut,
    /// Index of next byte to check for newline
    next_index: usize,
}

impl LineFramer {
    /// Create a framer decoding with the given encoding label (e.g. `"utf-8"`).
    pub fn new(label: &str) -> error::Result<Self> {
        let encoding = Encoding::for_label(label.as_bytes())
            .ok_or_else(|| ProtocolError::UnknownEncoding(label.to_owned()))?;
        Ok(Self::with_encoding(encoding))
    }

    /// Create a UTF-8 framer.
    pub fn utf8() -> Self {
        Self::with_encoding(encoding::UTF_8)
    }

    /// Create a framer for an already resolved encoding.
    pub fn with_encoding(encoding: &'static Encoding) -> Self {
        Self {
            encoding,
            buffer: BytesMut::with_capacity(4096),
            next_index: 0,
        }
    }

    /// The encoding used to decode lines.
    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// Append raw bytes to the internal buffer.
    pub fn feed(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Yield every complete line currently buffered.
    ///
    /// The iterator is lazy: lines are removed from the buffer as they are
    /// pulled. Whatever is left unterminated stays for the next [`feed`].
    ///
    /// [`feed`]: LineFramer::feed
    pub fn drain(&mut self) -> Drain<'_> {
        Drain { framer: self }
    }

    /// Number of buffered bytes not yet yielded as a line.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether no bytes are pending.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    fn next_line(&mut self) -> Option<String> {
        take_line(&mut self.buffer, &mut self.next_index, self.encoding)
    }
}

impl Default for LineFramer {
    fn default() -> Self {
        Self::utf8()
    }
}

/// Lazy iterator over the complete lines of a [`LineFramer`].
#[derive(Debug)]
pub struct Drain<'a> {
    framer: &'a mut LineFramer,
}

impl Iterator for Drain<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.framer.next_line()
    }
}

fn take_line(
    buf: &mut BytesMut,
    next_index: &mut usize,
    encoding: &'static Encoding,
) -> Option<String> {
    let start = (*next_index).min(buf.len());
    match buf[start..].iter().position(|b| *b == b'\n') {
        Some(offset) => {
            let mut line = buf.split_to(start + offset + 1);
            *next_index = 0;

            line.truncate(line.len() - 1);
            if line.last() == Some(&b'\r') {
                line.truncate(line.len() - 1);
            }

            let (text, _had_errors) = encoding.decode_without_bom_handling(&line);
            Some(text.into_owned())
        }
        None => {
            *next_index = buf.len();
            None
        }
    }
}

#[cfg(feature = "tokio")]
mod codec {
    use bytes::BytesMut;
    use tokio_util::codec::{Decoder, Encoder};

    use super::{take_line, LineFramer};
    use crate::error::{self, ProtocolError};

    impl Decoder for LineFramer {
        type Item = String;
        type Error = ProtocolError;

        fn decode(&mut self, src: &mut BytesMut) -> error::Result<Option<String>> {
            Ok(take_line(src, &mut self.next_index, self.encoding))
        }

        fn decode_eof(&mut self, src: &mut BytesMut) -> error::Result<Option<String>> {
            match self.decode(src)? {
                Some(line) => Ok(Some(line)),
                None => {
                    // An unterminated fragment at EOF is never a line.
                    src.clear();
                    self.next_index = 0;
                    Ok(None)
                }
            }
        }
    }

    impl Encoder<String> for LineFramer {
        type Error = ProtocolError;

        fn encode(&mut self, line: String, dst: &mut BytesMut) -> error::Result<()> {
            let (bytes, _enc, _had_errors) = self.encoding.encode(&line);
            dst.extend_from_slice(&bytes);
            if !line.ends_with("\r\n") {
                dst.extend_from_slice(b"\r\n");
            }
            Ok(())
        }
    }
}
