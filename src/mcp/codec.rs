//! Line codec for the stdio transport.
//!
//! Message format: one JSON document per line, UTF-8, terminated by `\n`
//! (a trailing `\r` is tolerated). Embedded newlines are not allowed, which
//! compact `serde_json` output guarantees.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// One decoded line.
#[derive(Debug, PartialEq, Eq)]
pub enum Line {
    /// A complete message (without the line terminator).
    Message(Vec<u8>),
    /// A line longer than the limit. Its bytes were discarded.
    Oversized(usize),
}

/// Read one line from the stream.
///
/// Returns `None` on clean EOF. Lines longer than `max_line_bytes` are
/// consumed and reported as [`Line::Oversized`] so the stream stays in sync.
pub async fn read_line<R: AsyncBufRead + Unpin>(
    reader: &mut R,
    max_line_bytes: usize,
) -> std::io::Result<Option<Line>> {
    let limit = max_line_bytes as u64 + 1;
    let mut buf = Vec::new();
    let n = (&mut *reader).take(limit).read_until(b'\n', &mut buf).await?;
    if n == 0 {
        return Ok(None);
    }

    if buf.last() != Some(&b'\n') && buf.len() > max_line_bytes {
        let discarded = buf.len() + discard_line(reader).await?;
        return Ok(Some(Line::Oversized(discarded)));
    }

    while matches!(buf.last(), Some(b'\n' | b'\r')) {
        buf.pop();
    }
    Ok(Some(Line::Message(buf)))
}

async fn discard_line<R: AsyncBufRead + Unpin>(reader: &mut R) -> std::io::Result<usize> {
    let mut discarded = 0;
    loop {
        let chunk = reader.fill_buf().await?;
        if chunk.is_empty() {
            return Ok(discarded);
        }
        match chunk.iter().position(|&b| b == b'\n') {
            Some(pos) => {
                reader.consume(pos + 1);
                return Ok(discarded + pos);
            }
            None => {
                let len = chunk.len();
                reader.consume(len);
                discarded += len;
            }
        }
    }
}

/// Write one JSON message followed by a newline.
pub async fn write_message<W: AsyncWrite + Unpin>(
    writer: &mut W,
    message: &serde_json::Value,
) -> std::io::Result<()> {
    let mut bytes = serde_json::to_vec(message)?;
    bytes.push(b'\n');
    writer.write_all(&bytes).await?;
    writer.flush().await?;
    Ok(())
}
