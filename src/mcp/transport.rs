//! Newline-delimited JSON framing.
//!
//! One JSON-RPC message per line in each direction. The stdio server reads
//! stdin and writes stdout; logs never go to stdout.

use std::io;

use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout,
};

use crate::mcp::protocol::JsonRpcReply;

/// The transport the stdio server runs on.
pub type StdioTransport = LineTransport<BufReader<Stdin>, Stdout>;

/// Reads request lines from `R` and writes reply lines to `W`.
pub struct LineTransport<R, W> {
    reader: R,
    writer: W,
}

impl StdioTransport {
    /// Binds to the process's stdin and stdout.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl<R, W> LineTransport<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Wraps an input and output stream.
    pub const fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Reads the next line without its `\n` or `\r\n`. `None` at EOF.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails.
    pub async fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.reader.read_line(&mut line).await? == 0 {
            return Ok(None);
        }

        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }

    /// Writes one reply as a single line and flushes.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation or writing fails.
    pub async fn write_reply(&mut self, reply: &JsonRpcReply) -> io::Result<()> {
        let mut frame = serde_json::to_vec(reply).map_err(io::Error::other)?;
        frame.push(b'\n');
        self.writer.write_all(&frame).await?;
        self.writer.flush().await
    }

    /// Gives back the output stream.
    pub fn into_writer(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::protocol::{JsonRpcError, JsonRpcResponse, RequestId};

    #[tokio::test]
    async fn lines_lose_their_terminators() {
        let input: &[u8] = b"{\"id\":1}\r\n{\"id\":2}\n\nlast";
        let mut transport = LineTransport::new(input, Vec::new());

        assert_eq!(transport.read_line().await.unwrap().as_deref(), Some("{\"id\":1}"));
        assert_eq!(transport.read_line().await.unwrap().as_deref(), Some("{\"id\":2}"));
        assert_eq!(transport.read_line().await.unwrap().as_deref(), Some(""));
        assert_eq!(transport.read_line().await.unwrap().as_deref(), Some("last"));
        assert_eq!(transport.read_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn each_reply_is_one_line() {
        let text = "# 1.4.3 Contrast (Minimum)\n\n**Level:** AA\n";
        let mut transport = LineTransport::new(&b""[..], Vec::new());

        transport
            .write_reply(
                &JsonRpcResponse::success(
                    RequestId::Number(1.into()),
                    serde_json::json!({"content": [{"type": "text", "text": text}]}),
                )
                .into(),
            )
            .await
            .unwrap();
        transport
            .write_reply(&JsonRpcError::parse_error("expected value at line 1 column 1").into())
            .await
            .unwrap();

        let output = String::from_utf8(transport.into_writer()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(output.ends_with('\n'));

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["result"]["content"][0]["text"], text);
        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["error"]["code"], -32700);
    }
}
