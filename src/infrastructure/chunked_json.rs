// Length-prefixed JSON chunks for the viewer stream
use crate::domain::dashboard::StreamMessage;
use async_compression::tokio::bufread::BrotliEncoder;
use axum::body::Body;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use bytes::{BufMut, Bytes, BytesMut};
use futures::stream::Stream;
use std::io;
use tokio::io::AsyncReadExt;
use tokio::sync::mpsc;

pub const CHUNK_CONTENT_TYPE: &str = "application/x-ndchunk+json";

/// Put a 4-byte big-endian length in front of `payload`.
fn frame_payload(payload: &[u8]) -> io::Result<Bytes> {
    let length = u32::try_from(payload.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "chunk exceeds u32 length"))?;
    let mut chunk = BytesMut::with_capacity(4 + payload.len());
    chunk.put_u32(length);
    chunk.put_slice(payload);
    Ok(chunk.freeze())
}

async fn brotli(json: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = BrotliEncoder::new(json);
    let mut compressed = Vec::new();
    encoder.read_to_end(&mut compressed).await?;
    Ok(compressed)
}

/// Encode one message as a chunk. With `compress`, only the payload is
/// Brotli-compressed; the length prefix stays readable.
pub async fn encode_chunk(msg: &StreamMessage, compress: bool) -> io::Result<Bytes> {
    let json = serde_json::to_vec(msg).map_err(io::Error::other)?;
    if compress {
        frame_payload(&brotli(&json).await?)
    } else {
        frame_payload(&json)
    }
}

/// Chunks for everything the viewer's receiver yields. Ends when the sender
/// side is dropped.
fn viewer_chunks(
    mut rx: mpsc::Receiver<StreamMessage>,
    compress: bool,
) -> impl Stream<Item = io::Result<Bytes>> + Send + 'static {
    async_stream::stream! {
        let mut sent = 0u64;
        while let Some(msg) = rx.recv().await {
            match encode_chunk(&msg, compress).await {
                Ok(chunk) => {
                    sent += 1;
                    yield Ok(chunk);
                }
                Err(e) => tracing::warn!("Dropping undecodable stream message: {}", e),
            }
        }
        tracing::debug!(chunks = sent, "Viewer stream closed");
    }
}

/// Streaming response over a viewer's receiver.
///
/// Chunks are compressed one by one, so no `Content-Encoding` header is set:
/// a client would otherwise try to decompress the framing itself.
pub fn stream_response(rx: mpsc::Receiver<StreamMessage>, compress: bool) -> Response {
    (
        [
            (header::CONTENT_TYPE, CHUNK_CONTENT_TYPE),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        Body::from_stream(viewer_chunks(rx, compress)),
    )
        .into_response()
}
