//! Body reading and page decoding

use super::types::{BodyStream, Entity, Page, RawPage};
use crate::error::{Error, Result};
use bytes::{Bytes, BytesMut};
use futures::StreamExt;

/// Read a body stream to the end
///
/// The stream is consumed and released whether or not reading succeeds.
pub async fn read_body(mut body: BodyStream) -> Result<Bytes> {
    let mut buf = BytesMut::new();
    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(|e| Error::io_read(e.to_string()))?;
        buf.extend_from_slice(&chunk);
    }
    Ok(buf.freeze())
}

/// Decode a complete body into a page of `E`
pub fn decode_page<E: Entity>(body: &[u8]) -> Result<Page<E>> {
    serde_json::from_slice(body).map_err(|e| Error::json_decode(e.to_string()))
}

/// Read and decode a raw page
///
/// Non-2xx responses are decoded like any other: an error page does not match
/// the page shape, so it surfaces as a decode error carrying the status.
pub async fn decode<E: Entity>(raw: RawPage) -> Result<Page<E>> {
    let success = raw.is_success();
    let RawPage { status, body } = raw;
    let bytes = read_body(body).await?;

    decode_page(&bytes).map_err(|e| if success { e } else { e.with_status(status) })
}
