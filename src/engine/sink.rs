//! Delivery of scroll output to the consumer

use crate::error::{Error, Result};
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Where the scroll loop delivers items and errors
///
/// Both methods suspend until the consumer has room and return `false` once
/// nobody is left to receive.
#[async_trait]
pub(crate) trait ScrollSink<E>: Send + Sync {
    async fn item(&self, item: E) -> bool;
    async fn error(&self, err: Error) -> bool;
}

/// Items and errors on two independent channels
pub(crate) struct DualChannelSink<E> {
    pub(crate) items: mpsc::Sender<E>,
    pub(crate) errors: mpsc::Sender<Error>,
}

#[async_trait]
impl<E: Send + 'static> ScrollSink<E> for DualChannelSink<E> {
    async fn item(&self, item: E) -> bool {
        self.items.send(item).await.is_ok()
    }

    async fn error(&self, err: Error) -> bool {
        // a consumer that only reads items keeps the scroll alive
        self.errors.send(err).await.is_ok() || !self.items.is_closed()
    }
}

/// Items and errors interleaved in one ordered channel
pub(crate) struct ResultSink<E> {
    pub(crate) tx: mpsc::Sender<Result<E>>,
}

#[async_trait]
impl<E: Send + 'static> ScrollSink<E> for ResultSink<E> {
    async fn item(&self, item: E) -> bool {
        self.tx.send(Ok(item)).await.is_ok()
    }

    async fn error(&self, err: Error) -> bool {
        self.tx.send(Err(err)).await.is_ok()
    }
}
