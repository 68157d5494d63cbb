use futures::stream::{self, BoxStream, StreamExt};
use tokio::sync::mpsc;

/// Drains `rx` as a stream; ends once every sender is dropped.
pub fn channel_stream<T: Send + 'static>(rx: mpsc::Receiver<T>) -> BoxStream<'static, T> {
    stream::unfold(rx, |mut rx| async move { rx.recv().await.map(|item| (item, rx)) }).boxed()
}
