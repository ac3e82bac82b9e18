use futures::stream::{self, StreamExt};
use std::future::Future;

/// Maps `f` over `items` with at most `parallelism` futures polled at once.
///
/// Results come back in input order whatever order the futures finish in.
pub async fn map_ordered_bounded<I, T, R, F, Fut>(items: I, parallelism: usize, f: F) -> Vec<R>
where
    I: IntoIterator<Item = T>,
    F: FnMut(T) -> Fut,
    Fut: Future<Output = R>,
{
    stream::iter(items)
        .map(f)
        .buffered(parallelism.max(1))
        .collect()
        .await
}
