//! Uniform timing for every public operation.

use std::future::Future;
use std::time::Instant;

/// Await `fut` and log how long it took under `operation`.
///
/// Applied by the client around each call; the wrapped future's output is
/// returned untouched, errors included.
pub async fn timed<F: Future>(operation: &'static str, fut: F) -> F::Output {
    let start = Instant::now();
    let output = fut.await;
    let elapsed_ms = start.elapsed().as_millis() as u64;
    tracing::info!(operation, elapsed_ms, "{operation} ran in {elapsed_ms}ms");
    output
}
