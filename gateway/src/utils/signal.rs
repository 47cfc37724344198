use std::future::Future;

use tokio::signal::unix::{self, SignalKind};

pub const TERMINATION_SIGNALS: [libc::c_int; 5] = [
    libc::SIGINT,
    libc::SIGTERM,
    libc::SIGQUIT,
    libc::SIGABRT,
    libc::SIGTSTP,
];

/// Subscribes to [`TERMINATION_SIGNALS`] right away and returns a future
/// which resolves with the first one received.
///
/// Must be called within a tokio runtime.
pub fn termination_signal() -> std::io::Result<impl Future<Output = SignalKind> + Send + 'static> {
    let mut streams = TERMINATION_SIGNALS
        .into_iter()
        .map(|raw| {
            let kind = SignalKind::from_raw(raw);
            unix::signal(kind).map(|stream| (kind, stream))
        })
        .collect::<std::io::Result<Vec<_>>>()?;

    Ok(async move {
        let received = streams.iter_mut().map(|(kind, stream)| {
            Box::pin(async move {
                stream.recv().await;
                *kind
            })
        });
        futures_util::future::select_all(received).await.0
    })
}
