use std::{
    future::Future,
    task::{Context, Poll},
    thread,
    time::Duration,
};

use futures::task::noop_waker_ref;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Drives `future` to completion on the calling thread.
///
/// The future is re-polled every `POLL_INTERVAL` with a no-op waker, so it
/// must be backed by a runtime that makes progress on its own threads (the
/// binary runs under a multi-threaded tokio runtime). Futures that are
/// already ready return on the first poll.
pub fn poll_until_ready<Fut>(future: Fut) -> Fut::Output
where
    Fut: Future,
{
    let mut future = Box::pin(future);
    let mut context = Context::from_waker(noop_waker_ref());

    loop {
        match future.as_mut().poll(&mut context) {
            Poll::Ready(result) => return result,
            Poll::Pending => thread::sleep(POLL_INTERVAL),
        }
    }
}
