//! One-shot readiness of the diagram generator.
//!
//! Nothing may call into the generator before it announces itself, so the
//! renderer is only handed out through this signal. Waiting on it is the one
//! suspension point of the whole system.

use futures::channel::oneshot;

/// The sending half; firing it hands the renderer over.
#[derive(Debug)]
pub struct ReadySignal<R> {
    sender: oneshot::Sender<R>,
}

impl<R> ReadySignal<R> {
    pub fn fire(self, renderer: R) {
        if self.sender.send(renderer).is_err() {
            tracing::debug!("readiness fired after the waiting side went away");
        }
    }
}

/// The waiting half.
#[derive(Debug)]
pub struct Readiness<R> {
    receiver: oneshot::Receiver<R>,
}

impl<R> Readiness<R> {
    /// A signal that has already fired.
    pub fn ready(renderer: R) -> Self {
        let (signal, readiness) = channel();
        signal.fire(renderer);
        readiness
    }

    /// Resolves to the renderer, or `None` if the signal was dropped unfired.
    pub async fn wait(self) -> Option<R> {
        self.receiver.await.ok()
    }
}

pub fn channel<R>() -> (ReadySignal<R>, Readiness<R>) {
    let (sender, receiver) = oneshot::channel();
    (ReadySignal { sender }, Readiness { receiver })
}
