//! Completion signals for tweens and timelines.
//!
//! A [`Completion`] resolves once the animation it belongs to reaches its end.
//! It can be polled from the frame loop without any async runtime, or awaited
//! as a [`Future`]. If the animation is cancelled before finishing the signal
//! resolves as cancelled instead.

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use futures::channel::oneshot;

/// Observable state of a completion signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionState {
    Pending,
    Finished,
    Cancelled,
}

/// Error yielded when awaiting a cancelled animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("animation was cancelled before completing")]
pub struct Cancelled;

/// Receiving half of an animation's completion signal
#[derive(Debug)]
pub struct Completion {
    receiver: oneshot::Receiver<()>,
    settled: Option<CompletionState>,
}

/// Sending half, owned by the tween engine
#[derive(Debug)]
pub(crate) struct CompletionSender(oneshot::Sender<()>);

impl CompletionSender {
    pub(crate) fn finish(self) {
        // The receiver may already be gone; nobody is waiting then.
        let _ = self.0.send(());
    }
}

impl Completion {
    pub(crate) fn channel() -> (CompletionSender, Completion) {
        let (sender, receiver) = oneshot::channel();
        (
            CompletionSender(sender),
            Completion {
                receiver,
                settled: None,
            },
        )
    }

    /// A signal that is already finished, for animations with nothing to do
    pub fn finished() -> Self {
        let (sender, completion) = Self::channel();
        sender.finish();
        completion
    }

    /// Non-blocking check of the signal
    pub fn state(&mut self) -> CompletionState {
        if let Some(state) = self.settled {
            return state;
        }

        match self.receiver.try_recv() {
            Ok(None) => CompletionState::Pending,
            Ok(Some(())) => {
                self.settled = Some(CompletionState::Finished);
                CompletionState::Finished
            }
            Err(oneshot::Canceled) => {
                self.settled = Some(CompletionState::Cancelled);
                CompletionState::Cancelled
            }
        }
    }
}

impl Future for Completion {
    type Output = Result<(), Cancelled>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.settled {
            Some(CompletionState::Finished) => return Poll::Ready(Ok(())),
            Some(CompletionState::Cancelled) => return Poll::Ready(Err(Cancelled)),
            _ => {}
        }

        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(Ok(())) => {
                self.settled = Some(CompletionState::Finished);
                Poll::Ready(Ok(()))
            }
            Poll::Ready(Err(oneshot::Canceled)) => {
                self.settled = Some(CompletionState::Cancelled);
                Poll::Ready(Err(Cancelled))
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_until_finished() {
        let (sender, mut completion) = Completion::channel();
        assert_eq!(completion.state(), CompletionState::Pending);

        sender.finish();
        assert_eq!(completion.state(), CompletionState::Finished);
        // Stays finished on repeated polls
        assert_eq!(completion.state(), CompletionState::Finished);
    }

    #[test]
    fn test_dropped_sender_cancels() {
        let (sender, mut completion) = Completion::channel();
        drop(sender);
        assert_eq!(completion.state(), CompletionState::Cancelled);
    }

    #[test]
    fn test_awaiting_finished_signal() {
        let completion = Completion::finished();
        assert_eq!(futures::executor::block_on(completion), Ok(()));
    }

    #[test]
    fn test_awaiting_cancelled_signal() {
        let (sender, completion) = Completion::channel();
        drop(sender);
        assert_eq!(futures::executor::block_on(completion), Err(Cancelled));
    }
}
