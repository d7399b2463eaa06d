use crossbeam_channel::{Receiver, Sender, TryRecvError};
use std::cell::Cell;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// State notification delivered for a backend request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkResponse<T> {
    Loading,
    Success(T),
    Failure(String),
}

/// Producer side of a subscription, held by whoever fulfils the request.
#[derive(Debug)]
pub struct Responder<T> {
    tx: Sender<NetworkResponse<T>>,
    cancelled: Arc<AtomicBool>,
}

impl<T> Responder<T> {
    /// Delivers a notification. Returns false once the consumer has gone away.
    pub fn send(&self, response: NetworkResponse<T>) -> bool {
        if self.is_cancelled() {
            return false;
        }
        self.tx.send(response).is_ok()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Consumer side. Dropping it cancels delivery.
#[derive(Debug)]
pub struct Subscription<T> {
    rx: Receiver<NetworkResponse<T>>,
    cancelled: Arc<AtomicBool>,
    disconnected: Cell<bool>,
}

impl<T> Subscription<T> {
    /// Next pending notification, if any. Never blocks.
    pub fn try_next(&self) -> Option<NetworkResponse<T>> {
        if self.is_cancelled() {
            return None;
        }
        match self.rx.try_recv() {
            Ok(response) => Some(response),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.disconnected.set(true);
                None
            }
        }
    }

    /// Drains every pending notification in arrival order.
    pub fn drain(&self) -> Vec<NetworkResponse<T>> {
        std::iter::from_fn(|| self.try_next()).collect()
    }

    /// True once the producer is gone and every notification was consumed.
    pub fn is_finished(&self) -> bool {
        self.is_cancelled() || self.disconnected.get()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.cancel();
    }
}

pub fn channel<T>() -> (Responder<T>, Subscription<T>) {
    let (tx, rx) = crossbeam_channel::unbounded();
    let cancelled = Arc::new(AtomicBool::new(false));
    (
        Responder {
            tx,
            cancelled: Arc::clone(&cancelled),
        },
        Subscription {
            rx,
            cancelled,
            disconnected: Cell::new(false),
        },
    )
}

/// A subscription that has already failed, for requests that could not be
/// dispatched at all.
pub fn failed<T>(message: impl Into<String>) -> Subscription<T> {
    let (responder, subscription) = channel();
    responder.send(NetworkResponse::Failure(message.into()));
    subscription
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivers_in_order() {
        let (responder, subscription) = channel::<u32>();
        assert!(responder.send(NetworkResponse::Loading));
        assert!(responder.send(NetworkResponse::Success(7)));

        assert_eq!(subscription.try_next(), Some(NetworkResponse::Loading));
        assert_eq!(subscription.try_next(), Some(NetworkResponse::Success(7)));
        assert_eq!(subscription.try_next(), None);
    }

    #[test]
    fn test_cancel_stops_delivery() {
        let (responder, subscription) = channel::<u32>();
        responder.send(NetworkResponse::Loading);
        subscription.cancel();

        assert!(responder.is_cancelled());
        assert!(!responder.send(NetworkResponse::Success(1)));
        assert_eq!(subscription.try_next(), None);
        assert!(subscription.is_finished());
    }

    #[test]
    fn test_drop_cancels() {
        let (responder, subscription) = channel::<()>();
        drop(subscription);
        assert!(responder.is_cancelled());
        assert!(!responder.send(NetworkResponse::Loading));
    }

    #[test]
    fn test_finished_after_producer_dropped() {
        let (responder, subscription) = channel::<u32>();
        responder.send(NetworkResponse::Success(3));
        drop(responder);

        assert!(!subscription.is_finished());
        assert_eq!(subscription.drain(), vec![NetworkResponse::Success(3)]);
        assert!(subscription.is_finished());
    }

    #[test]
    fn test_failed_subscription() {
        let subscription = failed::<()>("worker stopped");
        assert_eq!(
            subscription.try_next(),
            Some(NetworkResponse::Failure("worker stopped".to_string()))
        );
    }
}
