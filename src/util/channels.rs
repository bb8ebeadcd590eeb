// Copyright (c) 2024 Mike Tsao

use crossbeam::channel::{Receiver, Sender};

/// Both halves of a [crossbeam::channel] in one field, so that a service can
/// hold its input and event channels as plain struct members and hand out
/// clones of either end.
#[derive(Debug)]
pub struct CrossbeamChannel<T> {
    #[allow(missing_docs)]
    pub sender: Sender<T>,
    #[allow(missing_docs)]
    pub receiver: Receiver<T>,
}
impl<T> Default for CrossbeamChannel<T> {
    fn default() -> Self {
        let (sender, receiver) = crossbeam::channel::unbounded();
        Self { sender, receiver }
    }
}
impl<T> CrossbeamChannel<T> {
    /// A channel that holds at most `capacity` messages.
    pub fn bounded(capacity: usize) -> Self {
        let (sender, receiver) = crossbeam::channel::bounded(capacity);
        Self { sender, receiver }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounded_channel_refuses_overflow() {
        let channel = CrossbeamChannel::<u8>::bounded(1);
        assert!(channel.sender.try_send(1).is_ok());
        assert!(channel.sender.try_send(2).is_err());
        assert_eq!(channel.receiver.try_recv(), Ok(1));
    }
}
