//! Signed-in user notifications.
//!
//! A consumer holds at most one [`Subscription`]; subscribing again replaces
//! the previous one, and dropping the subscription unsubscribes.
use log::debug;
use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn { user_id: String },
    SignedOut,
}

#[derive(Default)]
struct Subscribers {
    next_token: u64,
    current_user: Option<String>,
    senders: HashMap<String, (u64, Sender<AuthEvent>)>,
}

#[derive(Clone, Default)]
pub struct AuthChannel {
    inner: Arc<Mutex<Subscribers>>,
}

pub struct Subscription {
    consumer: String,
    token: u64,
    receiver: Receiver<AuthEvent>,
    channel: Weak<Mutex<Subscribers>>,
    user: Option<String>,
}

fn lock(inner: &Mutex<Subscribers>) -> MutexGuard<'_, Subscribers> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

impl AuthChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `consumer`, replacing any subscription it already holds.
    /// The new subscription starts out knowing the current user, if any.
    pub fn subscribe(&self, consumer: &str) -> Subscription {
        let (sender, receiver) = mpsc::channel();
        let mut subscribers = lock(&self.inner);

        subscribers.next_token += 1;
        let token = subscribers.next_token;
        let user = subscribers.current_user.clone();

        if subscribers
            .senders
            .insert(consumer.to_string(), (token, sender))
            .is_some()
        {
            debug!("auth subscription for {} replaced", consumer);
        }

        Subscription {
            consumer: consumer.to_string(),
            token,
            receiver,
            channel: Arc::downgrade(&self.inner),
            user,
        }
    }

    pub fn publish(&self, event: AuthEvent) {
        let mut subscribers = lock(&self.inner);
        subscribers.current_user = match &event {
            AuthEvent::SignedIn { user_id } => Some(user_id.clone()),
            AuthEvent::SignedOut => None,
        };
        subscribers
            .senders
            .retain(|_, (_, sender)| sender.send(event.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.inner).senders.len()
    }
}

impl Subscription {
    /// Applies pending events and returns the signed-in user, if any.
    ///
    /// A subscription that was replaced or whose channel is gone no longer
    /// hears sign-outs, so it reports no user at all.
    pub fn latest_user(&mut self) -> Option<&str> {
        loop {
            match self.receiver.try_recv() {
                Ok(AuthEvent::SignedIn { user_id }) => self.user = Some(user_id),
                Ok(AuthEvent::SignedOut) => self.user = None,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if self.user.take().is_some() {
                        debug!("auth subscription for {} disconnected", self.consumer);
                    }
                    break;
                }
            }
        }
        self.user.as_deref()
    }

    pub fn is_active(&self) -> bool {
        let Some(inner) = self.channel.upgrade() else {
            return false;
        };
        let subscribers = lock(&inner);
        subscribers
            .senders
            .get(&self.consumer)
            .is_some_and(|(token, _)| *token == self.token)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(inner) = self.channel.upgrade() else {
            return;
        };
        let mut subscribers = lock(&inner);
        // only remove our own registration, not a replacement
        if subscribers
            .senders
            .get(&self.consumer)
            .is_some_and(|(token, _)| *token == self.token)
        {
            subscribers.senders.remove(&self.consumer);
            debug!("auth subscription for {} dropped", self.consumer);
        }
    }
}
