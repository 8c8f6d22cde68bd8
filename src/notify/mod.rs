//! Subject/observer notification bus.
//!
//! A `Subject<S>` keeps an ordered list of observers and fans a `Message`
//! out to each of them synchronously, lending them mutable access to the
//! subject state `S` for the duration of the call. Observers never hold on
//! to the state.
pub mod observers;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrainerError};

pub use observers::{AccuracyLogger, ParameterChanger, ProgressMonitor};

/// Tag carried by every notification. `Fetch` is the default progress-class tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Message {
    #[default]
    Fetch,
    Accuracy,
}

impl Message {
    pub fn is_accuracy(self) -> bool {
        self == Message::Accuracy
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Fetch => f.write_str("fetch"),
            Message::Accuracy => f.write_str("accuracy"),
        }
    }
}

pub trait Observer<S> {
    /// React to a notification from `subject`.
    fn update(&self, subject: &mut S, message: Message) -> Result<()>;

    fn name(&self) -> &str;
}

/// Ordered observer list. Duplicates are allowed; attachment order is
/// notification order.
pub struct Subject<S> {
    observers: Vec<Arc<dyn Observer<S>>>,
}

impl<S> Subject<S> {
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    pub fn attach(&mut self, observer: Arc<dyn Observer<S>>) {
        log::debug!("Attaching observer {}", observer.name());
        self.observers.push(observer);
    }

    /// Remove the first attached observer that is the same allocation as `observer`.
    ///
    /// Detaching an observer that is not attached is an error.
    pub fn detach(&mut self, observer: &Arc<dyn Observer<S>>) -> Result<()> {
        let position = self
            .observers
            .iter()
            .position(|o| std::ptr::addr_eq(Arc::as_ptr(o), Arc::as_ptr(observer)));

        match position {
            Some(idx) => {
                self.observers.remove(idx);
                Ok(())
            }
            None => Err(TrainerError::ObserverNotFound(observer.name().to_string())),
        }
    }

    /// Deliver `message` to every observer in attachment order.
    ///
    /// The first observer error stops delivery and is returned to the caller.
    pub fn notify(&self, state: &mut S, message: Message) -> Result<()> {
        log::trace!(
            "Notifying {} observers with '{}'",
            self.observers.len(),
            message
        );
        for observer in &self.observers {
            observer.update(state, message)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub fn observer_names(&self) -> Vec<&str> {
        self.observers.iter().map(|o| o.name()).collect()
    }
}

impl<S> Default for Subject<S> {
    fn default() -> Self {
        Self::new()
    }
}
