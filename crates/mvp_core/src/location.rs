use std::sync::{Arc, PoisonError, RwLock};

use futures::{
    future,
    stream::{self, BoxStream},
    StreamExt,
};
use place::{encode, PlaceRequest};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, warn};

const LOCATION_CHANNEL_CAPACITY: usize = 256;

pub trait Location: Send + Sync {
    /// The current fragment, without a leading `#`.
    fn current(&self) -> String;

    fn assign(&self, fragment: &str);

    /// Stream of fragments: the current value first, then one item per
    /// [`assign`](Location::assign). An assign racing the subscription may
    /// be yielded twice.
    fn changes(&self) -> BoxStream<'static, String>;
}

pub struct HistoryLocation {
    current: RwLock<String>,
    events: broadcast::Sender<String>,
}

impl HistoryLocation {
    pub fn new(initial: &str) -> Self {
        let (events, _) = broadcast::channel(LOCATION_CHANNEL_CAPACITY);
        Self {
            current: RwLock::new(strip_hash(initial).to_string()),
            events,
        }
    }
}

impl Default for HistoryLocation {
    fn default() -> Self {
        Self::new("")
    }
}

impl Location for HistoryLocation {
    fn current(&self) -> String {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn assign(&self, fragment: &str) {
        let fragment = strip_hash(fragment).to_string();
        // Send under the write lock so emission order matches write order.
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        current.clone_from(&fragment);
        debug!(fragment = %fragment, "location changed");
        // Err only means nobody is subscribed yet.
        let _ = self.events.send(fragment);
    }

    fn changes(&self) -> BoxStream<'static, String> {
        let receiver = self.events.subscribe();
        let current = self.current();
        stream::once(future::ready(current))
            .chain(BroadcastStream::new(receiver).filter_map(|item| {
                future::ready(match item {
                    Ok(fragment) => Some(fragment),
                    Err(err) => {
                        warn!(error = %err, "location subscriber lagged; skipping fragments");
                        None
                    }
                })
            }))
            .boxed()
    }
}

fn strip_hash(fragment: &str) -> &str {
    fragment.strip_prefix('#').unwrap_or(fragment)
}

#[derive(Clone)]
pub struct Navigator {
    location: Arc<dyn Location>,
}

impl Navigator {
    pub fn new(location: Arc<dyn Location>) -> Self {
        Self { location }
    }

    pub fn navigate_to(&self, place: &PlaceRequest) {
        self.location.assign(&encode(place));
    }

    pub fn current(&self) -> String {
        self.location.current()
    }
}

#[cfg(test)]
#[path = "tests/location_tests.rs"]
mod tests;
