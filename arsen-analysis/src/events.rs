use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::context::AnalysisResult;

/// Notifications published by the analysis services.
#[derive(Debug, Clone)]
pub enum Event {
    BinaryLoaded { path: PathBuf },
    AnalysisStarted { path: PathBuf },
    /// Overall pipeline progress in percent.
    AnalysisProgress { percent: u32 },
    AnalysisCompleted { result: Arc<AnalysisResult> },
    PseudocodeGenerated { functions: usize },
    Error { message: String },
}

pub type Subscriber = Arc<dyn Fn(&Event) + Send + Sync>;

/// Fire-and-forget publish/subscribe bus.
///
/// Each event is dispatched to every subscriber on the shared thread
/// pool. Delivery order is not guaranteed, neither between subscribers
/// nor between successive events; subscribers must not rely on it.
#[derive(Default)]
pub struct EventBus {
    subscribers: RwLock<Vec<Subscriber>>,
}

impl EventBus {
    pub fn new() -> Self {
        EventBus::default()
    }

    pub fn subscribe<F>(&self, subscriber: F)
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.subscribers.write().push(Arc::new(subscriber));
    }

    pub fn publish(&self, event: Event) {
        let subscribers = self.subscribers.read();
        for subscriber in subscribers.iter() {
            let subscriber = subscriber.clone();
            let event = event.clone();
            rayon::spawn(move || {
                // A misbehaving subscriber must not take down the pool or
                // starve the other subscribers.
                let delivery = catch_unwind(AssertUnwindSafe(|| subscriber(&event)));
                if delivery.is_err() {
                    log::error!("event subscriber panicked");
                }
            });
        }
    }
}
