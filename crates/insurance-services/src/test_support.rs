//! Tracing capture for tests
//!
//! Records span fields and event messages emitted on the current thread
//! while the guard returned by [`CapturingLayer::install`] is alive.

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id};
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

#[derive(Debug, Clone)]
pub struct CapturedSpan {
    pub name: String,
    pub fields: Vec<(String, String)>,
}

impl CapturedSpan {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: Level,
    pub message: String,
}

#[derive(Clone, Default)]
pub struct CapturingLayer {
    spans: Arc<Mutex<Vec<CapturedSpan>>>,
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl CapturingLayer {
    /// Make this layer the thread's default subscriber until the guard drops
    pub fn install(&self) -> DefaultGuard {
        tracing::subscriber::set_default(tracing_subscriber::registry().with(self.clone()))
    }

    /// First span opened with `name`
    pub fn span(&self, name: &str) -> Option<CapturedSpan> {
        self.spans.lock().iter().find(|span| span.name == name).cloned()
    }

    pub fn messages_at(&self, level: Level) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter(|event| event.level == level)
            .map(|event| event.message.clone())
            .collect()
    }
}

#[derive(Default)]
struct FieldRecorder(Vec<(String, String)>);

impl Visit for FieldRecorder {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{:?}", value)));
    }
}

impl<S: Subscriber> Layer<S> for CapturingLayer {
    fn on_new_span(&self, attrs: &Attributes<'_>, _id: &Id, _ctx: Context<'_, S>) {
        let mut recorder = FieldRecorder::default();
        attrs.record(&mut recorder);
        self.spans.lock().push(CapturedSpan {
            name: attrs.metadata().name().to_string(),
            fields: recorder.0,
        });
    }

    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut recorder = FieldRecorder::default();
        event.record(&mut recorder);
        let message = recorder
            .0
            .into_iter()
            .find(|(field, _)| field == "message")
            .map(|(_, value)| value)
            .unwrap_or_default();
        self.events.lock().push(CapturedEvent {
            level: *event.metadata().level(),
            message,
        });
    }
}
