//! Captures spans and events emitted while a closure runs.
//!
//! Fields are stored as display strings so assertions stay independent of
//! the numeric type a call site happened to record.

use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, Mutex, PoisonError},
};

use tracing::{
    Event, Level, Subscriber,
    field::{Field, Visit},
    span::{Attributes, Id, Record},
};
use tracing_subscriber::{
    Layer,
    layer::{Context, SubscriberExt},
    registry::LookupSpan,
};

/// Layer that keeps every closed span and every event in memory.
#[derive(Clone, Default)]
pub struct RecordingLayer {
    spans: Arc<Mutex<Vec<SpanRecord>>>,
    events: Arc<Mutex<Vec<EventRecord>>>,
}

impl RecordingLayer {
    /// Closed spans in completion order.
    ///
    /// # Examples
    /// ```
    /// use whispers_test_support::tracing::RecordingLayer;
    ///
    /// let layer = RecordingLayer::default();
    /// assert!(layer.spans().is_empty());
    /// ```
    #[must_use]
    pub fn spans(&self) -> Vec<SpanRecord> {
        self.spans
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Events in emission order.
    #[must_use]
    pub fn events(&self) -> Vec<EventRecord> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the first closed span called `name`.
    #[must_use]
    pub fn span_named(&self, name: &str) -> Option<SpanRecord> {
        self.spans().into_iter().find(|span| span.name == name)
    }

    /// Returns the first event at `level` whose message equals `message`.
    #[must_use]
    pub fn event_with_message(&self, level: Level, message: &str) -> Option<EventRecord> {
        self.events()
            .into_iter()
            .find(|event| event.level == level && event.message() == Some(message))
    }
}

/// Runs `f` with a fresh [`RecordingLayer`] installed as the thread's default
/// subscriber and returns its output alongside the layer.
///
/// # Examples
/// ```
/// use whispers_test_support::tracing::record;
///
/// let (value, layer) = record(|| {
///     tracing::info!(answer = 42, "computed");
///     7
/// });
/// assert_eq!(value, 7);
/// let event = layer
///     .event_with_message(tracing::Level::INFO, "computed")
///     .expect("event recorded");
/// assert_eq!(event.field("answer"), Some("42"));
/// ```
pub fn record<R>(f: impl FnOnce() -> R) -> (R, RecordingLayer) {
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    let output = tracing::subscriber::with_default(subscriber, f);
    (output, layer)
}

/// A closed span with the fields recorded on it over its lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanRecord {
    /// Span name from its metadata.
    pub name: String,
    /// Field values keyed by field name.
    pub fields: HashMap<String, String>,
}

impl SpanRecord {
    #[rustfmt::skip]
    /// Returns the recorded value of `name`.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> { self.fields.get(name).map(String::as_str) }
}

/// An emitted event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    /// Event level.
    pub level: Level,
    /// Event target, usually the emitting module path.
    pub target: String,
    /// Field values keyed by field name; the message is stored as `message`.
    pub fields: HashMap<String, String>,
}

impl EventRecord {
    #[rustfmt::skip]
    /// Returns the recorded value of `name`.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> { self.fields.get(name).map(String::as_str) }

    #[rustfmt::skip]
    /// Returns the formatted event message.
    #[must_use]
    pub fn message(&self) -> Option<&str> { self.field("message") }
}

struct OpenSpan {
    name: String,
    fields: HashMap<String, String>,
}

impl<S> Layer<S> for RecordingLayer
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut open = OpenSpan {
            name: attrs.metadata().name().to_owned(),
            fields: HashMap::new(),
        };
        attrs.record(&mut FieldRecorder(&mut open.fields));
        span.extensions_mut().insert(open);
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        if let Some(open) = span.extensions_mut().get_mut::<OpenSpan>() {
            values.record(&mut FieldRecorder(&mut open.fields));
        }
    }

    fn on_close(&self, id: Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(&id) else {
            return;
        };
        let Some(open) = span.extensions_mut().remove::<OpenSpan>() else {
            return;
        };
        self.spans
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(SpanRecord {
                name: open.name,
                fields: open.fields,
            });
    }

    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = HashMap::new();
        event.record(&mut FieldRecorder(&mut fields));
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(EventRecord {
                level: *event.metadata().level(),
                target: event.metadata().target().to_owned(),
                fields,
            });
    }
}

struct FieldRecorder<'a>(&'a mut HashMap<String, String>);

impl FieldRecorder<'_> {
    fn insert(&mut self, field: &Field, value: impl ToString) {
        self.0.insert(field.name().to_owned(), value.to_string());
    }
}

impl Visit for FieldRecorder<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert(field, value);
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, value);
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, value);
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, value);
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.insert(field, value);
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.insert(field, value);
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.insert(field, format!("{value:?}"));
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use tracing::{Level, info_span, warn};

    use super::record;

    #[rstest]
    fn span_fields_include_late_records() {
        let ((), layer) = record(|| {
            let span = info_span!("outer", nodes = tracing::field::Empty, edges = 3_u64);
            span.record("nodes", 5_usize);
        });

        let span = layer.span_named("outer").expect("span closed");
        assert_eq!(span.field("edges"), Some("3"));
        assert_eq!(span.field("nodes"), Some("5"));
    }

    #[rstest]
    fn events_keep_level_and_message() {
        let ((), layer) = record(|| warn!(flag = true, "careful"));

        let event = layer
            .event_with_message(Level::WARN, "careful")
            .expect("warning recorded");
        assert_eq!(event.field("flag"), Some("true"));
        assert!(layer.event_with_message(Level::INFO, "careful").is_none());
    }

    #[rstest]
    fn recordings_are_isolated_per_call() {
        let ((), first) = record(|| warn!("one"));
        let ((), second) = record(|| ());
        assert_eq!(first.events().len(), 1);
        assert!(second.events().is_empty());
    }
}
