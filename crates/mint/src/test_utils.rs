//! Call tracing for engine tests.
//!
//! [`CallTrace`] records every span an engine entry point opens, in creation
//! order, along with the events logged inside it. Tests use it to check both
//! the fields a call carries and the reason a rejected call logged. Span ids
//! are reused once a span closes, so they only index calls that are live.

use parking_lot::Mutex;
use std::{collections::HashMap, fmt, sync::Arc};
use tracing::{
    field::{Field, Visit},
    span::{Attributes, Id, Record},
    subscriber::{set_default, DefaultGuard},
    Event, Subscriber,
};
use tracing_subscriber::{
    layer::{Context, SubscriberExt},
    registry::LookupSpan,
    Layer,
};

type Fields = Vec<(String, String)>;

/// One engine call: its span name, fields and the events logged inside it.
#[derive(Debug, Clone, Default)]
pub(crate) struct CallRecord {
    pub(crate) name: String,
    pub(crate) fields: Fields,
    pub(crate) events: Vec<Fields>,
}

impl CallRecord {
    pub(crate) fn field(&self, name: &str) -> Option<&str> {
        lookup(&self.fields, name)
    }

    /// `err` field of the first event logged with `message`.
    pub(crate) fn logged_error(&self, message: &str) -> Option<&str> {
        self.events
            .iter()
            .find(|fields| lookup(fields, "message") == Some(message))
            .and_then(|fields| lookup(fields, "err"))
    }
}

fn lookup<'a>(fields: &'a Fields, name: &str) -> Option<&'a str> {
    fields.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
}

#[derive(Default)]
struct FieldVisitor(Fields);

impl FieldVisitor {
    fn push(&mut self, field: &Field, value: String) {
        self.0.push((field.name().to_string(), value));
    }
}

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.push(field, format!("{value:?}"));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.push(field, value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.push(field, value.to_string());
    }
}

#[derive(Debug, Default)]
struct Calls {
    records: Vec<CallRecord>,
    live: HashMap<u64, usize>,
}

impl Calls {
    fn get_mut(&mut self, id: &Id) -> Option<&mut CallRecord> {
        let index = *self.live.get(&id.into_u64())?;
        self.records.get_mut(index)
    }
}

/// Layer collecting [`CallRecord`]s in span creation order.
#[derive(Debug, Clone, Default)]
pub(crate) struct CallTrace {
    calls: Arc<Mutex<Calls>>,
}

impl CallTrace {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Installs the trace as the thread default until the guard drops.
    pub(crate) fn as_default(&self) -> DefaultGuard {
        set_default(tracing_subscriber::registry().with(self.clone()))
    }

    /// Every recorded call named `name`, oldest first.
    pub(crate) fn calls(&self, name: &str) -> Vec<CallRecord> {
        self.calls.lock().records.iter().filter(|call| call.name == name).cloned().collect()
    }

    /// Most recent call named `name`.
    pub(crate) fn last_call(&self, name: &str) -> Option<CallRecord> {
        self.calls(name).pop()
    }
}

impl<S> Layer<S> for CallTrace
where
    S: Subscriber + for<'lookup> LookupSpan<'lookup>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        attrs.record(&mut visitor);
        let mut calls = self.calls.lock();
        let index = calls.records.len();
        calls.records.push(CallRecord {
            name: attrs.metadata().name().to_string(),
            fields: visitor.0,
            events: Vec::new(),
        });
        calls.live.insert(id.into_u64(), index);
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        values.record(&mut visitor);
        if let Some(call) = self.calls.lock().get_mut(id) {
            call.fields.extend(visitor.0);
        }
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let Some(span) = ctx.event_span(event) else { return };
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        if let Some(call) = self.calls.lock().get_mut(&span.id()) {
            call.events.push(visitor.0);
        }
    }

    fn on_close(&self, id: Id, _ctx: Context<'_, S>) {
        self.calls.lock().live.remove(&id.into_u64());
    }
}
