//! Event formatters for the server's log output: a colored line format for development and a
//! flat JSON object per event for release deployments.
use serde_json::{Map, Value};
use std::fmt;
use time::macros::format_description;
use time::{format_description::FormatItem, OffsetDateTime};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, FormattedFields};
use tracing_subscriber::registry::LookupSpan;
use yansi::{Paint, Painted};

const TIMESTAMP_FORMAT: &[FormatItem<'static>] = format_description!("[hour]:[minute]:[second].[subsecond digits:5]");

/// `HH:MM:SS.sssss LEVEL span{fields}: target: message fields`
pub struct PrettyFormatter;

impl<S, N> FormatEvent<S, N> for PrettyFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(&self, ctx: &FmtContext<'_, S, N>, mut writer: Writer<'_>, event: &Event<'_>) -> fmt::Result {
        let meta = event.metadata();
        let ansi = writer.has_ansi_escapes();

        let timestamp = OffsetDateTime::now_utc()
            .format(&TIMESTAMP_FORMAT)
            .map_err(|_| fmt::Error)?;
        if ansi {
            write!(writer, "{} {} ", timestamp.dim(), paint_level(meta.level()))?;
        } else {
            write!(writer, "{} {:>5} ", timestamp, meta.level())?;
        }

        if let Some(scope) = ctx.event_scope() {
            for span in scope.from_root() {
                write!(writer, "{}", span.metadata().name())?;
                if let Some(fields) = span.extensions().get::<FormattedFields<N>>() {
                    if !fields.fields.is_empty() {
                        write!(writer, "{{{}}}", fields.fields)?;
                    }
                }
                writer.write_str(": ")?;
            }
        }

        if ansi {
            write!(writer, "{}: ", meta.target().dim())?;
        } else {
            write!(writer, "{}: ", meta.target())?;
        }
        ctx.format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn paint_level(level: &Level) -> Painted<&'static str> {
    match *level {
        Level::TRACE => Painted::new("TRACE").magenta(),
        Level::DEBUG => Painted::new("DEBUG").blue(),
        Level::INFO => Painted::new(" INFO").green(),
        Level::WARN => Painted::new(" WARN").yellow(),
        Level::ERROR => Painted::new("ERROR").red(),
    }
}

/// Collects an event's fields into a JSON map, pulling `message` out separately.
#[derive(Default)]
struct JsonVisitor {
    message: Option<String>,
    fields: Map<String, Value>,
}

impl JsonVisitor {
    fn insert(&mut self, field: &Field, value: Value) {
        if field.name() == "message" {
            self.message = Some(match value {
                Value::String(text) => text,
                other => other.to_string(),
            });
        } else {
            self.fields.insert(field.name().to_string(), value);
        }
    }
}

impl Visit for JsonVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.insert(field, Value::String(format!("{value:?}")));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert(field, Value::String(value.to_string()));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.insert(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, Value::Bool(value));
    }
}

/// One JSON object per line: `message`, `level`, `target`, the event's fields at the root and
/// each enclosing span as a nested object keyed by its name.
pub struct JsonFormatter;

impl<S, N> FormatEvent<S, N> for JsonFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(&self, ctx: &FmtContext<'_, S, N>, mut writer: Writer<'_>, event: &Event<'_>) -> fmt::Result {
        let meta = event.metadata();
        let mut visitor = JsonVisitor::default();
        event.record(&mut visitor);

        let mut object = Map::new();
        object.insert("message".into(), Value::String(visitor.message.unwrap_or_default()));
        object.insert("level".into(), Value::String(meta.level().to_string()));
        object.insert("target".into(), Value::String(meta.target().to_string()));

        if let Some(scope) = ctx.event_scope() {
            for span in scope.from_root() {
                let fields = span
                    .extensions()
                    .get::<FormattedFields<N>>()
                    .map(|formatted| {
                        serde_json::from_str::<Map<String, Value>>(formatted.fields.as_str()).unwrap_or_else(|_| {
                            let mut raw = Map::new();
                            raw.insert("raw".into(), Value::String(formatted.fields.to_string()));
                            raw
                        })
                    })
                    .unwrap_or_default();
                object.insert(span.metadata().name().to_string(), Value::Object(fields));
            }
        }
        object.extend(visitor.fields);

        writeln!(writer, "{}", Value::Object(object))
    }
}
