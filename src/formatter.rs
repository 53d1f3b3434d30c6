//! Log line formatter that stamps every event with the wall clock and the simulation tick.
//!
//! Output looks like `12:04:55.01234 t=000142  INFO contra::game: message key=value`, which makes it
//! easy to line up log output with a specific frame when chasing collision bugs.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use time::format_description::FormatItem;
use time::macros::format_description;
use time::OffsetDateTime;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, FormattedFields};
use tracing_subscriber::registry::LookupSpan;

static TICKS: AtomicU64 = AtomicU64::new(0);

#[cfg(target_os = "emscripten")]
const CLOCK: &[FormatItem<'static>] = format_description!("[hour]:[minute]:[second].[subsecond digits:3]");

#[cfg(not(target_os = "emscripten"))]
const CLOCK: &[FormatItem<'static>] = format_description!("[hour]:[minute]:[second].[subsecond digits:5]");

const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Formats events as `time tick level spans target: fields`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TickFormatter;

impl<S, N> FormatEvent<S, N> for TickFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(&self, ctx: &FmtContext<'_, S, N>, mut writer: Writer<'_>, event: &Event<'_>) -> fmt::Result {
        let meta = event.metadata();
        let ansi = writer.has_ansi_escapes();

        let clock = OffsetDateTime::now_utc().format(&CLOCK).map_err(|_| fmt::Error)?;
        styled(&mut writer, ansi, DIM, format_args!("{clock} t={:06}", tick_count() % 1_000_000))?;
        writer.write_char(' ')?;

        let (color, label) = level_style(meta.level());
        styled(&mut writer, ansi, color, format_args!("{label:>5}"))?;
        writer.write_char(' ')?;

        if let Some(scope) = ctx.event_scope() {
            let mut any = false;
            for span in scope.from_root() {
                styled(&mut writer, ansi, BOLD, format_args!("{}", span.metadata().name()))?;
                let extensions = span.extensions();
                if let Some(fields) = extensions.get::<FormattedFields<N>>().filter(|f| !f.is_empty()) {
                    write!(writer, "{{{fields}}}")?;
                }
                writer.write_char(':')?;
                any = true;
            }
            if any {
                writer.write_char(' ')?;
            }
        }

        styled(&mut writer, ansi, DIM, format_args!("{}:", meta.target()))?;
        writer.write_char(' ')?;
        ctx.format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn level_style(level: &Level) -> (&'static str, &'static str) {
    match *level {
        Level::TRACE => ("\x1b[35m", "TRACE"),
        Level::DEBUG => ("\x1b[34m", "DEBUG"),
        Level::INFO => ("\x1b[32m", "INFO"),
        Level::WARN => ("\x1b[33m", "WARN"),
        Level::ERROR => ("\x1b[31m", "ERROR"),
    }
}

fn styled(writer: &mut Writer<'_>, ansi: bool, style: &str, text: fmt::Arguments<'_>) -> fmt::Result {
    if ansi {
        write!(writer, "{style}{text}{RESET}")
    } else {
        writer.write_fmt(text)
    }
}

/// Advances the tick shown in log lines. Called once per simulated frame.
pub fn increment_tick() {
    TICKS.fetch_add(1, Ordering::Relaxed);
}

pub fn tick_count() -> u64 {
    TICKS.load(Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_only_move_forward() {
        let before = tick_count();
        increment_tick();
        increment_tick();
        assert!(tick_count() >= before + 2);
    }
}
