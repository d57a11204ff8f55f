//! Bridge between the `tracing` ecosystem and a [`Logger`].
//!
//! The [`LoggerLayer`] subscriber layer forwards `tracing` events into a
//! pipeline, so crates instrumented with the standard `tracing` macros show
//! up in the same stream, with the same filtering, coloring, and repeat
//! handling, as direct log calls.
//!
//! # Usage
//!
//! ```rust,ignore
//! use termlog::{init_tracing, Logger};
//!
//! init_tracing(Logger::global()).expect("no other subscriber installed");
//! tracing::warn!(target: "net", "peer disconnected");
//! ```

use std::fmt::{self, Write};

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context as LayerContext, Layer};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::TryInitError;

use crate::context::Context;
use crate::level::Level;
use crate::logger::Logger;

/// A `tracing-subscriber` layer that forwards events into a [`Logger`].
///
/// The event target becomes the log [`Context`] name, and the `tracing`
/// level maps onto the nearest pipeline level. Fields other than `message`
/// are appended as `key=value` pairs.
pub struct LoggerLayer {
    logger: &'static Logger,
}

impl LoggerLayer {
    /// Creates a layer forwarding into the given pipeline.
    #[must_use]
    pub const fn new(logger: &'static Logger) -> Self {
        Self { logger }
    }

    fn map_level(level: &tracing::Level) -> Level {
        if *level == tracing::Level::ERROR {
            Level::ERROR
        } else if *level == tracing::Level::WARN {
            Level::WARNING
        } else if *level == tracing::Level::INFO {
            Level::INFO
        } else if *level == tracing::Level::DEBUG {
            Level::DEBUG
        } else {
            Level::TRACE
        }
    }
}

impl<S> Layer<S> for LoggerLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: LayerContext<'_, S>) {
        let level = Self::map_level(event.metadata().level());
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let context = Context::new(event.metadata().target());
        self.logger
            .log(Some(&context), level, format_args!("{}\n", visitor.rendered));
    }
}

/// Collects an event's fields into one message string.
#[derive(Default)]
struct MessageVisitor {
    rendered: String,
}

impl MessageVisitor {
    fn separate(&mut self) {
        if !self.rendered.is_empty() {
            self.rendered.push(' ');
        }
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.rendered.push_str(value);
        } else {
            self.separate();
            let _ = write!(self.rendered, "{}={value}", field.name());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.rendered, "{value:?}");
        } else {
            self.separate();
            let _ = write!(self.rendered, "{}={value:?}", field.name());
        }
    }
}

/// Installs a [`LoggerLayer`] over the given pipeline as the global
/// `tracing` subscriber.
///
/// Fails if another global subscriber is already installed.
pub fn init_tracing(logger: &'static Logger) -> Result<(), TryInitError> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(LoggerLayer::new(logger))
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracing_levels_map_onto_the_scale() {
        assert_eq!(LoggerLayer::map_level(&tracing::Level::ERROR), Level::ERROR);
        assert_eq!(LoggerLayer::map_level(&tracing::Level::WARN), Level::WARNING);
        assert_eq!(LoggerLayer::map_level(&tracing::Level::INFO), Level::INFO);
        assert_eq!(LoggerLayer::map_level(&tracing::Level::DEBUG), Level::DEBUG);
        assert_eq!(LoggerLayer::map_level(&tracing::Level::TRACE), Level::TRACE);
    }

    #[test]
    fn visitor_places_message_first_and_fields_after() {
        let mut visitor = MessageVisitor::default();
        // exercise the formatting directly; a full dispatch test would need a
        // global subscriber, which tests must not install
        visitor.rendered.push_str("connection lost");
        visitor.separate();
        let _ = write!(visitor.rendered, "{}={}", "peer", "10.0.0.2");
        assert_eq!(visitor.rendered, "connection lost peer=10.0.0.2");
    }
}
