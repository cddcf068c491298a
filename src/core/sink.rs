//! Sink trait for message destinations

use super::{error::Result, message::Message};

/// A destination for dispatched messages.
///
/// Sinks run on the worker thread, one message at a time, in registration
/// order. Errors and panics stay inside the sink: the worker reports and
/// counts them but never retries or stops.
pub trait Sink: Send {
    fn receive(&mut self, message: &Message) -> Result<()>;

    /// Called when the queue runs dry and at shutdown
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str;
}

/// A handler object paired with the method that consumes messages.
///
/// ```
/// use rust_logworker::core::{CallbackSink, Message};
///
/// struct Counter { seen: usize }
/// impl Counter {
///     fn on_message(&mut self, _message: &Message) { self.seen += 1; }
/// }
///
/// let sink = CallbackSink::new("counter", Counter { seen: 0 }, Counter::on_message);
/// ```
pub struct CallbackSink<T> {
    name: String,
    handler: T,
    callback: fn(&mut T, &Message),
}

impl<T: Send> CallbackSink<T> {
    pub fn new(name: impl Into<String>, handler: T, callback: fn(&mut T, &Message)) -> Self {
        Self {
            name: name.into(),
            handler,
            callback,
        }
    }

    pub fn handler(&self) -> &T {
        &self.handler
    }
}

impl<T: Send> Sink for CallbackSink<T> {
    fn receive(&mut self, message: &Message) -> Result<()> {
        (self.callback)(&mut self.handler, message);
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Closure sink
pub struct FnSink<F> {
    name: String,
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(&Message) + Send,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> Sink for FnSink<F>
where
    F: FnMut(&Message) + Send,
{
    fn receive(&mut self, message: &Message) -> Result<()> {
        (self.f)(message);
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LogLevel;

    struct Collector {
        texts: Vec<String>,
    }

    impl Collector {
        fn collect(&mut self, message: &Message) {
            self.texts.push(message.text().to_string());
        }
    }

    #[test]
    fn test_callback_sink_invokes_method() {
        let mut sink = CallbackSink::new("collector", Collector { texts: Vec::new() }, Collector::collect);
        sink.receive(&Message::new(LogLevel::Info, "one")).unwrap();
        sink.receive(&Message::new(LogLevel::Info, "two")).unwrap();

        assert_eq!(sink.handler().texts, vec!["one", "two"]);
        assert_eq!(sink.name(), "collector");
    }

    #[test]
    fn test_fn_sink() {
        let mut count = 0;
        {
            let mut sink = FnSink::new("count", |_: &Message| count += 1);
            sink.receive(&Message::new(LogLevel::Debug, "x")).unwrap();
            assert!(sink.flush().is_ok());
        }
        assert_eq!(count, 1);
    }
}
