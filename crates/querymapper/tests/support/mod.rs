//! Scripted backend for exercising the execution protocol without a
//! database.
//!
//! The driver replays a queue of prepared outcomes and records every call
//! it sees, so tests can assert both the result a caller observes and the
//! exact begin/execute/commit/rollback sequence that produced it.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use querymapper::{
    ConnectParams, Connection, Dialect, Driver, MapperError, MapperResult, QueryOutcome, Value,
};

/// One scripted reply to an `execute` call.
pub enum Reply {
    Outcome(QueryOutcome),
    Failure(&'static str),
}

#[derive(Default)]
pub struct Recorded {
    pub events: Vec<String>,
    pub bindings_seen: Vec<Vec<Value>>,
    pub replies: VecDeque<Reply>,
}

pub struct ScriptedDriver {
    dialect: Dialect,
    available: bool,
    connect_failure: Option<&'static str>,
    shared: Arc<Mutex<Recorded>>,
}

impl ScriptedDriver {
    pub fn new(dialect: Dialect) -> (Self, Arc<Mutex<Recorded>>) {
        let shared = Arc::new(Mutex::new(Recorded::default()));
        (
            Self {
                dialect,
                available: true,
                connect_failure: None,
                shared: Arc::clone(&shared),
            },
            shared,
        )
    }

    pub fn unavailable(dialect: Dialect) -> Self {
        let (mut driver, _) = Self::new(dialect);
        driver.available = false;
        driver
    }

    /// A driver whose backend refuses every connection attempt.
    pub fn failing_connect(dialect: Dialect, message: &'static str) -> Self {
        let (mut driver, _) = Self::new(dialect);
        driver.connect_failure = Some(message);
        driver
    }
}

impl Driver for ScriptedDriver {
    type Conn = ScriptedConnection;

    fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn is_available(&self) -> bool {
        self.available
    }

    async fn connect(&self, params: &ConnectParams) -> MapperResult<Self::Conn> {
        if let Some(message) = self.connect_failure {
            // Any non-preflight variant stands in for a backend refusal.
            return Err(MapperError::ColumnMissing(message.to_string()));
        }
        let mut recorded = lock(&self.shared);
        recorded.events.push(format!("connect:{}", params.dsn));
        Ok(ScriptedConnection {
            shared: Arc::clone(&self.shared),
            in_transaction: false,
        })
    }
}

pub struct ScriptedConnection {
    shared: Arc<Mutex<Recorded>>,
    in_transaction: bool,
}

impl Connection for ScriptedConnection {
    async fn begin(&mut self) -> MapperResult<()> {
        lock(&self.shared).events.push("begin".to_string());
        self.in_transaction = true;
        Ok(())
    }

    async fn execute(&mut self, sql: &str, bindings: &[Value]) -> MapperResult<QueryOutcome> {
        let mut recorded = lock(&self.shared);
        recorded.events.push(format!("execute:{sql}"));
        recorded.bindings_seen.push(bindings.to_vec());
        match recorded.replies.pop_front() {
            Some(Reply::Outcome(outcome)) => Ok(outcome),
            Some(Reply::Failure(message)) => Err(MapperError::builder(message)),
            None => Ok(QueryOutcome::default()),
        }
    }

    async fn commit(&mut self) -> MapperResult<()> {
        lock(&self.shared).events.push("commit".to_string());
        self.in_transaction = false;
        Ok(())
    }

    async fn rollback(&mut self) -> MapperResult<()> {
        lock(&self.shared).events.push("rollback".to_string());
        self.in_transaction = false;
        Ok(())
    }

    fn in_transaction(&self) -> bool {
        self.in_transaction
    }
}

fn lock(shared: &Arc<Mutex<Recorded>>) -> std::sync::MutexGuard<'_, Recorded> {
    match shared.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

pub fn events(shared: &Arc<Mutex<Recorded>>) -> Vec<String> {
    lock(shared).events.clone()
}

pub fn bindings_seen(shared: &Arc<Mutex<Recorded>>) -> Vec<Vec<Value>> {
    lock(shared).bindings_seen.clone()
}

pub fn push_reply(shared: &Arc<Mutex<Recorded>>, reply: Reply) {
    lock(shared).replies.push_back(reply);
}

/// Minimal subscriber that collects every event's message text, so tests
/// can assert on what the crate logs.
pub struct CapturingSubscriber {
    messages: Arc<Mutex<Vec<String>>>,
}

impl CapturingSubscriber {
    pub fn new() -> (Self, Arc<Mutex<Vec<String>>>) {
        let messages = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                messages: Arc::clone(&messages),
            },
            messages,
        )
    }
}

impl tracing::Subscriber for CapturingSubscriber {
    fn enabled(&self, _metadata: &tracing::Metadata<'_>) -> bool {
        true
    }

    fn new_span(&self, _attributes: &tracing::span::Attributes<'_>) -> tracing::span::Id {
        tracing::span::Id::from_u64(1)
    }

    fn record(&self, _span: &tracing::span::Id, _values: &tracing::span::Record<'_>) {}

    fn record_follows_from(&self, _span: &tracing::span::Id, _follows: &tracing::span::Id) {}

    fn event(&self, event: &tracing::Event<'_>) {
        struct MessageVisitor(String);

        impl tracing::field::Visit for MessageVisitor {
            fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
                if field.name() == "message" {
                    use std::fmt::Write;
                    let _ = write!(self.0, "{value:?}");
                }
            }
        }

        let mut visitor = MessageVisitor(String::new());
        event.record(&mut visitor);
        match self.messages.lock() {
            Ok(mut messages) => messages.push(visitor.0),
            Err(poisoned) => poisoned.into_inner().push(visitor.0),
        }
    }

    fn enter(&self, _span: &tracing::span::Id) {}

    fn exit(&self, _span: &tracing::span::Id) {}
}

pub fn captured(messages: &Arc<Mutex<Vec<String>>>) -> Vec<String> {
    match messages.lock() {
        Ok(messages) => messages.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}
