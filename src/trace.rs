//! Trace Module
//!
//! Cross-cutting call instrumentation: invocation counting, input/output
//! history recording, and replay of recorded history. Counting and history
//! are independent wrappers keyed by a stable operation name, composable
//! around any store-backed operation.

use std::fmt;
use std::future::Future;

use crate::backend::Backend;
use crate::error::Result;

// == Operation ==
/// Stable identity of an instrumented operation.
///
/// The name doubles as the counter key; the history lists live under the
/// name suffixed with `:inputs` and `:outputs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    name: &'static str,
}

impl Operation {
    /// Creates an operation identity from its qualified name, e.g. `Cache::store`.
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }

    /// The operation's qualified name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Key of the invocation counter.
    pub fn counter_key(&self) -> &'static str {
        self.name
    }

    /// Key of the recorded-inputs list.
    pub fn inputs_key(&self) -> String {
        format!("{}:inputs", self.name)
    }

    /// Key of the recorded-outputs list.
    pub fn outputs_key(&self) -> String {
        format!("{}:outputs", self.name)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

// == Count Calls ==
/// Increments the operation's invocation counter, then runs the wrapped call.
///
/// The counter is bumped before the call executes, so a failing call still
/// counts as an invocation.
pub async fn count_calls<B, F, T>(backend: &B, op: &Operation, call: F) -> Result<T>
where
    B: Backend,
    F: Future<Output = Result<T>>,
{
    backend.incr(op.counter_key()).await?;
    call.await
}

// == With History ==
/// Records the call's input and output around the wrapped call.
///
/// The input is appended strictly before the call executes and the output
/// strictly after it returns. If the call fails, the error propagates and
/// no output is appended, leaving the lists unequal in length. The two
/// appends are separate store round-trips, not a transaction.
pub async fn with_history<B, F, T>(backend: &B, op: &Operation, input: &str, call: F) -> Result<T>
where
    B: Backend,
    F: Future<Output = Result<T>>,
    T: fmt::Display,
{
    backend.rpush(&op.inputs_key(), input).await?;
    let output = call.await?;
    backend.rpush(&op.outputs_key(), &output.to_string()).await?;
    Ok(output)
}

// == Replay ==
/// Renders the operation's recorded history as a human-readable report.
///
/// One header line with the call count (the length of the input list),
/// then one line per call pairing input *i* with output *i*. Read-only;
/// counters and history are left untouched. Entries without a counterpart
/// in the other list are omitted from the pairing.
pub async fn replay<B: Backend>(backend: &B, op: &Operation) -> Result<String> {
    let inputs = backend.lrange(&op.inputs_key(), 0, -1).await?;
    let outputs = backend.lrange(&op.outputs_key(), 0, -1).await?;

    let mut report = format!("{} was called {} times:\n", op.name(), inputs.len());
    for (input, output) in inputs.iter().zip(outputs.iter()) {
        report.push_str(&format!("{}({}) -> {}\n", op.name(), input, output));
    }

    Ok(report)
}
