//! Executor contract
//!
//! Executors live outside this crate. They receive slot-filled arguments and
//! an opaque, caller-supplied context (a connection or storage handle) that
//! the dispatcher never inspects or constructs.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::types::ExecutorSignature;

/// A named task handler
#[async_trait]
pub trait IntentExecutor<C>: Send + Sync {
    /// Static call signature; `signature().name` must equal the intent name.
    fn signature(&self) -> ExecutorSignature;

    /// Run the task with the extracted arguments.
    async fn execute(
        &self,
        arguments: HashMap<String, String>,
        context: &C,
    ) -> anyhow::Result<serde_json::Value>;
}
