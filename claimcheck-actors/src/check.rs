use crate::actor::{Actor, Context};
use crate::CheckCmd;
use anyhow::Result;
use claimcheck_client::ClaimBackend;
use std::sync::Arc;

/// Runs claim checks against a backend, one task per request so the
/// mailbox never waits on the network.
pub struct CheckActor {
    backend: Arc<dyn ClaimBackend>,
}

impl CheckActor {
    pub fn new(backend: Arc<dyn ClaimBackend>) -> Self {
        Self { backend }
    }

    pub fn location(&self) -> String {
        self.backend.location()
    }
}

#[async_trait::async_trait]
impl Actor for CheckActor {
    type Msg = CheckCmd;

    async fn handle(&mut self, msg: Self::Msg, _ctx: &mut Context<Self>) -> Result<()> {
        let CheckCmd { request, reply } = msg;
        let backend = Arc::clone(&self.backend);
        tokio::spawn(async move {
            let outcome = backend.check(&request).await;
            if reply.send(outcome).is_err() {
                tracing::debug!(target: "claimcheck-actors", "check.reply_dropped");
            }
        });
        Ok(())
    }
}
