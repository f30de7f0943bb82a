use anyhow::Result;
use claimcheck_actors::{builder::Builder, check::CheckActor};
use claimcheck_client::ClaimBackend;
use claimcheck_tui::{TuiActor, spawn_tui_feeders};
use std::sync::Arc;

const CHECK_MAILBOX: usize = 16;
const TUI_MAILBOX: usize = 1024;

/// Owns the actor graph for the interactive UI.
pub struct Tether {
    builder: Builder,
}

impl Tether {
    pub fn new() -> Self {
        Self {
            builder: Builder::new(),
        }
    }

    pub async fn run(self) -> Result<()> {
        self.builder.run_until_ctrl_c().await
    }
}

pub fn build_interactive(tether: &mut Tether, backend: Arc<dyn ClaimBackend>) -> Result<()> {
    let b = &mut tether.builder;
    let location = backend.location();

    b.spawn("check", CHECK_MAILBOX, CheckActor::new(backend));
    let check = b
        .addr::<CheckActor>("check")
        .ok_or_else(|| anyhow::anyhow!("check actor was not published"))?;

    let tui_reserved = b.reserve::<TuiActor>("tui", TUI_MAILBOX);
    let shutdown = b.shutdown_handle();
    spawn_tui_feeders(tui_reserved.addr(), shutdown.clone());

    let tui = TuiActor::new(check, location, shutdown)?;
    b.start_reserved(tui_reserved, tui);
    Ok(())
}
