use crate::actor::{
    spawn_actor_reserved, spawn_actor_with_shutdown, Actor, ActorHandle, Addr, Reserved,
};
use crate::system::{ActorSystem, ShutdownHandle};
use anyhow::Result;
use std::collections::HashMap;

/// Wires actors together and owns their lifetimes.
pub struct Builder {
    sys: ActorSystem,
    // Concrete addresses by name for easy wiring.
    addrs: HashMap<String, Box<dyn std::any::Any + Send + Sync>>,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    pub fn new() -> Self {
        Self {
            sys: ActorSystem::new(),
            addrs: HashMap::new(),
        }
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.sys.shutdown_handle()
    }

    /// Reserve an actor and publish its `Addr` under `name`.
    pub fn reserve<A>(&mut self, name: &str, mailbox: usize) -> Reserved<A>
    where
        A: Actor,
        Addr<A>: Send + Sync,
    {
        let r = spawn_actor_reserved::<A>(name, mailbox);
        self.addrs.insert(name.to_string(), Box::new(r.addr()));
        r
    }

    /// Start a previously reserved actor and track its task.
    pub fn start_reserved<A>(&mut self, r: Reserved<A>, actor: A) -> &mut Self
    where
        A: Actor,
    {
        let name = r.name().to_string();
        let shutdown_rx = self.sys.shutdown_notifier();
        let h = r.start_with_shutdown(actor, Some(shutdown_rx));
        self.track(name, h);
        self
    }

    /// Spawn an actor and publish its `Addr` under `name`.
    pub fn spawn<A>(&mut self, name: &str, mailbox: usize, actor: A) -> &mut Self
    where
        A: Actor,
        Addr<A>: Send + Sync,
    {
        let shutdown_rx = self.sys.shutdown_notifier();
        let h: ActorHandle<A> = spawn_actor_with_shutdown(actor, mailbox, Some(shutdown_rx));
        self.addrs.insert(name.to_string(), Box::new(h.addr.clone()));
        self.track(name.to_string(), h);
        self
    }

    fn track<A: Actor>(&mut self, name: String, h: ActorHandle<A>) {
        tracing::debug!(actor = %name, "actor.started");
        self.sys.track(async move {
            h.task.await??;
            tracing::debug!(actor = %name, "actor.stopped");
            Ok(())
        });
    }

    /// Get a typed address by name for wiring.
    pub fn addr<A: Actor>(&self, name: &str) -> Option<Addr<A>> {
        self.addrs
            .get(name)
            .and_then(|b| b.downcast_ref::<Addr<A>>().cloned())
    }

    /// Block until CTRL-C or a shutdown signal, then shut everything down.
    ///
    /// Subscribes before returning, so a signal sent after this call is
    /// never missed.
    pub fn run_until_ctrl_c(self) -> impl std::future::Future<Output = Result<()>> {
        let mut shutdown_rx = self.sys.shutdown_notifier();
        let Self { sys, addrs } = self;
        async move {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("ctrl-c received; shutting down");
                }
                _ = shutdown_rx.recv() => {}
            }
            drop(addrs);
            sys.graceful_shutdown().await
        }
    }
}
