use anyhow::Result;
use tokio::{
    sync::{broadcast, mpsc},
    task::JoinHandle,
};

/// A task that owns its state and processes one message at a time.
#[async_trait::async_trait]
pub trait Actor: Send + Sized + 'static {
    type Msg: Send + 'static;

    /// Process one message. An `Err` ends the actor and is returned from its task.
    async fn handle(&mut self, msg: Self::Msg, ctx: &mut Context<Self>) -> Result<()>;
}

/// Passed to every `handle` call.
pub struct Context<A: Actor> {
    addr: Addr<A>,
    stop: bool,
}

impl<A: Actor> Context<A> {
    /// The actor's own address, for messages it sends itself (key actions,
    /// check completions).
    pub fn addr(&self) -> Addr<A> {
        self.addr.clone()
    }

    /// Finish after the current message.
    pub fn stop(&mut self) {
        self.stop = true;
    }
}

/// Sending half of an actor's bounded mailbox.
pub struct Addr<A: Actor>(mpsc::Sender<A::Msg>);

// Derived Clone would demand `A: Clone`.
impl<A: Actor> Clone for Addr<A> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<A: Actor> Addr<A> {
    /// Wait for mailbox room. Hands the message back if the actor is gone.
    pub async fn send(&self, msg: A::Msg) -> std::result::Result<(), A::Msg> {
        self.0.send(msg).await.map_err(|e| e.0)
    }

    /// Enqueue without waiting. Hands the message back on a full or closed mailbox.
    pub fn try_send(&self, msg: A::Msg) -> std::result::Result<(), A::Msg> {
        self.0.try_send(msg).map_err(|e| e.into_inner())
    }
}

pub struct ActorHandle<A: Actor> {
    pub addr: Addr<A>,
    pub task: JoinHandle<Result<()>>,
}

/// Start `actor` with a mailbox of `capacity` messages.
///
/// The task ends when `handle` errors, `ctx.stop()` is called, or `shutdown`
/// fires. The context keeps an `Addr` of its own, so dropping the outside
/// addresses is not enough.
///
/// ```
/// # use anyhow::Result;
/// # use async_trait::async_trait;
/// # use claimcheck_actors::actor::{self, Actor, Context};
/// # struct Countdown(u8);
/// # #[async_trait]
/// # impl Actor for Countdown {
/// #     type Msg = ();
/// #     async fn handle(&mut self, _: (), ctx: &mut Context<Self>) -> Result<()> {
/// #         self.0 -= 1;
/// #         if self.0 == 0 {
/// #             ctx.stop();
/// #         }
/// #         Ok(())
/// #     }
/// # }
/// let rt = tokio::runtime::Runtime::new().unwrap();
/// rt.block_on(async {
///     let handle = actor::spawn_actor_with_shutdown(Countdown(2), 4, None);
///     handle.addr.send(()).await.unwrap();
///     handle.addr.send(()).await.unwrap();
///     handle.task.await.unwrap().unwrap();
/// });
/// ```
pub fn spawn_actor_with_shutdown<A: Actor>(
    actor: A,
    capacity: usize,
    shutdown: Option<broadcast::Receiver<()>>,
) -> ActorHandle<A> {
    spawn_actor_reserved::<A>("", capacity).start_with_shutdown(actor, shutdown)
}

async fn run_loop<A: Actor>(
    mut actor: A,
    addr: Addr<A>,
    mut rx: mpsc::Receiver<A::Msg>,
    mut shutdown: Option<broadcast::Receiver<()>>,
) -> Result<()> {
    let mut ctx = Context { addr, stop: false };

    loop {
        let next = match shutdown.as_mut() {
            Some(shutdown_rx) => tokio::select! {
                _ = shutdown_rx.recv() => None,
                maybe_msg = rx.recv() => maybe_msg,
            },
            None => rx.recv().await,
        };
        let Some(msg) = next else { break };

        if let Err(e) = actor.handle(msg, &mut ctx).await {
            tracing::error!(target: "claimcheck-actors", error = ?e, "actor.handle_failed");
            return Err(e);
        }
        if ctx.stop {
            break;
        }
    }
    Ok(())
}

/// A mailbox whose actor has not started yet. Feeders can be given its
/// address before the actor itself exists.
pub struct Reserved<A: Actor> {
    name: String,
    addr: Addr<A>,
    rx: mpsc::Receiver<A::Msg>,
}

impl<A: Actor> Reserved<A> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn addr(&self) -> Addr<A> {
        self.addr.clone()
    }

    /// Start draining the reserved mailbox. Messages sent before this call
    /// are processed first.
    pub fn start_with_shutdown(
        self,
        actor: A,
        shutdown: Option<broadcast::Receiver<()>>,
    ) -> ActorHandle<A> {
        let task = tokio::spawn(run_loop(actor, self.addr.clone(), self.rx, shutdown));
        ActorHandle {
            addr: self.addr,
            task,
        }
    }
}

pub fn spawn_actor_reserved<A: Actor>(name: impl Into<String>, capacity: usize) -> Reserved<A> {
    let (tx, rx) = mpsc::channel::<A::Msg>(capacity);
    Reserved {
        name: name.into(),
        addr: Addr(tx),
        rx,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::oneshot;

    struct Failing;

    #[async_trait::async_trait]
    impl Actor for Failing {
        type Msg = ();
        async fn handle(&mut self, _msg: (), _ctx: &mut Context<Self>) -> Result<()> {
            anyhow::bail!("boom")
        }
    }

    struct Replier;

    #[async_trait::async_trait]
    impl Actor for Replier {
        type Msg = oneshot::Sender<u32>;
        async fn handle(&mut self, reply: Self::Msg, _ctx: &mut Context<Self>) -> Result<()> {
            let _ = reply.send(7);
            Ok(())
        }
    }

    #[tokio::test]
    async fn handler_error_stops_actor() {
        let ActorHandle { addr, task } = spawn_actor_with_shutdown(Failing, 1, None);
        addr.send(()).await.unwrap();
        let res = task.await.unwrap();
        assert!(res.is_err());
        assert!(addr.send(()).await.is_err());
    }

    #[tokio::test]
    async fn shutdown_signal_stops_idle_actor() {
        let (tx, rx) = broadcast::channel(1);
        let ActorHandle { addr, task } = spawn_actor_with_shutdown(Replier, 2, Some(rx));

        let (reply, got) = oneshot::channel();
        addr.send(reply).await.unwrap();
        assert_eq!(got.await.unwrap(), 7);

        tx.send(()).unwrap();
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn reserved_mailbox_buffers_until_start() {
        let reserved = spawn_actor_reserved::<Replier>("replier", 2);
        assert_eq!(reserved.name(), "replier");
        let (reply, got) = oneshot::channel();
        reserved.addr().try_send(reply).map_err(|_| ()).unwrap();

        let (tx, rx) = broadcast::channel(1);
        let handle = reserved.start_with_shutdown(Replier, Some(rx));
        assert_eq!(got.await.unwrap(), 7);
        tx.send(()).unwrap();
        handle.task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn reserved_mailbox_dropped_before_start_rejects_sends() {
        let reserved = spawn_actor_reserved::<Replier>("replier", 2);
        let addr = reserved.addr();
        drop(reserved);
        let (reply, _got) = oneshot::channel();
        assert!(addr.send(reply).await.is_err());
    }
}
