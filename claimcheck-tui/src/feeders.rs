use crate::tui::{TuiActor, TuiMsg};
use claimcheck_actors::actor::Addr;
use claimcheck_actors::system::ShutdownHandle;
use crossterm::event::{self, Event};
use std::time::Duration;
use tokio::{self, time};

// Bounded wait so the blocking thread is free again shortly after shutdown.
fn poll_event() -> std::io::Result<Option<Event>> {
    if event::poll(Duration::from_millis(250))? {
        event::read().map(Some)
    } else {
        Ok(None)
    }
}

const MAX_INPUT_ERRORS: u32 = 8;

/// Pause after the `streak`-th consecutive input error, doubling from 50ms.
/// `None` once the terminal has failed too often to keep reading.
fn input_backoff(streak: u32) -> Option<Duration> {
    (streak < MAX_INPUT_ERRORS).then(|| Duration::from_millis(50 << streak.min(5)))
}

/// Drive the TUI: one task forwards terminal events, one sends ticks. Both
/// stop on shutdown.
pub fn spawn_tui_feeders(tui: Addr<TuiActor>, shutdown: ShutdownHandle) {
    let tui_in = tui.clone();
    let mut shutdown_input = shutdown.subscribe();
    tokio::spawn(async move {
        let mut streak = 0u32;
        loop {
            tokio::select! {
                _ = shutdown_input.recv() => break,
                ev = tokio::task::spawn_blocking(poll_event) => {
                    match ev {
                        Ok(Ok(Some(e))) => {
                            streak = 0;
                            if tui_in.send(TuiMsg::InputEvent(e)).await.is_err() {
                                break;
                            }
                        }
                        Ok(Ok(None)) => streak = 0,
                        Ok(Err(e)) => {
                            // Report the first failure of a run, not every retry.
                            if streak == 0 {
                                let _ = tui_in.send(TuiMsg::OpError(format!("input: {e}"))).await;
                            }
                            let Some(pause) = input_backoff(streak) else {
                                tracing::error!(error = %e, "tui.input_gave_up");
                                let _ = tui_in
                                    .send(TuiMsg::OpError(format!("input stopped: {e}")))
                                    .await;
                                break;
                            };
                            streak += 1;
                            time::sleep(pause).await;
                        }
                        Err(_) => break,
                    }
                }
            }
        }
    });

    let tui_tick = tui;
    let mut shutdown_tick = shutdown.subscribe();
    tokio::spawn(async move {
        let mut interval = time::interval(Duration::from_millis(80));
        loop {
            tokio::select! {
                _ = shutdown_tick.recv() => break,
                _ = interval.tick() => {
                    let _ = tui_tick.try_send(TuiMsg::Tick);
                }
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_backoff_grows_then_gives_up() {
        assert_eq!(input_backoff(0), Some(Duration::from_millis(50)));
        assert_eq!(input_backoff(1), Some(Duration::from_millis(100)));
        assert_eq!(input_backoff(7), Some(Duration::from_millis(1600)));
        assert_eq!(input_backoff(MAX_INPUT_ERRORS), None);
    }
}
