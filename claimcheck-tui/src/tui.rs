use crate::{
    input::InputLine,
    view::{self, ViewSnap},
};
use anyhow::Result;
use async_trait::async_trait;
use claimcheck_actors::{
    CheckCmd,
    actor::{Actor, Addr, Context},
    check::CheckActor,
    system::ShutdownHandle,
};
use claimcheck_client::{
    CheckOutcome, ClaimRequest, ClaimSession, EMPTY_CLAIM_MESSAGE, InFlight, render,
};
use crossterm::{
    event::{Event as CtEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{
    io::{self, Stdout},
    time::{Duration, Instant},
};
use tokio::sync::oneshot;
use unicode_width::UnicodeWidthStr;

const BRAILLE_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const CHECK_RUNNING_HINT: &str = "A claim check is already running";
const HSCROLL_STEP: u16 = 8;

pub enum TuiMsg {
    InputEvent(CtEvent),
    Tick,
    Submit,
    CheckDone(InFlight, CheckOutcome),
    OpError(String),
    Shutdown,
}

/// Results pane position: lines from the top and columns from the left.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Scroll {
    rows: usize,
    cols: u16,
}

/// What a key press asks the actor to do besides editing in place.
#[derive(Debug, PartialEq, Eq)]
enum KeyAction {
    None,
    Submit,
    Quit,
}

pub struct TuiActor {
    session: ClaimSession,

    // deps
    check: Addr<CheckActor>,
    backend: String,

    // terminal
    term: Terminal<CrosstermBackend<Stdout>>,
    restored: bool,
    tick_rate: Duration,
    last_tick: Instant,

    // ui state
    input: InputLine,
    scroll: Scroll,
    dirty: bool,
    spin_idx: usize,
    notice: Option<String>,

    // shutdown coordination
    shutdown: ShutdownHandle,
}

impl TuiActor {
    pub fn new(check: Addr<CheckActor>, backend: String, shutdown: ShutdownHandle) -> Result<Self> {
        let mut stdout = io::stdout();
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen)?;
        let backend_term = CrosstermBackend::new(stdout);
        let mut term = Terminal::new(backend_term)?;
        term.clear()?;

        Ok(Self {
            session: ClaimSession::new(),
            check,
            backend,
            term,
            restored: false,
            tick_rate: Duration::from_millis(80),
            last_tick: Instant::now(),
            input: InputLine::default(),
            scroll: Scroll::default(),
            dirty: true,
            spin_idx: 0,
            notice: None,
            shutdown,
        })
    }

    fn spinner(&self) -> &'static str {
        if self.session.state().is_loading() {
            BRAILLE_FRAMES[self.spin_idx % BRAILLE_FRAMES.len()]
        } else {
            " "
        }
    }

    fn step_spinner(&mut self) {
        if self.session.state().is_loading() {
            self.spin_idx = (self.spin_idx + 1) % BRAILLE_FRAMES.len();
            self.dirty = true;
        }
    }

    fn draw(&mut self) -> Result<()> {
        let snap = ViewSnap {
            screen: render::view(&self.session),
            caret_col: UnicodeWidthStr::width(self.input.before_cursor()) as u16,
            scroll: self.scroll.rows,
            hscroll: self.scroll.cols,
            spinner: self.spinner(),
            backend: self.backend.clone(),
            notice: self.notice.clone(),
        };
        self.scroll.rows = view::draw(&mut self.term, &snap)?;
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) -> KeyAction {
        let action = edit_for_key(&mut self.session, &mut self.input, &mut self.scroll, key);
        if action == KeyAction::None {
            self.notice = None;
        }
        self.dirty = true;
        action
    }

    /// Start a check on the `CheckActor`; the outcome comes back as `CheckDone`.
    async fn submit(&mut self, me: Addr<TuiActor>) {
        self.dirty = true;
        if let Some(hint) = submit_hint(&self.session) {
            self.notice = Some(hint.to_string());
            return;
        }
        let ticket = match self.session.begin() {
            Ok(ticket) => ticket,
            Err(blocked) => {
                tracing::debug!(reason = %blocked, "tui.submit_blocked");
                return;
            }
        };
        self.scroll = Scroll::default();
        self.notice = None;

        let rx = dispatch_check(&self.check, ticket.request().clone()).await;
        let backend = self.backend.clone();
        tokio::spawn(async move {
            let outcome = await_outcome(rx, backend).await;
            let _ = me.send(TuiMsg::CheckDone(ticket, outcome)).await;
        });
    }

    fn restore_terminal(&mut self) {
        if self.restored {
            return;
        }
        self.restored = true;
        disable_raw_mode().ok();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = self.term.show_cursor();
    }
}

impl Drop for TuiActor {
    fn drop(&mut self) {
        self.restore_terminal();
    }
}

/// Why Enter would do nothing right now, if it would.
fn submit_hint(session: &ClaimSession) -> Option<&'static str> {
    if session.state().is_loading() {
        Some(CHECK_RUNNING_HINT)
    } else if !render::view(session).submit.enabled {
        Some(EMPTY_CLAIM_MESSAGE)
    } else {
        None
    }
}

/// Hand `request` to the check actor. If its mailbox is closed the command
/// is dropped, and the returned receiver reports that as a closed channel.
async fn dispatch_check(
    check: &Addr<CheckActor>,
    request: ClaimRequest,
) -> oneshot::Receiver<CheckOutcome> {
    let (reply, rx) = oneshot::channel();
    if check.send(CheckCmd { request, reply }).await.is_err() {
        tracing::warn!("tui.check_actor_gone");
    }
    rx
}

/// The check's outcome, or a transport failure if the reply was dropped.
async fn await_outcome(rx: oneshot::Receiver<CheckOutcome>, backend: String) -> CheckOutcome {
    rx.await.unwrap_or_else(|_| CheckOutcome::Unreachable {
        backend,
        detail: "check was dropped before completing".into(),
    })
}

/// Apply a key to the session and editor. Kept free of the terminal so the
/// key map can be exercised directly.
fn edit_for_key(
    session: &mut ClaimSession,
    input: &mut InputLine,
    scroll: &mut Scroll,
    key: KeyEvent,
) -> KeyAction {
    if key.kind == KeyEventKind::Release {
        return KeyAction::None;
    }
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL)
        | (KeyCode::Char('q'), KeyModifiers::CONTROL) => return KeyAction::Quit,
        (KeyCode::PageUp, _) => scroll.rows = scroll.rows.saturating_sub(5),
        (KeyCode::PageDown, _) => scroll.rows = scroll.rows.saturating_add(5),
        (KeyCode::Up, _) => scroll.rows = scroll.rows.saturating_sub(1),
        (KeyCode::Down, _) => scroll.rows = scroll.rows.saturating_add(1),
        (KeyCode::Left, m) if m.contains(KeyModifiers::SHIFT) => {
            scroll.cols = scroll.cols.saturating_sub(HSCROLL_STEP)
        }
        (KeyCode::Right, m) if m.contains(KeyModifiers::SHIFT) => {
            scroll.cols = scroll.cols.saturating_add(HSCROLL_STEP)
        }
        (KeyCode::Enter, _) => return KeyAction::Submit,
        (KeyCode::Left, _) => input.left(),
        (KeyCode::Right, _) => input.right(),
        (KeyCode::Home, _) => input.home(),
        (KeyCode::End, _) => input.end(),
        (KeyCode::Backspace, _) => input.backspace(),
        (KeyCode::Delete, _) => input.delete(),
        (KeyCode::Esc, _) => {
            input.clear();
            if !session.clear() {
                session.set_claim_text("");
            }
            *scroll = Scroll::default();
        }
        (KeyCode::Char(ch), m) if !m.contains(KeyModifiers::CONTROL) => input.insert(ch),
        _ => {}
    }
    session.set_claim_text(input.text());
    KeyAction::None
}

#[async_trait]
impl Actor for TuiActor {
    type Msg = TuiMsg;

    async fn handle(&mut self, msg: Self::Msg, ctx: &mut Context<Self>) -> Result<()> {
        match msg {
            TuiMsg::InputEvent(ev) => match ev {
                CtEvent::Key(k) => match self.handle_key(k) {
                    KeyAction::Submit => {
                        let _ = ctx.addr().try_send(TuiMsg::Submit);
                    }
                    KeyAction::Quit => {
                        let _ = ctx.addr().try_send(TuiMsg::Shutdown);
                    }
                    KeyAction::None => {}
                },
                CtEvent::Resize(_, _) => self.dirty = true,
                _ => {}
            },
            TuiMsg::Submit => self.submit(ctx.addr()).await,
            TuiMsg::CheckDone(ticket, outcome) => {
                self.session.settle(ticket, outcome);
                self.dirty = true;
            }
            TuiMsg::OpError(e) => {
                tracing::warn!(error = %e, "tui.op_error");
                self.notice = Some(e);
                self.dirty = true;
            }
            TuiMsg::Tick => {
                self.step_spinner();
                if self.dirty || self.last_tick.elapsed() >= self.tick_rate {
                    self.draw()?;
                    self.last_tick = Instant::now();
                    self.dirty = false;
                }
            }
            TuiMsg::Shutdown => {
                self.restore_terminal();
                self.shutdown.signal();
                ctx.stop();
            }
        }

        Ok(())
    }
}
