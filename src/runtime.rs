use std::io;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, unbounded, Receiver, RecvTimeoutError, Sender};
use crossterm::event::{self, Event as CtEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Identifies one segment run, so ticks outliving their run can be told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunId(pub u64);

/// Unified event type consumed by the typing loop
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TtEvent {
    Key(KeyEvent),
    Resize,
    Tick(RunId),
}

/// Source of terminal events (keyboard, resize) merged with ticker wake-ups.
pub trait TtEventSource {
    /// Block until the next event. `None` means the source is gone and the
    /// session cannot continue.
    fn recv(&self) -> Option<TtEvent>;

    /// Sender feeding the same queue [`recv`](Self::recv) reads from; given
    /// to the ticker of each run.
    fn waker(&self) -> Sender<TtEvent>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    tx: Sender<TtEvent>,
    rx: Receiver<TtEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> io::Result<Self> {
        let (tx, rx) = unbounded();
        let input = tx.clone();

        thread::Builder::new().name("tt-input".to_string()).spawn(move || loop {
            let event = match event::read() {
                Ok(CtEvent::Key(key)) => TtEvent::Key(key),
                Ok(CtEvent::Resize(_, _)) => TtEvent::Resize,
                Ok(_) => continue,
                Err(err) => {
                    tracing::error!(%err, "terminal input failed");
                    break;
                }
            };
            if input.send(event).is_err() {
                break;
            }
        })?;

        Ok(Self { tx, rx })
    }
}

impl TtEventSource for CrosstermEventSource {
    fn recv(&self) -> Option<TtEvent> {
        self.rx.recv().ok()
    }

    fn waker(&self) -> Sender<TtEvent> {
        self.tx.clone()
    }
}

/// Test event source for headless runs. Gives up after [`Self::TIMEOUT`]
/// without events so a stuck test fails instead of hanging.
pub struct TestEventSource {
    tx: Sender<TtEvent>,
    rx: Receiver<TtEvent>,
}

impl TestEventSource {
    pub const TIMEOUT: Duration = Duration::from_secs(5);

    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    pub fn sender(&self) -> Sender<TtEvent> {
        self.tx.clone()
    }

    /// Queue a plain key press.
    pub fn key(&self, code: KeyCode) {
        self.key_with(code, KeyModifiers::NONE);
    }

    pub fn key_with(&self, code: KeyCode, modifiers: KeyModifiers) {
        let _ = self.tx.send(TtEvent::Key(KeyEvent::new(code, modifiers)));
    }

    /// Queue one key press per character of `text`.
    pub fn type_str(&self, text: &str) {
        for c in text.chars() {
            self.key(KeyCode::Char(c));
        }
    }
}

impl Default for TestEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TtEventSource for TestEventSource {
    fn recv(&self) -> Option<TtEvent> {
        match self.rx.recv_timeout(Self::TIMEOUT) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    fn waker(&self) -> Sender<TtEvent> {
        self.tx.clone()
    }
}

/// Periodic wake-up for one segment run.
///
/// Dropping the ticker cancels it and joins its thread, so once the drop
/// returns no further tick for this run is sent.
pub struct Ticker {
    cancel: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn spawn(waker: Sender<TtEvent>, interval: Duration, run: RunId) -> io::Result<Self> {
        let (cancel_tx, cancel_rx) = bounded::<()>(0);

        let handle = thread::Builder::new()
            .name("tt-ticker".to_string())
            .spawn(move || loop {
                match cancel_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        if waker.send(TtEvent::Tick(run)).is_err() {
                            break;
                        }
                    }
                    // cancelled, or the owner is gone
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            })?;

        Ok(Self {
            cancel: Some(cancel_tx),
            handle: Some(handle),
        })
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        drop(self.cancel.take());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// What a key press asks the typing loop to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Type(char),
    Confirm,
    Backspace,
    DeleteWord,
    Next,
    Previous,
    Escape,
    Interrupt,
    Redraw,
}

impl Action {
    /// Map a key event to an action. Key releases and unbound keys map to
    /// `None`.
    pub fn from_key(key: &KeyEvent) -> Option<Self> {
        if key.kind == KeyEventKind::Release {
            return None;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        let action = match key.code {
            KeyCode::Char('c') if ctrl => Action::Interrupt,
            KeyCode::Char('l') if ctrl => Action::Redraw,
            KeyCode::Char('w') | KeyCode::Char('h') if ctrl => Action::DeleteWord,
            KeyCode::Char(_) if ctrl => return None,
            KeyCode::Char(c) => Action::Type(c),
            KeyCode::Backspace if ctrl || alt => Action::DeleteWord,
            KeyCode::Backspace => Action::Backspace,
            KeyCode::Enter => Action::Confirm,
            KeyCode::Right => Action::Next,
            KeyCode::Left => Action::Previous,
            KeyCode::Esc => Action::Escape,
            _ => return None,
        };

        Some(action)
    }
}
