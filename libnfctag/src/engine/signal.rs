// libnfctag/src/engine/signal.rs
//! One-shot completion signals bridging controller callbacks to blocked
//! callers: arm, submit, wait.

use std::sync::{Condvar, Mutex};
use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::Error;
use crate::tag::NdefInfo;
use crate::types::{DeactivationKind, Status};
use crate::utils::sync::{lock, wait, wait_timeout};

/// Why a wait ended without a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitError {
    TimedOut,
    TagLost,
    Aborted,
}

impl From<WaitError> for Error {
    fn from(_: WaitError) -> Self {
        Error::TagLost
    }
}

#[derive(Debug)]
enum SignalState<T> {
    Idle,
    Armed,
    Done(Result<T, WaitError>),
}

#[derive(Debug)]
pub struct Signal<T> {
    name: &'static str,
    state: Mutex<SignalState<T>>,
    cv: Condvar,
}

impl<T> Signal<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            state: Mutex::new(SignalState::Idle),
            cv: Condvar::new(),
        }
    }

    /// Arm before submitting the command whose outcome will complete it.
    pub fn arm(&self) {
        *lock(&self.state) = SignalState::Armed;
    }

    pub fn disarm(&self) {
        *lock(&self.state) = SignalState::Idle;
        self.cv.notify_all();
    }

    pub fn is_armed(&self) -> bool {
        matches!(*lock(&self.state), SignalState::Armed)
    }

    /// Deliver a result. Returns false if nobody was waiting for one.
    pub fn complete(&self, value: T) -> bool {
        self.finish(Ok(value))
    }

    pub fn fail(&self, error: WaitError) -> bool {
        self.finish(Err(error))
    }

    fn finish(&self, result: Result<T, WaitError>) -> bool {
        let mut state = lock(&self.state);
        if !matches!(*state, SignalState::Armed) {
            debug!("{} signal not armed, dropping completion", self.name);
            return false;
        }
        *state = SignalState::Done(result);
        self.cv.notify_all();
        true
    }

    /// Block until completed, failed, or `timeout` elapses. `None` waits
    /// for as long as the controller takes.
    pub fn wait(&self, timeout: Option<Duration>) -> Result<T, WaitError> {
        let deadline = timeout.map(|t| Instant::now() + t);
        let mut state = lock(&self.state);
        loop {
            match std::mem::replace(&mut *state, SignalState::Idle) {
                SignalState::Done(result) => return result,
                SignalState::Idle => return Err(WaitError::Aborted),
                SignalState::Armed => *state = SignalState::Armed,
            }
            match deadline {
                None => state = wait(&self.cv, state),
                Some(deadline) => {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    if remaining.is_zero() {
                        *state = SignalState::Idle;
                        warn!("timed out waiting for {}", self.name);
                        return Err(WaitError::TimedOut);
                    }
                    state = wait_timeout(&self.cv, state, remaining).0;
                }
            }
        }
    }
}

/// All per-operation completion signals of one engine.
#[derive(Debug)]
pub(crate) struct Signals {
    pub deactivate: Signal<DeactivationKind>,
    pub select: Signal<Status>,
    pub transceive: Signal<(Status, Vec<u8>)>,
    pub read: Signal<Status>,
    pub write: Signal<Status>,
    pub format: Signal<Status>,
    pub read_only: Signal<Status>,
    pub ndef_detect: Signal<NdefInfo>,
    pub presence: Signal<Status>,
}

impl Signals {
    pub fn new() -> Self {
        Self {
            deactivate: Signal::new("deactivate"),
            select: Signal::new("select"),
            transceive: Signal::new("transceive"),
            read: Signal::new("read"),
            write: Signal::new("write"),
            format: Signal::new("format"),
            read_only: Signal::new("read_only"),
            ndef_detect: Signal::new("ndef_detect"),
            presence: Signal::new("presence_check"),
        }
    }

    /// Wake every armed waiter with `error`.
    pub fn fail_all(&self, error: WaitError) {
        let woken = [
            self.deactivate.fail(error),
            self.select.fail(error),
            self.transceive.fail(error),
            self.read.fail(error),
            self.write.fail(error),
            self.format.fail(error),
            self.read_only.fail(error),
            self.ndef_detect.fail(error),
            self.presence.fail(error),
        ];
        let n = woken.iter().filter(|w| **w).count();
        if n > 0 {
            debug!("woke {} waiter(s) with {:?}", n, error);
        }
    }
}
