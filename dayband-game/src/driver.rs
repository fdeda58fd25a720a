//! Timed transition driver.
//!
//! Binds a [`GameSession`] to a scheduler and an analytics sink: an answer
//! starts the reveal timer, the reveal timer starts the short advance timer,
//! and the advance either steps to the next question or finalizes the puzzle
//! and emits the one-shot completion event. At most one timer is pending at
//! a time and teardown cancels it, so a stale timer never mutates a session
//! the host has already abandoned.
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::AnalyticsSink;
use crate::constants::{ADVANCE_DELAY_MS, COMPLETED_GAME_EVENT, REVEAL_DURATION_MS};
use crate::progress::ProgressStore;
use crate::session::{AnswerFeedback, CompletionSummary, GameSession, SessionPhase};
use crate::time::{Clock, Scheduler, TimerHandle};

struct DriverInner<S, C, T, A>
where
    S: ProgressStore + 'static,
    C: Clock + 'static,
    T: Scheduler + 'static,
    A: AnalyticsSink + 'static,
{
    session: RefCell<GameSession<S, C>>,
    scheduler: T,
    analytics: A,
    pending: RefCell<Option<T::Handle>>,
}

impl<S, C, T, A> DriverInner<S, C, T, A>
where
    S: ProgressStore + 'static,
    C: Clock + 'static,
    T: Scheduler + 'static,
    A: AnalyticsSink + 'static,
{
    fn store_pending(&self, handle: T::Handle) {
        if let Some(mut stale) = self.pending.borrow_mut().replace(handle) {
            stale.cancel();
        }
    }

    fn schedule_reveal_end(self: &Rc<Self>) {
        let inner = Rc::clone(self);
        let handle = self.scheduler.schedule(
            Duration::from_millis(REVEAL_DURATION_MS),
            Box::new(move || {
                inner.session.borrow_mut().end_reveal();
                inner.schedule_advance();
            }),
        );
        self.store_pending(handle);
    }

    fn schedule_advance(self: &Rc<Self>) {
        let inner = Rc::clone(self);
        let handle = self.scheduler.schedule(
            Duration::from_millis(ADVANCE_DELAY_MS),
            Box::new(move || {
                inner.pending.borrow_mut().take();
                let completion = inner.session.borrow_mut().advance();
                if let Some(summary) = completion {
                    inner.finish(&summary);
                }
            }),
        );
        self.store_pending(handle);
    }

    fn finish(&self, summary: &CompletionSummary) {
        if summary.first_completion {
            self.analytics.emit(COMPLETED_GAME_EVENT, &summary.stats);
        } else {
            log::debug!(
                "puzzle {} completed again; completion event suppressed",
                summary.puzzle_number
            );
        }
    }
}

/// Owner of a session's timed transitions.
pub struct SessionDriver<S, C, T, A>
where
    S: ProgressStore + 'static,
    C: Clock + 'static,
    T: Scheduler + 'static,
    A: AnalyticsSink + 'static,
{
    inner: Rc<DriverInner<S, C, T, A>>,
}

impl<S, C, T, A> SessionDriver<S, C, T, A>
where
    S: ProgressStore + 'static,
    C: Clock + 'static,
    T: Scheduler + 'static,
    A: AnalyticsSink + 'static,
{
    /// Wrap a loaded session.
    ///
    /// If the session resumed mid-transition (current question answered but
    /// not yet advanced, e.g. a reload during the reveal), the interrupted
    /// advance is rescheduled so the game does not stall.
    pub fn new(session: GameSession<S, C>, scheduler: T, analytics: A) -> Self {
        let driver = Self {
            inner: Rc::new(DriverInner {
                session: RefCell::new(session),
                scheduler,
                analytics,
                pending: RefCell::new(None),
            }),
        };
        let interrupted = {
            let session = driver.inner.session.borrow();
            session.phase() == SessionPhase::InProgress && session.current_answered()
        };
        if interrupted {
            driver.inner.schedule_advance();
        }
        driver
    }

    /// Read access to the underlying session, for rendering.
    pub fn with_session<R>(&self, f: impl FnOnce(&GameSession<S, C>) -> R) -> R {
        f(&self.inner.session.borrow())
    }

    /// Submit the player's choice for the current question.
    ///
    /// On acceptance the reveal timer starts; `None` means the session is
    /// not accepting answers right now (wrong phase or already answered).
    pub fn submit_answer(&self, choice: &str) -> Option<AnswerFeedback> {
        let feedback = self.inner.session.borrow_mut().answer(choice)?;
        self.inner.schedule_reveal_end();
        Some(feedback)
    }
}

impl<S, C, T, A> Drop for SessionDriver<S, C, T, A>
where
    S: ProgressStore + 'static,
    C: Clock + 'static,
    T: Scheduler + 'static,
    A: AnalyticsSink + 'static,
{
    fn drop(&mut self) {
        if let Some(mut handle) = self.inner.pending.borrow_mut().take() {
            handle.cancel();
        }
    }
}
