use crate::{
    core::Millis,
    error::{KineticaError, KineticaResult},
    schedule::Scheduler,
};

/// One named step of a fixed, ordered, timed sequence.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Phase {
    pub name: String,
    pub duration_ms: u64,
}

impl Phase {
    pub fn new(name: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            name: name.into(),
            duration_ms,
        }
    }
}

#[derive(Clone, Copy)]
enum State {
    Idle,
    Active { index: usize, entered_at: Millis },
    Complete,
    Cancelled,
}

/// Runs an ordered list of phases, each with a fixed dwell duration,
/// auto-advancing on timers. After the last phase's dwell elapses the
/// terminal callback fires exactly once; cancelling (or dropping) the
/// sequencer before that point guarantees it never fires.
pub struct PhaseSequencer {
    phases: Vec<Phase>,
    scheduler: Scheduler,
    state: State,
    on_complete: Option<Box<dyn FnOnce()>>,
}

impl std::fmt::Debug for PhaseSequencer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhaseSequencer")
            .field("phases", &self.phases)
            .field("current", &self.current_phase())
            .field("complete", &self.is_complete())
            .finish_non_exhaustive()
    }
}

impl PhaseSequencer {
    pub fn new(phases: Vec<Phase>) -> KineticaResult<Self> {
        if phases.is_empty() {
            return Err(KineticaError::validation(
                "PhaseSequencer needs at least one phase",
            ));
        }
        if let Some(p) = phases.iter().find(|p| p.duration_ms == 0) {
            return Err(KineticaError::validation(format!(
                "phase '{}' must have a duration > 0",
                p.name
            )));
        }
        Ok(Self {
            phases,
            scheduler: Scheduler::new(),
            state: State::Idle,
            on_complete: None,
        })
    }

    /// Attach the terminal callback. Builder-style, set once at construction
    /// time like everything else on this type.
    pub fn on_complete(mut self, f: impl FnOnce() + 'static) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }

    pub fn total_duration_ms(&self) -> u64 {
        self.phases.iter().map(|p| p.duration_ms).sum()
    }

    /// Enter the first phase. A second call is a no-op; the sequence cannot
    /// be restarted.
    pub fn start(&mut self, now: Millis) {
        if !matches!(self.state, State::Idle) {
            return;
        }
        self.scheduler.advance_to(now);
        self.state = State::Active {
            index: 0,
            entered_at: now,
        };
        self.scheduler
            .schedule_at(now.saturating_add(self.phases[0].duration_ms));
        tracing::debug!(phase = %self.phases[0].name, at_ms = now.0, "phase entered");
    }

    /// Walk the clock forward, crossing every phase boundary due by `now`.
    /// Phases advance strictly forward and are never skipped even when the
    /// clock jumps past several boundaries at once.
    pub fn advance_to(&mut self, now: Millis) {
        loop {
            let fired = self.scheduler.advance_to(now);
            if fired.is_empty() {
                return;
            }
            for _ in fired {
                self.cross_boundary();
            }
        }
    }

    fn cross_boundary(&mut self) {
        let State::Active { index, entered_at } = self.state else {
            return;
        };
        // exact boundary time, independent of when advance_to was called
        let boundary = entered_at.saturating_add(self.phases[index].duration_ms);
        let next = index + 1;
        if next < self.phases.len() {
            self.state = State::Active {
                index: next,
                entered_at: boundary,
            };
            self.scheduler
                .schedule_at(boundary.saturating_add(self.phases[next].duration_ms));
            tracing::debug!(phase = %self.phases[next].name, at_ms = boundary.0, "phase entered");
        } else {
            self.state = State::Complete;
            tracing::debug!(at_ms = boundary.0, "phase sequence complete");
            if let Some(cb) = self.on_complete.take() {
                cb();
            }
        }
    }

    /// Cancel every pending boundary and drop the terminal callback unfired.
    pub fn cancel(&mut self) {
        self.scheduler.cancel_all();
        self.on_complete = None;
        if matches!(self.state, State::Idle | State::Active { .. }) {
            self.state = State::Cancelled;
        }
    }

    /// The active phase name, or `None` before `start` and after the
    /// sequence ends.
    pub fn current_phase(&self) -> Option<&str> {
        match self.state {
            State::Active { index, .. } => Some(&self.phases[index].name),
            _ => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.state, State::Complete)
    }
}
