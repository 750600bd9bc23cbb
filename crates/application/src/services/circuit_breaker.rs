use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerState {
    Closed,
    Open,
    HalfOpen,
}

impl BreakerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            BreakerState::Closed => "closed",
            BreakerState::Open => "open",
            BreakerState::HalfOpen => "half-open",
        }
    }
}

/// Outcome of asking the breaker for permission to call out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallPermit {
    /// Normal closed-state call.
    Allowed,
    /// The single half-open probe; its outcome decides the next state.
    Probe,
    Denied,
}

struct Inner {
    state: BreakerState,
    /// Rolling window of the most recent call outcomes, true = failure.
    outcomes: VecDeque<bool>,
    open_until: Instant,
    open_cycles: u32,
    probe_in_flight: bool,
}

/// Three-state breaker guarding the reasoning service. Transitions are
/// atomic under a single mutex; callers never hold the lock across I/O.
pub struct CircuitBreaker {
    inner: Mutex<Inner>,
    window: usize,
    failure_threshold: usize,
    open_base: Duration,
    open_cap: Duration,
}

impl CircuitBreaker {
    pub fn new(
        window: usize,
        failure_threshold: usize,
        open_base: Duration,
        open_cap: Duration,
    ) -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: BreakerState::Closed,
                outcomes: VecDeque::with_capacity(window),
                open_until: Instant::now(),
                open_cycles: 0,
                probe_in_flight: false,
            }),
            window,
            failure_threshold,
            open_base,
            open_cap,
        }
    }

    /// 30s base doubling per consecutive open cycle, capped.
    fn open_duration(&self, cycles: u32) -> Duration {
        let factor = 2u32.saturating_pow(cycles.min(16));
        (self.open_base * factor).min(self.open_cap)
    }

    pub fn try_acquire(&self) -> CallPermit {
        let mut inner = self.inner.lock().unwrap();
        match inner.state {
            BreakerState::Closed => CallPermit::Allowed,
            BreakerState::Open => {
                if Instant::now() < inner.open_until {
                    return CallPermit::Denied;
                }
                inner.state = BreakerState::HalfOpen;
                inner.probe_in_flight = true;
                info!("Reasoning breaker half-open, allowing probe");
                CallPermit::Probe
            }
            BreakerState::HalfOpen => {
                if inner.probe_in_flight {
                    CallPermit::Denied
                } else {
                    inner.probe_in_flight = true;
                    CallPermit::Probe
                }
            }
        }
    }

    pub fn record_success(&self) {
        let mut inner = self.inner.lock().unwrap();
        match inner.state {
            BreakerState::HalfOpen => {
                inner.state = BreakerState::Closed;
                inner.outcomes.clear();
                inner.open_cycles = 0;
                inner.probe_in_flight = false;
                info!("Reasoning breaker closed after successful probe");
            }
            _ => Self::push_outcome(&mut inner, self.window, false),
        }
    }

    pub fn record_failure(&self) {
        let mut inner = self.inner.lock().unwrap();
        match inner.state {
            BreakerState::HalfOpen => {
                inner.open_cycles += 1;
                inner.probe_in_flight = false;
                let duration = self.open_duration(inner.open_cycles);
                inner.open_until = Instant::now() + duration;
                inner.state = BreakerState::Open;
                warn!(
                    open_secs = duration.as_secs(),
                    cycles = inner.open_cycles,
                    "Reasoning probe failed, breaker re-opened"
                );
            }
            BreakerState::Closed => {
                Self::push_outcome(&mut inner, self.window, true);
                let failures = inner.outcomes.iter().filter(|f| **f).count();
                if failures >= self.failure_threshold {
                    let duration = self.open_duration(inner.open_cycles);
                    inner.open_until = Instant::now() + duration;
                    inner.state = BreakerState::Open;
                    warn!(
                        failures,
                        window = self.window,
                        open_secs = duration.as_secs(),
                        "Reasoning breaker opened"
                    );
                }
            }
            BreakerState::Open => {}
        }
    }

    fn push_outcome(inner: &mut Inner, window: usize, failed: bool) {
        if inner.outcomes.len() == window {
            inner.outcomes.pop_front();
        }
        inner.outcomes.push_back(failed);
    }

    pub fn state(&self) -> BreakerState {
        self.inner.lock().unwrap().state
    }

    /// True when an outbound call could be attempted right now.
    pub fn is_callable(&self) -> bool {
        let inner = self.inner.lock().unwrap();
        match inner.state {
            BreakerState::Closed => true,
            BreakerState::Open => Instant::now() >= inner.open_until,
            BreakerState::HalfOpen => !inner.probe_in_flight,
        }
    }
}
