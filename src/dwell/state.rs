use serde::Serialize;
use std::time::{Duration, Instant};

use crate::models::TargetId;

use super::DwellTimings;

/// Dwell state machine.
///
/// ```text
/// Idle --Some(t)--> Dwelling(t, now)
/// Dwelling(t) --Some(t), elapsed >= required--> Idle   [Selected(t)]
/// Dwelling(t) --Some(t), elapsed <  required--> Dwelling(t)   [Progress]
/// Dwelling(t) --Some(u), u != t--> Dwelling(u, now)
/// Dwelling(t) --None--> Idle   [Cancelled(t)]
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum DwellState {
    Idle,
    Dwelling {
        target: TargetId,
        started_at: Instant,
        required: Duration,
    },
}

impl Default for DwellState {
    fn default() -> Self {
        DwellState::Idle
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum DwellEvent {
    Started { target: TargetId },
    Progress { target: TargetId, progress: f64 },
    Selected { target: TargetId },
    Cancelled { target: TargetId },
}

impl DwellState {
    /// Single transition. Pure: callers inject `now`.
    pub fn step(
        self,
        input: Option<&TargetId>,
        now: Instant,
        timings: &DwellTimings,
    ) -> (DwellState, Option<DwellEvent>) {
        match (self, input) {
            (DwellState::Idle, None) => (DwellState::Idle, None),
            (DwellState::Idle, Some(target)) => start(target, now, timings),
            (DwellState::Dwelling { target, .. }, None) => {
                (DwellState::Idle, Some(DwellEvent::Cancelled { target }))
            }
            (
                DwellState::Dwelling {
                    target,
                    started_at,
                    required,
                },
                Some(next),
            ) => {
                if &target != next {
                    return start(next, now, timings);
                }

                let elapsed = now.saturating_duration_since(started_at);
                if elapsed >= required {
                    return (DwellState::Idle, Some(DwellEvent::Selected { target }));
                }

                let progress = fraction(elapsed, required);
                (
                    DwellState::Dwelling {
                        target: target.clone(),
                        started_at,
                        required,
                    },
                    Some(DwellEvent::Progress { target, progress }),
                )
            }
        }
    }

    pub fn target(&self) -> Option<&TargetId> {
        match self {
            DwellState::Idle => None,
            DwellState::Dwelling { target, .. } => Some(target),
        }
    }

    /// Progress in `[0, 1]` as of `now`.
    pub fn progress_at(&self, now: Instant) -> f64 {
        match self {
            DwellState::Idle => 0.0,
            DwellState::Dwelling {
                started_at,
                required,
                ..
            } => fraction(now.saturating_duration_since(*started_at), *required),
        }
    }
}

fn start(target: &TargetId, now: Instant, timings: &DwellTimings) -> (DwellState, Option<DwellEvent>) {
    (
        DwellState::Dwelling {
            target: target.clone(),
            started_at: now,
            required: timings.required(target.class()),
        },
        Some(DwellEvent::Started {
            target: target.clone(),
        }),
    )
}

fn fraction(elapsed: Duration, required: Duration) -> f64 {
    if required.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f64() / required.as_secs_f64()).clamp(0.0, 1.0)
}
