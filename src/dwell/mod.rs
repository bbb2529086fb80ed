pub mod config;
pub mod state;

pub use config::DwellTimings;
pub use state::{DwellEvent, DwellState};

use log::debug;
use std::time::Instant;

use crate::models::TargetId;

/// Owns the single dwell state of a pipeline and keeps the last reported
/// progress for the renderer.
#[derive(Debug, Clone, Default)]
pub struct DwellDetector {
    state: DwellState,
    timings: DwellTimings,
    progress: f64,
}

impl DwellDetector {
    pub fn new(timings: DwellTimings) -> Self {
        Self {
            state: DwellState::Idle,
            timings,
            progress: 0.0,
        }
    }

    pub fn update(&mut self, target: Option<&TargetId>, now: Instant) -> Option<DwellEvent> {
        let previous = std::mem::take(&mut self.state);
        let (next, event) = previous.step(target, now, &self.timings);
        self.state = next;

        self.progress = match &event {
            Some(DwellEvent::Progress { progress, .. }) => *progress,
            _ => 0.0,
        };

        if let Some(DwellEvent::Selected { target }) = &event {
            debug!("dwell selected {}", target);
        }

        event
    }

    /// Forces `Idle`, e.g. when a manual keypress should win over a pending
    /// gaze selection.
    pub fn cancel(&mut self) -> Option<DwellEvent> {
        self.progress = 0.0;
        match std::mem::take(&mut self.state) {
            DwellState::Idle => None,
            DwellState::Dwelling { target, .. } => Some(DwellEvent::Cancelled { target }),
        }
    }

    pub fn state(&self) -> &DwellState {
        &self.state
    }

    pub fn hovered_target(&self) -> Option<&TargetId> {
        self.state.target()
    }

    /// Progress reported by the last update.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn is_dwelling(&self) -> bool {
        matches!(self.state, DwellState::Dwelling { .. })
    }

    pub fn timings(&self) -> &DwellTimings {
        &self.timings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Action;
    use std::time::Duration;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn hold(
        detector: &mut DwellDetector,
        target: &TargetId,
        from: Instant,
        duration: Duration,
    ) -> Vec<DwellEvent> {
        let mut events = Vec::new();
        let mut t = Duration::ZERO;
        loop {
            events.extend(detector.update(Some(target), from + t));
            if t >= duration {
                break;
            }
            t = (t + ms(70)).min(duration);
        }
        events
    }

    fn selections(events: &[DwellEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, DwellEvent::Selected { .. }))
            .count()
    }

    #[test]
    fn test_just_short_of_threshold_does_not_select() {
        let mut detector = DwellDetector::new(DwellTimings::default());
        let a = TargetId::Letter('A');
        let events = hold(&mut detector, &a, Instant::now(), ms(1499));
        assert_eq!(selections(&events), 0);
        assert!(detector.is_dwelling());
        assert!(detector.progress() > 0.99 && detector.progress() < 1.0);
    }

    #[test]
    fn test_past_threshold_selects_once_and_returns_idle() {
        let mut detector = DwellDetector::new(DwellTimings::default());
        let a = TargetId::Letter('A');
        let t0 = Instant::now();
        let events = hold(&mut detector, &a, t0, ms(1501));
        assert_eq!(selections(&events), 1);
        assert_eq!(
            events.last(),
            Some(&DwellEvent::Selected { target: a.clone() })
        );
        assert!(!detector.is_dwelling());
        assert_eq!(detector.progress(), 0.0);

        // A second hold of the same length is an independent selection.
        let events = hold(&mut detector, &a, t0 + ms(1600), ms(1501));
        assert_eq!(selections(&events), 1);
    }

    #[test]
    fn test_switching_target_restarts_timer() {
        let mut detector = DwellDetector::new(DwellTimings::default());
        let a = TargetId::Letter('A');
        let b = TargetId::Letter('B');
        let t0 = Instant::now();

        hold(&mut detector, &a, t0, ms(1400));
        let event = detector.update(Some(&b), t0 + ms(1450));
        assert_eq!(event, Some(DwellEvent::Started { target: b.clone() }));
        assert_eq!(detector.progress(), 0.0);
        assert_eq!(detector.hovered_target(), Some(&b));

        // A's accumulated time never carries over.
        let events = hold(&mut detector, &b, t0 + ms(1450), ms(1400));
        assert_eq!(selections(&events), 0);
        assert!(!events.contains(&DwellEvent::Selected { target: a }));
    }

    #[test]
    fn test_leaving_all_targets_cancels() {
        let mut detector = DwellDetector::new(DwellTimings::default());
        let a = TargetId::Letter('A');
        let t0 = Instant::now();
        hold(&mut detector, &a, t0, ms(1000));

        let event = detector.update(None, t0 + ms(1050));
        assert_eq!(event, Some(DwellEvent::Cancelled { target: a.clone() }));
        assert!(!detector.is_dwelling());

        // Re-entering restarts from zero.
        detector.update(Some(&a), t0 + ms(1100));
        let events = hold(&mut detector, &a, t0 + ms(1100), ms(1000));
        assert_eq!(selections(&events), 0);
    }

    #[test]
    fn test_explicit_cancel() {
        let mut detector = DwellDetector::new(DwellTimings::default());
        let a = TargetId::Action(Action::Clear);
        detector.update(Some(&a), Instant::now());
        assert_eq!(detector.cancel(), Some(DwellEvent::Cancelled { target: a }));
        assert_eq!(detector.cancel(), None);
        assert_eq!(detector.state(), &DwellState::Idle);
    }

    #[test]
    fn test_prediction_slots_use_short_duration() {
        let mut detector = DwellDetector::new(DwellTimings::default());
        let slot = TargetId::Prediction(2);
        let t0 = Instant::now();
        detector.update(Some(&slot), t0);
        assert!(matches!(
            detector.update(Some(&slot), t0 + ms(60)),
            Some(DwellEvent::Progress { .. })
        ));
        assert_eq!(
            detector.update(Some(&slot), t0 + ms(101)),
            Some(DwellEvent::Selected { target: slot })
        );
    }

    #[test]
    fn test_step_is_pure() {
        let timings = DwellTimings::uniform(200);
        let t0 = Instant::now();
        let a = TargetId::Phrase("YES".into());

        let (s1, e1) = DwellState::Idle.step(Some(&a), t0, &timings);
        assert_eq!(e1, Some(DwellEvent::Started { target: a.clone() }));
        assert!((s1.progress_at(t0 + ms(100)) - 0.5).abs() < 1e-9);

        let (s2, e2) = s1.clone().step(Some(&a), t0 + ms(100), &timings);
        assert!(matches!(e2, Some(DwellEvent::Progress { progress, .. }) if (progress - 0.5).abs() < 1e-9));
        assert_eq!(s2, s1);

        let (s3, e3) = s2.step(Some(&a), t0 + ms(200), &timings);
        assert_eq!(s3, DwellState::Idle);
        assert_eq!(e3, Some(DwellEvent::Selected { target: a }));
    }

    #[test]
    fn test_no_samples_never_completes() {
        let mut detector = DwellDetector::new(DwellTimings::default());
        let a = TargetId::Letter('A');
        detector.update(Some(&a), Instant::now());
        // No further ticks: state simply stays Dwelling.
        assert!(detector.is_dwelling());
        assert_eq!(detector.progress(), 0.0);
    }
}
