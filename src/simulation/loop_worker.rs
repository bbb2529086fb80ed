use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::time::{Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::pipeline::{CalibrationStatus, GazeSession, SessionEvent};

use super::GazeWanderer;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info, log_warn};

/// Timing for one simulation run.
#[derive(Debug, Clone, Copy)]
pub struct LoopTiming {
    pub tick_interval: Duration,
    /// Log a heartbeat every this many ticks.
    pub heartbeat_every_ticks: u32,
}

/// Drives `session` from `wanderer` on a fixed interval until cancelled.
///
/// While the session is calibrating the wanderer fixates on the current
/// calibration target, the way a cooperating user would. Events go to
/// `events`; a dropped receiver does not stop the loop.
pub async fn simulation_loop(
    session: Arc<Mutex<GazeSession>>,
    mut wanderer: GazeWanderer,
    timing: LoopTiming,
    events: mpsc::UnboundedSender<SessionEvent>,
    cancel_token: CancellationToken,
) {
    let mut ticker = tokio::time::interval(timing.tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let heartbeat_every = timing.heartbeat_every_ticks.max(1);
    let mut ticks: u64 = 0;

    log_info!(
        "simulation loop started ({}ms ticks)",
        timing.tick_interval.as_millis()
    );

    loop {
        tokio::select! {
            instant = ticker.tick() => {
                let now = instant.into_std();
                let mut guard = session.lock().await;

                let fixation = match guard.calibration_status() {
                    CalibrationStatus::Collecting { target, .. } => target,
                    _ => None,
                };
                wanderer.fixate(fixation);

                let sample = wanderer.sample(now);
                let (snapshot, produced) = guard.step(&sample, now);

                for event in produced {
                    if let SessionEvent::CalibrationFailed { reason } = &event {
                        log_warn!("simulated calibration failed: {}", reason);
                    }
                    let _ = events.send(event);
                }

                ticks += 1;
                if ticks % u64::from(heartbeat_every) == 0 {
                    log_debug!(
                        "tick {}: point={:?} hovered={:?} progress={:.2} message={:?}",
                        ticks,
                        snapshot.screen_point,
                        snapshot.hovered_target,
                        snapshot.dwell_progress,
                        guard.message()
                    );
                }
            }
            _ = cancel_token.cancelled() => {
                log_info!("simulation loop shutting down after {} ticks", ticks);
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::PipelineConfig;
    use crate::simulation::SimulationConfig;

    fn timing() -> LoopTiming {
        LoopTiming {
            tick_interval: Duration::from_millis(5),
            heartbeat_every_ticks: 10,
        }
    }

    #[tokio::test]
    async fn test_loop_feeds_session_until_cancelled() {
        let session = Arc::new(Mutex::new(GazeSession::new(&PipelineConfig::default(), None)));
        let wanderer = GazeWanderer::seeded(&SimulationConfig::default(), 11);
        let (tx, _rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let handle = tokio::spawn(simulation_loop(
            Arc::clone(&session),
            wanderer,
            timing(),
            tx,
            cancel.clone(),
        ));

        tokio::time::sleep(Duration::from_millis(60)).await;
        cancel.cancel();
        handle.await.unwrap();

        assert!(session.lock().await.pipeline().screen_point().is_some());
    }

    #[tokio::test]
    async fn test_loop_exits_when_already_cancelled() {
        let session = Arc::new(Mutex::new(GazeSession::new(&PipelineConfig::default(), None)));
        let wanderer = GazeWanderer::seeded(&SimulationConfig::default(), 5);
        let (tx, _rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        cancel.cancel();

        tokio::time::timeout(
            Duration::from_secs(1),
            simulation_loop(session, wanderer, timing(), tx, cancel),
        )
        .await
        .unwrap();
    }
}
