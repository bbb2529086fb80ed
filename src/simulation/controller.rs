use anyhow::{bail, Context, Result};
use log::info;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::pipeline::{GazeSession, SessionEvent};

use super::loop_worker::{simulation_loop, LoopTiming};
use super::{GazeWanderer, SimulationConfig};

/// Owns the running simulation task, if any.
pub struct SimulationController {
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
    tick_interval: Duration,
    heartbeat_every_ticks: u32,
}

impl SimulationController {
    pub fn new(tick_interval: Duration, debug_mode: bool) -> Self {
        let ticks_per_sec = (1000 / tick_interval.as_millis().max(1)).max(1) as u32;
        Self {
            handle: None,
            cancel_token: None,
            tick_interval,
            heartbeat_every_ticks: if debug_mode {
                ticks_per_sec
            } else {
                ticks_per_sec * 60
            },
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Spawns the tick loop over `session`. Returns the event stream.
    pub fn start(
        &mut self,
        session: Arc<Mutex<GazeSession>>,
        config: &SimulationConfig,
    ) -> Result<mpsc::UnboundedReceiver<SessionEvent>> {
        if self.handle.is_some() {
            bail!("simulation already running");
        }

        let cancel_token = CancellationToken::new();
        let token_clone = cancel_token.clone();
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let timing = LoopTiming {
            tick_interval: self.tick_interval,
            heartbeat_every_ticks: self.heartbeat_every_ticks,
        };
        let handle = tokio::spawn(simulation_loop(
            session,
            GazeWanderer::new(config),
            timing,
            events_tx,
            token_clone,
        ));

        info!("simulation started");
        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        Ok(events_rx)
    }

    pub async fn stop(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            handle
                .await
                .context("simulation loop task failed to join")
                .map(|_| ())
        } else {
            Ok(())
        }
    }
}

impl Drop for SimulationController {
    fn drop(&mut self) {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::PipelineConfig;

    fn session() -> Arc<Mutex<GazeSession>> {
        Arc::new(Mutex::new(GazeSession::new(&PipelineConfig::default(), None)))
    }

    #[tokio::test]
    async fn test_start_twice_fails() {
        let mut controller = SimulationController::new(Duration::from_millis(5), false);
        let shared = session();
        let config = SimulationConfig {
            seed: Some(9),
            ..SimulationConfig::default()
        };

        let _events = controller.start(Arc::clone(&shared), &config).unwrap();
        assert!(controller.is_running());
        assert!(controller.start(Arc::clone(&shared), &config).is_err());

        controller.stop().await.unwrap();
        assert!(!controller.is_running());
    }

    #[tokio::test]
    async fn test_stop_without_start_is_ok() {
        let mut controller = SimulationController::new(Duration::from_millis(50), true);
        controller.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_restart_after_stop() {
        let mut controller = SimulationController::new(Duration::from_millis(5), false);
        let shared = session();
        let config = SimulationConfig::default();

        let _first = controller.start(Arc::clone(&shared), &config).unwrap();
        controller.stop().await.unwrap();
        let _second = controller.start(Arc::clone(&shared), &config).unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        controller.stop().await.unwrap();

        assert!(shared.lock().await.pipeline().screen_point().is_some());
    }
}
