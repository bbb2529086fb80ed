pub mod calibration;
pub mod compose;
pub mod dwell;
pub mod layout;
pub mod models;
pub mod pipeline;
pub mod prediction;
pub mod resolver;
pub mod settings;
pub mod simulation;
pub mod smoothing;
pub mod utils;

use anyhow::{Context, Result};
use log::{info, warn};
use std::{path::PathBuf, sync::Arc, time::Duration};
use tokio::sync::Mutex;

use pipeline::{GazeSession, SessionEvent};
use prediction::{HttpPredictor, Predictor};
use settings::{PipelineConfig, SettingsStore};
use simulation::SimulationController;

pub const SETTINGS_PATH_ENV: &str = "GAZEBOARD_SETTINGS";
const DEFAULT_SETTINGS_FILE: &str = "gazeboard.json";

/// Remote predictor for `config`, if an endpoint is configured.
pub fn build_predictor(config: &PipelineConfig) -> Option<Arc<dyn Predictor>> {
    let endpoint = config.prediction.endpoint.as_ref()?;
    let timeout = Duration::from_millis(config.prediction.remote_timeout_ms);
    info!("remote predictions from {}", endpoint);
    let predictor: Arc<dyn Predictor> = Arc::new(HttpPredictor::new(endpoint.clone(), timeout));
    Some(predictor)
}

/// Runs a simulated session: calibrates against the wandering gaze, then
/// types on the default board until Ctrl-C.
pub fn run() -> Result<()> {
    utils::logging::init(log::LevelFilter::Info);

    info!("gazeboard starting up...");

    let settings_path = std::env::var_os(SETTINGS_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE));
    let store = SettingsStore::new(settings_path)?;
    let mut config = store.config()?;
    config.apply_env_overrides();
    config
        .validate()
        .with_context(|| format!("invalid settings in {}", store.path().display()))?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    runtime.block_on(simulate(config))
}

async fn simulate(config: PipelineConfig) -> Result<()> {
    let session = GazeSession::new(&config, build_predictor(&config));
    info!(
        "session {} started ({} predictions)",
        session.id(),
        if session.pipeline().prediction_engine().has_remote() {
            "remote"
        } else {
            "local"
        }
    );

    let session = Arc::new(Mutex::new(session));
    session.lock().await.pipeline_mut().start_calibration();

    let mut controller = SimulationController::new(
        Duration::from_millis(config.tick_interval_ms),
        config.debug,
    );
    let mut events = controller.start(Arc::clone(&session), &config.simulation)?;

    let interrupted = tokio::signal::ctrl_c();
    tokio::pin!(interrupted);

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(SessionEvent::Selected { target, message }) => {
                    info!("selected {} -> {:?}", target, message);
                }
                Some(SessionEvent::CalibrationComplete) => info!("calibration ready"),
                Some(SessionEvent::CalibrationFailed { reason }) => {
                    warn!("calibration failed ({}); restarting", reason);
                    session.lock().await.pipeline_mut().start_calibration();
                }
                None => break,
            },
            _ = &mut interrupted => {
                info!("interrupted");
                break;
            }
        }
    }

    controller.stop().await?;
    info!("final message: {:?}", session.lock().await.message());
    Ok(())
}
