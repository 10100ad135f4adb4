use crate::bridge::model::AnalysisModel;
use crate::generator::profile::{build_payload_from_config, GeneratorConfig};
use crate::workflow::runner::Runner;
use anyhow::Context;
use dynamics::prelude::StageInput;
use dynamics::{MultiChannelSample, RollingWindowBuffer, Sample};
use log::{error, info, warn};
use serde::Deserialize;
use serde_json::json;
use std::{
    net::SocketAddr,
    sync::{Arc, Mutex, RwLock},
    thread,
};
use tokio::runtime::Builder;
use warp::{http::StatusCode, reply, Filter, Rejection};

type SharedModel = Arc<RwLock<AnalysisModel>>;
type SharedWindow = Arc<Mutex<RollingWindowBuffer>>;
type JsonReply = reply::WithStatus<reply::Json>;

fn bind_address(port: u16) -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], port))
}

#[derive(Debug)]
struct PoisonedState;

impl warp::reject::Reject for PoisonedState {}

/// Batch body accepted by `/ingest`: scalar values or per-channel lists.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum IngestBody {
    Single(Vec<Sample>),
    Multi(Vec<MultiChannelSample>),
}

impl From<IngestBody> for StageInput {
    fn from(body: IngestBody) -> Self {
        match body {
            IngestBody::Single(samples) => StageInput::Single(samples),
            IngestBody::Multi(samples) => StageInput::Multi(samples),
        }
    }
}

fn unprocessable(err: &anyhow::Error) -> JsonReply {
    reply::with_status(
        reply::json(&json!({"status": "error", "message": format!("{:#}", err)})),
        StatusCode::UNPROCESSABLE_ENTITY,
    )
}

fn store(state: &SharedModel, model: AnalysisModel) -> Result<(), Rejection> {
    let mut guard = state
        .write()
        .map_err(|_| warp::reject::custom(PoisonedState))?;
    *guard = model;
    Ok(())
}

async fn current_model(state: SharedModel) -> Result<JsonReply, Rejection> {
    let guard = state
        .read()
        .map_err(|_| warp::reject::custom(PoisonedState))?;
    Ok(reply::with_status(reply::json(&*guard), StatusCode::OK))
}

async fn ingest(
    body: IngestBody,
    state: SharedModel,
    runner: Arc<Runner>,
) -> Result<JsonReply, Rejection> {
    match runner.execute(body.into()) {
        Ok(result) => {
            let channels = result.channels.len();
            store(&state, AnalysisModel::from_result(&result, runner.metrics()))?;
            Ok(reply::with_status(
                reply::json(&json!({"status": "ok", "channels": channels})),
                StatusCode::OK,
            ))
        }
        Err(err) => {
            warn!("ingest error: {:#}", err);
            Ok(unprocessable(&err))
        }
    }
}

async fn ingest_config(
    config: GeneratorConfig,
    state: SharedModel,
    runner: Arc<Runner>,
) -> Result<JsonReply, Rejection> {
    match build_payload_from_config(&config).and_then(|payload| runner.execute_payload(&payload))
    {
        Ok(result) => {
            let body = json!({
                "status": "ok",
                "channels": result.channels,
                "description": config.description.clone().unwrap_or_default()
            });
            store(&state, AnalysisModel::from_result(&result, runner.metrics()))?;
            Ok(reply::with_status(reply::json(&body), StatusCode::OK))
        }
        Err(err) => {
            warn!("ingest-config error: {:#}", err);
            Ok(unprocessable(&err))
        }
    }
}

/// Appends samples to the live rolling window and returns its analysis.
async fn push_samples(
    samples: Vec<Sample>,
    window: SharedWindow,
    runner: Arc<Runner>,
) -> Result<JsonReply, Rejection> {
    let mut buffer = window
        .lock()
        .map_err(|_| warp::reject::custom(PoisonedState))?;
    for sample in &samples {
        buffer.update(*sample);
    }
    let analysis = buffer.analyze_buffer();
    runner.record_live(samples.len());

    Ok(reply::with_status(
        reply::json(&json!({
            "status": "ok",
            "window_len": buffer.len(),
            "rms": analysis.rms,
            "zcr": analysis.zcr
        })),
        StatusCode::OK,
    ))
}

/// HTTP bridge that serves the latest analysis and accepts new samples.
pub struct Bridge {
    state: SharedModel,
    window: SharedWindow,
    runner: Arc<Runner>,
}

impl Bridge {
    pub fn new(runner: Arc<Runner>) -> anyhow::Result<Self> {
        let window = RollingWindowBuffer::with_capacity(runner.config().buffer_capacity)
            .context("allocating live rolling window")?;
        Ok(Self {
            state: Arc::new(RwLock::new(AnalysisModel::default())),
            window: Arc::new(Mutex::new(window)),
            runner,
        })
    }

    pub fn routes(
        &self,
    ) -> impl Filter<Extract = (JsonReply,), Error = Rejection> + Clone + Send + Sync + 'static
    {
        let state = self.state.clone();
        let window = self.window.clone();
        let runner = self.runner.clone();
        let state_filter = warp::any().map(move || state.clone());
        let window_filter = warp::any().map(move || window.clone());
        let runner_filter = warp::any().map(move || runner.clone());

        let get_route = warp::path("analysis")
            .and(warp::get())
            .and(state_filter.clone())
            .and_then(current_model);

        let ingest_route = warp::path("ingest")
            .and(warp::post())
            .and(warp::body::json())
            .and(state_filter.clone())
            .and(runner_filter.clone())
            .and_then(ingest);

        let generator_route = warp::path("ingest-config")
            .and(warp::post())
            .and(warp::body::json())
            .and(state_filter)
            .and(runner_filter.clone())
            .and_then(ingest_config);

        let samples_route = warp::path("samples")
            .and(warp::post())
            .and(warp::body::json())
            .and(window_filter)
            .and(runner_filter)
            .and_then(push_samples);

        get_route
            .or(ingest_route)
            .unify()
            .or(generator_route)
            .unify()
            .or(samples_route)
            .unify()
    }

    /// Serves the routes on a dedicated thread with its own runtime.
    pub fn serve(&self, port: u16) -> thread::JoinHandle<()> {
        let routes = self.routes();
        thread::spawn(move || {
            let runtime = match Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime,
                Err(err) => {
                    error!("failed to build bridge runtime: {}", err);
                    return;
                }
            };
            runtime.block_on(async move {
                warp::serve(routes).run(bind_address(port)).await;
            });
        })
    }

    pub fn publish(&self, model: &AnalysisModel) -> anyhow::Result<()> {
        let mut guard = self
            .state
            .write()
            .map_err(|_| anyhow::anyhow!("analysis state lock poisoned"))?;
        *guard = model.clone();
        info!(
            "published {} channel results over {} samples",
            guard.channels.len(),
            guard.sample_count
        );
        Ok(())
    }

    pub fn publish_status(&self, message: &str) {
        info!("[bridge] {}", message);
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> anyhow::Result<AnalysisModel> {
        self.state
            .read()
            .map(|guard| guard.clone())
            .map_err(|_| anyhow::anyhow!("analysis state lock poisoned"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::profile::{build_payload, ChannelProfile};
    use crate::workflow::config::WorkflowConfig;

    fn bridge() -> Bridge {
        let cfg = WorkflowConfig::from_args(&[50.0], &[1.0], 1.0, 1000, 200, 50);
        Bridge::new(Arc::new(Runner::new(cfg))).unwrap()
    }

    #[test]
    fn bridge_publish_updates_state() {
        let bridge = bridge();
        let payload = build_payload(vec![ChannelProfile::new(50.0, 1.0)], 1.0, 1000).unwrap();
        let result = bridge.runner.execute_payload(&payload).unwrap();
        let model = AnalysisModel::from_result(&result, bridge.runner.metrics());

        bridge.publish(&model).unwrap();
        assert_eq!(bridge.snapshot().unwrap(), model);
    }

    #[tokio::test]
    async fn ingest_route_analyzes_single_channel_json() {
        let bridge = bridge();
        let filter = bridge.routes();
        let samples: Vec<Sample> = (0..200)
            .map(|i| Sample::new(i as f64 * 0.01, if i % 10 < 5 { 1.0 } else { -1.0 }))
            .collect();

        let response = warp::test::request()
            .method("POST")
            .path("/ingest")
            .json(&samples)
            .reply(&filter)
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let model = bridge.snapshot().unwrap();
        assert_eq!(model.channels.len(), 1);
        assert!((model.channels[0].rms - 1.0).abs() < 1e-9);
        assert_eq!(model.sample_count, 200);

        let response = warp::test::request()
            .method("GET")
            .path("/analysis")
            .reply(&filter)
            .await;
        let body: AnalysisModel = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body, model);
    }

    #[tokio::test]
    async fn ingest_route_reports_ragged_batches() {
        let bridge = bridge();
        let filter = bridge.routes();
        let ragged = vec![
            MultiChannelSample::new(0.0, vec![1.0, 2.0]),
            MultiChannelSample::new(0.1, vec![1.0]),
        ];

        let response = warp::test::request()
            .method("POST")
            .path("/ingest")
            .json(&ragged)
            .reply(&filter)
            .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(bridge.runner.metrics().rejected, 1);
    }

    #[tokio::test]
    async fn samples_route_keeps_a_bounded_window() {
        let bridge = bridge();
        let filter = bridge.routes();
        let samples: Vec<Sample> = (0..300).map(|i| Sample::new(i as f64, 0.5)).collect();

        let response = warp::test::request()
            .method("POST")
            .path("/samples")
            .json(&samples)
            .reply(&filter)
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["window_len"], 200);
        // no crossings means no frequency estimate, so the RMS window is empty
        assert_eq!(body["rms"], 0.0);
        assert_eq!(body["zcr"], 0.0);

        let alternating: Vec<Sample> = (300..500)
            .map(|i| Sample::new(i as f64, if i % 2 == 0 { 0.5 } else { -0.5 }))
            .collect();
        let response = warp::test::request()
            .method("POST")
            .path("/samples")
            .json(&alternating)
            .reply(&filter)
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["window_len"], 200);
        let rms = body["rms"].as_f64().unwrap();
        let zcr = body["zcr"].as_f64().unwrap();
        assert!((rms - 0.5).abs() < 1e-12, "rms {}", rms);
        assert!((zcr - 0.5).abs() < 0.01, "zcr {}", zcr);
    }

    #[tokio::test]
    async fn ingest_config_route_generates_and_analyzes() {
        let bridge = bridge();
        let filter = bridge.routes();
        let config = GeneratorConfig {
            channels: vec![ChannelProfile::new(20.0, 2.0), ChannelProfile::new(80.0, 1.0)],
            description: Some("dual tone".into()),
            ..Default::default()
        };

        let response = warp::test::request()
            .method("POST")
            .path("/ingest-config")
            .json(&config)
            .reply(&filter)
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["description"], "dual tone");
        assert_eq!(bridge.snapshot().unwrap().channels.len(), 2);
    }
}
