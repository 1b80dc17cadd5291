use std::{
  collections::HashMap,
  sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
  },
};

use ahash::RandomState;
use axum::{
  Router,
  extract::{DefaultBodyLimit, Request},
  routing::{get, post},
};
use jiff::Timestamp;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::{api::config::Config, events::RunLog, sheet::XlsxSheet, storefront::StorefrontProvider};

pub mod config;
pub mod dto;
pub mod errors;

mod handlers;

#[derive(Clone)]
pub struct AppState<P: StorefrontProvider> {
  pub config: Config,
  pub storefront: P,
  pub sheet: Arc<RwLock<Option<Arc<XlsxSheet>>>>,
  pub runs: Arc<RwLock<HashMap<Uuid, RunHandle, RandomState>>>,
}

/// Bookkeeping for one background run. The stop flag is the only way to
/// influence a run once spawned; everything else is read-only status.
#[derive(Clone)]
pub struct RunHandle {
  pub category: String,
  pub started_at: Timestamp,
  pub stop: Arc<AtomicBool>,
  pub finished: Arc<AtomicBool>,
  pub log: Arc<RunLog>,
}

impl RunHandle {
  pub fn new(category: &str) -> RunHandle {
    RunHandle {
      category: category.to_string(),
      started_at: Timestamp::now(),
      stop: Arc::default(),
      finished: Arc::default(),
      log: Arc::default(),
    }
  }
}

/// Finished runs kept around for status queries. Each handle holds a full
/// event log, so the oldest get evicted once this many have completed.
const MAX_FINISHED_RUNS: usize = 32;

pub(crate) fn prune_finished_runs(runs: &mut HashMap<Uuid, RunHandle, RandomState>) {
  let mut finished = runs
    .iter()
    .filter(|(_, handle)| handle.finished.load(Ordering::Relaxed))
    .map(|(id, handle)| (*id, handle.started_at))
    .collect::<Vec<_>>();

  let excess = finished.len().saturating_sub(MAX_FINISHED_RUNS);

  if excess == 0 {
    return;
  }

  finished.sort_by_key(|(_, started_at)| *started_at);

  for (id, _) in finished.into_iter().take(excess) {
    tracing::debug!(run = %id, "evicting finished run");

    runs.remove(&id);
  }
}

pub fn routes<P: StorefrontProvider>(config: &Config, storefront: P) -> Router {
  let state = AppState {
    config: config.clone(),
    storefront,
    sheet: Arc::default(),
    runs: Arc::default(),
  };

  Router::new()
    .route("/sheet", post(handlers::upload_sheet).get(handlers::download_sheet))
    .layer(DefaultBodyLimit::max(32 * 1024 * 1024))
    .route("/runs", post(handlers::create_run))
    .route("/runs/{id}", get(handlers::run_status).delete(handlers::stop_run))
    .fallback(handlers::not_found)
    .layer(TraceLayer::new_for_http().make_span_with(|_req: &Request| {
      let request_id = Uuid::new_v4();

      tracing::info_span!("request", %request_id)
    }))
    // The probes below will not go through the request span above
    .route("/healthz", get(handlers::healthz))
    .route("/readyz", get(handlers::readyz))
    .with_state(state)
}
