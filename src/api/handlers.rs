use std::sync::{Arc, atomic::Ordering};

use axum::{
  Json,
  body::Bytes,
  extract::{Path, State},
  http::{StatusCode, header},
  response::IntoResponse,
};
use tracing::{Instrument, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::{
  api::{
    AppState, RunHandle,
    dto::{CategoryCount, RunCreated, RunRequest, RunStatus, SheetSummary},
    errors::AppError,
    prune_finished_runs,
  },
  engine,
  sheet::{SheetStore, XlsxSheet},
  storefront::StorefrontProvider,
};

pub(super) async fn not_found() -> impl IntoResponse {
  AppError::ResourceNotFound
}

pub(super) async fn healthz() -> StatusCode {
  StatusCode::OK
}

pub(super) async fn readyz<P: StorefrontProvider>(State(state): State<AppState<P>>) -> StatusCode {
  match state.storefront.health().await {
    Ok(()) => StatusCode::OK,

    Err(err) => {
      tracing::warn!(error = %err, "storefront is not reachable");

      StatusCode::SERVICE_UNAVAILABLE
    }
  }
}

#[instrument(skip_all)]
pub(super) async fn upload_sheet<P: StorefrontProvider>(State(state): State<AppState<P>>, body: Bytes) -> Result<(StatusCode, Json<SheetSummary>), AppError> {
  let sheet = XlsxSheet::from_bytes(&body, &state.config.sheet_name)?;
  let summary = summarize(&state.config.sheet_name, &sheet);

  *state.sheet.write().await = Some(Arc::new(sheet));

  Ok((StatusCode::CREATED, Json(summary)))
}

#[instrument(skip_all)]
pub(super) async fn download_sheet<P: StorefrontProvider>(State(state): State<AppState<P>>) -> Result<impl IntoResponse, AppError> {
  let guard = state.sheet.read().await;
  let sheet = guard.as_ref().ok_or(AppError::NoSheet)?;

  let bytes = sheet.to_bytes()?;

  let headers = [
    (header::CONTENT_TYPE, "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet".to_string()),
    (header::CONTENT_DISPOSITION, format!(r#"attachment; filename="{}.xlsx""#, state.config.sheet_name)),
  ];

  Ok((headers, bytes))
}

#[instrument(skip_all, fields(category = %body.category))]
pub(super) async fn create_run<P: StorefrontProvider>(State(state): State<AppState<P>>, Json(body): Json<RunRequest>) -> Result<(StatusCode, Json<RunCreated>), AppError> {
  body.validate()?;

  let sheet = {
    let guard = state.sheet.read().await;

    Arc::clone(guard.as_ref().ok_or(AppError::NoSheet)?)
  };

  if !sheet.rows().iter().any(|row| row.category == body.category) {
    return Err(AppError::BadRequest(format!("no rows with category {}", body.category)));
  }

  let id = Uuid::new_v4();
  let handle = RunHandle::new(&body.category);

  {
    let mut runs = state.runs.write().await;

    prune_finished_runs(&mut runs);
    runs.insert(id, handle.clone());
  }

  tokio::spawn(
    {
      let storefront = state.storefront.clone();

      async move {
        let summary = engine::run(&storefront, sheet.as_ref(), handle.log.as_ref(), &handle.category, &handle.stop).await;

        handle.finished.store(true, Ordering::Relaxed);

        tracing::info!(run = %id, rows = summary.rows_processed, stopped = summary.stopped, "run finished");
      }
    }
    .in_current_span(),
  );

  Ok((StatusCode::ACCEPTED, Json(RunCreated { id })))
}

pub(super) async fn run_status<P: StorefrontProvider>(State(state): State<AppState<P>>, Path(id): Path<Uuid>) -> Result<Json<RunStatus>, AppError> {
  let runs = state.runs.read().await;
  let handle = runs.get(&id).ok_or(AppError::ResourceNotFound)?;

  Ok(Json(RunStatus {
    id,
    category: handle.category.clone(),
    started_at: handle.started_at,
    finished: handle.finished.load(Ordering::Relaxed),
    stop_requested: handle.stop.load(Ordering::Relaxed),
    events: handle.log.events(),
  }))
}

pub(super) async fn stop_run<P: StorefrontProvider>(State(state): State<AppState<P>>, Path(id): Path<Uuid>) -> Result<StatusCode, AppError> {
  let runs = state.runs.read().await;
  let handle = runs.get(&id).ok_or(AppError::ResourceNotFound)?;

  handle.stop.store(true, Ordering::Relaxed);

  Ok(StatusCode::NO_CONTENT)
}

fn summarize(name: &str, sheet: &XlsxSheet) -> SheetSummary {
  SheetSummary {
    sheet: name.to_string(),
    rows: sheet.rows().len(),
    categories: sheet.categories().into_iter().map(|(category, rows)| CategoryCount { category, rows }).collect(),
  }
}
