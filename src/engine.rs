use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use tracing::instrument;

use crate::{
  events::{EventSink, ProgressEvent},
  matching::profile::ProductNameProfile,
  model::{RowContext, RowUpdate},
  scoring::score_candidates,
  sheet::SheetStore,
  storefront::StorefrontProvider,
};

#[derive(Clone, Copy, Debug, Serialize)]
pub struct RunSummary {
  pub rows_processed: usize,
  pub stopped: bool,
}

/// Reconcile every sheet row of one category against the storefront menu.
///
/// Rows are processed sequentially so the storefront sees at most one
/// request in flight per run. A storefront failure marks its row with the
/// placeholder and moves on; only the stop flag ends the run early.
#[instrument(skip_all, fields(category))]
pub async fn run<P, S, E>(storefront: &P, sheet: &S, sink: &E, category: &str, stop: &AtomicBool) -> RunSummary
where
  P: StorefrontProvider,
  S: SheetStore + ?Sized,
  E: EventSink + ?Sized,
{
  let rows = sheet
    .rows()
    .iter()
    .enumerate()
    .filter(|(_, row)| row.category == category)
    .map(|(index, row)| (index, row.clone()))
    .collect::<Vec<_>>();

  tracing::info!(rows = rows.len(), "starting run");

  let mut rows_processed = 0;
  let mut stopped = false;

  for (index, row) in rows {
    if stop.load(Ordering::Relaxed) {
      tracing::info!(row = index, "run stopped");

      stopped = true;
      break;
    }

    let ctx = RowContext::for_row(index, &row);
    let target = ProductNameProfile::parse(&row.product_name, &row.brand, &row.category);

    sink.emit(ProgressEvent::parsed(index, &target));

    let listings = match storefront.fetch_listings(&ctx).await {
      Ok(listings) => listings,

      Err(err) => {
        tracing::warn!(row = index, error = %err, "storefront fetch failed");

        sheet.write_row(index, RowUpdate::placeholder());
        sink.emit(ProgressEvent::RowFailed { row_index: index, reason: err.to_string() });

        rows_processed += 1;
        continue;
      }
    };

    let candidates = listings
      .into_iter()
      .map(|listing| (ProductNameProfile::parse(&listing.name, &row.brand, &row.category), listing))
      .collect::<Vec<_>>();

    let result = score_candidates(&ctx, &target, &candidates);

    sheet.write_row(index, RowUpdate::from(&result));

    if result.is_match() {
      tracing::debug!(row = index, matches = result.urls.len(), best = ?result.best_match_name, "row matched");

      sink.emit(ProgressEvent::matched(index, &row.product_name, &result));
    } else {
      sink.emit(ProgressEvent::no_match(index, &row.product_name, result.threshold));
    }

    rows_processed += 1;
  }

  sink.emit(ProgressEvent::Finished { rows_processed, stopped });

  RunSummary { rows_processed, stopped }
}
