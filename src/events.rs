use std::sync::{PoisonError, RwLock};

use itertools::Itertools;
use serde::Serialize;

use crate::{
  matching::profile::{ProductNameProfile, Quantity},
  model::MatchResult,
};

/// Structured progress events emitted by the engine, one stream per run.
/// This is the only channel between the matching core and the UI.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProgressEvent {
  ProductNameParsed {
    row_index: usize,
    target_name: String,
    weight_tokens: Vec<String>,
    quantity: Option<Quantity>,
    flavors: Vec<String>,
    keyword_tokens: Vec<String>,
  },
  MatchFound {
    row_index: usize,
    target_name: String,
    best_match_name: String,
    best_score: f64,
    urls: Vec<String>,
    discounted_prices: Vec<String>,
    original_prices: Vec<String>,
    thc_contents: Vec<String>,
  },
  NoMatch {
    row_index: usize,
    target_name: String,
    threshold: f64,
  },
  RowFailed {
    row_index: usize,
    reason: String,
  },
  Finished {
    rows_processed: usize,
    stopped: bool,
  },
}

impl ProgressEvent {
  pub fn parsed(row_index: usize, profile: &ProductNameProfile) -> ProgressEvent {
    ProgressEvent::ProductNameParsed {
      row_index,
      target_name: profile.raw_name.clone(),
      weight_tokens: profile.weight_tokens.clone(),
      quantity: profile.quantity,
      flavors: profile.flavors.iter().cloned().sorted().collect(),
      keyword_tokens: profile.keyword_tokens.iter().cloned().sorted().collect(),
    }
  }

  pub fn matched(row_index: usize, target_name: &str, result: &MatchResult) -> ProgressEvent {
    ProgressEvent::MatchFound {
      row_index,
      target_name: target_name.to_string(),
      best_match_name: result.best_match_name.clone().unwrap_or_default(),
      best_score: result.best_score,
      urls: result.urls.clone(),
      discounted_prices: result.discounted_prices.clone(),
      original_prices: result.original_prices.clone(),
      thc_contents: result.thc_contents.clone(),
    }
  }

  pub fn no_match(row_index: usize, target_name: &str, threshold: f64) -> ProgressEvent {
    ProgressEvent::NoMatch {
      row_index,
      target_name: target_name.to_string(),
      threshold,
    }
  }
}

/// Where the engine reports progress. The API keeps an append-only log per
/// run; tests can capture events directly.
pub trait EventSink: Send + Sync {
  fn emit(&self, event: ProgressEvent);
}

/// In-memory append-only event log backing the run status endpoint.
#[derive(Default)]
pub struct RunLog {
  events: RwLock<Vec<ProgressEvent>>,
}

impl RunLog {
  pub fn events(&self) -> Vec<ProgressEvent> {
    self.events.read().unwrap_or_else(PoisonError::into_inner).clone()
  }
}

impl EventSink for RunLog {
  fn emit(&self, event: ProgressEvent) {
    self.events.write().unwrap_or_else(PoisonError::into_inner).push(event);
  }
}
