use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::events::ProgressEvent;

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct RunRequest {
  #[validate(length(min = 1, message = "category must not be empty"))]
  pub category: String,
}

#[derive(Serialize)]
pub struct SheetSummary {
  pub sheet: String,
  pub rows: usize,
  pub categories: Vec<CategoryCount>,
}

#[derive(Serialize)]
pub struct CategoryCount {
  pub category: String,
  pub rows: usize,
}

#[derive(Serialize)]
pub struct RunCreated {
  pub id: Uuid,
}

#[derive(Serialize)]
pub struct RunStatus {
  pub id: Uuid,
  pub category: String,
  pub started_at: Timestamp,
  pub finished: bool,
  pub stop_requested: bool,
  pub events: Vec<ProgressEvent>,
}
