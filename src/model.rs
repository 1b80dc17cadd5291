use serde::{Deserialize, Serialize};

use crate::{
  lexicon::{BRANDS, CATEGORIES},
  weights::normalize_weight,
};

/// The placeholder written to every output cell of a row without a match.
pub const PLACEHOLDER: &str = " ";

/// One row of the pricing sheet, as read from the workbook.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct SheetRow {
  pub category: String,
  pub brand: String,
  pub weight: String,
  pub product_name: String,
}

/// One listing scraped from the storefront menu. All fields arrive as page
/// text; absent price/THC nodes degrade to the placeholder.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Listing {
  pub name: String,
  pub url: String,
  pub discounted_price: String,
  pub original_price: String,
  pub thc_content: String,
}

/// Navigation and matching context for one sheet row, resolved once per row
/// from the lexicon tables. Decouples per-row state from the storefront
/// client's lifecycle.
#[derive(Clone, Debug)]
pub struct RowContext {
  pub row_index: usize,
  pub category: String,
  pub site_category: String,
  pub brand: String,
  pub site_brand: String,
  pub normalized_weight: String,
  /// Whether the storefront can pre-filter this category by weight. When it
  /// cannot, the weight gate verifies equality instead.
  pub weight_filtered: bool,
  pub brand_filtered: bool,
}

impl RowContext {
  pub fn for_row(row_index: usize, row: &SheetRow) -> RowContext {
    let site_category = CATEGORIES.site_category(&row.category);

    RowContext {
      row_index,
      category: row.category.clone(),
      site_category: site_category.clone(),
      brand: row.brand.clone(),
      site_brand: BRANDS.site_brand(&row.brand),
      normalized_weight: normalize_weight(&row.weight),
      weight_filtered: CATEGORIES.weight_filtered(&site_category),
      brand_filtered: CATEGORIES.brand_filtered(&site_category),
    }
  }
}

/// The outcome of matching one sheet row against the scraped candidates.
/// The four lists stay aligned by candidate index; the best pair is kept for
/// display only.
#[derive(Clone, Debug, Default, Serialize)]
pub struct MatchResult {
  pub threshold: f64,
  pub urls: Vec<String>,
  pub discounted_prices: Vec<String>,
  pub original_prices: Vec<String>,
  pub thc_contents: Vec<String>,
  pub best_match_name: Option<String>,
  pub best_score: f64,
}

impl MatchResult {
  pub fn empty(threshold: f64) -> MatchResult {
    MatchResult { threshold, ..Default::default() }
  }

  pub fn is_match(&self) -> bool {
    !self.urls.is_empty()
  }
}

/// The values persisted back into one sheet row.
#[derive(Clone, Debug, Serialize)]
pub struct RowUpdate {
  pub discounted_price: String,
  pub original_price: String,
  pub thc_content: String,
  pub url: String,
}

impl RowUpdate {
  pub fn placeholder() -> RowUpdate {
    RowUpdate {
      discounted_price: PLACEHOLDER.to_string(),
      original_price: PLACEHOLDER.to_string(),
      thc_content: PLACEHOLDER.to_string(),
      url: PLACEHOLDER.to_string(),
    }
  }
}

impl From<&MatchResult> for RowUpdate {
  fn from(result: &MatchResult) -> RowUpdate {
    if !result.is_match() {
      return RowUpdate::placeholder();
    }

    RowUpdate {
      discounted_price: result.discounted_prices.join(", "),
      original_price: result.original_prices.join(", "),
      thc_content: result.thc_contents.join(", "),
      url: result.urls.join(", "),
    }
  }
}
