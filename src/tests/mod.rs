
use crate::model::{Listing, PLACEHOLDER, SheetRow};

#[bon::builder]
pub fn listing(#[builder(start_fn)] name: &str, url: Option<&str>, discounted_price: Option<&str>, original_price: Option<&str>, thc_content: Option<&str>) -> Listing {
  Listing {
    name: name.to_string(),
    url: url.unwrap_or(PLACEHOLDER).to_string(),
    discounted_price: discounted_price.unwrap_or(PLACEHOLDER).to_string(),
    original_price: original_price.unwrap_or(PLACEHOLDER).to_string(),
    thc_content: thc_content.unwrap_or(PLACEHOLDER).to_string(),
  }
}

#[bon::builder]
pub fn sheet_row(#[builder(start_fn)] product_name: &str, category: Option<&str>, brand: Option<&str>, weight: Option<&str>) -> SheetRow {
  SheetRow {
    category: category.unwrap_or_default().to_string(),
    brand: brand.unwrap_or_default().to_string(),
    weight: weight.unwrap_or_default().to_string(),
    product_name: product_name.to_string(),
  }
}
