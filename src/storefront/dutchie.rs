use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::instrument;

use crate::{
  error::EngineError,
  model::{Listing, PLACEHOLDER, RowContext},
  storefront::StorefrontProvider,
  weights::{grams_to_ounces, weight_variants},
};

static PRODUCT_TILE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div[data-testid='product-list-item']").unwrap());
static PRODUCT_NAME: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div[class*='full-card__Name']").unwrap());
static PRODUCT_POTENCY: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div[class*='full-card__Potency'] > div").unwrap());
static OPTION_TILE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("button[data-testid='option-tile']").unwrap());
static ORIGINAL_PRICE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("span[class*='OriginalPrice']").unwrap());
static PRICE_TAG: LazyLock<Selector> = LazyLock::new(|| Selector::parse("b").unwrap());
static PRODUCT_LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());

static THC_VALUE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)THC:\s*(.*)").unwrap());

/// Client for an embedded Dutchie menu. Navigation happens entirely through
/// `dtche[...]` query parameters on the host page, so one GET per sheet row
/// lands on an already-filtered product list.
#[derive(Clone)]
pub struct DutchieStorefront {
  client: reqwest::Client,
  menu_url: String,
}

impl DutchieStorefront {
  pub fn new(menu_url: &str, timeout: std::time::Duration) -> Result<DutchieStorefront, EngineError> {
    let client = reqwest::Client::builder()
      .timeout(timeout)
      .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
      .build()?;

    Ok(DutchieStorefront {
      client,
      menu_url: menu_url.trim_end_matches('/').to_string(),
    })
  }

  async fn fetch_page(&self, ctx: &RowContext, weight: Option<&str>) -> Result<Vec<Listing>, EngineError> {
    let mut params = vec![("dtche[sortby]".to_string(), "relevance".to_string()), ("dtche[category]".to_string(), ctx.site_category.to_lowercase())];

    if ctx.brand_filtered {
      params.push(("dtche[brandName]".to_string(), ctx.site_brand.clone()));
    }

    if let Some(weight) = weight {
      params.push(("dtche[weight]".to_string(), weight.to_string()));
    }

    tracing::debug!(url = self.menu_url, ?params, "fetching menu page");

    let body = self.client.get(&self.menu_url).query(&params).send().await?.error_for_status()?.text().await?;

    Ok(parse_listings(&body, &self.menu_url))
  }
}

impl StorefrontProvider for DutchieStorefront {
  async fn health(&self) -> Result<(), EngineError> {
    self.client.head(&self.menu_url).send().await?.error_for_status()?;

    Ok(())
  }

  #[instrument(skip_all, fields(row = ctx.row_index, category = %ctx.site_category))]
  async fn fetch_listings(&self, ctx: &RowContext) -> Result<Vec<Listing>, EngineError> {
    let Some(weight) = ctx.weight_filtered.then_some(ctx.normalized_weight.as_str()).filter(|weight| !weight.is_empty()) else {
      return self.fetch_page(ctx, None).await;
    };

    // Menus spell some weights without the leading zero, and list flower
    // weights above an eighth as ounce fractions. Try each label until one
    // yields tiles.
    let mut labels = weight_variants(weight);
    labels.extend(ounce_label(weight));

    let mut listings = Vec::new();

    for (attempt, label) in labels.iter().enumerate() {
      if attempt > 0 {
        tracing::debug!(label, "retrying weight filter");
      }

      listings = self.fetch_page(ctx, Some(label)).await?;

      if !listings.is_empty() {
        break;
      }
    }

    Ok(listings)
  }
}

fn ounce_label(weight: &str) -> Option<String> {
  let grams = weight.strip_suffix('g').filter(|prefix| !prefix.ends_with('m'))?;

  grams.trim().parse::<f64>().ok().map(grams_to_ounces)
}

/// Extract product tiles from a rendered menu page. Absent price or potency
/// nodes degrade to the placeholder rather than dropping the tile.
fn parse_listings(html: &str, menu_url: &str) -> Vec<Listing> {
  let document = Html::parse_document(html);

  document
    .select(&PRODUCT_TILE)
    .filter_map(|tile| {
      let name = text_of(tile.select(&PRODUCT_NAME).next()?);

      let url = tile
        .select(&PRODUCT_LINK)
        .next()
        .and_then(|link| link.attr("href"))
        .map(|href| if href.starts_with("http") { href.to_string() } else { format!("{menu_url}{href}") })
        .unwrap_or_else(|| PLACEHOLDER.to_string());

      let thc_content = tile.select(&PRODUCT_POTENCY).next().map(|node| clean_thc_value(&text_of(node))).unwrap_or_else(|| PLACEHOLDER.to_string());

      let (discounted_price, original_price) = match tile.select(&OPTION_TILE).next() {
        Some(option) => prices_of(option),
        None => (PLACEHOLDER.to_string(), PLACEHOLDER.to_string()),
      };

      Some(Listing {
        name,
        url,
        discounted_price,
        original_price,
        thc_content,
      })
    })
    .collect()
}

/// A struck-through original price next to the bold one means the tile is
/// discounted; a lone bold price is the regular one.
fn prices_of(option: ElementRef<'_>) -> (String, String) {
  let bold = option.select(&PRICE_TAG).next().map(text_of);

  match option.select(&ORIGINAL_PRICE).next().map(text_of) {
    Some(original) => (bold.unwrap_or_else(|| PLACEHOLDER.to_string()), original),
    None => (PLACEHOLDER.to_string(), bold.unwrap_or_else(|| PLACEHOLDER.to_string())),
  }
}

fn clean_thc_value(raw: &str) -> String {
  match THC_VALUE_RE.captures(raw) {
    Some(captures) => captures[1].trim().to_string(),
    None => raw.trim().to_string(),
  }
}

fn text_of(node: ElementRef<'_>) -> String {
  node.text().collect::<String>().trim().to_string()
}
