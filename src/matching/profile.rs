use std::collections::HashSet;

use ahash::RandomState;
use serde::Serialize;

use crate::{
  lexicon::{self, CATEGORIES, STOPWORDS},
  matching::extractors,
};

/// The only unit class the engine normalizes: pack/count-style quantities.
/// Mass and volume stay as weight tokens.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitClass {
  Count,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Quantity {
  pub number: f64,
  pub unit: UnitClass,
}

/// The structured token profile of one product name, derived once from the
/// raw text plus the row's brand/category context. Immutable after
/// construction.
#[derive(Clone, Debug, Serialize)]
pub struct ProductNameProfile {
  pub raw_name: String,
  pub quantity: Option<Quantity>,
  pub ratio_spans: Vec<String>,
  pub weight_tokens: Vec<String>,
  pub flavors: HashSet<String, RandomState>,
  pub keyword_tokens: HashSet<String, RandomState>,
}

impl ProductNameProfile {
  /// Tokenize and normalize a product name. `brand` and `category` only feed
  /// the exclusion sets and may be empty; `category` is translated through
  /// the category mapping before tokenization.
  pub fn parse(raw_name: &str, brand: &str, category: &str) -> ProductNameProfile {
    let brand_tokens = extractors::exclusion_tokens(brand);
    let category_tokens = category_exclusions(category);

    let quantity = extractors::extract_quantity(raw_name).map(|number| Quantity { number, unit: UnitClass::Count });
    let quantity_excluded = extractors::quantity_exclusions(raw_name);
    let ratio_spans = extractors::ratio_spans(raw_name);
    let ratio_excluded = extractors::ratio_exclusions(raw_name);
    let flavors = lexicon::find_flavors(raw_name);

    let collapsed = extractors::collapsed_tokens(raw_name);
    let weight_tokens = collapsed.iter().filter(|token| extractors::WEIGHT_TOKEN_RE.is_match(token)).cloned().collect::<Vec<_>>();

    // Flavor tokens are deliberately kept: the flavor gate is enforced
    // separately, but flavor words still count toward the overlap score.
    let keyword_tokens = collapsed
      .iter()
      .map(|token| token.to_lowercase())
      .filter(|token| {
        !extractors::WEIGHT_TOKEN_RE.is_match(token)
          && !quantity_excluded.contains(token)
          && !ratio_excluded.contains(token)
          && !brand_tokens.contains(token)
          && !STOPWORDS.contains(token)
          && !category_tokens.contains(token)
          && !(token.ends_with('s') && category_tokens.contains(&token[..token.len() - 1]))
      })
      .collect();

    ProductNameProfile {
      raw_name: raw_name.to_string(),
      quantity,
      ratio_spans,
      weight_tokens,
      flavors,
      keyword_tokens,
    }
  }
}

/// Category exclusion tokens: the storefront spelling of the category,
/// tokenized and lowercased, with a depluralized form for each token.
fn category_exclusions(category: &str) -> HashSet<String, RandomState> {
  let mut tokens: HashSet<String, RandomState> = HashSet::default();

  for token in extractors::exclusion_tokens(&CATEGORIES.site_category(category)) {
    if let Some(singular) = token.strip_suffix('s') {
      tokens.insert(singular.to_string());
    }

    tokens.insert(token);
  }

  tokens
}

#[cfg(test)]
mod tests {
  use std::collections::HashSet;

  use ahash::RandomState;

  use super::{ProductNameProfile, Quantity, UnitClass};
  use crate::matching::extractors;

  fn set<const N: usize>(items: [&str; N]) -> HashSet<String, RandomState> {
    items.into_iter().map(ToOwned::to_owned).collect()
  }

  #[test]
  fn flower_profile() {
    let profile = ProductNameProfile::parse("Blue Dream 3.5g", "Acme", "FLOWER");

    assert_eq!(profile.weight_tokens, vec!["3.5g"]);
    assert_eq!(profile.keyword_tokens, set(["blue", "dream"]));
    assert!(profile.quantity.is_none());
    assert!(profile.flavors.is_empty());
  }

  #[test]
  fn edible_profile() {
    let profile = ProductNameProfile::parse("Gummy 10 pk Mango", "Acme", "EDIBLE");

    assert_eq!(profile.quantity, Some(Quantity { number: 10.0, unit: UnitClass::Count }));
    assert_eq!(profile.flavors, set(["mango"]));
    // "mango" stays in the keyword set even though it is a flavor.
    assert_eq!(profile.keyword_tokens, set(["gummy", "mango"]));
  }

  #[test]
  fn ratio_tokens_are_excluded() {
    let profile = ProductNameProfile::parse("Relief Tincture THC:CBD 1:2", "Acme", "TINCTURE");

    assert_eq!(profile.ratio_spans, vec!["THC:CBD 1:2"]);
    assert_eq!(profile.keyword_tokens, set(["relief"]));
  }

  #[test]
  fn brand_and_category_tokens_are_excluded() {
    // "PREROLL" maps to "Pre-Rolls"; both "pre" and the depluralized "roll"
    // must vanish from the keyword set, as must the brand word.
    let profile = ProductNameProfile::parse("Acme Sunset Sherbet Pre Rolls 1g", "Acme", "PREROLL");

    assert_eq!(profile.keyword_tokens, set(["sunset", "sherbet"]));
  }

  #[test]
  fn idempotent() {
    let a = ProductNameProfile::parse("Gummy 10 pk Mango THC:CBD 1:2", "Acme", "EDIBLE");
    let b = ProductNameProfile::parse("Gummy 10 pk Mango THC:CBD 1:2", "Acme", "EDIBLE");

    assert_eq!(a.keyword_tokens, b.keyword_tokens);
    assert_eq!(a.weight_tokens, b.weight_tokens);
    assert_eq!(a.flavors, b.flavors);
    assert_eq!(a.quantity, b.quantity);
    assert_eq!(a.ratio_spans, b.ratio_spans);
  }

  #[test]
  fn tokens_partition() {
    let name = "Acme Blue Dream Gummy 10 pk THC:CBD 1:2 100mg of Mango";
    let profile = ProductNameProfile::parse(name, "Acme", "EDIBLE");

    let quantity_excluded = extractors::quantity_exclusions(name);
    let ratio_excluded = extractors::ratio_exclusions(name);
    let brand_tokens = extractors::exclusion_tokens("Acme");

    for token in extractors::collapsed_tokens(name) {
      let lowered = token.to_lowercase();

      let kept = profile.keyword_tokens.contains(&lowered);
      let excluded = profile.weight_tokens.contains(&token)
        || quantity_excluded.contains(&lowered)
        || ratio_excluded.contains(&lowered)
        || brand_tokens.contains(&lowered)
        || crate::lexicon::STOPWORDS.contains(&lowered);

      assert!(kept != excluded, "token {token} must land in exactly one bucket");
    }
  }
}
