use std::{collections::HashSet, sync::LazyLock};

use ahash::RandomState;
use regex::Regex;

/// A token is either a number with an optional mass/volume unit (possibly
/// separated by whitespace, "3.5 g") or a run of letters. Everything else is
/// a separator.
pub static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\d+(?:\.\d+)?(?:\s*(?:g|mg|oz))?|[A-Za-z]+").unwrap());

/// Count-style quantities: "10 pk", "30ct", "2 capsules".
pub static QUANTITY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(pack|pk|ct|capsules|capsule|count|ea|unit|qty)").unwrap());

/// Cannabinoid ratio expressions in either order, optionally bracketed:
/// "THC:CBD 1:2", "(1:1:1 THC/CBD/CBG)", "8:1 CBD/THC".
pub static RATIO_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(
    r"(?ix)
    (?:[\(\[]?\s*)?
    (?:
      (?:THC|CBD|CBG|CBN|CBC)(?:[\s/:]?(?:THC|CBD|CBG|CBN|CBC))* \s* \d+[:/]\d+(?:[:/]\d+)*
      |
      \d+[:/]\d+(?:[:/]\d+)* \s* (?:THC|CBD|CBG|CBN|CBC)(?:[\s/:]?(?:THC|CBD|CBG|CBN|CBC))*
    )
    (?:\s*[\)\]]?)?
    ",
  )
  .unwrap()
});

/// Mass/volume weight tokens, after collapsing: "3.5g", "100mg", "1oz".
pub static WEIGHT_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^\d+(?:\.\d+)?(?:g|mg|oz)$").unwrap());

/// Tokenize `text` and collapse internal whitespace, so "3.5 g" becomes
/// "3.5g". Order is preserved; case is not touched.
pub fn collapsed_tokens(text: &str) -> Vec<String> {
  TOKEN_RE.find_iter(text).map(|token| token.as_str().split_whitespace().collect::<String>()).collect()
}

/// Lowercased collapsed tokens as a set, used for brand/category exclusions.
pub fn exclusion_tokens(text: &str) -> HashSet<String, RandomState> {
  collapsed_tokens(text).into_iter().map(|token| token.to_lowercase()).collect()
}

/// The first count-style quantity in `text`, as its parsed number. All unit
/// words normalize to the same count class.
pub fn extract_quantity(text: &str) -> Option<f64> {
  QUANTITY_RE.captures(text).and_then(|captures| captures.get(1)).and_then(|number| number.as_str().parse::<f64>().ok())
}

/// Every token covered by a quantity expression anywhere in `text`,
/// collapsed and lowercased, so it can be excluded from keyword scoring.
pub fn quantity_exclusions(text: &str) -> HashSet<String, RandomState> {
  span_exclusions(QUANTITY_RE.find_iter(text).map(|m| m.as_str()))
}

/// The raw ratio spans found in `text`, in order of appearance.
pub fn ratio_spans(text: &str) -> Vec<String> {
  RATIO_RE.find_iter(text).map(|m| m.as_str().trim().to_string()).collect()
}

/// Every token covered by a ratio expression anywhere in `text`, collapsed
/// and lowercased.
pub fn ratio_exclusions(text: &str) -> HashSet<String, RandomState> {
  span_exclusions(RATIO_RE.find_iter(text).map(|m| m.as_str()))
}

fn span_exclusions<'s>(spans: impl Iterator<Item = &'s str>) -> HashSet<String, RandomState> {
  spans.flat_map(|span| collapsed_tokens(span).into_iter().map(|token| token.to_lowercase())).collect()
}
