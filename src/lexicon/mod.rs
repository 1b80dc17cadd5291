use std::{
  collections::{HashMap, HashSet},
  sync::LazyLock,
};

use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};
use ahash::RandomState;
use rust_embed::Embed;
use serde::Deserialize;

#[derive(Embed)]
#[folder = "src/lexicon/dictionaries"]
pub struct Dictionaries;

pub static STOPWORDS: LazyLock<HashSet<String, RandomState>> = LazyLock::new(|| {
  let file = Dictionaries::get("stopwords.yml").expect("could not read stopword dictionary");
  let dictionary = serde_yaml::from_slice::<StopwordDictionary>(&file.data).expect("could not unmarshal stopword dictionary");

  dictionary.stopwords.into_iter().map(|word| word.to_lowercase()).collect()
});

/// The flavor vocabulary as a leftmost-longest automaton, so multi-word
/// flavors win over their substrings, plus the pattern list to map hits back
/// to flavor names.
pub static FLAVORS: LazyLock<(AhoCorasick, Vec<String>)> = LazyLock::new(|| {
  let file = Dictionaries::get("flavors.yml").expect("could not read flavor dictionary");
  let dictionary = serde_yaml::from_slice::<FlavorDictionary>(&file.data).expect("could not unmarshal flavor dictionary");

  let patterns = dictionary.flavors.into_iter().map(|flavor| flavor.to_lowercase()).collect::<Vec<_>>();

  (
    AhoCorasickBuilder::new().match_kind(MatchKind::LeftmostLongest).ascii_case_insensitive(true).build(&patterns).unwrap(),
    patterns,
  )
});

pub static CATEGORIES: LazyLock<CategoryTable> = LazyLock::new(|| {
  let file = Dictionaries::get("categories.yml").expect("could not read category dictionary");

  serde_yaml::from_slice::<CategoryTable>(&file.data).expect("could not unmarshal category dictionary")
});

pub static BRANDS: LazyLock<BrandTable> = LazyLock::new(|| {
  let file = Dictionaries::get("brands.yml").expect("could not read brand dictionary");

  serde_yaml::from_slice::<BrandTable>(&file.data).expect("could not unmarshal brand dictionary")
});

#[derive(Deserialize)]
struct StopwordDictionary {
  stopwords: Vec<String>,
}

#[derive(Deserialize)]
struct FlavorDictionary {
  flavors: Vec<String>,
}

#[derive(Deserialize)]
pub struct CategoryTable {
  mappings: HashMap<String, String, RandomState>,
  no_weight_filter: HashSet<String, RandomState>,
  no_brand_filter: HashSet<String, RandomState>,
}

impl CategoryTable {
  /// Translate a sheet category into the storefront vocabulary. A category
  /// absent from the mapping is used unchanged.
  pub fn site_category(&self, category: &str) -> String {
    let category = category.trim();

    match self.mappings.get(category).or_else(|| self.mappings.get(&category.to_uppercase())) {
      Some(mapped) => mapped.clone(),
      None => category.to_string(),
    }
  }

  /// Whether the storefront offers a weight selector for this site category.
  /// When it does not, weight equality must be enforced by the matcher.
  pub fn weight_filtered(&self, site_category: &str) -> bool {
    !self.no_weight_filter.contains(site_category)
  }

  pub fn brand_filtered(&self, site_category: &str) -> bool {
    !self.no_brand_filter.contains(site_category)
  }
}

#[derive(Deserialize)]
pub struct BrandTable {
  mappings: HashMap<String, String, RandomState>,
}

impl BrandTable {
  /// Translate a sheet brand into the storefront vocabulary, falling back to
  /// the raw sheet value.
  pub fn site_brand(&self, brand: &str) -> String {
    let brand = brand.trim();

    match self.mappings.get(brand).or_else(|| self.mappings.get(&brand.to_uppercase())) {
      Some(mapped) => mapped.clone(),
      None => brand.to_string(),
    }
  }
}

/// Find every flavor present in `haystack`, whole words only.
pub fn find_flavors(haystack: &str) -> HashSet<String, RandomState> {
  let (aho, patterns) = &*FLAVORS;
  let mut found = HashSet::default();

  for mat in aho.find_iter(haystack) {
    let start_is_boundary = mat.start() == 0 || !haystack[..mat.start()].chars().next_back().unwrap().is_alphanumeric();
    let end_is_boundary = mat.end() == haystack.len() || !haystack[mat.end()..].chars().next().unwrap().is_alphanumeric();

    if start_is_boundary && end_is_boundary {
      found.insert(patterns[mat.pattern().as_usize()].clone());
    }
  }

  found
}

#[cfg(test)]
mod tests {
  use itertools::Itertools;

  #[test]
  fn stopwords() {
    assert!(super::STOPWORDS.contains("hybrid"));
    assert!(!super::STOPWORDS.contains("dream"));
  }

  #[test]
  fn find_flavors() {
    let flavors = super::find_flavors("Peppermint Bark Chocolate 100mg");

    assert_eq!(flavors.iter().sorted().collect::<Vec<_>>(), vec!["chocolate", "peppermint"]);
  }

  #[test]
  fn find_flavors_whole_words_only() {
    assert!(super::find_flavors("Grapefruits Galore").is_empty());
    assert_eq!(super::find_flavors("Grapefruit Haze").len(), 2);
  }

  #[test]
  fn category_table() {
    assert_eq!(super::CATEGORIES.site_category("PREROLL"), "Pre-Rolls");
    assert_eq!(super::CATEGORIES.site_category("MYSTERY"), "MYSTERY");

    assert!(super::CATEGORIES.weight_filtered("Flower"));
    assert!(!super::CATEGORIES.weight_filtered("Edibles"));
    assert!(!super::CATEGORIES.brand_filtered("Apparel"));
  }

  #[test]
  fn brand_table() {
    assert_eq!(super::BRANDS.site_brand("WANA GUMMIES"), "Wana");
    assert_eq!(super::BRANDS.site_brand("Acme"), "Acme");
  }
}
