const GRAMS_PER_OUNCE: f64 = 0.03527396;

/// Normalize a sheet or listing weight string to the storefront format:
/// lowercased, whitespace stripped, long unit words shortened, and a leading
/// "." getting its "0" back.
pub fn normalize_weight(weight: &str) -> String {
  let mut weight = weight
    .to_lowercase()
    .trim()
    .replace("grams", "g")
    .replace("milligrams", "mg")
    .replace("millig", "mg");

  weight.retain(|c| !c.is_whitespace());

  if weight.starts_with('.') {
    weight.insert(0, '0');
  }

  weight
}

/// The weight strings worth trying against the storefront for one normalized
/// weight: the value itself, and the zero-less spelling some menus use.
pub fn weight_variants(normalized: &str) -> Vec<String> {
  let mut variants = vec![normalized.to_string()];

  if let Some(stripped) = normalized.strip_prefix("0.") {
    variants.push(format!(".{stripped}"));
  }

  variants
}

/// Map a gram quantity to the retail ounce-fraction label the storefront
/// displays, falling back to a decimal-ounce string.
pub fn grams_to_ounces(grams: f64) -> String {
  let ounces = grams * GRAMS_PER_OUNCE;

  for (fraction, label) in [(0.125, "1/8oz"), (0.25, "1/4oz"), (0.5, "1/2oz"), (1.0, "1oz"), (2.0, "2oz")] {
    if ounces == fraction {
      return label.to_string();
    }
  }

  let rounded = (ounces * 100.0).round() / 100.0;

  for (fraction, label) in [(0.125, "1/8oz"), (0.25, "1/4oz"), (0.5, "1/2oz")] {
    if (rounded - fraction).abs() < 0.02 {
      return label.to_string();
    }
  }

  format!("{rounded}oz")
}

#[cfg(test)]
mod tests {
  #[test]
  fn normalize_weight() {
    assert_eq!(super::normalize_weight("3.5 GRAMS"), "3.5g");
    assert_eq!(super::normalize_weight("100 MILLIGRAMS"), "100mg");
    assert_eq!(super::normalize_weight("0.75 millig"), "0.75mg");
    assert_eq!(super::normalize_weight(".7g"), "0.7g");
    assert_eq!(super::normalize_weight(" 1 G "), "1g");
  }

  #[test]
  fn weight_variants() {
    assert_eq!(super::weight_variants("0.75g"), vec!["0.75g", ".75g"]);
    assert_eq!(super::weight_variants("3.5g"), vec!["3.5g"]);
  }

  #[test]
  fn grams_to_ounces() {
    assert_eq!(super::grams_to_ounces(3.5), "1/8oz");
    assert_eq!(super::grams_to_ounces(7.0), "1/4oz");
    assert_eq!(super::grams_to_ounces(14.0), "1/2oz");
    assert_eq!(super::grams_to_ounces(28.0), "0.99oz");
    assert_eq!(super::grams_to_ounces(20.0), "0.71oz");
  }
}
