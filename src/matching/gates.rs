use crate::{
  matching::{Gate, profile::ProductNameProfile},
  model::RowContext,
  weights::normalize_weight,
};

/// When both sides parsed a count-style quantity, they must be exactly
/// equal. A side without one passes vacuously.
pub struct QuantityGate;

impl Gate for QuantityGate {
  fn name(&self) -> &'static str {
    "quantity_match"
  }

  fn passes(&self, _ctx: &RowContext, target: &ProductNameProfile, candidate: &ProductNameProfile) -> bool {
    match (target.quantity, candidate.quantity) {
      (Some(lhs), Some(rhs)) => lhs == rhs,
      _ => true,
    }
  }
}

/// Weight equality, enforced only for categories the storefront cannot
/// pre-filter by weight. Elsewhere navigation already pinned the weight.
pub struct WeightGate;

impl Gate for WeightGate {
  fn name(&self) -> &'static str {
    "weight_match"
  }

  fn passes(&self, ctx: &RowContext, _target: &ProductNameProfile, candidate: &ProductNameProfile) -> bool {
    if ctx.weight_filtered {
      return true;
    }

    candidate.weight_tokens.iter().any(|token| normalize_weight(token) == ctx.normalized_weight)
  }
}

/// Every flavor recognized in the target must appear in the candidate. A
/// flavorless target accepts any candidate.
pub struct FlavorGate;

impl Gate for FlavorGate {
  fn name(&self) -> &'static str {
    "flavor_match"
  }

  fn passes(&self, _ctx: &RowContext, target: &ProductNameProfile, candidate: &ProductNameProfile) -> bool {
    target.flavors.is_subset(&candidate.flavors)
  }
}

#[cfg(test)]
mod tests {
  use super::{FlavorGate, QuantityGate, WeightGate};
  use crate::{
    matching::{Gate, profile::ProductNameProfile},
    model::{RowContext, SheetRow},
  };

  fn ctx(category: &str, weight: &str) -> RowContext {
    RowContext::for_row(
      0,
      &SheetRow {
        category: category.to_string(),
        brand: "Acme".to_string(),
        weight: weight.to_string(),
        product_name: String::new(),
      },
    )
  }

  #[test]
  fn quantity_gate() {
    let ctx = ctx("EDIBLE", "100mg");
    let target = ProductNameProfile::parse("Gummy 10 pk Mango", "Acme", "EDIBLE");
    let same = ProductNameProfile::parse("Mango Gummy 10 pk", "Acme", "EDIBLE");
    let different = ProductNameProfile::parse("Gummy 20 pk Mango", "Acme", "EDIBLE");
    let absent = ProductNameProfile::parse("Gummy Mango", "Acme", "EDIBLE");

    assert!(QuantityGate.passes(&ctx, &target, &same));
    assert!(!QuantityGate.passes(&ctx, &target, &different));
    assert!(QuantityGate.passes(&ctx, &target, &absent));
  }

  #[test]
  fn weight_gate_only_for_unfiltered_categories() {
    let target = ProductNameProfile::parse("Blue Dream", "Acme", "FLOWER");
    let candidate = ProductNameProfile::parse("Blue Dream 3.5g", "Acme", "FLOWER");

    // Edibles have no site weight selector: 100mg sheet weight must appear
    // among the candidate's weight tokens.
    assert!(!WeightGate.passes(&ctx("EDIBLE", "100 MILLIGRAMS"), &target, &candidate));

    let edible = ProductNameProfile::parse("Mango Gummy 100 mg", "Acme", "EDIBLE");
    assert!(WeightGate.passes(&ctx("EDIBLE", "100 MILLIGRAMS"), &target, &edible));

    // Flower is weight-filtered by navigation, so the same mismatch passes.
    assert!(WeightGate.passes(&ctx("FLOWER", "1g"), &target, &candidate));
  }

  #[test]
  fn flavor_gate() {
    let ctx = ctx("EDIBLE", "100mg");
    let minty = ProductNameProfile::parse("Mint Chews", "Acme", "EDIBLE");
    let plain = ProductNameProfile::parse("Chews", "Acme", "EDIBLE");

    assert!(!FlavorGate.passes(&ctx, &minty, &plain));
    assert!(FlavorGate.passes(&ctx, &minty, &minty));
    assert!(FlavorGate.passes(&ctx, &plain, &minty));
  }
}
