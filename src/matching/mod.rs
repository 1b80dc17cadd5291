pub mod extractors;
pub mod gates;
pub mod profile;

use crate::{matching::profile::ProductNameProfile, model::RowContext};

/// A hard filter a candidate must clear before it is scored at all,
/// independent of keyword overlap.
pub trait Gate: Send + Sync {
  fn name(&self) -> &'static str;
  fn passes(&self, ctx: &RowContext, target: &ProductNameProfile, candidate: &ProductNameProfile) -> bool;
}

pub fn run_gates(ctx: &RowContext, target: &ProductNameProfile, candidate: &ProductNameProfile, gates: &[&dyn Gate]) -> bool {
  for gate in gates {
    if !gate.passes(ctx, target, candidate) {
      tracing::debug!(gate = gate.name(), candidate = %candidate.raw_name, "candidate rejected");

      return false;
    }
  }

  true
}

/// Short names carry less signal per token, so they get a lower bar.
pub fn threshold(keyword_count: usize) -> f64 {
  if keyword_count <= 3 { 0.6 } else { 0.75 }
}

#[cfg(test)]
mod tests {
  #[test]
  fn threshold_policy() {
    assert_eq!(super::threshold(0), 0.6);
    assert_eq!(super::threshold(3), 0.6);
    assert_eq!(super::threshold(4), 0.75);
  }
}
