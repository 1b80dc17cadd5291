use tracing::instrument;

use crate::{
  matching::{
    Gate,
    gates::{FlavorGate, QuantityGate, WeightGate},
    profile::ProductNameProfile,
    run_gates, threshold,
  },
  model::{Listing, MatchResult, RowContext},
};

/// Fraction of the target's keyword tokens present in the candidate. An
/// empty target keyword set cannot be told apart from anything, so it scores
/// zero against every candidate.
pub fn keyword_overlap(target: &ProductNameProfile, candidate: &ProductNameProfile) -> f64 {
  if target.keyword_tokens.is_empty() {
    return 0.0;
  }

  let common = target.keyword_tokens.intersection(&candidate.keyword_tokens).count();

  common as f64 / target.keyword_tokens.len() as f64
}

/// Run the hard gates then the overlap score over every candidate,
/// accumulating all of them that clear the threshold. Multiple listings may
/// legitimately match one row (package variants); their fields stay aligned
/// by index. The highest-scoring name is kept for display.
#[instrument(name = "score_candidates", skip_all, fields(row = ctx.row_index, target = %target.raw_name))]
pub fn score_candidates(ctx: &RowContext, target: &ProductNameProfile, candidates: &[(ProductNameProfile, Listing)]) -> MatchResult {
  let gates: &[&dyn Gate] = &[&QuantityGate, &WeightGate, &FlavorGate];

  let threshold = threshold(target.keyword_tokens.len());
  let mut result = MatchResult::empty(threshold);

  for (profile, listing) in candidates {
    if !run_gates(ctx, target, profile, gates) {
      continue;
    }

    let score = keyword_overlap(target, profile);

    tracing::debug!(candidate = %profile.raw_name, score, "scored candidate");

    if score >= threshold {
      result.urls.push(listing.url.clone());
      result.discounted_prices.push(listing.discounted_price.clone());
      result.original_prices.push(listing.original_price.clone());
      result.thc_contents.push(listing.thc_content.clone());

      if score > result.best_score {
        result.best_match_name = Some(profile.raw_name.clone());
        result.best_score = score;
      }
    }
  }

  result
}
