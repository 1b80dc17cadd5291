#![cfg(feature = "benchmarks")]

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use shelfsync::{matching::profile::ProductNameProfile, model::RowContext, scoring, tests};

pub fn parse_profile(c: &mut Criterion) {
  c.bench_function("parse_profile", |b| {
    b.iter(|| black_box(ProductNameProfile::parse("Acme Blue Dream Gummy 10 pk THC:CBD 1:2 100mg Mango", "Acme", "EDIBLE")))
  });
}

pub fn score_candidates(c: &mut Criterion) {
  let row = tests::sheet_row("Gummy 10 pk Mango").category("EDIBLE").brand("Acme").weight("100mg").call();
  let ctx = RowContext::for_row(0, &row);
  let target = ProductNameProfile::parse(&row.product_name, &row.brand, &row.category);

  let candidates = (0..20)
    .map(|index| {
      let name = format!("Mango Gummy 10 pk 100 mg #{index}");

      (ProductNameProfile::parse(&name, &row.brand, &row.category), tests::listing(&name).call())
    })
    .collect::<Vec<_>>();

  c.bench_function("score_candidates", |b| b.iter(|| black_box(scoring::score_candidates(&ctx, &target, &candidates))));
}

criterion_group!(benches, parse_profile, score_candidates);
criterion_main!(benches);
