//! Comparison building over large candidate pools.

#![allow(clippy::unwrap_used, missing_docs)]

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use procurement_rfq::application::services::{LowestPriceStrategy, build_comparison};
use procurement_rfq::domain::entities::{LineItemDraft, Quotation, ResponseItemDraft};
use procurement_rfq::domain::value_objects::{ActorId, ItemId, Quantity, RetailerId, Timestamp};
use rust_decimal::Decimal;
use std::hint::black_box;

fn quotation(lines: usize, retailers: usize) -> (Quotation, Timestamp) {
    let t0 = Timestamp::from_secs(1_704_067_200).unwrap();
    let mut q = Quotation::builder("QT-000001", "Bench", ActorId::new("admin"), t0.add_days(2))
        .line_items((0..lines).map(|i| {
            LineItemDraft::new(
                ItemId::new(format!("I{i}")),
                Quantity::new(Decimal::from(10)).unwrap(),
                "kg",
            )
        }))
        .build(t0)
        .unwrap();
    q.publish(t0).unwrap();

    let line_ids: Vec<_> = q.line_items().iter().map(|l| l.id()).collect();
    for r in 0..retailers {
        let offset = i64::try_from(r).unwrap();
        let items = line_ids
            .iter()
            .enumerate()
            .map(|(i, id)| ResponseItemDraft::new(*id, Decimal::from(100 + (i * 7 + r * 13) % 50)))
            .collect();
        q.submit_response(
            RetailerId::new(format!("R{r}")),
            items,
            None,
            t0.add_secs(offset),
        )
        .unwrap();
    }
    (q, t0.add_days(3))
}

fn bench_build_comparison(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_comparison");
    for (lines, retailers) in [(10, 10), (50, 50), (200, 100)] {
        let (q, now) = quotation(lines, retailers);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{lines}x{retailers}")),
            &q,
            |b, q| b.iter(|| build_comparison(black_box(q), &LowestPriceStrategy, now).unwrap()),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_build_comparison);
criterion_main!(benches);
