use fecviz_core::{bucket, BinBoundaries, ContributionRecord, Dispatch, HistogramView};
use proptest::prelude::*;

fn amount() -> impl Strategy<Value = f64> {
    prop_oneof![
        8 => -1_000.0f64..5_000_000.0,
        1 => Just(f64::NAN),
        1 => prop::sample::select(vec![0.0, 50.0, 200.0, 500.0, 1000.0, 10000.0, 50000.0, 100000.0, 1000000.0]),
    ]
}

proptest! {
    #[test]
    fn every_finite_amount_lands_in_one_bin(amounts in prop::collection::vec(amount(), 0..200)) {
        let records: Vec<_> = amounts.iter().map(|&a| ContributionRecord::new("CA", a)).collect();
        let bins = bucket(&records, &BinBoundaries::default());
        let finite = amounts.iter().filter(|a| a.is_finite()).count() as u64;
        prop_assert_eq!(bins.iter().map(|b| b.count).sum::<u64>(), finite);
        for (i, b) in bins.iter().enumerate() {
            for r in &b.records {
                prop_assert!(i == 0 || b.contains(r.amount));
            }
        }
    }

    #[test]
    fn bars_never_exceed_canvas(amounts in prop::collection::vec(0.0f64..2_000_000.0, 1..100)) {
        let records: Vec<_> = amounts.iter().map(|&a| ContributionRecord::new("CA", a)).collect();
        let mut view = HistogramView::new("#h", Dispatch::detached());
        view.render(&records);
        let heights: Vec<f64> = view
            .bar_nodes()
            .map(|g| g.children()[0].attr_f64("height").unwrap())
            .collect();
        prop_assert_eq!(heights.len(), 9);
        prop_assert!(heights.iter().all(|h| (0.0..=450.0).contains(h)));
        prop_assert!(heights.iter().any(|h| *h == 450.0));
    }
}
