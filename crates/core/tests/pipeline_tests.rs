// ═══════════════════════════════════════════════════════════════════
// Pipeline Tests — timestamp union, gap fill, normalization, merge,
// trailing backfill, MergedSeries invariants, axis labels
// ═══════════════════════════════════════════════════════════════════

use chrono::{DateTime, TimeZone, Utc};
use std::collections::BTreeMap;

use vault_dashboard_core::errors::CoreError;
use vault_dashboard_core::models::asset::TrackedAsset;
use vault_dashboard_core::models::chart::{MergedPoint, MergedSeries};
use vault_dashboard_core::models::price::{AssetSeries, RawPoint};
use vault_dashboard_core::models::timeframe::Timeframe;
use vault_dashboard_core::services::chart_service::{axis_label_indexes, axis_labels};
use vault_dashboard_core::services::series_transform::*;

// ═══════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════

fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 5, hour, 0, 0).unwrap()
}

fn ts(hour: u32) -> String {
    format!("2025-06-05T{hour:02}:00:00Z")
}

fn series(asset: TrackedAsset, points: &[(u32, f64)]) -> AssetSeries {
    AssetSeries::new(
        asset,
        points
            .iter()
            .map(|(h, p)| RawPoint::new(ts(*h), at(*h), *p))
            .collect(),
    )
}

fn vault() -> TrackedAsset {
    TrackedAsset::vault("Vault", "Axylon")
}

fn bitcoin() -> TrackedAsset {
    TrackedAsset::benchmark("Bitcoin", "BTC")
}

fn sp500() -> TrackedAsset {
    TrackedAsset::non_trading("SP500", "SP500")
}

fn row(hour: u32, values: &[(&str, f64)]) -> ChartRow {
    ChartRow {
        instant: at(hour),
        source_ts: ts(hour),
        values: values.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
    }
}

fn column(rows: &[ChartRow], asset: &str) -> Vec<f64> {
    rows.iter().map(|r| r.values[asset]).collect()
}

// ═══════════════════════════════════════════════════════════════════
// align_timestamps
// ═══════════════════════════════════════════════════════════════════

mod align {
    use super::*;

    #[test]
    fn union_is_sorted_and_deduplicated() {
        let a = series(vault(), &[(2, 1.0), (0, 1.0)]);
        let b = series(bitcoin(), &[(1, 1.0), (2, 1.0)]);

        let union = align_timestamps(&[a, b]);
        let instants: Vec<_> = union.iter().map(|u| u.instant).collect();
        assert_eq!(instants, vec![at(0), at(1), at(2)]);
    }

    #[test]
    fn equal_instants_with_different_spelling_collapse() {
        let a = AssetSeries::new(
            vault(),
            vec![RawPoint::new("2025-06-05T00:00:00Z", at(0), 1.0)],
        );
        let b = AssetSeries::new(
            bitcoin(),
            vec![RawPoint::new("2025-06-05T00:00:00+00:00", at(0), 2.0)],
        );

        let union = align_timestamps(&[a, b]);
        assert_eq!(union.len(), 1);
        assert_eq!(union[0].source_ts, "2025-06-05T00:00:00Z");
    }

    #[test]
    fn empty_series_contribute_nothing() {
        let union = align_timestamps(&[AssetSeries::empty(vault()), series(bitcoin(), &[(3, 1.0)])]);
        assert_eq!(union.len(), 1);
        assert_eq!(union[0].instant, at(3));
    }

    #[test]
    fn all_empty_gives_empty_union() {
        assert!(align_timestamps(&[AssetSeries::empty(vault())]).is_empty());
    }
}

// ═══════════════════════════════════════════════════════════════════
// fill_missing_points
// ═══════════════════════════════════════════════════════════════════

mod fill {
    use super::*;

    #[test]
    fn carries_last_known_price_forward() {
        let union = align_timestamps(&[series(vault(), &[(0, 1.0), (1, 1.0), (2, 1.0), (3, 1.0)])]);
        let gold = series(sp500(), &[(1, 10.0), (3, 30.0)]);

        let filled = fill_missing_points(&gold, &union);
        let got: Vec<_> = filled.points.iter().map(|p| (p.instant, p.price)).collect();
        assert_eq!(got, vec![(at(1), 10.0), (at(2), 10.0), (at(3), 30.0)]);
    }

    #[test]
    fn nothing_is_emitted_before_first_real_point() {
        let union = align_timestamps(&[series(vault(), &[(0, 1.0), (1, 1.0)])]);
        let late = series(sp500(), &[(1, 5.0)]);

        let filled = fill_missing_points(&late, &union);
        assert_eq!(filled.len(), 1);
        assert_eq!(filled.points[0].instant, at(1));
    }

    #[test]
    fn synthetic_points_use_union_source_string() {
        let union = align_timestamps(&[series(vault(), &[(0, 1.0), (5, 1.0)])]);
        let s = series(sp500(), &[(0, 7.0)]);

        let filled = fill_missing_points(&s, &union);
        assert_eq!(filled.points[1].ts, ts(5));
        assert_eq!(filled.points[1].price, 7.0);
    }

    #[test]
    fn input_series_is_untouched() {
        let union = align_timestamps(&[series(vault(), &[(0, 1.0), (1, 1.0), (2, 1.0)])]);
        let s = series(sp500(), &[(0, 1.0), (2, 3.0)]);
        let before = s.clone();

        let _ = fill_missing_points(&s, &union);
        assert_eq!(s, before);
    }

    #[test]
    fn empty_series_stays_empty() {
        let union = align_timestamps(&[series(vault(), &[(0, 1.0)])]);
        assert!(fill_missing_points(&AssetSeries::empty(sp500()), &union).is_empty());
    }
}

// ═══════════════════════════════════════════════════════════════════
// normalize
// ═══════════════════════════════════════════════════════════════════

mod normalization {
    use super::*;

    #[test]
    fn rebases_to_first_point() {
        let n = normalize(&series(vault(), &[(0, 200.0), (1, 201.0), (2, 199.5)])).unwrap();
        let values: Vec<f64> = n.values.iter().map(|(_, v)| *v).collect();
        assert_eq!(values, vec![0.0, 0.5, -0.25]);
        assert_eq!(n.display_name, "Vault");
    }

    #[test]
    fn rounds_to_three_decimals() {
        let n = normalize(&series(vault(), &[(0, 3.0), (1, 4.0)])).unwrap();
        assert_eq!(n.values[1].1, 33.333);
    }

    #[test]
    fn tiny_negative_change_is_plain_zero() {
        let n = normalize(&series(vault(), &[(0, 100.0), (1, 99.99999)])).unwrap();
        assert_eq!(n.values[1].1, 0.0);
        assert!(n.values[1].1.is_sign_positive());
    }

    #[test]
    fn zero_baseline_is_rejected() {
        assert!(normalize(&series(vault(), &[(0, 0.0), (1, 5.0)])).is_none());
    }

    #[test]
    fn empty_series_is_rejected() {
        assert!(normalize(&AssetSeries::empty(vault())).is_none());
    }
}

// ═══════════════════════════════════════════════════════════════════
// merge_series
// ═══════════════════════════════════════════════════════════════════

mod merge {
    use super::*;

    #[test]
    fn every_row_has_every_tracked_asset() {
        let assets = vec![vault(), bitcoin()];
        let v = series(vault(), &[(0, 100.0), (1, 110.0)]);
        let union = align_timestamps(&[v.clone()]);
        let normalized = vec![normalize(&v).unwrap()];

        let rows = merge_series(&assets, &union, &normalized);
        assert_eq!(rows.len(), 2);
        assert_eq!(column(&rows, "Vault"), vec![0.0, 10.0]);
        assert_eq!(column(&rows, "Bitcoin"), vec![0.0, 0.0]);
    }

    #[test]
    fn untracked_series_are_ignored() {
        let assets = vec![vault()];
        let v = series(vault(), &[(0, 100.0)]);
        let stray = series(bitcoin(), &[(0, 1.0), (1, 2.0)]);
        let union = align_timestamps(&[v.clone(), stray.clone()]);
        let normalized = vec![normalize(&v).unwrap(), normalize(&stray).unwrap()];

        let rows = merge_series(&assets, &union, &normalized);
        assert!(rows.iter().all(|r| !r.values.contains_key("Bitcoin")));
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn rows_follow_union_order() {
        let assets = vec![vault()];
        let v = series(vault(), &[(4, 1.0), (1, 1.0), (3, 1.0)]);
        let union = align_timestamps(&[v]);

        let rows = merge_series(&assets, &union, &[]);
        let instants: Vec<_> = rows.iter().map(|r| r.instant).collect();
        assert_eq!(instants, vec![at(1), at(3), at(4)]);
    }
}

// ═══════════════════════════════════════════════════════════════════
// backfill_trailing_zeros
// ═══════════════════════════════════════════════════════════════════

mod backfill {
    use super::*;

    #[test]
    fn replaces_only_the_trailing_run() {
        let mut rows: Vec<ChartRow> = [0.0, 5.0, 0.0, 3.0, 0.0, 0.0]
            .iter()
            .enumerate()
            .map(|(h, v)| row(h as u32, &[("Bitcoin", *v)]))
            .collect();

        let rewritten = backfill_trailing_zeros(&mut rows, "Bitcoin");
        assert_eq!(rewritten, 2);
        assert_eq!(column(&rows, "Bitcoin"), vec![0.0, 5.0, 0.0, 3.0, 3.0, 3.0]);
    }

    #[test]
    fn all_zero_column_is_left_alone() {
        let mut rows = vec![row(0, &[("Bitcoin", 0.0)]), row(1, &[("Bitcoin", 0.0)])];
        assert_eq!(backfill_trailing_zeros(&mut rows, "Bitcoin"), 0);
        assert_eq!(column(&rows, "Bitcoin"), vec![0.0, 0.0]);
    }

    #[test]
    fn no_trailing_zero_means_no_change() {
        let mut rows = vec![row(0, &[("Bitcoin", 0.0)]), row(1, &[("Bitcoin", 2.0)])];
        assert_eq!(backfill_trailing_zeros(&mut rows, "Bitcoin"), 0);
    }

    #[test]
    fn other_columns_are_untouched() {
        let mut rows = vec![
            row(0, &[("Bitcoin", 4.0), ("SP500", 0.0)]),
            row(1, &[("Bitcoin", 0.0), ("SP500", 0.0)]),
        ];
        backfill_trailing_zeros(&mut rows, "Bitcoin");
        assert_eq!(column(&rows, "Bitcoin"), vec![4.0, 4.0]);
        assert_eq!(column(&rows, "SP500"), vec![0.0, 0.0]);
    }
}

// ═══════════════════════════════════════════════════════════════════
// build_chart_series (whole pipeline)
// ═══════════════════════════════════════════════════════════════════

mod build {
    use super::*;

    #[test]
    fn vault_and_gap_filled_benchmark() {
        let assets = vec![vault(), sp500()];
        let fetched = vec![
            series(vault(), &[(0, 100.0), (1, 110.0), (2, 90.0)]),
            series(sp500(), &[(0, 50.0), (2, 55.0)]),
        ];

        let merged = build_chart_series(&assets, &fetched).unwrap();
        assert_eq!(merged.len(), 3);
        assert_eq!(merged.series_for("Vault").unwrap(), vec![0.0, 10.0, -10.0]);
        assert_eq!(merged.series_for("SP500").unwrap(), vec![0.0, 0.0, 10.0]);
        assert_eq!(merged.vault_name(), Some("Vault"));
    }

    #[test]
    fn crypto_missing_the_last_timestamp_is_backfilled() {
        let assets = vec![vault(), bitcoin()];
        let fetched = vec![
            series(vault(), &[(0, 100.0), (1, 101.0), (2, 102.0)]),
            series(bitcoin(), &[(0, 100.0), (1, 120.0)]),
        ];

        let merged = build_chart_series(&assets, &fetched).unwrap();
        assert_eq!(merged.series_for("Bitcoin").unwrap(), vec![0.0, 20.0, 20.0]);
    }

    #[test]
    fn non_trading_assets_are_not_backfilled() {
        let assets = vec![vault(), sp500()];
        let fetched = vec![
            series(vault(), &[(0, 100.0), (1, 100.0), (2, 100.0)]),
            series(sp500(), &[(0, 50.0), (1, 60.0), (2, 50.0)]),
        ];

        let merged = build_chart_series(&assets, &fetched).unwrap();
        assert_eq!(merged.series_for("SP500").unwrap(), vec![0.0, 20.0, 0.0]);
    }

    #[test]
    fn merged_length_equals_union_length() {
        let assets = vec![vault(), bitcoin(), sp500()];
        let fetched = vec![
            series(vault(), &[(0, 1.0), (2, 1.0)]),
            series(bitcoin(), &[(1, 1.0), (3, 1.0)]),
            series(sp500(), &[(4, 1.0)]),
        ];

        let union = align_timestamps(&fetched);
        let merged = build_chart_series(&assets, &fetched).unwrap();
        assert_eq!(merged.len(), union.len());
        assert_eq!(merged.len(), 5);
    }

    #[test]
    fn output_is_strictly_ascending() {
        let assets = vec![vault(), bitcoin()];
        let fetched = vec![
            series(vault(), &[(5, 1.0), (1, 1.0), (3, 1.0)]),
            series(bitcoin(), &[(2, 1.0), (5, 1.0)]),
        ];

        let merged = build_chart_series(&assets, &fetched).unwrap();
        let instants: Vec<_> = merged.points().iter().map(MergedPoint::timestamp).collect();
        assert!(instants.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn every_point_carries_every_asset() {
        let assets = vec![vault(), bitcoin(), sp500()];
        let fetched = vec![
            series(vault(), &[(0, 1.0), (1, 2.0)]),
            AssetSeries::empty(bitcoin()),
            AssetSeries::empty(sp500()),
        ];

        let merged = build_chart_series(&assets, &fetched).unwrap();
        for point in merged.points() {
            assert_eq!(point.values().len(), 3);
            assert_eq!(point.value("Bitcoin"), Some(0.0));
        }
    }

    #[test]
    fn all_empty_is_no_valid_data() {
        let assets = vec![vault(), bitcoin()];
        let fetched = vec![AssetSeries::empty(vault()), AssetSeries::empty(bitcoin())];

        let err = build_chart_series(&assets, &fetched).unwrap_err();
        assert!(matches!(err, CoreError::NoValidData));
    }

    #[test]
    fn zero_baseline_asset_is_excluded_not_fatal() {
        let assets = vec![vault(), bitcoin()];
        let fetched = vec![
            series(vault(), &[(0, 100.0), (1, 105.0)]),
            series(bitcoin(), &[(0, 0.0), (1, 10.0)]),
        ];

        let merged = build_chart_series(&assets, &fetched).unwrap();
        assert_eq!(merged.series_for("Vault").unwrap(), vec![0.0, 5.0]);
        assert_eq!(merged.series_for("Bitcoin").unwrap(), vec![0.0, 0.0]);
    }

    #[test]
    fn inputs_are_not_mutated() {
        let assets = vec![vault(), sp500()];
        let fetched = vec![
            series(vault(), &[(0, 100.0), (1, 110.0), (2, 90.0)]),
            series(sp500(), &[(0, 50.0), (2, 55.0)]),
        ];
        let snapshot = fetched.clone();

        build_chart_series(&assets, &fetched).unwrap();
        assert_eq!(fetched, snapshot);
    }
}

// ═══════════════════════════════════════════════════════════════════
// MergedSeries / MergedPoint
// ═══════════════════════════════════════════════════════════════════

mod merged_series {
    use super::*;

    fn point(hour: u32, values: &[(&str, f64)]) -> MergedPoint {
        let map: BTreeMap<String, f64> = values.iter().map(|(k, v)| (k.to_string(), *v)).collect();
        MergedPoint::new(at(hour), ts(hour), map)
    }

    #[test]
    fn empty_points_are_rejected() {
        let err = MergedSeries::new(vec!["Vault".into()], None, vec![]).unwrap_err();
        assert!(matches!(err, CoreError::NoDataPoints));
    }

    #[test]
    fn incomplete_point_is_rejected() {
        let err = MergedSeries::new(
            vec!["Vault".into(), "Gold".into()],
            Some("Vault".into()),
            vec![point(0, &[("Vault", 0.0)])],
        )
        .unwrap_err();
        match err {
            CoreError::IncompletePoint { asset, .. } => assert_eq!(asset, "Gold"),
            other => panic!("expected IncompletePoint, got {other:?}"),
        }
    }

    #[test]
    fn unknown_vault_is_rejected() {
        let err = MergedSeries::new(
            vec!["Bitcoin".into()],
            Some("Vault".into()),
            vec![point(0, &[("Bitcoin", 0.0)])],
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));
    }

    #[test]
    fn points_are_sorted_on_construction() {
        let merged = MergedSeries::new(
            vec!["Vault".into()],
            Some("Vault".into()),
            vec![point(2, &[("Vault", 2.0)]), point(0, &[("Vault", 0.0)])],
        )
        .unwrap();
        assert_eq!(merged.vault_series(), vec![0.0, 2.0]);
        assert_eq!(merged.first().unwrap().timestamp(), at(0));
    }

    #[test]
    fn series_for_untracked_asset_is_none() {
        let merged = MergedSeries::new(
            vec!["Vault".into()],
            None,
            vec![point(0, &[("Vault", 0.0)])],
        )
        .unwrap();
        assert!(merged.series_for("Gold").is_none());
        assert!(merged.vault_series().is_empty());
    }

    #[test]
    fn display_fields_are_derived() {
        let p = MergedPoint::new(
            Utc.with_ymd_and_hms(2025, 6, 5, 14, 5, 0).unwrap(),
            "2025-06-05T14:05:00Z",
            BTreeMap::new(),
        );
        assert_eq!(p.display_date(), "05 Jun");
        assert_eq!(p.display_time(), "14:05");
        assert_eq!(p.display_time_12h(), "2:05 PM");
        assert_eq!(p.source_ts(), "2025-06-05T14:05:00Z");
    }

    #[test]
    fn serializes_assets_as_top_level_keys() {
        let p = point(0, &[("Bitcoin", 1.5), ("Vault", -2.0)]);
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["Bitcoin"], 1.5);
        assert_eq!(json["Vault"], -2.0);
        assert_eq!(json["displayDate"], "05 Jun");
        assert_eq!(json["sourceTs"], ts(0));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Axis labels
// ═══════════════════════════════════════════════════════════════════

mod axis {
    use super::*;

    #[test]
    fn indexes_are_evenly_spaced() {
        assert_eq!(axis_label_indexes(13), vec![0, 2, 4, 6, 8, 10, 12]);
    }

    #[test]
    fn short_series_deduplicates() {
        assert_eq!(axis_label_indexes(0), Vec::<usize>::new());
        assert_eq!(axis_label_indexes(1), vec![0]);
        assert_eq!(axis_label_indexes(3), vec![0, 1, 2]);
    }

    #[test]
    fn one_day_uses_clock_time_other_windows_use_dates() {
        let assets = vec![vault()];
        let fetched = vec![series(vault(), &[(0, 1.0), (13, 1.0)])];
        let merged = build_chart_series(&assets, &fetched).unwrap();

        assert_eq!(axis_labels(&merged, Timeframe::OneDay), vec!["12:00 AM", "1:00 PM"]);
        assert_eq!(axis_labels(&merged, Timeframe::SevenDays), vec!["05 Jun", "05 Jun"]);
    }
}
