//! Integration tests for missing-value analysis.
//!
//! These tests drive the public entry points end to end on CSV fixtures and
//! in-memory frames.

use lex_missing::{
    ColumnClassifier, ColumnType, DtypeClassifier, Figure, IntermediateKind, MissingError,
    MAX_NUM_BINS, MissingPlotter, MissingRequest, Payload, Plot, RenderConfig,
    compute_missing_spectrum, missing_mask, plot_missing,
};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use pretty_assertions::assert_eq;
use std::path::PathBuf;
use std::sync::Arc;

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_csv(filename: &str) -> DataFrame {
    let path = fixtures_path().join(filename);
    CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path))
        .expect("Failed to create CSV reader")
        .finish()
        .expect("Failed to read CSV file")
}

fn load_suicide_rates() -> DataFrame {
    load_csv("suicide_rates_subset.csv")
}

fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect()
}

fn two_column_sample() -> DataFrame {
    df!(
        "A" => &[Some(1.0), None, Some(3.0)],
        "B" => &[None, Some(2.0), Some(3.0)],
    )
    .unwrap()
}

// ============================================================================
// Missing Spectrum
// ============================================================================

#[test]
fn test_spectrum_densities_match_missing_fraction() {
    let df = load_suicide_rates();
    let output = plot_missing(&df, None, None, None, None, true).unwrap();
    let intermediate = output.intermediate.expect("intermediate was requested");
    let (matrix, density) = intermediate.spectrum().unwrap();

    assert_eq!(density.len(), df.height());
    assert_eq!(matrix.shape(), (df.width(), df.height()));

    let masks: Vec<Vec<bool>> = df
        .get_columns()
        .iter()
        .map(|c| missing_mask(c).unwrap())
        .collect();
    for (row, value) in density.iter().enumerate() {
        let missing = masks.iter().filter(|mask| mask[row]).count();
        let expected = 1.0 - missing as f64 / df.width() as f64;
        assert!((0.0..=1.0).contains(value));
        assert!((value - expected).abs() < 1e-12, "row {row}");
    }
}

#[test]
fn test_spectrum_truncation_keeps_densities() {
    let df = load_suicide_rates();
    let full = compute_missing_spectrum(&df, None, None).unwrap();
    let cut = compute_missing_spectrum(&df, Some(5), Some(3)).unwrap();

    let (full_matrix, full_density) = full.spectrum().unwrap();
    let (cut_matrix, cut_density) = cut.spectrum().unwrap();

    assert_eq!(full_density, cut_density);
    assert_eq!(cut_matrix.shape(), (3, 5));
    for c in 0..3 {
        for r in 0..5 {
            assert_eq!(cut_matrix.is_missing(c, r), full_matrix.is_missing(c, r));
        }
    }
}

#[test]
fn test_spectrum_caps_clamp_to_table() {
    let df = two_column_sample();
    let result = compute_missing_spectrum(&df, Some(1_000), Some(1_000)).unwrap();
    let (matrix, _) = result.spectrum().unwrap();
    assert_eq!(matrix.shape(), (2, 3));
}

#[test]
fn test_spectrum_scenario_two_columns() {
    let output = plot_missing(&two_column_sample(), None, None, None, None, true).unwrap();
    let intermediate = output.intermediate.unwrap();
    let (_, density) = intermediate.spectrum().unwrap();
    assert_eq!(density, &[0.5, 0.5, 1.0]);
}

#[test]
fn test_spectrum_empty_table() {
    let df = df!(
        "a" => Vec::<Option<i64>>::new(),
        "b" => Vec::<Option<String>>::new(),
    )
    .unwrap();
    let output = plot_missing(&df, None, None, None, None, true).unwrap();
    let intermediate = output.intermediate.unwrap();

    match intermediate.payload() {
        Payload::Spectrum {
            distribution,
            density,
            ..
        } => {
            assert!(density.is_empty());
            assert!(distribution.is_empty());
        }
        Payload::Impact { .. } => panic!("expected spectrum payload"),
    }
}

// ============================================================================
// Missing Impact
// ============================================================================

#[test]
fn test_impact_drops_rows_missing_in_x() {
    let df = load_suicide_rates();
    let output = plot_missing(&df, Some("HDI_for_year"), None, None, None, true).unwrap();
    let intermediate = output.intermediate.unwrap();
    let (dropped, columns) = intermediate.impact().unwrap();

    assert_eq!(intermediate.kind(), IntermediateKind::Impact);
    assert_eq!(dropped.height(), 8);
    assert!(
        missing_mask(dropped.column("HDI_for_year").unwrap())
            .unwrap()
            .iter()
            .all(|missing| !missing)
    );

    let expected: Vec<String> = column_names(&df)
        .into_iter()
        .filter(|name| name != "HDI_for_year")
        .collect();
    assert_eq!(columns, expected.as_slice());
    assert_eq!(columns.len(), df.width() - 1);
}

#[test]
fn test_impact_scenario_two_columns() {
    let output = plot_missing(&two_column_sample(), Some("A"), None, None, None, true).unwrap();
    let intermediate = output.intermediate.unwrap();
    let (dropped, columns) = intermediate.impact().unwrap();

    assert_eq!(dropped.height(), 2);
    assert_eq!(columns, &["B".to_string()]);
    assert_eq!(output.figure.titles(), vec!["B"]);
}

#[test]
fn test_impact_figure_has_tab_per_column() {
    let df = load_suicide_rates();
    let output = plot_missing(&df, Some("population"), None, None, None, false).unwrap();

    assert!(output.intermediate.is_none());
    assert_eq!(output.figure.titles().len(), df.width() - 1);

    let sex_chart = output
        .figure
        .charts()
        .into_iter()
        .find(|chart| chart.title.starts_with("sex"))
        .unwrap();
    assert!(matches!(sex_chart.plot, Plot::Bar { .. }));
}

#[test]
fn test_impact_pair_narrows_to_two_columns() {
    let df = load_suicide_rates();
    let output = plot_missing(
        &df,
        Some("HDI_for_year"),
        Some("suicides_no"),
        None,
        None,
        true,
    )
    .unwrap();
    let intermediate = output.intermediate.unwrap();
    let (dropped, columns) = intermediate.impact().unwrap();

    assert_eq!(intermediate.kind(), IntermediateKind::ImpactPair);
    assert_eq!(
        column_names(dropped),
        vec!["HDI_for_year".to_string(), "suicides_no".to_string()]
    );
    assert_eq!(dropped.height(), 8);
    assert_eq!(columns, &["suicides_no".to_string()]);
    assert_eq!(
        output.figure.titles(),
        vec!["Histogram", "QQ Plot", "Box Plot", "Jitter", "CDF", "PDF"]
    );
}

#[test]
fn test_impact_pair_same_column_is_rejected() {
    let err = plot_missing(&two_column_sample(), Some("A"), Some("A"), None, None, false)
        .unwrap_err();
    assert!(matches!(err, MissingError::InvalidArguments(_)));
}

#[test]
fn test_same_column_wins_over_unsupported_type() {
    let dates = df!("when" => &[1i32, 2])
        .unwrap()
        .lazy()
        .with_column(col("when").cast(DataType::Date))
        .collect()
        .unwrap();
    let err = plot_missing(&dates, Some("when"), Some("when"), None, None, false).unwrap_err();
    assert!(matches!(err, MissingError::InvalidArguments(_)));
}

#[test]
fn test_bin_count_is_bounded() {
    let df = load_suicide_rates();
    let err = MissingRequest::from_args(Some("HDI_for_year"), None, None, None)
        .unwrap()
        .with_num_bins(usize::MAX)
        .unwrap_err();
    assert!(matches!(err, MissingError::InvalidArguments(_)));

    let request = MissingRequest::from_args(Some("HDI_for_year"), None, None, None)
        .unwrap()
        .with_num_bins(MAX_NUM_BINS)
        .unwrap();
    let output = MissingPlotter::default().plot(&df, &request, false).unwrap();
    assert_eq!(output.figure.titles().len(), df.width() - 1);
}

#[test]
fn test_enum_column_is_categorical() {
    let categories = FrozenCategories::new(["low", "high"]).unwrap();
    let levels = DataType::from_frozen_categories(categories);
    let df = df!(
        "score" => &[Some(1.0), None, Some(3.0), Some(4.0)],
        "level" => &[Some("low"), Some("high"), None, Some("high")],
    )
    .unwrap()
    .lazy()
    .with_column(col("level").cast(levels))
    .collect()
    .unwrap();

    let output = plot_missing(&df, Some("score"), None, None, None, false).unwrap();
    match &output.figure.charts()[0].plot {
        Plot::Bar { categories, series } => {
            assert_eq!(categories, &vec!["high".to_string(), "low".to_string()]);
            assert_eq!(series[0].data, vec![2.0, 1.0]);
            assert_eq!(series[1].data, vec![1.0, 1.0]);
        }
        other => panic!("unexpected plot: {other:?}"),
    }
}

#[test]
fn test_impact_does_not_mutate_input() {
    let df = load_suicide_rates();
    let before = df.clone();
    let _ = plot_missing(&df, Some("HDI_for_year"), None, None, None, true).unwrap();
    assert!(df.equals_missing(&before));
}

// ============================================================================
// Dispatch and Validation
// ============================================================================

#[test]
fn test_y_without_x_fails_for_any_table() {
    let df = load_suicide_rates();
    let err = plot_missing(&df, None, Some("population"), None, None, false).unwrap_err();
    assert_eq!(err.error_code(), "INVALID_ARGUMENTS");

    let dates = df!("when" => &[1i32, 2])
        .unwrap()
        .lazy()
        .with_column(col("when").cast(DataType::Date))
        .collect()
        .unwrap();
    let err = plot_missing(&dates, None, Some("when"), None, None, false).unwrap_err();
    assert_eq!(err.error_code(), "INVALID_ARGUMENTS");
}

#[test]
fn test_unsupported_column_type_fails_fast() {
    let df = df!("a" => &[Some(1), None], "when" => &[10i32, 20])
        .unwrap()
        .lazy()
        .with_column(col("when").cast(DataType::Date))
        .collect()
        .unwrap();

    for request in [
        MissingRequest::from_args(None, None, None, None).unwrap(),
        MissingRequest::from_args(Some("a"), None, None, None).unwrap(),
        MissingRequest::from_args(Some("missing"), Some("a"), None, None).unwrap(),
    ] {
        let err = MissingPlotter::default().plot(&df, &request, true).unwrap_err();
        match err {
            MissingError::UnsupportedColumnType { column, .. } => assert_eq!(column, "when"),
            other => panic!("unexpected error: {other}"),
        }
    }
}

#[test]
fn test_unknown_column_reports_name() {
    let df = load_suicide_rates();
    let err = plot_missing(&df, Some("continent"), None, None, None, false).unwrap_err();
    assert!(matches!(err, MissingError::ColumnNotFound(ref name) if name == "continent"));
}

/// Treats every integer column as categorical.
struct IntegersAsLabels;

impl ColumnClassifier for IntegersAsLabels {
    fn classify(&self, column: &Column) -> lex_missing::MissingResult<ColumnType> {
        match column.dtype() {
            DataType::Int64 => Ok(ColumnType::Categorical),
            _ => DtypeClassifier.classify(column),
        }
    }
}

#[test]
fn test_custom_classifier_drives_rendering() {
    let df = load_suicide_rates();
    let plotter = MissingPlotter::builder()
        .classifier(Arc::new(IntegersAsLabels))
        .render_config(RenderConfig::builder().height(500).build().unwrap())
        .build()
        .unwrap();

    let request = MissingRequest::from_args(Some("HDI_for_year"), Some("year"), None, None)
        .unwrap();
    let output = plotter.plot(&df, &request, false).unwrap();

    assert_eq!(output.figure.titles(), vec!["Bar Chart"]);
    assert_eq!(output.figure.charts()[0].height, 500);
}

#[test]
fn test_figure_json_output() {
    let df = load_suicide_rates();
    let output = plot_missing(&df, None, None, Some(4), None, false).unwrap();
    let json = serde_json::to_value(&output.figure).unwrap();

    assert_eq!(json["type"], "tabs");
    assert_eq!(json["tabs"][0]["chart"]["plot"]["kind"], "heatmap");
    assert_eq!(json["tabs"][0]["chart"]["plot"]["n_rows"], 4);
    assert!(matches!(output.figure, Figure::Tabs { .. }));
}
