//! Tests for the columnar data structures

use approx::assert_abs_diff_eq;

use super::*;

// ==================== Fixtures ====================

fn small_dataset() -> Dataset {
    DatasetBuilder::new()
        .with_values("x", vec![1.0, 2.0, 3.0, 4.0, 5.0])
        .unwrap()
        .with_values("y", vec![2.0, 4.0, 6.0, 8.0, 10.0])
        .unwrap()
        .build()
}

// ==================== Column Tests ====================

#[test]
fn test_column_missing_values() {
    let col = Column::from_optional(vec![Some(1.0), None, Some(3.0)]);

    assert_eq!(col.len(), 3);
    assert_eq!(col.get(0), Some(1.0));
    assert_eq!(col.get(1), None);
    assert!(!col.is_present(1));
    assert_eq!(col.present().count(), 2);
}

#[test]
fn test_column_get_out_of_range() {
    let col = Column::from_values(vec![1.0]);
    assert_eq!(col.get(5), None);
}

#[test]
fn test_column_statistics_skip_missing() {
    let col = Column::from_optional(vec![Some(2.0), None, Some(4.0), Some(6.0)]);

    assert_abs_diff_eq!(col.mean().unwrap(), 4.0);
    assert_abs_diff_eq!(col.std_dev().unwrap(), 2.0);
    assert_abs_diff_eq!(col.min().unwrap(), 2.0);
    assert_abs_diff_eq!(col.max().unwrap(), 6.0);
}

#[test]
fn test_column_quantile_interpolates() {
    let col = Column::from_values(vec![1.0, 2.0, 3.0, 4.0]);

    assert_abs_diff_eq!(col.quantile(0.5).unwrap(), 2.5);
    assert_abs_diff_eq!(col.quantile(0.0).unwrap(), 1.0);
    assert_abs_diff_eq!(col.quantile(1.0).unwrap(), 4.0);
    assert_abs_diff_eq!(col.quantile(0.25).unwrap(), 1.75);
}

#[test]
fn test_column_empty_has_no_stats() {
    let col = Column::from_values(Vec::<f64>::new());
    assert!(col.stats().is_none());
    assert!(col.mean().is_none());
}

#[test]
fn test_column_map_present_keeps_missing() {
    let col = Column::from_optional(vec![Some(1.0), None, Some(2.0)]);
    let doubled = col.map_present(|v| v * 2.0);

    assert_eq!(doubled.get(0), Some(2.0));
    assert_eq!(doubled.get(1), None);
    assert_eq!(doubled.get(2), Some(4.0));
}

#[test]
fn test_column_filter() {
    let col = Column::from_values(vec![1.0, 2.0, 3.0]);
    let kept = col.filter(&[true, false, true]).unwrap();

    assert_eq!(kept.len(), 2);
    assert_eq!(kept.get(1), Some(3.0));

    let err = col.filter(&[true]);
    assert!(matches!(err, Err(DataError::DimensionMismatch { .. })));
}

// ==================== Builder Tests ====================

#[test]
fn test_builder_rejects_duplicate_column() {
    let result = DatasetBuilder::new()
        .with_values("x", vec![1.0])
        .unwrap()
        .with_values("x", vec![2.0]);

    assert!(matches!(result, Err(DataError::DuplicateColumn(name)) if name == "x"));
}

#[test]
fn test_builder_rejects_ragged_columns() {
    let result = DatasetBuilder::new()
        .with_values("x", vec![1.0, 2.0])
        .unwrap()
        .with_values("y", vec![1.0]);

    assert!(matches!(result, Err(DataError::DimensionMismatch { .. })));
}

// ==================== Dataset Tests ====================

#[test]
fn test_dataset_shape_and_names() {
    let data = small_dataset();

    assert_eq!(data.shape(), (5, 2));
    assert_eq!(data.column_names(), vec!["x", "y"]);
    assert!(data.has_column("x"));
    assert!(!data.has_column("z"));
}

#[test]
fn test_dataset_require_column() {
    let data = small_dataset();

    assert!(data.require_column("y").is_ok());
    assert!(matches!(
        data.require_column("missing"),
        Err(DataError::ColumnNotFound(name)) if name == "missing"
    ));
}

#[test]
fn test_dataset_filter_rows() {
    let data = small_dataset();
    let mask = [true, false, true, false, true];
    let kept = data.filter(&mask).unwrap();

    assert_eq!(kept.nrows(), 3);
    assert_abs_diff_eq!(kept.column("y").unwrap().values()[2], 10.0);
}

#[test]
fn test_dataset_with_column_checks_length() {
    let data = small_dataset();
    let result = data.with_column("z", Column::from_values(vec![1.0]));

    assert!(matches!(result, Err(DataError::DimensionMismatch { .. })));
}

#[test]
fn test_dataset_replace_column() {
    let mut data = small_dataset();
    data.replace_column("x", Column::from_values(vec![0.0; 5]))
        .unwrap();
    assert_abs_diff_eq!(data.column("x").unwrap().values()[3], 0.0);

    let err = data.replace_column("z", Column::from_values(vec![0.0; 5]));
    assert!(matches!(err, Err(DataError::ColumnNotFound(_))));
}

#[test]
fn test_dataset_complete_mask() {
    let data = DatasetBuilder::new()
        .with_column(
            "a",
            Column::from_optional(vec![Some(1.0), None, Some(3.0)]),
        )
        .unwrap()
        .with_column(
            "b",
            Column::from_optional(vec![Some(1.0), Some(2.0), None]),
        )
        .unwrap()
        .build();

    let mask = data.complete_mask(&["a", "b"]).unwrap();
    assert_eq!(mask, vec![true, false, false]);

    assert!(data.complete_mask(&["a", "c"]).is_err());
}

#[test]
fn test_dataset_display() {
    let data = small_dataset();
    assert_eq!(format!("{}", data), "Dataset(5 rows × 2 cols)");
}
