use dumpscope::aggregate::{
    normalize, sort_by_timestamp, time_blocks, AggregateError, Axis, AxisFilter, AxisFilters,
    FilterError, TimeBlockAggregator,
};
use dumpscope::core::{Point3D, Record};

fn filters() -> AxisFilters {
    AxisFilters::new(
        AxisFilter::new(0x01, 0x02),
        AxisFilter::new(0x03, 0x04),
        AxisFilter::new(0x05, 0x06),
    )
}

fn x(timestamp: u16, payload: u8) -> Record {
    Record::new(timestamp, 0x01, 0x02, payload)
}

fn y(timestamp: u16, payload: u8) -> Record {
    Record::new(timestamp, 0x03, 0x04, payload)
}

fn z(timestamp: u16, payload: u8) -> Record {
    Record::new(timestamp, 0x05, 0x06, payload)
}

fn assert_close(actual: Point3D, expected: Point3D) {
    for (a, e) in actual.to_array().iter().zip(expected.to_array()) {
        assert!((a - e).abs() < 1e-9, "{:?} != {:?}", actual, expected);
    }
}

#[test]
fn test_sort_then_group_time_blocks() {
    let records: Vec<Record> = [5, 5, 3, 3, 3, 7]
        .iter()
        .map(|&t| Record::new(t, 0, 0, 0))
        .collect();

    let sorted = sort_by_timestamp(&records);
    let blocks = time_blocks(&sorted);

    let timestamps: Vec<u16> = blocks.iter().map(|b| b.timestamp).collect();
    let sizes: Vec<usize> = blocks.iter().map(|b| b.len()).collect();
    assert_eq!(timestamps, vec![3, 5, 7]);
    assert_eq!(sizes, vec![3, 2, 1]);
}

#[test]
fn test_fewer_than_two_records_yield_no_points() {
    let aggregator = TimeBlockAggregator::new(filters(), 0);
    assert!(aggregator.aggregate(&[]).unwrap().is_empty());
    assert!(aggregator.aggregate(&[x(1, 10)]).unwrap().is_empty());
}

#[test]
fn test_one_point_per_block_without_coalescing() {
    let records = vec![x(2, 40), z(2, 100), x(1, 10), x(1, 30), y(1, 50)];
    let points = TimeBlockAggregator::new(filters(), 0)
        .aggregate(&records)
        .unwrap();

    assert_eq!(points.len(), 2);
    assert_close(points[0], Point3D::new(0.2, 0.5, 0.0));
    assert_close(points[1], Point3D::new(0.4, 0.0, 1.0));
}

#[test]
fn test_coalescing_merges_consecutive_blocks() {
    let records = vec![x(1, 10), x(1, 30), y(1, 50), x(2, 40), z(2, 100)];
    let points = TimeBlockAggregator::new(filters(), 1)
        .aggregate(&records)
        .unwrap();

    assert_eq!(points.len(), 1);
    assert_close(points[0], Point3D::new(80.0 / 3.0 / 100.0, 0.5, 1.0));
}

#[test]
fn test_coalescing_window_sizes() {
    let records: Vec<Record> = (0..8).map(|t| x(t, 10 + t as u8)).collect();

    let per_block = TimeBlockAggregator::new(filters(), 0);
    assert_eq!(per_block.aggregate(&records).unwrap().len(), 8);

    let pairs = TimeBlockAggregator::new(filters(), 1);
    assert_eq!(pairs.aggregate(&records).unwrap().len(), 4);

    let triples = TimeBlockAggregator::new(filters(), 2);
    // 8 blocks fill two windows of three; the last two blocks are dropped
    assert_eq!(triples.aggregate(&records).unwrap().len(), 2);
}

#[test]
fn test_unmatched_axis_contributes_zero() {
    let records = vec![x(1, 10), x(2, 20)];
    let raw = TimeBlockAggregator::new(filters(), 0).averaged_points(&records);

    assert_eq!(
        raw,
        vec![Point3D::new(10.0, 0.0, 0.0), Point3D::new(20.0, 0.0, 0.0)]
    );
}

#[test]
fn test_normalized_cloud_is_within_unit_range() {
    let records = vec![
        x(1, 3),
        y(1, 200),
        z(1, 17),
        x(2, 90),
        y(2, 12),
        z(3, 250),
        x(3, 1),
    ];
    let points = TimeBlockAggregator::new(filters(), 0)
        .aggregate(&records)
        .unwrap();

    let coordinates: Vec<f64> = points.iter().flat_map(|p| p.to_array()).collect();
    assert!(coordinates.iter().all(|c| (0.0..=1.0).contains(c)));
    assert!(coordinates.iter().any(|&c| c == 1.0));
}

#[test]
fn test_all_zero_cloud_is_degenerate() {
    let records = vec![Record::new(1, 9, 9, 50), Record::new(2, 9, 9, 60)];
    let result = TimeBlockAggregator::new(filters(), 0).aggregate(&records);
    assert_eq!(result, Err(AggregateError::DegenerateNormalization));
}

#[test]
fn test_normalize_divides_by_global_max() {
    let mut points = vec![Point3D::new(2.0, 4.0, 1.0), Point3D::new(8.0, 0.0, 6.0)];
    normalize(&mut points).unwrap();
    assert_eq!(points[0], Point3D::new(0.25, 0.5, 0.125));
    assert_eq!(points[1], Point3D::new(1.0, 0.0, 0.75));
}

#[test]
fn test_malformed_filter_hex_is_rejected() {
    let err = AxisFilter::from_hex(Axis::X, "g1", "02").unwrap_err();
    assert!(matches!(err, FilterError::InvalidHex { axis: Axis::X, field: "source", .. }));

    let err = AxisFilter::from_hex(Axis::Z, "01", "0203").unwrap_err();
    assert!(matches!(err, FilterError::WrongLength { len: 2, .. }));

    let err = AxisFilter::from_hex(Axis::Y, "", "02").unwrap_err();
    assert!(matches!(err, FilterError::WrongLength { len: 0, .. }));
}
