//! # Grid Tests

use pretty_assertions::assert_eq;

use cachesweep_core::sweep::Grid;

use crate::common::harness::strings;

#[test]
fn test_last_axis_varies_fastest() {
    let ic = strings(&["1kB", "2kB"]);
    let dc = strings(&["4kB", "8kB", "16kB"]);
    let cells: Vec<Vec<&str>> = Grid::new(vec![ic.as_slice(), dc.as_slice()]).collect();
    assert_eq!(
        cells,
        vec![
            vec!["1kB", "4kB"],
            vec!["1kB", "8kB"],
            vec!["1kB", "16kB"],
            vec!["2kB", "4kB"],
            vec!["2kB", "8kB"],
            vec!["2kB", "16kB"],
        ]
    );
}

#[test]
fn test_len_matches_product() {
    let a = strings(&["1", "2", "4"]);
    let b = strings(&["16", "32"]);
    let c = strings(&["x"]);
    let grid = Grid::new(vec![a.as_slice(), b.as_slice(), c.as_slice()]);
    assert_eq!(grid.len(), 6);
    assert_eq!(grid.count(), 6);
}

#[test]
fn test_empty_axis_yields_nothing() {
    let a = strings(&["1"]);
    let empty: Vec<String> = Vec::new();
    let grid = Grid::new(vec![a.as_slice(), empty.as_slice()]);
    assert!(grid.is_empty());
    assert_eq!(grid.count(), 0);
}
