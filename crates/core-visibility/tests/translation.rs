//! Coordinate translation scenarios, including cursor reuse across calls.

use core_visibility::{Direction, HiddenColumns, HiddenRows, IgnoreRevealed};

#[test]
fn distance_counts_only_regions_between_the_columns() {
    let h = HiddenColumns::from_ranges([(53, 76), (104, 125)]).unwrap();
    // 80 and 52 are 28 apart; the 24 columns of 53..=76 collapse and
    // 104..=125 lies past both
    assert_eq!(h.absolute_to_visible(80) - h.absolute_to_visible(52), 4);
    assert_eq!(h.absolute_to_visible(130) - h.absolute_to_visible(52), 32);
}

#[test]
fn visible_position_past_three_regions() {
    // 19 hidden columns before 65, so it is shown at 46
    let h = HiddenColumns::from_ranges([(5, 10), (20, 27), (40, 44)]).unwrap();
    assert_eq!(h.absolute_to_visible(65), 46);
    assert_eq!(h.visible_to_absolute(46), 65);
}

#[test]
fn hidden_column_at_origin_maps_to_zero() {
    let h = HiddenColumns::from_ranges([(0, 0)]).unwrap();
    assert_eq!(h.absolute_to_visible(0), 0);
    assert_eq!(h.absolute_to_visible(2), 1);
    assert_eq!(h.visible_to_absolute(0), 1);
}

#[test]
fn round_trip_over_visible_width() {
    let h = HiddenColumns::from_ranges([(0, 2), (5, 5), (9, 14), (30, 31)]).unwrap();
    let width = 40;
    let visible_width = width - h.size();
    for v in 0..visible_width {
        let abs = h.visible_to_absolute(v);
        assert!(h.is_visible(abs), "v={v} mapped to hidden {abs}");
        assert_eq!(h.absolute_to_visible(abs), v);
    }
}

#[test]
fn sequential_scan_matches_fresh_lookups() {
    let h = HiddenColumns::from_ranges([(3, 4), (10, 19), (25, 25), (40, 45)]).unwrap();
    let scanned: Vec<i64> = (0..60).map(|c| h.absolute_to_visible(c)).collect();
    let fresh: Vec<i64> = (0..60).map(|c| h.clone().absolute_to_visible(c)).collect();
    assert_eq!(scanned, fresh);
    // right to left reuses the cursor the other way
    let backwards: Vec<i64> = (0..60).rev().map(|c| h.absolute_to_visible(c)).collect();
    assert_eq!(backwards.into_iter().rev().collect::<Vec<_>>(), fresh);
}

#[test]
fn translation_follows_mutation() {
    let mut h = HiddenColumns::from_ranges([(5, 9)]).unwrap();
    assert_eq!(h.visible_to_absolute(6), 11);
    h.hide(2, 2).unwrap();
    assert_eq!(h.visible_to_absolute(6), 12);
    h.reveal(5, &mut IgnoreRevealed);
    assert_eq!(h.visible_to_absolute(6), 7);
    h.reveal_all(&mut IgnoreRevealed);
    assert_eq!(h.visible_to_absolute(6), 6);
}

#[test]
fn overshoot_is_returned_not_clamped() {
    let h = HiddenColumns::from_ranges([(0, 9)]).unwrap();
    assert_eq!(h.offset_by_visible(-5, 12), -3);
    assert_eq!(h.offset_by_visible(100, 12), 112);
    assert_eq!(h.visible_to_absolute(-4), -4);
}

#[test]
fn boundaries_walk_regions_in_both_directions() {
    let h = HiddenColumns::from_ranges([(5, 10), (15, 20), (30, 31)]).unwrap();
    assert_eq!(h.next_hidden_boundary(Direction::Right, 0), 5);
    assert_eq!(h.next_hidden_boundary(Direction::Right, 12), 15);
    assert_eq!(h.next_hidden_boundary(Direction::Right, 16), 30);
    assert_eq!(h.next_hidden_boundary(Direction::Right, 31), 31);
    assert_eq!(h.next_hidden_boundary(Direction::Left, 40), 31);
    assert_eq!(h.next_hidden_boundary(Direction::Left, 25), 20);
    assert_eq!(h.next_hidden_boundary(Direction::Left, 2), 2);
}

#[test]
fn rows_translate_like_columns() {
    let rows = HiddenRows::from_ranges([(2, 3)]).unwrap();
    assert_eq!(rows.absolute_to_visible(5), 3);
    assert_eq!(rows.visible_to_absolute(2), 4);
    assert_eq!(rows.visible_start_and_end(6), (0, 5));
}
