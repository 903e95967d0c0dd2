//! Property tests checking the store against a plain bool-per-column model.

use bitvec::prelude::*;
use core_visibility::{Frame, HiddenColumns};
use proptest::prelude::*;

const WIDTH: i64 = 240;

fn ranges() -> impl Strategy<Value = Vec<(i64, i64)>> {
    prop::collection::vec((0i64..200, 0i64..25), 0..12)
        .prop_map(|v| v.into_iter().map(|(s, len)| (s, s + len)).collect())
}

fn model(ranges: &[(i64, i64)]) -> Vec<bool> {
    let mut hidden = vec![false; WIDTH as usize];
    for &(s, e) in ranges {
        for c in s..=e {
            hidden[c as usize] = true;
        }
    }
    hidden
}

fn build(ranges: &[(i64, i64)]) -> HiddenColumns {
    let mut h = HiddenColumns::new();
    for &(s, e) in ranges {
        h.hide(s, e).unwrap();
    }
    h
}

proptest! {
    #[test]
    fn regions_stay_sorted_disjoint_and_spaced(input in ranges()) {
        let h = build(&input);
        let regions: Vec<_> = h.regions().collect();
        for w in regions.windows(2) {
            prop_assert!(w[0].end + 1 < w[1].start, "{:?} then {:?}", w[0], w[1]);
        }
        prop_assert_eq!(h.size(), regions.iter().map(|r| r.len()).sum::<i64>());
    }

    #[test]
    fn visibility_matches_model(input in ranges()) {
        let h = build(&input);
        let hidden = model(&input);
        for c in 0..WIDTH {
            prop_assert_eq!(h.is_visible(c), !hidden[c as usize], "column {}", c);
        }
    }

    #[test]
    fn absolute_to_visible_counts_hidden_before(input in ranges()) {
        let h = build(&input);
        let hidden = model(&input);
        let mut before = 0;
        for c in 0..WIDTH {
            prop_assert_eq!(h.absolute_to_visible(c), c - before);
            if hidden[c as usize] {
                before += 1;
            }
        }
    }

    #[test]
    fn visible_round_trip(input in ranges()) {
        let h = build(&input);
        for v in 0..(WIDTH - h.size()) {
            prop_assert_eq!(h.absolute_to_visible(h.visible_to_absolute(v)), v);
        }
    }

    #[test]
    fn absolute_to_visible_is_monotonic(input in ranges()) {
        let h = build(&input);
        let mapped: Vec<i64> = (0..WIDTH).map(|c| h.absolute_to_visible(c)).collect();
        prop_assert!(mapped.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn hiding_twice_changes_nothing(input in ranges()) {
        let once = build(&input);
        let mut twice = once.clone();
        for &(s, e) in &input {
            twice.hide(s, e).unwrap();
        }
        prop_assert_eq!(&twice, &once);
        prop_assert_eq!(twice.generation(), once.generation());
    }

    #[test]
    fn hide_order_does_not_matter(input in ranges()) {
        let forward = build(&input);
        let reversed: Vec<_> = input.iter().rev().copied().collect();
        prop_assert_eq!(build(&reversed), forward);
    }

    #[test]
    fn clear_and_hide_sets_window_exactly(
        input in ranges(),
        marks in prop::collection::vec(any::<bool>(), WIDTH as usize),
        lo in 0i64..WIDTH,
        span in 0i64..80,
    ) {
        let hi = (lo + span).min(WIDTH);
        let mut h = build(&input);
        let before = model(&input);
        let bits: BitVec = marks.iter().copied().collect();
        h.clear_and_hide(&bits, lo, hi).unwrap();
        for c in 0..WIDTH {
            let expected = if (lo..hi).contains(&c) {
                marks[c as usize]
            } else {
                before[c as usize]
            };
            prop_assert_eq!(!h.is_visible(c), expected, "column {}", c);
        }
    }

    #[test]
    fn reveal_all_reports_every_hidden_column(input in ranges()) {
        let mut h = build(&input);
        let hidden = model(&input);
        let expected: Vec<i64> = (0..WIDTH).filter(|&c| hidden[c as usize]).collect();
        let mut revealed = Vec::new();
        h.reveal_all(&mut revealed);
        prop_assert_eq!(revealed, expected);
        prop_assert!(!h.has_hidden());
    }

    #[test]
    fn blocks_cover_visible_window(input in ranges(), lo in 0i64..WIDTH, span in 0i64..WIDTH) {
        let hi = (lo + span).min(WIDTH);
        let h = build(&input);
        let from_blocks: Vec<i64> = h
            .visible_blocks(lo, hi, Frame::Absolute)
            .flat_map(|b| b.start..=b.end)
            .collect();
        let expected: Vec<i64> = (lo..hi).filter(|&c| h.is_visible(c)).collect();
        prop_assert_eq!(from_blocks, expected);
    }
}
