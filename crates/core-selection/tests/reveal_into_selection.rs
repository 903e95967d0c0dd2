use core_selection::ColumnSelection;
use core_visibility::HiddenColumns;
use pretty_assertions::assert_eq;

#[test]
fn reveal_all_selects_revealed_columns_in_order() {
    let mut hidden = HiddenColumns::new();
    let mut selection = ColumnSelection::new();
    hidden.hide(4, 6).unwrap();
    hidden.hide(15, 18).unwrap();
    hidden.reveal_all(&mut selection);
    assert!(!hidden.has_hidden());
    assert_eq!(selection.selected(), &[4, 5, 6, 15, 16, 17, 18]);
}

#[test]
fn reveal_one_region_selects_it() {
    let mut hidden = HiddenColumns::from_ranges([(5, 8), (20, 21)]).unwrap();
    let mut selection = ColumnSelection::new();
    selection.add(30);
    hidden.reveal(5, &mut selection);
    assert_eq!(selection.selected(), &[30, 5, 6, 7, 8]);
    assert_eq!(hidden.size(), 2);
    // no region starts at 21, so nothing changes
    hidden.reveal(21, &mut selection);
    assert_eq!(selection.len(), 5);
}

#[test]
fn hide_selected_then_reveal_restores_selection() {
    let mut hidden = HiddenColumns::new();
    let mut selection = ColumnSelection::new();
    for c in [10, 11, 12, 30] {
        selection.add(c);
    }
    selection.hide_selected_columns(11, &mut hidden).unwrap();
    assert_eq!(selection.selected(), &[30]);
    hidden.reveal(10, &mut selection);
    assert_eq!(selection.selected_ranges(), vec![(10, 12), (30, 30)]);
}
