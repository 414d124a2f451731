use super::*;

#[test]
fn select_and_deselect() {
    let mut s = Selection::default();
    s.select(4, true);
    s.select(4, true);
    s.select(9, true);
    assert_eq!(s.len(), 2);

    s.select(4, false);
    assert!(!s.contains(4));
    assert!(s.contains(9));
}

#[test]
fn select_all_leaves_other_rows_alone() {
    let mut s = Selection::default();
    s.select(1, true);

    s.select_all([5, 6, 7], true);
    assert_eq!(s.ids().iter().copied().collect::<Vec<_>>(), vec![1, 5, 6, 7]);

    s.select_all([5, 6, 7], false);
    assert_eq!(s.ids().iter().copied().collect::<Vec<_>>(), vec![1]);
}

#[test]
fn retain_prunes_missing_ids() {
    let mut s = Selection::default();
    s.select_all([1, 2, 3], true);

    s.retain(|id| id != 2);

    assert_eq!(s.len(), 2);
    assert!(!s.contains(2));
    s.clear();
    assert!(s.is_empty());
}
