use super::*;

#[test]
fn total_pages_matches_ceiling_formula() {
    for page_size in 1..=12 {
        for count in 0..=60 {
            let expected = std::cmp::max(1, (count + page_size - 1) / page_size);
            assert_eq!(total_pages(count, page_size), expected, "count={count} size={page_size}");
        }
    }
}

#[test]
fn zero_page_size_counts_as_one() {
    assert_eq!(total_pages(5, 0), 5);
    assert_eq!(page_range(2, 0, 5), 1..2);
}

#[test]
fn clamp_never_leaves_range() {
    for total in 1..=5 {
        for page in 0..=8 {
            let clamped = clamp_page(page, total);
            assert!((1..=total).contains(&clamped));
        }
    }
    assert_eq!(clamp_page(3, 0), 1);
}

#[test]
fn page_range_slices() {
    assert_eq!(page_range(1, 10, 25), 0..10);
    assert_eq!(page_range(3, 10, 25), 20..25);
    assert_eq!(page_range(4, 10, 25), 25..25);
    assert_eq!(page_range(1, 10, 0), 0..0);
}
