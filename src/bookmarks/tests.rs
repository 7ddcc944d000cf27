use super::*;

fn sample() -> TimestampTrack {
    TimestampTrack::new([1.0, 2.0])
}

fn is_ordered_by_second(stamps: &[f64]) -> bool {
    stamps
        .windows(2)
        .all(|w| w[0] < w[1] && second_of(w[0]) != second_of(w[1]))
}

#[test]
fn empty_input_is_a_single_zero_bookmark() {
    let track = TimestampTrack::new(Vec::new());
    assert_eq!(track.stamps(), &[0.0]);
    assert_eq!(track.index(), 0);
    assert_eq!(track.stamp(), 0.0);
}

#[test]
fn cursor_starts_on_the_last_bookmark() {
    let track = TimestampTrack::new([0.0, 4.5, 9.25]);
    assert_eq!(track.index(), 2);
    assert_eq!(track.stamp(), 9.25);
}

#[test]
fn stored_positions_are_normalized() {
    let track = TimestampTrack::new([9.0, 0.0, 3.7, 3.2, f64::NAN]);
    assert_eq!(track.stamps(), &[0.0, 3.2, 9.0]);
}

#[test]
fn stored_positions_within_one_second_keep_the_earliest() {
    let track = TimestampTrack::new([0.1, 0.2]);
    assert_eq!(track.stamps(), &[0.1]);
    assert_eq!(track.index(), 0);
    assert_eq!(track.stamp(), 0.1);
}

#[test]
fn add_inserts_in_order_and_moves_cursor() {
    let mut track = TimestampTrack::new([0.0, 10.0]);
    assert!(track.add(4.2));
    assert_eq!(track.stamps(), &[0.0, 4.2, 10.0]);
    assert_eq!(track.index(), 1);
    assert_eq!(track.stamp(), 4.2);
}

#[test]
fn add_rejects_same_whole_second() {
    let mut track = sample();
    let before = track.clone();
    assert!(!track.add(2.0));
    assert!(!track.add(2.9));
    assert!(!track.add(1.01));
    assert_eq!(track, before);
}

#[test]
fn add_grows_by_exactly_one() {
    let mut track = sample();
    let len = track.len();
    assert!(track.add(3.0));
    assert_eq!(track.len(), len + 1);
    assert!(track.stamps().contains(&3.0));
}

#[test]
fn add_keeps_track_sorted_for_any_sequence() {
    let mut track = TimestampTrack::default();
    for p in [5.5, 1.2, 9.9, 1.8, 0.4, 7.0, 5.1, 12.3, 3.3, 9.0] {
        track.add(p);
        assert!(is_ordered_by_second(track.stamps()), "{:?}", track.stamps());
    }
    assert_eq!(track.stamps(), &[0.0, 1.2, 3.3, 5.5, 7.0, 9.9, 12.3]);
}

#[test]
fn add_rejects_non_finite_positions() {
    let mut track = sample();
    assert!(!track.add(f64::NAN));
    assert!(!track.add(f64::INFINITY));
    assert_eq!(track.len(), 2);
}

#[test]
fn set_index_clamps_to_valid_range() {
    let mut track = TimestampTrack::new([0.0, 1.0, 2.0]);
    for (value, expected) in [(-5, 0), (-1, 0), (0, 0), (1, 1), (2, 2), (3, 2), (10, 2)] {
        track.set_index(value);
        assert_eq!(track.index(), expected, "set_index({value})");
    }
}

#[test]
fn shift_past_the_end_keeps_the_last_index() {
    let mut track = sample();
    let index = track.index();
    for delta in [1, 3, 10] {
        track.shift(delta);
        assert_eq!(track.index(), index);
    }
}

#[test]
fn range_spans_to_next_bookmark() {
    let mut track = sample();
    track.set_index(0);
    assert_eq!(track.range(), (1.0, Some(2.0)));
    track.set_index(1);
    assert_eq!(track.range(), (2.0, None));
}

#[test]
fn range_of_single_entry_is_unbounded_from_zero() {
    let track = TimestampTrack::new([7.0]);
    assert_eq!(track.range(), (0.0, None));
}

#[test]
fn remove_first_bookmark_is_rejected() {
    let mut track = TimestampTrack::new([0.0, 5.0, 8.0]);
    track.set_index(0);
    let before = track.clone();
    assert!(matches!(track.remove(), Err(Error::InvalidRemoval)));
    assert_eq!(track, before);
}

#[test]
fn remove_drops_exactly_the_current_entry() {
    let mut track = TimestampTrack::new([0.0, 5.0, 8.0]);
    track.set_index(1);
    assert_eq!(track.remove().unwrap(), 5.0);
    assert_eq!(track.stamps(), &[0.0, 8.0]);
    assert_eq!(track.index(), 1);
}

#[test]
fn remove_last_entry_reclamps_cursor() {
    let mut track = TimestampTrack::new([0.0, 5.0, 8.0]);
    assert_eq!(track.remove().unwrap(), 8.0);
    assert_eq!(track.index(), 1);
    assert_eq!(track.stamp(), 5.0);
}

#[test]
fn segment_at_finds_enclosing_bookmark() {
    let track = TimestampTrack::new([0.0, 5.0, 8.0]);
    assert_eq!(track.segment_at(0.0), 0);
    assert_eq!(track.segment_at(4.99), 0);
    assert_eq!(track.segment_at(5.0), 1);
    assert_eq!(track.segment_at(100.0), 2);

    let shifted = TimestampTrack::new([2.0, 6.0]);
    assert_eq!(shifted.segment_at(1.0), 0);
}

#[test]
fn label_shows_index_over_last_index() {
    let mut track = TimestampTrack::new([0.0, 5.0, 8.0]);
    assert_eq!(track.label(), "2/2");
    track.set_index(0);
    assert_eq!(track.label(), "0/2");
}
