//! Lane assignment: greedy interval-graph coloring for overlap-free rows.

/// Lane assignment for a set of intervals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaneAssignment {
    /// Lane index per input interval, in input order.
    pub lanes: Vec<usize>,
    /// Total number of lanes opened.
    pub lane_count: usize,
}

/// Assign each `(start, end)` interval to the lowest-indexed lane whose last
/// end instant is at or before the interval's start, opening a new lane when
/// none qualifies. Intervals are processed in ascending start order (ties
/// keep input order), which makes the greedy choice optimal: the lane count
/// equals the maximum number of intervals alive at any single instant.
pub fn assign_lanes(intervals: &[(i64, i64)]) -> LaneAssignment {
    let mut order: Vec<usize> = (0..intervals.len()).collect();
    order.sort_by_key(|&i| intervals[i].0);

    let mut lane_ends: Vec<i64> = Vec::new();
    let mut lanes = vec![0usize; intervals.len()];

    for &i in &order {
        let (start, end) = intervals[i];
        match lane_ends.iter().position(|&e| e <= start) {
            Some(lane) => {
                // Keep the later end in case the interval is inverted.
                lane_ends[lane] = lane_ends[lane].max(end);
                lanes[i] = lane;
            }
            None => {
                lanes[i] = lane_ends.len();
                lane_ends.push(end);
            }
        }
    }

    LaneAssignment {
        lanes,
        lane_count: lane_ends.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two intervals overlap if they share more than a boundary instant.
    fn overlaps(a: (i64, i64), b: (i64, i64)) -> bool {
        a.0 < b.1 && b.0 < a.1
    }

    /// Maximum number of intervals alive at any single instant.
    fn clique_number(intervals: &[(i64, i64)]) -> usize {
        let mut best = 0;
        for &(start, _) in intervals {
            let alive = intervals
                .iter()
                .filter(|&&(s, e)| s <= start && start < e.max(s + 1))
                .count();
            best = best.max(alive);
        }
        best
    }

    #[test]
    fn overlapping_pair_splits_third_reuses() {
        // [d1,d3], [d2,d4], [d5,d6]: first two conflict, third fits lane 0.
        let intervals = [(1, 3), (2, 4), (5, 6)];
        let a = assign_lanes(&intervals);
        assert_eq!(a.lanes, vec![0, 1, 0]);
        assert_eq!(a.lane_count, 2);
    }

    #[test]
    fn touching_intervals_share_a_lane() {
        let intervals = [(1, 3), (3, 5)];
        let a = assign_lanes(&intervals);
        assert_eq!(a.lanes, vec![0, 0]);
        assert_eq!(a.lane_count, 1);
    }

    #[test]
    fn assignment_is_deterministic() {
        let intervals = [(1, 10), (2, 4), (3, 6), (5, 9), (11, 12)];
        let first = assign_lanes(&intervals);
        let second = assign_lanes(&intervals);
        assert_eq!(first, second);
    }

    #[test]
    fn no_two_intervals_in_a_lane_overlap() {
        let intervals = [
            (0, 10),
            (1, 4),
            (2, 8),
            (4, 6),
            (6, 12),
            (9, 11),
            (10, 15),
        ];
        let a = assign_lanes(&intervals);
        for i in 0..intervals.len() {
            for j in (i + 1)..intervals.len() {
                if a.lanes[i] == a.lanes[j] {
                    assert!(
                        !overlaps(intervals[i], intervals[j]),
                        "intervals {:?} and {:?} share lane {}",
                        intervals[i],
                        intervals[j],
                        a.lanes[i]
                    );
                }
            }
        }
    }

    #[test]
    fn lane_count_matches_maximum_concurrency() {
        let cases: Vec<Vec<(i64, i64)>> = vec![
            vec![(1, 3), (2, 4), (5, 6)],
            vec![(0, 10), (1, 9), (2, 8), (3, 7)],
            vec![(0, 1), (2, 3), (4, 5)],
            vec![(0, 5), (5, 10), (2, 7)],
        ];
        for intervals in cases {
            let a = assign_lanes(&intervals);
            assert_eq!(
                a.lane_count,
                clique_number(&intervals),
                "intervals {:?}",
                intervals
            );
        }
    }

    #[test]
    fn zero_width_milestones_pack_like_points() {
        // Two milestones at the same instant can share a lane; a bar across
        // that instant cannot join them.
        let intervals = [(5, 5), (5, 5), (4, 6)];
        let a = assign_lanes(&intervals);
        assert_eq!(a.lanes[0], a.lanes[1]);
        assert_ne!(a.lanes[2], a.lanes[0]);
    }

    #[test]
    fn empty_input_yields_no_lanes() {
        let a = assign_lanes(&[]);
        assert!(a.lanes.is_empty());
        assert_eq!(a.lane_count, 0);
    }
}
