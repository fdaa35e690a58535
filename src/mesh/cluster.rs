/// Merge near-duplicate line coordinates.
///
/// Values are sorted, then grouped greedily: a value joins the current group
/// when it lies within `threshold` of the group's *last* member (chained, so
/// a group may drift). Each group is replaced by its integer median; for an
/// even-sized group that is the truncated mean of the two middle members.
///
/// The output is strictly ascending and a fixed point of this function.
pub fn cluster_lines(lines: &[u32], threshold: u32) -> Vec<u32> {
    let mut sorted = lines.to_vec();
    sorted.sort_unstable();

    let mut out = Vec::new();
    let mut group: Vec<u32> = Vec::new();
    for v in sorted {
        if let Some(&last) = group.last() {
            if v - last > threshold {
                out.push(integer_median(&group));
                group.clear();
            }
        }
        group.push(v);
    }
    if !group.is_empty() {
        out.push(integer_median(&group));
    }
    out
}

/// Median of a sorted, non-empty slice, truncated to an integer.
fn integer_median(sorted: &[u32]) -> u32 {
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        ((sorted[n / 2 - 1] as u64 + sorted[n / 2] as u64) / 2) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(cluster_lines(&[], 4).is_empty());
    }

    #[test]
    fn groups_are_chained_from_the_last_member() {
        // 10 -> 13 -> 16 -> 19 chain even though 19 is 9 away from 10.
        let out = cluster_lines(&[19, 10, 16, 13, 40, 41], 4);
        assert_eq!(out, vec![14, 40]);
    }

    #[test]
    fn duplicates_collapse() {
        assert_eq!(cluster_lines(&[7, 7, 7, 30, 30], 0), vec![7, 30]);
    }

    #[test]
    fn output_is_strictly_ascending_and_idempotent() {
        let raw = [0, 3, 9, 10, 11, 12, 25, 26, 60, 61, 62, 99, 127, 124];
        let once = cluster_lines(&raw, 4);
        assert!(once.windows(2).all(|w| w[1] - w[0] > 4), "{once:?}");
        assert_eq!(cluster_lines(&once, 4), once);
    }
}
