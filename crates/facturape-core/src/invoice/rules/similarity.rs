//! Sequence-matching similarity between OCR text and reference strings.
//!
//! The score is the classic matching-blocks ratio `2 * M / T`: `M` counts the
//! characters in common contiguous blocks found by repeatedly taking the
//! longest common block and recursing on both sides of it, `T` is the total
//! length of both strings. Unlike edit distance it rewards long intact runs,
//! which is what survives when OCR swaps a few glyphs in a merchant name.

/// Similarity ratio in `[0, 1]`. Case-sensitive; callers normalize first.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    let matched = matching_characters(&a, &b);
    2.0 * matched as f64 / total as f64
}

/// Total length of the matching blocks between `a` and `b`.
fn matching_characters(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, size) = longest_match(a, b, alo, ahi, blo, bhi);
        if size == 0 {
            continue;
        }
        matched += size;

        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + size < ahi && j + size < bhi {
            pending.push((i + size, ahi, j + size, bhi));
        }
    }

    matched
}

/// Longest common block of `a[alo..ahi]` and `b[blo..bhi]`.
///
/// Ties go to the block starting earliest in `a`, then earliest in `b`.
/// Returns `(start_in_a, start_in_b, length)`.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);

    // run[j - blo] = length of the common run ending at a[i - 1], b[j - 1]
    let mut run = vec![0usize; bhi - blo + 1];
    for i in alo..ahi {
        let mut next = vec![0usize; bhi - blo + 1];
        for j in blo..bhi {
            if a[i] != b[j] {
                continue;
            }
            let k = run[j - blo] + 1;
            next[j - blo + 1] = k;
            if k > best_size {
                best_i = i + 1 - k;
                best_j = j + 1 - k;
                best_size = k;
            }
        }
        run = next;
    }

    (best_i, best_j, best_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_identical_and_disjoint() {
        assert!(approx(similarity("DOLLARCITY", "DOLLARCITY"), 1.0));
        assert!(approx(similarity("ABC", "XYZ"), 0.0));
        assert!(approx(similarity("", ""), 1.0));
        assert!(approx(similarity("ABC", ""), 0.0));
    }

    #[test]
    fn test_ocr_substitutions() {
        // Blocks D, LLARC, TY: 8 of 20 characters on each side
        assert!(approx(similarity("D0LLARC1TY", "DOLLARCITY"), 0.8));
    }

    #[test]
    fn test_recursive_blocks() {
        // Longest block "BCD", then "A" is unmatched on the left, "E"/"F" differ
        assert!(approx(similarity("ABCDE", "XBCDF"), 0.6));
        // Blocks "TOT" only: 6 / 11
        assert!(approx(similarity("TOTAL", "TOTTUS"), 6.0 / 11.0));
    }

    #[test]
    fn test_block_order_matters() {
        // "AB" then "CD" cannot both match once crossed
        assert!(approx(similarity("ABCD", "CDAB"), 0.5));
    }

    #[test]
    fn test_symmetric_on_simple_inputs() {
        let pairs = [("PLAZA VEA", "PLAZAVEA"), ("SAGA FALABELA", "SAGA FALABELLA")];
        for (a, b) in pairs {
            assert!(approx(similarity(a, b), similarity(b, a)));
        }
    }

    #[test]
    fn test_case_sensitive() {
        assert!(similarity("dollarcity", "DOLLARCITY") < 0.1);
    }
}
