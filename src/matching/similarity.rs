//! Matching-blocks similarity ratio over character sequences.
//!
//! The score is `2 * M / (len(a) + len(b))`, where `M` is the number of
//! characters covered by the matching blocks found by repeatedly taking the
//! longest common contiguous run and recursing on what lies left and right
//! of it.

use std::collections::HashMap;

/// Second sequences at least this long ignore "popular" characters when
/// seeding a match.
const AUTOJUNK_MIN_LEN: usize = 200;

/// Returns the similarity ratio of two strings, in `[0, 1]`.
///
/// Two empty strings are identical and score `1.0`.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    let matched = BlockMatcher::new(&a, &b).matching_characters();
    2.0 * matched as f64 / total as f64
}

struct BlockMatcher<'a> {
    a: &'a [char],
    b: &'a [char],
    /// Positions of each character in `b`, ascending.
    b2j: HashMap<char, Vec<usize>>,
}

impl<'a> BlockMatcher<'a> {
    fn new(a: &'a [char], b: &'a [char]) -> Self {
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, &c) in b.iter().enumerate() {
            b2j.entry(c).or_default().push(j);
        }

        if b.len() >= AUTOJUNK_MIN_LEN {
            let ntest = b.len() / 100 + 1;
            b2j.retain(|_, positions| positions.len() <= ntest);
        }

        Self { a, b, b2j }
    }

    /// Finds the longest block `a[i..i+k] == b[j..j+k]` inside the given
    /// bounds. Ties go to the smallest `i`, then the smallest `j`.
    fn longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> (usize, usize, usize) {
        let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);

        // j2len[j] = length of the match ending at a[i-1], b[j]
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for i in alo..ahi {
            let mut next: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let prev = if j > 0 { j2len.get(&(j - 1)).copied().unwrap_or(0) } else { 0 };
                    let k = prev + 1;
                    next.insert(j, k);
                    if k > best_size {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            j2len = next;
        }

        // Popular characters never seed a match, but a block may grow over them.
        while best_i > alo && best_j > blo && self.a[best_i - 1] == self.b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_size += 1;
        }
        while best_i + best_size < ahi
            && best_j + best_size < bhi
            && self.a[best_i + best_size] == self.b[best_j + best_size]
        {
            best_size += 1;
        }

        (best_i, best_j, best_size)
    }

    /// Total size of all matching blocks.
    fn matching_characters(&self) -> usize {
        let mut queue = vec![(0, self.a.len(), 0, self.b.len())];
        let mut matched = 0;

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let (i, j, k) = self.longest_match(alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }

            matched += k;
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                queue.push((i + k, ahi, j + k, bhi));
            }
        }

        matched
    }
}
