//! Lazy k-subsets of a slice.
//!
//! Subsets are produced one at a time in lexicographic order of their positions, so filling a
//! court from a large pool never materializes every candidate at once.
//!
//! ```rust
//! use court_pairing::combinations::combinations;
//!
//! let pairs = combinations(&['a', 'b', 'c'], 2).collect::<Vec<_>>();
//! assert_eq!(pairs, vec![vec!['a', 'b'], vec!['a', 'c'], vec!['b', 'c']]);
//! ```

use std::iter::FusedIterator;

/// All `k`-element subsets of `items`, in lexicographic order of positions.
///
/// `k == 0` yields a single empty subset; `k > items.len()` yields nothing.
pub fn combinations<T: Copy>(items: &[T], k: usize) -> Combinations<'_, T> {
    Combinations {
        items,
        positions: (0..k).collect(),
        state: State::Fresh,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Fresh,
    Running,
    Done,
}

/// Iterator returned by [`combinations`].
#[derive(Debug, Clone)]
pub struct Combinations<'a, T> {
    items: &'a [T],
    positions: Vec<usize>,
    state: State,
}

impl<T> Combinations<'_, T> {
    /// Moves `positions` to the next subset. Returns false once the last one was produced.
    fn advance(&mut self) -> bool {
        let n = self.items.len();
        let k = self.positions.len();
        let mut i = k;
        loop {
            if i == 0 {
                return false;
            }
            i -= 1;
            if self.positions[i] != i + n - k {
                break;
            }
        }
        self.positions[i] += 1;
        for j in i + 1..k {
            self.positions[j] = self.positions[j - 1] + 1;
        }
        true
    }
}

impl<T: Copy> Iterator for Combinations<'_, T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.state {
            State::Done => return None,
            State::Fresh => {
                if self.positions.len() > self.items.len() {
                    self.state = State::Done;
                    return None;
                }
                self.state = State::Running;
            }
            State::Running => {
                if !self.advance() {
                    self.state = State::Done;
                    return None;
                }
            }
        }
        Some(self.positions.iter().map(|&i| self.items[i]).collect())
    }
}

impl<T: Copy> FusedIterator for Combinations<'_, T> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn binomial(n: usize, k: usize) -> usize {
        (0..k).fold(1, |acc, i| acc * (n - i) / (i + 1))
    }

    #[test]
    fn counts_match_binomial() {
        let items = (0..7).collect::<Vec<_>>();
        for k in 0..=7 {
            assert_eq!(combinations(&items, k).count(), binomial(7, k), "k = {k}");
        }
    }

    #[test]
    fn edge_cases() {
        assert_eq!(
            combinations(&[1, 2], 0).collect::<Vec<_>>(),
            vec![Vec::<i32>::new()]
        );
        assert_eq!(combinations(&[1, 2], 3).next(), None);
        assert_eq!(combinations::<u8>(&[], 1).next(), None);
    }

    #[test]
    fn fused_after_exhaustion() {
        let mut it = combinations(&[1, 2, 3], 3);
        assert_eq!(it.next(), Some(vec![1, 2, 3]));
        assert_eq!(it.next(), None);
        assert_eq!(it.next(), None);
    }

    #[test]
    fn subsets_are_increasing() {
        for subset in combinations(&[0, 1, 2, 3, 4], 3) {
            assert!(subset.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
