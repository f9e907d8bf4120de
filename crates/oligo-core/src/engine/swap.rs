/// A multi-radix counter over synonymous-swap combinations.
///
/// Each overlap position owns one counter ranging from `-1` ("leave this
/// position unchanged") to its pool size minus one. The identity combination
/// (every counter at `-1`) is the first one yielded; [`SwapIterator::advance`]
/// increments the first counter and carries on overflow, so positions with
/// an empty pool only ever hold `-1`.
#[derive(Debug, Clone)]
pub struct SwapIterator {
    radices: Vec<usize>,
    counters: Vec<isize>,
    exhausted: bool,
}

impl SwapIterator {
    pub fn new(pool_sizes: Vec<usize>) -> Self {
        let counters = vec![-1; pool_sizes.len()];
        Self {
            radices: pool_sizes,
            counters,
            exhausted: false,
        }
    }

    /// Current counter values; `-1` means the position is left unchanged.
    pub fn current(&self) -> &[isize] {
        &self.counters
    }

    /// Selected pool index per position, `None` where the position is unchanged.
    pub fn selections(&self) -> impl Iterator<Item = (usize, Option<usize>)> + '_ {
        self.counters
            .iter()
            .enumerate()
            .map(|(i, &c)| (i, usize::try_from(c).ok()))
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Moves to the next combination. Returns `false` once every combination
    /// has been visited.
    pub fn advance(&mut self) -> bool {
        if self.exhausted {
            return false;
        }
        for (counter, &radix) in self.counters.iter_mut().zip(&self.radices) {
            *counter += 1;
            if (*counter as usize) < radix {
                return true;
            }
            *counter = -1;
        }
        self.exhausted = true;
        false
    }

    pub fn reset(&mut self) {
        self.counters.iter_mut().for_each(|c| *c = -1);
        self.exhausted = false;
    }

    /// Size of the combination space, the identity included.
    pub fn total_combinations(&self) -> u64 {
        self.radices
            .iter()
            .fold(1u64, |acc, &r| acc.saturating_mul(r as u64 + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visits_every_combination_first_counter_fastest() {
        let mut it = SwapIterator::new(vec![1, 2]);
        let mut seen = vec![it.current().to_vec()];
        while it.advance() {
            seen.push(it.current().to_vec());
        }
        assert_eq!(
            seen,
            vec![
                vec![-1, -1],
                vec![0, -1],
                vec![-1, 0],
                vec![0, 0],
                vec![-1, 1],
                vec![0, 1],
            ]
        );
        assert_eq!(it.total_combinations(), 6);
        assert!(it.is_exhausted());
        assert_eq!(it.current(), &[-1, -1]);
    }

    #[test]
    fn empty_pools_contribute_a_single_choice() {
        let mut it = SwapIterator::new(vec![0, 0]);
        assert_eq!(it.total_combinations(), 1);
        assert!(!it.advance());
        assert!(it.is_exhausted());
        assert!(!it.advance());
    }

    #[test]
    fn reset_restarts_from_identity() {
        let mut it = SwapIterator::new(vec![0, 3]);
        assert!(it.advance());
        assert_eq!(it.current(), &[-1, 0]);
        assert_eq!(
            it.selections().collect::<Vec<_>>(),
            vec![(0, None), (1, Some(0))]
        );
        it.reset();
        assert_eq!(it.current(), &[-1, -1]);
        assert!(!it.is_exhausted());
    }
}
