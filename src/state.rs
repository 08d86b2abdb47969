use std::fmt;
use std::ops::Index;

use itertools::{EitherOrBoth, Itertools};
use serde::{Deserialize, Serialize};

/// Activity of every neuron at one time step, indexed by neuron id.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StateVector(Vec<bool>);

impl StateVector {
    pub fn from_bits(bits: &[u8]) -> Self {
        Self(bits.iter().map(|bit| *bit != 0).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<bool> {
        self.0
    }

    pub fn num_active(&self) -> usize {
        self.0.iter().filter(|active| **active).count()
    }

    pub fn active_nids(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().positions(|active| *active)
    }

    /// Neuron ids at which the two vectors disagree.
    pub fn diff<'a>(&'a self, other: &'a StateVector) -> impl Iterator<Item = usize> + 'a {
        self.0
            .iter()
            .zip_longest(other.0.iter())
            .positions(|pair| match pair {
                EitherOrBoth::Both(a, b) => a != b,
                _ => true,
            })
    }
}

impl From<Vec<bool>> for StateVector {
    fn from(states: Vec<bool>) -> Self {
        Self(states)
    }
}

impl Index<usize> for StateVector {
    type Output = bool;

    fn index(&self, nid: usize) -> &bool {
        &self.0[nid]
    }
}

impl fmt::Display for StateVector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let rendered = self
            .0
            .iter()
            .map(|active| if *active { '1' } else { '0' })
            .join(" ");
        f.write_str(&rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::assert_equal;

    #[test]
    fn display() {
        let states = StateVector::from_bits(&[1, 0, 1, 1, 0]);
        assert_eq!(states.to_string(), "1 0 1 1 0");
        assert_eq!(StateVector::default().to_string(), "");
    }

    #[test]
    fn active_neurons() {
        let states = StateVector::from_bits(&[0, 1, 1, 0, 1]);
        assert_eq!(states.num_active(), 3);
        assert_equal(states.active_nids(), [1, 2, 4]);
        assert!(states[1]);
        assert!(!states[3]);
    }

    #[test]
    fn diff_reports_disagreements() {
        let left = StateVector::from_bits(&[0, 1, 1, 0]);
        let right = StateVector::from_bits(&[0, 0, 1, 1]);
        assert_equal(left.diff(&right), [1, 3]);
        assert_eq!(left.diff(&left).count(), 0);

        let shorter = StateVector::from_bits(&[0, 1]);
        assert_equal(left.diff(&shorter), [2, 3]);
    }
}
