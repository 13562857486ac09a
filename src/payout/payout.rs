use crate::PlayerId;
use crate::Points;
use crate::scoring::Error;
use std::collections::BTreeMap;

/// Converts accumulated table points into settlement amounts.
///
/// `payout[p] = total[p] / divisor + adjustment[p]`, with a missing
/// adjustment counting as zero. Stateless beyond its two parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payout {
    divisor: f64,
    adjustments: BTreeMap<PlayerId, f64>,
}

impl Payout {
    pub fn new(divisor: f64, adjustments: BTreeMap<PlayerId, f64>) -> Self {
        Self {
            divisor,
            adjustments,
        }
    }
    pub fn divisor(&self) -> f64 {
        self.divisor
    }
    pub fn adjustment(&self, player: PlayerId) -> f64 {
        self.adjustments.get(&player).copied().unwrap_or(0.)
    }

    /// Settlement per player, refusing a divisor that is not a positive
    /// finite number.
    pub fn try_project(
        &self,
        totals: &BTreeMap<PlayerId, Points>,
    ) -> Result<BTreeMap<PlayerId, f64>, Error> {
        if !self.divisor.is_finite() || self.divisor <= 0. {
            return Err(Error::InvalidDivisor(self.divisor));
        }
        Ok(totals
            .iter()
            .map(|(&id, &total)| (id, total as f64 / self.divisor + self.adjustment(id)))
            .collect())
    }
    /// Like [`try_project`](Self::try_project) but shows zero for everyone
    /// instead of failing.
    pub fn project(&self, totals: &BTreeMap<PlayerId, Points>) -> BTreeMap<PlayerId, f64> {
        self.try_project(totals).unwrap_or_else(|e| {
            log::debug!("[payout] {}", e);
            totals.keys().map(|&id| (id, 0.)).collect()
        })
    }
}

impl std::fmt::Display for Payout {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "÷{}", self.divisor)?;
        for (id, adjust) in self.adjustments.iter().filter(|(_, a)| **a != 0.) {
            write!(f, " P{}{:+}", id, adjust)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals() -> BTreeMap<PlayerId, Points> {
        [(1, 12), (2, -8), (3, 0), (4, -4)].into_iter().collect()
    }

    #[test]
    fn divides_and_adjusts() {
        let payout = Payout::new(4., [(3, 1.5), (4, -0.25)].into_iter().collect());
        let amounts = payout.try_project(&totals()).unwrap();
        assert_eq!(amounts[&1], 3.);
        assert_eq!(amounts[&2], -2.);
        assert_eq!(amounts[&3], 1.5);
        assert_eq!(amounts[&4], -1.25);
    }

    #[test]
    fn unusable_divisors_are_refused() {
        for divisor in [0., -2., f64::NAN, f64::INFINITY] {
            let payout = Payout::new(divisor, BTreeMap::new());
            assert!(matches!(
                payout.try_project(&totals()),
                Err(Error::InvalidDivisor(_))
            ));
            let shown = payout.project(&totals());
            assert_eq!(shown.len(), 4);
            assert!(shown.values().all(|&p| p == 0.));
        }
    }

    #[test]
    fn adjustments_for_strangers_are_ignored() {
        let payout = Payout::new(1., [(9, 100.)].into_iter().collect());
        let amounts = payout.project(&totals());
        assert!(!amounts.contains_key(&9));
        assert_eq!(amounts.values().sum::<f64>(), 0.);
    }
}
