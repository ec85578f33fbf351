//! Event-time and event-type distributions of the birth-death process.

use crate::error::{GenerationError, ensure_non_negative, ensure_positive};
use crate::rng::RngSession;
use rand_distr::{Exp1, Poisson};

/// Birth, death and polytomy rates of a birth-death process.
///
/// With `n` extant lineages the waiting time to the next event is
/// exponentially distributed with rate `n * (birth + death)`; the event is a
/// birth with probability `birth / (birth + death)`. A birth produces
/// `2 + Poisson(polytomy)` children.
#[derive(Debug, Clone)]
pub struct RateModel {
    birth: f64,
    death: f64,
    birth_probability: f64,
    polytomy: Option<Poisson<f64>>,
}

impl RateModel {
    /// Creates a new rate model.
    ///
    /// # Arguments
    /// * `birth` - Birth rate λ, finite and > 0
    /// * `death` - Death rate μ, finite and ≥ 0 (0 gives a Yule process)
    /// * `polytomy` - Rate λ_poly of extra children per birth, finite and ≥ 0
    ///
    /// # Errors
    /// Returns [`GenerationError::InvalidParameter`] for out-of-range rates.
    pub fn new(birth: f64, death: f64, polytomy: f64) -> Result<Self, GenerationError> {
        let birth = ensure_positive("birth", birth)?;
        let death = ensure_non_negative("death", death)?;
        let polytomy = ensure_non_negative("lambda", polytomy)?;

        let polytomy = if polytomy > 0.0 {
            let poisson = Poisson::new(polytomy)
                .map_err(|err| GenerationError::invalid("lambda", err.to_string()))?;
            Some(poisson)
        } else {
            None
        };

        Ok(RateModel {
            birth,
            death,
            birth_probability: birth / (birth + death),
            polytomy,
        })
    }

    /// Returns the birth rate λ.
    pub fn birth(&self) -> f64 {
        self.birth
    }

    /// Returns the death rate μ.
    pub fn death(&self) -> f64 {
        self.death
    }

    /// Returns the total event rate λ + μ of a single lineage.
    pub fn event_rate(&self) -> f64 {
        self.birth + self.death
    }

    /// Returns the probability that an event is a birth.
    pub fn birth_probability(&self) -> f64 {
        self.birth_probability
    }

    /// Draws the waiting time to the next event among `lineages` extant lineages.
    pub fn waiting_time(&self, lineages: usize, rng: &mut RngSession) -> f64 {
        let unit: f64 = rng.sample(&Exp1);
        unit / (lineages as f64 * self.event_rate())
    }

    /// Draws whether the next event is a birth (otherwise it is a death).
    pub fn is_birth(&self, rng: &mut RngSession) -> bool {
        rng.uniform() <= self.birth_probability
    }

    /// Draws the number of children created by a birth, at least 2.
    ///
    /// Without polytomies no random draw is made.
    pub fn brood_size(&self, rng: &mut RngSession) -> usize {
        match &self.polytomy {
            Some(poisson) => 2 + rng.sample(poisson) as usize,
            None => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::Seed;

    #[test]
    fn test_birth_probability() {
        let rates = RateModel::new(1.0, 0.5, 0.0).unwrap();
        assert!((rates.birth_probability() - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(rates.event_rate(), 1.5);
    }

    #[test]
    fn test_yule_always_births() {
        let rates = RateModel::new(2.0, 0.0, 0.0).unwrap();
        let mut rng = RngSession::seeded(&Seed::from("yule"));
        assert!((0..1000).all(|_| rates.is_birth(&mut rng)));
    }

    #[test]
    fn test_brood_size_without_polytomies_is_binary() {
        let rates = RateModel::new(1.0, 0.0, 0.0).unwrap();
        let mut rng = RngSession::seeded(&Seed::from(3u64));
        let before = rng.clone().uniform();
        assert_eq!(rates.brood_size(&mut rng), 2);
        // No draw consumed
        assert_eq!(rng.uniform(), before);
    }

    #[test]
    fn test_brood_size_with_polytomies() {
        let rates = RateModel::new(1.0, 0.0, 3.0).unwrap();
        let mut rng = RngSession::seeded(&Seed::from(3u64));
        let broods: Vec<usize> = (0..200).map(|_| rates.brood_size(&mut rng)).collect();
        assert!(broods.iter().all(|&b| b >= 2));
        assert!(broods.iter().any(|&b| b > 2));
    }

    #[test]
    fn test_waiting_time_positive() {
        let rates = RateModel::new(1.0, 1.0, 0.0).unwrap();
        let mut rng = RngSession::seeded(&Seed::from(11u64));
        for lineages in 1..50 {
            assert!(rates.waiting_time(lineages, &mut rng) >= 0.0);
        }
    }

    #[test]
    fn test_invalid_rates() {
        assert!(RateModel::new(0.0, 0.0, 0.0).is_err());
        assert!(RateModel::new(-1.0, 0.0, 0.0).is_err());
        assert!(RateModel::new(1.0, -0.1, 0.0).is_err());
        assert!(RateModel::new(1.0, f64::NAN, 0.0).is_err());
        assert!(RateModel::new(1.0, 0.0, -2.0).is_err());
        assert!(RateModel::new(f64::INFINITY, 0.0, 0.0).is_err());
    }
}
