//! Reference data - the value pools batches draw from
//!
//! Immutable after construction; shared behind an `Arc` between the
//! generator and anything else that wants to inspect it.

use rand::Rng;

use crate::error::ProducerError;

/// Validated reference lists
#[derive(Debug, Clone)]
pub struct ReferenceData {
    names: Vec<String>,
    origins: Vec<String>,
    destinations: Vec<String>,
}

impl ReferenceData {
    /// Build reference data, rejecting empty lists
    pub fn new(
        names: Vec<String>,
        origins: Vec<String>,
        destinations: Vec<String>,
    ) -> Result<Self, ProducerError> {
        if names.is_empty() {
            return Err(ProducerError::EmptyReference { list: "names" });
        }
        if origins.is_empty() {
            return Err(ProducerError::EmptyReference { list: "origins" });
        }
        if destinations.is_empty() {
            return Err(ProducerError::EmptyReference { list: "destinations" });
        }
        Ok(Self {
            names,
            origins,
            destinations,
        })
    }

    /// Pick a random name
    pub fn sample_name<R: Rng>(&self, rng: &mut R) -> &str {
        &self.names[rng.random_range(0..self.names.len())]
    }

    /// Pick a random origin
    pub fn sample_origin<R: Rng>(&self, rng: &mut R) -> &str {
        &self.origins[rng.random_range(0..self.origins.len())]
    }

    /// Pick a random destination
    pub fn sample_destination<R: Rng>(&self, rng: &mut R) -> &str {
        &self.destinations[rng.random_range(0..self.destinations.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_list_rejected() {
        let result = ReferenceData::new(vec![], vec!["a".into()], vec!["b".into()]);
        assert!(matches!(
            result,
            Err(ProducerError::EmptyReference { list: "names" })
        ));
    }

    #[test]
    fn test_samples_come_from_lists() {
        let data = ReferenceData::new(
            vec!["Asha".into(), "Ravi".into()],
            vec!["Mumbai".into()],
            vec!["Delhi".into()],
        )
        .unwrap();

        let mut rng = rand::rng();
        for _ in 0..20 {
            let name = data.sample_name(&mut rng);
            assert!(name == "Asha" || name == "Ravi");
            assert_eq!(data.sample_origin(&mut rng), "Mumbai");
            assert_eq!(data.sample_destination(&mut rng), "Delhi");
        }
    }
}
