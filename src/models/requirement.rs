//! Host-count requirements and the subdivision strategy.

use crate::error::{PlanError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One subnet request, created from user input and never changed afterwards.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requirement {
    /// Hosts the subnet must hold. Always > 0.
    pub host_count: u64,
    /// Position in the raw input list (0-based, counts discarded entries).
    pub original_index: usize,
    /// Display label: 1-based position among the valid entries.
    pub label: usize,
}

impl Requirement {
    /// Build requirements from raw host counts, dropping entries that are zero or negative.
    ///
    /// # Returns
    /// * `Ok(Vec<Requirement>)` - Valid requirements in input order
    /// * `Err(PlanError::NoValidRequirements)` - Nothing survived the filter
    pub fn from_host_counts(host_counts: &[i64]) -> Result<Vec<Requirement>> {
        let mut requirements = Vec::with_capacity(host_counts.len());
        for (original_index, &hosts) in host_counts.iter().enumerate() {
            if hosts <= 0 {
                log::warn!("Discarding requirement #{original_index}: host count {hosts} is not positive");
                continue;
            }
            requirements.push(Requirement {
                host_count: hosts as u64,
                original_index,
                label: requirements.len() + 1,
            });
        }

        if requirements.is_empty() {
            return Err(PlanError::NoValidRequirements);
        }
        Ok(requirements)
    }
}

/// Which child of a subdivided block goes to the current requirement.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Lowest-address child; higher siblings stay free.
    #[default]
    First,
    /// Highest-address child; lower siblings stay free.
    Last,
}

impl FromStr for Strategy {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Strategy> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" => Ok(Strategy::First),
            "last" => Ok(Strategy::Last),
            _ => Err(PlanError::UnknownStrategy(s.to_string())),
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Strategy::First => write!(f, "first"),
            Strategy::Last => write!(f, "last"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_host_counts_filters_invalid() {
        let reqs = Requirement::from_host_counts(&[0, -5, 20]).unwrap();
        assert_eq!(reqs.len(), 1);
        assert_eq!(reqs[0].host_count, 20);
        assert_eq!(reqs[0].original_index, 2);
        assert_eq!(reqs[0].label, 1);
    }

    #[test]
    fn test_from_host_counts_keeps_order() {
        let reqs = Requirement::from_host_counts(&[10, 0, 50, 30]).unwrap();
        let labels: Vec<(u64, usize, usize)> = reqs
            .iter()
            .map(|r| (r.host_count, r.original_index, r.label))
            .collect();
        assert_eq!(labels, vec![(10, 0, 1), (50, 2, 2), (30, 3, 3)]);
    }

    #[test]
    fn test_from_host_counts_empty() {
        assert_eq!(
            Requirement::from_host_counts(&[]).unwrap_err(),
            PlanError::NoValidRequirements
        );
        assert_eq!(
            Requirement::from_host_counts(&[0, -1]).unwrap_err(),
            PlanError::NoValidRequirements
        );
    }

    #[test]
    fn test_strategy_parse() {
        assert_eq!("first".parse::<Strategy>().unwrap(), Strategy::First);
        assert_eq!(" LAST ".parse::<Strategy>().unwrap(), Strategy::Last);
        assert_eq!(
            "middle".parse::<Strategy>().unwrap_err(),
            PlanError::UnknownStrategy("middle".to_string())
        );
        assert_eq!(Strategy::default(), Strategy::First);
        assert_eq!(Strategy::Last.to_string(), "last");
    }
}
