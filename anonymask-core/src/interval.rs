//! Character-level set algebra over name ranges from several sources.
//!
//! Sources tokenize differently, so agreement is decided per character
//! position rather than per token: each source's ranges are expanded into the
//! set of positions they cover, the sets are combined, and runs of
//! consecutive positions are compressed back into ranges.
//!
//! License: MIT OR APACHE 2.0

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::ConfigError;
use crate::span::{Range, SourceResult};

/// How name ranges from several sources are combined.
///
/// Serializes lowercase; deserialization goes through [`FromStr`] and accepts
/// any case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Policy {
    /// A position is a name if at least one source says so.
    Union,
    /// A position is a name only if every source says so.
    Intersection,
}

impl FromStr for Policy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "union" => Ok(Policy::Union),
            "intersection" => Ok(Policy::Intersection),
            _ => Err(ConfigError::UnknownPolicy(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for Policy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Policy::Union => write!(f, "union"),
            Policy::Intersection => write!(f, "intersection"),
        }
    }
}

/// Expands ranges into the set of positions they cover, ends included.
pub fn expand(ranges: &[Range]) -> BTreeSet<usize> {
    ranges.iter().flat_map(|r| r.positions()).collect()
}

/// Groups sorted positions into runs of consecutive integers.
pub fn compress<I>(positions: I) -> Vec<Range>
where
    I: IntoIterator<Item = usize>,
{
    let mut runs: Vec<Range> = Vec::new();
    for pos in positions {
        match runs.last_mut() {
            Some(run) if pos == run.end + 1 => run.end = pos,
            _ => runs.push(Range::new(pos, pos)),
        }
    }
    runs
}

/// Positions flagged by at least one of `sets`.
pub fn union_all(sets: &[BTreeSet<usize>]) -> BTreeSet<usize> {
    sets.iter().flatten().copied().collect()
}

/// Positions flagged by every one of `sets`. Empty when `sets` is empty.
pub fn intersect_all(sets: &[BTreeSet<usize>]) -> BTreeSet<usize> {
    let Some((first, rest)) = sets.split_first() else {
        return BTreeSet::new();
    };
    first
        .iter()
        .copied()
        .filter(|pos| rest.iter().all(|set| set.contains(pos)))
        .collect()
}

/// Combines per-source results into one list of name ranges.
///
/// No sources yields no ranges. A single source is passed through untouched
/// and `policy` is ignored. Two or more sources require a policy.
pub fn combine(sources: &[SourceResult], policy: Option<Policy>) -> Result<Vec<Range>, ConfigError> {
    match sources {
        [] => Ok(Vec::new()),
        [only] => {
            debug!("Single source '{}': using its {} range(s) directly.", only.source_id, only.ranges.len());
            Ok(only.ranges.clone())
        }
        many => {
            let policy = policy.ok_or(ConfigError::MissingPolicy(many.len()))?;
            let sets: Vec<BTreeSet<usize>> = many.iter().map(|s| expand(&s.ranges)).collect();
            let combined = match policy {
                Policy::Union => union_all(&sets),
                Policy::Intersection => intersect_all(&sets),
            };
            let ranges = compress(combined);
            debug!(
                "Combined {} sources by {}: {} position(s) in {} range(s).",
                many.len(),
                policy,
                ranges.iter().map(|r| r.end - r.start + 1).sum::<usize>(),
                ranges.len()
            );
            Ok(ranges)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(id: &str, ranges: &[(usize, usize)]) -> SourceResult {
        SourceResult::new(id, ranges.iter().map(|&(s, e)| Range::new(s, e)).collect())
    }

    #[test]
    fn policy_parses_case_insensitively() {
        assert_eq!("UNION".parse::<Policy>().unwrap(), Policy::Union);
        assert_eq!("Intersection".parse::<Policy>().unwrap(), Policy::Intersection);
        assert!(matches!("both".parse::<Policy>(), Err(ConfigError::UnknownPolicy(_))));
    }

    #[test]
    fn policy_deserializes_in_any_case() {
        let policy: Policy = serde_json::from_str("\"Union\"").unwrap();
        assert_eq!(policy, Policy::Union);
        let policy: Policy = serde_json::from_str("\"INTERSECTION\"").unwrap();
        assert_eq!(policy, Policy::Intersection);
        assert!(serde_json::from_str::<Policy>("\"both\"").is_err());
        assert_eq!(serde_json::to_string(&Policy::Union).unwrap(), "\"union\"");
    }

    #[test]
    fn compress_splits_on_gaps() {
        assert_eq!(
            compress([0, 1, 2, 5, 6, 9]),
            vec![Range::new(0, 2), Range::new(5, 6), Range::new(9, 9)]
        );
        assert!(compress(Vec::<usize>::new()).is_empty());
    }

    #[test]
    fn expand_includes_both_ends() {
        let set = expand(&[Range::new(2, 4)]);
        assert_eq!(set.into_iter().collect::<Vec<_>>(), vec![2, 3, 4]);
    }

    #[test]
    fn intersection_keeps_only_agreed_positions() {
        let a = source("a", &[(0, 3)]);
        let b = source("b", &[(0, 3), (56, 59)]);
        let ranges = combine(&[a, b], Some(Policy::Intersection)).unwrap();
        assert_eq!(ranges, vec![Range::new(0, 3)]);
    }

    #[test]
    fn union_joins_tokens_split_across_sources() {
        let a = source("a", &[(0, 4)]);
        let b = source("b", &[(5, 8)]);
        let ranges = combine(&[a, b], Some(Policy::Union)).unwrap();
        assert_eq!(ranges, vec![Range::new(0, 8)]);
    }

    #[test]
    fn single_source_matches_union_of_one() {
        let a = source("a", &[(0, 4), (10, 15), (20, 21)]);
        let direct = combine(std::slice::from_ref(&a), None).unwrap();
        let via_union = compress(union_all(&[expand(&a.ranges)]));
        assert_eq!(direct, via_union);
    }

    #[test]
    fn multiple_sources_without_policy_is_an_error() {
        let err = combine(&[source("a", &[]), source("b", &[])], None).unwrap_err();
        assert!(matches!(err, ConfigError::MissingPolicy(2)));
    }

    #[test]
    fn no_sources_yield_no_ranges() {
        assert!(combine(&[], Some(Policy::Union)).unwrap().is_empty());
    }

    #[test]
    fn union_and_intersection_are_commutative_and_ordered() {
        let a = source("a", &[(0, 4), (10, 14)]);
        let b = source("b", &[(2, 6), (30, 33)]);
        let c = source("c", &[(3, 12)]);

        for policy in [Policy::Union, Policy::Intersection] {
            let abc = combine(&[a.clone(), b.clone(), c.clone()], Some(policy)).unwrap();
            let cba = combine(&[c.clone(), b.clone(), a.clone()], Some(policy)).unwrap();
            assert_eq!(abc, cba, "{} is not commutative", policy);
        }

        let union = expand(&combine(&[a.clone(), b.clone(), c.clone()], Some(Policy::Union)).unwrap());
        let inter = expand(&combine(&[a, b, c], Some(Policy::Intersection)).unwrap());
        assert!(inter.is_subset(&union));
        assert_eq!(inter.into_iter().collect::<Vec<_>>(), vec![3, 4]);
    }

    #[test]
    fn combining_is_associative() {
        let a = source("a", &[(0, 4), (10, 14)]);
        let b = source("b", &[(2, 6), (30, 33)]);
        let c = source("c", &[(3, 12), (31, 40)]);

        for policy in [Policy::Union, Policy::Intersection] {
            let ab = SourceResult::new("ab", combine(&[a.clone(), b.clone()], Some(policy)).unwrap());
            let left = combine(&[ab, c.clone()], Some(policy)).unwrap();
            let bc = SourceResult::new("bc", combine(&[b.clone(), c.clone()], Some(policy)).unwrap());
            let right = combine(&[a.clone(), bc], Some(policy)).unwrap();
            assert_eq!(left, right, "{} is not associative", policy);
        }
    }
}
