//! Talent hotspots: institutions that several candidates studied at.

use std::collections::HashMap;

use serde::Serialize;

use crate::models::candidate::{Candidate, Location};

/// Minimum number of (candidate, education) pairs for an institution to count.
pub const HOTSPOT_THRESHOLD: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hotspot {
    pub name: String,
    pub count: usize,
    pub location: Location,
}

/// Groups education entries by institution name and returns the institutions
/// with at least [`HOTSPOT_THRESHOLD`] entries, most popular first.
///
/// Every (candidate, education) pair counts, including a candidate listing
/// the same school twice. The location is the one recorded on the first
/// entry seen for that name; later entries never overwrite it, so
/// inconsistent coordinates for one name collapse silently. Ties keep
/// first-seen order.
pub fn talent_hotspots(candidates: &[Candidate]) -> Vec<Hotspot> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut tallies: Vec<(&str, usize, &Location)> = Vec::new();

    for education in candidates.iter().flat_map(|c| c.education.iter()) {
        let name = education.institution_name.as_str();
        match index.get(name) {
            Some(&slot) => tallies[slot].1 += 1,
            None => {
                index.insert(name, tallies.len());
                tallies.push((name, 1, &education.location));
            }
        }
    }

    let mut hotspots: Vec<Hotspot> = tallies
        .into_iter()
        .filter(|(_, count, _)| *count >= HOTSPOT_THRESHOLD)
        .map(|(name, count, location)| Hotspot {
            name: name.to_string(),
            count,
            location: location.clone(),
        })
        .collect();

    // sort_by is stable
    hotspots.sort_by(|a, b| b.count.cmp(&a.count));
    hotspots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::talent::query::tests::{candidate, education};

    #[test]
    fn test_three_alumni_make_a_hotspot_two_do_not() {
        let three: Vec<_> = (1..=3)
            .map(|id| candidate(id, "Data Scientist", &["Python"], &["MIT"]))
            .collect();
        let hotspots = talent_hotspots(&three);
        assert_eq!(hotspots.len(), 1);
        assert_eq!(hotspots[0].name, "MIT");
        assert_eq!(hotspots[0].count, 3);

        assert!(talent_hotspots(&three[..2]).is_empty());
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        assert!(talent_hotspots(&[]).is_empty());
    }

    #[test]
    fn test_duplicate_entries_within_one_candidate_count_twice() {
        let people = vec![
            candidate(1, "Mobile Developer", &[], &["ETH Zurich", "ETH Zurich"]),
            candidate(2, "Mobile Developer", &[], &["ETH Zurich"]),
        ];
        let hotspots = talent_hotspots(&people);
        assert_eq!(hotspots.len(), 1);
        assert_eq!(hotspots[0].count, 3);
    }

    #[test]
    fn test_first_seen_location_wins() {
        let mut first = candidate(1, "QA Engineer", &[], &["Georgia Tech"]);
        first.education[0].location.city = "Atlanta".to_string();
        let mut second = candidate(2, "QA Engineer", &[], &["Georgia Tech"]);
        second.education[0].location.city = "Savannah".to_string();
        second.education[0].location.latitude = 32.08;
        let third = candidate(3, "QA Engineer", &[], &["Georgia Tech"]);

        let hotspots = talent_hotspots(&[first, second, third]);
        assert_eq!(hotspots[0].location.city, "Atlanta");
        assert!((hotspots[0].location.latitude - 42.36).abs() < f64::EPSILON);
    }

    #[test]
    fn test_sorted_by_count_with_stable_ties() {
        let mut people = Vec::new();
        let mut id = 0;
        for (school, alumni) in [("Oxford University", 3), ("MIT", 5), ("Tsinghua University", 3)] {
            for _ in 0..alumni {
                id += 1;
                people.push(candidate(id, "Business Analyst", &[], &[school]));
            }
        }
        let names: Vec<_> = talent_hotspots(&people)
            .into_iter()
            .map(|h| (h.name, h.count))
            .collect();
        assert_eq!(
            names,
            vec![
                ("MIT".to_string(), 5),
                ("Oxford University".to_string(), 3),
                ("Tsinghua University".to_string(), 3),
            ]
        );
    }

    #[test]
    fn test_counts_never_exceed_education_pairs() {
        let people = crate::storage::seed::generate_mock_candidates(200, 7);
        let pairs: usize = people.iter().map(|c| c.education.len()).sum();
        let hotspots = talent_hotspots(&people);

        let total: usize = hotspots.iter().map(|h| h.count).sum();
        assert!(total <= pairs);
        assert!(hotspots.iter().all(|h| h.count >= HOTSPOT_THRESHOLD));
        assert!(hotspots.windows(2).all(|w| w[0].count >= w[1].count));
    }

    #[test]
    fn test_sum_equals_pairs_when_every_school_clears_threshold() {
        let people: Vec<_> = (1..=4)
            .map(|id| Candidate {
                education: vec![education("MIT"), education("Stanford University")],
                ..candidate(id, "Technical Writer", &[], &[])
            })
            .collect();
        let total: usize = talent_hotspots(&people).iter().map(|h| h.count).sum();
        assert_eq!(total, 8);
    }
}
