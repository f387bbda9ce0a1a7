//! Bayesian group scores.
//!
//! For each group `g` with voters `v`:
//!
//! ```text
//! PGood(g)     = Π CR(v)             every voter in g is honest
//! PBad(g)      = Π (1 - CR(v))       every voter in g is dishonest
//! PAllBad      = Π_g PBad(g)
//! POtherBad(g) = Π_{g' ≠ g} PBad(g')
//! Z            = (1 + Σ_g PGood(g)/PBad(g)) · PAllBad
//! score(g)     = PGood(g) · POtherBad(g) / Z
//! ```
//!
//! Products of many probabilities underflow, so everything is evaluated in
//! log space. Since `POtherBad(g) = PAllBad / PBad(g)`, `PAllBad` cancels and
//! with `r(g) = ln PGood(g) - ln PBad(g)`:
//!
//! ```text
//! score(g) = exp(r(g)) / (1 + Σ_h exp(r(h)))
//! ```
//!
//! which is computed with a log-sum-exp over the `r(h)` and an implicit zero
//! term for the "every group is wrong" case.
//!
//! A group whose `PBad` is exactly zero (a voter with credibility 1) makes the
//! ratio undefined. Such a group is a certain winner with score 1; two certain
//! groups are a [`ConsensusError::ConflictingCertainty`].

use crate::error::ConsensusError;
use crate::group::partition;
use sarmenta_credibility::CredibilityModel;
use sarmenta_types::{ResultValue, Vote};
use serde::Serialize;

/// Score of one result group.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GroupScore {
    pub result: ResultValue,
    /// Number of votes in the group.
    pub size: usize,
    /// `ln PGood(g)`.
    pub log_good: f64,
    /// `ln PBad(g)`; negative infinity when some voter is certain.
    pub log_bad: f64,
    /// Probability that this group's result is the correct one.
    pub score: f64,
}

impl GroupScore {
    pub fn is_certain(&self) -> bool {
        self.log_bad == f64::NEG_INFINITY
    }
}

/// Scores of every group in a round, in first-seen order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScoreTable {
    pub groups: Vec<GroupScore>,
    /// Credibility of each vote, in vote order.
    pub credibilities: Vec<f64>,
}

impl ScoreTable {
    /// Index of the highest-scoring group. Ties go to the group seen first.
    pub fn leader_index(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (i, group) in self.groups.iter().enumerate() {
            match best {
                Some(b) if group.score <= self.groups[b].score => {}
                _ => best = Some(i),
            }
        }
        best
    }

    pub fn leader(&self) -> Option<&GroupScore> {
        self.leader_index().map(|i| &self.groups[i])
    }

    pub fn score_of(&self, result: &ResultValue) -> Option<f64> {
        let key = result.canonical_key();
        self.groups
            .iter()
            .find(|g| g.result.canonical_key() == key)
            .map(|g| g.score)
    }
}

/// Query and validate the credibility of every vote.
fn credibilities(votes: &[Vote], model: &dyn CredibilityModel) -> Result<Vec<f64>, ConsensusError> {
    votes
        .iter()
        .map(|vote| {
            let value = model.credibility(vote);
            if value > 0.0 && value <= 1.0 {
                Ok(value)
            } else {
                Err(ConsensusError::CredibilityOutOfRange {
                    participant: vote.participant.clone(),
                    value,
                })
            }
        })
        .collect()
}

/// Score every result group among `votes`.
pub fn score_groups(votes: &[Vote], model: &dyn CredibilityModel) -> Result<ScoreTable, ConsensusError> {
    let crs = credibilities(votes, model)?;
    let groups = partition(votes);

    let mut scores: Vec<GroupScore> = groups
        .iter()
        .map(|group| {
            let (log_good, log_bad) = group.indices.iter().fold((0.0f64, 0.0f64), |(good, bad), &i| {
                let cr = crs[i];
                (good + cr.ln(), bad + (-cr).ln_1p())
            });
            GroupScore {
                result: group.result.clone(),
                size: group.len(),
                log_good,
                log_bad,
                score: 0.0,
            }
        })
        .collect();

    let mut certain = scores.iter().filter(|g| g.is_certain());
    if let Some(first) = certain.next() {
        if let Some(second) = certain.next() {
            return Err(ConsensusError::ConflictingCertainty {
                first: first.result.clone(),
                second: second.result.clone(),
            });
        }
        for group in &mut scores {
            group.score = if group.is_certain() { 1.0 } else { 0.0 };
        }
        return Ok(ScoreTable {
            groups: scores,
            credibilities: crs,
        });
    }

    let odds: Vec<f64> = scores.iter().map(|g| g.log_good - g.log_bad).collect();
    let max = odds.iter().copied().fold(0.0f64, f64::max);
    let sum = (-max).exp() + odds.iter().map(|r| (r - max).exp()).sum::<f64>();
    let log_normalizer = max + sum.ln();
    for (group, r) in scores.iter_mut().zip(&odds) {
        group.score = (r - log_normalizer).exp();
    }

    Ok(ScoreTable {
        groups: scores,
        credibilities: crs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sarmenta_types::ParticipantId;

    fn vote(p: &str, result: impl Into<ResultValue>) -> Vote {
        Vote::new(ParticipantId::new(p).unwrap(), result, 1.0)
    }

    fn constant(p: f64) -> impl Fn(&Vote) -> f64 + Send + Sync {
        move |_: &Vote| p
    }

    #[test]
    fn single_vote_scores_its_credibility() {
        let votes = vec![vote("p", "A")];
        let table = score_groups(&votes, &constant(0.8)).unwrap();
        assert_eq!(table.groups.len(), 1);
        assert!((table.groups[0].score - 0.8).abs() < 1e-12);
    }

    #[test]
    fn matches_reference_example() {
        // One vote each for E and Z, five for A, all at credibility 0.8.
        let mut votes = vec![vote("0", "E"), vote("1", "Z")];
        for i in 2..7 {
            votes.push(vote(&i.to_string(), "A"));
        }
        let table = score_groups(&votes, &constant(0.8)).unwrap();

        // odds ratio per vote is 4; A has 4^5 = 1024.
        let denom = 1.0 + 4.0 + 4.0 + 1024.0;
        assert!((table.score_of(&"A".into()).unwrap() - 1024.0 / denom).abs() < 1e-12);
        assert!((table.score_of(&"E".into()).unwrap() - 4.0 / denom).abs() < 1e-12);
        assert_eq!(table.leader().unwrap().result, ResultValue::from("A"));
    }

    #[test]
    fn scores_sum_below_one() {
        let votes = vec![vote("a", 1i64), vote("b", 2i64), vote("c", 1i64)];
        let table = score_groups(&votes, &constant(0.7)).unwrap();
        let total: f64 = table.groups.iter().map(|g| g.score).sum();
        assert!(total < 1.0);
    }

    #[test]
    fn tie_goes_to_first_seen_group() {
        let votes = vec![vote("a", "Y"), vote("b", "X")];
        let table = score_groups(&votes, &constant(0.9)).unwrap();
        assert_eq!(table.groups[0].score, table.groups[1].score);
        assert_eq!(table.leader_index(), Some(0));
        assert_eq!(table.leader().unwrap().result, ResultValue::from("Y"));
    }

    #[test]
    fn certain_group_wins_outright() {
        let votes = vec![vote("a", "A"), vote("b", "B"), vote("c", "B")];
        let model = |v: &Vote| if v.participant.as_str() == "a" { 1.0 } else { 0.9 };
        let table = score_groups(&votes, &model).unwrap();
        assert!(table.groups[0].is_certain());
        assert_eq!(table.groups[0].score, 1.0);
        assert_eq!(table.groups[1].score, 0.0);
    }

    #[test]
    fn two_certain_groups_conflict() {
        let votes = vec![vote("a", "A"), vote("b", "B")];
        let err = score_groups(&votes, &constant(1.0)).unwrap_err();
        assert_eq!(
            err,
            ConsensusError::ConflictingCertainty {
                first: "A".into(),
                second: "B".into()
            }
        );
    }

    #[test]
    fn out_of_range_credibility_rejected() {
        let votes = vec![vote("a", "A")];
        for bad in [0.0, -0.5, 1.5, f64::NAN] {
            assert!(matches!(
                score_groups(&votes, &constant(bad)),
                Err(ConsensusError::CredibilityOutOfRange { .. })
            ));
        }
    }

    #[test]
    fn large_groups_do_not_underflow() {
        // 2000 votes at 0.6: direct products underflow to zero long before this.
        let mut votes: Vec<Vote> = (0..2000).map(|i| vote(&format!("a{i}"), "A")).collect();
        votes.extend((0..1000).map(|i| vote(&format!("b{i}"), "B")));
        let table = score_groups(&votes, &constant(0.6)).unwrap();
        let a = table.score_of(&"A".into()).unwrap();
        let b = table.score_of(&"B".into()).unwrap();
        assert!(a.is_finite() && b.is_finite());
        assert!(a > 0.999_999);
        assert!(b < 1e-100);
    }

    #[test]
    fn credibilities_follow_vote_order() {
        let votes = vec![vote("a", "X"), vote("b", "Y"), vote("c", "X")];
        let model = |v: &Vote| match v.participant.as_str() {
            "a" => 0.6,
            "b" => 0.7,
            _ => 0.8,
        };
        let table = score_groups(&votes, &model).unwrap();
        assert_eq!(table.credibilities, vec![0.6, 0.7, 0.8]);
        let x = &table.groups[0];
        assert!((x.log_good - (0.6f64.ln() + 0.8f64.ln())).abs() < 1e-12);
        assert!((x.log_bad - (0.4f64.ln() + 0.2f64.ln())).abs() < 1e-12);
    }
}
