//! Partitioning votes into result groups.

use sarmenta_types::{ResultValue, Vote};
use std::collections::HashMap;

/// Votes sharing an identical declared result.
#[derive(Clone, Debug)]
pub struct VoteGroup<'a> {
    pub result: &'a ResultValue,
    pub votes: Vec<&'a Vote>,
    /// Position of each member in the partitioned slice.
    pub indices: Vec<usize>,
}

impl VoteGroup<'_> {
    pub fn len(&self) -> usize {
        self.votes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }
}

/// Group votes by [`ResultValue::canonical_key`].
///
/// Groups come out in order of first appearance of each distinct result, and
/// votes within a group keep their submission order.
pub fn partition(votes: &[Vote]) -> Vec<VoteGroup<'_>> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<VoteGroup<'_>> = Vec::new();
    for (position, vote) in votes.iter().enumerate() {
        let key = vote.result.canonical_key();
        match index.get(&key) {
            Some(&i) => {
                groups[i].votes.push(vote);
                groups[i].indices.push(position);
            }
            None => {
                index.insert(key, groups.len());
                groups.push(VoteGroup {
                    result: &vote.result,
                    votes: vec![vote],
                    indices: vec![position],
                });
            }
        }
    }
    groups
}
