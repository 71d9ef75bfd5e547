//! Greedy choice of which city to destroy next.
//!
//! Each round counts, for every garrisoned city, the roads leading to a city
//! held by someone else ("cross links") and what destroying those neighbours
//! would cost. A city qualifies when its own cost does not exceed that sum.
//! Among qualifiers the city with the most cross links wins, then the lowest
//! cost per cross link, then the lowest index. One city is destroyed per round
//! and the counts are recomputed from scratch.

use crate::graph::{Deletion, Graph};
use bitvec::prelude::*;
use std::cmp::Ordering;
use tracing::Level;

/// Cost of a city divided by its number of cross links, kept exact.
#[derive(Debug, Clone, Copy)]
pub struct Ratio {
    cost: u64,
    count: u32,
}

impl Ratio {
    /// `count` must be non zero.
    pub fn new(cost: u64, count: u32) -> Ratio {
        debug_assert!(count > 0);
        Ratio { cost, count }
    }

    pub fn as_f64(self) -> f64 {
        self.cost as f64 / self.count as f64
    }
}

impl Ord for Ratio {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs = self.cost as u128 * other.count as u128;
        let rhs = other.cost as u128 * self.count as u128;
        lhs.cmp(&rhs)
    }
}

impl PartialOrd for Ratio {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Ratio {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ratio {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub city: u32,
    pub cross_count: u32,
    pub ratio: Ratio,
}

impl Candidate {
    /// Whether `self`, seen later in index order, displaces `best`.
    fn beats(&self, best: &Candidate) -> bool {
        match self.cross_count.cmp(&best.cross_count) {
            Ordering::Greater => true,
            Ordering::Equal => self.ratio < best.ratio,
            Ordering::Less => false,
        }
    }
}

/// Counters of a single round, one slot per city.
#[derive(Debug, Clone)]
pub struct RoundScan {
    cross_count: Vec<u32>,
    // wide enough for any number of u64 costs a graph can hold
    cross_cost: Vec<u128>,
    ratio: Vec<Option<Ratio>>,
    qualifiers: BitVec,
    total_cross_links: u64,
}

impl RoundScan {
    pub fn new(graph: &Graph) -> RoundScan {
        let n = graph.len();
        let mut scan = RoundScan {
            cross_count: vec![0; n],
            cross_cost: vec![0; n],
            ratio: vec![None; n],
            qualifiers: bitvec![0; n],
            total_cross_links: 0,
        };

        for city in 0..n as u32 {
            let garrison = graph.garrison(city);
            if !garrison.is_assigned() {
                continue;
            }
            let i = city as usize;
            for &m in graph.neighbours(city) {
                if graph.garrison(m) != garrison {
                    scan.cross_count[i] += 1;
                    scan.cross_cost[i] += graph.cost(m) as u128;
                }
            }
            let count = scan.cross_count[i];
            if count == 0 {
                continue;
            }
            if tracing::enabled!(Level::TRACE) {
                let links: Vec<u32> = graph
                    .neighbours(city)
                    .iter()
                    .copied()
                    .filter(|&m| graph.garrison(m) != garrison)
                    .collect();
                tracing::trace!(city, ?links, cost = scan.cross_cost[i], "cross links");
            }
            scan.ratio[i] = Some(Ratio::new(graph.cost(city), count));
            scan.total_cross_links += count as u64;
            if graph.cost(city) as u128 <= scan.cross_cost[i] {
                scan.qualifiers.set(i, true);
            }
        }
        scan
    }

    pub fn cross_count(&self, city: u32) -> u32 {
        self.cross_count[city as usize]
    }

    /// Summed cost of the cross links of `city`.
    pub fn cross_cost(&self, city: u32) -> u128 {
        self.cross_cost[city as usize]
    }

    pub fn ratio(&self, city: u32) -> Option<Ratio> {
        self.ratio[city as usize]
    }

    pub fn total_cross_links(&self) -> u64 {
        self.total_cross_links
    }

    pub fn qualifies(&self, city: u32) -> bool {
        self.qualifiers[city as usize]
    }

    pub fn qualifier_count(&self) -> usize {
        self.qualifiers.count_ones()
    }

    /// Picks the round's winner. Qualifiers are visited in index order and a
    /// later one only replaces the current best when strictly preferred.
    pub fn select(&self) -> Option<Candidate> {
        let mut best: Option<Candidate> = None;
        for i in self.qualifiers.iter_ones() {
            let Some(ratio) = self.ratio[i] else {
                continue;
            };
            let candidate = Candidate {
                city: i as u32,
                cross_count: self.cross_count[i],
                ratio,
            };
            if best.map_or(true, |current| candidate.beats(&current)) {
                best = Some(candidate);
            }
        }
        best
    }
}

/// What a finished run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub total_cost: u128,
    /// Destroyed cities, 0-based, in order of destruction.
    pub deletions: Vec<u32>,
}

impl Report {
    pub fn rounds(&self) -> usize {
        self.deletions.len()
    }
}

/// Runs rounds over one graph until no city qualifies.
pub struct Solver {
    graph: Graph,
    report: Report,
}

impl Solver {
    pub fn new(graph: Graph) -> Solver {
        Solver {
            graph,
            report: Report::default(),
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn report(&self) -> &Report {
        &self.report
    }

    /// Performs one round. Returns the destroyed city, or `None` once the
    /// fixpoint is reached.
    pub fn step(&mut self) -> Option<u32> {
        let scan = RoundScan::new(&self.graph);
        let Some(best) = scan.select() else {
            if scan.total_cross_links() > 0 {
                tracing::warn!(
                    links = scan.total_cross_links(),
                    "cross links remain but no city qualifies"
                );
            }
            return None;
        };

        let cost = self.graph.cost(best.city);
        tracing::debug!(
            round = self.report.rounds() + 1,
            city = best.city,
            cost,
            cross_count = best.cross_count,
            ratio = best.ratio.as_f64(),
            qualifiers = scan.qualifier_count(),
            "destroying city"
        );
        let deletion = self.graph.delete_city(best.city);
        debug_assert_eq!(deletion, Deletion::Deleted);
        self.report.total_cost += cost as u128;
        self.report.deletions.push(best.city);
        Some(best.city)
    }

    pub fn run(mut self) -> Report {
        // every round turns a garrisoned city into a tombstone
        while self.step().is_some() {}
        self.report
    }
}
