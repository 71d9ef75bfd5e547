//! Byteland: destroy the cheapest set of cities that separates two armies,
//! picked greedily one city per round.

pub mod error;
pub mod graph;
pub mod input;
pub mod selection;

pub use error::InputError;
pub use graph::{Deletion, Garrison, Graph};
pub use input::{parse_input, Cases, TestCase};
pub use selection::{Report, Solver};

/// Runs the greedy rounds to their fixpoint and returns the total cost.
pub fn run_test_case(graph: Graph) -> u128 {
    solve(graph).total_cost
}

/// Like [`run_test_case`] but keeps the order in which cities were destroyed.
pub fn solve(graph: Graph) -> Report {
    if tracing::enabled!(tracing::Level::DEBUG) {
        tracing::debug!("adjacency of garrisoned cities:\n{graph}");
    }
    let report = Solver::new(graph).run();
    tracing::debug!(
        total_cost = report.total_cost,
        rounds = report.rounds(),
        "fixpoint reached"
    );
    report
}
