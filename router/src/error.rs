use std::fmt;
use thiserror::Error;
use wire_common::geom::coord::GridCoord;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TerminalRole {
    Start,
    End,
}

impl fmt::Display for TerminalRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminalRole::Start => f.write_str("start"),
            TerminalRole::End => f.write_str("end"),
        }
    }
}

/// Which part of a `SearchBudget` ran out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BudgetLimit {
    Expansions(u64),
    Iterations(u64),
    Time(std::time::Duration),
}

impl fmt::Display for BudgetLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BudgetLimit::Expansions(n) => write!(f, "{} node expansions", n),
            BudgetLimit::Iterations(n) => write!(f, "{} iterations", n),
            BudgetLimit::Time(d) => write!(f, "{:?}", d),
        }
    }
}

/// Recoverable reasons a route could not be produced.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("invalid {role} terminal at {coord}")]
    InvalidTerminal { role: TerminalRole, coord: GridCoord },
    #[error("no path between terminals")]
    NoPath,
    #[error("search budget of {0} exceeded")]
    BudgetExceeded(BudgetLimit),
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown algorithm '{0}' (expected astar, dijkstra or ida)")]
pub struct UnknownAlgorithm(pub String);
