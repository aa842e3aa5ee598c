use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display};

use crate::graph::{Edge, GraphError};

/// Errors raised while solving a Steiner tree instance.
#[derive(Debug, Clone, PartialEq)]
pub enum SteinerError<IndexType> {
    /// A negative edge weight was found, shortest paths would be meaningless.
    InvalidWeight { edge: Edge<IndexType>, weight: f64 },
    /// Two terminals have no connecting path.
    DisconnectedInstance(IndexType, IndexType),
    /// A solution refers to an edge the graph does not have.
    EdgeNotInGraph(Edge<IndexType>),
    MissingNode(IndexType),
    NoTerminals,
    NotATree,
    MissingTerminal(IndexType),
    InvalidParameter(String),
    Graph(GraphError<IndexType>),
}

impl<IndexType: Display> fmt::Display for SteinerError<IndexType> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidWeight { edge, weight } => write!(
                f,
                "Edge {} - {} has invalid weight {}, weights must be non-negative.",
                edge.0, edge.1, weight
            ),
            Self::DisconnectedInstance(from, to) => {
                write!(f, "Terminals {} and {} are not connected.", from, to)
            }
            Self::EdgeNotInGraph((from, to)) => {
                write!(f, "Solution edge {} - {} is not in the graph.", from, to)
            }
            Self::MissingNode(node) => write!(f, "Node {} is not in the graph.", node),
            Self::NoTerminals => write!(f, "The terminal set is empty."),
            Self::NotATree => write!(f, "The solution is not a tree."),
            Self::MissingTerminal(node) => {
                write!(f, "Terminal {} is not spanned by the solution.", node)
            }
            Self::InvalidParameter(message) => write!(f, "Invalid parameter: {}", message),
            Self::Graph(error) => write!(f, "{}", error),
        }
    }
}

impl<IndexType: Debug + Display> Error for SteinerError<IndexType> {}

impl<IndexType> From<GraphError<IndexType>> for SteinerError<IndexType> {
    fn from(error: GraphError<IndexType>) -> Self {
        match error {
            GraphError::MissingNode(node) => Self::MissingNode(node),
            GraphError::MissingEdge(edge) => Self::EdgeNotInGraph(edge),
            other => Self::Graph(other),
        }
    }
}
