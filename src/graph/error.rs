use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display};

#[derive(Debug, Clone, PartialEq)]
pub enum GraphError<IndexType> {
    MissingEdge((IndexType, IndexType)),
    DuplicateEdge((IndexType, IndexType)),
    MissingNode(IndexType),
    DuplicateNode(IndexType),
    SelfLoop(IndexType),
    NonFiniteWeight((IndexType, IndexType), f64),
}

impl<IndexType: Display> fmt::Display for GraphError<IndexType> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingEdge((from, to)) => {
                write!(f, "Edge {} - {} is not in the graph.", from, to)
            }
            Self::DuplicateEdge((from, to)) => write!(f, "Edge {} - {} already exists.", from, to),
            Self::MissingNode(node) => write!(f, "Node {} is not in the graph.", node),
            Self::DuplicateNode(node) => write!(f, "Node {} already exists.", node),
            Self::SelfLoop(node) => write!(f, "Loops are not allowed (node {}).", node),
            Self::NonFiniteWeight((from, to), weight) => {
                write!(f, "Edge {} - {} has non-finite weight {}.", from, to, weight)
            }
        }
    }
}

impl<IndexType: Debug + Display> Error for GraphError<IndexType> {}
