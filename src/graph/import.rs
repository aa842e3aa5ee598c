mod error;
mod stp;

pub use error::ImportError;
pub use stp::{import_stp, parse_stp};

use std::collections::BTreeSet;

use crate::graph::MatrixGraph;

/// A graph together with the terminals that have to be connected.
#[derive(Debug, Clone)]
pub struct SteinerInstance {
    pub name: String,
    pub graph: MatrixGraph<usize>,
    pub terminals: BTreeSet<usize>,
}
