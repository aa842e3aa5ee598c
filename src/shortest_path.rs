use log::trace;
use std::collections::BTreeMap;
use std::fmt::Display;

use crate::error::SteinerError;
use crate::graph::WeightedGraph;

/// Distances and paths from a single source to every vertex reachable from it.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPaths<IndexType> {
    source: IndexType,
    distances: BTreeMap<IndexType, f64>,
    paths: BTreeMap<IndexType, Vec<IndexType>>,
}

impl<IndexType: Copy + Ord> ShortestPaths<IndexType> {
    pub fn source(&self) -> IndexType {
        self.source
    }

    /// Distance to `to`, or None if it can not be reached.
    pub fn distance(&self, to: IndexType) -> Option<f64> {
        self.distances.get(&to).copied()
    }

    /// Vertex sequence from the source to `to`, both endpoints included.
    pub fn path(&self, to: IndexType) -> Option<&[IndexType]> {
        self.paths.get(&to).map(|path| path.as_slice())
    }

    pub fn reachable(&self) -> usize {
        self.distances.len()
    }

    /// Returns up to `count` reachable vertices other than the source,
    /// most distant first. Equal distances are ordered by vertex id.
    pub fn furthest(&self, count: usize) -> Vec<IndexType> {
        let mut candidates: Vec<(IndexType, f64)> = self
            .distances
            .iter()
            .filter(|(node, _)| **node != self.source)
            .map(|(node, dist)| (*node, *dist))
            .collect();
        candidates.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        candidates
            .into_iter()
            .take(count)
            .map(|(node, _)| node)
            .collect()
    }
}

/// Shortest paths for a set of source vertices.
/// The graph never changes during a run, so a table can be reused for all of it.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPathTable<IndexType> {
    rows: BTreeMap<IndexType, ShortestPaths<IndexType>>,
}

impl<IndexType: Copy + Ord + Display> ShortestPathTable<IndexType> {
    /// Runs Dijkstra from every given source.
    /// Fails on negative weights anywhere in the graph and on unknown sources.
    pub fn from_sources<G, I>(graph: &G, sources: I) -> Result<Self, SteinerError<IndexType>>
    where
        G: WeightedGraph<IndexType = IndexType>,
        I: IntoIterator<Item = IndexType>,
    {
        check_weights(graph)?;

        let mut rows = BTreeMap::new();
        for source in sources.into_iter() {
            if rows.contains_key(&source) {
                continue;
            }
            let (distances, paths) = graph.shortest_paths(source)?;
            trace!("Computed shortest paths from {}, {} reachable", source, distances.len());
            rows.insert(
                source,
                ShortestPaths {
                    source,
                    distances,
                    paths,
                },
            );
        }

        Ok(ShortestPathTable { rows })
    }

    pub fn get(&self, source: IndexType) -> Option<&ShortestPaths<IndexType>> {
        self.rows.get(&source)
    }

    pub fn distance(&self, from: IndexType, to: IndexType) -> Option<f64> {
        self.rows.get(&from).and_then(|row| row.distance(to))
    }

    pub fn path(&self, from: IndexType, to: IndexType) -> Option<&[IndexType]> {
        self.rows.get(&from).and_then(|row| row.path(to))
    }

    pub fn sources(&self) -> impl Iterator<Item = IndexType> + '_ {
        self.rows.keys().copied()
    }
}

/// Shortest distances and paths between every pair of vertices.
pub fn all_pairs<G: WeightedGraph>(
    graph: &G,
) -> Result<ShortestPathTable<G::IndexType>, SteinerError<G::IndexType>> {
    ShortestPathTable::from_sources(graph, graph.iter_node_ids())
}

/// Vertex sequence of a shortest path from `from` to `to`, None if `to` is unreachable.
pub fn shortest_path<G: WeightedGraph>(
    graph: &G,
    from: G::IndexType,
    to: G::IndexType,
) -> Result<Option<Vec<G::IndexType>>, SteinerError<G::IndexType>> {
    if !graph.has_node(to) {
        return Err(SteinerError::MissingNode(to));
    }

    let table = ShortestPathTable::from_sources(graph, Some(from))?;
    Ok(table.path(from, to).map(|path| path.to_vec()))
}

/// Rejects graphs with negative edge weights.
pub fn check_weights<G: WeightedGraph>(graph: &G) -> Result<(), SteinerError<G::IndexType>> {
    match graph.iter_edges().find(|(_, weight)| *weight < 0.0) {
        Some((edge, weight)) => Err(SteinerError::InvalidWeight { edge, weight }),
        None => Ok(()),
    }
}
