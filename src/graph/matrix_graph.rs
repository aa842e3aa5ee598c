use decorum::R64;
use num_traits::Zero;
use std::cmp::{Eq, Ord, Ordering};
use std::collections::{BTreeMap, BinaryHeap, HashMap};
use std::fmt::{Debug, Display};
use std::hash::Hash;

use crate::graph::{normalize, Edge, GraphError, PathMaps, WeightedGraph};

/// Implements a weighted, undirected graph using a symmetric adjacency matrix as datastructure.
/// Node ids are mapped to dense inner indices in insertion order.
#[derive(Debug, Clone)]
pub struct MatrixGraph<IndexType> {
    adjacency_matrix: Vec<Vec<Option<f64>>>,
    size: usize,
    node_map: HashMap<IndexType, usize>,
    inv_node_map: Vec<IndexType>,
}

impl<IndexType> MatrixGraph<IndexType>
where
    IndexType: Hash + Copy + Eq + Display + Debug + Ord,
{
    /// Creates a new graph from a list of node ids and weighted edges.
    /// Errors on duplicate nodes or edges, loops, non-finite weights and edges to unknown nodes.
    pub fn new(
        nodes: Vec<IndexType>,
        edges: Vec<(Edge<IndexType>, f64)>,
    ) -> Result<Self, GraphError<IndexType>> {
        let mut graph = MatrixGraph::with_size(nodes.len());
        for id in nodes.into_iter() {
            graph.add_node(id)?;
        }
        for (edge, weight) in edges.into_iter() {
            graph.add_edge(edge, weight)?;
        }

        Ok(graph)
    }

    /// Constructs an empty MatrixGraph with capacity for at least the given amount of nodes.
    pub fn with_size(size: usize) -> Self {
        MatrixGraph {
            adjacency_matrix: Vec::with_capacity(size),
            size: 0,
            node_map: HashMap::with_capacity(size),
            inv_node_map: Vec::with_capacity(size),
        }
    }

    fn inner_id(&self, id: IndexType) -> Result<usize, GraphError<IndexType>> {
        self.node_map
            .get(&id)
            .copied()
            .ok_or(GraphError::MissingNode(id))
    }

    fn inner_edge(&self, edge: Edge<IndexType>) -> Result<Edge<usize>, GraphError<IndexType>> {
        Ok((self.inner_id(edge.0)?, self.inner_id(edge.1)?))
    }

    fn check_new_edge(
        &self,
        edge: Edge<IndexType>,
        weight: f64,
    ) -> Result<(), GraphError<IndexType>> {
        if edge.0 == edge.1 {
            return Err(GraphError::SelfLoop(edge.0));
        } else if !weight.is_finite() {
            return Err(GraphError::NonFiniteWeight(normalize(edge), weight));
        }

        Ok(())
    }

    fn set_weight(&mut self, (from, to): Edge<usize>, weight: f64) {
        self.adjacency_matrix[from][to] = Some(weight);
        self.adjacency_matrix[to][from] = Some(weight);
    }

    fn _shortest_paths(&self, from_node: usize) -> (Vec<Option<usize>>, Vec<Option<R64>>) {
        // dist[node] = current shortest distance from `start` to `node`, None if unreached
        let node_count = self.adjacency_matrix.len();
        let mut dist: Vec<Option<R64>> = vec![None; node_count];
        let mut prev: Vec<Option<usize>> = vec![None; node_count];
        let mut visited: Vec<bool> = vec![false; node_count];

        let mut heap: BinaryHeap<Frontier> = BinaryHeap::with_capacity(node_count);

        dist[from_node] = Some(R64::zero());
        prev[from_node] = Some(from_node);
        heap.push(Frontier {
            cost: R64::zero(),
            position: from_node,
        });

        // Examine the frontier with lower cost nodes first (min-heap)
        while let Some(Frontier { cost, position }) = heap.pop() {
            if visited[position] || dist[position].map_or(false, |best| cost > best) {
                continue;
            }

            visited[position] = true;

            let neighbors = self.adjacency_matrix[position]
                .iter()
                .enumerate()
                .filter_map(|(other, weight)| weight.map(|w| (other, w)));
            for (other, cost_to) in neighbors {
                let next = Frontier {
                    cost: cost + R64::from_inner(cost_to),
                    position: other,
                };

                if dist[other].map_or(true, |best| next.cost < best) {
                    if !visited[other] {
                        heap.push(next);
                    }
                    // Relaxation, we have now found a better way
                    dist[other] = Some(next.cost);
                    prev[other] = Some(position);
                }
            }
        }

        (prev, dist)
    }
}

impl<IndexType> Default for MatrixGraph<IndexType>
where
    IndexType: Hash + Copy + Eq + Display + Debug + Ord,
{
    fn default() -> Self {
        MatrixGraph::with_size(0)
    }
}

#[derive(Copy, Clone, Eq, PartialEq)]
struct Frontier {
    cost: R64,
    position: usize,
}

// Reversed on cost so the BinaryHeap pops the cheapest entry first.
impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| self.position.cmp(&other.position))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<IndexType> WeightedGraph for MatrixGraph<IndexType>
where
    IndexType: Hash + Copy + Eq + Display + Debug + Ord,
{
    type IndexType = IndexType;

    fn is_empty(&self) -> bool {
        self.inv_node_map.is_empty()
    }

    fn order(&self) -> usize {
        self.inv_node_map.len()
    }

    fn size(&self) -> usize {
        self.size
    }

    fn iter_node_ids(&self) -> Box<dyn Iterator<Item = IndexType> + '_> {
        Box::new(self.inv_node_map.iter().copied())
    }

    fn has_node(&self, id: IndexType) -> bool {
        self.node_map.contains_key(&id)
    }

    #[allow(clippy::type_complexity)]
    fn iter_neighbors(
        &self,
        id: IndexType,
    ) -> Result<Box<dyn Iterator<Item = (IndexType, f64)> + '_>, GraphError<IndexType>> {
        let inner = self.inner_id(id)?;

        Ok(Box::new(
            self.adjacency_matrix[inner]
                .iter()
                .enumerate()
                .filter_map(move |(j, weight)| weight.map(|w| (self.inv_node_map[j], w))),
        ))
    }

    fn iter_edges(&self) -> Box<dyn Iterator<Item = (Edge<IndexType>, f64)> + '_> {
        Box::new(
            self.adjacency_matrix
                .iter()
                .enumerate()
                .flat_map(move |(i, row)| {
                    row.iter()
                        .enumerate()
                        .skip(i + 1)
                        .filter_map(move |(j, weight)| {
                            weight.map(|w| {
                                (normalize((self.inv_node_map[i], self.inv_node_map[j])), w)
                            })
                        })
                }),
        )
    }

    fn edge_weight(&self, edge: Edge<IndexType>) -> Result<f64, GraphError<IndexType>> {
        let (from, to) = self.inner_edge(edge)?;
        self.adjacency_matrix[from][to].ok_or_else(|| GraphError::MissingEdge(normalize(edge)))
    }

    fn has_edge(&self, edge: Edge<IndexType>) -> bool {
        match self.inner_edge(edge) {
            Ok((from, to)) => self.adjacency_matrix[from][to].is_some(),
            Err(_) => false,
        }
    }

    fn add_node(&mut self, id: IndexType) -> Result<(), GraphError<IndexType>> {
        if self.node_map.contains_key(&id) {
            return Err(GraphError::DuplicateNode(id));
        }

        let inner_id = self.inv_node_map.len();
        for row in self.adjacency_matrix.iter_mut() {
            row.push(None);
        }
        self.adjacency_matrix.push(vec![None; inner_id + 1]);
        self.node_map.insert(id, inner_id);
        self.inv_node_map.push(id);
        Ok(())
    }

    fn add_edge(
        &mut self,
        edge: Edge<IndexType>,
        weight: f64,
    ) -> Result<(), GraphError<IndexType>> {
        self.check_new_edge(edge, weight)?;
        let inner = self.inner_edge(edge)?;
        if self.adjacency_matrix[inner.0][inner.1].is_some() {
            return Err(GraphError::DuplicateEdge(normalize(edge)));
        }

        self.set_weight(inner, weight);
        // Adding an edge increases size by one.
        self.size += 1;
        Ok(())
    }

    fn change_edge(
        &mut self,
        edge: Edge<IndexType>,
        weight: f64,
    ) -> Result<(), GraphError<IndexType>> {
        self.check_new_edge(edge, weight)?;
        let inner = self.inner_edge(edge)?;
        if self.adjacency_matrix[inner.0][inner.1].is_none() {
            self.size += 1;
        }

        self.set_weight(inner, weight);
        Ok(())
    }

    fn shortest_paths(
        &self,
        from_node: IndexType,
    ) -> Result<PathMaps<IndexType>, GraphError<IndexType>> {
        let start = self.inner_id(from_node)?;
        let (prevs, dists) = self._shortest_paths(start);

        let mut distances = BTreeMap::new();
        let mut paths = BTreeMap::new();
        for (i, dist) in dists.into_iter().enumerate() {
            let dist = match dist {
                Some(dist) => dist,
                None => continue,
            };

            let mut path = vec![self.inv_node_map[i]];
            let mut node = i;
            // only the start node has prev[node] == node
            while let Some(prev) = prevs[node] {
                if prev == node {
                    break;
                }
                path.push(self.inv_node_map[prev]);
                node = prev;
            }
            path.reverse();

            distances.insert(self.inv_node_map[i], dist.into_inner());
            paths.insert(self.inv_node_map[i], path);
        }

        Ok((distances, paths))
    }
}
