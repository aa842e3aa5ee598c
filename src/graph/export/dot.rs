use std::collections::BTreeSet;

use super::Export;
use crate::graph::WeightedGraph;
use crate::metaheuristic::Solution;

/// Empty struct. Only implements Export trait functionalities.
pub struct Dot {}

impl Export for Dot {
    /// Returns a string representing the graph in Graphviz dot format.
    /// Edge weights are added as labels.
    fn from_weighted_graph<G: WeightedGraph>(graph: &G, name: &str) -> String {
        Dot::from_steiner_solution(graph, &BTreeSet::new(), &Solution::new(), name)
    }

    /// Returns a string representing the graph in Graphviz dot format.
    /// Terminals are filled red, selected edges are drawn red and bold.
    fn from_steiner_solution<G: WeightedGraph>(
        graph: &G,
        terminals: &BTreeSet<G::IndexType>,
        solution: &Solution<G::IndexType>,
        name: &str,
    ) -> String {
        let mut out = format!("graph \"{}\" {{\n", escape(name));

        for node in graph.iter_node_ids() {
            if terminals.contains(&node) {
                out.push_str(format!("\t{} [style=filled fillcolor=red]\n", node).as_str());
            } else {
                out.push_str(format!("\t{}\n", node).as_str());
            }
        }

        for ((from, to), weight) in graph.iter_edges() {
            if solution.contains((from, to)) {
                out.push_str(
                    format!(
                        "\t{} -- {} [label=\"{}\" color=red penwidth=2]\n",
                        from, to, weight
                    )
                    .as_str(),
                );
            } else {
                out.push_str(format!("\t{} -- {} [label=\"{}\"]\n", from, to, weight).as_str());
            }
        }

        out.push('}');
        out
    }
}

/// Escapes a name for use inside a quoted DOT id.
fn escape(name: &str) -> String {
    name.replace('\\', "\\\\").replace('"', "\\\"")
}
