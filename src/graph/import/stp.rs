use log::{debug, warn};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use super::{ImportError, SteinerInstance};
use crate::graph::{MatrixGraph, WeightedGraph};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Comment,
    Graph,
    Terminals,
    Other,
}

/// Loads a SteinLib `.stp` instance. The instance is named after the `Name` comment,
/// falling back to the file stem.
pub fn import_stp<P: AsRef<Path>>(path: P) -> Result<SteinerInstance, ImportError> {
    let path = path.as_ref();
    let file = match File::open(path) {
        Ok(file) => file,
        Err(_e) => return Err(ImportError::MissingFile(path.display().to_string())),
    };
    let fallback_name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    parse_stp(BufReader::new(file), &fallback_name)
}

/// Parses the SteinLib format from any buffered reader.
/// Only undirected edges are supported. Re-declared edges keep the last weight.
pub fn parse_stp<R: BufRead>(
    reader: R,
    fallback_name: &str,
) -> Result<SteinerInstance, ImportError> {
    let mut name: Option<String> = None;
    let mut graph = MatrixGraph::default();
    let mut terminals = BTreeSet::new();
    let mut declared_edges: Option<usize> = None;
    let mut section: Option<Section> = None;

    for (line_number, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| invalid(line_number, &e.to_string()))?;
        let mut tokens = line.split_whitespace();
        let keyword = match tokens.next() {
            Some(keyword) => keyword.to_ascii_lowercase(),
            None => continue,
        };

        match keyword.as_str() {
            "section" => {
                section = Some(match tokens.next().map(|s| s.to_ascii_lowercase()) {
                    Some(ref s) if s == "comment" => Section::Comment,
                    Some(ref s) if s == "graph" => Section::Graph,
                    Some(ref s) if s == "terminals" => Section::Terminals,
                    _ => Section::Other,
                });
                continue;
            }
            "end" => {
                section = None;
                continue;
            }
            "eof" => break,
            _ => {}
        }

        match section {
            Some(Section::Comment) if keyword == "name" => {
                let rest: Vec<&str> = tokens.collect();
                name = Some(rest.join(" ").trim_matches('"').to_string());
            }
            Some(Section::Graph) => match keyword.as_str() {
                "nodes" => {
                    let count: usize = parse_token(tokens.next(), line_number)?;
                    for id in 1..=count {
                        if !graph.has_node(id) {
                            graph
                                .add_node(id)
                                .map_err(|e| invalid(line_number, &e.to_string()))?;
                        }
                    }
                }
                "edges" => declared_edges = Some(parse_token(tokens.next(), line_number)?),
                "e" => {
                    let from: usize = parse_token(tokens.next(), line_number)?;
                    let to: usize = parse_token(tokens.next(), line_number)?;
                    let weight: f64 = parse_token(tokens.next(), line_number)?;
                    if weight < 0.0 || !weight.is_finite() {
                        return Err(invalid(line_number, &format!("invalid weight {}", weight)));
                    }
                    for id in [from, to].iter() {
                        if !graph.has_node(*id) {
                            graph
                                .add_node(*id)
                                .map_err(|e| invalid(line_number, &e.to_string()))?;
                        }
                    }
                    graph
                        .change_edge((from, to), weight)
                        .map_err(|e| invalid(line_number, &e.to_string()))?;
                }
                "a" | "arcs" => {
                    return Err(invalid(line_number, "directed arcs are not supported"));
                }
                _ => {}
            },
            Some(Section::Terminals) => {
                if keyword == "t" {
                    let terminal: usize = parse_token(tokens.next(), line_number)?;
                    if !graph.has_node(terminal) {
                        return Err(invalid(
                            line_number,
                            &format!("terminal {} is not a node", terminal),
                        ));
                    }
                    terminals.insert(terminal);
                }
            }
            _ => {}
        }
    }

    let name = name
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| fallback_name.to_string());
    if terminals.is_empty() {
        return Err(ImportError::NoTerminals(name));
    }
    if let Some(declared) = declared_edges {
        if declared != graph.size() {
            warn!(
                "{} declares {} edges but {} distinct edges were read",
                name,
                declared,
                graph.size()
            );
        }
    }

    debug!(
        "Imported {} with {} nodes, {} edges and {} terminals",
        name,
        graph.order(),
        graph.size(),
        terminals.len()
    );
    Ok(SteinerInstance {
        name,
        graph,
        terminals,
    })
}

fn parse_token<T: FromStr>(token: Option<&str>, line_number: usize) -> Result<T, ImportError> {
    match token.map(str::parse::<T>) {
        Some(Ok(value)) => Ok(value),
        Some(Err(_)) => Err(invalid(line_number, &format!("unreadable token {:?}", token))),
        None => Err(invalid(line_number, "missing token")),
    }
}

fn invalid(line_number: usize, message: &str) -> ImportError {
    ImportError::InvalidFormat(format!("line {}: {}", line_number + 1, message))
}
