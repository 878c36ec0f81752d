//! Node-link JSON graphs
//!
//! # Format
//!
//! ```json
//! {
//!   "directed": false,
//!   "multigraph": false,
//!   "graph": {},
//!   "nodes": [{"id": 0}, {"id": 1, "name": "main"}],
//!   "links": [{"source": 0, "target": 1, "weight": 1.0}]
//! }
//! ```
//!
//! Node ids and all attributes are arbitrary JSON values. The key holding the
//! edge list is configurable (`"links"` by default, `"edges"` is also common).

use crate::dataset::{DataFormat, VersionedDataSet};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Node-link JSON graph data set
pub type GraphJsonDataSet = VersionedDataSet<GraphJson>;

/// Default key of the edge list
pub const DEFAULT_EDGES_KEY: &str = "links";

/// A node with its attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Node identifier
    pub id: Value,
    /// Remaining attributes
    #[serde(flatten)]
    pub attrs: Map<String, Value>,
}

/// An edge with its attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// Source node id
    pub source: Value,
    /// Target node id
    pub target: Value,
    /// Remaining attributes
    #[serde(flatten)]
    pub attrs: Map<String, Value>,
}

/// Graph in node-link form
///
/// Equality is structural: same flags, graph attributes, and the same nodes
/// and links in the same order.
///
/// # Example
///
/// ```
/// use trueno_dataset::NodeLinkGraph;
///
/// let mut graph = NodeLinkGraph::new(true);
/// graph.add_node(0);
/// graph.add_node(1);
/// graph.add_edge(0, 1);
///
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.edge_count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeLinkGraph {
    /// Whether edges are directed
    pub directed: bool,
    /// Whether parallel edges are allowed
    pub multigraph: bool,
    /// Graph-level attributes
    #[serde(default)]
    pub graph: Map<String, Value>,
    /// Nodes
    pub nodes: Vec<Node>,
    /// Edges
    pub links: Vec<Link>,
}

impl NodeLinkGraph {
    /// Empty simple graph
    #[must_use]
    pub fn new(directed: bool) -> Self {
        Self {
            directed,
            multigraph: false,
            graph: Map::new(),
            nodes: Vec::new(),
            links: Vec::new(),
        }
    }

    /// Undirected graph on nodes `0..n` with an edge between every pair
    #[must_use]
    pub fn complete_graph(n: u64) -> Self {
        let mut graph = Self::new(false);
        for id in 0..n {
            graph.add_node(id);
        }
        for source in 0..n {
            for target in source + 1..n {
                graph.add_edge(source, target);
            }
        }
        graph
    }

    /// Append a node without attributes
    pub fn add_node(&mut self, id: impl Into<Value>) -> &mut Node {
        self.nodes.push(Node {
            id: id.into(),
            attrs: Map::new(),
        });
        let last = self.nodes.len() - 1;
        &mut self.nodes[last]
    }

    /// Append an edge without attributes
    pub fn add_edge(&mut self, source: impl Into<Value>, target: impl Into<Value>) -> &mut Link {
        self.links.push(Link {
            source: source.into(),
            target: target.into(),
            attrs: Map::new(),
        });
        let last = self.links.len() - 1;
        &mut self.links[last]
    }

    /// Number of nodes
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.links.len()
    }
}

/// Options for reading node-link JSON
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GraphJsonLoadArgs {
    /// Key holding the edge list
    pub edges_key: String,
}

impl Default for GraphJsonLoadArgs {
    fn default() -> Self {
        Self {
            edges_key: DEFAULT_EDGES_KEY.to_string(),
        }
    }
}

/// Options for writing node-link JSON
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GraphJsonSaveArgs {
    /// Key holding the edge list
    pub edges_key: String,
    /// Indent the output
    pub pretty: bool,
}

impl Default for GraphJsonSaveArgs {
    fn default() -> Self {
        Self {
            edges_key: DEFAULT_EDGES_KEY.to_string(),
            pretty: false,
        }
    }
}

/// Node-link JSON format marker
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphJson;

impl DataFormat for GraphJson {
    type Data = NodeLinkGraph;
    type LoadArgs = GraphJsonLoadArgs;
    type SaveArgs = GraphJsonSaveArgs;

    const NAME: &'static str = "GraphJson";

    fn read(path: &Path, args: &GraphJsonLoadArgs) -> Result<NodeLinkGraph> {
        let bytes = fs::read(path).with_context(|| format!("Failed to open {}", path.display()))?;
        let mut value: Value = serde_json::from_slice(&bytes).context("Invalid JSON")?;

        let Some(object) = value.as_object_mut() else {
            bail!("Node-link graph must be a JSON object");
        };
        rename_key(object, &args.edges_key, DEFAULT_EDGES_KEY)?;

        serde_json::from_value(value).context("Invalid node-link graph")
    }

    fn write(data: &NodeLinkGraph, path: &Path, args: &GraphJsonSaveArgs) -> Result<()> {
        let mut value = serde_json::to_value(data)?;
        if let Some(object) = value.as_object_mut() {
            rename_key(object, DEFAULT_EDGES_KEY, &args.edges_key)?;
        }

        let file =
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        if args.pretty {
            serde_json::to_writer_pretty(&mut writer, &value)?;
        } else {
            serde_json::to_writer(&mut writer, &value)?;
        }
        writer.flush()?;

        Ok(())
    }
}

fn rename_key(object: &mut Map<String, Value>, from: &str, to: &str) -> Result<()> {
    if from == to {
        return Ok(());
    }
    if object.contains_key(to) {
        bail!("Key `{to}` clashes with the edge list key `{from}`");
    }
    if let Some(edges) = object.remove(from) {
        object.insert(to.to_string(), edges);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DataSet;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_complete_graph_shape() {
        let graph = NodeLinkGraph::complete_graph(100);
        assert_eq!(graph.node_count(), 100);
        assert_eq!(graph.edge_count(), 100 * 99 / 2);
        assert!(!graph.directed);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let data_set = GraphJsonDataSet::new(dir.path().join("test.json"));
        let graph = NodeLinkGraph::complete_graph(100);

        data_set.save(&graph).unwrap();
        assert_eq!(data_set.load().unwrap(), graph);
    }

    #[test]
    fn test_attributes_roundtrip() {
        let dir = tempdir().unwrap();
        let data_set = GraphJsonDataSet::new(dir.path().join("calls.json"));

        let mut graph = NodeLinkGraph::new(true);
        graph.graph.insert("name".to_string(), json!("call graph"));
        graph
            .add_node("main")
            .attrs
            .insert("file".to_string(), json!("main.rs"));
        graph.add_node("parse_args");
        graph
            .add_edge("main", "parse_args")
            .attrs
            .insert("weight".to_string(), json!(2.5));

        data_set.save(&graph).unwrap();
        assert_eq!(data_set.load().unwrap(), graph);
    }

    #[test]
    fn test_custom_edges_key() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.json");
        let data_set = GraphJsonDataSet::new(&path)
            .with_save_args(GraphJsonSaveArgs {
                edges_key: "edges".to_string(),
                pretty: true,
            })
            .with_load_args(GraphJsonLoadArgs {
                edges_key: "edges".to_string(),
            });

        let graph = NodeLinkGraph::complete_graph(3);
        data_set.save(&graph).unwrap();

        let raw: Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(raw["edges"].as_array().unwrap().len(), 3);
        assert!(raw.get("links").is_none());

        assert_eq!(data_set.load().unwrap(), graph);
    }

    #[test]
    fn test_reads_foreign_document() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("g.json");
        fs::write(
            &path,
            r#"{"directed": true, "multigraph": false, "graph": {},
                "nodes": [{"id": 1}, {"id": 2, "color": "red"}],
                "links": [{"source": 1, "target": 2}]}"#,
        )
        .unwrap();

        let graph = GraphJsonDataSet::new(&path).load().unwrap();
        assert!(graph.directed);
        assert_eq!(graph.nodes[1].attrs["color"], json!("red"));
        assert_eq!(graph.links[0].source, json!(1));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let data_set = GraphJsonDataSet::new(dir.path().join("test.json"));

        let err = data_set.load().unwrap_err();
        assert!(err
            .to_string()
            .starts_with("Failed while loading data from data set GraphJsonDataSet("));
    }

    #[test]
    fn test_load_non_object() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        let err = GraphJsonDataSet::new(&path).load().unwrap_err();
        assert!(err.to_string().contains("must be a JSON object"));
    }

    #[test]
    fn test_exists() {
        let dir = tempdir().unwrap();
        let data_set = GraphJsonDataSet::new(dir.path().join("test.json"));

        assert!(!data_set.exists().unwrap());
        data_set.save(&NodeLinkGraph::complete_graph(3)).unwrap();
        assert!(data_set.exists().unwrap());
    }
}
