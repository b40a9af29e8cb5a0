use std::collections::HashMap;
use std::fs::File;

use csv::ReaderBuilder;
use serde::Deserialize;

use common::types::{GraphNode, StreetEdge};
use loop_router_core::StreetGraph;

use super::error::Error;
use super::types::GraphSource;

// Helper structs for CSV parsing
#[derive(Debug, Deserialize)]
pub struct NodeRecord {
    pub id: u64,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Deserialize)]
pub struct EdgeRecord {
    #[serde(rename = "from")]
    pub from_node: u64,

    #[serde(rename = "to")]
    pub to_node: u64,

    pub length: f64,

    /// Zero or more tags, `;`-separated (a way can carry several).
    #[serde(default)]
    pub category: String,
}

/// Loads a street graph from a node CSV (`id,x,y`) and an edge CSV
/// (`from,to,length,category`). External node ids are mapped onto dense
/// indices in file order; edges referencing unknown ids are rejected.
pub struct CsvGraphSource {
    nodes_path: String,
    edges_path: String,
}

impl CsvGraphSource {
    pub fn new(nodes_path: String, edges_path: String) -> Self {
        CsvGraphSource {
            nodes_path,
            edges_path,
        }
    }

    fn parse_files(&self) -> Result<StreetGraph, Error> {
        let node_file = File::open(&self.nodes_path).map_err(|e| {
            eprintln!("Failed to read file {}: {:?}", self.nodes_path, e);
            Error::IoError(e)
        })?;

        let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(node_file);
        let mut nodes: Vec<GraphNode> = Vec::new();
        let mut index_of: HashMap<u64, usize> = HashMap::new();

        for result in rdr.deserialize() {
            let record: NodeRecord = result?;
            index_of.insert(record.id, nodes.len());
            nodes.push(GraphNode {
                ext_id: record.id,
                x: record.x,
                y: record.y,
            });
        }

        let edge_file = File::open(&self.edges_path).map_err(|e| {
            eprintln!("Failed to read file {}: {:?}", self.edges_path, e);
            Error::IoError(e)
        })?;

        let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(edge_file);
        let mut edges: Vec<StreetEdge> = Vec::new();

        for result in rdr.deserialize() {
            let record: EdgeRecord = result?;
            let a = *index_of
                .get(&record.from_node)
                .ok_or(Error::UnknownNodeId(record.from_node))?;
            let b = *index_of
                .get(&record.to_node)
                .ok_or(Error::UnknownNodeId(record.to_node))?;

            let categories: Vec<String> = record
                .category
                .split(';')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect();

            edges.push(StreetEdge {
                a,
                b,
                length: record.length,
                categories,
            });
        }

        Ok(StreetGraph::from_parts(nodes, edges)?)
    }
}

#[async_trait::async_trait]
impl GraphSource for CsvGraphSource {
    async fn load(&self) -> Result<StreetGraph, Error> {
        let graph = self.parse_files()?;
        println!(
            "CsvGraphSource: loaded {} nodes, {} edges.",
            graph.num_nodes(),
            graph.num_edges()
        );
        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MOCK_NODES: &str = "\
id,x,y
100,0.0,0.0
101,120.0,0.0
102,120.0,95.0
";

    const MOCK_EDGES: &str = "\
from,to,length,category
100,101,120.0,residential
101,102,95.0,footway;steps
102,100,153.0,
";

    fn write_temp(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write mock content");
        file
    }

    fn path_of(file: &NamedTempFile) -> String {
        file.path().to_str().expect("path").to_string()
    }

    #[test]
    fn test_parse_files_success() {
        let nodes = write_temp(MOCK_NODES);
        let edges = write_temp(MOCK_EDGES);

        let source = CsvGraphSource::new(path_of(&nodes), path_of(&edges));
        let graph = source.parse_files().expect("parse should succeed");

        assert_eq!(graph.num_nodes(), 3);
        assert_eq!(graph.num_edges(), 3);

        // External ids preserved in file order.
        let ext: Vec<u64> = graph.nodes().iter().map(|n| n.ext_id).collect();
        assert_eq!(ext, vec![100, 101, 102]);

        // Multi-tag categories split on ';', empty category means no tags.
        assert_eq!(graph.edges()[1].categories, vec!["footway", "steps"]);
        assert!(graph.edges()[2].categories.is_empty());

        // Dense remapping wired the triangle correctly.
        assert_eq!(graph.degree(0), 2);
        assert_eq!(graph.degree(1), 2);
        assert_eq!(graph.degree(2), 2);
    }

    #[test]
    fn test_parse_files_unknown_node_id() {
        let nodes = write_temp(MOCK_NODES);
        let edges = write_temp("from,to,length,category\n100,999,50.0,\n");

        let source = CsvGraphSource::new(path_of(&nodes), path_of(&edges));
        let result = source.parse_files();

        match result {
            Err(Error::UnknownNodeId(id)) => assert_eq!(id, 999),
            other => panic!("Expected UnknownNodeId, got: {:?}", other.err()),
        }
    }

    #[test]
    fn test_parse_files_file_not_found() {
        let source = CsvGraphSource::new(
            "non_existent_nodes.csv".to_string(),
            "non_existent_edges.csv".to_string(),
        );
        let result = source.parse_files();

        assert!(
            result.is_err(),
            "Should have failed to open non-existent file."
        );

        if let Err(Error::IoError(e)) = result {
            assert_eq!(e.kind(), std::io::ErrorKind::NotFound);
        } else {
            panic!("Expected IoError, got: {:?}", result.err());
        }
    }

    #[test]
    fn test_parse_files_bad_length_rejected() {
        let nodes = write_temp(MOCK_NODES);
        let edges = write_temp("from,to,length,category\n100,101,-4.0,\n");

        let source = CsvGraphSource::new(path_of(&nodes), path_of(&edges));
        assert!(matches!(
            source.parse_files(),
            Err(Error::GraphError(common::error::Error::InvalidGraph))
        ));
    }
}
