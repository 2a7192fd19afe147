use thiserror::Error;

/// Errors that reject a graph mutation. The store is left exactly as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("A node with id '{0}' already exists in the graph")]
    DuplicateId(String),

    #[error("Node '{0}' does not exist in the graph")]
    UnknownNode(String),

    #[error("Edge '{0}' does not exist in the graph")]
    UnknownEdge(String),
}

/// Errors raised at the persistence boundary when loading or saving a graph.
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Failed to parse graph JSON: {0}")]
    JsonParseError(#[from] serde_json::Error),

    #[error("Could not access graph file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Graph snapshot is invalid: {0}")]
    InvalidGraph(#[from] GraphError),
}

/// Errors that can occur while loading an engine configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse engine configuration: {0}")]
    JsonParseError(#[from] serde_json::Error),

    #[error("Could not read configuration file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// A string that does not name a known node kind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown node type '{0}'")]
pub struct UnknownNodeKind(pub String);

/// A status string that is not part of a kind's state machine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown status '{0}'")]
pub struct UnknownStatus(pub String);

/// A string that is not one of the supported comparison operator symbols.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown comparison operator '{0}'")]
pub struct UnknownOperator(pub String);
