use std::fmt;

#[derive(Debug, PartialEq)]
pub enum Error {
    /// Indicates an attempt to access a node index that exceeds the graph size (N).
    NodeIndexOutOfBounds(usize),

    /// Indicates a structural inconsistency found while assembling or validating a graph.
    InvalidGraph,

    /// A search parameter failed eager validation; no attempt has been run.
    InvalidParameter(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::NodeIndexOutOfBounds(n) => write!(f, "Node index {} is out of bounds.", n),

            Error::InvalidGraph => write!(f, "Graph structure is invalid or inconsistent."),

            Error::InvalidParameter(what) => {
                write!(f, "Invalid search parameter: {}.", what)
            }
        }
    }
}

impl std::error::Error for Error {}
