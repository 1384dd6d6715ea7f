//! Input records exactly as the data collaborator supplies them.

mod load;
mod raw;

pub use load::{load_graph_file, parse_graph};
pub use raw::{LinkEndpoint, RawGraph, RawLink, RawNode};
