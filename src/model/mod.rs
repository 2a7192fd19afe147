pub mod data;
pub mod edge;
pub mod kind;
pub mod node;
pub mod status;

pub use data::NodeData;
pub use edge::*;
pub use kind::*;
pub use node::*;
pub use status::*;
