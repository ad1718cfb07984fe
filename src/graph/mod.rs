pub mod builder;
pub mod schema;
pub mod store;
pub mod store_models;
pub mod traits;

pub use builder::GraphBuilder;
pub use schema::schema_description;
pub use store::GraphStore;
pub use store_models::{GraphEdge, GraphNode, NodeKey, NodeLabel, RelKind};
pub use traits::GraphWrite;
