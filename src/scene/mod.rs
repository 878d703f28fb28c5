//! 场景节点 - 取代宿主引擎的预制体实例化
//!
//! - ProxyNode: 单个代理节点（变换 + 可见性 + 可选胶囊体）
//! - NodeArena: 代数槽位节点池，持有者独占

mod node_arena;
mod proxy_node;

pub use node_arena::NodeArena;
pub use proxy_node::{CapsuleShape, NodeId, NodeKind, NodePrototype, ProxyNode};
