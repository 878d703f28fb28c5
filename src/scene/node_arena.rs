//! 节点池
//!
//! 代数槽位存储，持有者（骨架镜像、手指分类器、触控板）各自拥有一个，
//! 节点之间通过 NodeId 引用，不存在共享引用。

use glam::{Quat, Vec3};

use crate::{Result, TouchError};
use super::proxy_node::{NodeId, NodePrototype, ProxyNode};

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    node: Option<ProxyNode>,
}

/// 节点池
#[derive(Clone, Debug, Default)]
pub struct NodeArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// 按原型实例化节点，挂到 parent 下（parent 失效时作为根节点）
    pub fn instantiate(
        &mut self,
        prototype: &NodePrototype,
        parent: Option<NodeId>,
        name: impl Into<String>,
    ) -> NodeId {
        let parent = parent.filter(|p| self.contains(*p));
        let node = ProxyNode::from_prototype(prototype, parent, name.into());

        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.generation = slot.generation.wrapping_add(1);
                slot.node = Some(node);
                NodeId { index, generation: slot.generation }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot { generation: 0, node: Some(node) });
                NodeId { index, generation: 0 }
            }
        };

        if let Some(p) = parent {
            if let Some(parent_node) = self.node_mut(p) {
                parent_node.children.push(id);
            }
        }
        self.live += 1;
        id
    }

    /// 销毁节点及其全部子节点
    pub fn destroy(&mut self, id: NodeId) -> Result<()> {
        let node = self.take(id).ok_or(TouchError::StaleNode(id))?;

        if let Some(p) = node.parent {
            if let Some(parent_node) = self.node_mut(p) {
                parent_node.children.retain(|c| *c != id);
            }
        }

        let mut pending = node.children;
        while let Some(child) = pending.pop() {
            if let Some(child_node) = self.take(child) {
                pending.extend(child_node.children);
            }
        }
        Ok(())
    }

    fn take(&mut self, id: NodeId) -> Option<ProxyNode> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let node = slot.node.take()?;
        self.free.push(id.index);
        self.live -= 1;
        Some(node)
    }

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: NodeId) -> Option<&ProxyNode> {
        self.slots
            .get(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.node.as_ref())
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut ProxyNode> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.node.as_mut())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Result<&mut ProxyNode> {
        self.node_mut(id).ok_or(TouchError::StaleNode(id))
    }

    pub fn set_active(&mut self, id: NodeId, active: bool) -> Result<()> {
        self.get_mut(id)?.active = active;
        Ok(())
    }

    pub fn set_pose(&mut self, id: NodeId, position: Vec3, rotation: Quat) -> Result<()> {
        let node = self.get_mut(id)?;
        node.position = position;
        node.rotation = rotation;
        Ok(())
    }

    pub fn set_position(&mut self, id: NodeId, position: Vec3) -> Result<()> {
        self.get_mut(id)?.position = position;
        Ok(())
    }

    /// 存活节点数
    #[inline]
    pub fn len(&self) -> usize {
        self.live
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// 激活的节点数
    pub fn active_count(&self) -> usize {
        self.iter().filter(|(_, n)| n.active).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &ProxyNode)> {
        self.slots.iter().enumerate().filter_map(|(i, s)| {
            s.node.as_ref().map(|n| {
                (NodeId { index: i as u32, generation: s.generation }, n)
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::NodeKind;

    #[test]
    fn test_destroy_is_recursive() {
        let mut arena = NodeArena::new();
        let root = arena.instantiate(&NodePrototype::group(), None, "root");
        let child = arena.instantiate(&NodePrototype::new(NodeKind::Joint), Some(root), "child");
        let grandchild = arena.instantiate(&NodePrototype::new(NodeKind::Tip), Some(child), "tip");
        assert_eq!(arena.len(), 3);

        arena.destroy(root).unwrap();
        assert!(arena.is_empty());
        assert!(!arena.contains(child));
        assert!(!arena.contains(grandchild));
    }

    #[test]
    fn test_stale_id_after_reuse() {
        let mut arena = NodeArena::new();
        let a = arena.instantiate(&NodePrototype::new(NodeKind::Marker), None, "a");
        arena.destroy(a).unwrap();
        let b = arena.instantiate(&NodePrototype::new(NodeKind::Marker), None, "b");

        // 槽位复用，但旧 ID 已失效
        assert_eq!(a.index, b.index);
        assert!(arena.get(a).is_none());
        assert!(matches!(arena.set_active(a, false), Err(TouchError::StaleNode(_))));
        assert!(matches!(arena.destroy(a), Err(TouchError::StaleNode(_))));
        assert_eq!(arena.get(b).map(|n| n.name.as_str()), Some("b"));
    }

    #[test]
    fn test_capsule_from_prototype() {
        let mut arena = NodeArena::new();
        let proto = NodePrototype::new(NodeKind::Link).with_capsule(0.5);
        let id = arena.instantiate(&proto, None, "link");
        let capsule = arena.get(id).and_then(|n| n.capsule).unwrap();
        assert!((capsule.radius - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_active_count() {
        let mut arena = NodeArena::new();
        let root = arena.instantiate(&NodePrototype::group(), None, "root");
        arena.instantiate(&NodePrototype::new(NodeKind::Joint), Some(root), "child");
        assert_eq!(arena.active_count(), 2);
        arena.set_active(root, false).unwrap();
        assert_eq!(arena.active_count(), 1);
    }
}
