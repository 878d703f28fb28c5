//! 代理节点
//!
//! 骨架镜像 / 接触标记使用的轻量场景节点，只保存变换与可见性，
//! 渲染和物理由宿主根据这些数据自行完成。

use glam::{Quat, Vec3};

/// 节点 ID（带代数，销毁后旧 ID 失效）
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

/// 节点种类
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// 分组节点（手部根、手指）
    Group,
    /// 关节
    Joint,
    /// 连杆
    Link,
    /// 指尖
    Tip,
    /// 标记（手指碰撞体 / 接触点）
    Marker,
}

/// 胶囊碰撞体
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CapsuleShape {
    pub radius: f32,
    pub height: f32,
}

/// 节点原型（实例化模板）
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodePrototype {
    pub kind: NodeKind,
    /// 初始缩放
    pub scale: Vec3,
    /// 有值时实例携带胶囊碰撞体
    pub capsule_radius: Option<f32>,
}

impl NodePrototype {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            scale: Vec3::ONE,
            capsule_radius: None,
        }
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_capsule(mut self, radius: f32) -> Self {
        self.capsule_radius = Some(radius);
        self
    }

    pub fn group() -> Self {
        Self::new(NodeKind::Group)
    }
}

/// 代理节点
#[derive(Clone, Debug)]
pub struct ProxyNode {
    pub name: String,
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    /// 是否可见（激活）
    pub active: bool,
    /// 世界位置
    pub position: Vec3,
    /// 世界旋转
    pub rotation: Quat,
    /// 本地缩放
    pub scale: Vec3,
    pub capsule: Option<CapsuleShape>,
}

impl ProxyNode {
    pub(crate) fn from_prototype(prototype: &NodePrototype, parent: Option<NodeId>, name: String) -> Self {
        Self {
            name,
            kind: prototype.kind,
            parent,
            children: Vec::new(),
            active: true,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: prototype.scale,
            capsule: prototype.capsule_radius.map(|radius| CapsuleShape {
                radius,
                height: 2.0 * radius,
            }),
        }
    }

    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// 本地上方向（Y 轴）
    #[inline]
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }
}
