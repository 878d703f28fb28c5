//! 错误类型
//!
//! 所有错误都在帧内本地恢复（隐藏 / 跳过 / 单位旋转），不会跨帧传播。

use thiserror::Error;

use crate::hand::{FingerFeature, HandFinger};
use crate::scene::NodeId;

/// 引擎错误
#[derive(Debug, Error)]
pub enum TouchError {
    /// 手指特征查询失败（视为未张开）
    #[error("feature {feature:?} unavailable for {finger:?}")]
    FeatureUnavailable {
        finger: HandFinger,
        feature: FingerFeature,
    },

    /// 节点已销毁或 id 过期
    #[error("stale node id {0:?}")]
    StaleNode(NodeId),

    /// 碰撞体没有对应的手指身份
    #[error("unknown collider {0}")]
    UnknownCollider(u64),

    /// 配置非法
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

/// 引擎 Result 别名
pub type Result<T> = std::result::Result<T, TouchError>;
