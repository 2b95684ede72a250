//! # kdtree-st
//!
//! 以二维点为键的符号表，底层是 2d-tree（按层交替比较 x / y 坐标的二叉搜索树）。
//!
//! 支持精确查找、插入/更新、遍历、矩形范围查询和最近邻查询，
//! 利用树对平面的隐式划分进行剪枝，而不是扫描全部点。
//!
//! 注意：这棵树不做任何再平衡，性能特征就是按插入顺序构建的普通二叉搜索树。
//!
//! ```rust
//! use kdtree_st::{KdTree, Point, Rectangle};
//!
//! let mut tree = KdTree::new();
//! tree.put(Point::new(0.7, 0.2), "A").unwrap();
//! tree.put(Point::new(0.5, 0.4), "B").unwrap();
//!
//! assert_eq!(tree.size(), 2);
//! assert_eq!(tree.get(&Point::new(0.5, 0.4)).unwrap(), Some(&"B"));
//!
//! let hits = tree.range(&Rectangle::new(0.0, 0.0, 0.6, 0.6)).unwrap();
//! assert_eq!(hits, vec![Point::new(0.5, 0.4)]);
//!
//! let nearest = tree.nearest(&Point::new(0.9, 0.1)).unwrap();
//! assert_eq!(nearest, Some(Point::new(0.7, 0.2)));
//! ```

pub mod config;
pub mod kdtree;

use std::error::Error;

// 重新导出主要的公共接口
pub use kdtree::{
    AsyncConcurrentError, AsyncConcurrentKdTree, Axis, ConcurrentError, ConcurrentKdTree, KdTree,
    KdTreeError, Node, PersistenceError, Point, Rectangle, SerializationFormat,
};

pub use crate::config::KdTreeConfig;

pub type Result<T> = std::result::Result<T, Box<dyn Error + Send + Sync>>;
