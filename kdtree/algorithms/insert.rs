use crate::kdtree::error::KdTreeError;
use crate::kdtree::kdtree::KdTree;
use crate::kdtree::node::Node;
use crate::kdtree::point::Point;
use crate::kdtree::rectangle::Rectangle;
use tracing::{trace, warn};

/// 插入操作相关算法
impl<V> KdTree<V> {
    /// 把值 `value` 关联到点 `point`
    ///
    /// 点已经存在时原地覆盖值并返回旧值，树的形状和大小都不变；
    /// 否则沿分割轴下降到空位创建新节点，返回 `None`。
    ///
    /// # 错误
    /// 点的坐标不是有限值时返回 `KdTreeError::InvalidArgument`，树保持不变
    ///
    /// # 示例
    /// ```
    /// use kdtree_st::{KdTree, Point};
    ///
    /// let mut tree = KdTree::new();
    /// assert_eq!(tree.put(Point::new(0.5, 0.5), 1).unwrap(), None);
    /// assert_eq!(tree.put(Point::new(0.5, 0.5), 2).unwrap(), Some(1));
    /// assert_eq!(tree.size(), 1);
    /// ```
    pub fn put(&mut self, point: Point, value: V) -> Result<Option<V>, KdTreeError> {
        if let Err(err) = KdTreeError::check_point(&point) {
            warn!("put rejected: {}", err);
            return Err(err);
        }
        Ok(self.insert_unchecked(point, value))
    }

    /// 插入已校验过的点
    ///
    /// 从根开始逐层下降，记录下一层节点的边界矩形和层级；
    /// 走到空位时创建节点，此时且仅此时 size 加一
    pub(crate) fn insert_unchecked(&mut self, point: Point, value: V) -> Option<V> {
        let mut slot = self.root_mut();
        let mut pending: Option<(Rectangle, usize)> = None;

        while let Some(node) = slot {
            if node.point == point {
                trace!(level = node.level, "overwrite value at {}", point);
                return Some(std::mem::replace(&mut node.value, value));
            }
            let side = node.side_of(&point);
            pending = Some((node.child_rectangle(side), node.level + 1));
            slot = node.child_slot_mut(side);
        }

        let node = match pending {
            Some((rectangle, level)) => Node::new(point, value, rectangle, level),
            None => Node::new_root(point, value),
        };
        trace!(level = node.level, "create node at {}", point);
        *slot = Some(Box::new(node));
        self.increment_size();
        None
    }
}
