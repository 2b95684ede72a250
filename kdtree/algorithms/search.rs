use crate::kdtree::error::KdTreeError;
use crate::kdtree::kdtree::KdTree;
use crate::kdtree::node::Node;
use crate::kdtree::point::Point;

/// 点查找相关算法
impl<V> KdTree<V> {
    /// 获取点 `point` 关联的值，不存在时返回 `None`
    ///
    /// 下降规则与插入相同：分割轴上严格小于走左边，否则走右边
    ///
    /// # 错误
    /// 点的坐标不是有限值时返回 `KdTreeError::InvalidArgument`
    pub fn get(&self, point: &Point) -> Result<Option<&V>, KdTreeError> {
        KdTreeError::check_point(point)?;
        Ok(self.find_node(point).map(|node| &node.value))
    }

    /// 符号表中是否有点 `point`
    ///
    /// # 错误
    /// 点的坐标不是有限值时返回 `KdTreeError::InvalidArgument`
    pub fn contains(&self, point: &Point) -> Result<bool, KdTreeError> {
        Ok(self.get(point)?.is_some())
    }

    /// 沿分割轴下降查找持有该点的节点
    fn find_node(&self, point: &Point) -> Option<&Node<V>> {
        let mut current = self.root_ref().as_deref();
        while let Some(node) = current {
            if node.point == *point {
                return Some(node);
            }
            current = node.child(node.side_of(point));
        }
        None
    }
}
