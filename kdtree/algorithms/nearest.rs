use crate::kdtree::error::KdTreeError;
use crate::kdtree::kdtree::KdTree;
use crate::kdtree::node::Node;
use crate::kdtree::point::Point;
use tracing::debug;

/// 最近邻查询相关算法
impl<V> KdTree<V> {
    /// 离 `point` 最近的已存点，空树返回 `None`
    ///
    /// # 错误
    /// 点的坐标不是有限值时返回 `KdTreeError::InvalidArgument`
    ///
    /// # 示例
    /// ```
    /// use kdtree_st::{KdTree, Point};
    ///
    /// let mut tree = KdTree::new();
    /// tree.put(Point::new(0.0, 0.0), "origin").unwrap();
    /// tree.put(Point::new(1.0, 1.0), "corner").unwrap();
    ///
    /// let nearest = tree.nearest(&Point::new(0.9, 0.7)).unwrap();
    /// assert_eq!(nearest, Some(Point::new(1.0, 1.0)));
    /// ```
    pub fn nearest(&self, point: &Point) -> Result<Option<Point>, KdTreeError> {
        KdTreeError::check_point(point)?;
        Ok(self.nearest_node(point).map(|(node, _)| node.point))
    }

    /// 最近邻及其距离平方
    pub fn nearest_with_distance(&self, point: &Point) -> Result<Option<(Point, f64)>, KdTreeError> {
        KdTreeError::check_point(point)?;
        Ok(self
            .nearest_node(point)
            .map(|(node, distance)| (node.point, distance)))
    }

    /// 最近邻的键和值
    pub fn nearest_entry(&self, point: &Point) -> Result<Option<(&Point, &V)>, KdTreeError> {
        KdTreeError::check_point(point)?;
        Ok(self
            .nearest_node(point)
            .map(|(node, _)| (&node.point, &node.value)))
    }

    /// 带剪枝的深度优先搜索，维护当前最优的冠军节点
    ///
    /// 冠军初始为根节点。每个节点出栈时：
    /// 1. 边界矩形到查询点的距离平方大于冠军的距离平方，整棵子树跳过；
    /// 2. 节点自身严格更近时成为新冠军；
    /// 3. 先访问查询点所在一侧的子树，再访问另一侧（相等时先走右侧）。
    ///
    /// 用显式栈模拟递归：先压远侧再压近侧，出栈顺序与递归访问顺序一致，
    /// 远侧子树出栈时看到的是近侧搜索完成后收紧的冠军距离。
    fn nearest_node(&self, query: &Point) -> Option<(&Node<V>, f64)> {
        let root = self.root_ref().as_deref()?;
        let mut champion = root;
        let mut best = root.point.distance_squared_to(query);
        let mut stack = vec![root];
        let mut visited = 0usize;
        let mut pruned = 0usize;

        while let Some(node) = stack.pop() {
            if node.rectangle.distance_squared_to(query) > best {
                pruned += 1;
                continue;
            }
            visited += 1;

            let distance = node.point.distance_squared_to(query);
            if distance < best {
                champion = node;
                best = distance;
            }

            let near = node.side_of(query);
            stack.extend(node.child(near.opposite()));
            stack.extend(node.child(near));
        }

        debug!(
            visited,
            pruned,
            distance_squared = best,
            "nearest to {} is {}",
            query,
            champion.point
        );
        Some((champion, best))
    }
}
