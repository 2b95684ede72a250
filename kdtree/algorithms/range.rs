use crate::kdtree::error::KdTreeError;
use crate::kdtree::kdtree::KdTree;
use crate::kdtree::node::Node;
use crate::kdtree::point::Point;
use crate::kdtree::rectangle::Rectangle;
use tracing::debug;

/// 矩形范围查询相关算法
impl<V> KdTree<V> {
    /// 查询落在矩形 `rect` 内（含边界）的所有点
    ///
    /// 节点的边界矩形与查询矩形不相交时，整棵子树都不可能有结果，直接剪掉；
    /// 否则检查节点自身的点，再进入左右两棵子树。结果顺序不作保证。
    ///
    /// # 错误
    /// 矩形边界含 NaN 或 min > max 时返回 `KdTreeError::InvalidArgument`
    ///
    /// # 示例
    /// ```
    /// use kdtree_st::{KdTree, Point, Rectangle};
    ///
    /// let mut tree = KdTree::new();
    /// tree.put(Point::new(0.2, 0.2), ()).unwrap();
    /// tree.put(Point::new(0.8, 0.8), ()).unwrap();
    ///
    /// let found = tree.range(&Rectangle::new(0.0, 0.0, 0.5, 0.5)).unwrap();
    /// assert_eq!(found, vec![Point::new(0.2, 0.2)]);
    /// ```
    pub fn range(&self, rect: &Rectangle) -> Result<Vec<Point>, KdTreeError> {
        KdTreeError::check_rectangle(rect)?;
        let mut results = Vec::new();
        self.range_visit(rect, |node| results.push(node.point));
        Ok(results)
    }

    /// 与 `range` 相同，但返回点和值的引用
    pub fn range_entries(&self, rect: &Rectangle) -> Result<Vec<(&Point, &V)>, KdTreeError> {
        KdTreeError::check_rectangle(rect)?;
        let mut results = Vec::new();
        self.range_visit(rect, |node| results.push((&node.point, &node.value)));
        Ok(results)
    }

    /// 带剪枝的先序遍历，对每个落在矩形内的节点调用 `emit`
    fn range_visit<'a, F>(&'a self, rect: &Rectangle, mut emit: F)
    where
        F: FnMut(&'a Node<V>),
    {
        let mut stack: Vec<&'a Node<V>> = self.root_ref().as_deref().into_iter().collect();
        let mut visited = 0usize;
        let mut pruned = 0usize;
        let mut matched = 0usize;

        while let Some(node) = stack.pop() {
            if !rect.intersects(&node.rectangle) {
                pruned += 1;
                continue;
            }
            visited += 1;
            if rect.contains_point(&node.point) {
                matched += 1;
                emit(node);
            }
            // 先压右子树，保证左子树先被访问
            stack.extend(node.right());
            stack.extend(node.left());
        }

        debug!(visited, pruned, matched, "range query {}", rect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn sample_tree() -> KdTree<&'static str> {
        KdTree::try_from_entries(vec![
            (Point::new(1.0, 0.125), "A"),
            (Point::new(0.125, 0.875), "B"),
            (Point::new(0.75, 0.0), "C"),
            (Point::new(0.0, 0.375), "D"),
            (Point::new(0.375, 1.0), "E"),
            (Point::new(0.25, 0.5), "F"),
            (Point::new(0.0625, 0.1875), "G"),
        ])
        .unwrap()
    }

    fn sorted(mut points: Vec<Point>) -> Vec<Point> {
        points.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
        points
    }

    #[test]
    fn test_range_empty_result() {
        let tree = sample_tree();
        let query = Rectangle::new(0.5, 0.625, 0.875, 0.75);
        assert!(tree.range(&query).unwrap().is_empty());
    }

    #[test]
    fn test_range_boundary_inclusive() {
        let tree = sample_tree();
        // 边界恰好穿过 D 和 F
        let query = Rectangle::new(0.0, 0.375, 0.25, 0.5);
        let found = sorted(tree.range(&query).unwrap());
        assert_eq!(found, vec![Point::new(0.0, 0.375), Point::new(0.25, 0.5)]);
    }

    #[test]
    fn test_range_whole_plane_returns_all() {
        let tree = sample_tree();
        let found = tree.range(&Rectangle::plane()).unwrap();
        assert_eq!(sorted(found), sorted(tree.points()));
    }

    #[test]
    fn test_range_degenerate_rectangle() {
        let tree = sample_tree();
        // 退化成一个点的矩形
        let query = Rectangle::new(0.75, 0.0, 0.75, 0.0);
        assert_eq!(tree.range(&query).unwrap(), vec![Point::new(0.75, 0.0)]);
    }

    #[test]
    fn test_range_entries_values() {
        let tree = sample_tree();
        let query = Rectangle::new(0.7, -1.0, 2.0, 0.2);
        let mut values: Vec<&str> = tree
            .range_entries(&query)
            .unwrap()
            .into_iter()
            .map(|(_, v)| *v)
            .collect();
        values.sort();
        assert_eq!(values, vec!["A", "C"]);
    }

    #[test]
    fn test_range_invalid_rectangle() {
        let tree = sample_tree();
        let bad = Rectangle {
            min: [f64::NAN, 0.0],
            max: [1.0, 1.0],
        };
        assert!(matches!(
            tree.range(&bad),
            Err(KdTreeError::InvalidArgument(_))
        ));
        assert!(tree.range_entries(&bad).is_err());
    }

    #[test]
    fn test_range_on_empty_tree() {
        let tree: KdTree<()> = KdTree::new();
        assert!(tree.range(&Rectangle::plane()).unwrap().is_empty());
    }

    #[test]
    fn test_range_matches_brute_force() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut tree = KdTree::new();
        let mut all = Vec::new();
        for i in 0..1_000 {
            let p = Point::new(rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0));
            if tree.put(p, i).unwrap().is_none() {
                all.push(p);
            }
        }

        for _ in 0..200 {
            let x0: f64 = rng.gen_range(0.0..1.0);
            let y0: f64 = rng.gen_range(0.0..1.0);
            let query = Rectangle::new(
                x0,
                y0,
                x0 + rng.gen_range(0.0..0.3),
                y0 + rng.gen_range(0.0..0.3),
            );
            let expected: Vec<Point> = all
                .iter()
                .copied()
                .filter(|p| query.contains_point(p))
                .collect();
            assert_eq!(sorted(tree.range(&query).unwrap()), sorted(expected));
        }
    }

    #[test]
    fn test_range_independent_of_insertion_order() {
        let points: Vec<Point> = (0..50)
            .map(|i| Point::new((i * 7 % 50) as f64, (i * 13 % 50) as f64))
            .collect();
        let forward = KdTree::try_from_entries(points.iter().map(|p| (*p, ()))).unwrap();
        let backward = KdTree::try_from_entries(points.iter().rev().map(|p| (*p, ()))).unwrap();

        let query = Rectangle::new(10.0, 5.0, 30.0, 40.0);
        assert_eq!(
            sorted(forward.range(&query).unwrap()),
            sorted(backward.range(&query).unwrap())
        );
    }
}
