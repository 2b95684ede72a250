use crate::kdtree::kdtree::KdTree;
use crate::kdtree::node::{Node, Side};
use crate::kdtree::rectangle::Rectangle;
use std::collections::HashSet;
use std::fmt::{Debug, Write};

/// 2d-tree调试功能实现
impl<V: Debug> KdTree<V> {
    /// 生成完整的树结构文本用于调试
    ///
    /// 先序遍历每个节点，输出层级、分割轴、键、值和边界矩形，
    /// 子节点缩进一级并标注是左 (L) 还是右 (R)
    pub fn structure_string(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "=== 2d-tree Structure (size={}) ===", self.size());

        let Some(root) = self.root_ref().as_deref() else {
            let _ = writeln!(out, "Empty tree (no root)");
            let _ = writeln!(out, "=== End Debug ===");
            return out;
        };

        let mut stack: Vec<(&Node<V>, &str)> = vec![(root, "*")];
        while let Some((node, tag)) = stack.pop() {
            let indent = "  ".repeat(node.level);
            let _ = writeln!(
                out,
                "{}{} level={} axis={:?} point={} value={:?} rect={}",
                indent,
                tag,
                node.level,
                node.axis(),
                node.point,
                node.value,
                node.rectangle
            );
            stack.extend(node.right().map(|child| (child, "R")));
            stack.extend(node.left().map(|child| (child, "L")));
        }

        let _ = writeln!(out, "=== End Debug ===");
        out
    }
}

impl<V> KdTree<V> {
    /// 校验树的结构不变量
    ///
    /// - 键互不相同，节点数等于 size
    /// - 根节点层级为 0、矩形为整个平面；子节点层级加一、矩形为父矩形沿分割线切开的一半
    /// - 每个点都落在自己的矩形内：`min <= p < max`，
    ///   左子树的 max 来自祖先分割线，因此左侧严格小于、右侧大于等于
    pub fn check_invariants(&self) -> Result<(), String> {
        let Some(root) = self.root_ref().as_deref() else {
            return if self.size() == 0 {
                Ok(())
            } else {
                Err(format!("empty tree reports size {}", self.size()))
            };
        };

        let mut seen = HashSet::new();
        let mut count = 0usize;
        let mut stack: Vec<(&Node<V>, usize, Rectangle)> = vec![(root, 0, Rectangle::plane())];

        while let Some((node, level, rect)) = stack.pop() {
            count += 1;
            if node.level != level {
                return Err(format!(
                    "node {} has level {}, expected {}",
                    node.point, node.level, level
                ));
            }
            if node.rectangle != rect {
                return Err(format!(
                    "node {} has rectangle {}, expected {}",
                    node.point, node.rectangle, rect
                ));
            }
            for axis in 0..2 {
                let v = if axis == 0 { node.point.x } else { node.point.y };
                if !(rect.min[axis] <= v && v < rect.max[axis]) {
                    return Err(format!(
                        "node {} lies outside its region {}",
                        node.point, rect
                    ));
                }
            }
            // +0.0 把 -0.0 归一成 0.0，与 Point 的相等语义一致
            let key = ((node.point.x + 0.0).to_bits(), (node.point.y + 0.0).to_bits());
            if !seen.insert(key) {
                return Err(format!("duplicate key {}", node.point));
            }

            for side in [Side::Left, Side::Right] {
                if let Some(child) = node.child(side) {
                    stack.push((child, level + 1, node.child_rectangle(side)));
                }
            }
        }

        if count != self.size() {
            return Err(format!(
                "tree holds {} nodes but reports size {}",
                count,
                self.size()
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kdtree::point::Point;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_debug_functions() {
        let mut tree: KdTree<&str> = KdTree::new();

        // 测试空树的调试输出
        let empty = tree.structure_string();
        assert!(empty.contains("Empty tree"));

        tree.put(Point::new(0.5, 0.5), "root").unwrap();
        tree.put(Point::new(0.25, 0.75), "left").unwrap();
        tree.put(Point::new(0.75, 0.25), "right").unwrap();

        let text = tree.structure_string();
        assert!(text.contains("size=3"));
        assert!(text.contains("* level=0 axis=X point=(0.5, 0.5)"));
        assert!(text.contains("  L level=1 axis=Y point=(0.25, 0.75) value=\"left\""));
        assert!(text.contains("  R level=1 axis=Y point=(0.75, 0.25)"));
        // 左子树先输出
        assert!(text.find("\"left\"").unwrap() < text.find("\"right\"").unwrap());
    }

    #[test]
    fn test_check_invariants_empty() {
        let tree: KdTree<()> = KdTree::new();
        assert!(tree.check_invariants().is_ok());
    }

    #[test]
    fn test_check_invariants_random() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut tree = KdTree::new();
        for i in 0..3_000 {
            let p = Point::new(
                rng.gen_range(0u32..100) as f64,
                rng.gen_range(0u32..100) as f64,
            );
            tree.put(p, i).unwrap();
            if i % 500 == 0 {
                assert_eq!(tree.check_invariants(), Ok(()));
            }
        }
        assert_eq!(tree.check_invariants(), Ok(()));
    }

    #[test]
    fn test_check_invariants_detects_corruption() {
        let mut tree = KdTree::new();
        tree.put(Point::new(0.5, 0.5), 0).unwrap();
        tree.put(Point::new(0.25, 0.5), 1).unwrap();

        // 手动把左子节点改到分割线右侧
        if let Some(root) = tree.root_mut().as_mut() {
            if let Some(left) = root.left.as_mut() {
                left.point = Point::new(0.75, 0.5);
            }
        }
        let err = tree.check_invariants().unwrap_err();
        assert!(err.contains("outside its region"));
    }
}
