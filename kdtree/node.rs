use crate::kdtree::point::{Axis, Point};
use crate::kdtree::rectangle::Rectangle;
use std::fmt;

/// 子树方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    /// 分割轴上坐标严格小于节点的点
    Left,
    /// 分割轴上坐标大于等于节点的点（相等时走右边）
    Right,
}

impl Side {
    pub(crate) fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// 2d-tree 节点
///
/// 节点只在某个新点第一次插入时创建一次，之后不会单独销毁；
/// 除了 `value` 可以原地覆盖，其余字段创建后不再改变。
/// 每个节点独占自己的左右子树，不存在共享和环。
pub struct Node<V> {
    /// 键
    pub(crate) point: Point,

    /// 键对应的值，重复插入时原地替换
    pub(crate) value: V,

    /// 子树的边界矩形
    ///
    /// 根节点是整个平面；其他节点是父节点矩形沿父节点分割线切下的一半
    pub(crate) rectangle: Rectangle,

    /// 节点深度，根节点为 0；偶数层按 x 分割，奇数层按 y 分割
    pub(crate) level: usize,

    pub(crate) left: Option<Box<Node<V>>>,
    pub(crate) right: Option<Box<Node<V>>>,
}

impl<V> Node<V> {
    /// 创建没有子节点的新节点
    pub(crate) fn new(point: Point, value: V, rectangle: Rectangle, level: usize) -> Self {
        Node {
            point,
            value,
            rectangle,
            level,
            left: None,
            right: None,
        }
    }

    /// 创建根节点：层级 0，边界矩形为整个平面
    pub(crate) fn new_root(point: Point, value: V) -> Self {
        Node::new(point, value, Rectangle::plane(), 0)
    }

    pub fn point(&self) -> &Point {
        &self.point
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn rectangle(&self) -> &Rectangle {
        &self.rectangle
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn left(&self) -> Option<&Node<V>> {
        self.left.as_deref()
    }

    pub fn right(&self) -> Option<&Node<V>> {
        self.right.as_deref()
    }

    /// 节点的分割轴
    pub fn axis(&self) -> Axis {
        Axis::for_level(self.level)
    }

    /// 检查是否为叶子节点
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// 给定点在本节点分割线的哪一侧
    ///
    /// 分割轴上严格小于走左边，否则走右边
    pub(crate) fn side_of(&self, point: &Point) -> Side {
        let axis = self.axis();
        if point.coord(axis) < self.point.coord(axis) {
            Side::Left
        } else {
            Side::Right
        }
    }

    pub(crate) fn child(&self, side: Side) -> Option<&Node<V>> {
        match side {
            Side::Left => self.left.as_deref(),
            Side::Right => self.right.as_deref(),
        }
    }

    pub(crate) fn child_slot_mut(&mut self, side: Side) -> &mut Option<Box<Node<V>>> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// 子节点的边界矩形：沿本节点分割线切开本节点的矩形
    ///
    /// 进入左边时收紧分割轴上的 max，进入右边时收紧 min
    pub(crate) fn child_rectangle(&self, side: Side) -> Rectangle {
        let axis = self.axis();
        let split = self.point.coord(axis);
        match side {
            Side::Left => self.rectangle.below(axis, split),
            Side::Right => self.rectangle.above(axis, split),
        }
    }
}

/// 只输出节点自身的字段，子节点只标明是否存在，不向下展开
impl<V: fmt::Debug> fmt::Debug for Node<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("point", &self.point)
            .field("value", &self.value)
            .field("rectangle", &self.rectangle)
            .field("level", &self.level)
            .field("has_left", &self.left.is_some())
            .field("has_right", &self.right.is_some())
            .finish()
    }
}
