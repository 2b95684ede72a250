use crate::kdtree::error::KdTreeError;
use crate::kdtree::node::Node;
use crate::kdtree::point::Point;
use std::collections::VecDeque;
use std::fmt;

/// 2d-tree 符号表主结构
///
/// 键是平面上的点，值是任意类型。树独占根节点，节点独占子节点。
/// 不做任何再平衡：按有序序列插入时树会退化成链表，
/// 所以内部所有遍历都使用显式栈或队列，不依赖调用栈深度。
///
/// 树本身没有并发安全保证，多线程访问请使用
/// [`ConcurrentKdTree`](crate::ConcurrentKdTree) 或自行加锁。
pub struct KdTree<V> {
    /// 根节点
    root: Option<Box<Node<V>>>,
    /// 不同键的数量，只在真正创建新节点时加一
    size: usize,
}

impl<V> KdTree<V> {
    /// 创建空树
    pub fn new() -> Self {
        KdTree {
            root: None,
            size: 0,
        }
    }

    /// 按迭代顺序依次插入，遇到第一个无效的点时返回错误
    pub fn try_from_entries<I>(entries: I) -> Result<Self, KdTreeError>
    where
        I: IntoIterator<Item = (Point, V)>,
    {
        let mut tree = KdTree::new();
        for (point, value) in entries {
            tree.put(point, value)?;
        }
        Ok(tree)
    }

    /// 不同键的数量
    pub fn size(&self) -> usize {
        self.size
    }

    /// 检查符号表是否为空
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// 树的高度（最长根到叶路径上的节点数），空树为 0
    pub fn height(&self) -> usize {
        self.iter_nodes()
            .map(|node| node.level + 1)
            .max()
            .unwrap_or(0)
    }

    /// 根节点的只读视图
    pub fn root(&self) -> Option<&Node<V>> {
        self.root.as_deref()
    }

    /// 内部方法：获取根节点的引用
    pub(crate) fn root_ref(&self) -> &Option<Box<Node<V>>> {
        &self.root
    }

    /// 内部方法：获取根节点的可变引用
    pub(crate) fn root_mut(&mut self) -> &mut Option<Box<Node<V>>> {
        &mut self.root
    }

    /// 内部方法：新节点创建后计数
    pub(crate) fn increment_size(&mut self) {
        self.size += 1;
    }

    /// 按广度优先顺序遍历所有 (键, 值)
    ///
    /// 调用方不应依赖具体顺序
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            queue: self.root.as_deref().into_iter().collect(),
        }
    }

    /// 按广度优先顺序遍历所有值
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, value)| value)
    }

    /// 所有键的快照
    ///
    /// 返回的是独立的 `Vec`，可以反复遍历，不借用树
    pub fn points(&self) -> Vec<Point> {
        self.iter().map(|(point, _)| *point).collect()
    }

    /// 广度优先遍历节点
    pub(crate) fn iter_nodes(&self) -> NodeIter<'_, V> {
        NodeIter {
            queue: self.root.as_deref().into_iter().collect(),
        }
    }
}

/// 广度优先的节点迭代器
pub(crate) struct NodeIter<'a, V> {
    queue: VecDeque<&'a Node<V>>,
}

impl<'a, V> Iterator for NodeIter<'a, V> {
    type Item = &'a Node<V>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.queue.pop_front()?;
        self.queue.extend(node.left());
        self.queue.extend(node.right());
        Some(node)
    }
}

/// 广度优先的 (键, 值) 迭代器，由 [`KdTree::iter`] 创建
pub struct Iter<'a, V> {
    queue: VecDeque<&'a Node<V>>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a Point, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.queue.pop_front()?;
        self.queue.extend(node.left());
        self.queue.extend(node.right());
        Some((&node.point, &node.value))
    }
}

impl<V> fmt::Debug for Iter<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter")
            .field("pending", &self.queue.len())
            .finish()
    }
}

impl<'a, V> IntoIterator for &'a KdTree<V> {
    type Item = (&'a Point, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<V> Default for KdTree<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// 按广度优先顺序重新插入，得到形状完全相同的树
///
/// 每个节点都在它的所有祖先之后插入，下降路径只由祖先决定
impl<V: Clone> Clone for KdTree<V> {
    fn clone(&self) -> Self {
        let mut tree = KdTree::new();
        for (point, value) in self.iter() {
            tree.insert_unchecked(*point, value.clone());
        }
        tree
    }
}

impl<V: fmt::Debug> fmt::Debug for KdTree<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// 退化的树可能和元素数量一样深，逐个拆下节点，避免递归析构压爆调用栈
impl<V> Drop for KdTree<V> {
    fn drop(&mut self) {
        let mut stack: Vec<Box<Node<V>>> = self.root.take().into_iter().collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(node.left.take());
            stack.extend(node.right.take());
        }
    }
}
