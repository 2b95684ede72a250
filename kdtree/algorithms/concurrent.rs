use crate::kdtree::error::KdTreeError;
use crate::kdtree::kdtree::KdTree;
use crate::kdtree::point::Point;
use crate::kdtree::rectangle::Rectangle;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// 并发错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConcurrentError {
    #[error("Lock was poisoned by a panicked thread")]
    LockPoisoned,
    #[error(transparent)]
    Tree(#[from] KdTreeError),
}

/// 并发安全的2d-tree实现
///
/// 包装标准的 `KdTree`，每个操作在整个执行期间持有读写锁：
/// - 读操作（get, contains, points, range, nearest）可以并发执行
/// - 写操作（put）需要独占访问
///
/// 查询结果都是拷贝，不会把树内部的引用带出锁外。
///
/// # 示例
///
/// ```
/// use kdtree_st::{ConcurrentKdTree, Point};
/// use std::thread;
///
/// let tree = ConcurrentKdTree::new();
///
/// let handles: Vec<_> = (0..4).map(|i| {
///     let tree_clone = tree.clone(); // 通过clone共享同一棵树
///     thread::spawn(move || {
///         tree_clone.put(Point::new(i as f64, 0.0), i).unwrap();
///     })
/// }).collect();
///
/// for handle in handles {
///     handle.join().unwrap();
/// }
///
/// assert_eq!(tree.size().unwrap(), 4);
/// ```
#[derive(Debug)]
pub struct ConcurrentKdTree<V> {
    inner: Arc<RwLock<KdTree<V>>>,
}

impl<V> ConcurrentKdTree<V> {
    /// 创建空的并发2d-tree
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(KdTree::new())),
        }
    }

    /// 从现有的 KdTree 创建并发版本
    pub fn from_tree(tree: KdTree<V>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(tree)),
        }
    }

    /// 插入或覆盖，返回旧值
    ///
    /// # 错误
    /// - 锁被毒化时返回 `ConcurrentError::LockPoisoned`
    /// - 点无效时返回 `ConcurrentError::Tree`
    pub fn put(&self, point: Point, value: V) -> Result<Option<V>, ConcurrentError> {
        let mut tree = self.write_lock()?;
        Ok(tree.put(point, value)?)
    }

    /// 获取值的拷贝
    pub fn get(&self, point: &Point) -> Result<Option<V>, ConcurrentError>
    where
        V: Clone,
    {
        let tree = self.read_lock()?;
        Ok(tree.get(point)?.cloned())
    }

    pub fn contains(&self, point: &Point) -> Result<bool, ConcurrentError> {
        let tree = self.read_lock()?;
        Ok(tree.contains(point)?)
    }

    pub fn points(&self) -> Result<Vec<Point>, ConcurrentError> {
        let tree = self.read_lock()?;
        Ok(tree.points())
    }

    pub fn range(&self, rect: &Rectangle) -> Result<Vec<Point>, ConcurrentError> {
        let tree = self.read_lock()?;
        Ok(tree.range(rect)?)
    }

    pub fn nearest(&self, point: &Point) -> Result<Option<Point>, ConcurrentError> {
        let tree = self.read_lock()?;
        Ok(tree.nearest(point)?)
    }

    pub fn size(&self) -> Result<usize, ConcurrentError> {
        let tree = self.read_lock()?;
        Ok(tree.size())
    }

    pub fn is_empty(&self) -> Result<bool, ConcurrentError> {
        let tree = self.read_lock()?;
        Ok(tree.is_empty())
    }

    /// 在读锁下执行任意只读操作
    ///
    /// 闭包返回后才释放锁，适合需要一致快照的组合查询
    pub fn with_read<F, R>(&self, f: F) -> Result<R, ConcurrentError>
    where
        F: FnOnce(&KdTree<V>) -> R,
    {
        let tree = self.read_lock()?;
        Ok(f(&tree))
    }

    fn read_lock(&self) -> Result<RwLockReadGuard<'_, KdTree<V>>, ConcurrentError> {
        self.inner.read().map_err(|_| ConcurrentError::LockPoisoned)
    }

    fn write_lock(&self) -> Result<RwLockWriteGuard<'_, KdTree<V>>, ConcurrentError> {
        self.inner.write().map_err(|_| ConcurrentError::LockPoisoned)
    }
}

impl<V> Clone for ConcurrentKdTree<V> {
    /// 克隆的是同一棵树的共享句柄
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V> Default for ConcurrentKdTree<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> From<KdTree<V>> for ConcurrentKdTree<V> {
    fn from(tree: KdTree<V>) -> Self {
        Self::from_tree(tree)
    }
}
