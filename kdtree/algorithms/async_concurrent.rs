use crate::kdtree::error::KdTreeError;
use crate::kdtree::kdtree::KdTree;
use crate::kdtree::point::Point;
use crate::kdtree::rectangle::Rectangle;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::time::timeout;

/// 默认的加锁超时时间
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// 异步并发错误类型
#[derive(Debug, thiserror::Error)]
pub enum AsyncConcurrentError {
    #[error("Operation timed out after {timeout:?}")]
    Timeout { timeout: Duration },
    #[error(transparent)]
    Tree(#[from] KdTreeError),
}

/// 异步并发安全的2d-tree实现
///
/// 使用 `tokio::sync::RwLock` 协调并发访问，等待锁时不会阻塞 tokio 线程：
/// - 读操作可以并发执行
/// - 写操作需要独占访问
/// - 每次加锁都有超时控制
///
/// # 示例
///
/// ```rust
/// use kdtree_st::{AsyncConcurrentKdTree, Point};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let tree = AsyncConcurrentKdTree::new();
///     tree.put(Point::new(0.5, 0.5), "center").await?;
///
///     let nearest = tree.nearest(&Point::new(0.4, 0.4)).await?;
///     assert_eq!(nearest, Some(Point::new(0.5, 0.5)));
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct AsyncConcurrentKdTree<V> {
    inner: Arc<RwLock<KdTree<V>>>,
    timeout: Duration,
}

impl<V> AsyncConcurrentKdTree<V> {
    /// 创建空树，使用默认超时
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// 创建空树，指定加锁超时
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(KdTree::new())),
            timeout,
        }
    }

    /// 从现有的 KdTree 创建异步并发版本
    pub fn from_tree(tree: KdTree<V>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(tree)),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// 当前的加锁超时
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// 插入或覆盖，返回旧值
    pub async fn put(&self, point: Point, value: V) -> Result<Option<V>, AsyncConcurrentError> {
        let mut tree = self.write_lock().await?;
        Ok(tree.put(point, value)?)
    }

    /// 获取值的拷贝
    pub async fn get(&self, point: &Point) -> Result<Option<V>, AsyncConcurrentError>
    where
        V: Clone,
    {
        let tree = self.read_lock().await?;
        Ok(tree.get(point)?.cloned())
    }

    pub async fn contains(&self, point: &Point) -> Result<bool, AsyncConcurrentError> {
        let tree = self.read_lock().await?;
        Ok(tree.contains(point)?)
    }

    pub async fn points(&self) -> Result<Vec<Point>, AsyncConcurrentError> {
        let tree = self.read_lock().await?;
        Ok(tree.points())
    }

    pub async fn range(&self, rect: &Rectangle) -> Result<Vec<Point>, AsyncConcurrentError> {
        let tree = self.read_lock().await?;
        Ok(tree.range(rect)?)
    }

    pub async fn nearest(&self, point: &Point) -> Result<Option<Point>, AsyncConcurrentError> {
        let tree = self.read_lock().await?;
        Ok(tree.nearest(point)?)
    }

    pub async fn size(&self) -> Result<usize, AsyncConcurrentError> {
        let tree = self.read_lock().await?;
        Ok(tree.size())
    }

    pub async fn is_empty(&self) -> Result<bool, AsyncConcurrentError> {
        let tree = self.read_lock().await?;
        Ok(tree.is_empty())
    }

    async fn read_lock(&self) -> Result<RwLockReadGuard<'_, KdTree<V>>, AsyncConcurrentError> {
        timeout(self.timeout, self.inner.read())
            .await
            .map_err(|_| AsyncConcurrentError::Timeout {
                timeout: self.timeout,
            })
    }

    async fn write_lock(&self) -> Result<RwLockWriteGuard<'_, KdTree<V>>, AsyncConcurrentError> {
        timeout(self.timeout, self.inner.write())
            .await
            .map_err(|_| AsyncConcurrentError::Timeout {
                timeout: self.timeout,
            })
    }
}

impl<V> Clone for AsyncConcurrentKdTree<V> {
    /// 克隆的是同一棵树的共享句柄
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            timeout: self.timeout,
        }
    }
}

impl<V> Default for AsyncConcurrentKdTree<V> {
    fn default() -> Self {
        Self::new()
    }
}
