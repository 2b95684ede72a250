// 2d-tree算法模块
//
// 每个子模块为 KdTree 增加一组操作：
// - insert: 插入与覆盖
// - search: 点查找
// - range: 矩形范围查询
// - nearest: 最近邻查询
// - debug: 调试输出与不变量校验
// - persistence: 快照序列化与文件读写
// - concurrent: 并发安全的包装（使用 std::sync）
// - async_concurrent: 异步并发安全的包装（使用 tokio::sync）

pub mod async_concurrent;
pub mod concurrent;
pub mod debug;
pub mod insert;
pub mod nearest;
pub mod persistence;
pub mod range;
pub mod search;
