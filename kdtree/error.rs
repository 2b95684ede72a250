use crate::kdtree::point::Point;
use crate::kdtree::rectangle::Rectangle;

/// 2d-tree 操作错误类型
///
/// 只有一种错误：参数无效。它总是在访问或修改树之前同步返回，
/// 被拒绝的调用不会改变树的任何状态。
/// 查不到键、空树上求最近邻等属于正常结果，用 `None` 表示而不是错误。
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KdTreeError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl KdTreeError {
    /// 校验查询点或键：坐标必须是有限值
    pub(crate) fn check_point(point: &Point) -> Result<(), KdTreeError> {
        if point.is_valid() {
            Ok(())
        } else {
            Err(KdTreeError::InvalidArgument(format!(
                "point ({}, {}) must have finite coordinates",
                point.x, point.y
            )))
        }
    }

    /// 校验查询矩形：边界不能是 NaN，且 min <= max
    pub(crate) fn check_rectangle(rect: &Rectangle) -> Result<(), KdTreeError> {
        if rect.is_valid() {
            Ok(())
        } else {
            Err(KdTreeError::InvalidArgument(format!(
                "rectangle [{}, {}] x [{}, {}] has invalid bounds",
                rect.min[0], rect.max[0], rect.min[1], rect.max[1]
            )))
        }
    }
}
