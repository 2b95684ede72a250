use serde::{Deserialize, Serialize};
use std::fmt;

/// 分割轴
///
/// 偶数层按 x 坐标分割，奇数层按 y 坐标分割
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// 给定层级使用的分割轴
    pub fn for_level(level: usize) -> Self {
        if level % 2 == 0 {
            Axis::X
        } else {
            Axis::Y
        }
    }

    /// 坐标数组中的下标
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
        }
    }
}

/// 平面上的点，既用作符号表的键，也用作查询参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// 创建新的点
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// 取指定轴上的坐标
    pub fn coord(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    /// 两点之间欧氏距离的平方
    ///
    /// 所有距离比较都用平方距离，不开方
    pub fn distance_squared_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// 两个坐标都是有限值才算有效的键
    pub fn is_valid(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point::new(x, y)
    }
}
