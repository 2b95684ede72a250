use crate::kdtree::point::{Axis, Point};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 轴对齐矩形
///
/// 既用作范围查询的参数，也用作节点的边界矩形：
/// 节点的边界矩形是该子树中所有点唯一可能出现的区域
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub min: [f64; 2], // [x_min, y_min]
    pub max: [f64; 2], // [x_max, y_max]
}

impl Rectangle {
    /// 创建新的矩形
    ///
    /// 边界允许是无穷大，但不能是 NaN，且 min <= max
    pub fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
        assert!(x_min <= x_max && y_min <= y_max, "Invalid rectangle bounds");
        Rectangle {
            min: [x_min, y_min],
            max: [x_max, y_max],
        }
    }

    /// 覆盖整个平面的矩形（四条边都是无穷远），根节点使用
    pub const fn plane() -> Self {
        Rectangle {
            min: [f64::NEG_INFINITY, f64::NEG_INFINITY],
            max: [f64::INFINITY, f64::INFINITY],
        }
    }

    pub fn x_min(&self) -> f64 {
        self.min[0]
    }

    pub fn y_min(&self) -> f64 {
        self.min[1]
    }

    pub fn x_max(&self) -> f64 {
        self.max[0]
    }

    pub fn y_max(&self) -> f64 {
        self.max[1]
    }

    /// 边界没有 NaN 且 min <= max
    ///
    /// 字段是公开的，绕过 `new` 构造的矩形需要在查询入口处再检查一次
    pub fn is_valid(&self) -> bool {
        // NaN 参与的比较都为 false，所以这里同时排除了 NaN
        self.min[0] <= self.max[0] && self.min[1] <= self.max[1]
    }

    /// 判断两个矩形是否相交，边界相接也算相交
    pub fn intersects(&self, other: &Rectangle) -> bool {
        self.min[0] <= other.max[0]
            && self.max[0] >= other.min[0]
            && self.min[1] <= other.max[1]
            && self.max[1] >= other.min[1]
    }

    /// 判断当前矩形是否包含一个点（包含边界）
    pub fn contains_point(&self, point: &Point) -> bool {
        self.min[0] <= point.x
            && point.x <= self.max[0]
            && self.min[1] <= point.y
            && point.y <= self.max[1]
    }

    /// 矩形到点的欧氏距离平方，点在矩形内或边界上时为 0
    pub fn distance_squared_to(&self, point: &Point) -> f64 {
        let dx = axis_gap(self.min[0], self.max[0], point.x);
        let dy = axis_gap(self.min[1], self.max[1], point.y);
        dx * dx + dy * dy
    }

    /// 沿分割线 `axis = value` 切下的小于一侧（左子树区域）
    pub fn below(&self, axis: Axis, value: f64) -> Rectangle {
        let mut rect = *self;
        rect.max[axis.index()] = value;
        rect
    }

    /// 沿分割线 `axis = value` 切下的大于等于一侧（右子树区域）
    pub fn above(&self, axis: Axis, value: f64) -> Rectangle {
        let mut rect = *self;
        rect.min[axis.index()] = value;
        rect
    }
}

/// 一维上点到区间 [lo, hi] 的距离，在区间内为 0
///
/// 无穷边界下 `lo - v` / `v - hi` 为负无穷，不会产生 NaN
fn axis_gap(lo: f64, hi: f64, v: f64) -> f64 {
    if v < lo {
        lo - v
    } else if v > hi {
        v - hi
    } else {
        0.0
    }
}

impl Default for Rectangle {
    fn default() -> Self {
        Rectangle::plane()
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}] x [{}, {}]",
            self.min[0], self.max[0], self.min[1], self.max[1]
        )
    }
}
