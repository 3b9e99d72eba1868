//! 关节角度计算
//!
//! 以 p2 为顶点，计算射线 p2→p1 与 p2→p3 在图像平面 (x, y) 上的夹角，z 不参与。
//! 结果取内角约定 (0-180°)，四舍五入到整数度。

use crate::landmark::Landmark;

/// 三点关节角（度）
///
/// 顶点与任一端点重合时 `atan2(0, 0)` 的结果没有几何意义，但不会 panic。
pub fn joint_angle(p1: &Landmark, vertex: &Landmark, p3: &Landmark) -> i32 {
    let radians = (p3.y - vertex.y).atan2(p3.x - vertex.x)
        - (p1.y - vertex.y).atan2(p1.x - vertex.x);
    let mut degrees = radians.to_degrees().abs();
    if degrees > 180.0 {
        degrees = 360.0 - degrees;
    }
    degrees.round() as i32
}
