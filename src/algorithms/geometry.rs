/// 几何计算：凸多边形点包含、线段相交、线段在多边形内的长度
///
/// 信号模型用这些函数计算信标到目标的连线穿过建筑物的长度。
/// 所有多边形都假定为凸多边形（调用方保证，不做运行时校验）。

use crate::algorithms::Point;

/// 边界容差：叉积绝对值小于该值视为在边上
pub const EPSILON: f64 = 1e-9;

/// 线段采样的最少步数
pub const MIN_SAMPLE_STEPS: usize = 20;

/// 线段采样的目标步长（位置单位）
pub const SAMPLE_STEP_LENGTH: f64 = 5.0;

/// (b - a) × (p - a)
fn cross(a: &Point, b: &Point, p: &Point) -> f64 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

/// 判断点是否在凸多边形内
///
/// 点必须位于每条边的同一侧（叉积符号一致）；落在边上（容差 1e-9 内）视为在内部。
/// 顶点少于 3 个时返回 false。非凸多边形的结果未定义。
pub fn point_in_convex_polygon(point: &Point, polygon: &[Point]) -> bool {
    if polygon.len() < 3 {
        return false;
    }

    let mut has_positive = false;
    let mut has_negative = false;
    for (i, a) in polygon.iter().enumerate() {
        let b = &polygon[(i + 1) % polygon.len()];
        let c = cross(a, b, point);
        if c > EPSILON {
            has_positive = true;
        } else if c < -EPSILON {
            has_negative = true;
        }
        if has_positive && has_negative {
            return false;
        }
    }
    true
}

/// 求两条线段 a1-a2 与 b1-b2 的交点
///
/// 平行（行列式绝对值 < 1e-9）或参数超出 [0, 1] 时返回 None。
pub fn segment_intersection(a1: &Point, a2: &Point, b1: &Point, b2: &Point) -> Option<Point> {
    let rx = a2.x - a1.x;
    let ry = a2.y - a1.y;
    let sx = b2.x - b1.x;
    let sy = b2.y - b1.y;

    let det = rx * sy - ry * sx;
    if det.abs() < EPSILON {
        return None;
    }

    let qx = b1.x - a1.x;
    let qy = b1.y - a1.y;
    let t = (qx * sy - qy * sx) / det;
    let u = (qx * ry - qy * rx) / det;

    if !(0.0..=1.0).contains(&t) || !(0.0..=1.0).contains(&u) {
        return None;
    }

    Some(Point::new(a1.x + t * rx, a1.y + t * ry))
}

/// 线段是否与多边形相交（任一端点在内部，或穿过任意一条边）
pub fn segment_intersects_polygon(p1: &Point, p2: &Point, polygon: &[Point]) -> bool {
    if point_in_convex_polygon(p1, polygon) || point_in_convex_polygon(p2, polygon) {
        return true;
    }

    polygon.iter().enumerate().any(|(i, a)| {
        let b = &polygon[(i + 1) % polygon.len()];
        segment_intersection(p1, p2, a, b).is_some()
    })
}

/// 估算线段落在多边形内部的长度，结果为真实距离单位
///
/// 将线段等分为至少 20 段（步长约 5 个位置单位，向上取整），逐段判断：
/// - 两端都在内部：计入整段长度
/// - 只有一端在内部（穿越边界）：计入半段长度
/// - 两端都在外部：不计入
///
/// `scale` 为每个真实单位对应的位置单位数。长度接近 0 的线段直接返回 0。
pub fn segment_length_inside_polygon(p1: &Point, p2: &Point, polygon: &[Point], scale: f64) -> f64 {
    let length = p1.distance_to(p2);
    if length < EPSILON {
        return 0.0;
    }

    let steps = ((length / SAMPLE_STEP_LENGTH).ceil() as usize).max(MIN_SAMPLE_STEPS);
    let step_length = length / steps as f64;

    let mut inside_length = 0.0;
    let mut prev_inside = point_in_convex_polygon(p1, polygon);
    for i in 1..=steps {
        let sample = p1.lerp(p2, i as f64 / steps as f64);
        let inside = point_in_convex_polygon(&sample, polygon);
        match (prev_inside, inside) {
            (true, true) => inside_length += step_length,
            (true, false) | (false, true) => inside_length += step_length * 0.5,
            (false, false) => {}
        }
        prev_inside = inside;
    }

    inside_length / scale
}

/// 多边形是否严格凸（相邻边的转向一致且不共线）
///
/// 用于在构造障碍物时校验输入。
pub fn is_convex_polygon(polygon: &[Point]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }

    let mut sign = 0.0_f64;
    for i in 0..n {
        let c = cross(&polygon[i], &polygon[(i + 1) % n], &polygon[(i + 2) % n]);
        if c.abs() < EPSILON {
            return false;
        }
        if sign == 0.0 {
            sign = c.signum();
        } else if c.signum() != sign {
            return false;
        }
    }
    true
}
