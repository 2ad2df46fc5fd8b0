/// 信标、坐标点与障碍物定义
///
/// 所有坐标使用同一套"位置单位"（例如屏幕像素），
/// 与真实距离单位之间的换算由 `PropagationModel::scale` 负责。

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::algorithms::geometry;
use crate::error::{Error, Result};

/// 二维坐标点
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X 坐标（位置单位）
    pub x: f64,
    /// Y 坐标（位置单位）
    pub y: f64,
}

impl Point {
    /// 创建坐标点
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// 与另一点的欧几里得距离（位置单位）
    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// 线性插值：t = 0 返回 self，t = 1 返回 other
    pub fn lerp(&self, other: &Point, t: f64) -> Point {
        Point {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }

    /// 转换为元组
    pub fn xy(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point::new(x, y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

static POINT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\(?\s*([-+]?(?:\d+\.?\d*|\.\d+))\s*[,\s]\s*([-+]?(?:\d+\.?\d*|\.\d+))\s*\)?\s*$")
        .expect("坐标正则表达式无效")
});

/// 支持 "5,0"、"(5, 0)"、"5 0" 三种写法
impl FromStr for Point {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let caps = POINT_PATTERN
            .captures(s)
            .ok_or_else(|| Error::PointParse(s.to_string()))?;
        let x = caps[1]
            .parse::<f64>()
            .map_err(|_| Error::PointParse(s.to_string()))?;
        let y = caps[2]
            .parse::<f64>()
            .map_err(|_| Error::PointParse(s.to_string()))?;
        Ok(Point::new(x, y))
    }
}

/// 单个信标定义
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Beacon {
    /// 信标唯一标识符
    pub id: String,
    /// 信标友好名称
    pub name: String,
    /// 信标位置（位置单位）
    pub position: Point,
}

impl Beacon {
    /// 创建新的信标
    pub fn new(id: impl Into<String>, name: impl Into<String>, x: f64, y: f64) -> Self {
        Beacon {
            id: id.into(),
            name: name.into(),
            position: Point::new(x, y),
        }
    }

    /// 仅根据位置创建，名称与 ID 相同
    pub fn at(id: impl Into<String>, position: Point) -> Self {
        let id = id.into();
        Beacon {
            name: id.clone(),
            id,
            position,
        }
    }

    /// 获取信标的 2D 坐标
    pub fn coordinates(&self) -> (f64, f64) {
        self.position.xy()
    }

    /// 计算与另一信标的欧几里得距离
    pub fn distance_to(&self, other: &Beacon) -> f64 {
        self.position.distance_to(&other.position)
    }
}

/// 有序信标集合
///
/// 只能追加，不能删除；顺序即测量向量中各分量的顺序。
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BeaconSet {
    beacons: Vec<Beacon>,
}

impl BeaconSet {
    /// 创建空的信标集合
    pub fn new() -> Self {
        BeaconSet {
            beacons: Vec::new(),
        }
    }

    /// 从信标向量创建集合
    pub fn from_vec(beacons: Vec<Beacon>) -> Self {
        BeaconSet { beacons }
    }

    /// 从坐标序列创建集合，ID 依次为 B1, B2, ...
    pub fn from_points(points: &[Point]) -> Self {
        let beacons = points
            .iter()
            .enumerate()
            .map(|(i, p)| Beacon::at(format!("B{}", i + 1), *p))
            .collect();
        BeaconSet { beacons }
    }

    /// 追加信标
    pub fn add_beacon(&mut self, beacon: Beacon) {
        self.beacons.push(beacon);
    }

    /// 按 ID 获取信标
    pub fn get(&self, id: &str) -> Option<&Beacon> {
        self.beacons.iter().find(|b| b.id == id)
    }

    /// 最后放置的信标
    pub fn last(&self) -> Option<&Beacon> {
        self.beacons.last()
    }

    /// 获取所有信标（保持放置顺序）
    pub fn all(&self) -> &[Beacon] {
        &self.beacons
    }

    /// 所有信标位置（保持放置顺序）
    pub fn positions(&self) -> Vec<Point> {
        self.beacons.iter().map(|b| b.position).collect()
    }

    /// 获取信标数量
    pub fn len(&self) -> usize {
        self.beacons.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.beacons.is_empty()
    }

    /// 按放置顺序迭代
    pub fn iter(&self) -> impl Iterator<Item = &Beacon> {
        self.beacons.iter()
    }
}

/// 障碍物（建筑物）：凸四边形
///
/// 通过 `Obstacle::new` 构造时校验顶点数量和凸性；
/// 几何函数本身不做校验，非凸输入的结果未定义。
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Point>", into = "Vec<Point>")]
pub struct Obstacle {
    vertices: [Point; 4],
}

impl Obstacle {
    /// 校验并创建障碍物
    pub fn new(vertices: &[Point]) -> Result<Self> {
        let vertices: [Point; 4] = vertices
            .try_into()
            .map_err(|_| Error::InvalidObstacle {
                vertices: vertices.len(),
            })?;
        if !geometry::is_convex_polygon(&vertices) {
            return Err(Error::NonConvexObstacle);
        }
        Ok(Obstacle { vertices })
    }

    /// 轴对齐矩形障碍物
    pub fn rectangle(min: Point, max: Point) -> Result<Self> {
        Obstacle::new(&[
            Point::new(min.x, min.y),
            Point::new(max.x, min.y),
            Point::new(max.x, max.y),
            Point::new(min.x, max.y),
        ])
    }

    /// 顶点（按输入顺序）
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }
}

impl TryFrom<Vec<Point>> for Obstacle {
    type Error = Error;

    fn try_from(vertices: Vec<Point>) -> Result<Self> {
        Obstacle::new(&vertices)
    }
}

impl From<Obstacle> for Vec<Point> {
    fn from(obstacle: Obstacle) -> Self {
        obstacle.vertices.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_beacon_creation() {
        let beacon = Beacon::new("B1", "Beacon1", 0.0, 100.0);
        assert_eq!(beacon.id, "B1");
        assert_eq!(beacon.coordinates(), (0.0, 100.0));
    }

    #[test]
    fn test_beacon_distance() {
        let b1 = Beacon::new("B1", "B1", 0.0, 0.0);
        let b2 = Beacon::new("B2", "B2", 3.0, 4.0);
        assert_eq!(b1.distance_to(&b2), 5.0);
    }

    #[test]
    fn test_beacon_set_keeps_order() {
        let set = BeaconSet::from_points(&[Point::new(5.0, 5.0), Point::new(1.0, 1.0)]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.all()[0].id, "B1");
        assert_eq!(set.last().map(|b| b.position), Some(Point::new(1.0, 1.0)));
        assert!(set.get("B2").is_some());
    }

    #[test]
    fn test_point_parse() {
        assert_eq!("5,0".parse::<Point>().unwrap(), Point::new(5.0, 0.0));
        assert_eq!("(2.5, -3)".parse::<Point>().unwrap(), Point::new(2.5, -3.0));
        assert_eq!(" 7 8 ".parse::<Point>().unwrap(), Point::new(7.0, 8.0));
        assert!("abc".parse::<Point>().is_err());
        assert!("1,2,3".parse::<Point>().is_err());
    }

    #[test]
    fn test_obstacle_validation() {
        let square = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ];
        assert!(Obstacle::new(&square).is_ok());
        assert!(matches!(
            Obstacle::new(&square[..3]),
            Err(Error::InvalidObstacle { vertices: 3 })
        ));

        // 顶点顺序交叉，形成"蝴蝶结"
        let bowtie = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, 1.0),
        ];
        assert!(matches!(Obstacle::new(&bowtie), Err(Error::NonConvexObstacle)));
    }

    #[test]
    fn test_obstacle_serde() {
        let obstacle = Obstacle::rectangle(Point::new(0.0, 0.0), Point::new(2.0, 1.0)).unwrap();
        let json = serde_json::to_string(&obstacle).unwrap();
        let back: Obstacle = serde_json::from_str(&json).unwrap();
        assert_eq!(back, obstacle);

        let bad: std::result::Result<Obstacle, _> =
            serde_json::from_str(r#"[{"x":0,"y":0},{"x":1,"y":0}]"#);
        assert!(bad.is_err());
    }
}
