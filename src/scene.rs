/// 场景状态：信标放置阶段与冻结后的只读快照
///
/// 放置阶段由 `SceneBuilder` 负责（信标只能追加、障碍物在此校验）；
/// `build` 之后得到不可变的 `Scene`，所有定位计算都以它为输入。

use serde::Serialize;
use tracing::{debug, info};

use crate::algorithms::{
    Area, Beacon, BeaconSet, CoverageMap, GridSpec, Localization, LocationAlgorithm, Obstacle,
    Point, PropagationModel, DEFAULT_GRID_HEIGHT, DEFAULT_GRID_WIDTH, DEFAULT_NOMINAL_RANGE,
    DEFAULT_SIGMA,
};
use crate::error::{Error, Result};

/// 场景中信标数量上限
pub const MAX_BEACONS: usize = 6;

/// 通过拖拽设置标称距离时的最小值（真实单位）
pub const MIN_NOMINAL_RANGE: f64 = 1.0;

/// 场景构建器（放置阶段）
#[derive(Clone, Debug)]
pub struct SceneBuilder {
    area: Area,
    model: PropagationModel,
    beacons: BeaconSet,
    obstacles: Vec<Obstacle>,
    columns: usize,
    rows: usize,
    sigma: f64,
}

impl SceneBuilder {
    /// 创建空场景
    ///
    /// # 参数
    /// - `area`: 定位区域（位置单位）
    /// - `scale`: 每个真实单位对应的位置单位数
    pub fn new(area: Area, scale: f64) -> Self {
        SceneBuilder {
            area,
            model: PropagationModel::new(DEFAULT_NOMINAL_RANGE, scale),
            beacons: BeaconSet::new(),
            obstacles: Vec::new(),
            columns: DEFAULT_GRID_WIDTH,
            rows: DEFAULT_GRID_HEIGHT,
            sigma: DEFAULT_SIGMA,
        }
    }

    /// 在指定位置放置信标，ID 按顺序为 B1, B2, ...
    pub fn add_beacon(&mut self, position: Point) -> Result<&Beacon> {
        let id = format!("B{}", self.beacons.len() + 1);
        self.add_named_beacon(Beacon::at(id, position))
    }

    /// 放置自定义信标
    pub fn add_named_beacon(&mut self, beacon: Beacon) -> Result<&Beacon> {
        if self.beacons.len() >= MAX_BEACONS {
            return Err(Error::TooManyBeacons { max: MAX_BEACONS });
        }
        debug!(id = %beacon.id, x = beacon.position.x, y = beacon.position.y, "放置信标");
        self.beacons.add_beacon(beacon);
        self.beacons.last().ok_or(Error::NoBeacons)
    }

    /// 添加障碍物（校验 4 个顶点且为凸四边形）
    pub fn add_obstacle(&mut self, vertices: &[Point]) -> Result<()> {
        let obstacle = Obstacle::new(vertices)?;
        debug!(index = self.obstacles.len(), "添加障碍物");
        self.obstacles.push(obstacle);
        Ok(())
    }

    /// 设置标称距离（真实单位）
    pub fn set_nominal_range(&mut self, range: f64) -> Result<()> {
        if !(range.is_finite() && range > 0.0) {
            return Err(Error::InvalidRange(range));
        }
        self.model.nominal_range = range;
        Ok(())
    }

    /// 以最后一个信标到 `point` 的距离设置标称距离，最小为 1.0
    ///
    /// 返回新的标称距离；尚未放置信标时不做修改并返回 None。
    pub fn set_range_from_last_beacon(&mut self, point: Point) -> Option<f64> {
        let last = self.beacons.last()?;
        let range = self
            .model
            .to_real_units(last.position.distance_to(&point))
            .max(MIN_NOMINAL_RANGE);
        self.model.nominal_range = range;
        debug!(range, "根据最后一个信标设置标称距离");
        Some(range)
    }

    /// 设置网格分辨率
    pub fn set_grid(&mut self, columns: usize, rows: usize) {
        self.columns = columns;
        self.rows = rows;
    }

    /// 设置高斯核 sigma
    pub fn set_sigma(&mut self, sigma: f64) {
        self.sigma = sigma;
    }

    /// 设置遮挡与滚降系数
    pub fn set_propagation(&mut self, attenuation: f64, rolloff: f64) {
        self.model.attenuation = attenuation;
        self.model.rolloff = rolloff;
    }

    /// 已放置的信标
    pub fn beacons(&self) -> &BeaconSet {
        &self.beacons
    }

    /// 当前标称距离
    pub fn nominal_range(&self) -> f64 {
        self.model.nominal_range
    }

    /// 冻结场景
    pub fn build(self) -> Result<Scene> {
        if self.beacons.is_empty() {
            return Err(Error::NoBeacons);
        }
        self.model.validate()?;
        if !(self.sigma.is_finite() && self.sigma > 0.0) {
            return Err(Error::InvalidSigma(self.sigma));
        }
        let grid = GridSpec::new(self.area, self.columns, self.rows)?;

        info!(
            beacons = self.beacons.len(),
            obstacles = self.obstacles.len(),
            range = self.model.nominal_range,
            columns = grid.columns,
            rows = grid.rows,
            "场景已冻结"
        );

        Ok(Scene {
            beacons: self.beacons,
            obstacles: self.obstacles,
            model: self.model,
            grid,
            sigma: self.sigma,
        })
    }
}

/// 一次目标检测的结果：模拟测量 + 似然定位 + 加权质心
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Detection {
    /// 真实目标位置
    pub target: Point,
    /// 在目标处合成的测量向量
    pub strengths: Vec<f64>,
    /// 网格似然定位结果
    pub localization: Localization,
    /// 强度加权质心
    pub centroid: Option<Point>,
}

impl Detection {
    /// 估计误差（真实单位）
    pub fn error(&self, scale: f64) -> Option<f64> {
        self.localization.error_to(&self.target, scale)
    }
}

/// 冻结后的场景快照
#[derive(Clone, Debug)]
pub struct Scene {
    beacons: BeaconSet,
    obstacles: Vec<Obstacle>,
    model: PropagationModel,
    grid: GridSpec,
    sigma: f64,
}

impl Scene {
    pub fn beacons(&self) -> &[Beacon] {
        self.beacons.all()
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn model(&self) -> &PropagationModel {
        &self.model
    }

    pub fn grid(&self) -> &GridSpec {
        &self.grid
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// 在指定位置合成测量向量
    pub fn measure_at(&self, target: &Point) -> Vec<f64> {
        self.model
            .expected_strength_vector(self.beacons.all(), target, &self.obstacles)
    }

    /// 对测量向量做网格似然定位
    pub fn localize(&self, measured: &[f64]) -> Localization {
        LocationAlgorithm::localize(
            self.beacons.all(),
            measured,
            &self.model,
            &self.obstacles,
            &self.grid,
            self.sigma,
        )
    }

    /// 在目标位置合成测量并定位
    pub fn detect(&self, target: Point) -> Detection {
        let strengths = self.measure_at(&target);
        let localization = self.localize(&strengths);
        let centroid = LocationAlgorithm::weighted_centroid(self.beacons.all(), &strengths);
        Detection {
            target,
            strengths,
            localization,
            centroid,
        }
    }

    /// 信号覆盖图
    pub fn coverage(&self) -> CoverageMap {
        LocationAlgorithm::signal_coverage(self.beacons.all(), &self.model, &self.obstacles, &self.grid)
    }
}
