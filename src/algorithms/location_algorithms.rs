/// 定位算法实现
///
/// 支持：
/// - 网格似然定位（主算法）：对每个单元格中心计算期望强度向量，
///   以高斯核对测量向量打分，取最大似然单元格
/// - 信号覆盖图：每个单元格的强度总和
/// - 强度加权质心（粗略估计）

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::algorithms::{
    Beacon, CoverageMap, Localization, Obstacle, Point, PropagationModel, ScalarGrid,
};
use crate::error::{Error, Result};

/// 默认网格列数
pub const DEFAULT_GRID_WIDTH: usize = 40;

/// 默认网格行数
pub const DEFAULT_GRID_HEIGHT: usize = 30;

/// 默认高斯核 sigma
pub const DEFAULT_SIGMA: f64 = 0.1;

// ============================================================================
// 区域与网格划分
// ============================================================================

/// 矩形定位区域（位置单位）
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Area {
    /// 左上角 X
    pub x: f64,
    /// 左上角 Y
    pub y: f64,
    /// 宽度
    pub width: f64,
    /// 高度
    pub height: f64,
}

impl Area {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Area {
            x,
            y,
            width,
            height,
        }
    }

    /// 从原点开始的区域
    pub fn sized(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// 点是否在区域内（含边界）
    pub fn contains(&self, p: &Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }
}

impl Default for Area {
    fn default() -> Self {
        Area::sized(800.0, 600.0)
    }
}

/// 网格划分：区域被等分为 columns × rows 个矩形单元格
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridSpec {
    pub area: Area,
    pub columns: usize,
    pub rows: usize,
}

impl GridSpec {
    /// 校验并创建网格划分
    pub fn new(area: Area, columns: usize, rows: usize) -> Result<Self> {
        if columns == 0 || rows == 0 {
            return Err(Error::InvalidGrid {
                width: columns,
                height: rows,
            });
        }
        if !(area.width.is_finite() && area.width > 0.0 && area.height.is_finite() && area.height > 0.0)
        {
            return Err(Error::InvalidArea {
                width: area.width,
                height: area.height,
            });
        }
        Ok(GridSpec {
            area,
            columns,
            rows,
        })
    }

    /// 默认 40 × 30 网格
    pub fn with_default_resolution(area: Area) -> Result<Self> {
        Self::new(area, DEFAULT_GRID_WIDTH, DEFAULT_GRID_HEIGHT)
    }

    /// 单元格宽度
    pub fn cell_width(&self) -> f64 {
        self.area.width / self.columns as f64
    }

    /// 单元格高度
    pub fn cell_height(&self) -> f64 {
        self.area.height / self.rows as f64
    }

    /// 单元格 (gx, gy) 的中心点
    pub fn cell_center(&self, gx: usize, gy: usize) -> Point {
        Point::new(
            self.area.x + (gx as f64 + 0.5) * self.cell_width(),
            self.area.y + (gy as f64 + 0.5) * self.cell_height(),
        )
    }

    /// 单元格总数
    pub fn cell_count(&self) -> usize {
        self.columns * self.rows
    }

    /// 按扫描顺序（行优先，从上到下，从左到右）迭代单元格
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, Point)> + '_ {
        (0..self.rows)
            .flat_map(move |gy| (0..self.columns).map(move |gx| (gx, gy, self.cell_center(gx, gy))))
    }
}

// ============================================================================
// 测量向量
// ============================================================================

/// 一次测量：按信标顺序排列的强度向量，每个分量在 [0, 1]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    strengths: Vec<f64>,
}

impl Measurement {
    pub fn new(strengths: Vec<f64>) -> Self {
        Measurement { strengths }
    }

    /// 从按信标 ID 索引的读数创建，缺失的信标记为 0
    pub fn from_readings(beacons: &[Beacon], readings: &HashMap<String, f64>) -> Self {
        let strengths = beacons
            .iter()
            .map(|b| readings.get(&b.id).copied().unwrap_or(0.0))
            .collect();
        Measurement { strengths }
    }

    /// 强度向量
    pub fn strengths(&self) -> &[f64] {
        &self.strengths
    }

    /// 是否包含可用于定位的信息（非空且总和不为 0）
    pub fn is_informative(&self) -> bool {
        has_information(&self.strengths)
    }
}

fn has_information(measured: &[f64]) -> bool {
    !measured.is_empty() && measured.iter().sum::<f64>() != 0.0
}

// ============================================================================
// 定位算法集合
// ============================================================================

/// 定位算法集合
///
/// 所有方法都是纯函数：不保存状态，输入相同则输出逐位相同。
pub struct LocationAlgorithm;

impl LocationAlgorithm {
    /// 网格似然定位
    ///
    /// 对每个单元格中心计算期望强度向量，与测量向量求误差平方和 SSE，
    /// 似然为 `exp(-SSE / (2·sigma²))`。最大似然并列时取扫描顺序中第一个。
    ///
    /// # 参数
    /// - `beacons`: 信标（顺序与测量向量一致）
    /// - `measured`: 测量强度向量
    /// - `model`: 传播模型
    /// - `obstacles`: 障碍物
    /// - `grid`: 网格划分
    /// - `sigma`: 高斯核宽度，必须为正
    ///
    /// # 返回
    /// - 测量为空或总和为 0 时返回 `Localization::no_information()`
    pub fn localize(
        beacons: &[Beacon],
        measured: &[f64],
        model: &PropagationModel,
        obstacles: &[Obstacle],
        grid: &GridSpec,
        sigma: f64,
    ) -> Localization {
        if !has_information(measured) {
            debug!(len = measured.len(), "测量向量无信息，跳过定位");
            return Localization::no_information();
        }
        if measured.len() != beacons.len() {
            warn!(
                measured = measured.len(),
                beacons = beacons.len(),
                "测量向量长度与信标数量不一致，仅使用重叠部分"
            );
        }

        let two_sigma_sq = 2.0 * sigma * sigma;
        let mut values = Vec::with_capacity(grid.cell_count());
        let mut max_likelihood = 0.0;
        let mut best: Option<(usize, usize, Point)> = None;

        for (gx, gy, center) in grid.cells() {
            let expected = model.expected_strength_vector(beacons, &center, obstacles);
            let sse: f64 = measured
                .iter()
                .zip(&expected)
                .map(|(m, e)| (m - e) * (m - e))
                .sum();
            let likelihood = (-sse / two_sigma_sq).exp();
            values.push(likelihood);

            if likelihood > max_likelihood {
                max_likelihood = likelihood;
                best = Some((gx, gy, center));
            }
        }

        let Some(surface) = ScalarGrid::from_row_major(grid.columns, grid.rows, values) else {
            return Localization::no_information();
        };

        match best {
            Some((gx, gy, center)) => debug!(
                gx,
                gy,
                x = center.x,
                y = center.y,
                confidence = max_likelihood,
                beacons = beacons.len(),
                obstacles = obstacles.len(),
                "网格似然定位完成"
            ),
            None => debug!("所有单元格似然为 0，没有最佳估计"),
        }

        Localization {
            grid: Some(surface),
            confidence: max_likelihood,
            estimate: best.map(|(_, _, p)| p),
            best_cell: best.map(|(gx, gy, _)| (gx, gy)),
            beacon_count: beacons.len().min(measured.len()),
        }
    }

    /// 信号覆盖图：每个单元格为所有信标期望强度之和
    pub fn signal_coverage(
        beacons: &[Beacon],
        model: &PropagationModel,
        obstacles: &[Obstacle],
        grid: &GridSpec,
    ) -> CoverageMap {
        let mut max_total = 0.0;
        let mut values = Vec::with_capacity(grid.cell_count());

        for (_, _, center) in grid.cells() {
            let total: f64 = model
                .expected_strength_vector(beacons, &center, obstacles)
                .iter()
                .sum();
            if total > max_total {
                max_total = total;
            }
            values.push(total);
        }

        trace!(max_total, cells = values.len(), "覆盖图计算完成");

        let grid = ScalarGrid::from_row_major(grid.columns, grid.rows, values)
            .unwrap_or_else(|| ScalarGrid::filled(grid.columns, grid.rows, 0.0));
        CoverageMap { grid, max_total }
    }

    /// 强度加权质心
    ///
    /// 以各信标测量强度为权重对信标位置求加权平均。
    /// 强度为空或总和为 0 时返回 None。
    pub fn weighted_centroid(beacons: &[Beacon], strengths: &[f64]) -> Option<Point> {
        if !has_information(strengths) {
            return None;
        }

        let total: f64 = strengths.iter().sum();
        let (sx, sy) = beacons
            .iter()
            .zip(strengths)
            .fold((0.0, 0.0), |(sx, sy), (b, s)| {
                (sx + s * b.position.x, sy + s * b.position.y)
            });

        Some(Point::new(sx / total, sy / total))
    }
}

/// 网格似然定位（便捷函数），见 [`LocationAlgorithm::localize`]
pub fn localize(
    beacons: &[Beacon],
    measured: &[f64],
    model: &PropagationModel,
    obstacles: &[Obstacle],
    grid: &GridSpec,
    sigma: f64,
) -> Localization {
    LocationAlgorithm::localize(beacons, measured, model, obstacles, grid, sigma)
}
