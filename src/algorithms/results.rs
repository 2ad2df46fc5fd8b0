/// 定位结果数据结构
///
/// 包含似然网格、最佳估计位置、置信度以及信号覆盖图

use std::fmt;

use serde::Serialize;

use crate::algorithms::Point;

/// 二维标量网格，按行存储（从上到下，从左到右）
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScalarGrid {
    width: usize,
    height: usize,
    values: Vec<f64>,
}

impl ScalarGrid {
    /// 由行优先的数据创建网格，数据长度必须等于 width * height
    pub fn from_row_major(width: usize, height: usize, values: Vec<f64>) -> Option<Self> {
        if values.len() != width * height {
            return None;
        }
        Some(ScalarGrid {
            width,
            height,
            values,
        })
    }

    /// 所有单元格取同一值的网格
    pub fn filled(width: usize, height: usize, value: f64) -> Self {
        ScalarGrid {
            width,
            height,
            values: vec![value; width * height],
        }
    }

    /// 网格列数
    pub fn width(&self) -> usize {
        self.width
    }

    /// 网格行数
    pub fn height(&self) -> usize {
        self.height
    }

    /// 读取单元格 (gx, gy)
    pub fn get(&self, gx: usize, gy: usize) -> Option<f64> {
        if gx >= self.width || gy >= self.height {
            return None;
        }
        self.values.get(gy * self.width + gx).copied()
    }

    /// 按行迭代
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.values.chunks(self.width.max(1))
    }

    /// 行优先的全部数据
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// 网格最大值（空网格为 0）
    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }

    /// 归一化到 [0, 1]：每个值除以 `max`
    ///
    /// `max` 为 0（或非正数）时全部返回 0，避免除零。
    pub fn normalized_by(&self, max: f64) -> ScalarGrid {
        let values = if max > 0.0 {
            self.values.iter().map(|v| v / max).collect()
        } else {
            vec![0.0; self.values.len()]
        };
        ScalarGrid {
            width: self.width,
            height: self.height,
            values,
        }
    }

    /// 以自身最大值归一化
    pub fn normalized(&self) -> ScalarGrid {
        self.normalized_by(self.max())
    }
}

/// 似然定位结果
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Localization {
    /// 似然网格；测量无信息时为 None
    pub grid: Option<ScalarGrid>,
    /// 置信度：网格中的最大似然值
    pub confidence: f64,
    /// 最佳单元格中心（位置单位）
    pub estimate: Option<Point>,
    /// 最佳单元格索引 (gx, gy)
    pub best_cell: Option<(usize, usize)>,
    /// 参与定位的信标数量
    pub beacon_count: usize,
}

impl Localization {
    /// 测量为空或全为 0 时的结果
    pub fn no_information() -> Self {
        Localization {
            grid: None,
            confidence: 0.0,
            estimate: None,
            best_cell: None,
            beacon_count: 0,
        }
    }

    /// 是否得到了有效估计
    pub fn is_informative(&self) -> bool {
        self.grid.is_some()
    }

    /// 估计位置与真实位置的距离（真实单位）
    pub fn error_to(&self, truth: &Point, scale: f64) -> Option<f64> {
        self.estimate.map(|e| e.distance_to(truth) / scale)
    }

    /// 按最大似然归一化后的网格（用于热力图）
    pub fn intensities(&self) -> Option<ScalarGrid> {
        self.grid.as_ref().map(|g| g.normalized_by(self.confidence))
    }

    /// 获取详细描述
    pub fn detailed_description(&self) -> String {
        match self.estimate {
            Some(p) => format!(
                "估计位置: {}, 置信度: {:.3}, 信标数: {}",
                p, self.confidence, self.beacon_count
            ),
            None => "无有效测量，未定位".to_string(),
        }
    }
}

impl fmt::Display for Localization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.estimate {
            Some(p) => write!(f, "{} [{:.2}]", p, self.confidence),
            None => write!(f, "(未定位)"),
        }
    }
}

/// 信号覆盖图：每个单元格为所有信标期望强度之和
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CoverageMap {
    /// 强度总和网格
    pub grid: ScalarGrid,
    /// 网格中的最大强度总和
    pub max_total: f64,
}

impl CoverageMap {
    /// 归一化后的覆盖强度
    pub fn intensities(&self) -> ScalarGrid {
        self.grid.normalized_by(self.max_total)
    }
}
