/// 信号传播模型
///
/// 期望信号强度由四部分组成：
/// - 平方反比衰减，归一化到 (0, 1]，标称距离处恰好为 0.5
/// - 障碍物遮挡：按连线穿过建筑物的长度指数衰减
/// - 超出标称距离后的额外指数滚降
/// - 超距时的噪声底限，保证强度始终为正

use std::fmt;

use crate::algorithms::geometry::segment_length_inside_polygon;
use crate::algorithms::{Beacon, Obstacle, Point};
use crate::error::{Error, Result};

/// 遮挡衰减系数（每真实单位）
pub const DEFAULT_ATTENUATION: f64 = 0.5;

/// 超距滚降系数（每真实单位）
pub const DEFAULT_ROLLOFF: f64 = 0.8;

/// 超距噪声底限
pub const NOISE_FLOOR: f64 = 1e-5;

/// 默认标称距离（真实单位）
pub const DEFAULT_NOMINAL_RANGE: f64 = 5.0;

/// 默认比例因子：每个真实单位（米）对应 40 个位置单位（像素）
pub const DEFAULT_SCALE: f64 = 40.0;

/// 信号传播模型参数
///
/// 场景构建完成后冻结，每次计算都显式传入，不依赖任何全局状态。
#[derive(Clone, Debug, PartialEq)]
pub struct PropagationModel {
    /// 标称距离（真实单位）：无遮挡时强度为 0.5 的距离
    pub nominal_range: f64,
    /// 每个真实单位对应的位置单位数
    pub scale: f64,
    /// 遮挡衰减系数
    pub attenuation: f64,
    /// 超距滚降系数
    pub rolloff: f64,
    /// 超距噪声底限
    pub noise_floor: f64,
}

impl PropagationModel {
    /// 使用默认衰减参数创建模型
    pub fn new(nominal_range: f64, scale: f64) -> Self {
        PropagationModel {
            nominal_range,
            scale,
            attenuation: DEFAULT_ATTENUATION,
            rolloff: DEFAULT_ROLLOFF,
            noise_floor: NOISE_FLOOR,
        }
    }

    /// 位置单位与真实单位相同的模型
    pub fn unscaled(nominal_range: f64) -> Self {
        Self::new(nominal_range, 1.0)
    }

    /// 设置遮挡衰减系数
    pub fn with_attenuation(mut self, attenuation: f64) -> Self {
        self.attenuation = attenuation;
        self
    }

    /// 设置超距滚降系数
    pub fn with_rolloff(mut self, rolloff: f64) -> Self {
        self.rolloff = rolloff;
        self
    }

    /// 位置单位距离转换为真实距离
    pub fn to_real_units(&self, distance: f64) -> f64 {
        distance / self.scale
    }

    /// 仅按距离计算的基础强度（平方反比，归一化）
    ///
    /// d = 0 时为 1.0；d = 标称距离时为 0.5；d → ∞ 时趋于 0。
    pub fn base_strength(&self, distance: f64) -> f64 {
        if distance == 0.0 {
            return 1.0;
        }
        let falloff = (self.nominal_range / distance).powi(2);
        (falloff / (1.0 + falloff)).max(0.0)
    }

    /// 信标到目标连线穿过所有障碍物的总长度（真实单位）
    ///
    /// 障碍物重叠部分会重复计算。
    pub fn occluded_length(&self, beacon: &Point, target: &Point, obstacles: &[Obstacle]) -> f64 {
        obstacles
            .iter()
            .map(|o| segment_length_inside_polygon(beacon, target, o.vertices(), self.scale))
            .sum()
    }

    /// 计算单个信标在目标点的期望信号强度，取值 (0, 1]
    pub fn expected_strength(&self, beacon: &Point, target: &Point, obstacles: &[Obstacle]) -> f64 {
        let distance = self.to_real_units(beacon.distance_to(target));
        let mut strength = self.base_strength(distance);

        if !obstacles.is_empty() {
            let inside = self.occluded_length(beacon, target, obstacles);
            if inside > 0.0 {
                strength *= (-self.attenuation * inside).exp();
            }
        }

        if distance <= self.nominal_range {
            return strength;
        }

        let rolled = strength * (-self.rolloff * (distance - self.nominal_range)).exp();
        rolled.max(self.noise_floor)
    }

    /// 计算所有信标在目标点的期望强度向量，顺序与信标顺序一致
    pub fn expected_strength_vector(
        &self,
        beacons: &[Beacon],
        target: &Point,
        obstacles: &[Obstacle],
    ) -> Vec<f64> {
        beacons
            .iter()
            .map(|b| self.expected_strength(&b.position, target, obstacles))
            .collect()
    }

    /// 验证模型参数的合理性
    pub fn validate(&self) -> Result<()> {
        if !(self.nominal_range.is_finite() && self.nominal_range > 0.0) {
            return Err(Error::InvalidRange(self.nominal_range));
        }
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(Error::InvalidScale(self.scale));
        }
        // 负系数会让遮挡和超距反而增强信号
        if !(self.attenuation.is_finite() && self.attenuation >= 0.0) {
            return Err(Error::InvalidAttenuation(self.attenuation));
        }
        if !(self.rolloff.is_finite() && self.rolloff >= 0.0) {
            return Err(Error::InvalidRolloff(self.rolloff));
        }
        if !(self.noise_floor.is_finite() && self.noise_floor > 0.0) {
            return Err(Error::InvalidNoiseFloor(self.noise_floor));
        }
        Ok(())
    }

    /// 获取模型描述
    pub fn description(&self) -> String {
        format!(
            "传播模型 - 标称距离={:.2}, 比例={:.1}, 遮挡系数={:.2}, 滚降系数={:.2}",
            self.nominal_range, self.scale, self.attenuation, self.rolloff
        )
    }
}

impl Default for PropagationModel {
    fn default() -> Self {
        PropagationModel::new(DEFAULT_NOMINAL_RANGE, DEFAULT_SCALE)
    }
}

impl fmt::Display for PropagationModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// 按模型计算期望强度向量（便捷函数）
pub fn expected_strength_vector(
    beacons: &[Beacon],
    target: &Point,
    model: &PropagationModel,
    obstacles: &[Obstacle],
) -> Vec<f64> {
    model.expected_strength_vector(beacons, target, obstacles)
}
