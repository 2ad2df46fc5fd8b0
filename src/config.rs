/// JSON 场景配置
///
/// 所有字段都有默认值，缺省配置对应 800×600 像素区域、每米 40 像素、
/// 标称距离 5 米、40×30 网格、sigma = 0.1。

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::algorithms::{
    Area, Beacon, Point, DEFAULT_ATTENUATION, DEFAULT_GRID_HEIGHT, DEFAULT_GRID_WIDTH,
    DEFAULT_NOMINAL_RANGE, DEFAULT_ROLLOFF, DEFAULT_SCALE, DEFAULT_SIGMA,
};
use crate::error::Result;
use crate::scene::{Scene, SceneBuilder};

/// 配置中的信标条目，`id` 与 `name` 可省略
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BeaconConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub x: f64,
    pub y: f64,
}

/// 网格分辨率
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    pub width: usize,
    pub height: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            width: DEFAULT_GRID_WIDTH,
            height: DEFAULT_GRID_HEIGHT,
        }
    }
}

fn default_nominal_range() -> f64 {
    DEFAULT_NOMINAL_RANGE
}

fn default_scale() -> f64 {
    DEFAULT_SCALE
}

fn default_sigma() -> f64 {
    DEFAULT_SIGMA
}

fn default_attenuation() -> f64 {
    DEFAULT_ATTENUATION
}

fn default_rolloff() -> f64 {
    DEFAULT_ROLLOFF
}

/// 场景配置
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    /// 信标（顺序即测量向量顺序）
    #[serde(default)]
    pub beacons: Vec<BeaconConfig>,
    /// 障碍物，每个为 4 个顶点
    #[serde(default)]
    pub obstacles: Vec<Vec<Point>>,
    /// 标称距离（真实单位）
    #[serde(default = "default_nominal_range")]
    pub nominal_range: f64,
    /// 每个真实单位对应的位置单位数
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// 定位区域
    #[serde(default)]
    pub area: Area,
    /// 网格分辨率
    #[serde(default)]
    pub grid: GridConfig,
    /// 高斯核 sigma
    #[serde(default = "default_sigma")]
    pub sigma: f64,
    /// 遮挡衰减系数
    #[serde(default = "default_attenuation")]
    pub attenuation: f64,
    /// 超距滚降系数
    #[serde(default = "default_rolloff")]
    pub rolloff: f64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        SceneConfig {
            beacons: Vec::new(),
            obstacles: Vec::new(),
            nominal_range: DEFAULT_NOMINAL_RANGE,
            scale: DEFAULT_SCALE,
            area: Area::default(),
            grid: GridConfig::default(),
            sigma: DEFAULT_SIGMA,
            attenuation: DEFAULT_ATTENUATION,
            rolloff: DEFAULT_ROLLOFF,
        }
    }
}

impl SceneConfig {
    /// 从 JSON 文件加载
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let config = Self::from_json(&text)?;
        info!(path = %path.display(), beacons = config.beacons.len(), "已加载场景配置");
        Ok(config)
    }

    /// 从 JSON 字符串解析
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// 序列化为格式化的 JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// 追加信标位置
    pub fn push_beacon(&mut self, position: Point) {
        self.beacons.push(BeaconConfig {
            id: None,
            name: None,
            x: position.x,
            y: position.y,
        });
    }

    /// 通过 `SceneBuilder` 校验并冻结为场景
    pub fn into_scene(self) -> Result<Scene> {
        let mut builder = SceneBuilder::new(self.area, self.scale);
        for (i, b) in self.beacons.into_iter().enumerate() {
            let id = b.id.unwrap_or_else(|| format!("B{}", i + 1));
            let name = b.name.unwrap_or_else(|| id.clone());
            builder.add_named_beacon(Beacon::new(id, name, b.x, b.y))?;
        }
        for vertices in &self.obstacles {
            builder.add_obstacle(vertices)?;
        }
        builder.set_nominal_range(self.nominal_range)?;
        builder.set_grid(self.grid.width, self.grid.height);
        builder.set_sigma(self.sigma);
        builder.set_propagation(self.attenuation, self.rolloff);
        builder.build()
    }
}
