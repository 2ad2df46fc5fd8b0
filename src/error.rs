/// 场景构建与配置加载的错误类型
///
/// 核心算法（几何、信号模型、定位）不会失败，退化输入返回约定的中性结果；
/// 只有场景边界（信标放置、障碍物校验、配置文件、命令行参数）才会产生错误。

use thiserror::Error;

/// catzone 错误类型
#[derive(Debug, Error)]
pub enum Error {
    /// 信标数量超过上限
    #[error("信标数量已达上限 ({max})")]
    TooManyBeacons { max: usize },

    /// 障碍物顶点数量不是 4
    #[error("障碍物必须恰好有 4 个顶点，实际为 {vertices}")]
    InvalidObstacle { vertices: usize },

    /// 障碍物不是凸四边形
    #[error("障碍物不是凸四边形")]
    NonConvexObstacle,

    /// 标称距离非法
    #[error("标称距离必须为正数: {0}")]
    InvalidRange(f64),

    /// 比例因子非法
    #[error("比例因子必须为正数: {0}")]
    InvalidScale(f64),

    /// 遮挡衰减系数非法
    #[error("遮挡衰减系数必须为非负有限数: {0}")]
    InvalidAttenuation(f64),

    /// 超距滚降系数非法
    #[error("超距滚降系数必须为非负有限数: {0}")]
    InvalidRolloff(f64),

    /// 噪声底限非法
    #[error("噪声底限必须为正数: {0}")]
    InvalidNoiseFloor(f64),

    /// 网格尺寸非法
    #[error("网格尺寸非法: {width}x{height}")]
    InvalidGrid { width: usize, height: usize },

    /// 区域尺寸非法
    #[error("区域尺寸非法: {width}x{height}")]
    InvalidArea { width: f64, height: f64 },

    /// 高斯核 sigma 非法
    #[error("sigma 必须为正数: {0}")]
    InvalidSigma(f64),

    /// 场景中没有信标
    #[error("场景中没有信标")]
    NoBeacons,

    /// 坐标字符串解析失败
    #[error("无法解析坐标: {0:?}")]
    PointParse(String),

    /// 文件读写错误
    #[error("I/O 错误: {0}")]
    Io(#[from] std::io::Error),

    /// JSON 解析错误
    #[error("JSON 错误: {0}")]
    Json(#[from] serde_json::Error),
}

/// catzone 结果类型
pub type Result<T> = std::result::Result<T, Error>;
