/// 定位算法模块
/// 
/// 该模块提供基于信号强度的二维定位实现，支持：
/// - 凸多边形几何计算（点包含、线段相交、线段穿越长度）
/// - 含障碍物遮挡与超距滚降的信号传播模型
/// - 网格似然定位、信号覆盖图与加权质心
/// - 热力图颜色映射

pub mod beacon;
pub mod geometry;
pub mod heatmap;
pub mod location_algorithms;
pub mod results;
pub mod signal_model;

pub use beacon::*;
pub use location_algorithms::*;
pub use results::*;
pub use signal_model::*;
