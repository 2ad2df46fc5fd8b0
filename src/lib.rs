/// catzone：基于信标信号强度的二维目标定位
///
/// - `algorithms`：几何、信号传播模型与网格似然定位（纯函数，无共享状态）
/// - `scene`：信标放置阶段与冻结后的场景快照
/// - `config`：JSON 场景配置

pub mod algorithms;
pub mod config;
pub mod error;
pub mod scene;

pub use error::{Error, Result};
