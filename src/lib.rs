//! 认知状态融合引擎
//!
//! 将逐帧的面部几何测量与原始情绪概率向量融合为一个时间稳定的
//! 认知状态标签（专注/分心/沮丧/困倦/未注视屏幕），供实时显示使用。
//!
//! ## 模块
//! - `analysis::drowsiness`: EAR/MAR 迟滞去抖的困倦检测
//! - `analysis::attention`: 头部姿态基线校准 + 注意力迟滞
//! - `analysis::emotion`: 情绪时间平滑（滑动窗口众数投票）
//! - `analysis::fusion`: 固定优先级的状态融合
//! - `pipeline`: 逐帧编排器（检测 → 关键点 → 分析 → 融合）

pub mod analysis;
pub mod config;
pub mod error;
pub mod interfaces;
pub mod logging;
pub mod pipeline;
pub mod types;

pub use analysis::attention::AttentionAnalyzer;
pub use analysis::drowsiness::DrowsinessAnalyzer;
pub use analysis::emotion::EmotionSmoother;
pub use pipeline::AnalysisPipeline;
pub use types::{CombinedState, FinalState, LandmarkSnapshot};
