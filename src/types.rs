use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// 二维关键点
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    pub fn midpoint(&self, other: &Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// 单帧面部关键点快照（像素坐标），由外部关键点提取器产出。
///
/// 眼部各 6 个有序边界点（p1..p6，p1/p4 为水平眼角），嘴部为外轮廓
/// 点序列（名义上 12 个，前 4 个依次为左角、右角、上唇、下唇）。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandmarkSnapshot {
    pub left_eye: [Point; 6],
    pub right_eye: [Point; 6],
    pub mouth: Vec<Point>,
    pub nose_tip: Point,
    pub chin: Point,
    pub left_eye_outer: Point,
    pub right_eye_outer: Point,
}

/// 人脸包围盒（像素坐标）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceBox {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// 外部分类器的固定情绪标签集，外加失败替补标签 `Unknown`。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Emotion {
    Anger,
    Contempt,
    Disgust,
    Fear,
    Happiness,
    Neutral,
    Sadness,
    Surprise,
    Unknown,
}

/// 标签 → 百分比 (0-100) 的情绪得分表
pub type EmotionScores = BTreeMap<Emotion, f64>;

/// 情绪管线导出的认知类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CognitiveState {
    Concentrated,
    Distracted,
    Frustrated,
    Engaged,
    Unknown,
}

/// 融合后的最终状态标签，固定枚举集合。
///
/// 高优先级分析器可以用 `Drowsy` / `NotLooking` 覆盖情绪管线的
/// 认知类别；`NoFace` 仅在未检测到人脸时出现。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FinalState {
    Concentrated,
    Distracted,
    Frustrated,
    Engaged,
    Unknown,
    Drowsy,
    NotLooking,
    NoFace,
}

impl From<CognitiveState> for FinalState {
    fn from(state: CognitiveState) -> Self {
        match state {
            CognitiveState::Concentrated => FinalState::Concentrated,
            CognitiveState::Distracted => FinalState::Distracted,
            CognitiveState::Frustrated => FinalState::Frustrated,
            CognitiveState::Engaged => FinalState::Engaged,
            CognitiveState::Unknown => FinalState::Unknown,
        }
    }
}

impl fmt::Display for FinalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FinalState::Concentrated => "concentrated",
            FinalState::Distracted => "distracted",
            FinalState::Frustrated => "frustrated",
            FinalState::Engaged => "engaged",
            FinalState::Unknown => "unknown",
            FinalState::Drowsy => "drowsy",
            FinalState::NotLooking => "not-looking",
            FinalState::NoFace => "no-face",
        };
        f.write_str(label)
    }
}

/// 困倦分析的单帧结果；两个计数器是跨帧保留的唯一状态。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrowsinessResult {
    pub ear: f64,
    pub mar: f64,
    pub is_drowsy: bool,
    pub is_yawning: bool,
    pub drowsy_frames: u32,
    pub yawn_frames: u32,
}

/// 注意力分析的单帧结果。
///
/// 校准完成后 pitch/yaw 为相对基线的角度；校准期间为平滑后的
/// 绝对角度。roll 未估计，恒为 0。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttentionResult {
    pub pitch: f64,
    pub yaw: f64,
    pub roll: f64,
    pub is_looking_at_screen: bool,
    pub not_looking_frames: u32,
}

/// 情绪平滑器的单帧输出
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionResult {
    pub cognitive_state: CognitiveState,
    pub confidence: f64,
    pub emotion: Emotion,
    pub emotion_scores: EmotionScores,
}

/// 外部情绪分类器的原始预测：标签 + 概率分布 (0-1)。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPrediction {
    pub label: Emotion,
    pub scores: BTreeMap<Emotion, f64>,
}

/// 每个处理帧重建一次的对外唯一输出，构造后不再修改。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedState {
    pub final_state: FinalState,
    pub cognitive_state: CognitiveState,
    pub emotion: Emotion,
    pub confidence: f64,
    pub emotion_scores: EmotionScores,
    pub drowsiness: Option<DrowsinessResult>,
    pub attention: Option<AttentionResult>,
    pub face_detected: bool,
    pub calibrating: bool,
}
