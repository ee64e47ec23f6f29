//! 状态融合模块
//!
//! 对一帧内三个分析器的中间结果施加固定优先级，产出唯一的
//! 最终标签。优先级编码严重程度：生理安全信号（困倦）>
//! 注意力（未注视）> 轻度分心线索（哈欠）> 情绪导出状态。
//!
//! 纯函数，无副作用；所有分析器输出原样保留在返回结构中，
//! 消费方可以在融合标签旁查看原始信号。

use crate::types::{
    AttentionResult, CognitiveState, CombinedState, DrowsinessResult, Emotion, EmotionScores,
    FinalState,
};

/// 一帧的融合输入。
#[derive(Debug, Clone)]
pub struct FusionInput {
    pub face_detected: bool,
    pub cognitive_state: CognitiveState,
    pub emotion: Emotion,
    pub confidence: f64,
    pub emotion_scores: EmotionScores,
    pub drowsiness: Option<DrowsinessResult>,
    pub attention: Option<AttentionResult>,
    pub calibrating: bool,
}

impl FusionInput {
    /// 未检测到人脸的帧。
    pub fn no_face() -> Self {
        Self {
            face_detected: false,
            ..Self::unknown()
        }
    }

    /// 有人脸但关键点提取失败的帧：占位标签，跳过分析器。
    pub fn unknown() -> Self {
        Self {
            face_detected: true,
            cognitive_state: CognitiveState::Unknown,
            emotion: Emotion::Unknown,
            confidence: 0.0,
            emotion_scores: EmotionScores::new(),
            drowsiness: None,
            attention: None,
            calibrating: false,
        }
    }
}

/// 融合一帧的中间结果。首个命中的优先级决定 `final_state`：
/// 1. 困倦 → `Drowsy`
/// 2. 未注视屏幕 → `NotLooking`
/// 3. 哈欠 → `Distracted`
/// 4. 否则 → 情绪管线的认知类别
pub fn aggregate(input: FusionInput) -> CombinedState {
    if !input.face_detected {
        return CombinedState {
            final_state: FinalState::NoFace,
            cognitive_state: CognitiveState::Unknown,
            emotion: Emotion::Unknown,
            confidence: 0.0,
            emotion_scores: EmotionScores::new(),
            drowsiness: None,
            attention: None,
            face_detected: false,
            calibrating: false,
        };
    }

    let mut final_state = FinalState::from(input.cognitive_state);

    if input.drowsiness.is_some_and(|d| d.is_drowsy) {
        final_state = FinalState::Drowsy;
    } else if input.attention.is_some_and(|a| !a.is_looking_at_screen) {
        final_state = FinalState::NotLooking;
    } else if input.drowsiness.is_some_and(|d| d.is_yawning) {
        final_state = FinalState::Distracted;
    }

    CombinedState {
        final_state,
        cognitive_state: input.cognitive_state,
        emotion: input.emotion,
        confidence: input.confidence,
        emotion_scores: input.emotion_scores,
        drowsiness: input.drowsiness,
        attention: input.attention,
        face_detected: true,
        calibrating: input.calibrating,
    }
}
