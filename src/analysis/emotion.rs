//! 情绪时间平滑模块
//!
//! 神经网络分类本身是外部调用；本模块只对其逐帧输出做时间平滑：
//! 在滑动窗口内对标签做众数投票、对置信度取均值，再把（可能
//! 平滑后的）原始情绪标签映射到固定的认知类别集合。
//!
//! 冷启动期（历史不足 `min_history_for_smoothing`）直接透传当帧
//! 标签与置信度，避免窗口未满时的平滑伪影。

use std::collections::VecDeque;

use crate::config::EmotionConfig;
use crate::types::{CognitiveState, Emotion, EmotionResult, EmotionScores};

/// 情绪平滑器
///
/// 持有两条有界历史：标签序列与对应置信度序列。
pub struct EmotionSmoother {
    config: EmotionConfig,
    emotion_history: VecDeque<Emotion>,
    confidence_history: VecDeque<f64>,
}

impl EmotionSmoother {
    pub fn new(config: EmotionConfig) -> Self {
        Self {
            config,
            emotion_history: VecDeque::new(),
            confidence_history: VecDeque::new(),
        }
    }

    /// 接收外部分类器的一帧原始预测（标签 + 概率分布 0-1），
    /// 返回平滑后的情绪结果（得分表转为百分比 0-100）。
    pub fn predict(&mut self, raw_label: Emotion, raw_scores: &EmotionScores) -> EmotionResult {
        let raw_confidence = raw_scores.get(&raw_label).copied().unwrap_or(0.0);

        self.emotion_history.push_back(raw_label);
        self.confidence_history.push_back(raw_confidence);
        while self.emotion_history.len() > self.config.history_size {
            self.emotion_history.pop_front();
        }
        while self.confidence_history.len() > self.config.history_size {
            self.confidence_history.pop_front();
        }

        let (emotion, confidence) =
            if self.emotion_history.len() >= self.config.min_history_for_smoothing {
                let mode = self.mode_label();
                let mean = self.confidence_history.iter().sum::<f64>()
                    / self.confidence_history.len() as f64;
                (mode, mean)
            } else {
                (raw_label, raw_confidence)
            };

        let emotion_scores: EmotionScores = raw_scores
            .iter()
            .map(|(label, score)| (*label, score * 100.0))
            .collect();

        EmotionResult {
            cognitive_state: cognitive_category(emotion),
            confidence,
            emotion,
            emotion_scores,
        }
    }

    /// 清空两条历史。
    pub fn reset(&mut self) {
        self.emotion_history.clear();
        self.confidence_history.clear();
    }

    /// 窗口内出现次数最多的标签。
    ///
    /// 平票时取窗口中首次出现更早的标签：计数表按插入顺序建立，
    /// 比较使用严格大于，先出现者保持领先。
    fn mode_label(&self) -> Emotion {
        let mut counts: Vec<(Emotion, usize)> = Vec::new();
        for &label in &self.emotion_history {
            match counts.iter_mut().find(|(l, _)| *l == label) {
                Some((_, n)) => *n += 1,
                None => counts.push((label, 1)),
            }
        }

        let mut best = counts[0];
        for &entry in &counts[1..] {
            if entry.1 > best.1 {
                best = entry;
            }
        }
        best.0
    }
}

/// 原始情绪标签 → 认知类别的固定映射。
///
/// `Unknown`（分类器失败的替补标签）落入中性类别 `Concentrated`。
pub fn cognitive_category(emotion: Emotion) -> CognitiveState {
    match emotion {
        Emotion::Anger | Emotion::Contempt | Emotion::Disgust | Emotion::Sadness => {
            CognitiveState::Frustrated
        }
        Emotion::Fear | Emotion::Surprise => CognitiveState::Distracted,
        Emotion::Happiness => CognitiveState::Engaged,
        Emotion::Neutral | Emotion::Unknown => CognitiveState::Concentrated,
    }
}
