//! 逐帧编排器
//!
//! 顺序：人脸检测 → 关键点提取 → 三个分析器 → 融合。单线程、
//! 帧同步执行；跨帧可变状态只有各分析器自有的计数器/历史/基线。
//!
//! 失败路径全部降级为占位结果（见 `error` 模块），帧循环不中断：
//! - 无人脸：固定的 no-face 状态
//! - 有脸无关键点：unknown 占位，跳过分析器
//! - 分类器失败：以 `Emotion::Unknown` 零置信度替补并记录日志

use std::marker::PhantomData;

use crate::analysis::attention::AttentionAnalyzer;
use crate::analysis::drowsiness::DrowsinessAnalyzer;
use crate::analysis::emotion::EmotionSmoother;
use crate::analysis::fusion::{self, FusionInput};
use crate::config::AppConfig;
use crate::interfaces::{EmotionClassifier, FaceDetector, LandmarkExtractor};
use crate::types::{CombinedState, Emotion, EmotionScores, FaceBox};

/// 融合管线。每个被观测对象恰好持有一个实例；多路摄像头部署
/// 时各路各建一份，分析器状态不跨实例共享。
pub struct AnalysisPipeline<F, D, L, C> {
    config: AppConfig,
    face_detector: D,
    landmark_extractor: L,
    emotion_classifier: C,
    drowsiness: DrowsinessAnalyzer,
    attention: AttentionAnalyzer,
    emotion: EmotionSmoother,
    frame_count: u64,
    last_state: Option<CombinedState>,
    last_bbox: Option<FaceBox>,
    _frame: PhantomData<fn(&F)>,
}

impl<F, D, L, C> AnalysisPipeline<F, D, L, C>
where
    D: FaceDetector<F>,
    L: LandmarkExtractor<F>,
    C: EmotionClassifier<F>,
{
    pub fn new(config: AppConfig, face_detector: D, landmark_extractor: L, emotion_classifier: C) -> Self {
        let drowsiness = DrowsinessAnalyzer::new(config.drowsiness.clone());
        let attention = AttentionAnalyzer::new(config.attention.clone());
        let emotion = EmotionSmoother::new(config.emotion.clone());
        Self {
            config,
            face_detector,
            landmark_extractor,
            emotion_classifier,
            drowsiness,
            attention,
            emotion,
            frame_count: 0,
            last_state: None,
            last_bbox: None,
            _frame: PhantomData,
        }
    }

    /// 节流入口：每 `process_every_n_frames` 帧处理一帧，被跳过
    /// 的帧直接复用缓存的上一结果，不做任何重算。
    pub fn step(&mut self, frame: &F) -> (CombinedState, Option<FaceBox>) {
        let admitted = self.frame_count % self.config.process_every_n_frames == 0;
        self.frame_count += 1;

        if admitted {
            return self.process(frame);
        }
        match &self.last_state {
            Some(state) => (state.clone(), self.last_bbox),
            // 尚无缓存（首帧前就被节流配置跳过）时退回完整处理
            None => self.process(frame),
        }
    }

    /// 完整处理一帧并更新缓存。
    pub fn process(&mut self, frame: &F) -> (CombinedState, Option<FaceBox>) {
        let Some(bbox) = self.face_detector.detect(frame) else {
            let state = fusion::aggregate(FusionInput::no_face());
            self.last_state = Some(state.clone());
            self.last_bbox = None;
            return (state, None);
        };

        self.last_bbox = Some(bbox);

        let input = match self.landmark_extractor.extract(frame) {
            None => {
                tracing::debug!("face box without landmarks, emitting placeholder state");
                FusionInput::unknown()
            }
            Some(landmarks) => {
                let drowsiness = self.drowsiness.analyze(&landmarks);
                let attention = self.attention.analyze(&landmarks);
                let calibrating = !self.attention.is_calibrated();

                let face_crop = self.face_detector.crop_face(frame, &bbox);
                let (label, scores) = match self.emotion_classifier.classify(&face_crop) {
                    Ok(prediction) => (prediction.label, prediction.scores),
                    Err(e) => {
                        tracing::warn!(error = %e, "emotion classifier failed, substituting unknown");
                        (Emotion::Unknown, EmotionScores::new())
                    }
                };
                let emotion = self.emotion.predict(label, &scores);

                FusionInput {
                    face_detected: true,
                    cognitive_state: emotion.cognitive_state,
                    emotion: emotion.emotion,
                    confidence: emotion.confidence,
                    emotion_scores: emotion.emotion_scores,
                    drowsiness: Some(drowsiness),
                    attention: Some(attention),
                    calibrating,
                }
            }
        };

        let state = fusion::aggregate(input);
        self.last_state = Some(state.clone());
        (state, Some(bbox))
    }

    /// 清空所有分析器的计数器与历史；注意力基线保留。
    pub fn reset(&mut self) {
        self.drowsiness.reset();
        self.attention.reset();
        self.emotion.reset();
        tracing::info!("analysis pipeline reset");
    }

    /// 只强制重新校准注意力基线。
    pub fn reset_calibration(&mut self) {
        self.attention.reset_calibration();
        tracing::info!("attention recalibration requested");
    }

    /// 释放关键点提取器持有的模型资源。
    pub fn release(&mut self) {
        self.landmark_extractor.release();
    }

    pub fn last_state(&self) -> Option<&CombinedState> {
        self.last_state.as_ref()
    }

    pub fn last_bbox(&self) -> Option<FaceBox> {
        self.last_bbox
    }

    pub fn is_calibrated(&self) -> bool {
        self.attention.is_calibrated()
    }
}
