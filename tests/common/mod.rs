#![allow(dead_code)]

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

use cognitive_state_engine::config::AppConfig;
use cognitive_state_engine::error::ClassifierError;
use cognitive_state_engine::interfaces::{EmotionClassifier, FaceDetector, LandmarkExtractor};
use cognitive_state_engine::types::{
    Emotion, EmotionScores, FaceBox, LandmarkSnapshot, Point, RawPrediction,
};

/// 测试用的不透明帧类型，核心不解释其内容。
#[derive(Debug, Clone, Copy, Default)]
pub struct Frame;

pub fn bbox() -> FaceBox {
    FaceBox {
        x: 10,
        y: 10,
        width: 200,
        height: 200,
    }
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn eye(gap: f64) -> [Point; 6] {
    [
        pt(0.0, 0.0),
        pt(1.0, gap),
        pt(3.0, gap),
        pt(4.0, 0.0),
        pt(3.0, -gap),
        pt(1.0, -gap),
    ]
}

fn mouth(gap: f64) -> Vec<Point> {
    let mut points = vec![pt(0.0, 0.0), pt(4.0, 0.0), pt(2.0, gap), pt(2.0, -gap)];
    points.extend(std::iter::repeat(pt(2.0, 0.0)).take(8));
    points
}

fn snapshot(eye_gap: f64, mouth_gap: f64, nose_x: f64) -> LandmarkSnapshot {
    LandmarkSnapshot {
        left_eye: eye(eye_gap),
        right_eye: eye(eye_gap),
        mouth: mouth(mouth_gap),
        nose_tip: pt(nose_x, 30.0),
        chin: pt(50.0, 100.0),
        left_eye_outer: pt(100.0, 0.0),
        right_eye_outer: pt(0.0, 0.0),
    }
}

/// 睁眼、闭嘴、正视屏幕
pub fn neutral_snapshot() -> LandmarkSnapshot {
    snapshot(1.0, 0.2, 50.0)
}

/// 闭眼（EAR 0.05 < 0.22），姿态中立
pub fn drowsy_snapshot() -> LandmarkSnapshot {
    snapshot(0.1, 0.2, 50.0)
}

/// 张嘴（MAR 1.0 > 0.6），姿态中立
pub fn yawning_snapshot() -> LandmarkSnapshot {
    snapshot(1.0, 2.0, 50.0)
}

/// 头部偏转（相对基线 yaw 54° > 45°）
pub fn away_snapshot() -> LandmarkSnapshot {
    snapshot(1.0, 0.2, 110.0)
}

pub fn prediction(label: Emotion, confidence: f64) -> RawPrediction {
    let mut scores = EmotionScores::new();
    scores.insert(label, confidence);
    RawPrediction { label, scores }
}

/// 去抖/校准参数调小的配置，方便在几帧内走完状态机。
pub fn fast_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.drowsiness.drowsy_frames_threshold = 2;
    config.drowsiness.yawn_frames_threshold = 2;
    config.attention.not_looking_frames_threshold = 2;
    config.attention.calibration_samples = 3;
    config.attention.pose_smooth_window = 1;
    config.process_every_n_frames = 2;
    config
}

/// 按脚本回答的人脸检测器；脚本耗尽后重复最后一项。
pub struct StubDetector {
    script: VecDeque<Option<FaceBox>>,
    last: Option<FaceBox>,
    pub calls: Rc<Cell<usize>>,
}

impl StubDetector {
    pub fn new(script: Vec<Option<FaceBox>>) -> Self {
        Self {
            last: None,
            script: script.into(),
            calls: Rc::new(Cell::new(0)),
        }
    }

    pub fn always(bbox: FaceBox) -> Self {
        Self::new(vec![Some(bbox)])
    }
}

impl FaceDetector<Frame> for StubDetector {
    fn detect(&mut self, _frame: &Frame) -> Option<FaceBox> {
        self.calls.set(self.calls.get() + 1);
        if self.script.len() > 1 {
            self.last = self.script.pop_front().expect("non-empty script");
        } else if let Some(entry) = self.script.front() {
            self.last = *entry;
        }
        self.last
    }

    fn crop_face(&self, _frame: &Frame, _bbox: &FaceBox) -> Frame {
        Frame
    }
}

/// 按脚本回答的关键点提取器；脚本耗尽后重复最后一项。
pub struct StubExtractor {
    script: VecDeque<Option<LandmarkSnapshot>>,
    last: Option<LandmarkSnapshot>,
    pub released: Rc<Cell<bool>>,
}

impl StubExtractor {
    pub fn new(script: Vec<Option<LandmarkSnapshot>>) -> Self {
        Self {
            last: None,
            script: script.into(),
            released: Rc::new(Cell::new(false)),
        }
    }

    pub fn always(snapshot: LandmarkSnapshot) -> Self {
        Self::new(vec![Some(snapshot)])
    }
}

impl LandmarkExtractor<Frame> for StubExtractor {
    fn extract(&mut self, _frame: &Frame) -> Option<LandmarkSnapshot> {
        if self.script.len() > 1 {
            self.last = self.script.pop_front().expect("non-empty script");
        } else if self.script.len() == 1 {
            self.last = self.script[0].clone();
        }
        self.last.clone()
    }

    fn release(&mut self) {
        self.released.set(true);
    }
}

/// 按脚本回答的情绪分类器；脚本耗尽后重复最后一项。
pub struct StubClassifier {
    script: VecDeque<Result<RawPrediction, String>>,
    last: Result<RawPrediction, String>,
}

impl StubClassifier {
    pub fn new(script: Vec<Result<RawPrediction, String>>) -> Self {
        let last = script
            .last()
            .cloned()
            .unwrap_or_else(|| Err("empty script".to_string()));
        Self {
            script: script.into(),
            last,
        }
    }

    pub fn always(prediction: RawPrediction) -> Self {
        Self::new(vec![Ok(prediction)])
    }

    pub fn failing() -> Self {
        Self::new(vec![Err("inference backend unavailable".to_string())])
    }
}

impl EmotionClassifier<Frame> for StubClassifier {
    fn classify(&mut self, _face: &Frame) -> Result<RawPrediction, ClassifierError> {
        let next = if self.script.len() > 1 {
            self.script.pop_front().expect("non-empty script")
        } else {
            self.last.clone()
        };
        next.map_err(ClassifierError::Inference)
    }
}
