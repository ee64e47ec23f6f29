//! 困倦检测模块
//!
//! 基于 EAR (Eye Aspect Ratio) 与 MAR (Mouth Aspect Ratio) 的迟滞去抖：
//! - EAR = (|p2-p6| + |p3-p5|) / (2 * |p1-p4|)，双眼取平均
//! - MAR = |上唇-下唇| / |左角-右角|
//!
//! 两个计数器相互独立：低于（高于）阈值时 +1，否则 -1 并在 0 处
//! 截断。布尔信号只在计数器达到配置帧数后翻转，可抵抗单帧眨眼
//! 或误检，同时在有界帧数内响应真实状态。

use crate::config::DrowsinessConfig;
use crate::types::{DrowsinessResult, LandmarkSnapshot, Point};

const MIN_MOUTH_POINTS: usize = 8;
const MIN_DENOMINATOR: f64 = 1e-6;

/// 困倦分析器
///
/// 跨帧保留的状态只有两个迟滞计数器。
pub struct DrowsinessAnalyzer {
    config: DrowsinessConfig,
    drowsy_counter: u32,
    yawn_counter: u32,
}

impl DrowsinessAnalyzer {
    pub fn new(config: DrowsinessConfig) -> Self {
        Self {
            config,
            drowsy_counter: 0,
            yawn_counter: 0,
        }
    }

    /// 处理一帧关键点快照，更新计数器并返回结果。
    pub fn analyze(&mut self, landmarks: &LandmarkSnapshot) -> DrowsinessResult {
        let left_ear = eye_aspect_ratio(&landmarks.left_eye);
        let right_ear = eye_aspect_ratio(&landmarks.right_eye);
        let ear = (left_ear + right_ear) / 2.0;
        let mar = mouth_aspect_ratio(&landmarks.mouth);

        if ear < self.config.ear_threshold {
            self.drowsy_counter += 1;
        } else {
            self.drowsy_counter = self.drowsy_counter.saturating_sub(1);
        }

        if mar > self.config.mar_threshold {
            self.yawn_counter += 1;
        } else {
            self.yawn_counter = self.yawn_counter.saturating_sub(1);
        }

        let is_drowsy = self.drowsy_counter >= self.config.drowsy_frames_threshold;
        let is_yawning = self.yawn_counter >= self.config.yawn_frames_threshold;

        if is_drowsy && self.drowsy_counter == self.config.drowsy_frames_threshold {
            tracing::debug!(ear, drowsy_frames = self.drowsy_counter, "drowsiness confirmed");
        }

        DrowsinessResult {
            ear,
            mar,
            is_drowsy,
            is_yawning,
            drowsy_frames: self.drowsy_counter,
            yawn_frames: self.yawn_counter,
        }
    }

    /// 清零两个计数器（会话重置时调用，人脸丢失不触发）。
    pub fn reset(&mut self) {
        self.drowsy_counter = 0;
        self.yawn_counter = 0;
    }
}

/// 标准 6 点 EAR。p1/p4 为水平眼角，p2/p6 与 p3/p5 为上下眼睑配对。
fn eye_aspect_ratio(eye: &[Point; 6]) -> f64 {
    let horizontal = eye[0].distance(&eye[3]);
    if horizontal < MIN_DENOMINATOR {
        return 0.0;
    }
    let vertical_1 = eye[1].distance(&eye[5]);
    let vertical_2 = eye[2].distance(&eye[4]);
    (vertical_1 + vertical_2) / (2.0 * horizontal)
}

/// MAR：嘴部轮廓前 4 点依次为左角、右角、上唇、下唇。
/// 不足 8 个轮廓点时视为检测不完整，返回 0。
fn mouth_aspect_ratio(mouth: &[Point]) -> f64 {
    if mouth.len() < MIN_MOUTH_POINTS {
        return 0.0;
    }
    let horizontal = mouth[0].distance(&mouth[1]);
    if horizontal < MIN_DENOMINATOR {
        return 0.0;
    }
    let vertical = mouth[2].distance(&mouth[3]);
    vertical / horizontal
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    // 水平长度 4 的眼睛，EAR = gap / 2
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

    // 嘴角距离 4 的嘴部轮廓，MAR = gap / 2
    fn mouth(gap: f64) -> Vec<Point> {
        let mut points = vec![pt(0.0, 0.0), pt(4.0, 0.0), pt(2.0, gap), pt(2.0, -gap)];
        points.extend(std::iter::repeat(pt(2.0, 0.0)).take(8));
        points
    }

    fn snapshot(eye_gap: f64, mouth_gap: f64) -> LandmarkSnapshot {
        LandmarkSnapshot {
            left_eye: eye(eye_gap),
            right_eye: eye(eye_gap),
            mouth: mouth(mouth_gap),
            nose_tip: pt(2.0, 2.0),
            chin: pt(2.0, 6.0),
            left_eye_outer: pt(4.0, 0.0),
            right_eye_outer: pt(0.0, 0.0),
        }
    }

    fn analyzer(drowsy_frames: u32, yawn_frames: u32) -> DrowsinessAnalyzer {
        DrowsinessAnalyzer::new(DrowsinessConfig {
            drowsy_frames_threshold: drowsy_frames,
            yawn_frames_threshold: yawn_frames,
            ..DrowsinessConfig::default()
        })
    }

    #[test]
    fn ear_formula_matches_hand_computation() {
        let mut a = analyzer(3, 3);
        let result = a.analyze(&snapshot(1.0, 0.2));
        assert!((result.ear - 0.5).abs() < 1e-12);
        assert!((result.mar - 0.1).abs() < 1e-12);
    }

    #[test]
    fn drowsy_flips_exactly_at_threshold_frame() {
        let mut a = analyzer(3, 3);
        let closed = snapshot(0.1, 0.2);

        let r1 = a.analyze(&closed);
        assert!(!r1.is_drowsy);
        assert_eq!(r1.drowsy_frames, 1);
        let r2 = a.analyze(&closed);
        assert!(!r2.is_drowsy);
        let r3 = a.analyze(&closed);
        assert!(r3.is_drowsy);
        assert_eq!(r3.drowsy_frames, 3);
    }

    #[test]
    fn single_open_frame_decrements_without_clearing() {
        let mut a = analyzer(3, 3);
        let closed = snapshot(0.1, 0.2);
        let open = snapshot(1.0, 0.2);

        for _ in 0..5 {
            a.analyze(&closed);
        }
        // 计数器 5 → 4，仍在阈值之上
        let r = a.analyze(&open);
        assert_eq!(r.drowsy_frames, 4);
        assert!(r.is_drowsy);

        // 继续睁眼直到计数器衰减到阈值之下
        let r = a.analyze(&open);
        assert!(r.is_drowsy);
        let r = a.analyze(&open);
        assert!(!r.is_drowsy);
        assert_eq!(r.drowsy_frames, 2);
    }

    #[test]
    fn counters_floor_at_zero() {
        let mut a = analyzer(3, 3);
        let open = snapshot(1.0, 0.2);
        for _ in 0..10 {
            let r = a.analyze(&open);
            assert_eq!(r.drowsy_frames, 0);
            assert_eq!(r.yawn_frames, 0);
        }
    }

    #[test]
    fn yawn_counter_is_independent_of_drowsy_counter() {
        let mut a = analyzer(3, 2);
        let yawning = snapshot(1.0, 2.0);

        let r1 = a.analyze(&yawning);
        assert!(!r1.is_yawning);
        let r2 = a.analyze(&yawning);
        assert!(r2.is_yawning);
        assert!(!r2.is_drowsy);
        assert_eq!(r2.drowsy_frames, 0);
    }

    #[test]
    fn short_mouth_outline_yields_zero_mar() {
        let mut a = analyzer(3, 3);
        let mut snap = snapshot(1.0, 2.0);
        snap.mouth.truncate(7);
        let r = a.analyze(&snap);
        assert_eq!(r.mar, 0.0);
        assert_eq!(r.yawn_frames, 0);
    }

    #[test]
    fn degenerate_eye_geometry_yields_zero_not_panic() {
        let mut a = analyzer(3, 3);
        let mut snap = snapshot(1.0, 0.2);
        snap.left_eye = [pt(1.0, 1.0); 6];
        snap.right_eye = [pt(1.0, 1.0); 6];
        let r = a.analyze(&snap);
        assert_eq!(r.ear, 0.0);
    }

    #[test]
    fn reset_is_idempotent() {
        let mut a = analyzer(3, 3);
        let closed = snapshot(0.1, 2.0);
        for _ in 0..4 {
            a.analyze(&closed);
        }
        a.reset();
        a.reset();
        let r = a.analyze(&closed);
        assert_eq!(r.drowsy_frames, 1);
        assert_eq!(r.yawn_frames, 1);
    }
}
