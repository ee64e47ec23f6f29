//! 注意力检测模块
//!
//! 从鼻尖/眼角/下巴的相对位置估计头部 pitch/yaw（roll 不估计），
//! 经中值窗口平滑后，先做一次性基线校准，再相对基线做迟滞去抖：
//!
//! - 校准阶段：平滑样本进入 FIFO 缓冲区，攒满后若 pitch/yaw 的
//!   标准差都低于稳定性上界，则以缓冲区中值为基线；否则继续
//!   逐帧累积重试，没有超时。
//! - 工作阶段：相对角度超出容差时计数器 +1，回到容差内时 -2
//!   （0 处截断）——确认一次真实分心比清除它更慢。

use std::collections::VecDeque;

use crate::config::AttentionConfig;
use crate::types::{AttentionResult, LandmarkSnapshot};

/// 像素坐标下的最小有效跨度，低于此值视为退化几何。
const MIN_FACE_SPAN: f64 = 1.0;
/// 鼻尖在眼-下巴连线上的中立位置偏置
const PITCH_BIAS: f64 = 0.3;

/// 注意力分析器
///
/// `baseline = None` 即校准阶段；唯一的状态迁移是攒满缓冲区且
/// 稳定性门通过（→ 已校准），以及显式的 `reset_calibration`
/// （→ 重新校准）。
pub struct AttentionAnalyzer {
    config: AttentionConfig,
    not_looking_counter: u32,
    baseline: Option<(f64, f64)>,
    calibration_frames: VecDeque<(f64, f64)>,
    pose_history: VecDeque<(f64, f64)>,
}

impl AttentionAnalyzer {
    pub fn new(config: AttentionConfig) -> Self {
        Self {
            config,
            not_looking_counter: 0,
            baseline: None,
            calibration_frames: VecDeque::new(),
            pose_history: VecDeque::new(),
        }
    }

    pub fn is_calibrated(&self) -> bool {
        self.baseline.is_some()
    }

    /// 处理一帧关键点快照。
    ///
    /// 校准期间返回平滑后的绝对角度且 `is_looking_at_screen`
    /// 恒为 true；校准后返回相对基线的角度与去抖后的布尔值。
    pub fn analyze(&mut self, landmarks: &LandmarkSnapshot) -> AttentionResult {
        let (raw_pitch, raw_yaw) = face_direction(landmarks);
        let (pitch, yaw) = self.smooth_pose(raw_pitch, raw_yaw);

        let Some((baseline_pitch, baseline_yaw)) = self.baseline else {
            self.calibrate(pitch, yaw);
            return AttentionResult {
                pitch,
                yaw,
                roll: 0.0,
                is_looking_at_screen: true,
                not_looking_frames: 0,
            };
        };

        let relative_pitch = pitch - baseline_pitch;
        let relative_yaw = yaw - baseline_yaw;

        let is_looking = relative_pitch.abs() <= self.config.pitch_threshold
            && relative_yaw.abs() <= self.config.yaw_threshold;

        if is_looking {
            self.not_looking_counter = self.not_looking_counter.saturating_sub(2);
        } else {
            self.not_looking_counter += 1;
        }

        let sustained_not_looking =
            self.not_looking_counter >= self.config.not_looking_frames_threshold;

        AttentionResult {
            pitch: relative_pitch,
            yaw: relative_yaw,
            roll: 0.0,
            is_looking_at_screen: !sustained_not_looking,
            not_looking_frames: self.not_looking_counter,
        }
    }

    /// 只清零「未注视」计数器，基线保留。
    pub fn reset(&mut self) {
        self.not_looking_counter = 0;
    }

    /// 清除基线、校准缓冲与姿态历史，重新进入校准阶段。
    pub fn reset_calibration(&mut self) {
        self.baseline = None;
        self.calibration_frames.clear();
        self.pose_history.clear();
        self.not_looking_counter = 0;
    }

    /// 最近 N 帧的逐轴中值，抑制单帧抖动且不引入均值平滑的拖尾。
    fn smooth_pose(&mut self, pitch: f64, yaw: f64) -> (f64, f64) {
        self.pose_history.push_back((pitch, yaw));
        while self.pose_history.len() > self.config.pose_smooth_window {
            self.pose_history.pop_front();
        }

        if self.pose_history.len() < 2 {
            return (pitch, yaw);
        }

        let mut pitches: Vec<f64> = self.pose_history.iter().map(|p| p.0).collect();
        let mut yaws: Vec<f64> = self.pose_history.iter().map(|p| p.1).collect();
        (median(&mut pitches), median(&mut yaws))
    }

    fn calibrate(&mut self, pitch: f64, yaw: f64) {
        self.calibration_frames.push_back((pitch, yaw));
        while self.calibration_frames.len() > self.config.calibration_samples {
            self.calibration_frames.pop_front();
        }

        if self.calibration_frames.len() < self.config.calibration_samples {
            return;
        }

        let mut pitches: Vec<f64> = self.calibration_frames.iter().map(|p| p.0).collect();
        let mut yaws: Vec<f64> = self.calibration_frames.iter().map(|p| p.1).collect();

        let pitch_std = std_dev(&pitches);
        let yaw_std = std_dev(&yaws);

        // 稳定性门：用户没坐稳就继续 FIFO 累积，逐帧重试。
        if pitch_std < self.config.stability_threshold_deg
            && yaw_std < self.config.stability_threshold_deg
        {
            let baseline = (median(&mut pitches), median(&mut yaws));
            self.baseline = Some(baseline);
            tracing::info!(
                baseline_pitch = baseline.0,
                baseline_yaw = baseline.1,
                "attention baseline calibrated"
            );
        }
    }
}

/// 几何头部姿态估计（度）。
///
/// yaw = 鼻尖相对双眼中心的水平偏移 / 眼距 × 90；
/// pitch = (鼻尖在眼-下巴区间的垂直位置 − 0.3) × 90。
/// 退化几何（眼距或眼-下巴距离过小）对应角度取 0。
fn face_direction(landmarks: &LandmarkSnapshot) -> (f64, f64) {
    let eye_center = landmarks.left_eye_outer.midpoint(&landmarks.right_eye_outer);
    let face_width = landmarks.right_eye_outer.distance(&landmarks.left_eye_outer);

    if face_width < MIN_FACE_SPAN {
        return (0.0, 0.0);
    }

    let yaw = (landmarks.nose_tip.x - eye_center.x) / face_width * 90.0;

    let face_height = landmarks.chin.distance(&eye_center);
    if face_height < MIN_FACE_SPAN {
        return (0.0, yaw);
    }

    let pitch = ((landmarks.nose_tip.y - eye_center.y) / face_height - PITCH_BIAS) * 90.0;
    (pitch, yaw)
}

fn median(values: &mut [f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(f64::total_cmp);
    let n = values.len();
    if n % 2 == 1 {
        values[n / 2]
    } else {
        (values[n / 2 - 1] + values[n / 2]) / 2.0
    }
}

/// 总体标准差（除以 n）
fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}
