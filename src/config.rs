use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::logging::LogConfig;

/// 困倦检测参数
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrowsinessConfig {
    /// EAR 阈值，低于此值计为闭眼
    pub ear_threshold: f64,
    /// MAR 阈值，高于此值计为张嘴
    pub mar_threshold: f64,
    /// 困倦计数器的去抖帧数
    pub drowsy_frames_threshold: u32,
    /// 哈欠计数器的去抖帧数
    pub yawn_frames_threshold: u32,
}

impl Default for DrowsinessConfig {
    fn default() -> Self {
        Self {
            ear_threshold: 0.22,
            mar_threshold: 0.6,
            drowsy_frames_threshold: 20,
            yawn_frames_threshold: 15,
        }
    }
}

/// 注意力检测参数
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttentionConfig {
    /// 相对基线的 pitch 容差（度）
    pub pitch_threshold: f64,
    /// 相对基线的 yaw 容差（度）
    pub yaw_threshold: f64,
    /// 「未注视屏幕」计数器的去抖帧数
    pub not_looking_frames_threshold: u32,
    /// 校准缓冲区样本数
    pub calibration_samples: usize,
    /// 校准通过所需的姿态标准差上界（度）
    pub stability_threshold_deg: f64,
    /// 姿态中值平滑窗口大小
    pub pose_smooth_window: usize,
}

impl Default for AttentionConfig {
    fn default() -> Self {
        Self {
            pitch_threshold: 45.0,
            yaw_threshold: 45.0,
            not_looking_frames_threshold: 25,
            calibration_samples: 30,
            stability_threshold_deg: 15.0,
            pose_smooth_window: 5,
        }
    }
}

/// 情绪平滑参数
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionConfig {
    /// 滑动窗口大小（帧）
    pub history_size: usize,
    /// 启用平滑所需的最小历史长度
    pub min_history_for_smoothing: usize,
}

impl Default for EmotionConfig {
    fn default() -> Self {
        Self {
            history_size: 15,
            min_history_for_smoothing: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    pub drowsiness: DrowsinessConfig,
    pub attention: AttentionConfig,
    pub emotion: EmotionConfig,
    /// 每 N 帧处理一帧，其余帧复用缓存结果
    pub process_every_n_frames: u64,
    #[serde(skip)]
    pub log: LogConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            drowsiness: DrowsinessConfig::default(),
            attention: AttentionConfig::default(),
            emotion: EmotionConfig::default(),
            process_every_n_frames: 2,
            log: LogConfig::default(),
        }
    }
}

impl AppConfig {
    /// 从环境变量构造配置，缺失的键使用默认值。
    /// 先尝试加载工作目录下的 `.env`（不存在则忽略）。
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            drowsiness: DrowsinessConfig {
                ear_threshold: env_or_parse("CSE_EAR_THRESHOLD", 0.22_f64),
                mar_threshold: env_or_parse("CSE_MAR_THRESHOLD", 0.6_f64),
                drowsy_frames_threshold: env_or_parse("CSE_DROWSY_FRAMES", 20_u32),
                yawn_frames_threshold: env_or_parse("CSE_YAWN_FRAMES", 15_u32),
            },
            attention: AttentionConfig {
                pitch_threshold: env_or_parse("CSE_PITCH_THRESHOLD", 45.0_f64),
                yaw_threshold: env_or_parse("CSE_YAW_THRESHOLD", 45.0_f64),
                not_looking_frames_threshold: env_or_parse("CSE_NOT_LOOKING_FRAMES", 25_u32),
                calibration_samples: env_or_parse("CSE_CALIBRATION_SAMPLES", 30_usize),
                stability_threshold_deg: env_or_parse("CSE_STABILITY_DEG", 15.0_f64),
                pose_smooth_window: env_or_parse("CSE_POSE_SMOOTH_WINDOW", 5_usize),
            },
            emotion: EmotionConfig {
                history_size: env_or_parse("CSE_EMOTION_HISTORY", 15_usize),
                min_history_for_smoothing: env_or_parse("CSE_EMOTION_MIN_HISTORY", 3_usize),
            },
            process_every_n_frames: env_or_parse("CSE_PROCESS_EVERY_N_FRAMES", 2_u64),
            log: LogConfig {
                log_level: env_or("RUST_LOG", "info"),
                enable_file_logs: env_or_bool("CSE_ENABLE_FILE_LOGS", false),
                log_dir: env_or("CSE_LOG_DIR", "./logs"),
            },
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.drowsiness.ear_threshold <= 0.0 {
            return Err("drowsiness.earThreshold must be positive".to_string());
        }
        if self.drowsiness.mar_threshold <= 0.0 {
            return Err("drowsiness.marThreshold must be positive".to_string());
        }
        if self.drowsiness.drowsy_frames_threshold == 0 {
            return Err("drowsiness.drowsyFramesThreshold must be >= 1".to_string());
        }
        if self.drowsiness.yawn_frames_threshold == 0 {
            return Err("drowsiness.yawnFramesThreshold must be >= 1".to_string());
        }
        if self.attention.pitch_threshold <= 0.0 || self.attention.yaw_threshold <= 0.0 {
            return Err("attention angle thresholds must be positive".to_string());
        }
        if self.attention.not_looking_frames_threshold == 0 {
            return Err("attention.notLookingFramesThreshold must be >= 1".to_string());
        }
        if self.attention.calibration_samples < 2 {
            return Err("attention.calibrationSamples must be >= 2".to_string());
        }
        if self.attention.stability_threshold_deg <= 0.0 {
            return Err("attention.stabilityThresholdDeg must be positive".to_string());
        }
        if self.attention.pose_smooth_window == 0 {
            return Err("attention.poseSmoothWindow must be >= 1".to_string());
        }
        if self.emotion.history_size == 0 {
            return Err("emotion.historySize must be >= 1".to_string());
        }
        if self.emotion.min_history_for_smoothing > self.emotion.history_size {
            return Err(
                "emotion.minHistoryForSmoothing must not exceed historySize".to_string(),
            );
        }
        if self.process_every_n_frames == 0 {
            return Err("processEveryNFrames must be >= 1".to_string());
        }
        Ok(())
    }
}

pub fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

pub fn env_or_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    match env::var(key) {
        Ok(raw) => match raw.parse::<T>() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(key, value = %raw, "Failed to parse env var, using default");
                default
            }
        },
        Err(_) => default,
    }
}

pub fn env_or_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}
