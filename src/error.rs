use thiserror::Error;

/// 外部情绪分类器的失败原因。
///
/// 分类失败不会中断帧循环：管线记录日志后以 `Emotion::Unknown`
/// 与零置信度替补，下一帧即是重试。
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("model inference failed: {0}")]
    Inference(String),
    #[error("face crop unusable: {0}")]
    BadInput(String),
}
