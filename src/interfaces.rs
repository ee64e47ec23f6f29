//! 外部协作者的能力接口。
//!
//! 人脸检测、关键点提取与情绪分类都是外部模型调用，核心管线只
//! 依赖这三个 trait，替换检测器/分类器不需要触碰融合逻辑。
//! `F` 为调用方自选的帧类型（图像缓冲），核心不解释其内容。

use crate::error::ClassifierError;
use crate::types::{FaceBox, LandmarkSnapshot, RawPrediction};

/// 人脸检测器：给定一帧图像，返回包围盒或 None。
pub trait FaceDetector<F> {
    fn detect(&mut self, frame: &F) -> Option<FaceBox>;

    /// 按包围盒裁剪出人脸区域，供情绪分类器使用。
    fn crop_face(&self, frame: &F, bbox: &FaceBox) -> F;
}

/// 关键点提取器：给定一帧图像，返回 `LandmarkSnapshot` 或 None。
pub trait LandmarkExtractor<F> {
    fn extract(&mut self, frame: &F) -> Option<LandmarkSnapshot>;

    /// 释放持有的模型资源；此后不再调用 `extract`。
    fn release(&mut self);
}

/// 情绪分类器：给定人脸裁剪图，返回固定标签集上的概率分布。
pub trait EmotionClassifier<F> {
    fn classify(&mut self, face: &F) -> Result<RawPrediction, ClassifierError>;
}
