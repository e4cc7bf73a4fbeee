//! 프레임 유사도 게이트.
//!
//! 두 프레임을 같은 크기의 휘도 평면으로 정규화한 뒤 전역 SSIM을 계산한다.
//! 점수가 임계값 이상이면 "변경 없음"으로 판단해 번역을 건너뛴다.
//! 비교 자체가 실패하면 "다름"으로 처리한다 (변경을 놓치지 않도록).

use lingshot_core::error::CoreError;
use lingshot_core::models::frame::Frame;
use tracing::{debug, warn};

use crate::resize::normalized_luma;

/// 기본 정규화 크기 (512x512)
pub const DEFAULT_COMPARE_SIZE: u32 = 512;

const L: f64 = 255.0;
const C1: f64 = (0.01 * L) * (0.01 * L);
const C2: f64 = (0.03 * L) * (0.03 * L);

/// SSIM 기반 유사도 판정기
#[derive(Debug, Clone, Copy)]
pub struct SimilarityGate {
    size: u32,
}

impl SimilarityGate {
    pub fn new(size: u32) -> Self {
        Self { size }
    }

    /// 비교 시 정규화 크기
    pub fn size(&self) -> u32 {
        self.size
    }

    /// 전역 SSIM 점수 (-1.0 ~ 1.0)
    pub fn score(&self, a: &Frame, b: &Frame) -> Result<f64, CoreError> {
        let x = normalized_luma(a, self.size)?;
        let y = normalized_luma(b, self.size)?;
        Ok(global_ssim(&x, &y))
    }

    /// `score >= threshold`이면 true. 계산 실패 시 false.
    pub fn is_similar(&self, a: &Frame, b: &Frame, threshold: f64) -> bool {
        match self.score(a, b) {
            Ok(score) => {
                debug!(score, threshold, "프레임 유사도");
                score >= threshold
            }
            Err(e) => {
                warn!("유사도 계산 실패, 변경으로 처리: {e}");
                false
            }
        }
    }
}

impl Default for SimilarityGate {
    fn default() -> Self {
        Self::new(DEFAULT_COMPARE_SIZE)
    }
}

/// 동일 길이 8비트 평면의 단일 윈도우 SSIM
fn global_ssim(x: &[u8], y: &[u8]) -> f64 {
    let n = x.len().min(y.len());
    if n == 0 {
        return 0.0;
    }
    let nf = n as f64;

    let (mut sum_x, mut sum_y) = (0.0f64, 0.0f64);
    for i in 0..n {
        sum_x += x[i] as f64;
        sum_y += y[i] as f64;
    }
    let mean_x = sum_x / nf;
    let mean_y = sum_y / nf;

    let (mut var_x, mut var_y, mut cov) = (0.0f64, 0.0f64, 0.0f64);
    for i in 0..n {
        let dx = x[i] as f64 - mean_x;
        let dy = y[i] as f64 - mean_y;
        var_x += dx * dx;
        var_y += dy * dy;
        cov += dx * dy;
    }
    var_x /= nf;
    var_y /= nf;
    cov /= nf;

    let numerator = (2.0 * mean_x * mean_y + C1) * (2.0 * cov + C2);
    let denominator = (mean_x * mean_x + mean_y * mean_y + C1) * (var_x + var_y + C2);
    numerator / denominator
}
