//! 이미지 인코더.
//!
//! 텍스트 추출 백엔드로 보낼 PNG 인코딩. Base64 변환은 전송 계층 몫.

use image::{ImageFormat, RgbaImage};
use lingshot_core::error::CoreError;
use lingshot_core::models::frame::Frame;
use std::io::Cursor;
use tracing::debug;

/// 프레임 → PNG 바이트
pub fn encode_png(frame: &Frame) -> Result<Vec<u8>, CoreError> {
    let image = RgbaImage::from_raw(frame.width(), frame.height(), frame.pixels().to_vec())
        .ok_or_else(|| CoreError::Internal("RGBA 버퍼로 이미지 생성 실패".to_string()))?;

    let mut buf = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(|e| CoreError::Internal(format!("PNG 인코딩 실패: {e}")))?;

    debug!(
        "PNG 인코딩: {}x{} → {} bytes",
        frame.width(),
        frame.height(),
        buf.len()
    );
    Ok(buf)
}
