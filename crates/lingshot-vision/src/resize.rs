//! 유사도 비교용 정규화.
//!
//! RGBA 프레임을 휘도(ITU-R 601) 평면으로 바꾼 뒤
//! fast_image_resize로 고정 크기 정사각형에 맞춘다.

use fast_image_resize::{images::Image as FirImage, PixelType, ResizeAlg, ResizeOptions, Resizer};
use lingshot_core::error::CoreError;
use lingshot_core::models::frame::Frame;

/// RGBA8 → 8비트 휘도 평면 (0.299R + 0.587G + 0.114B)
pub fn to_luma(frame: &Frame) -> Vec<u8> {
    frame
        .pixels()
        .chunks_exact(4)
        .map(|px| {
            let y = 0.299 * px[0] as f32 + 0.587 * px[1] as f32 + 0.114 * px[2] as f32;
            y.round().clamp(0.0, 255.0) as u8
        })
        .collect()
}

/// 프레임을 `size x size` 휘도 평면으로 정규화
pub fn normalized_luma(frame: &Frame, size: u32) -> Result<Vec<u8>, CoreError> {
    if frame.is_empty() {
        return Err(CoreError::Internal(format!(
            "빈 프레임: {}x{}",
            frame.width(),
            frame.height()
        )));
    }
    if size == 0 {
        return Err(CoreError::Internal("정규화 크기 0".to_string()));
    }

    let luma = to_luma(frame);
    if frame.width() == size && frame.height() == size {
        return Ok(luma);
    }

    let src = FirImage::from_vec_u8(frame.width(), frame.height(), luma, PixelType::U8)
        .map_err(|e| CoreError::Internal(format!("소스 이미지 생성 실패: {e}")))?;
    let mut dst = FirImage::new(size, size, PixelType::U8);

    let options = ResizeOptions::new().resize_alg(ResizeAlg::Convolution(
        fast_image_resize::FilterType::Bilinear,
    ));
    Resizer::new()
        .resize(&src, &mut dst, &options)
        .map_err(|e| CoreError::Internal(format!("리사이즈 실패: {e}")))?;

    Ok(dst.into_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingshot_core::models::frame::Source;

    fn solid(w: u32, h: u32, rgb: [u8; 3]) -> Frame {
        let pixels = (0..w * h)
            .flat_map(|_| [rgb[0], rgb[1], rgb[2], 255])
            .collect();
        Frame::from_rgba(Source::FullScreen, w, h, pixels).unwrap()
    }

    #[test]
    fn luma_weights() {
        let white = to_luma(&solid(1, 1, [255, 255, 255]));
        assert_eq!(white, vec![255]);
        let red = to_luma(&solid(1, 1, [255, 0, 0]));
        assert_eq!(red, vec![76]);
    }

    #[test]
    fn normalizes_to_square() {
        let plane = normalized_luma(&solid(320, 180, [10, 20, 30]), 64).unwrap();
        assert_eq!(plane.len(), 64 * 64);
    }

    #[test]
    fn empty_frame_is_error() {
        let empty = Frame::from_rgba(Source::FullScreen, 0, 10, vec![]).unwrap();
        assert!(normalized_luma(&empty, 64).is_err());
    }
}
