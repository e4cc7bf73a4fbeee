//! # lingshot-vision
//!
//! 이미지 처리 크레이트.
//! 화면/창 캡처, 프레임 유사도 판정(SSIM), 최근 프레임 캐시,
//! PNG 인코딩, 로컬 Tesseract OCR을 담당한다.

pub mod capture;
pub mod encoder;
pub mod frame_cache;
pub mod local_ocr_provider;
#[cfg(feature = "ocr")]
pub mod ocr;
pub mod resize;
pub mod similarity;
