//! # lingshot-network
//!
//! 외부 언어 모델 서버(LM Studio, OpenAI 호환, Anthropic) 어댑터.
//!
//! - [`ai_ocr_client`]: 비전 모델 기반 텍스트 추출 (`TextExtractor` 구현)
//! - [`ai_llm_client`]: SSE 스트리밍 번역 (`Translator` 구현)
//! - [`translation_parser`]: 모델 응답에서 번역문만 추려내기
//! - [`model_catalog`]: 사용 가능한 모델 목록 조회

pub mod ai_llm_client;
pub mod ai_ocr_client;
pub mod model_catalog;
pub mod provider;
pub mod translation_parser;
