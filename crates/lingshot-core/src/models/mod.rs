//! LINGSHOT 도메인 모델.
//!
//! 파이프라인·웹·앱이 공유하는 데이터 구조체를 정의한다.
//! [`frame::Frame`]을 제외한 모든 모델은 `serde` Serialize/Deserialize를 구현한다.

pub mod event;
pub mod frame;
pub mod model;
pub mod status;
pub mod task;
