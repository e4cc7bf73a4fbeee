//! # lingshot-pipeline
//!
//! 화면 번역 파이프라인.
//! 선택된 캡처 대상을 주기적으로 감시하고([`monitor::MonitorLoop`]),
//! 화면이 바뀌면 캡처 → 텍스트 추출 → 스트리밍 번역 작업을 한 번에 하나만 실행한다
//! ([`task::TaskController`]). 진행 상황은 [`event_sink::EventSink`]로 구독자에게 전달된다.
//!
//! 외부 제어는 [`engine::Engine`] 하나로 모인다.

pub mod engine;
pub mod event_sink;
pub mod journal;
pub mod monitor;
pub mod results;
pub mod state;
pub mod task;

#[cfg(test)]
pub(crate) mod testing;
