//! Fabric 워크스페이스 연동 계층.
//! 로컬 저장소 스캔과 REST API 호출을 묶는다.

pub mod client;
pub mod repository;

pub use client::FabricRestClient;
pub use repository::scan_repository;
