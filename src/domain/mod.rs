//! Domain layer
//! 배포 규칙(값 객체/엔티티/도메인 정책)을 외부 시스템 접근 없이 표현한다.

pub mod environment;
pub mod error;
pub mod item;
pub mod policy;
pub mod token;

pub use error::DeployError;
