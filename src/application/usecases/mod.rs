//! 배포 유스케이스 모음.

pub mod deploy;
pub mod resolve_workspace;
