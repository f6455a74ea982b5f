//! Infrastructure layer
//! 외부 시스템(identity provider/Fabric API/파일시스템)과 직접 통신하는 구현체 집합.

pub mod adapters;
pub mod config;
pub mod fabric;
pub mod identity;
pub mod lookup;
