//! 환경변수 읽기 포트 구현 어댑터.

use std::env;

use crate::application::ports::EnvReader;

/// 현재 프로세스 환경변수를 읽는 어댑터. 값을 쓰지는 않는다.
pub struct ProcessEnvReader;

impl EnvReader for ProcessEnvReader {
    fn var(&self, name: &str) -> Option<String> {
        env::var(name).ok()
    }
}
