//! 워크스페이스 조회 테이블 포트 구현 어댑터.

use std::path::Path;

use anyhow::Result;

use crate::application::ports::{TableLoad, WorkspaceTableSource};
use crate::infrastructure::lookup::read_workspace_table;

/// CSV 파일 기반 조회 테이블 어댑터.
pub struct CsvWorkspaceTable;

impl WorkspaceTableSource for CsvWorkspaceTable {
    fn load(&self, path: &Path) -> Result<TableLoad> {
        read_workspace_table(path)
    }
}
