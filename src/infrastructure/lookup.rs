//! 워크스페이스 조회 CSV 파일 로더.

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord, Trim};

use crate::application::ports::TableLoad;
use crate::domain::environment::WorkspaceRecord;

const ENVIRONMENT_COLUMN: &str = "environment";
const WORKSPACE_ID_COLUMNS: [&str; 3] = ["workspace id", "workspace_id", "workspaceid"];

/// CSV 파일을 읽어 조회 행 목록을 만든다. 파일이 없으면 `TableLoad::Missing`.
pub fn read_workspace_table(path: &Path) -> Result<TableLoad> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(TableLoad::Missing),
        Err(err) => {
            return Err(err).with_context(|| format!("failed to open {}", path.display()));
        }
    };

    let records =
        parse_workspace_table(file).with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(TableLoad::Loaded(records))
}

/// 헤더 행의 `environment` / `workspace id` 컬럼(대소문자/공백 무시)을 찾아 행을 읽는다.
pub fn parse_workspace_table<R: Read>(reader: R) -> Result<Vec<WorkspaceRecord>> {
    let mut csv = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = csv.headers().context("missing header row")?.clone();
    let env_idx = column_index(&headers, &[ENVIRONMENT_COLUMN])
        .context("header row has no 'environment' column")?;
    let id_idx = column_index(&headers, &WORKSPACE_ID_COLUMNS)
        .context("header row has no 'workspace id' column")?;

    let mut records = Vec::new();
    for (line, row) in csv.records().enumerate() {
        let row = row.with_context(|| format!("malformed row {}", line + 2))?;
        let (Some(environment), Some(workspace_id)) = (row.get(env_idx), row.get(id_idx)) else {
            continue;
        };
        if environment.is_empty() {
            continue;
        }
        records.push(WorkspaceRecord::new(environment, workspace_id));
    }

    Ok(records)
}

fn column_index(headers: &StringRecord, names: &[&str]) -> Option<usize> {
    headers.iter().position(|h| {
        let normalised = h.trim().trim_start_matches('\u{feff}').to_lowercase();
        names.contains(&normalised.as_str())
    })
}
