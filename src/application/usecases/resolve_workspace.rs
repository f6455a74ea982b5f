//! 배포 대상 워크스페이스 ID 해석 유스케이스.
//! CSV 조회 테이블을 먼저 보고, 실패하면 환경변수 fallback을 사용한다.

use std::path::Path;

use anyhow::Result;
use tracing::{debug, warn};

use crate::application::ports::{EnvReader, TableLoad, WorkspaceTableSource};
use crate::domain::DeployError;
use crate::domain::environment::{EnvironmentName, WorkspaceId};
use crate::domain::policy::find_workspace_id;

/// 테이블 조회가 fallback으로 넘어간 이유.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Miss {
    Missing,
    Unreadable,
    NoMatch,
}

pub struct ResolveWorkspaceUseCase<'a> {
    pub table_source: &'a dyn WorkspaceTableSource,
    pub env: &'a dyn EnvReader,
}

impl<'a> ResolveWorkspaceUseCase<'a> {
    /// `table_path`에서 환경에 맞는 행을 찾고, 없으면 `fallback_env` 값을 사용한다.
    pub fn execute(
        &self,
        environment: &EnvironmentName,
        table_path: &Path,
        fallback_env: &str,
    ) -> Result<WorkspaceId> {
        let miss = match self.table_source.load(table_path) {
            Ok(TableLoad::Loaded(records)) => {
                if let Some(id) = find_workspace_id(&records, environment) {
                    debug!(
                        environment = environment.as_str(),
                        workspace_id = id.as_str(),
                        "workspace resolved from lookup table"
                    );
                    return Ok(id);
                }
                debug!(
                    environment = environment.as_str(),
                    rows = records.len(),
                    "no lookup row for environment"
                );
                Miss::NoMatch
            }
            Ok(TableLoad::Missing) => {
                debug!(path = %table_path.display(), "lookup table not found");
                Miss::Missing
            }
            Err(err) => {
                warn!(path = %table_path.display(), "ignoring unreadable lookup table: {err:#}");
                Miss::Unreadable
            }
        };

        if let Some(id) = self.env.var(fallback_env).as_deref().and_then(WorkspaceId::new) {
            debug!(variable = fallback_env, "workspace resolved from environment");
            return Ok(id);
        }

        let detail = format!(
            "no workspace id for environment '{}': {} and {fallback_env} is not set",
            environment.as_str(),
            match miss {
                Miss::Missing => format!("{} does not exist", table_path.display()),
                Miss::Unreadable => format!("{} could not be read", table_path.display()),
                Miss::NoMatch => format!("{} has no matching row", table_path.display()),
            },
        );
        let err = match miss {
            Miss::NoMatch | Miss::Unreadable => DeployError::lookup(detail),
            Miss::Missing => DeployError::configuration(detail),
        };
        Err(err.into())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::PathBuf;

    use anyhow::anyhow;

    use super::*;
    use crate::domain::environment::WorkspaceRecord;

    struct MapEnv(HashMap<String, String>);

    impl EnvReader for MapEnv {
        fn var(&self, name: &str) -> Option<String> {
            self.0.get(name).cloned()
        }
    }

    enum FakeTable {
        Missing,
        Broken,
        Rows(Vec<WorkspaceRecord>),
    }

    impl WorkspaceTableSource for FakeTable {
        fn load(&self, _path: &Path) -> Result<TableLoad> {
            match self {
                FakeTable::Missing => Ok(TableLoad::Missing),
                FakeTable::Broken => Err(anyhow!("bad csv")),
                FakeTable::Rows(rows) => Ok(TableLoad::Loaded(rows.clone())),
            }
        }
    }

    fn env_with(pairs: &[(&str, &str)]) -> MapEnv {
        MapEnv(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    fn resolve(table: &FakeTable, env: &MapEnv, name: &str) -> Result<WorkspaceId> {
        let use_case = ResolveWorkspaceUseCase {
            table_source: table,
            env,
        };
        use_case.execute(
            &EnvironmentName::parse(name).unwrap(),
            &PathBuf::from("deploy/workspaces.csv"),
            "FABRIC_WORKSPACE_ID",
        )
    }

    fn rows() -> FakeTable {
        FakeTable::Rows(vec![
            WorkspaceRecord::new("dev", "WS-123"),
            WorkspaceRecord::new("prod", "WS-999"),
        ])
    }

    #[test]
    fn table_match_wins_over_fallback() {
        let env = env_with(&[("FABRIC_WORKSPACE_ID", "WS-FALLBACK")]);
        let id = resolve(&rows(), &env, " PROD ").unwrap();
        assert_eq!(id.as_str(), "WS-999");
    }

    #[test]
    fn no_match_uses_fallback() {
        let env = env_with(&[("FABRIC_WORKSPACE_ID", " WS-FALLBACK ")]);
        let id = resolve(&rows(), &env, "test").unwrap();
        assert_eq!(id.as_str(), "WS-FALLBACK");
    }

    #[test]
    fn no_match_without_fallback_is_lookup_error() {
        let env = env_with(&[]);
        let err = resolve(&rows(), &env, "test").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DeployError>(),
            Some(DeployError::Lookup(_))
        ));
    }

    #[test]
    fn missing_table_falls_back_silently() {
        let env = env_with(&[("FABRIC_WORKSPACE_ID", "WS-FALLBACK")]);
        let id = resolve(&FakeTable::Missing, &env, "anything").unwrap();
        assert_eq!(id.as_str(), "WS-FALLBACK");
    }

    #[test]
    fn broken_table_falls_back() {
        let env = env_with(&[("FABRIC_WORKSPACE_ID", "WS-FALLBACK")]);
        let id = resolve(&FakeTable::Broken, &env, "dev").unwrap();
        assert_eq!(id.as_str(), "WS-FALLBACK");
    }

    #[test]
    fn broken_table_without_fallback_is_lookup_error() {
        let env = env_with(&[]);
        let err = resolve(&FakeTable::Broken, &env, "dev").unwrap_err();
        match err.downcast_ref::<DeployError>() {
            Some(DeployError::Lookup(msg)) => assert!(msg.contains("could not be read")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn blank_fallback_is_configuration_error() {
        let env = env_with(&[("FABRIC_WORKSPACE_ID", "   ")]);
        let err = resolve(&FakeTable::Missing, &env, "dev").unwrap_err();
        match err.downcast_ref::<DeployError>() {
            Some(DeployError::Configuration(msg)) => {
                assert!(msg.contains("FABRIC_WORKSPACE_ID"));
                assert!(msg.contains("'dev'"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
