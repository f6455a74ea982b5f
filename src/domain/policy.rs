//! 도메인 정책(워크스페이스 조회 규칙, 게시/정리 계획).

use crate::domain::environment::{EnvironmentName, WorkspaceId, WorkspaceRecord};
use crate::domain::item::{ItemType, RemoteItem, RepositoryItem};

/// 조회 테이블에서 환경에 해당하는 워크스페이스 ID를 찾는다.
/// 대소문자/공백 무시 정확 일치, 첫 번째 일치 행 우선. ID가 빈 행은 건너뛴다.
pub fn find_workspace_id(
    records: &[WorkspaceRecord],
    environment: &EnvironmentName,
) -> Option<WorkspaceId> {
    records
        .iter()
        .filter(|r| environment.matches(&r.environment))
        .find_map(|r| WorkspaceId::new(&r.workspace_id))
}

/// 로컬 아이템 하나에 대한 게시 동작.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishAction {
    Create,
    Update { item_id: String },
}

#[derive(Debug, Clone)]
pub struct PlannedPublish<'a> {
    pub item: &'a RepositoryItem,
    pub action: PublishAction,
}

/// 로컬 아이템마다 생성/갱신 여부를 결정한다.
pub fn plan_publish<'a>(
    local: &'a [RepositoryItem],
    remote: &[RemoteItem],
) -> Vec<PlannedPublish<'a>> {
    local
        .iter()
        .map(|item| {
            let existing = remote.iter().find(|r| {
                r.item_type == item.item_type.as_str() && r.display_name == item.display_name
            });
            let action = match existing {
                Some(r) => PublishAction::Update {
                    item_id: r.id.clone(),
                },
                None => PublishAction::Create,
            };
            PlannedPublish { item, action }
        })
        .collect()
}

/// 범위 안 타입이면서 로컬 저장소에 없는 원격 아이템(orphan)을 고른다.
pub fn find_orphans<'a>(
    local: &[RepositoryItem],
    remote: &'a [RemoteItem],
    scope: &[ItemType],
) -> Vec<&'a RemoteItem> {
    remote
        .iter()
        .filter(|r| {
            let Some(item_type) = r.scoped_type(scope) else {
                return false;
            };
            !local
                .iter()
                .any(|l| l.item_type == item_type && l.display_name == r.display_name)
        })
        .collect()
}
