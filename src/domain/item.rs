//! 배포 대상 워크스페이스 아이템 엔티티.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// 배포 범위에 포함될 수 있는 아이템 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ItemType {
    Notebook,
    DataPipeline,
    Environment,
}

impl ItemType {
    /// 기본 배포 범위.
    pub const ALL: [ItemType; 3] = [
        ItemType::Notebook,
        ItemType::DataPipeline,
        ItemType::Environment,
    ];

    /// 원격 API가 사용하는 타입 이름.
    pub fn as_str(self) -> &'static str {
        match self {
            ItemType::Notebook => "Notebook",
            ItemType::DataPipeline => "DataPipeline",
            ItemType::Environment => "Environment",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Notebook" => Ok(ItemType::Notebook),
            "DataPipeline" => Ok(ItemType::DataPipeline),
            "Environment" => Ok(ItemType::Environment),
            other => Err(format!("unsupported item type: {other}")),
        }
    }
}

/// 아이템 정의를 구성하는 파일 하나(base64 인코딩).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionPart {
    pub path: String,
    pub payload: String,
}

/// 로컬 저장소에 있는 배포 대상 아이템.
#[derive(Debug, Clone)]
pub struct RepositoryItem {
    pub item_type: ItemType,
    pub display_name: String,
    pub description: Option<String>,
    pub logical_id: Option<String>,
    pub folder: PathBuf,
    pub parts: Vec<DefinitionPart>,
    /// `.platform` 파일 파트. 메타데이터까지 갱신할 때만 함께 보낸다.
    pub metadata: DefinitionPart,
}

/// 원격 워크스페이스에 이미 존재하는 아이템.
/// 범위 밖 타입도 받을 수 있도록 타입은 문자열 그대로 보관한다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteItem {
    pub id: String,
    pub item_type: String,
    pub display_name: String,
}

impl RemoteItem {
    /// 타입이 배포 범위 안에 있으면 파싱된 타입을 반환한다.
    pub fn scoped_type(&self, scope: &[ItemType]) -> Option<ItemType> {
        let parsed = self.item_type.parse::<ItemType>().ok()?;
        scope.contains(&parsed).then_some(parsed)
    }
}
