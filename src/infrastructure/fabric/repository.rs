//! 로컬 저장소에서 게시 대상 아이템 폴더를 찾는 스캐너.
//!
//! 아이템 폴더는 `.platform` 메타데이터 파일로 식별한다.
//! 나머지 파일은 내용을 해석하지 않고 base64 정의 파트로 그대로 싣는다.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use tracing::debug;
use walkdir::WalkDir;

use crate::domain::item::{DefinitionPart, ItemType, RepositoryItem};

pub const PLATFORM_FILE: &str = ".platform";

#[derive(Debug, Deserialize)]
struct PlatformFile {
    metadata: PlatformMetadata,
    #[serde(default)]
    config: Option<PlatformConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlatformMetadata {
    #[serde(rename = "type")]
    item_type: String,
    display_name: String,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlatformConfig {
    #[serde(default)]
    logical_id: Option<String>,
}

/// `repository_directory` 아래의 범위 내 아이템을 (type, name) 순으로 반환한다.
pub fn scan_repository(
    repository_directory: &Path,
    scope: &[ItemType],
) -> Result<Vec<RepositoryItem>> {
    if !repository_directory.is_dir() {
        bail!(
            "repository directory does not exist: {}",
            repository_directory.display()
        );
    }

    let mut items = Vec::new();
    for entry in WalkDir::new(repository_directory).follow_links(false) {
        let entry = entry.with_context(|| {
            format!("failed to walk {}", repository_directory.display())
        })?;
        if !entry.file_type().is_file() || entry.file_name() != PLATFORM_FILE {
            continue;
        }
        if let Some(item) = read_item(entry.path(), scope)? {
            items.push(item);
        }
    }

    items.sort_by(|a, b| {
        (a.item_type, a.display_name.as_str()).cmp(&(b.item_type, b.display_name.as_str()))
    });

    let mut seen = HashSet::new();
    for item in &items {
        if !seen.insert((item.item_type, item.display_name.as_str())) {
            bail!(
                "duplicate {} '{}' in repository ({})",
                item.item_type,
                item.display_name,
                item.folder.display()
            );
        }
    }

    Ok(items)
}

fn read_item(platform_path: &Path, scope: &[ItemType]) -> Result<Option<RepositoryItem>> {
    let raw = fs::read_to_string(platform_path)
        .with_context(|| format!("failed to read {}", platform_path.display()))?;
    let platform: PlatformFile = serde_json::from_str(&raw)
        .with_context(|| format!("invalid item metadata in {}", platform_path.display()))?;

    let item_type = match platform.metadata.item_type.parse::<ItemType>() {
        Ok(t) if scope.contains(&t) => t,
        _ => {
            debug!(
                path = %platform_path.display(),
                item_type = %platform.metadata.item_type,
                "skipping item outside deploy scope"
            );
            return Ok(None);
        }
    };

    let folder = platform_path
        .parent()
        .context("item metadata file has no parent folder")?
        .to_path_buf();

    Ok(Some(RepositoryItem {
        item_type,
        display_name: platform.metadata.display_name,
        description: platform.metadata.description,
        logical_id: platform.config.and_then(|c| c.logical_id),
        parts: read_definition_parts(&folder)?,
        metadata: DefinitionPart {
            path: PLATFORM_FILE.to_string(),
            payload: STANDARD.encode(raw),
        },
        folder,
    }))
}

fn read_definition_parts(folder: &Path) -> Result<Vec<DefinitionPart>> {
    let mut parts = Vec::new();
    for entry in WalkDir::new(folder).follow_links(false) {
        let entry = entry.with_context(|| format!("failed to walk {}", folder.display()))?;
        if !entry.file_type().is_file() || entry.file_name() == PLATFORM_FILE {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(folder)
            .with_context(|| {
                format!("{} is outside {}", entry.path().display(), folder.display())
            })?;
        let path = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        let bytes = fs::read(entry.path())
            .with_context(|| format!("failed to read {}", entry.path().display()))?;

        parts.push(DefinitionPart {
            path,
            payload: STANDARD.encode(bytes),
        });
    }
    parts.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(parts)
}
