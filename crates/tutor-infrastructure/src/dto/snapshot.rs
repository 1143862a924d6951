//! Snapshot wire format.
//!
//! ```json
//! {
//!   "active":   {"Chat 1": [{"user": "2+2", "bot": "4"}]},
//!   "archived": {"Old":    [{"user": "hi", "bot": "hello"}],
//!                "Old.__meta__": {"ai": true}},
//!   "meta":     {"Chat 1": {"ai": true}}
//! }
//! ```
//!
//! The store keeps only these three sections, so archived metadata rides
//! inside `archived` under `"<id>.__meta__"`. Metadata entries are told apart
//! from chats by their object shape, so a chat whose own name ends in the
//! suffix still reads as a chat.

use super::chat::TurnDto;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tutor_core::chat::{ArchivedChat, ChatMetadata, ChatSnapshot, Turn};

/// Key suffix of archived metadata entries.
pub const LEGACY_META_SUFFIX: &str = ".__meta__";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaDto {
    #[serde(default)]
    pub ai: bool,
}

impl From<MetaDto> for ChatMetadata {
    fn from(dto: MetaDto) -> Self {
        ChatMetadata { ai: dto.ai }
    }
}

impl From<ChatMetadata> for MetaDto {
    fn from(meta: ChatMetadata) -> Self {
        MetaDto { ai: meta.ai }
    }
}

/// A value of the `archived` map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArchivedEntryDto {
    Turns(Vec<TurnDto>),
    LegacyMeta(MetaDto),
    Unknown(serde_json::Value),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotDto {
    #[serde(default)]
    pub active: IndexMap<String, Vec<TurnDto>>,
    #[serde(default)]
    pub archived: IndexMap<String, ArchivedEntryDto>,
    #[serde(default)]
    pub meta: IndexMap<String, MetaDto>,
}

fn meta_key(id: &str) -> String {
    format!("{}{}", id, LEGACY_META_SUFFIX)
}

impl SnapshotDto {
    pub fn into_domain(self) -> ChatSnapshot {
        let active = self
            .active
            .into_iter()
            .map(|(id, turns)| (id, turns.into_iter().map(Turn::from).collect()))
            .collect();

        let mut archived: IndexMap<String, ArchivedChat> = IndexMap::new();
        let mut archived_meta: IndexMap<String, MetaDto> = IndexMap::new();
        for (key, entry) in self.archived {
            match entry {
                ArchivedEntryDto::Turns(turns) => {
                    archived.insert(
                        key,
                        ArchivedChat {
                            turns: turns.into_iter().map(Turn::from).collect(),
                            metadata: None,
                        },
                    );
                }
                ArchivedEntryDto::LegacyMeta(meta) => match key.strip_suffix(LEGACY_META_SUFFIX) {
                    Some(id) => {
                        archived_meta.entry(id.to_string()).or_insert(meta);
                    }
                    None => {
                        tracing::warn!("[SnapshotDto] Ignoring archived metadata entry '{}'", key);
                    }
                },
                ArchivedEntryDto::Unknown(_) => {
                    tracing::warn!("[SnapshotDto] Ignoring unreadable archived entry '{}'", key);
                }
            }
        }

        for (id, meta) in archived_meta {
            match archived.get_mut(&id) {
                Some(chat) => chat.metadata = Some(meta.into()),
                None => tracing::warn!(
                    "[SnapshotDto] Dropping metadata for unknown archived chat '{}'",
                    id
                ),
            }
        }

        let meta = self
            .meta
            .into_iter()
            .map(|(id, m)| (id, ChatMetadata::from(m)))
            .collect();

        ChatSnapshot {
            active,
            archived,
            meta,
        }
    }

    pub fn from_domain(snapshot: &ChatSnapshot) -> Self {
        let active = snapshot
            .active
            .iter()
            .map(|(id, turns)| (id.clone(), turns.iter().map(TurnDto::from).collect()))
            .collect();
        let mut archived = IndexMap::new();
        for (id, chat) in &snapshot.archived {
            archived.insert(
                id.clone(),
                ArchivedEntryDto::Turns(chat.turns.iter().map(TurnDto::from).collect()),
            );
        }
        for (id, chat) in &snapshot.archived {
            let Some(meta) = chat.metadata else {
                continue;
            };
            let key = meta_key(id);
            if archived.contains_key(&key) {
                tracing::warn!(
                    "[SnapshotDto] Archived chat '{}' occupies the metadata key of '{}'",
                    key,
                    id
                );
                continue;
            }
            archived.insert(key, ArchivedEntryDto::LegacyMeta(meta.into()));
        }
        let meta = snapshot
            .meta
            .iter()
            .map(|(id, m)| (id.clone(), MetaDto::from(*m)))
            .collect();

        Self {
            active,
            archived,
            meta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_metadata_entries_are_folded_in() {
        let dto: SnapshotDto = serde_json::from_value(json!({
            "active": {"Chat 1": []},
            "archived": {
                "Calculus": [{"user": "d/dx x^2", "bot": "2x"}],
                "Calculus.__meta__": {"ai": true},
                "Ghost.__meta__": {"ai": true}
            },
            "meta": {}
        }))
        .unwrap();
        let snapshot = dto.into_domain();
        assert_eq!(snapshot.archived.len(), 1);
        let calculus = &snapshot.archived["Calculus"];
        assert_eq!(calculus.metadata, Some(ChatMetadata::ai()));
        assert_eq!(calculus.turns[0].bot, "2x");
    }

    #[test]
    fn test_chat_named_like_the_legacy_suffix_is_a_chat() {
        let dto: SnapshotDto = serde_json::from_value(json!({
            "active": {"notes.__meta__": [{"user": "a", "bot": "b"}]},
            "archived": {"x.__meta__": [{"user": "c"}]}
        }))
        .unwrap();
        let snapshot = dto.into_domain();
        assert!(snapshot.active.contains_key("notes.__meta__"));
        assert_eq!(snapshot.archived["x.__meta__"].turns[0].user, "c");
    }

    #[test]
    fn test_written_format_keeps_three_sections() {
        let mut snapshot = ChatSnapshot::default();
        snapshot.active.insert("Chat 1".into(), vec![Turn::pending("hi")]);
        snapshot.archived.insert(
            "Old".into(),
            ArchivedChat {
                turns: vec![],
                metadata: Some(ChatMetadata::ai()),
            },
        );
        let value = serde_json::to_value(SnapshotDto::from_domain(&snapshot)).unwrap();
        assert_eq!(
            value,
            json!({
                "active": {"Chat 1": [{"user": "hi", "bot": ""}]},
                "archived": {"Old": [], "Old.__meta__": {"ai": true}},
                "meta": {}
            })
        );
        assert_eq!(
            SnapshotDto::from_domain(&snapshot).into_domain(),
            snapshot
        );
    }

    #[test]
    fn test_chat_holding_a_metadata_key_wins() {
        let mut snapshot = ChatSnapshot::default();
        snapshot.archived.insert(
            "Old".into(),
            ArchivedChat {
                turns: vec![],
                metadata: Some(ChatMetadata::ai()),
            },
        );
        snapshot.archived.insert(
            "Old.__meta__".into(),
            ArchivedChat {
                turns: vec![Turn::pending("kept")],
                metadata: None,
            },
        );
        let dto = SnapshotDto::from_domain(&snapshot);
        assert!(matches!(dto.archived["Old.__meta__"], ArchivedEntryDto::Turns(_)));

        let reread = dto.into_domain();
        assert_eq!(reread.archived["Old.__meta__"].turns[0].user, "kept");
        assert_eq!(reread.archived["Old"].metadata, None);
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let dto: SnapshotDto = serde_json::from_value(json!({})).unwrap();
        let snapshot = dto.into_domain();
        assert_eq!(snapshot.chat_count(), 0);
    }

    #[test]
    fn test_unreadable_archived_entry_is_skipped() {
        let dto: SnapshotDto =
            serde_json::from_value(json!({"archived": {"weird": 42, "ok": []}})).unwrap();
        let snapshot = dto.into_domain();
        assert_eq!(snapshot.archived.keys().collect::<Vec<_>>(), vec!["ok"]);
    }
}
