//! Notes.

use crate::entity::{CollectionOrder, Entity, Timestamps};
use crate::{error::Result, validate, EntityId};
use serde::{Deserialize, Serialize};

/// A titled note with free-form content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteDraft {
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl Entity for Note {
    type Draft = NoteDraft;
    type Patch = NotePatch;

    const KIND: &'static str = "note";
    const ORDER: CollectionOrder = CollectionOrder::RecentlyUpdated;

    fn id(&self) -> &str {
        &self.id
    }

    fn timestamps(&self) -> &Timestamps {
        &self.timestamps
    }

    fn timestamps_mut(&mut self) -> &mut Timestamps {
        &mut self.timestamps
    }

    fn validate_draft(draft: &NoteDraft) -> Result<()> {
        validate::required_text("title", &draft.title).map(|_| ())
    }

    fn validate(&self) -> Result<()> {
        validate::required_text("title", &self.title).map(|_| ())
    }

    fn validate_patch(patch: &NotePatch) -> Result<()> {
        validate::patched_text("title", patch.title.as_deref())
    }

    fn from_draft(id: EntityId, draft: NoteDraft, timestamps: Timestamps) -> Self {
        Self {
            id,
            title: draft.title.trim().to_string(),
            content: draft.content,
            timestamps,
        }
    }

    fn merge(&mut self, patch: NotePatch) {
        if let Some(title) = patch.title {
            self.title = title.trim().to_string();
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
    }
}
