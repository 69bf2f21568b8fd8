//! Todo items.

use crate::entity::{CollectionOrder, Entity, Timestamps};
use crate::{error::Result, validate, EntityId};
use serde::{Deserialize, Serialize};

/// A todo item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub done: bool,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

/// Input for creating a todo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoDraft {
    pub title: String,
    #[serde(default)]
    pub done: bool,
}

impl TodoDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            done: false,
        }
    }
}

/// Partial update for a todo.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub done: Option<bool>,
}

impl TodoPatch {
    /// Patch that only sets the completion flag.
    pub fn done(done: bool) -> Self {
        Self {
            done: Some(done),
            ..Self::default()
        }
    }

    /// Patch that only renames the todo.
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }
}

impl Entity for Todo {
    type Draft = TodoDraft;
    type Patch = TodoPatch;

    const KIND: &'static str = "todo";
    const ORDER: CollectionOrder = CollectionOrder::NewestFirst;

    fn id(&self) -> &str {
        &self.id
    }

    fn timestamps(&self) -> &Timestamps {
        &self.timestamps
    }

    fn timestamps_mut(&mut self) -> &mut Timestamps {
        &mut self.timestamps
    }

    fn validate_draft(draft: &TodoDraft) -> Result<()> {
        validate::required_text("title", &draft.title).map(|_| ())
    }

    fn validate(&self) -> Result<()> {
        validate::required_text("title", &self.title).map(|_| ())
    }

    fn validate_patch(patch: &TodoPatch) -> Result<()> {
        validate::patched_text("title", patch.title.as_deref())
    }

    fn from_draft(id: EntityId, draft: TodoDraft, timestamps: Timestamps) -> Self {
        Self {
            id,
            title: draft.title.trim().to_string(),
            done: draft.done,
            timestamps,
        }
    }

    fn merge(&mut self, patch: TodoPatch) {
        if let Some(title) = patch.title {
            self.title = title.trim().to_string();
        }
        if let Some(done) = patch.done {
            self.done = done;
        }
    }
}
