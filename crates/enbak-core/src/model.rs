//! Domain records read from the local note database
//!
//! These mirror the subset of the remote service's data model that ends up in
//! an ENEX archive. Timestamps are milliseconds since the Unix epoch (UTC).

use serde::{Deserialize, Serialize};

/// A notebook; the optional stack is rendered as a parent directory
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Notebook {
    pub guid: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl Notebook {
    pub fn new(guid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            guid: guid.into(),
            name: name.into(),
            stack: None,
        }
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }
}

/// A synchronized note
///
/// `content` is the ENML document exactly as received; it is written into the
/// archive without re-escaping.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Note {
    pub guid: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub notebook_guid: String,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<NoteAttributes>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<Resource>,
}

fn default_active() -> bool {
    true
}

impl Note {
    /// Minimal active note, mostly useful for tests and tooling
    pub fn new(
        guid: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        notebook_guid: impl Into<String>,
    ) -> Self {
        Self {
            guid: guid.into(),
            title: title.into(),
            content: content.into(),
            notebook_guid: notebook_guid.into(),
            active: true,
            ..Default::default()
        }
    }

    /// Mark the note as trashed
    pub fn trashed(mut self) -> Self {
        self.active = false;
        self
    }
}

/// Optional per-note metadata
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NoteAttributes {
    pub author: Option<String>,
    pub source: Option<String>,
    pub source_url: Option<String>,
    pub source_application: Option<String>,
    pub reminder_order: Option<i64>,
    pub reminder_time: Option<i64>,
    pub reminder_done_time: Option<i64>,
}

impl NoteAttributes {
    pub fn is_empty(&self) -> bool {
        *self == NoteAttributes::default()
    }
}

/// A binary attachment embedded in a note
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Resource {
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
    pub mime: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default)]
    pub attachment: bool,
}

/// A checklist task attached to a note
///
/// `sort_weight` is an opaque string; tasks are ordered by comparing it
/// byte-wise, never numerically.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub note_guid: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub sort_weight: String,
    /// Filled in at export time, not persisted with the task
    #[serde(skip)]
    pub reminders: Vec<Reminder>,
}

impl Task {
    pub fn new(
        id: impl Into<String>,
        note_guid: impl Into<String>,
        label: impl Into<String>,
        sort_weight: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            note_guid: note_guid.into(),
            label: label.into(),
            sort_weight: sort_weight.into(),
            reminders: Vec::new(),
        }
    }
}

/// A reminder belonging to a task
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Reminder {
    pub id: String,
    pub task_id: String,
    pub reminder_date: i64,
}

impl Reminder {
    pub fn new(id: impl Into<String>, task_id: impl Into<String>, reminder_date: i64) -> Self {
        Self {
            id: id.into(),
            task_id: task_id.into(),
            reminder_date,
        }
    }
}

mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}
