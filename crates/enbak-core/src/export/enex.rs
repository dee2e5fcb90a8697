//! ENEX document serialization
//!
//! An archive is written in three phases: [`EnexWriter::write_header`], one
//! [`EnexWriter::write_note`] per note, then [`EnexWriter::write_footer`].
//! The writer keeps no state between documents.

use std::io::{self, Write};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};

use crate::model::{Note, NoteAttributes, Resource, Task};

pub const ENEX_HEAD: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
    "<!DOCTYPE en-export SYSTEM \"http://xml.evernote.com/pub/evernote-export4.dtd\">\n",
);
pub const ENEX_TAIL: &str = "</en-export>\n";

pub const APPLICATION_NAME: &str = "Evernote";
pub const APPLICATION_VERSION: &str = "10.134.4";

const CONTENT_XML_DECLARATION: &str =
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>";

const BASE64_LINE_WIDTH: usize = 76;

/// 0001-01-01T00:00:00Z
const MIN_TIMESTAMP_MS: i64 = -62_135_596_800_000;
/// 9999-12-31T23:59:59.999Z
const MAX_TIMESTAMP_MS: i64 = 253_402_300_799_999;

/// Format an epoch-millisecond timestamp as `YYYYMMDDTHHMMSSZ`
///
/// Values outside years 1..=9999 are clamped to the nearest end of the range.
pub fn format_timestamp(millis: i64) -> String {
    let clamped = millis.clamp(MIN_TIMESTAMP_MS, MAX_TIMESTAMP_MS);
    DateTime::<Utc>::from_timestamp_millis(clamped)
        .map(|dt| format_datetime(&dt))
        .unwrap_or_default()
}

pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Escape the five XML special characters
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Options that shape a document
#[derive(Debug, Clone, Copy, Default)]
pub struct EnexOptions {
    /// Leave out the `export-date` attribute
    pub no_export_date: bool,
    /// Emit `<guid>` for every note
    pub add_guid: bool,
}

/// Streams one ENEX document into `W`
pub struct EnexWriter<W: Write> {
    out: W,
    options: EnexOptions,
}

impl<W: Write> EnexWriter<W> {
    pub fn new(out: W, options: EnexOptions) -> Self {
        Self { out, options }
    }

    /// Prologue stamped with the current time
    pub fn write_header(&mut self) -> io::Result<()> {
        self.write_header_at(Utc::now())
    }

    /// Prologue stamped with `now` (ignored when the date is suppressed)
    pub fn write_header_at(&mut self, now: DateTime<Utc>) -> io::Result<()> {
        self.out.write_all(ENEX_HEAD.as_bytes())?;

        if self.options.no_export_date {
            writeln!(
                self.out,
                "<en-export application=\"{}\" version=\"{}\">",
                APPLICATION_NAME, APPLICATION_VERSION
            )
        } else {
            writeln!(
                self.out,
                "<en-export export-date=\"{}\" application=\"{}\" version=\"{}\">",
                format_datetime(&now),
                APPLICATION_NAME,
                APPLICATION_VERSION
            )
        }
    }

    /// One `<note>` block; `tasks` must already be in output order
    pub fn write_note(&mut self, note: &Note, tasks: &[Task]) -> io::Result<()> {
        let block = format_note(note, tasks, self.options.add_guid);
        self.out.write_all(block.as_bytes())
    }

    pub fn write_footer(&mut self) -> io::Result<()> {
        self.out.write_all(ENEX_TAIL.as_bytes())?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Render a complete `<note>` element, two-space indented
pub fn format_note(note: &Note, tasks: &[Task], add_guid: bool) -> String {
    let mut out = String::new();
    out.push_str("  <note>\n");

    if add_guid && !note.guid.is_empty() {
        push_element(&mut out, 4, "guid", &escape_xml(&note.guid));
    }
    if !note.title.is_empty() {
        push_element(&mut out, 4, "title", &escape_xml(&note.title));
    }
    if let Some(created) = note.created {
        push_element(&mut out, 4, "created", &format_timestamp(created));
    }
    if let Some(updated) = note.updated {
        push_element(&mut out, 4, "updated", &format_timestamp(updated));
    }
    for tag in &note.tags {
        push_element(&mut out, 4, "tag", &escape_xml(tag));
    }
    if let Some(attributes) = note.attributes.as_ref().filter(|a| !a.is_empty()) {
        push_attributes(&mut out, attributes);
    }
    if !note.content.is_empty() {
        push_content(&mut out, &note.content);
    }
    for resource in &note.resources {
        push_resource(&mut out, resource);
    }
    for task in tasks {
        push_task(&mut out, task);
    }

    out.push_str("  </note>\n");
    out
}

fn push_element(out: &mut String, indent: usize, name: &str, value: &str) {
    out.push_str(&format!(
        "{:indent$}<{name}>{value}</{name}>\n",
        "",
        indent = indent
    ));
}

fn push_attributes(out: &mut String, attributes: &NoteAttributes) {
    out.push_str("    <note-attributes>\n");

    let text_fields = [
        ("author", &attributes.author),
        ("source", &attributes.source),
        ("source-url", &attributes.source_url),
        ("source-application", &attributes.source_application),
    ];
    for (name, value) in text_fields {
        if let Some(value) = value {
            push_element(out, 6, name, &escape_xml(value));
        }
    }

    if let Some(order) = attributes.reminder_order {
        push_element(out, 6, "reminder-order", &order.to_string());
    }
    if let Some(time) = attributes.reminder_time {
        push_element(out, 6, "reminder-time", &format_timestamp(time));
    }
    if let Some(time) = attributes.reminder_done_time {
        push_element(out, 6, "reminder-done-time", &format_timestamp(time));
    }

    out.push_str("    </note-attributes>\n");
}

/// Wrap ENML in CDATA, normalizing its XML declaration
fn push_content(out: &mut String, content: &str) {
    let body = match content.strip_prefix("<?xml") {
        Some(_) => strip_xml_declaration(content),
        None => content,
    };

    out.push_str("    <content>\n");
    out.push_str("      <![CDATA[");
    out.push_str(CONTENT_XML_DECLARATION);
    out.push('\n');
    // a literal terminator inside the payload would end the section early
    out.push_str(&body.replace("]]>", "]]]]><![CDATA[>"));
    out.push_str("]]>\n");
    out.push_str("    </content>\n");
}

/// Everything after the leading declaration and its line break
///
/// An unterminated declaration is kept as-is.
fn strip_xml_declaration(content: &str) -> &str {
    match content.split_once("?>") {
        Some((_, rest)) => rest
            .strip_prefix("\r\n")
            .or_else(|| rest.strip_prefix('\n'))
            .unwrap_or(rest),
        None => content,
    }
}

fn push_resource(out: &mut String, resource: &Resource) {
    out.push_str("    <resource>\n");

    out.push_str("      <data encoding=\"base64\">\n");
    let encoded = STANDARD.encode(&resource.data);
    for line in encoded.as_bytes().chunks(BASE64_LINE_WIDTH) {
        // base64 output is ASCII
        out.push_str(&String::from_utf8_lossy(line));
        out.push('\n');
    }
    out.push_str("      </data>\n");

    push_element(out, 6, "mime", &escape_xml(&resource.mime));
    if let Some(width) = resource.width {
        push_element(out, 6, "width", &width.to_string());
    }
    if let Some(height) = resource.height {
        push_element(out, 6, "height", &height.to_string());
    }

    if resource.file_name.is_some() || resource.source_url.is_some() || resource.attachment {
        out.push_str("      <resource-attributes>\n");
        if let Some(url) = &resource.source_url {
            push_element(out, 8, "source-url", &escape_xml(url));
        }
        if let Some(name) = &resource.file_name {
            push_element(out, 8, "file-name", &escape_xml(name));
        }
        if resource.attachment {
            push_element(out, 8, "attachment", "true");
        }
        out.push_str("      </resource-attributes>\n");
    }

    out.push_str("    </resource>\n");
}

fn push_task(out: &mut String, task: &Task) {
    out.push_str("    <task>\n");
    push_element(out, 6, "title", &escape_xml(&task.label));
    push_element(out, 6, "sortWeight", &escape_xml(&task.sort_weight));

    for reminder in &task.reminders {
        out.push_str("      <reminder>\n");
        push_element(
            out,
            8,
            "reminderDate",
            &format_timestamp(reminder.reminder_date),
        );
        out.push_str("      </reminder>\n");
    }

    out.push_str("    </task>\n");
}
