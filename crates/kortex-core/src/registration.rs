//! Advanced registration and the durable local queue of pending requests.
//!
//! Advanced registrations never reach the backend. They are appended to the
//! `kortex_pending_regs` key of [`ClientStorage`] and stay there until an
//! admin approves them on this client.

use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Error, Result};
use crate::storage::{ClientStorage, PENDING_REGS_KEY, PENDING_REGS_UNREADABLE_KEY};

/// A supporting document embedded in a registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub file_name: String,
    pub content_base64: String,
}

impl Document {
    pub fn from_bytes(file_name: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            file_name: file_name.into(),
            content_base64: BASE64.encode(bytes),
        }
    }

    /// Read and encode a file from disk.
    pub fn read(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        Ok(Self::from_bytes(file_name, &bytes))
    }

    pub fn decode(&self) -> Result<Vec<u8>> {
        BASE64.decode(&self.content_base64).map_err(|e| {
            Error::Storage(format!("Document {} is not valid base64: {e}", self.file_name))
        })
    }
}

/// Form data for an advanced (document-backed) registration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdvancedRegistration {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub unit: String,
    pub phone: String,
    pub documents: Vec<Document>,
}

impl AdvancedRegistration {
    /// Username, email and last name are mandatory.
    pub fn validate(&self) -> Result<()> {
        let missing: Vec<&str> = [
            ("username", &self.username),
            ("email", &self.email),
            ("last name", &self.last_name),
        ]
        .into_iter()
        .filter(|(_, v)| v.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::validation(format!(
                "required fields missing: {}",
                missing.join(", ")
            )))
        }
    }
}

/// A registration waiting in the local queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRegistration {
    /// Unix time in milliseconds at submission. Collisions are not guarded.
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub documents: Vec<Document>,
    pub timestamp: String,
}

impl PendingRegistration {
    fn from_form(form: AdvancedRegistration, now: DateTime<Utc>) -> Self {
        Self {
            id: now.timestamp_millis(),
            username: form.username.trim().to_string(),
            email: form.email.trim().to_string(),
            first_name: form.first_name.trim().to_string(),
            last_name: form.last_name.trim().to_string(),
            unit: form.unit.trim().to_string(),
            phone: form.phone.trim().to_string(),
            documents: form.documents,
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Read the whole queue. A missing key is an empty queue.
pub fn load_queue(storage: &ClientStorage) -> Result<Vec<PendingRegistration>> {
    match storage.get(PENDING_REGS_KEY) {
        None => Ok(Vec::new()),
        Some(raw) => serde_json::from_str(raw).map_err(|e| {
            Error::Storage(format!("Failed to parse pending registration queue: {e}"))
        }),
    }
}

fn store_queue(storage: &mut ClientStorage, queue: &[PendingRegistration]) -> Result<()> {
    let json = serde_json::to_string(queue)?;
    storage.set(PENDING_REGS_KEY, json)
}

/// Validate and append a registration (read, append, write back).
///
/// An unreadable queue does not block new registrations: its raw value is
/// moved to [`PENDING_REGS_UNREADABLE_KEY`] (replacing any earlier one) and
/// the entry starts a fresh queue.
pub fn enqueue(
    storage: &mut ClientStorage,
    form: AdvancedRegistration,
    now: DateTime<Utc>,
) -> Result<PendingRegistration> {
    form.validate()?;
    let mut queue = match load_queue(storage) {
        Ok(queue) => queue,
        Err(e) => {
            warn!(error = %e, "Registration queue unreadable, starting a new one");
            if let Some(raw) = storage.get(PENDING_REGS_KEY).map(ToString::to_string) {
                storage.set(PENDING_REGS_UNREADABLE_KEY, raw)?;
            }
            Vec::new()
        }
    };
    let entry = PendingRegistration::from_form(form, now);
    queue.push(entry.clone());
    store_queue(storage, &queue)?;
    Ok(entry)
}

/// Remove the first queued entry with `id`, leaving all others untouched.
/// Returns `None` (and writes nothing) when no such entry exists.
pub fn dequeue(storage: &mut ClientStorage, id: i64) -> Result<Option<PendingRegistration>> {
    let mut queue = load_queue(storage)?;
    let Some(pos) = queue.iter().position(|r| r.id == id) else {
        return Ok(None);
    };
    let removed = queue.remove(pos);
    store_queue(storage, &queue)?;
    Ok(Some(removed))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn form(username: &str) -> AdvancedRegistration {
        AdvancedRegistration {
            username: username.into(),
            email: format!("{username}@example.org"),
            last_name: "Shevchenko".into(),
            unit: "72nd".into(),
            ..Default::default()
        }
    }

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    #[test]
    fn missing_required_fields_are_listed() {
        let err = AdvancedRegistration::default().validate().unwrap_err();
        let msg = err.to_string();
        assert!(err.is_validation());
        assert!(msg.contains("username"));
        assert!(msg.contains("email"));
        assert!(msg.contains("last name"));
    }

    #[test]
    fn empty_username_never_touches_storage() {
        let mut storage = ClientStorage::in_memory();
        let mut f = form("alice");
        f.username = "   ".into();
        let err = enqueue(&mut storage, f, at(1)).unwrap_err();
        assert!(err.is_validation());
        assert!(storage.get(PENDING_REGS_KEY).is_none());
    }

    #[test]
    fn enqueue_appends_in_order() {
        let mut storage = ClientStorage::in_memory();
        enqueue(&mut storage, form("alice"), at(1_000)).unwrap();
        enqueue(&mut storage, form("bob"), at(2_000)).unwrap();

        let queue = load_queue(&storage).unwrap();
        assert_eq!(queue.len(), 2);
        assert_eq!(queue[0].username, "alice");
        assert_eq!(queue[0].id, 1_000);
        assert_eq!(queue[1].username, "bob");
        assert_eq!(queue[1].timestamp, "1970-01-01T00:00:02.000Z");
    }

    #[test]
    fn dequeue_removes_exactly_one_entry() {
        let mut storage = ClientStorage::in_memory();
        enqueue(&mut storage, form("alice"), at(1)).unwrap();
        enqueue(&mut storage, form("bob"), at(2)).unwrap();
        enqueue(&mut storage, form("carol"), at(3)).unwrap();

        let removed = dequeue(&mut storage, 2).unwrap().unwrap();
        assert_eq!(removed.username, "bob");

        let names: Vec<_> = load_queue(&storage)
            .unwrap()
            .into_iter()
            .map(|r| r.username)
            .collect();
        assert_eq!(names, ["alice", "carol"]);
    }

    #[test]
    fn dequeue_unknown_id_is_none() {
        let mut storage = ClientStorage::in_memory();
        enqueue(&mut storage, form("alice"), at(1)).unwrap();
        assert!(dequeue(&mut storage, 99).unwrap().is_none());
        assert_eq!(load_queue(&storage).unwrap().len(), 1);
    }

    #[test]
    fn documents_roundtrip_through_base64() {
        let doc = Document::from_bytes("id.pdf", b"%PDF-1.7 fake");
        assert_eq!(doc.decode().unwrap(), b"%PDF-1.7 fake");
    }

    #[test]
    fn document_read_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.txt");
        std::fs::write(&path, "deploy at dawn").unwrap();

        let doc = Document::read(&path).unwrap();
        assert_eq!(doc.file_name, "orders.txt");
        assert_eq!(doc.decode().unwrap(), b"deploy at dawn");
    }

    #[test]
    fn corrupted_queue_is_a_storage_error() {
        let mut storage = ClientStorage::in_memory();
        storage.set(PENDING_REGS_KEY, "not json").unwrap();
        assert!(matches!(load_queue(&storage), Err(Error::Storage(_))));
    }

    #[test]
    fn enqueue_sets_unreadable_queue_aside() {
        let mut storage = ClientStorage::in_memory();
        let stale = r#"[{"id":1,"username":"x"}]"#;
        storage.set(PENDING_REGS_KEY, stale).unwrap();

        let entry = enqueue(&mut storage, form("dana"), at(5)).unwrap();

        let queue = load_queue(&storage).unwrap();
        assert_eq!(queue.len(), 1);
        assert_eq!(queue[0].id, entry.id);
        assert_eq!(storage.get(PENDING_REGS_UNREADABLE_KEY), Some(stale));
    }
}
