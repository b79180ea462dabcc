//! Score and mint transaction log
//!
//! Every reported kill, death and mint becomes an entry, newest first,
//! capped at `MAX_TRANSACTIONS`. Entries start pending and are resolved
//! once the remote submission completes. Persisted as JSON under
//! `STORAGE_KEY`.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::persistence::Storage;
use crate::platform::now_ms;
use crate::services::ScoreSink;

/// Entries kept in the log
pub const MAX_TRANSACTIONS: usize = 50;

/// Why a remote submission produced no link
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("server returned {status} {status_text}")]
    Http { status: u16, status_text: String },
    #[error("network error: {0}")]
    Network(String),
    #[error("response carried no link")]
    MissingLink,
}

/// What was submitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TransactionKind {
    /// Running total after a kill
    Kill(u64),
    /// Final total
    Death(u64),
    /// Kill count at mint time
    Mint(u32),
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Kill(score) => write!(f, "Kill: {}", score),
            TransactionKind::Death(score) => write!(f, "Death: {}", score),
            TransactionKind::Mint(kills) => write!(f, "Mint: {}", kills),
        }
    }
}

impl From<TransactionKind> for String {
    fn from(kind: TransactionKind) -> Self {
        kind.to_string()
    }
}

impl TryFrom<String> for TransactionKind {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        let (label, value) = s
            .split_once(": ")
            .ok_or_else(|| format!("unrecognized transaction type '{}'", s))?;
        let bad_value = |_| format!("bad value in '{}'", s);
        match label {
            "Kill" => value.parse().map(TransactionKind::Kill).map_err(bad_value),
            "Death" => value.parse().map(TransactionKind::Death).map_err(bad_value),
            "Mint" => value.parse().map(TransactionKind::Mint).map_err(bad_value),
            _ => Err(format!("unrecognized transaction type '{}'", s)),
        }
    }
}

/// Submission outcome shown for an entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Link {
    Pending,
    Resolved(String),
    Failed,
    /// Never resolved before the page went away
    #[default]
    NotProcessed,
}

impl Link {
    const PENDING: &'static str = "Pending...";
    const FAILED: &'static str = "Error";
    const NOT_PROCESSED: &'static str = "Not processed";
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Link::Pending => f.write_str(Self::PENDING),
            Link::Resolved(url) => f.write_str(url),
            Link::Failed => f.write_str(Self::FAILED),
            Link::NotProcessed => f.write_str(Self::NOT_PROCESSED),
        }
    }
}

impl From<Link> for String {
    fn from(link: Link) -> Self {
        link.to_string()
    }
}

impl From<String> for Link {
    fn from(s: String) -> Self {
        match s.as_str() {
            Link::PENDING => Link::Pending,
            Link::FAILED => Link::Failed,
            "" | Link::NOT_PROCESSED => Link::NotProcessed,
            _ => Link::Resolved(s),
        }
    }
}

/// One log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(default)]
    pub link: Link,
    /// Unix ms of creation, then of resolution
    #[serde(default)]
    pub date: f64,
}

/// Transaction history, newest first
#[derive(Debug, Clone, Default)]
pub struct TransactionLog {
    entries: Vec<Transaction>,
    next_id: u64,
}

impl TransactionLog {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "transactions";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[Transaction] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&Transaction> {
        self.entries.iter().find(|tx| tx.id == id)
    }

    /// Add a pending entry at the front; returns its id
    pub fn record(&mut self, kind: TransactionKind, now_ms: f64) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.insert(
            0,
            Transaction {
                id,
                kind,
                link: Link::Pending,
                date: now_ms,
            },
        );
        self.entries.truncate(MAX_TRANSACTIONS);
        id
    }

    /// Settle a pending entry. Returns false if it already fell off the log.
    pub fn resolve(&mut self, id: u64, result: Result<String, SubmitError>, now_ms: f64) -> bool {
        let Some(tx) = self.entries.iter_mut().find(|tx| tx.id == id) else {
            return false;
        };
        tx.link = match result {
            Ok(url) if !url.is_empty() => Link::Resolved(url),
            Ok(_) => Link::Failed,
            Err(e) => {
                log::warn!("{} not submitted: {}", tx.kind, e);
                Link::Failed
            }
        };
        tx.date = now_ms;
        true
    }

    /// Load history. Entries that never resolved become `NotProcessed`;
    /// malformed entries are skipped individually.
    pub fn load(storage: &dyn Storage) -> Self {
        let Some(json) = storage.get(Self::STORAGE_KEY) else {
            return Self::new();
        };
        let raw: Vec<serde_json::Value> = match serde_json::from_str(&json) {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("Discarding unreadable transaction history: {}", e);
                return Self::new();
            }
        };

        let mut entries: Vec<Transaction> = raw
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<Transaction>(value) {
                Ok(tx) => Some(tx),
                Err(e) => {
                    log::warn!("Skipping malformed transaction: {}", e);
                    None
                }
            })
            .collect();
        entries.truncate(MAX_TRANSACTIONS);
        for tx in &mut entries {
            if tx.link == Link::Pending {
                tx.link = Link::NotProcessed;
            }
        }

        let next_id = entries.iter().map(|tx| tx.id + 1).max().unwrap_or(0);
        log::info!("Loaded {} transactions", entries.len());
        Self { entries, next_id }
    }

    pub fn save(&self, storage: &mut dyn Storage) {
        match serde_json::to_string(&self.entries) {
            Ok(json) => storage.set(Self::STORAGE_KEY, &json),
            Err(e) => log::warn!("Failed to serialize transactions: {}", e),
        }
    }
}

/// Records entries offline, stamped with the wall clock; they stay pending
/// until resolved
impl ScoreSink for TransactionLog {
    fn record_kill_or_death(&mut self, total_score: u64, is_death: bool) {
        let kind = if is_death {
            TransactionKind::Death(total_score)
        } else {
            TransactionKind::Kill(total_score)
        };
        self.record(kind, now_ms());
    }

    fn record_mint(&mut self, kill_count: u32) {
        self.record(TransactionKind::Mint(kill_count), now_ms());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;

    #[test]
    fn test_kind_labels() {
        assert_eq!(TransactionKind::Kill(4).to_string(), "Kill: 4");
        assert_eq!(TransactionKind::Death(12).to_string(), "Death: 12");
        assert_eq!(TransactionKind::Mint(30).to_string(), "Mint: 30");
        assert_eq!(
            TransactionKind::try_from("Death: 9".to_string()),
            Ok(TransactionKind::Death(9))
        );
        assert!(TransactionKind::try_from("Bonus: 1".to_string()).is_err());
    }

    #[test]
    fn test_newest_first_and_capped() {
        let mut log = TransactionLog::new();
        for score in 0..60 {
            log.record(TransactionKind::Kill(score), score as f64);
        }
        assert_eq!(log.len(), MAX_TRANSACTIONS);
        assert_eq!(log.entries()[0].kind, TransactionKind::Kill(59));
        assert_eq!(log.entries()[49].kind, TransactionKind::Kill(10));
    }

    #[test]
    fn test_resolve_success_and_failure() {
        let mut log = TransactionLog::new();
        let kill = log.record(TransactionKind::Kill(1), 0.0);
        let death = log.record(TransactionKind::Death(1), 0.0);

        assert!(log.resolve(kill, Ok("https://explorer/tx/1".to_string()), 10.0));
        assert!(log.resolve(death, Err(SubmitError::Network("offline".into())), 20.0));

        assert_eq!(log.get(kill).map(|tx| &tx.link), Some(&Link::Resolved("https://explorer/tx/1".into())));
        assert_eq!(log.get(death).map(|tx| &tx.link), Some(&Link::Failed));
        assert_eq!(log.get(death).map(|tx| tx.date), Some(20.0));
        assert!(!log.resolve(99, Ok("x".into()), 0.0));
    }

    #[test]
    fn test_empty_link_counts_as_failure() {
        let mut log = TransactionLog::new();
        let id = log.record(TransactionKind::Mint(3), 0.0);
        log.resolve(id, Ok(String::new()), 1.0);
        assert_eq!(log.get(id).map(|tx| &tx.link), Some(&Link::Failed));
    }

    #[test]
    fn test_save_and_load_marks_pending_not_processed() {
        let mut storage = MemoryStorage::new();
        let mut log = TransactionLog::new();
        let done = log.record(TransactionKind::Kill(1), 0.0);
        log.record(TransactionKind::Kill(2), 0.0);
        log.resolve(done, Ok("https://explorer/tx/a".into()), 5.0);
        log.save(&mut storage);

        let loaded = TransactionLog::load(&storage);
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.entries()[0].link, Link::NotProcessed);
        assert_eq!(loaded.entries()[1].link, Link::Resolved("https://explorer/tx/a".into()));

        // New ids never collide with loaded ones
        let mut loaded = loaded;
        let id = loaded.record(TransactionKind::Kill(3), 9.0);
        assert!(id > done);
    }

    #[test]
    fn test_load_recovers_per_entry() {
        let mut storage = MemoryStorage::new();
        storage.set(
            TransactionLog::STORAGE_KEY,
            r#"[
                {"id": 3, "type": "Death: 8", "link": "Pending...", "date": 1},
                {"id": 2, "type": "Kill: 8"},
                {"id": 1, "type": "Kill: 7", "link": "https://explorer/tx/z", "date": 0},
                {"type": 42},
                "garbage"
            ]"#,
        );

        let log = TransactionLog::load(&storage);
        assert_eq!(log.len(), 3);
        assert_eq!(log.entries()[0].link, Link::NotProcessed);
        assert_eq!(log.entries()[1].link, Link::NotProcessed);
        assert_eq!(log.entries()[2].link, Link::Resolved("https://explorer/tx/z".into()));
    }

    #[test]
    fn test_unreadable_history_starts_fresh() {
        let mut storage = MemoryStorage::new();
        storage.set(TransactionLog::STORAGE_KEY, "{oops");
        assert!(TransactionLog::load(&storage).is_empty());
    }

    #[test]
    fn test_score_sink_records_pending() {
        let mut log = TransactionLog::new();
        let before = now_ms();
        log.record_kill_or_death(5, false);
        log.record_mint(10);
        log.record_kill_or_death(5, true);

        let kinds: Vec<_> = log.entries().iter().map(|tx| tx.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TransactionKind::Death(5),
                TransactionKind::Mint(10),
                TransactionKind::Kill(5)
            ]
        );
        assert!(log.entries().iter().all(|tx| tx.link == Link::Pending && tx.date >= before));
    }
}
