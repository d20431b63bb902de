//! Visitor record lifecycle: intake of new submissions and query updates.
//!
//! Each operation is one load-mutate-save cycle over the whole collection.
//! Cycles run one at a time under `write_lock`, so concurrent requests
//! can't overwrite each other's changes.
//!
//! Query updates persist before notifying. A failed email is reported to
//! the caller, but the update itself is already saved.

use crate::error::LedgerError;
use crate::intake;
use crate::notifier::{self, Notifier};
use crate::store::RecordStore;
use chrono::{DateTime, Local, NaiveDateTime, Utc};
use contact_form_types::{SubmitFormRequest, VisitorRecord, contact_method};
use parking_lot::Mutex;
use std::cmp::Reverse;
use std::sync::Arc;

pub struct Ledger {
    store: Arc<dyn RecordStore>,
    notifier: Arc<dyn Notifier>,
    write_lock: Mutex<()>,
}

impl Ledger {
    pub fn new(store: Arc<dyn RecordStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            store,
            notifier,
            write_lock: Mutex::new(()),
        }
    }

    /// Validates and stores a new submission stamped with the current time.
    pub fn submit(&self, req: &SubmitFormRequest) -> Result<VisitorRecord, LedgerError> {
        self.submit_at(req, &intake::now_timestamp())
    }

    pub fn submit_at(
        &self,
        req: &SubmitFormRequest,
        timestamp: &str,
    ) -> Result<VisitorRecord, LedgerError> {
        let record = intake::build_record(req, timestamp)?;

        let _guard = self.write_lock.lock();
        let mut records = self.store.load_all()?;
        records.push(record.clone());
        self.store.save_all(&records)?;

        log::info!("Stored submission {} from {}", record.id, record.source);
        Ok(record)
    }

    /// Records a follow-up on the visitor with id `visitor_id`.
    ///
    /// `method` is added to the record's methods if new, and `message`
    /// replaces the previous message. The method tag is stored exactly as
    /// given. An `email` method also sends a notification once the change
    /// is saved.
    pub async fn update_query(
        &self,
        visitor_id: &str,
        message: &str,
        method: &str,
    ) -> Result<VisitorRecord, LedgerError> {
        let record = self.apply_update(visitor_id, message, method)?;
        log::info!("Updated query {} via {}", record.id, method);

        if method == contact_method::EMAIL {
            let (subject, body) = notifier::compose_query_email(&record, message);
            self.notifier.send(&subject, &body).await?;
        }

        Ok(record)
    }

    fn apply_update(
        &self,
        visitor_id: &str,
        message: &str,
        method: &str,
    ) -> Result<VisitorRecord, LedgerError> {
        if visitor_id.is_empty() {
            return Err(LedgerError::NotFound(String::new()));
        }

        let _guard = self.write_lock.lock();
        let mut records = self.store.load_all()?;

        let Some(record) = records.iter_mut().find(|r| r.id == visitor_id) else {
            log::warn!("Query update for unknown visitor {}", visitor_id);
            return Err(LedgerError::NotFound(visitor_id.to_string()));
        };

        record.record_method(method);
        record.message = message.to_string();
        if record.query_id.is_empty() {
            record.query_id = intake::fallback_query_id();
        }
        let updated = record.clone();

        self.store.save_all(&records)?;
        Ok(updated)
    }

    /// All records in insertion order.
    pub fn list(&self) -> Result<Vec<VisitorRecord>, LedgerError> {
        Ok(self.store.load_all()?)
    }

    /// All records, most recent submission first. Records whose timestamp
    /// is missing or unparseable go last.
    pub fn list_newest_first(&self) -> Result<Vec<VisitorRecord>, LedgerError> {
        let mut records = self.list()?;
        records.sort_by_cached_key(|r| Reverse(parse_timestamp(&r.timestamp)));
        Ok(records)
    }
}

/// Reads both RFC 3339 stamps and the offset-less local stamps written by
/// older revisions of the service.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
    naive
        .and_local_timezone(Local)
        .earliest()
        .map(|ts| ts.with_timezone(&Utc))
}
