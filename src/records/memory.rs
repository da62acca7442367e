//! An in-process implementation of the [`DnsApi`][super::DnsApi] trait.
//!
//! Behaves like the Alibaba Cloud listing API (keyword name filter, 1-indexed pages with a
//! total count) and records every call it receives, which makes it useful as a stand-in for
//! the real provider during development and in tests.
use crate::records::{ApiError, DnsApi, RecordPage, TxtRecord, RECORD_TYPE};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Default, Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct InMemoryDnsApi {
    state: Mutex<State>,
    fail_on_page: Option<u64>,
    fail_on_create: bool,
    fail_on_delete: bool,
    fail_on_delete_of: Option<String>,
    total_count: Option<Option<u64>>,
}

#[derive(Default, Debug)]
struct State {
    zones: HashMap<String, Vec<TxtRecord>>,
    next_id: u64,
    requested_pages: Vec<u64>,
    create_calls: usize,
    delete_calls: usize,
}

impl InMemoryDnsApi {
    /// Fail every listing request.
    #[must_use]
    pub fn with_failure_on_list(self) -> Self {
        self.with_failure_on_page(1)
    }

    /// Fail listing requests for `page_number` and any later page.
    #[must_use]
    pub fn with_failure_on_page(mut self, page_number: u64) -> Self {
        self.fail_on_page = Some(page_number);
        self
    }

    #[must_use]
    pub fn with_failure_on_create(mut self) -> Self {
        self.fail_on_create = true;
        self
    }

    #[must_use]
    pub fn with_failure_on_delete(mut self) -> Self {
        self.fail_on_delete = true;
        self
    }

    /// Fail deleting the record with `record_id` only.
    #[must_use]
    pub fn with_failure_on_delete_of(mut self, record_id: &str) -> Self {
        self.fail_on_delete_of = Some(record_id.to_string());
        self
    }

    /// Report `total` as the total count of every listing instead of the real match count.
    /// `None` behaves like a provider that omits the field.
    #[must_use]
    pub fn with_total_count(mut self, total: Option<u64>) -> Self {
        self.total_count = Some(total);
        self
    }

    /// Store a record directly, bypassing the call counters. Returns the assigned id.
    pub fn insert(&self, zone: &str, name: &str, value: &str) -> String {
        self.state().insert(zone, name, value)
    }

    /// Snapshot of the records currently stored for `zone`.
    #[must_use]
    pub fn records(&self, zone: &str) -> Vec<TxtRecord> {
        self.state().zones.get(zone).cloned().unwrap_or_default()
    }

    /// Page numbers of every listing request received, in order.
    #[must_use]
    pub fn requested_pages(&self) -> Vec<u64> {
        self.state().requested_pages.clone()
    }

    #[must_use]
    pub fn create_calls(&self) -> usize {
        self.state().create_calls
    }

    #[must_use]
    pub fn delete_calls(&self) -> usize {
        self.state().delete_calls
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn injected(operation: &str) -> ApiError {
        ApiError::Provider {
            code: "InternalError".to_string(),
            message: format!("injected {operation} failure"),
        }
    }
}

impl State {
    fn insert(&mut self, zone: &str, name: &str, value: &str) -> String {
        self.next_id += 1;
        let record_id = self.next_id.to_string();
        self.zones
            .entry(zone.to_string())
            .or_default()
            .push(TxtRecord {
                record_id: record_id.clone(),
                name: name.to_string(),
                value: value.to_string(),
            });
        record_id
    }
}

#[async_trait::async_trait]
impl DnsApi for InMemoryDnsApi {
    async fn list_page(
        &self,
        zone: &str,
        name_filter: &str,
        record_type: &str,
        page_number: u64,
        page_size: u64,
    ) -> Result<RecordPage, ApiError> {
        let mut state = self.state();
        state.requested_pages.push(page_number);
        if self.fail_on_page.is_some_and(|fail_from| page_number >= fail_from) {
            return Err(Self::injected("list"));
        }

        let matching: Vec<&TxtRecord> = state
            .zones
            .get(zone)
            .map(|records| {
                records
                    .iter()
                    .filter(|r| record_type == RECORD_TYPE && r.name.contains(name_filter))
                    .collect()
            })
            .unwrap_or_default();

        let offset = page_number.saturating_sub(1).saturating_mul(page_size);
        let skip = usize::try_from(offset).unwrap_or(usize::MAX);
        let take = usize::try_from(page_size).unwrap_or(usize::MAX);
        Ok(RecordPage {
            records: matching.iter().skip(skip).take(take).map(|r| (*r).clone()).collect(),
            total_count: self.total_count.unwrap_or(Some(matching.len() as u64)),
        })
    }

    async fn create(
        &self,
        zone: &str,
        name: &str,
        _record_type: &str,
        value: &str,
    ) -> Result<String, ApiError> {
        let mut state = self.state();
        state.create_calls += 1;
        if self.fail_on_create {
            return Err(Self::injected("create"));
        }
        Ok(state.insert(zone, name, value))
    }

    async fn delete(&self, record_id: &str) -> Result<(), ApiError> {
        let mut state = self.state();
        state.delete_calls += 1;
        if self.fail_on_delete || self.fail_on_delete_of.as_deref() == Some(record_id) {
            return Err(Self::injected("delete"));
        }
        for records in state.zones.values_mut() {
            if let Some(pos) = records.iter().position(|r| r.record_id == record_id) {
                records.remove(pos);
                return Ok(());
            }
        }
        Err(ApiError::Provider {
            code: "DomainRecordNotBelongToUser".to_string(),
            message: format!("record {record_id} does not exist"),
        })
    }
}
