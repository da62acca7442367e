use crate::error::Error;
use crate::records::{ApiError, DynDnsApi, TxtRecord, PAGE_SIZE, RECORD_TYPE};
use tracing::debug;

/// Creates and removes DNS-01 TXT records through a [`DnsApi`][super::DnsApi].
///
/// Holds no state besides the API handle. Every operation re-reads the provider before acting,
/// so concurrent calls for different challenges don't interfere.
#[derive(Clone)]
pub struct RecordManager {
    api: DynDnsApi,
}

impl RecordManager {
    #[must_use]
    pub fn new(api: DynDnsApi) -> Self {
        Self { api }
    }

    /// Ensure a TXT record `name` with `value` exists in `zone`, returning its id.
    ///
    /// If a record with the same name and value is already present its id is returned and
    /// nothing is created, so repeated calls are harmless.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ListRecords`] if the existing records can't be listed, and
    /// [`Error::CreateRecord`] if the provider fails to create the record.
    pub async fn add_record(&self, zone: &str, name: &str, value: &str) -> Result<String, Error> {
        let records = self
            .list_records(zone, name)
            .await
            .map_err(|source| Error::ListRecords {
                zone: zone.to_string(),
                name: name.to_string(),
                source,
            })?;

        if let Some(existing) = records
            .iter()
            .find(|record| record.name == name && record.value == value)
        {
            debug!(zone, name, record_id = %existing.record_id, "TXT record already present");
            return Ok(existing.record_id.clone());
        }

        self.api
            .create(zone, name, RECORD_TYPE, value)
            .await
            .map_err(|source| Error::CreateRecord {
                zone: zone.to_string(),
                name: name.to_string(),
                source,
            })
    }

    /// Delete every TXT record `name` in `zone` whose value is `value`, returning how many were
    /// deleted. Records with the same name but another value are left alone.
    ///
    /// Deletion stops at the first failure; records already deleted stay deleted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ListRecords`] if the existing records can't be listed, and
    /// [`Error::DeleteRecord`] for the first record that can't be deleted.
    pub async fn remove_records_by_value(
        &self,
        zone: &str,
        name: &str,
        value: &str,
    ) -> Result<usize, Error> {
        let records = self
            .list_records(zone, name)
            .await
            .map_err(|source| Error::ListRecords {
                zone: zone.to_string(),
                name: name.to_string(),
                source,
            })?;

        let mut deleted = 0;
        for record in records
            .iter()
            .filter(|record| record.name == name && record.value == value)
        {
            self.api
                .delete(&record.record_id)
                .await
                .map_err(|source| Error::DeleteRecord {
                    record_id: record.record_id.clone(),
                    source,
                })?;
            debug!(zone, name, record_id = %record.record_id, "deleted TXT record");
            deleted += 1;
        }
        Ok(deleted)
    }

    /// List all TXT records in `zone` matching `name_filter`, in provider order.
    ///
    /// Pages of [`PAGE_SIZE`] are requested starting at page 1 until the accumulated count
    /// reaches the reported total, no total is reported, or a page comes back empty.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] of the first page that fails. Records from earlier pages are
    /// discarded.
    pub async fn list_records(
        &self,
        zone: &str,
        name_filter: &str,
    ) -> Result<Vec<TxtRecord>, ApiError> {
        let mut records = Vec::new();
        let mut page_number = 1;

        loop {
            let page = self
                .api
                .list_page(zone, name_filter, RECORD_TYPE, page_number, PAGE_SIZE)
                .await?;
            let page_len = page.records.len();
            records.extend(page.records);

            match page.total_count {
                Some(total) if (records.len() as u64) < total && page_len > 0 => page_number += 1,
                _ => break,
            }
        }

        debug!(
            zone,
            name_filter,
            pages = page_number,
            count = records.len(),
            "listed TXT records"
        );
        Ok(records)
    }
}
