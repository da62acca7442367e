use serde::Deserialize;

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "PascalCase")]
pub(super) struct DescribeDomainRecordsResponse {
    pub total_count: Option<u64>,
    pub domain_records: Option<DomainRecords>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "PascalCase")]
pub(super) struct DomainRecords {
    #[serde(default)]
    pub record: Vec<DomainRecord>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "PascalCase")]
pub(super) struct DomainRecord {
    pub record_id: String,
    #[serde(rename = "RR")]
    pub rr: String,
    #[serde(default)]
    pub value: String,
}

/// Body of both `AddDomainRecord` and `DeleteDomainRecord` responses.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "PascalCase")]
pub(super) struct RecordIdResponse {
    pub record_id: String,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "PascalCase")]
pub(super) struct ErrorResponse {
    pub code: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub request_id: Option<String>,
}
