//! The DNS-01 solver invoked for each cert-manager challenge.
//!
//! A [`Solver`] starts out unbound. [`Solver::initialize`] (or [`Solver::bind`]) attaches a
//! [`DnsApi`][crate::records::DnsApi] once at startup; afterwards [`Solver::present`] and
//! [`Solver::clean_up`] may be called any number of times, concurrently, for independent
//! challenges.

use crate::alidns::AliDnsClient;
use crate::config::Config;
use crate::error::Error;
use crate::records::{DynDnsApi, RecordManager};
use crate::resolver;
use std::sync::Arc;
use tracing::info;

/// The parts of a cert-manager challenge request the solver acts on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Challenge {
    /// e.g. `_acme-challenge.www.example.com.`
    pub resolved_fqdn: String,
    /// e.g. `example.com.`
    pub resolved_zone: String,
    /// The DNS-01 proof value to publish.
    pub key: String,
}

#[derive(Clone, Default)]
enum Binding {
    #[default]
    Unbound,
    Bound(RecordManager),
}

#[derive(Clone, Default)]
pub struct Solver {
    binding: Binding,
}

impl Solver {
    /// Solver name used to reference this webhook from an ACME issuer, unique within the
    /// API group.
    pub const NAME: &'static str = "alidns";

    /// Create an unbound solver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a solver already bound to `api`.
    #[must_use]
    pub fn with_api(api: DynDnsApi) -> Self {
        let mut solver = Self::new();
        solver.bind(api);
        solver
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        Self::NAME
    }

    #[must_use]
    pub fn is_bound(&self) -> bool {
        matches!(self.binding, Binding::Bound(_))
    }

    /// Bind an Alibaba Cloud DNS client built from `config` and the environment credentials.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Credentials`] or [`Error::HttpClient`] if the client can't be built.
    /// The solver stays unbound in that case.
    pub fn initialize(&mut self, config: &Config) -> Result<(), Error> {
        let client = AliDnsClient::from_config(config)?;
        info!(endpoint = client.endpoint(), "initialized alidns client");
        self.bind(Arc::new(client));
        Ok(())
    }

    /// Bind `api`, replacing any previous binding.
    pub fn bind(&mut self, api: DynDnsApi) {
        self.binding = Binding::Bound(RecordManager::new(api));
    }

    /// Publish the challenge TXT record. Calling this again for the same challenge is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Uninitialized`] before the solver is bound, otherwise any
    /// [`RecordManager::add_record`] error.
    pub async fn present(&self, challenge: &Challenge) -> Result<(), Error> {
        let manager = self.manager()?;
        let (zone, rr) = resolver::resolve(&challenge.resolved_fqdn, &challenge.resolved_zone);

        let record_id = manager.add_record(&zone, &rr, &challenge.key).await?;
        info!(
            domain = %zone,
            rr = %rr,
            value = %challenge.key,
            record_id = %record_id,
            "successfully added TXT record"
        );
        Ok(())
    }

    /// Remove the challenge TXT record. Only records carrying this challenge's key are
    /// removed, other challenges for the same name keep theirs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Uninitialized`] before the solver is bound, otherwise any
    /// [`RecordManager::remove_records_by_value`] error.
    pub async fn clean_up(&self, challenge: &Challenge) -> Result<(), Error> {
        let manager = self.manager()?;
        let (zone, rr) = resolver::resolve(&challenge.resolved_fqdn, &challenge.resolved_zone);

        let deleted = manager
            .remove_records_by_value(&zone, &rr, &challenge.key)
            .await?;
        info!(
            domain = %zone,
            rr = %rr,
            value = %challenge.key,
            deleted,
            "successfully deleted TXT record"
        );
        Ok(())
    }

    fn manager(&self) -> Result<&RecordManager, Error> {
        match &self.binding {
            Binding::Bound(manager) => Ok(manager),
            Binding::Unbound => Err(Error::Uninitialized),
        }
    }
}
