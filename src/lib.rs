//! Alibaba Cloud DNS webhook for cert-manager
//!
//! Solves [RFC-8555][RFC-8555] [DNS-01] challenges for [cert-manager] by publishing and
//! removing TXT records in zones hosted on [Alibaba Cloud DNS][alidns].
//!
//! cert-manager calls the webhook [HTTP API][crate::api] once to present a challenge and once
//! to clean it up. The [solver] maps the challenge FQDN onto a zone and relative record name
//! ([resolver]) and lets the [`RecordManager`] create or delete the matching TXT record via
//! the [`AliDnsClient`].
//!
//! [RFC-8555]: https://www.rfc-editor.org/rfc/rfc8555
//! [DNS-01]: https://www.rfc-editor.org/rfc/rfc8555#section-8.4
//! [cert-manager]: https://cert-manager.io/docs/configuration/acme/dns01/webhook/
//! [alidns]: https://api.aliyun.com/product/Alidns
//!
#![warn(clippy::pedantic)]

pub mod alidns;
pub mod api;
pub mod config;
pub mod error;
pub mod records;
pub mod resolver;
pub mod solver;

pub use alidns::AliDnsClient;
pub use api::new as new_http;
pub use config::{Config, SharedConfig};
pub use records::{DnsApi, InMemoryDnsApi, RecordManager};
pub use solver::{Challenge, Solver};
