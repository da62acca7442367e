//! HTTP API implementing the cert-manager DNS-01 webhook protocol.
//!
//! cert-manager talks to DNS-01 webhooks through a Kubernetes aggregated API. Every solver is
//! exposed as a resource of an API group (see [`Config::group_name`][crate::config::Config]),
//! version `v1alpha1`.
//!
//! TLS is not terminated here; put the webhook behind whatever serves the aggregated API
//! certificate in your deployment.
//!
//! # API Endpoints
//!
//! ## `/healthz` (GET)
//!
//!   Returns HTTP 200 (OK) and the JSON body `{"ok":"healthy"}` when the service is operational.
//!
//! ## `/apis/<group>/v1alpha1` (GET)
//!
//!   Returns the `APIResourceList` discovery document listing the `alidns` solver resource.
//!   Returns HTTP 404 for any group other than the configured one.
//!
//! ## `/apis/<group>/v1alpha1/alidns` (POST)
//!
//!   Expects a `ChallengePayload` request body of the form:
//!
//!   ```json
//!   {
//!     "apiVersion": "acme.cert-manager.io/v1alpha1",
//!     "kind": "ChallengePayload",
//!     "request": {
//!       "uid": "6c2a1f3e",
//!       "action": "Present",
//!       "type": "dns-01",
//!       "dnsName": "www.example.com",
//!       "key": "LPsIwTo7o8BoG0-vjCyGQGBWSVIPxI-i_X336eUOQZo",
//!       "resolvedFQDN": "_acme-challenge.www.example.com.",
//!       "resolvedZone": "example.com."
//!     }
//!   }
//!   ```
//!
//!  `action` is `Present` to publish the TXT record or `CleanUp` to remove it. Both answer
//!  HTTP 200 with a `ChallengePayload` response:
//!
//!  ```json
//!  {
//!    "apiVersion": "acme.cert-manager.io/v1alpha1",
//!    "kind": "ChallengePayload",
//!    "response": { "uid": "6c2a1f3e", "success": true }
//!  }
//!  ```
//!
//!  When the DNS provider call fails, `success` is `false` and `status.message` describes
//!  whether listing, creating or deleting the record failed. cert-manager retries the whole
//!  operation later.

mod api_error;
pub mod model;
mod routes;
pub mod server;

pub use server::new;
