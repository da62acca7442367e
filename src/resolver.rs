//! Zone and relative record name derivation.
//!
//! cert-manager hands the solver a fully qualified challenge name (e.g.
//! `_acme-challenge.www.example.com.`) together with the zone it resolved as authoritative
//! (e.g. `example.com.`). Alibaba Cloud DNS addresses records by domain name plus a relative
//! `RR`, so the zone suffix has to be peeled off the FQDN.

/// Strip a single trailing `.` separator from a domain name, if present.
#[must_use]
pub fn un_fqdn(name: &str) -> &str {
    name.strip_suffix('.').unwrap_or(name)
}

/// Derive `(zone, relative_name)` from a challenge FQDN and its resolved zone.
///
/// Both inputs may carry a trailing separator. The returned zone never does. When `fqdn` is
/// the zone itself the relative name is empty (the zone apex). When `fqdn` does not end with
/// `zone` the separator-stripped FQDN is returned unchanged as the relative name; this is
/// lenient on purpose and never an error.
#[must_use]
pub fn resolve(fqdn: &str, zone: &str) -> (String, String) {
    let fqdn = un_fqdn(fqdn);
    let zone = un_fqdn(zone);

    let rr = fqdn.strip_suffix(zone).unwrap_or(fqdn);
    let rr = rr.strip_suffix('.').unwrap_or(rr);

    (zone.to_string(), rr.to_string())
}
