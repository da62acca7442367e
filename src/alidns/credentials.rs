use crate::error::Error;
use std::fmt;

pub const ACCESS_KEY_ID_ENV: &str = "ALIBABA_CLOUD_ACCESS_KEY_ID";
pub const ACCESS_KEY_SECRET_ENV: &str = "ALIBABA_CLOUD_ACCESS_KEY_SECRET";
pub const SECURITY_TOKEN_ENV: &str = "ALIBABA_CLOUD_SECURITY_TOKEN";

/// Access key pair, optionally with an STS security token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub access_key_secret: String,
    pub security_token: Option<String>,
}

impl Credentials {
    /// Read credentials from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Credentials`] naming the first required variable that is unset.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read credentials through an arbitrary variable lookup. Empty values count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Credentials`] naming the first required variable that is unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        Ok(Self {
            access_key_id: get(ACCESS_KEY_ID_ENV).ok_or(Error::Credentials(ACCESS_KEY_ID_ENV))?,
            access_key_secret: get(ACCESS_KEY_SECRET_ENV)
                .ok_or(Error::Credentials(ACCESS_KEY_SECRET_ENV))?,
            security_token: get(SECURITY_TOKEN_ENV),
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("access_key_secret", &"<redacted>")
            .field(
                "security_token",
                &self.security_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}
