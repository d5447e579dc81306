//! Property-test run profile read from the environment.
//!
//! Property suites across the workspace share one pair of overrides so CI can
//! raise case counts or isolate cases in subprocesses without code changes.

use std::env;

use thiserror::Error;

/// Environment variable overriding the number of cases per property.
pub const PROGTEST_CASES_ENV_KEY: &str = "PROGTEST_CASES";
/// Environment variable toggling forked proptest execution.
pub const WHISPERS_PBT_FORK_ENV_KEY: &str = "WHISPERS_PBT_FORK";

/// Reasons an override is ignored in favour of the default.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProfileOverrideError {
    /// The case count is not an unsigned integer.
    #[error("case count `{raw}` is not an unsigned integer")]
    NotANumber {
        /// Raw override text.
        raw: String,
    },
    /// The case count is zero.
    #[error("case count must be positive")]
    ZeroCases,
    /// The fork flag is not a recognised boolean spelling.
    #[error("fork flag `{raw}` is not one of true/false/1/0/yes/no/on/off")]
    NotABool {
        /// Raw override text.
        raw: String,
    },
}

/// Case count and fork flag for a property-test run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProptestRunProfile {
    cases: u32,
    fork: bool,
}

impl ProptestRunProfile {
    /// Reads both overrides, falling back to the given defaults when a
    /// variable is unset or malformed. Malformed values are logged.
    ///
    /// # Examples
    ///
    /// ```
    /// use whispers_test_support::ci::property_test_profile::ProptestRunProfile;
    ///
    /// let profile = ProptestRunProfile::load(64, false);
    /// assert!(profile.cases() > 0);
    /// ```
    #[must_use]
    pub fn load(default_cases: u32, default_fork: bool) -> Self {
        Self {
            cases: read_override(PROGTEST_CASES_ENV_KEY, parse_cases).unwrap_or(default_cases),
            fork: read_override(WHISPERS_PBT_FORK_ENV_KEY, parse_fork).unwrap_or(default_fork),
        }
    }

    #[rustfmt::skip]
    /// Number of cases per property.
    #[must_use]
    pub fn cases(&self) -> u32 { self.cases }

    #[rustfmt::skip]
    /// Whether each case runs in a forked subprocess.
    #[must_use]
    pub fn fork(&self) -> bool { self.fork }
}

fn read_override<T>(
    key: &'static str,
    parse: fn(&str) -> Result<T, ProfileOverrideError>,
) -> Option<T> {
    let raw = env::var(key).ok()?;
    parse(&raw)
        .inspect_err(|error| {
            tracing::warn!(env = key, %error, "ignoring property-test override");
        })
        .ok()
}

/// Parses a positive case count.
///
/// # Errors
/// Returns [`ProfileOverrideError::NotANumber`] or
/// [`ProfileOverrideError::ZeroCases`].
pub fn parse_cases(raw: &str) -> Result<u32, ProfileOverrideError> {
    let cases = raw
        .trim()
        .parse::<u32>()
        .map_err(|_| ProfileOverrideError::NotANumber {
            raw: raw.to_owned(),
        })?;
    if cases == 0 {
        return Err(ProfileOverrideError::ZeroCases);
    }
    Ok(cases)
}

/// Parses a fork flag, case-insensitively.
///
/// # Errors
/// Returns [`ProfileOverrideError::NotABool`] for unrecognised spellings.
pub fn parse_fork(raw: &str) -> Result<bool, ProfileOverrideError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ProfileOverrideError::NotABool {
            raw: raw.to_owned(),
        }),
    }
}
