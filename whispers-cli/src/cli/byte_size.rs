//! Parser for human-readable byte sizes such as `512M` or `4GiB`.

use thiserror::Error;

/// Reasons a byte-size argument is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ByteSizeError {
    /// No leading digits.
    #[error("`{raw}` does not start with a whole number of bytes")]
    MissingNumber {
        /// Raw argument.
        raw: String,
    },
    /// The unit suffix is not recognised.
    #[error("unknown size suffix `{suffix}`; expected K, M, G or T (optionally B or iB)")]
    UnknownSuffix {
        /// Offending suffix.
        suffix: String,
    },
    /// The scaled value does not fit in `u64`.
    #[error("`{raw}` overflows a 64-bit byte count")]
    Overflow {
        /// Raw argument.
        raw: String,
    },
}

/// Parses a byte count with an optional binary suffix (`K`, `M`, `G`, `T`,
/// each optionally followed by `B` or `iB`, case-insensitive).
///
/// # Errors
/// Returns [`ByteSizeError`] for malformed or overflowing input.
///
/// # Examples
/// ```
/// use whispers_cli::cli::parse_byte_size;
///
/// assert_eq!(parse_byte_size("4GiB"), Ok(4 << 30));
/// assert_eq!(parse_byte_size("100k"), Ok(100 << 10));
/// ```
pub fn parse_byte_size(raw: &str) -> Result<u64, ByteSizeError> {
    let trimmed = raw.trim();
    let split = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let (digits, suffix) = trimmed.split_at(split);
    let value: u64 = digits.parse().map_err(|_| ByteSizeError::MissingNumber {
        raw: raw.to_owned(),
    })?;
    let shift = match suffix.to_ascii_lowercase().as_str() {
        "" | "b" => 0,
        "k" | "kb" | "kib" => 10,
        "m" | "mb" | "mib" => 20,
        "g" | "gb" | "gib" => 30,
        "t" | "tb" | "tib" => 40,
        _ => {
            return Err(ByteSizeError::UnknownSuffix {
                suffix: suffix.to_owned(),
            });
        }
    };
    value
        .checked_mul(1_u64 << shift)
        .ok_or_else(|| ByteSizeError::Overflow {
            raw: raw.to_owned(),
        })
}
