//! Connection string tokenizer.
//!
//! A connection string is a flat list of `Key=Value` pairs separated by `;`:
//!
//! ```text
//! Endpoint=sb://ns.servicebus.windows.net/;SharedAccessKeyName=Root;SharedAccessKey=abc123==
//! ```
//!
//! Only whitelisted keys ([`SettingKey`]) are accepted, matched
//! case-insensitively. No escaping is defined, so values cannot contain `;`.

use crate::errors::{ConnectionResult, ConnectionStringError};
use crate::secure::SecurePassword;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use zeroize::Zeroize;

mod keys;

pub use keys::{SettingKey, UnknownSettingKey};

const KEY_DELIMITER: char = ';';
const KEY_VALUE_SEPARATOR: char = '=';
const REDACTED: &str = "***";

/// `;<whitelisted key>=`, case-insensitive, built once from [`SettingKey::ALL`].
static KEY_MARKER: Lazy<Regex> = Lazy::new(|| {
    let alternatives = SettingKey::ALL
        .iter()
        .map(|key| regex::escape(key.as_str()))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(
        r"(?i){KEY_DELIMITER}\s*({alternatives})\s*{KEY_VALUE_SEPARATOR}"
    ))
    .expect("key marker pattern is built from static key names")
});

/// Something that looks like `Name=` following a stray delimiter.
static KEY_LIKE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_]*)\s*=").expect("static pattern")
});

/// Validated, immutable view of a connection string.
///
/// Every key is a member of the whitelist, appears at most once, and maps to a
/// value with at least one non-whitespace character. All stored values are
/// zeroed when the settings are dropped.
///
/// # Examples
///
/// ```no_run
/// use connection::{ConnectionSettings, SettingKey};
///
/// let settings = ConnectionSettings::parse(
///     "Endpoint=sb://ns.servicebus.windows.net/;SharedAccessKeyName=Root;SharedAccessKey=abc=",
/// )?;
/// assert_eq!(settings.get(SettingKey::SharedAccessKeyName), Some("Root"));
/// ```
#[derive(Default)]
pub struct ConnectionSettings {
    values: BTreeMap<SettingKey, String>,
}

impl ConnectionSettings {
    /// Parses a connection string.
    ///
    /// An empty or whitespace-only string yields empty settings so that the
    /// manager builder can report the missing `Endpoint` instead.
    ///
    /// # Errors
    ///
    /// - [`ConnectionStringError::MalformedInput`] for content before the first
    ///   key, unrecognized keys, or blank values
    /// - [`ConnectionStringError::DuplicateKey`] when a key repeats
    pub fn parse(connection_string: &str) -> ConnectionResult<Self> {
        if connection_string.trim().is_empty() {
            log::debug!("Empty connection string, no settings parsed");
            return Ok(Self::default());
        }

        let input = format!("{KEY_DELIMITER}{connection_string}");
        let markers: Vec<_> = KEY_MARKER.captures_iter(&input).collect();

        let first_start = markers
            .first()
            .and_then(|caps| caps.get(0))
            .map_or(input.len(), |m| m.start());
        let leading = &input[KEY_DELIMITER.len_utf8().min(first_start)..first_start];
        if !leading.trim().is_empty() {
            return Err(leading_content_error(leading));
        }

        let mut values = BTreeMap::new();
        for (index, caps) in markers.iter().enumerate() {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let key = SettingKey::from_name(name.as_str()).ok_or_else(|| {
                ConnectionStringError::malformed(format!(
                    "'{}' is not a recognized key",
                    name.as_str()
                ))
            })?;

            let value_end = markers
                .get(index + 1)
                .and_then(|next| next.get(0))
                .map_or(input.len(), |m| m.start());
            let value = clean_value(key, &input[whole.end()..value_end])?;

            if values.contains_key(&key) {
                return Err(ConnectionStringError::DuplicateKey { key });
            }
            values.insert(key, value.to_string());
        }

        log::debug!(
            "Parsed connection string with {} setting(s): {}",
            values.len(),
            values
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(Self { values })
    }

    pub fn get(&self, key: SettingKey) -> Option<&str> {
        self.values.get(&key).map(String::as_str)
    }

    pub fn contains(&self, key: SettingKey) -> bool {
        self.values.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Keys present, in canonical order.
    pub fn keys(&self) -> impl Iterator<Item = SettingKey> + '_ {
        self.values.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SettingKey, &str)> {
        self.values.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Entity the connection string is scoped to. Not consumed by the manager
    /// builder; exposed for the network client.
    pub fn entity_path(&self) -> Option<&str> {
        self.get(SettingKey::EntityPath)
    }

    /// Raw, uninterpreted `OperationTimeout` value.
    pub fn operation_timeout(&self) -> Option<&str> {
        self.get(SettingKey::OperationTimeout)
    }

    /// Copies a value into a fresh erasable buffer owned by the caller.
    pub fn secure(&self, key: SettingKey) -> Option<SecurePassword> {
        self.get(key).map(SecurePassword::new)
    }

    /// Connection string form with every secret value masked.
    pub fn redacted(&self) -> String {
        self.values
            .iter()
            .map(|(key, value)| {
                if key.is_secret() {
                    format!("{key}{KEY_VALUE_SEPARATOR}{REDACTED}")
                } else {
                    format!("{key}{KEY_VALUE_SEPARATOR}{value}")
                }
            })
            .collect::<Vec<_>>()
            .join(&KEY_DELIMITER.to_string())
    }
}

/// Trims the raw text between two key markers and validates it.
fn clean_value(key: SettingKey, raw: &str) -> ConnectionResult<&str> {
    let value = raw
        .trim()
        .trim_end_matches(KEY_DELIMITER)
        .trim_end();

    if value.is_empty() {
        return Err(ConnectionStringError::malformed(format!(
            "value for '{key}' is empty"
        )));
    }

    if let Some(pos) = value.find(KEY_DELIMITER) {
        let rest = &value[pos + KEY_DELIMITER.len_utf8()..];
        return Err(match KEY_LIKE.captures(rest).and_then(|c| c.get(1)) {
            Some(name) => ConnectionStringError::malformed(format!(
                "'{}' is not a recognized key",
                name.as_str()
            )),
            None => ConnectionStringError::malformed(format!(
                "value for '{key}' contains '{KEY_DELIMITER}'"
            )),
        });
    }

    Ok(value)
}

fn leading_content_error(leading: &str) -> ConnectionStringError {
    let first_segment = leading
        .split(KEY_DELIMITER)
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or_default();

    match KEY_LIKE.captures(first_segment).and_then(|c| c.get(1)) {
        Some(name) => {
            ConnectionStringError::malformed(format!("'{}' is not a recognized key", name.as_str()))
        }
        None => ConnectionStringError::malformed(
            "unexpected content before the first recognized key",
        ),
    }
}

impl Drop for ConnectionSettings {
    fn drop(&mut self) {
        for value in self.values.values_mut() {
            value.zeroize();
        }
    }
}

impl fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.values.iter().map(|(key, value)| {
                let shown = if key.is_secret() { REDACTED } else { value.as_str() };
                (key.as_str(), shown)
            }))
            .finish()
    }
}

impl FromStr for ConnectionSettings {
    type Err = ConnectionStringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
