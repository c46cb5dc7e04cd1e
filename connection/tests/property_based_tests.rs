use connection::{ConnectionSettings, ConnectionStringError, ManagerBuilder, SettingKey};
use proptest::prelude::*;

fn key_strategy() -> impl Strategy<Value = SettingKey> {
    prop::sample::select(SettingKey::ALL.to_vec())
}

/// Randomizes the ASCII case of a key name.
fn cased(name: &str, mask: u32) -> String {
    name.chars()
        .enumerate()
        .map(|(i, c)| {
            if mask & (1 << (i % 32)) != 0 {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            }
        })
        .collect()
}

#[cfg(test)]
mod parser_property_tests {
    use super::*;

    proptest! {
        #[test]
        fn test_well_formed_pairs_parse_exactly(
            keys in prop::collection::btree_set(key_strategy(), 0..16),
            values in prop::collection::vec("[A-Za-z0-9:/._=+-]{1,24}", 16),
            mask in any::<u32>()
        ) {
            let pairs: Vec<(SettingKey, String)> = keys
                .iter()
                .zip(values.iter())
                .map(|(k, v)| (*k, v.clone()))
                .collect();

            let input: String = pairs
                .iter()
                .map(|(k, v)| format!(";{}={}", cased(k.as_str(), mask), v))
                .collect();

            let settings = ConnectionSettings::parse(&input);
            prop_assert!(settings.is_ok(), "failed to parse {input:?}");
            let settings = settings.unwrap();

            // Property: exactly the supplied pairs come back
            prop_assert_eq!(settings.len(), pairs.len());
            for (key, value) in &pairs {
                prop_assert_eq!(settings.get(*key), Some(value.as_str()));
            }
        }

        #[test]
        fn test_whitespace_only_is_empty(input in "[ \t\r\n]{0,16}") {
            let settings = ConnectionSettings::parse(&input);
            prop_assert!(settings.is_ok());
            prop_assert!(settings.unwrap().is_empty());
        }

        #[test]
        fn test_repeated_key_is_duplicate(
            key in key_strategy(),
            first in "[a-z0-9]{1,10}",
            second in "[a-z0-9]{1,10}"
        ) {
            let input = format!("{key}={first};{key}={second}");
            prop_assert_eq!(
                ConnectionSettings::parse(&input).err(),
                Some(ConnectionStringError::DuplicateKey { key })
            );
        }

        #[test]
        fn test_unknown_keys_never_pass(name in "[A-Z][a-zA-Z]{2,12}", value in "[a-z0-9]{1,10}") {
            prop_assume!(SettingKey::from_name(&name).is_none());

            let alone = ConnectionSettings::parse(&format!("{name}={value}"));
            let after_known = ConnectionSettings::parse(&format!("Endpoint=sb://a/;{name}={value}"));

            let alone_is_malformed = matches!(alone, Err(ConnectionStringError::MalformedInput { .. }));
            let after_known_is_malformed =
                matches!(after_known, Err(ConnectionStringError::MalformedInput { .. }));
            prop_assert!(alone_is_malformed);
            prop_assert!(after_known_is_malformed);
        }
    }
}

#[cfg(test)]
mod port_override_property_tests {
    use super::*;

    proptest! {
        #[test]
        fn test_non_positive_port_leaves_endpoint_unchanged(port in i64::MIN..=0) {
            let builder = ManagerBuilder::from_connection_string(&format!(
                "Endpoint=sb://ns.example.net:5671/;ManagementPort={port}"
            )).unwrap();

            let endpoints = builder.management_endpoints().unwrap();
            prop_assert_eq!(endpoints[0].port(), Some(5671));
        }

        #[test]
        fn test_non_numeric_port_leaves_endpoint_unchanged(port in "[a-zA-Z][a-zA-Z0-9]{0,8}") {
            let builder = ManagerBuilder::from_connection_string(&format!(
                "Endpoint=sb://ns.example.net/;RuntimePort={port}"
            )).unwrap();

            let endpoints = builder.runtime_endpoints().unwrap();
            prop_assert_eq!(endpoints[0].port(), None);
        }

        #[test]
        fn test_valid_port_is_applied(port in 1u16..=u16::MAX) {
            let builder = ManagerBuilder::from_connection_string(&format!(
                "Endpoint=sb://ns.example.net/;ManagementPort={port}"
            )).unwrap();

            let endpoints = builder.management_endpoints().unwrap();
            prop_assert_eq!(endpoints[0].port(), Some(port));
        }
    }
}
