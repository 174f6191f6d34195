//! Property-Based Tests for the Cache Repository
//!
//! Drives a repository over the in-process store with proptest-generated
//! keys, values and TTLs.

use proptest::prelude::*;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{CacheRepository, MAX_TTL};
use crate::config::CacheSettings;
use crate::logger::TracingLog;
use crate::serializer::JsonSerializer;
use crate::store::{MemoryConnector, MemoryStore};

// == Test Configuration ==
const TEST_ENVIRONMENT: &str = "prop-env";
const TEST_AREA: &str = "prop-area";

// == Helpers ==
fn repository() -> (CacheRepository, Arc<MemoryStore>) {
    let connector = MemoryConnector::new();
    let settings = CacheSettings::new(TEST_ENVIRONMENT, TEST_AREA, "memory").unwrap();
    let repo = tokio_test::block_on(CacheRepository::connect_with(
        &connector,
        &settings,
        JsonSerializer::new(),
        Arc::new(TracingLog::new()),
    ));
    (repo, connector.store())
}

// == Strategies ==
/// Generates non-blank cache keys
fn valid_key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_:.-]{1,64}".prop_map(|s| s)
}

/// Generates non-empty values (an empty string would read back as a miss)
fn valid_value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{1,256}".prop_map(|s| s)
}

/// Generates TTLs within (0, MAX_TTL]
fn valid_ttl_strategy() -> impl Strategy<Value = Duration> {
    (1u64..=MAX_TTL.as_secs()).prop_map(Duration::from_secs)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Set followed by TryGet returns the stored value
    #[test]
    fn prop_roundtrip_storage(
        key in valid_key_strategy(),
        value in valid_value_strategy(),
        ttl in valid_ttl_strategy()
    ) {
        let (repo, store) = repository();

        repo.set(&key, &value, Some(ttl)).unwrap();

        let retrieved: Option<String> = tokio_test::block_on(repo.try_get(&key)).unwrap();
        prop_assert_eq!(retrieved, Some(value), "Round-trip value mismatch");

        let namespaced = format!("{}:{}:{}", TEST_ENVIRONMENT, TEST_AREA, key);
        prop_assert_eq!(store.ttl_of(&namespaced), Some(ttl), "TTL within bounds must be kept");
    }

    // Any TTL above the maximum is written as exactly the maximum
    #[test]
    fn prop_ttl_clamped_on_write(
        key in valid_key_strategy(),
        extra_secs in 1u64..1_000_000
    ) {
        let (repo, store) = repository();
        let requested = MAX_TTL + Duration::from_secs(extra_secs);

        prop_assert!(tokio_test::block_on(repo.add(&key, &1u8, Some(requested))).unwrap());

        let namespaced = repo.namespaced_key(&key).unwrap();
        prop_assert_eq!(store.ttl_of(&namespaced), Some(MAX_TTL));
    }

    // Remove followed by TryGet misses
    #[test]
    fn prop_delete_removes_entry(key in valid_key_strategy(), value in valid_value_strategy()) {
        let (repo, _) = repository();

        repo.set(&key, &value, None).unwrap();
        prop_assert!(tokio_test::block_on(repo.contains_key(&key)).unwrap());

        repo.remove(&key).unwrap();

        let retrieved: Option<String> = tokio_test::block_on(repo.try_get(&key)).unwrap();
        prop_assert_eq!(retrieved, None, "Key should not exist after remove");
    }

    // Set overwrites, Add does not
    #[test]
    fn prop_overwrite_semantics(
        key in valid_key_strategy(),
        value1 in valid_value_strategy(),
        value2 in valid_value_strategy()
    ) {
        let (repo, store) = repository();

        prop_assert!(tokio_test::block_on(repo.add(&key, &value1, None)).unwrap());
        prop_assert!(!tokio_test::block_on(repo.add(&key, &value2, None)).unwrap());

        let retrieved: Option<String> = tokio_test::block_on(repo.try_get(&key)).unwrap();
        prop_assert_eq!(retrieved, Some(value1), "Add must not overwrite");

        repo.set(&key, &value2, None).unwrap();

        let retrieved: Option<String> = tokio_test::block_on(repo.try_get(&key)).unwrap();
        prop_assert_eq!(retrieved, Some(value2), "Set must overwrite");
        prop_assert_eq!(store.len(), 1, "Should have exactly one entry after overwrite");
    }

    // Keys of different functional areas never collide
    #[test]
    fn prop_namespaces_are_isolated(key in valid_key_strategy(), value in valid_value_strategy()) {
        let connector = MemoryConnector::new();
        let repository_for = |area: &str| {
            let settings = CacheSettings::new(TEST_ENVIRONMENT, area, "memory").unwrap();
            tokio_test::block_on(CacheRepository::connect_with(
                &connector,
                &settings,
                JsonSerializer::new(),
                Arc::new(TracingLog::new()),
            ))
        };
        let orders = repository_for("orders");
        let users = repository_for("users");

        orders.set(&key, &value, None).unwrap();

        let from_users: Option<String> = tokio_test::block_on(users.try_get(&key)).unwrap();
        prop_assert_eq!(from_users, None);
        prop_assert_eq!(connector.store().len(), 1);
    }
}
