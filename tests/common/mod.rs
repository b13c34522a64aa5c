// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use std::sync::Arc;

use chrono::NaiveDate;
use fiture_core::config::Config;
use fiture_core::db::{MemoryStore, PostgrestStore};
use fiture_core::models::UserId;
use fiture_core::AppContext;

/// Check if a live backend is available via environment variable.
#[allow(dead_code)]
pub fn backend_available() -> bool {
    std::env::var("FITURE_TEST_SUPABASE_URL").is_ok()
}

/// Skip test with message if no live backend is configured.
#[macro_export]
macro_rules! require_backend {
    () => {
        if !crate::common::backend_available() {
            eprintln!("⚠️  Skipping: FITURE_TEST_SUPABASE_URL not set");
            return;
        }
    };
}

/// Context over a fresh in-memory store. The store handle is returned for
/// seeding, inspection and failure injection.
#[allow(dead_code)]
pub fn test_context() -> (AppContext, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    (AppContext::new(Config::default(), store.clone()), store)
}

/// Context over an in-memory store that enforces unique keys like a real
/// schema would.
#[allow(dead_code)]
pub fn test_context_with(store: MemoryStore) -> (AppContext, Arc<MemoryStore>) {
    let store = Arc::new(store);
    (AppContext::new(Config::default(), store.clone()), store)
}

/// Context against the live backend named by `FITURE_TEST_SUPABASE_URL`.
#[allow(dead_code)]
pub fn backend_context() -> AppContext {
    let config = Config {
        supabase_url: std::env::var("FITURE_TEST_SUPABASE_URL").expect("backend url"),
        supabase_anon_key: std::env::var("FITURE_TEST_SUPABASE_ANON_KEY").unwrap_or_default(),
        access_token: std::env::var("FITURE_TEST_ACCESS_TOKEN").ok(),
        ..Config::default()
    };
    let store = PostgrestStore::new(&config).expect("Failed to build PostgREST client");
    AppContext::new(config, Arc::new(store))
}

#[allow(dead_code)]
pub fn test_user() -> UserId {
    UserId::parse("6f9619ff-8b86-d011-b42d-00c04fc964ff").unwrap()
}

#[allow(dead_code)]
pub fn other_user() -> UserId {
    UserId::parse("0b5d3c52-4d7a-4c1e-9a55-1f7a3b2e9c10").unwrap()
}

#[allow(dead_code)]
pub fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}
