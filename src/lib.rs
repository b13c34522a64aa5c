// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Fiture target tracking core.
//!
//! This crate provides the domain and synchronization layer of the Fiture
//! fitness tracker: per-day targets for calories, running, strength training,
//! water and body weight, kept in sync with a PostgREST row store.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod time_utils;

use std::sync::Arc;

use config::Config;
use db::{PostgrestStore, RowStore};
use services::EventBus;

/// Shared session context handed to every manager.
#[derive(Clone)]
pub struct AppContext {
    pub config: Config,
    pub store: Arc<dyn RowStore>,
    pub events: EventBus,
}

impl AppContext {
    pub fn new(config: Config, store: Arc<dyn RowStore>) -> Self {
        let events = EventBus::new(config.event_buffer);
        Self {
            config,
            store,
            events,
        }
    }

    /// Context backed by the PostgREST endpoint named in `config`.
    pub fn connect(config: Config) -> error::Result<Self> {
        let store = PostgrestStore::new(&config)?;
        Ok(Self::new(config, Arc::new(store)))
    }
}
