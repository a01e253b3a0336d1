//! Core library for `LeadDesk`.
//!
//! Contains the lead intake pipeline, the admin projection of stored leads,
//! resume upload storage, the admin key check, and the notification
//! dispatcher. This crate depends on `leaddesk-storage` for the
//! [`LeadStore`](leaddesk_storage::LeadStore) trait and knows nothing about
//! HTTP.

pub mod admin_key;
pub mod error;
pub mod lead;
pub mod notify;
pub mod service;
pub mod uploads;
