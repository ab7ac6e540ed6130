//! VipaniCart - Orchestration for an autonomous cart-assist robot.
//!
//! Turns a shopping list into a sequence of navigation goals, executes the
//! sequence against a navigation backend with per-item failure handling,
//! and independently reconciles checkout scans against the same list to
//! drive a live checklist.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                     bridge/                          │  ← JSON contracts, submissions
//! └──────────────────────────────────────────────────────┘
//!                          │
//! ┌──────────────────────────────────────────────────────┐
//! │                    threads/                          │  ← Trip worker
//! └──────────────────────────────────────────────────────┘
//!                          │
//! ┌───────────────────────────┬──────────────────────────┐
//! │          trip/            │    checklist, scanner,   │
//! │   (executor, tasks)       │        session           │
//! └───────────────────────────┴──────────────────────────┘
//!              │                           │
//! ┌───────────────────────────┐  ┌─────────────────────────┐
//! │           nav/            │  │   catalog (resolver)    │
//! │  (backend trait, sim)     │  │                         │
//! └───────────────────────────┘  └─────────────────────────┘
//! ```
//!
//! The trip worker is the single owner of the navigation backend; scan
//! reconciliation is the single writer of the session (cart + checklist).
//! The two sides share only the shopping list itself.

pub mod bridge;
pub mod catalog;
pub mod checklist;
pub mod config;
pub mod error;
pub mod list;
pub mod nav;
pub mod scanner;
pub mod session;
pub mod threads;
pub mod trip;

pub use error::{CartError, Result};
