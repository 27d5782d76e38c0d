//! Terminal rendering using ratatui.
//!
//! - [`common`]: header KPIs, tabs, status bar, help overlay, formatters
//! - [`controls`]: weight sliders and vendor multiselect sidebar
//! - [`ranking`], [`delivery`], [`finance`], [`identity`]: one module per view
//! - [`detail`]: vendor score breakdown overlay
//! - [`theme`]: light/dark colours

pub mod common;
pub mod controls;
pub mod delivery;
pub mod detail;
pub mod finance;
pub mod identity;
pub mod ranking;
pub mod theme;

pub use theme::Theme;
