//! Seller onboarding client: sign-in, the step-by-step onboarding wizard
//! and the application review pages.

pub mod api;
pub mod application;
pub mod auth;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod lifecycle;
pub mod onboarding;
pub mod pages;
pub mod session;
pub mod watcher;
