//! Application status model, destination resolution and routes.

pub mod model;
pub mod resolver;
pub mod routes;

pub use model::{ApplicationStatus, FeedbackItem, OnboardingStep, StatusSnapshot};
pub use resolver::{Destination, resolve_destination, resolve_or_onboard, start_step};
pub use routes::{Navigator, Route, RouteHistory};
