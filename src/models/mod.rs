//! Built-in resources. Each module exposes a `register_model` hook for `register_models`.

pub mod employee;
pub mod subscriber;
pub mod user;

pub use employee::{Employee, EmployeeCreate, EmployeePatch, EmployeePosition};
pub use subscriber::{Subscriber, SubscriberCreate, SubscriberPatch};
pub use user::{User, UserCreate, UserPatch};

use crate::registry::RegistrationHook;

/// Hooks for every built-in resource, in menu order.
pub const BUILTIN_HOOKS: &[RegistrationHook] = &[
    user::register_model,
    employee::register_model,
    subscriber::register_model,
];
