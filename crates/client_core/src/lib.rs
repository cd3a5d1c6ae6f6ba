//! Client-side controller for the employee directory.
//!
//! [`DirectoryController`] owns the directory snapshot and selections, talks to an
//! [`EmployeeService`] and hands actions to a [`SurfacePresenter`].

pub mod controller;
pub mod error;
pub mod form;
pub mod presenter;
pub mod search;
pub mod service;

pub use controller::{DirectoryController, DirectoryEvent, DirectorySnapshot};
pub use error::{DirectoryError, Operation};
pub use form::EmployeeForm;
pub use presenter::{HeadlessPresenter, Notifier, SurfacePresenter};
pub use search::{filter_employees, matches};
pub use service::{EmployeeService, HttpEmployeeService};

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod controller_tests;

#[cfg(test)]
#[path = "tests/service_tests.rs"]
mod service_tests;
