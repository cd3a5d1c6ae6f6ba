//! Seams towards the presentation layer.
//!
//! The controller never renders anything itself. It hands the subject of an action to a
//! [`SurfacePresenter`] and reports failures through a [`Notifier`]; both are one-way.

use shared::domain::{Employee, Surface};
use tracing::info;

pub trait SurfacePresenter: Send + Sync {
    fn open_add(&self);
    fn open_edit(&self, employee: &Employee);
    fn open_delete(&self, employee: &Employee);

    /// Closes a surface that is currently shown. Presenters without modal surfaces can
    /// ignore it.
    fn dismiss(&self, _surface: Surface) {}
}

/// Blocking, user-facing failure notification.
pub trait Notifier: Send + Sync {
    fn alert(&self, message: &str);
}

/// Presenter for hosts without any surfaces; openings are only logged.
pub struct HeadlessPresenter;

impl SurfacePresenter for HeadlessPresenter {
    fn open_add(&self) {
        info!(surface = "add", "surface requested without presenter");
    }

    fn open_edit(&self, employee: &Employee) {
        info!(surface = "edit", id = ?employee.id, "surface requested without presenter");
    }

    fn open_delete(&self, employee: &Employee) {
        info!(surface = "delete", id = ?employee.id, "surface requested without presenter");
    }
}
