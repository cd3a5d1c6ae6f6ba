//! Route table of the remote directory service.

use crate::domain::EmployeeId;

pub const LIST_EMPLOYEES_PATH: &str = "/employee/all";
pub const ADD_EMPLOYEE_PATH: &str = "/employee/add";
pub const UPDATE_EMPLOYEE_PATH: &str = "/employee/update";
pub const DELETE_EMPLOYEE_PREFIX: &str = "/employee/delete/";

/// Delete route for `id`. An unset id yields an empty trailing segment; the request is
/// still sent and the service decides how to reject it.
pub fn delete_employee_path(id: Option<EmployeeId>) -> String {
    match id {
        Some(id) => format!("{DELETE_EMPLOYEE_PREFIX}{id}"),
        None => DELETE_EMPLOYEE_PREFIX.to_string(),
    }
}
