use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

id_newtype!(EmployeeId);

/// An employee record as stored by the remote directory service.
///
/// `id` is absent until the service assigns one and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EmployeeId>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub job_title: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_code: Option<String>,
}

/// Create payload: an employee that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub job_title: String,
    #[serde(default)]
    pub image_url: String,
}

impl EmployeeDraft {
    pub fn into_employee(self, id: Option<EmployeeId>) -> Employee {
        Employee {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            job_title: self.job_title,
            image_url: self.image_url,
            employee_code: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    Add,
    Edit,
    Delete,
}

impl Surface {
    pub fn as_str(self) -> &'static str {
        match self {
            Surface::Add => "add",
            Surface::Edit => "edit",
            Surface::Delete => "delete",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown surface mode `{0}`; expected add, edit or delete")]
pub struct SurfaceModeError(pub String);

impl FromStr for Surface {
    type Err = SurfaceModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(Surface::Add),
            "edit" => Ok(Surface::Edit),
            "delete" => Ok(Surface::Delete),
            other => Err(SurfaceModeError(other.to_string())),
        }
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
