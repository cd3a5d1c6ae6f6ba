use shared::domain::EmployeeDraft;

/// Input form backing the add surface. Cleared only after a successful create.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub job_title: String,
    pub image_url: String,
}

impl EmployeeForm {
    pub fn to_draft(&self) -> EmployeeDraft {
        EmployeeDraft {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            job_title: self.job_title.clone(),
            image_url: self.image_url.clone(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl From<EmployeeDraft> for EmployeeForm {
    fn from(draft: EmployeeDraft) -> Self {
        Self {
            name: draft.name,
            email: draft.email,
            phone: draft.phone,
            job_title: draft.job_title,
            image_url: draft.image_url,
        }
    }
}
