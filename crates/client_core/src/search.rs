//! Case-insensitive substring search over the searchable employee fields.

use shared::domain::Employee;

/// True when the lowercased `key` occurs in the lowercased name, email, phone or job title.
pub fn matches(employee: &Employee, key: &str) -> bool {
    let key = key.to_lowercase();
    matches_lowered(employee, &key)
}

fn matches_lowered(employee: &Employee, key: &str) -> bool {
    [
        &employee.name,
        &employee.email,
        &employee.phone,
        &employee.job_title,
    ]
    .into_iter()
    .any(|field| field.to_lowercase().contains(key))
}

/// Order-preserving subsequence of `employees` that match `key`.
pub fn filter_employees(employees: &[Employee], key: &str) -> Vec<Employee> {
    let key = key.to_lowercase();
    employees
        .iter()
        .filter(|employee| matches_lowered(employee, &key))
        .cloned()
        .collect()
}
