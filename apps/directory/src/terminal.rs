//! Terminal rendering of the directory and its surfaces.

use std::sync::Mutex;

use client_core::{Notifier, SurfacePresenter};
use shared::domain::{Employee, Surface};

/// Remembers which surface the controller asked for; the shell loop shows it.
#[derive(Default)]
pub struct TerminalPresenter {
    pending: Mutex<Option<Surface>>,
}

impl TerminalPresenter {
    pub fn take_pending(&self) -> Option<Surface> {
        self.pending.lock().ok().and_then(|mut pending| pending.take())
    }

    fn set_pending(&self, surface: Option<Surface>) {
        if let Ok(mut pending) = self.pending.lock() {
            *pending = surface;
        }
    }
}

impl SurfacePresenter for TerminalPresenter {
    fn open_add(&self) {
        println!("-- add employee --");
        self.set_pending(Some(Surface::Add));
    }

    fn open_edit(&self, employee: &Employee) {
        println!("-- edit {} --", employee.name);
        self.set_pending(Some(Surface::Edit));
    }

    fn open_delete(&self, employee: &Employee) {
        println!("-- delete {} --", employee.name);
        self.set_pending(Some(Surface::Delete));
    }

    fn dismiss(&self, surface: Surface) {
        if let Ok(mut pending) = self.pending.lock() {
            if *pending == Some(surface) {
                *pending = None;
            }
        }
    }
}

pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn alert(&self, message: &str) {
        eprintln!("error: {message}");
    }
}

pub fn render_table(employees: &[Employee]) -> String {
    if employees.is_empty() {
        return "no employees\n".to_string();
    }

    let rows: Vec<[String; 5]> = employees
        .iter()
        .map(|employee| {
            [
                employee
                    .id
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                employee.name.clone(),
                employee.email.clone(),
                employee.phone.clone(),
                employee.job_title.clone(),
            ]
        })
        .collect();

    let header = ["ID", "NAME", "EMAIL", "PHONE", "JOB TITLE"];
    let mut widths = header.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &header.map(String::from), &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String; 5], widths: &[usize; 5]) {
    let line = cells
        .iter()
        .zip(widths.iter().copied())
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}
