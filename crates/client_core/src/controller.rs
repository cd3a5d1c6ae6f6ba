//! Directory state manager, search filter and surface trigger.
//!
//! The directory is only ever replaced wholesale by a successful list fetch. Mutations
//! never patch it; they end in a reload. Concurrent reloads are not coordinated, so the
//! one that completes last determines the visible state.

use std::sync::Arc;

use shared::domain::{Employee, EmployeeId, Surface};
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, warn};

use crate::{
    error::{DirectoryError, Operation},
    form::EmployeeForm,
    presenter::{Notifier, SurfacePresenter},
    search::filter_employees,
    service::EmployeeService,
};

const EVENT_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryEvent {
    Reloaded { count: usize },
    Filtered { key: String, count: usize },
    SelectionChanged(Surface),
    SurfaceOpened(Surface),
    OperationFailed(DirectoryError),
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DirectorySnapshot {
    pub directory: Vec<Employee>,
    pub displayed: Vec<Employee>,
    pub edit_selection: Option<Employee>,
    pub delete_selection: Option<Employee>,
}

#[derive(Default)]
struct DirectoryState {
    directory: Vec<Employee>,
    displayed: Vec<Employee>,
    edit_selection: Option<Employee>,
    delete_selection: Option<Employee>,
}

pub struct DirectoryController {
    service: Arc<dyn EmployeeService>,
    presenter: Arc<dyn SurfacePresenter>,
    notifier: Arc<dyn Notifier>,
    state: RwLock<DirectoryState>,
    events: broadcast::Sender<DirectoryEvent>,
}

impl DirectoryController {
    pub fn new(
        service: Arc<dyn EmployeeService>,
        presenter: Arc<dyn SurfacePresenter>,
        notifier: Arc<dyn Notifier>,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Arc::new(Self {
            service,
            presenter,
            notifier,
            state: RwLock::new(DirectoryState::default()),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<DirectoryEvent> {
        self.events.subscribe()
    }

    pub async fn directory(&self) -> Vec<Employee> {
        self.state.read().await.directory.clone()
    }

    pub async fn displayed(&self) -> Vec<Employee> {
        self.state.read().await.displayed.clone()
    }

    pub async fn edit_selection(&self) -> Option<Employee> {
        self.state.read().await.edit_selection.clone()
    }

    pub async fn delete_selection(&self) -> Option<Employee> {
        self.state.read().await.delete_selection.clone()
    }

    pub async fn snapshot(&self) -> DirectorySnapshot {
        let state = self.state.read().await;
        DirectorySnapshot {
            directory: state.directory.clone(),
            displayed: state.displayed.clone(),
            edit_selection: state.edit_selection.clone(),
            delete_selection: state.delete_selection.clone(),
        }
    }

    /// Replaces the directory with the service's current list.
    pub async fn reload(&self) -> Result<(), DirectoryError> {
        let employees = match self.service.list_employees().await {
            Ok(employees) => employees,
            Err(err) => return Err(self.surface_failure(Operation::Reload, &err)),
        };

        let count = employees.len();
        {
            let mut state = self.state.write().await;
            state.displayed = employees.clone();
            state.directory = employees;
        }
        info!(count, "directory reloaded");
        self.emit(DirectoryEvent::Reloaded { count });
        Ok(())
    }

    /// Submits the add form. The form is reset only once the record was accepted.
    pub async fn create(&self, form: &mut EmployeeForm) -> Result<(), DirectoryError> {
        self.presenter.dismiss(Surface::Add);
        let draft = form.to_draft();
        match self.service.create_employee(&draft).await {
            Ok(created) => {
                debug!(id = ?created.id, "create accepted");
                form.reset();
                self.reload().await
            }
            Err(err) => Err(self.surface_failure(Operation::Create, &err)),
        }
    }

    pub async fn update(&self, employee: &Employee) -> Result<(), DirectoryError> {
        match self.service.update_employee(employee).await {
            Ok(updated) => {
                debug!(id = ?updated.id, "update accepted");
                self.reload().await
            }
            Err(err) => Err(self.surface_failure(Operation::Update, &err)),
        }
    }

    /// Deletes by id. An unset id is still sent; the service's rejection is surfaced.
    pub async fn remove(&self, id: Option<EmployeeId>) -> Result<(), DirectoryError> {
        match self.service.delete_employee(id).await {
            Ok(()) => {
                debug!(id = ?id, "remove accepted");
                self.reload().await
            }
            Err(err) => Err(self.surface_failure(Operation::Remove, &err)),
        }
    }

    /// Narrows the displayed list to employees matching `key`.
    ///
    /// An empty key, or a key that matches nothing, falls back to a full reload instead of
    /// showing an empty list.
    pub async fn search(&self, key: &str) -> Result<(), DirectoryError> {
        if key.is_empty() {
            return self.reload().await;
        }

        let count = {
            let mut state = self.state.write().await;
            let result = filter_employees(&state.directory, key);
            if result.is_empty() {
                None
            } else {
                let count = result.len();
                state.displayed = result;
                Some(count)
            }
        };

        match count {
            Some(count) => {
                debug!(%key, count, "search narrowed directory");
                self.emit(DirectoryEvent::Filtered {
                    key: key.to_string(),
                    count,
                });
                Ok(())
            }
            None => {
                debug!(%key, "search matched nothing; reloading");
                self.reload().await
            }
        }
    }

    /// Records the subject of `surface` and asks the presenter to show it.
    ///
    /// Add leaves both selections alone; edit and delete each overwrite only their own.
    pub async fn open_surface(&self, employee: Option<&Employee>, surface: Surface) {
        match surface {
            Surface::Add => self.presenter.open_add(),
            Surface::Edit | Surface::Delete => {
                let Some(employee) = employee else {
                    warn!(%surface, "surface not opened: no subject employee given");
                    return;
                };
                {
                    let mut state = self.state.write().await;
                    if surface == Surface::Edit {
                        state.edit_selection = Some(employee.clone());
                    } else {
                        state.delete_selection = Some(employee.clone());
                    }
                }
                self.emit(DirectoryEvent::SelectionChanged(surface));

                if surface == Surface::Edit {
                    self.presenter.open_edit(employee);
                } else {
                    self.presenter.open_delete(employee);
                }
            }
        }
        self.emit(DirectoryEvent::SurfaceOpened(surface));
    }

    pub async fn open_add(&self) {
        self.open_surface(None, Surface::Add).await;
    }

    pub async fn open_edit(&self, employee: &Employee) {
        self.open_surface(Some(employee), Surface::Edit).await;
    }

    pub async fn open_delete(&self, employee: &Employee) {
        self.open_surface(Some(employee), Surface::Delete).await;
    }

    fn surface_failure(&self, operation: Operation, err: &anyhow::Error) -> DirectoryError {
        let failure = DirectoryError::remote(operation, err);
        warn!(%operation, error = %failure.message(), "directory operation failed");
        self.notifier.alert(failure.message());
        self.emit(DirectoryEvent::OperationFailed(failure.clone()));
        failure
    }

    fn emit(&self, event: DirectoryEvent) {
        // Fails only when nobody is subscribed.
        let _ = self.events.send(event);
    }
}
