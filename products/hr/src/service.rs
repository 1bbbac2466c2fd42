use std::sync::Arc;

use tracing::{info, instrument};

use crate::{
    error::{HrError, HrResult},
    model::{
        CreateEmployee, CreatedEmployee, Employee, UpdateEmployee, onboarding_checklist,
    },
    notify::{Notifier, WelcomeWriter},
    store::EmployeeStore,
};

/// Orchestrates the employee endpoints. Persistence gates every side effect;
/// nothing that happens after a successful insert can undo it.
#[derive(Clone)]
pub struct HrService {
    store: Arc<dyn EmployeeStore>,
    writer: Arc<dyn WelcomeWriter>,
    notifier: Arc<dyn Notifier>,
}

impl HrService {
    pub fn new(
        store: Arc<dyn EmployeeStore>,
        writer: Arc<dyn WelcomeWriter>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            store,
            writer,
            notifier,
        }
    }

    #[instrument(name = "hr.create_employee", skip_all)]
    pub async fn create(&self, payload: CreateEmployee) -> HrResult<CreatedEmployee> {
        let draft = payload.validate()?;
        let employee = &draft.fields;
        let employee_id = self.store.insert(employee).await?;
        info!(employee_id, "employee stored");

        let checklist = onboarding_checklist(&employee.name, &draft.field);
        let welcome_email = self
            .writer
            .welcome_text(&employee.name, &employee.role, &draft.field, &draft.organization)
            .await;
        let subject = format!("Welcome to {}!", draft.organization);
        self.notifier
            .notify(&employee.email, &subject, &welcome_email)
            .await;

        Ok(CreatedEmployee {
            message: format!("Employee {} added successfully!", employee.name),
            employee_id,
            checklist,
            welcome_email,
        })
    }

    #[instrument(name = "hr.list_employees", skip_all)]
    pub async fn list(&self) -> HrResult<Vec<Employee>> {
        Ok(self.store.list_all().await?)
    }

    #[instrument(name = "hr.update_employee", skip(self, payload))]
    pub async fn update(&self, id: i32, payload: UpdateEmployee) -> HrResult<String> {
        let fields = payload.validate()?;
        if !self.store.update(id, &fields).await? {
            return Err(HrError::NotFound(id));
        }
        Ok(format!("Employee {id} updated successfully!"))
    }

    #[instrument(name = "hr.delete_employee", skip(self))]
    pub async fn delete(&self, id: i32) -> HrResult<String> {
        if !self.store.delete(id).await? {
            return Err(HrError::NotFound(id));
        }
        Ok(format!("Employee {id} deleted successfully!"))
    }
}
