//! HR onboarding slice.
//!
//! The employee row is the durable fact. The checklist and welcome copy are
//! derived per request and never stored.

mod error;
mod model;
mod notify;
mod service;
mod store;

#[cfg(test)]
mod test_support;

pub use error::{HrError, HrResult};
pub use model::{
    CreateEmployee, CreatedEmployee, Employee, EmployeeDraft, EmployeeFields, UpdateEmployee,
    onboarding_checklist,
};
pub use notify::{Notifier, WelcomeWriter};
pub use service::HrService;
pub use store::{EmployeeStore, SeaOrmEmployeeStore};
