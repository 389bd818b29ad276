// Typed endpoint methods, split by domain. Each file adds inherent
// methods to `ApiClient`; transport mechanics stay in `crate::client`.

mod attendance;
mod employees;
mod leave;
mod news;
mod notifications;
mod payslips;
mod tasks;
