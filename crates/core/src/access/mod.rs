mod error;
mod functions;
mod matrix;
mod types;

pub use error::AccessDenied;
pub use functions::{
    allowed_methods, authorize, can_access_route, can_mutate_policy, can_perform_method,
    is_module_allowed, is_read_only_method, module_for_path, needs_center_restriction,
    report_scope,
};
pub use matrix::{FULL, READ_ONLY};
pub use types::{AccessRequest, AccessScope, Module, ReportScope, Role};
