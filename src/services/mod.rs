pub mod auth_service;
pub mod bonus_service;
pub mod employment_service;
pub mod history_service;
pub mod leave_service;
pub mod worker_service;
