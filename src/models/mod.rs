pub mod bonus;
pub mod employment_history;
pub mod employment_record;
pub mod leave_request;
pub mod user;
pub mod worker;
