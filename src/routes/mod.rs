pub mod auth;
pub mod bonus;
pub mod documents;
pub mod employment;
pub mod health;
pub mod history;
pub mod leave;
pub mod worker;
