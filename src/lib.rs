pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use crate::services::{
    auth_service::AuthService, bonus_service::BonusService,
    employment_service::EmploymentService, history_service::HistoryService,
    leave_service::LeaveService, worker_service::WorkerService,
};
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub worker_service: WorkerService,
    pub employment_service: EmploymentService,
    pub history_service: HistoryService,
    pub leave_service: LeaveService,
    pub bonus_service: BonusService,
    pub auth_service: AuthService,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        let worker_service = WorkerService::new(pool.clone());
        let employment_service = EmploymentService::new(pool.clone());
        let history_service = HistoryService::new(pool.clone());
        let leave_service = LeaveService::new(pool.clone());
        let bonus_service = BonusService::new(pool.clone());
        let auth_service = AuthService::new(pool.clone());

        Self {
            pool,
            worker_service,
            employment_service,
            history_service,
            leave_service,
            bonus_service,
            auth_service,
        }
    }
}
