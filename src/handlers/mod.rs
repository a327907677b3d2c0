pub mod charges;
pub mod clients;
pub mod common;
pub mod expenses;
pub mod exports;
pub mod health;
pub mod products;
pub mod reports;
pub mod revenues;
pub mod settings;
pub mod vessels;

use crate::db::DbPool;
use crate::services::{
    charges::ChargeService, clients::ClientService, expenses::ExpenseService,
    products::ProductService, reporting::AggregationService, revenues::RevenueService,
    vessels::VesselService,
};
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer used by the HTTP handlers; every service shares the pool.
#[derive(Clone)]
pub struct AppServices {
    pub vessels: Arc<VesselService>,
    pub clients: Arc<ClientService>,
    pub products: Arc<ProductService>,
    pub revenues: Arc<RevenueService>,
    pub expenses: Arc<ExpenseService>,
    pub charges: Arc<ChargeService>,
    pub aggregation: Arc<AggregationService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            vessels: Arc::new(VesselService::new(db_pool.clone())),
            clients: Arc::new(ClientService::new(db_pool.clone())),
            products: Arc::new(ProductService::new(db_pool.clone())),
            revenues: Arc::new(RevenueService::new(db_pool.clone())),
            expenses: Arc::new(ExpenseService::new(db_pool.clone())),
            charges: Arc::new(ChargeService::new(db_pool.clone())),
            aggregation: Arc::new(AggregationService::new(db_pool)),
        }
    }
}
