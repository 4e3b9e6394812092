//! Shared application state
//! 
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::repositories::InMemoryFleetStore;
use crate::services::BookingService;

pub type FleetBookingService = BookingService<InMemoryFleetStore>;

#[derive(Clone)]
pub struct AppState {
    pub booking: Arc<FleetBookingService>,
    pub config: EnvironmentConfig,
}

impl AppState {
    pub fn new(booking: FleetBookingService, config: EnvironmentConfig) -> Self {
        Self {
            booking: Arc::new(booking),
            config,
        }
    }
}
