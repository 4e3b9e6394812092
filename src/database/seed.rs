//! Semilla de la flota
//!
//! Formato del fichero (todas las colecciones son opcionales):
//!
//! ```json
//! {
//!   "vehicles": [...], "drivers": [...], "promos": [...],
//!   "routes": [...], "customers": [...], "rentals": [...]
//! }
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::RentalPolicy;
use crate::models::{Customer, Driver, Promo, Rental, Route, Vehicle};
use crate::repositories::InMemoryFleetStore;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FleetSeed {
    pub vehicles: Vec<Vehicle>,
    pub drivers: Vec<Driver>,
    pub promos: Vec<Promo>,
    pub routes: Vec<Route>,
    pub customers: Vec<Customer>,
    /// Historial previo; los ids nuevos continúan después del mayor
    pub rentals: Vec<Rental>,
}

impl FleetSeed {
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("Invalid fleet seed JSON")
    }

    pub fn into_store(self, policy: &RentalPolicy) -> InMemoryFleetStore {
        let mut store = InMemoryFleetStore::new(policy);
        for vehicle in self.vehicles {
            store.add_vehicle(vehicle);
        }
        for driver in self.drivers {
            store.add_driver(driver);
        }
        for promo in self.promos {
            store.add_promo(promo);
        }
        for route in self.routes {
            store.add_route(route);
        }
        for customer in self.customers {
            store.add_customer(customer);
        }
        for rental in self.rentals {
            store.add_rental(rental);
        }
        store
    }
}

/// Leer la semilla de disco
pub async fn load_seed(path: impl AsRef<Path>) -> Result<FleetSeed> {
    let path = path.as_ref();
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Cannot read fleet seed at {}", path.display()))?;
    let seed = FleetSeed::from_json(&raw)?;

    info!(
        "🌱 Semilla cargada desde {}: {} vehículos, {} conductores, {} promociones, {} rutas, {} clientes",
        path.display(),
        seed.vehicles.len(),
        seed.drivers.len(),
        seed.promos.len(),
        seed.routes.len(),
        seed.customers.len()
    );
    Ok(seed)
}
