//! Repositorios
//!
//! Interfaces estrechas con las que el núcleo de reservas consulta y muta
//! las entidades de la flota. El almacenamiento concreto queda fuera del
//! núcleo; `memory_store` ofrece la implementación en memoria y
//! `persistence` los sumideros que reciben cada mutación confirmada.

pub mod memory_store;
pub mod persistence;

pub use memory_store::InMemoryFleetStore;
pub use persistence::{JsonSnapshotSink, PersistenceSink, TracingPersistenceSink};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::models::{
    Customer, CustomerId, Driver, DriverId, DriverStatus, Invoice, InvoiceId, NewInvoice, Promo,
    Rental, RentalId, Route, RouteId, Vehicle, VehicleCategory, VehicleId,
};
use crate::services::resource_allocator::select_driver;
use crate::utils::errors::AppResult;

pub trait VehicleRepository {
    fn find_vehicle_by_id(&self, id: VehicleId) -> Option<Vehicle>;
    fn list_vehicles(&self) -> Vec<Vehicle>;
    fn mark_vehicle_availability(&mut self, id: VehicleId, available: bool) -> AppResult<()>;
    fn record_vehicle_rating(&mut self, id: VehicleId, rating: u8) -> AppResult<()>;
}

pub trait DriverRepository {
    fn find_driver_by_id(&self, id: DriverId) -> Option<Driver>;
    /// En orden de alta; el desempate del asignador depende de este orden
    fn list_drivers(&self) -> Vec<Driver>;
    fn set_driver_status(&mut self, id: DriverId, status: DriverStatus, at: DateTime<Utc>) -> AppResult<()>;
    fn record_driver_rating(&mut self, id: DriverId, rating: u8, at: DateTime<Utc>) -> AppResult<()>;
    /// Acredita la comisión de un viaje y suma uno al contador de viajes
    fn credit_driver_earnings(&mut self, id: DriverId, amount: Decimal, at: DateTime<Utc>) -> AppResult<()>;

    /// Mejor conductor libre de la categoría, sin reservarlo
    fn find_available_driver(&self, category: VehicleCategory) -> Option<Driver> {
        select_driver(&self.list_drivers(), category).cloned()
    }
}

pub trait PromoRepository {
    fn find_promo_by_code(&self, code: &str) -> Option<Promo>;

    fn find_active_promo_by_code(&self, code: &str) -> Option<Promo> {
        self.find_promo_by_code(code).filter(|promo| promo.is_active)
    }
}

pub trait RouteRepository {
    fn find_route_by_id(&self, id: RouteId) -> Option<Route>;
}

pub trait CustomerRepository {
    fn find_customer_by_id(&self, id: CustomerId) -> Option<Customer>;
}

pub trait RentalRepository {
    /// Ids monótonos, nunca reutilizados
    fn next_rental_id(&mut self) -> RentalId;
    fn insert_rental(&mut self, rental: Rental);
    fn update_rental(&mut self, rental: Rental) -> AppResult<()>;
    fn find_rental_by_id(&self, id: RentalId) -> Option<Rental>;
    fn list_rentals(&self) -> Vec<Rental>;

    fn all_active_rentals_for_vehicle(&self, vehicle_id: VehicleId) -> Vec<Rental> {
        self.list_rentals()
            .into_iter()
            .filter(|r| r.vehicle_id == vehicle_id && r.is_active())
            .collect()
    }
}

pub trait InvoiceRepository {
    fn create_invoice(&mut self, invoice: NewInvoice) -> Invoice;
    fn update_invoice(&mut self, invoice: Invoice) -> AppResult<()>;
    fn find_invoice_by_id(&self, id: InvoiceId) -> Option<Invoice>;
    fn list_invoices(&self) -> Vec<Invoice>;

    fn find_invoice_by_rental_id(&self, rental_id: RentalId) -> Option<Invoice> {
        self.list_invoices().into_iter().find(|inv| inv.rental_id == rental_id)
    }
}

/// Todo lo que el orquestador necesita de los colaboradores de datos
pub trait FleetStore:
    VehicleRepository
    + DriverRepository
    + PromoRepository
    + RouteRepository
    + CustomerRepository
    + RentalRepository
    + InvoiceRepository
    + Send
    + Sync
{
}

impl<T> FleetStore for T where
    T: VehicleRepository
        + DriverRepository
        + PromoRepository
        + RouteRepository
        + CustomerRepository
        + RentalRepository
        + InvoiceRepository
        + Send
        + Sync
{
}
