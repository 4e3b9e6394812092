//! Almacén en memoria de la flota
//!
//! Colecciones propias detrás de los traits de repositorio. El servicio de
//! reservas lo envuelve en un `RwLock`, así que aquí no hay sincronización.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::config::RentalPolicy;
use crate::models::{
    Customer, CustomerId, Driver, DriverId, DriverStatus, Invoice, InvoiceId, InvoiceStatus,
    NewInvoice, Promo, Rental, RentalId, Route, RouteId, Vehicle, VehicleId,
};
use crate::repositories::{
    CustomerRepository, DriverRepository, InvoiceRepository, PromoRepository, RentalRepository,
    RouteRepository, VehicleRepository,
};
use crate::utils::errors::{not_found_error, AppResult};

#[derive(Debug, Clone)]
pub struct InMemoryFleetStore {
    vehicles: BTreeMap<VehicleId, Vehicle>,
    drivers: Vec<Driver>,
    promos: HashMap<String, Promo>,
    routes: BTreeMap<RouteId, Route>,
    customers: BTreeMap<CustomerId, Customer>,
    rentals: Vec<Rental>,
    invoices: Vec<Invoice>,
    next_rental_id: RentalId,
    next_invoice_id: InvoiceId,
}

impl Default for InMemoryFleetStore {
    fn default() -> Self {
        Self::new(&RentalPolicy::default())
    }
}

impl InMemoryFleetStore {
    pub fn new(policy: &RentalPolicy) -> Self {
        Self {
            vehicles: BTreeMap::new(),
            drivers: Vec::new(),
            promos: HashMap::new(),
            routes: BTreeMap::new(),
            customers: BTreeMap::new(),
            rentals: Vec::new(),
            invoices: Vec::new(),
            next_rental_id: policy.first_rental_id,
            next_invoice_id: policy.first_invoice_id,
        }
    }

    pub fn with_vehicle(mut self, vehicle: Vehicle) -> Self {
        self.add_vehicle(vehicle);
        self
    }

    pub fn with_driver(mut self, driver: Driver) -> Self {
        self.add_driver(driver);
        self
    }

    pub fn with_promo(mut self, promo: Promo) -> Self {
        self.add_promo(promo);
        self
    }

    pub fn with_route(mut self, route: Route) -> Self {
        self.add_route(route);
        self
    }

    pub fn with_customer(mut self, customer: Customer) -> Self {
        self.add_customer(customer);
        self
    }

    pub fn add_vehicle(&mut self, vehicle: Vehicle) {
        self.vehicles.insert(vehicle.id, vehicle);
    }

    pub fn add_driver(&mut self, driver: Driver) {
        match self.drivers.iter_mut().find(|d| d.id == driver.id) {
            Some(existing) => *existing = driver,
            None => self.drivers.push(driver),
        }
    }

    pub fn add_promo(&mut self, promo: Promo) {
        self.promos.insert(promo.code.clone(), promo);
    }

    pub fn add_route(&mut self, route: Route) {
        self.routes.insert(route.id, route);
    }

    pub fn add_customer(&mut self, customer: Customer) {
        self.customers.insert(customer.id, customer);
    }

    /// Carga alquileres históricos y ajusta el contador para no reutilizar ids
    pub fn add_rental(&mut self, rental: Rental) {
        if rental.id >= self.next_rental_id {
            self.next_rental_id = rental.id + 1;
        }
        self.rentals.push(rental);
    }

    fn vehicle_mut(&mut self, id: VehicleId) -> AppResult<&mut Vehicle> {
        self.vehicles.get_mut(&id).ok_or_else(|| not_found_error("Vehicle", id))
    }

    fn driver_mut(&mut self, id: DriverId) -> AppResult<&mut Driver> {
        self.drivers
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| not_found_error("Driver", id))
    }
}

impl VehicleRepository for InMemoryFleetStore {
    fn find_vehicle_by_id(&self, id: VehicleId) -> Option<Vehicle> {
        self.vehicles.get(&id).cloned()
    }

    fn list_vehicles(&self) -> Vec<Vehicle> {
        self.vehicles.values().cloned().collect()
    }

    fn mark_vehicle_availability(&mut self, id: VehicleId, available: bool) -> AppResult<()> {
        self.vehicle_mut(id)?.available = available;
        Ok(())
    }

    fn record_vehicle_rating(&mut self, id: VehicleId, rating: u8) -> AppResult<()> {
        self.vehicle_mut(id)?.add_rating(rating);
        Ok(())
    }
}

impl DriverRepository for InMemoryFleetStore {
    fn find_driver_by_id(&self, id: DriverId) -> Option<Driver> {
        self.drivers.iter().find(|d| d.id == id).cloned()
    }

    fn list_drivers(&self) -> Vec<Driver> {
        self.drivers.clone()
    }

    fn set_driver_status(&mut self, id: DriverId, status: DriverStatus, at: DateTime<Utc>) -> AppResult<()> {
        self.driver_mut(id)?.set_status(status, at);
        Ok(())
    }

    fn record_driver_rating(&mut self, id: DriverId, rating: u8, at: DateTime<Utc>) -> AppResult<()> {
        self.driver_mut(id)?.add_rating(rating, at);
        Ok(())
    }

    fn credit_driver_earnings(&mut self, id: DriverId, amount: Decimal, at: DateTime<Utc>) -> AppResult<()> {
        let driver = self.driver_mut(id)?;
        driver.total_trips += 1;
        driver.total_earnings += amount;
        driver.last_active = Some(at);
        Ok(())
    }
}

impl PromoRepository for InMemoryFleetStore {
    fn find_promo_by_code(&self, code: &str) -> Option<Promo> {
        self.promos.get(code).cloned()
    }
}

impl RouteRepository for InMemoryFleetStore {
    fn find_route_by_id(&self, id: RouteId) -> Option<Route> {
        self.routes.get(&id).cloned()
    }
}

impl CustomerRepository for InMemoryFleetStore {
    fn find_customer_by_id(&self, id: CustomerId) -> Option<Customer> {
        self.customers.get(&id).cloned()
    }
}

impl RentalRepository for InMemoryFleetStore {
    fn next_rental_id(&mut self) -> RentalId {
        let id = self.next_rental_id;
        self.next_rental_id += 1;
        id
    }

    fn insert_rental(&mut self, rental: Rental) {
        self.rentals.push(rental);
    }

    fn update_rental(&mut self, rental: Rental) -> AppResult<()> {
        let slot = self
            .rentals
            .iter_mut()
            .find(|r| r.id == rental.id)
            .ok_or_else(|| not_found_error("Rental", rental.id))?;
        *slot = rental;
        Ok(())
    }

    fn find_rental_by_id(&self, id: RentalId) -> Option<Rental> {
        self.rentals.iter().find(|r| r.id == id).cloned()
    }

    fn list_rentals(&self) -> Vec<Rental> {
        self.rentals.clone()
    }

    fn all_active_rentals_for_vehicle(&self, vehicle_id: VehicleId) -> Vec<Rental> {
        self.rentals
            .iter()
            .filter(|r| r.vehicle_id == vehicle_id && r.is_active())
            .cloned()
            .collect()
    }
}

impl InvoiceRepository for InMemoryFleetStore {
    fn create_invoice(&mut self, new: NewInvoice) -> Invoice {
        let id = self.next_invoice_id;
        self.next_invoice_id += 1;

        let invoice = Invoice {
            id,
            rental_id: new.rental_id,
            customer_id: new.customer_id,
            driver_id: new.driver_id,
            subtotal: new.subtotal,
            discount_amount: new.discount_amount,
            tax_amount: new.tax_amount,
            total_amount: new.subtotal - new.discount_amount + new.tax_amount,
            status: InvoiceStatus::Pending,
            payment_method: None,
            payment_reference: None,
            promo_code: new.promo_code,
            created_at: new.created_at,
            paid_at: None,
        };
        self.invoices.push(invoice.clone());
        invoice
    }

    fn update_invoice(&mut self, invoice: Invoice) -> AppResult<()> {
        let slot = self
            .invoices
            .iter_mut()
            .find(|inv| inv.id == invoice.id)
            .ok_or_else(|| not_found_error("Invoice", invoice.id))?;
        *slot = invoice;
        Ok(())
    }

    fn find_invoice_by_id(&self, id: InvoiceId) -> Option<Invoice> {
        self.invoices.iter().find(|inv| inv.id == id).cloned()
    }

    fn list_invoices(&self) -> Vec<Invoice> {
        self.invoices.clone()
    }
}
