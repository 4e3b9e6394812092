//! Servicio de reservas
//!
//! Orquesta la creación de alquileres y expone el resto de operaciones del
//! núcleo (ciclo de vida, consultas, facturas) detrás de un único punto de
//! entrada compartido por los controladores.
//!
//! La reserva se hace en dos fases:
//!
//! 1. **Preparación** con el almacén en lectura: vehículo, ruta, precio,
//!    promoción, ventana y conflictos. Cualquier rechazo aquí no muta nada.
//! 2. **Confirmación** con el almacén en escritura: se repiten las
//!    comprobaciones de disponibilidad y conflictos, se elige conductor y se
//!    escriben alquiler, vehículo, conductor y factura de una vez.
//!
//! Como el conductor se elige dentro de la confirmación, una reserva
//! rechazada nunca deja un conductor `Busy`.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::config::RentalPolicy;
use crate::models::{
    CustomerId, Driver, DriverStatus, Invoice, InvoiceId, PaymentMethod, Rental, RentalId, RentalPlan,
    RentalStatus, Route, Vehicle, VehicleCategory, VehicleId,
};
use crate::repositories::{FleetStore, PersistenceSink};
use crate::services::conflict_detector::{find_conflicts, RentalConflict};
use crate::services::duration_validator::validate_window;
use crate::services::invoice_service::{self, build_invoice};
use crate::services::pricing_engine::{apply_promo, price, PromoOutcome};
use crate::services::receipt_service::{Receipt, ReceiptSink};
use crate::services::rental_lifecycle::{self, CompletionOutcome, CompletionRequest};
use crate::services::resource_allocator::ensure_vehicle_bookable;
use crate::utils::clock::{next_whole_minute, Clock};
use crate::utils::errors::{not_found_error, validation_error, AppError, AppResult};

/// Petición de reserva ya interpretada
#[derive(Debug, Clone, PartialEq)]
pub struct BookingRequest {
    pub customer_id: CustomerId,
    pub vehicle_id: VehicleId,
    pub plan: RentalPlan,
    /// Sin inicio explícito la ventana empieza en el siguiente minuto entero
    pub start_time: Option<DateTime<Utc>>,
    pub promo_code: Option<String>,
    pub with_driver: bool,
}

/// Incidencia no fatal: la reserva sigue adelante
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "code", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingNotice {
    NoDriverAvailable { category: VehicleCategory },
    PromoRejected { promo_code: String },
}

impl BookingNotice {
    pub fn code(&self) -> &'static str {
        match self {
            BookingNotice::NoDriverAvailable { .. } => "NO_DRIVER_AVAILABLE",
            BookingNotice::PromoRejected { .. } => "PROMO_REJECTED",
        }
    }
}

impl fmt::Display for BookingNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingNotice::NoDriverAvailable { category } => {
                write!(f, "No {} driver available, booking continues without a driver", category)
            }
            BookingNotice::PromoRejected { promo_code } => {
                write!(f, "Promo code '{}' is invalid or inactive, no discount applied", promo_code)
            }
        }
    }
}

/// Resultado de una reserva confirmada
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingOutcome {
    pub rental: Rental,
    pub invoice: Invoice,
    pub driver: Option<Driver>,
    pub notices: Vec<BookingNotice>,
}

/// Disponibilidad de un vehículo para una ventana concreta
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvailabilityReport {
    pub vehicle_id: VehicleId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub available: bool,
    pub conflicts: Vec<RentalConflict>,
}

/// Valoración que dejó un cliente al completar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleReview {
    pub rental_id: RentalId,
    pub customer_id: CustomerId,
    pub vehicle_rating: Option<u8>,
    pub driver_rating: Option<u8>,
    pub comment: Option<String>,
    pub completed_at: DateTime<Utc>,
}

/// Todo lo validado en la fase de lectura
#[derive(Debug, Clone)]
struct PreparedBooking {
    customer_id: CustomerId,
    vehicle_id: VehicleId,
    plan: RentalPlan,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    base_cost: Decimal,
    promo: PromoOutcome,
    with_driver: bool,
    notices: Vec<BookingNotice>,
}

/// Copia de las colecciones tocadas, para persistir sin retener el cerrojo
#[derive(Debug, Default)]
struct Snapshot {
    rentals: Vec<Rental>,
    vehicles: Vec<Vehicle>,
    drivers: Option<Vec<Driver>>,
    invoices: Option<Vec<Invoice>>,
}

impl Snapshot {
    fn capture<S: FleetStore + ?Sized>(store: &S, drivers: bool, invoices: bool) -> Self {
        Self {
            rentals: store.list_rentals(),
            vehicles: store.list_vehicles(),
            drivers: drivers.then(|| store.list_drivers()),
            invoices: invoices.then(|| store.list_invoices()),
        }
    }

    fn invoices_only<S: FleetStore + ?Sized>(store: &S) -> Self {
        Self {
            invoices: Some(store.list_invoices()),
            ..Self::default()
        }
    }
}

fn resolve_route<S: FleetStore + ?Sized>(store: &S, plan: &RentalPlan) -> Option<Route> {
    plan.route_id()
        .and_then(|id| store.find_route_by_id(id))
        .filter(|route| route.active)
}

fn check_conflicts<S: FleetStore + ?Sized>(
    store: &S,
    vehicle_id: VehicleId,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> AppResult<()> {
    let conflicts = find_conflicts(&store.all_active_rentals_for_vehicle(vehicle_id), vehicle_id, start, end);
    if conflicts.is_empty() {
        return Ok(());
    }
    for (i, conflict) in conflicts.iter().enumerate() {
        warn!("⛔ {}", conflict.describe(i + 1));
    }
    Err(AppError::Conflict { vehicle_id, conflicts })
}

fn prepare_booking<S: FleetStore + ?Sized>(
    store: &S,
    request: &BookingRequest,
    now: DateTime<Utc>,
) -> AppResult<PreparedBooking> {
    let vehicle = ensure_vehicle_bookable(store.find_vehicle_by_id(request.vehicle_id), request.vehicle_id)?;

    let route = resolve_route(store, &request.plan);
    let quote = price(&request.plan, &vehicle, route.as_ref())?;

    let start_time = request.start_time.unwrap_or_else(|| next_whole_minute(now));
    let end_time = start_time + quote.estimated_duration;

    let mut notices = Vec::new();
    let promo_code = request
        .promo_code
        .as_deref()
        .map(str::trim)
        .filter(|code| !code.is_empty());
    let promo = match promo_code {
        Some(code) => {
            let outcome = apply_promo(quote.base_cost, store.find_active_promo_by_code(code).as_ref());
            // desconocida, inactiva o con un porcentaje fuera de 0..=100
            if outcome.applied_code.is_none() {
                notices.push(BookingNotice::PromoRejected {
                    promo_code: code.to_string(),
                });
            }
            outcome
        }
        None => apply_promo(quote.base_cost, None),
    };

    validate_window(request.plan.rental_type(), start_time, end_time, now)?;
    check_conflicts(store, vehicle.id, start_time, end_time)?;

    Ok(PreparedBooking {
        customer_id: request.customer_id,
        vehicle_id: vehicle.id,
        plan: request.plan,
        start_time,
        end_time,
        base_cost: quote.base_cost,
        promo,
        with_driver: request.with_driver,
        notices,
    })
}

fn commit_booking<S: FleetStore + ?Sized>(
    store: &mut S,
    prepared: PreparedBooking,
    policy: &RentalPolicy,
    now: DateTime<Utc>,
) -> AppResult<(BookingOutcome, Receipt)> {
    // Otra reserva pudo confirmarse entre la lectura y la escritura
    let vehicle = ensure_vehicle_bookable(store.find_vehicle_by_id(prepared.vehicle_id), prepared.vehicle_id)?;
    check_conflicts(store, vehicle.id, prepared.start_time, prepared.end_time)?;

    let mut notices = prepared.notices;
    let driver = if prepared.with_driver {
        let selected = store.find_available_driver(vehicle.category);
        if selected.is_none() {
            notices.push(BookingNotice::NoDriverAvailable {
                category: vehicle.category,
            });
        }
        selected
    } else {
        None
    };

    if let Some(driver) = &driver {
        store.set_driver_status(driver.id, DriverStatus::Busy, now)?;
    }
    store.mark_vehicle_availability(vehicle.id, false)?;

    let rental = Rental {
        id: store.next_rental_id(),
        customer_id: prepared.customer_id,
        vehicle_id: vehicle.id,
        driver_id: driver.as_ref().map(|d| d.id),
        route_id: prepared.plan.route_id(),
        rental_type: prepared.plan.rental_type(),
        status: RentalStatus::Active,
        start_time: prepared.start_time,
        end_time: prepared.end_time,
        total_cost: prepared.promo.final_cost,
        vehicle_rating: None,
        driver_rating: None,
        comment: None,
    };
    store.insert_rental(rental.clone());

    let invoice = store.create_invoice(build_invoice(
        &rental,
        prepared.base_cost,
        prepared.promo.discount_amount,
        prepared.promo.applied_code.clone(),
        policy,
        now,
    ));

    let driver = driver.and_then(|d| store.find_driver_by_id(d.id));
    let receipt = Receipt {
        invoice: invoice.clone(),
        customer_name: store
            .find_customer_by_id(rental.customer_id)
            .map(|c| c.name)
            .unwrap_or_else(|| format!("Customer #{}", rental.customer_id)),
        vehicle_info: vehicle.display_name(),
        driver_name: driver.as_ref().map(|d| d.name.clone()),
    };

    Ok((
        BookingOutcome {
            rental,
            invoice,
            driver,
            notices,
        },
        receipt,
    ))
}

/// Punto de entrada del núcleo de reservas
pub struct BookingService<S> {
    store: Arc<RwLock<S>>,
    persistence: Arc<dyn PersistenceSink>,
    receipts: Arc<dyn ReceiptSink>,
    clock: Arc<dyn Clock>,
    policy: RentalPolicy,
}

impl<S: FleetStore> BookingService<S> {
    pub fn new(
        store: S,
        persistence: Arc<dyn PersistenceSink>,
        receipts: Arc<dyn ReceiptSink>,
        clock: Arc<dyn Clock>,
        policy: RentalPolicy,
    ) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            persistence,
            receipts,
            clock,
            policy,
        }
    }

    pub fn policy(&self) -> &RentalPolicy {
        &self.policy
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Acceso directo al almacén; pensado para carga inicial y pruebas
    pub fn store(&self) -> Arc<RwLock<S>> {
        Arc::clone(&self.store)
    }

    async fn persist(&self, snapshot: Snapshot) {
        if !snapshot.rentals.is_empty() {
            self.persistence.persist_rentals(&snapshot.rentals).await;
        }
        if !snapshot.vehicles.is_empty() {
            self.persistence.persist_vehicles(&snapshot.vehicles).await;
        }
        if let Some(drivers) = snapshot.drivers {
            self.persistence.persist_drivers(&drivers).await;
        }
        if let Some(invoices) = snapshot.invoices {
            self.persistence.persist_invoices(&invoices).await;
        }
    }

    /// Crea una reserva: valida, confirma, factura y emite el recibo
    pub async fn create_rental(&self, request: BookingRequest) -> AppResult<BookingOutcome> {
        let now = self.clock.now();
        info!(
            "🚗 Reserva solicitada: cliente #{} vehículo #{} ({})",
            request.customer_id,
            request.vehicle_id,
            request.plan.rental_type()
        );

        let prepared = {
            let store = self.store.read().await;
            prepare_booking(&*store, &request, now).map_err(|e| {
                warn!("⚠️ Reserva rechazada para el vehículo #{}: {}", request.vehicle_id, e);
                e
            })?
        };

        let (outcome, receipt, snapshot) = {
            let mut store = self.store.write().await;
            let (outcome, receipt) = commit_booking(&mut *store, prepared, &self.policy, now).map_err(|e| {
                warn!("⚠️ Reserva rechazada al confirmar (vehículo #{}): {}", request.vehicle_id, e);
                e
            })?;
            let snapshot = Snapshot::capture(&*store, outcome.driver.is_some(), true);
            (outcome, receipt, snapshot)
        };

        for notice in &outcome.notices {
            warn!("⚠️ [{}] {}", notice.code(), notice);
        }
        info!(
            "✅ Alquiler #{} confirmado: {} → {} por ${:.2} (factura #{})",
            outcome.rental.id,
            outcome.rental.start_time,
            outcome.rental.end_time,
            outcome.rental.total_cost,
            outcome.invoice.id
        );

        self.persist(snapshot).await;
        self.receipts.deliver(&receipt).await;
        Ok(outcome)
    }

    pub async fn complete_rental(&self, rental_id: RentalId, request: CompletionRequest) -> AppResult<CompletionOutcome> {
        let now = self.clock.now();
        let (outcome, snapshot) = {
            let mut store = self.store.write().await;
            let outcome = rental_lifecycle::complete_rental(&mut *store, rental_id, &request, &self.policy, now)
                .map_err(|e| {
                    warn!("⚠️ No se pudo completar el alquiler #{}: {}", rental_id, e);
                    e
                })?;
            let snapshot = Snapshot::capture(&*store, outcome.rental.driver_id.is_some(), false);
            (outcome, snapshot)
        };

        match outcome.driver_earnings {
            Some(earnings) => info!("🏁 Alquiler #{} completado, conductor +${:.2}", rental_id, earnings),
            None => info!("🏁 Alquiler #{} completado", rental_id),
        }
        self.persist(snapshot).await;
        Ok(outcome)
    }

    pub async fn cancel_rental(&self, rental_id: RentalId) -> AppResult<Rental> {
        let now = self.clock.now();
        let (rental, snapshot) = {
            let mut store = self.store.write().await;
            let rental = rental_lifecycle::cancel_rental(&mut *store, rental_id, now).map_err(|e| {
                warn!("⚠️ No se pudo cancelar el alquiler #{}: {}", rental_id, e);
                e
            })?;
            let snapshot = Snapshot::capture(&*store, rental.driver_id.is_some(), false);
            (rental, snapshot)
        };

        info!("🚫 Alquiler #{} cancelado", rental_id);
        self.persist(snapshot).await;
        Ok(rental)
    }

    pub async fn find_rental(&self, rental_id: RentalId) -> AppResult<Rental> {
        self.store
            .read()
            .await
            .find_rental_by_id(rental_id)
            .ok_or_else(|| not_found_error("Rental", rental_id))
    }

    pub async fn list_rentals(&self) -> Vec<Rental> {
        self.store.read().await.list_rentals()
    }

    pub async fn rentals_for_customer(&self, customer_id: CustomerId) -> Vec<Rental> {
        self.store
            .read()
            .await
            .list_rentals()
            .into_iter()
            .filter(|r| r.customer_id == customer_id)
            .collect()
    }

    pub async fn find_conflicts(
        &self,
        vehicle_id: VehicleId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<RentalConflict>> {
        let store = self.store.read().await;
        store
            .find_vehicle_by_id(vehicle_id)
            .ok_or_else(|| not_found_error("Vehicle", vehicle_id))?;
        Ok(find_conflicts(
            &store.all_active_rentals_for_vehicle(vehicle_id),
            vehicle_id,
            start,
            end,
        ))
    }

    pub async fn is_available_for_window(
        &self,
        vehicle_id: VehicleId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<bool> {
        Ok(self.find_conflicts(vehicle_id, start, end).await?.is_empty())
    }

    pub async fn check_availability(
        &self,
        vehicle_id: VehicleId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<AvailabilityReport> {
        if end <= start {
            return Err(validation_error("end must be after start"));
        }
        let conflicts = self.find_conflicts(vehicle_id, start, end).await?;
        Ok(AvailabilityReport {
            vehicle_id,
            start_time: start,
            end_time: end,
            available: conflicts.is_empty(),
            conflicts,
        })
    }

    /// Alquileres activos del vehículo ordenados por inicio
    pub async fn vehicle_schedule(&self, vehicle_id: VehicleId) -> AppResult<Vec<Rental>> {
        let store = self.store.read().await;
        store
            .find_vehicle_by_id(vehicle_id)
            .ok_or_else(|| not_found_error("Vehicle", vehicle_id))?;
        let mut schedule = store.all_active_rentals_for_vehicle(vehicle_id);
        schedule.sort_by_key(|r| r.start_time);
        Ok(schedule)
    }

    /// Alquileres completados del vehículo que dejaron valoración o comentario
    pub async fn vehicle_reviews(&self, vehicle_id: VehicleId) -> AppResult<Vec<VehicleReview>> {
        let store = self.store.read().await;
        store
            .find_vehicle_by_id(vehicle_id)
            .ok_or_else(|| not_found_error("Vehicle", vehicle_id))?;
        Ok(store
            .list_rentals()
            .into_iter()
            .filter(|r| r.vehicle_id == vehicle_id && r.status == RentalStatus::Completed)
            .filter(|r| r.has_feedback() || r.comment.is_some())
            .map(|r| VehicleReview {
                rental_id: r.id,
                customer_id: r.customer_id,
                vehicle_rating: r.vehicle_rating,
                driver_rating: r.driver_rating,
                comment: r.comment,
                completed_at: r.end_time,
            })
            .collect())
    }

    pub async fn find_invoice(&self, invoice_id: InvoiceId) -> AppResult<Invoice> {
        self.store
            .read()
            .await
            .find_invoice_by_id(invoice_id)
            .ok_or_else(|| not_found_error("Invoice", invoice_id))
    }

    pub async fn invoice_for_rental(&self, rental_id: RentalId) -> AppResult<Invoice> {
        self.store
            .read()
            .await
            .find_invoice_by_rental_id(rental_id)
            .ok_or_else(|| AppError::NotFound(format!("Invoice for rental #{} not found", rental_id)))
    }

    pub async fn process_payment(
        &self,
        invoice_id: InvoiceId,
        method: PaymentMethod,
        reference: Option<String>,
    ) -> AppResult<Invoice> {
        let now = self.clock.now();
        let (invoice, snapshot) = {
            let mut store = self.store.write().await;
            let invoice = invoice_service::process_payment(&mut *store, invoice_id, method, reference, now)?;
            (invoice, Snapshot::invoices_only(&*store))
        };
        self.persist(snapshot).await;
        Ok(invoice)
    }

    pub async fn refund_invoice(&self, invoice_id: InvoiceId, reason: Option<String>) -> AppResult<Invoice> {
        let (invoice, snapshot) = {
            let mut store = self.store.write().await;
            let invoice = invoice_service::refund_invoice(&mut *store, invoice_id, reason.as_deref())?;
            (invoice, Snapshot::invoices_only(&*store))
        };
        self.persist(snapshot).await;
        Ok(invoice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Promo, RentalFeedback};
    use crate::repositories::{
        DriverRepository, InMemoryFleetStore, InvoiceRepository, RentalRepository, TracingPersistenceSink,
        VehicleRepository,
    };
    use crate::utils::clock::FixedClock;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingReceiptSink {
        delivered: Mutex<Vec<Receipt>>,
    }

    #[async_trait]
    impl ReceiptSink for RecordingReceiptSink {
        async fn deliver(&self, receipt: &Receipt) {
            self.delivered.lock().unwrap().push(receipt.clone());
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 4, 9, 0, 30).unwrap()
    }

    fn vehicle(id: VehicleId, category: VehicleCategory) -> Vehicle {
        Vehicle {
            id,
            make: "Toyota".to_string(),
            model: "Corolla".to_string(),
            category,
            rate_per_hour: Decimal::from(10),
            rate_per_day: Decimal::from(50),
            available: true,
            active: true,
            average_rating: 0.0,
            rating_count: 0,
        }
    }

    fn driver(id: u32, rating: f64) -> Driver {
        Driver {
            id,
            name: format!("Driver {}", id),
            phone: String::new(),
            category: VehicleCategory::Car,
            status: DriverStatus::Available,
            rating,
            rating_count: 2,
            total_trips: 0,
            total_earnings: Decimal::ZERO,
            last_active: None,
        }
    }

    fn store() -> InMemoryFleetStore {
        InMemoryFleetStore::default()
            .with_vehicle(vehicle(1, VehicleCategory::Car))
            .with_vehicle(vehicle(2, VehicleCategory::Truck))
            .with_driver(driver(1, 4.5))
            .with_promo(Promo {
                code: "SAVE10".to_string(),
                discount_percent: Decimal::from(10),
                is_active: true,
            })
    }

    fn service(store: InMemoryFleetStore) -> (BookingService<InMemoryFleetStore>, Arc<RecordingReceiptSink>) {
        let receipts = Arc::new(RecordingReceiptSink::default());
        let service = BookingService::new(
            store,
            Arc::new(TracingPersistenceSink),
            receipts.clone(),
            Arc::new(FixedClock::new(now())),
            RentalPolicy::default(),
        );
        (service, receipts)
    }

    fn hourly(vehicle_id: VehicleId, hours: u32) -> BookingRequest {
        BookingRequest {
            customer_id: 7,
            vehicle_id,
            plan: RentalPlan::Hourly { hours },
            start_time: None,
            promo_code: None,
            with_driver: true,
        }
    }

    #[tokio::test]
    async fn test_booking_commits_rental_driver_and_invoice() {
        let (service, receipts) = service(store());

        let outcome = service.create_rental(hourly(1, 2)).await.unwrap();

        assert_eq!(outcome.rental.id, 5001);
        assert_eq!(outcome.rental.start_time, Utc.with_ymd_and_hms(2026, 5, 4, 9, 1, 0).unwrap());
        assert_eq!(outcome.rental.end_time - outcome.rental.start_time, Duration::hours(2));
        assert_eq!(outcome.rental.total_cost, Decimal::from(20));
        assert_eq!(outcome.rental.driver_id, Some(1));
        assert_eq!(outcome.driver.as_ref().map(|d| d.status), Some(DriverStatus::Busy));
        assert_eq!(outcome.invoice.id, 6001);
        assert_eq!(outcome.invoice.tax_amount, Decimal::from(3));
        assert!(outcome.notices.is_empty());

        let store = service.store();
        let store = store.read().await;
        assert!(!store.find_vehicle_by_id(1).unwrap().available);
        assert_eq!(store.find_driver_by_id(1).unwrap().last_active, Some(now()));
        assert_eq!(receipts.delivered.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_soft_failures_become_notices() {
        let (service, _) = service(store());
        let mut request = hourly(2, 1);
        request.promo_code = Some("BOGUS".to_string());

        let outcome = service.create_rental(request).await.unwrap();

        let codes: Vec<_> = outcome.notices.iter().map(BookingNotice::code).collect();
        assert_eq!(codes, vec!["PROMO_REJECTED", "NO_DRIVER_AVAILABLE"]);
        assert!(outcome.rental.driver_id.is_none());
        assert_eq!(outcome.rental.total_cost, Decimal::from(10));
        assert_eq!(outcome.invoice.discount_amount, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_out_of_range_promo_is_reported_not_applied() {
        let store = store().with_promo(Promo {
            code: "MEGA".to_string(),
            discount_percent: Decimal::from(150),
            is_active: true,
        });
        let (service, _) = service(store);
        let request = BookingRequest {
            plan: RentalPlan::Daily { days: 3 },
            promo_code: Some("MEGA".to_string()),
            with_driver: false,
            ..hourly(1, 1)
        };

        let outcome = service.create_rental(request).await.unwrap();

        assert_eq!(outcome.rental.total_cost, Decimal::from(150));
        assert_eq!(outcome.invoice.discount_amount, Decimal::ZERO);
        assert_eq!(
            outcome.notices,
            vec![BookingNotice::PromoRejected {
                promo_code: "MEGA".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_rejected_booking_reserves_no_driver() {
        let (service, receipts) = service(store());
        let start = Utc.with_ymd_and_hms(2026, 5, 5, 10, 0, 0).unwrap();

        let mut first = hourly(1, 2);
        first.start_time = Some(start);
        first.with_driver = false;
        service.create_rental(first).await.unwrap();

        let mut second = hourly(1, 1);
        second.start_time = Some(start + Duration::minutes(30));
        let err = service.create_rental(second).await.unwrap_err();

        assert!(err.to_string().contains("not available"));
        let store = service.store();
        let store = store.read().await;
        assert_eq!(store.find_driver_by_id(1).unwrap().status, DriverStatus::Available);
        assert_eq!(store.list_rentals().len(), 1);
        assert_eq!(receipts.delivered.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_commit_rechecks_conflicts_written_after_prepare() {
        let mut store = store();
        let start = Utc.with_ymd_and_hms(2026, 5, 5, 10, 0, 0).unwrap();
        let mut request = hourly(1, 2);
        request.start_time = Some(start);

        let prepared = prepare_booking(&store, &request, now()).unwrap();

        // una reserva concurrente llega antes de la confirmación
        store.add_rental(Rental {
            id: 5001,
            customer_id: 8,
            vehicle_id: 1,
            driver_id: None,
            route_id: None,
            rental_type: crate::models::RentalType::Hourly,
            status: RentalStatus::Active,
            start_time: start + Duration::hours(1),
            end_time: start + Duration::hours(3),
            total_cost: Decimal::from(20),
            vehicle_rating: None,
            driver_rating: None,
            comment: None,
        });

        let err = commit_booking(&mut store, prepared, &RentalPolicy::default(), now()).unwrap_err();
        match err {
            AppError::Conflict { vehicle_id, conflicts } => {
                assert_eq!(vehicle_id, 1);
                assert_eq!(conflicts.len(), 1);
                assert_eq!(conflicts[0].rental_id, 5001);
            }
            other => panic!("expected conflict, got {:?}", other),
        }
        assert_eq!(store.find_driver_by_id(1).unwrap().status, DriverStatus::Available);
        assert!(store.list_invoices().is_empty());
    }

    #[tokio::test]
    async fn test_complete_then_reviews_and_schedule() {
        let (service, _) = service(store());
        let outcome = service.create_rental(hourly(1, 2)).await.unwrap();
        assert_eq!(service.vehicle_schedule(1).await.unwrap().len(), 1);

        let completion = service
            .complete_rental(
                outcome.rental.id,
                CompletionRequest {
                    actual_end: None,
                    feedback: Some(RentalFeedback {
                        vehicle_rating: 5,
                        driver_rating: 4,
                        comment: Some("Clean car".to_string()),
                    }),
                },
            )
            .await
            .unwrap();
        assert_eq!(completion.driver_earnings, Some(Decimal::from(6)));

        assert!(service.vehicle_schedule(1).await.unwrap().is_empty());
        let reviews = service.vehicle_reviews(1).await.unwrap();
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].comment.as_deref(), Some("Clean car"));
        assert_eq!(service.rentals_for_customer(7).await.len(), 1);
        assert!(service.rentals_for_customer(8).await.is_empty());
    }

    #[tokio::test]
    async fn test_availability_report_lists_conflicts() {
        let (service, _) = service(store());
        let start = Utc.with_ymd_and_hms(2026, 5, 5, 10, 0, 0).unwrap();
        let mut request = hourly(1, 2);
        request.start_time = Some(start);
        service.create_rental(request).await.unwrap();

        let busy = service
            .check_availability(1, start + Duration::minutes(119), start + Duration::hours(3))
            .await
            .unwrap();
        assert!(!busy.available);
        assert_eq!(busy.conflicts.len(), 1);

        assert!(service
            .is_available_for_window(1, start + Duration::hours(2), start + Duration::hours(3))
            .await
            .unwrap());
        assert_eq!(
            service.check_availability(99, start, start + Duration::hours(1)).await.unwrap_err().code(),
            "NOT_FOUND"
        );
    }

    #[tokio::test]
    async fn test_invoice_payment_through_service() {
        let (service, _) = service(store());
        let outcome = service.create_rental(hourly(1, 2)).await.unwrap();

        let invoice = service.invoice_for_rental(outcome.rental.id).await.unwrap();
        assert_eq!(invoice.id, outcome.invoice.id);

        let paid = service
            .process_payment(invoice.id, PaymentMethod::MobileBanking, None)
            .await
            .unwrap();
        assert_eq!(paid.paid_at, Some(now()));

        let refunded = service.refund_invoice(invoice.id, Some("trip cancelled".to_string())).await.unwrap();
        assert_eq!(refunded.status, crate::models::InvoiceStatus::Refunded);
        assert_eq!(service.find_invoice(invoice.id).await.unwrap().status, refunded.status);
    }
}
