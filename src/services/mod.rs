//! Services module
//! 
//! Este módulo contiene la lógica de negocio del núcleo de reservas.
//! Los componentes puros (precios, conflictos, duración, asignación,
//! ciclo de vida, facturación) no conocen el almacenamiento concreto;
//! `booking_service` los orquesta sobre un `FleetStore`.

pub mod booking_service;
pub mod conflict_detector;
pub mod duration_validator;
pub mod invoice_service;
pub mod pricing_engine;
pub mod receipt_service;
pub mod rental_lifecycle;
pub mod resource_allocator;

pub use booking_service::{
    AvailabilityReport, BookingNotice, BookingOutcome, BookingRequest, BookingService, VehicleReview,
};
pub use receipt_service::{Receipt, ReceiptSink, TracingReceiptSink};
pub use rental_lifecycle::{CompletionOutcome, CompletionRequest};
