//! Modelos del sistema
//! 
//! Este módulo contiene todos los modelos de datos de la flota: vehículos,
//! conductores, rutas, códigos promocionales, clientes, alquileres y facturas.

pub mod customer;
pub mod driver;
pub mod invoice;
pub mod promo;
pub mod rental;
pub mod route;
pub mod vehicle;

pub use customer::*;
pub use driver::*;
pub use invoice::*;
pub use promo::*;
pub use rental::*;
pub use route::*;
pub use vehicle::*;

pub type VehicleId = u32;
pub type DriverId = u32;
pub type CustomerId = u32;
pub type RouteId = u32;
pub type RentalId = u32;
pub type InvoiceId = u32;
