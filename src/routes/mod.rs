pub mod invoice_routes;
pub mod rental_routes;
pub mod vehicle_routes;
