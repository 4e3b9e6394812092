pub mod invoice_controller;
pub mod rental_controller;
pub mod vehicle_controller;
