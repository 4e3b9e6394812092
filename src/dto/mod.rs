//! DTOs de la API
//! 
//! Peticiones validadas con `validator` y respuestas serializables.
//! La conversión a tipos del núcleo ocurre aquí para que los controladores
//! solo orquesten.

pub mod invoice_dto;
pub mod rental_dto;
pub mod response_dto;
pub mod vehicle_dto;

pub use response_dto::ApiResponse;
