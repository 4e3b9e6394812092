//! Configuración del proyecto
//!
//! Este módulo contiene las variables de entorno del servidor y la política
//! comercial de los alquileres.

pub mod environment;
pub mod policy;

pub use environment::*;
pub use policy::*;
