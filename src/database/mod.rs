//! Módulo de datos iniciales
//! 
//! Carga la flota (vehículos, conductores, promociones, rutas y clientes)
//! desde un fichero JSON y construye el almacén en memoria.

pub mod seed;

pub use seed::{load_seed, FleetSeed};
