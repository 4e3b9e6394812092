//! Sumideros de persistencia
//!
//! El núcleo avisa después de cada mutación confirmada y no espera ni
//! verifica la durabilidad: los fallos de escritura se registran y nada más.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, warn};

use crate::models::{Driver, Invoice, Rental, Vehicle};

#[async_trait]
pub trait PersistenceSink: Send + Sync {
    async fn persist_rentals(&self, rentals: &[Rental]);
    async fn persist_vehicles(&self, vehicles: &[Vehicle]);
    async fn persist_drivers(&self, drivers: &[Driver]);
    async fn persist_invoices(&self, invoices: &[Invoice]);
}

/// Solo deja constancia en el log; útil en desarrollo
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingPersistenceSink;

#[async_trait]
impl PersistenceSink for TracingPersistenceSink {
    async fn persist_rentals(&self, rentals: &[Rental]) {
        debug!("💾 {} alquileres listos para persistir", rentals.len());
    }

    async fn persist_vehicles(&self, vehicles: &[Vehicle]) {
        debug!("💾 {} vehículos listos para persistir", vehicles.len());
    }

    async fn persist_drivers(&self, drivers: &[Driver]) {
        debug!("💾 {} conductores listos para persistir", drivers.len());
    }

    async fn persist_invoices(&self, invoices: &[Invoice]) {
        debug!("💾 {} facturas listas para persistir", invoices.len());
    }
}

enum SnapshotCommand {
    Write { file_name: &'static str, payload: Vec<u8> },
    Flush(oneshot::Sender<()>),
}

/// Vuelca cada colección como JSON en un directorio (`rentals.json`, ...)
///
/// Un único escritor en segundo plano consume los snapshots en orden de
/// llegada, así que el fichero siempre acaba con el último estado. Cada
/// escritura va a un `.tmp` que después se renombra sobre el destino.
#[derive(Debug, Clone)]
pub struct JsonSnapshotSink {
    tx: mpsc::UnboundedSender<SnapshotCommand>,
}

impl JsonSnapshotSink {
    /// Arranca el escritor; necesita un runtime de tokio activo
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_writer(dir.into(), rx));
        Self { tx }
    }

    /// Espera a que todo lo encolado hasta ahora esté en disco
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(SnapshotCommand::Flush(done_tx)).is_err() {
            warn!("⚠️ Escritor de snapshots detenido");
            return;
        }
        let _ = done_rx.await;
    }

    fn write_snapshot<T: Serialize>(&self, file_name: &'static str, items: &[T]) {
        let payload = match serde_json::to_vec_pretty(items) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!("❌ No se pudo serializar {}: {}", file_name, e);
                return;
            }
        };
        if self.tx.send(SnapshotCommand::Write { file_name, payload }).is_err() {
            error!("❌ Escritor de snapshots detenido: {} descartado", file_name);
        }
    }
}

async fn run_writer(dir: PathBuf, mut rx: mpsc::UnboundedReceiver<SnapshotCommand>) {
    while let Some(command) = rx.recv().await {
        match command {
            SnapshotCommand::Write { file_name, payload } => {
                let path = dir.join(file_name);
                match write_atomically(&dir, &path, &payload).await {
                    Ok(()) => debug!("💾 Snapshot escrito en {}", path.display()),
                    Err(e) => error!("❌ Error escribiendo {}: {}", path.display(), e),
                }
            }
            SnapshotCommand::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    debug!("💾 Escritor de snapshots terminado");
}

async fn write_atomically(dir: &Path, path: &Path, payload: &[u8]) -> std::io::Result<()> {
    tokio::fs::create_dir_all(dir).await?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, payload).await?;
    tokio::fs::rename(&tmp, path).await
}

#[async_trait]
impl PersistenceSink for JsonSnapshotSink {
    async fn persist_rentals(&self, rentals: &[Rental]) {
        self.write_snapshot("rentals.json", rentals);
    }

    async fn persist_vehicles(&self, vehicles: &[Vehicle]) {
        self.write_snapshot("vehicles.json", vehicles);
    }

    async fn persist_drivers(&self, drivers: &[Driver]) {
        self.write_snapshot("drivers.json", drivers);
    }

    async fn persist_invoices(&self, invoices: &[Invoice]) {
        self.write_snapshot("invoices.json", invoices);
    }
}
