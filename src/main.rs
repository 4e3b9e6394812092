use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use fleet_rental::config::{EnvironmentConfig, RentalPolicy};
use fleet_rental::create_app;
use fleet_rental::database::load_seed;
use fleet_rental::repositories::{InMemoryFleetStore, JsonSnapshotSink, PersistenceSink, TracingPersistenceSink};
use fleet_rental::services::{BookingService, TracingReceiptSink};
use fleet_rental::state::AppState;
use fleet_rental::utils::SystemClock;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("🚗 Fleet Rental - Núcleo de reservas");
    info!("====================================");

    let config = EnvironmentConfig::from_env()?;
    let policy = RentalPolicy::from_env()?;
    info!(
        "⚙️ Entorno: {} | impuesto {} | comisión conductor {}",
        config.environment, policy.tax_rate, policy.driver_commission_rate
    );

    // Cargar flota inicial
    let store = match &config.seed_path {
        Some(path) => load_seed(path).await?.into_store(&policy),
        None => {
            warn!("⚠️ FLEET_SEED_PATH no definido, la flota arranca vacía");
            InMemoryFleetStore::new(&policy)
        }
    };

    let persistence: Arc<dyn PersistenceSink> = match &config.snapshot_dir {
        Some(dir) => {
            info!("💾 Snapshots JSON en {}", dir.display());
            Arc::new(JsonSnapshotSink::new(dir))
        }
        None => Arc::new(TracingPersistenceSink),
    };

    let booking = BookingService::new(
        store,
        persistence,
        Arc::new(TracingReceiptSink),
        Arc::new(SystemClock),
        policy,
    );

    let addr: SocketAddr = config.server_url().parse()?;
    let app = create_app(AppState::new(booking, config));

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("📅 Alquileres:");
    info!("   POST /api/rentals - Crear reserva");
    info!("   GET  /api/rentals - Listar alquileres");
    info!("   GET  /api/rentals/:id - Obtener alquiler");
    info!("   POST /api/rentals/:id/complete - Completar alquiler");
    info!("   POST /api/rentals/:id/cancel - Cancelar alquiler");
    info!("   GET  /api/customers/:id/rentals - Alquileres de un cliente");
    info!("🚗 Vehículos:");
    info!("   GET  /api/vehicle/:id/availability?start=..&end=.. - Disponibilidad");
    info!("   GET  /api/vehicle/:id/schedule - Agenda de alquileres activos");
    info!("   GET  /api/vehicle/:id/reviews - Valoraciones");
    info!("🧾 Facturas:");
    info!("   GET  /api/invoices/:id - Obtener factura");
    info!("   GET  /api/invoices/rental/:rental_id - Factura de un alquiler");
    info!("   POST /api/invoices/:id/pay - Registrar pago");
    info!("   POST /api/invoices/:id/refund - Reembolsar");

    // Iniciar servidor en background
    let server_handle = tokio::spawn(async move {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                error!("❌ Error del servidor: {}", e);
                e
            })
    });

    // Esperar a que el servidor termine
    if let Err(e) = server_handle.await? {
        error!("❌ Servidor terminó con error: {}", e);
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo escuchar Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el manejador de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
