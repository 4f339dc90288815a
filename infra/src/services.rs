//! Service container
//!
//! Builds the configured key-value store and the core services on top of it.

use std::sync::Arc;

use tracing::info;

use loop_core::services::{SystemClock, TripService, WalletService};
use loop_shared::config::AppConfig;

use crate::repositories::KvBookingRepository;
use crate::storage::{open_store, ConfiguredStore};
use crate::{load_config, InfrastructureError};

/// Booking repository over the configured store
pub type BookingStore = KvBookingRepository<ConfiguredStore>;

/// Everything a host needs to drive handoffs, trips and the wallet
pub struct LoopServices {
    pub config: AppConfig,
    pub store: Arc<ConfiguredStore>,
    pub bookings: Arc<BookingStore>,
    pub trips: TripService<BookingStore, SystemClock>,
    pub wallet: WalletService<ConfiguredStore>,
}

impl LoopServices {
    /// Wires the services for an already loaded configuration
    pub async fn from_config(config: AppConfig) -> Result<Self, InfrastructureError> {
        config.validate().map_err(InfrastructureError::Config)?;

        let store = Arc::new(open_store(&config.storage).await?);
        let bookings = Arc::new(KvBookingRepository::new(Arc::clone(&store)));
        let trips = TripService::new(
            Arc::clone(&bookings),
            Arc::new(SystemClock),
            config.otp.clone(),
            config.trip.clone(),
        );
        let wallet = WalletService::new(Arc::clone(&store), config.wallet.clone());

        info!(
            environment = %config.environment,
            backend = ?store.backend(),
            "Services initialized"
        );

        Ok(Self {
            config,
            store,
            bookings,
            trips,
            wallet,
        })
    }
}

/// Loads configuration from the environment and wires the services
pub async fn initialize() -> Result<LoopServices, InfrastructureError> {
    let config = load_config()?;
    LoopServices::from_config(config).await
}
