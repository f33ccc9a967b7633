use std::sync::{Arc, RwLock};
use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use aerolink_client::ApiClient;
use aerolink_core::search::{unique_origins, FlightSearch};
use aerolink_core::token;
use aerolink_rebook::{
    selectable_bookings, DisruptionManager, DisruptionSettings, DELAY_REPORTED_MESSAGE,
    REBOOKED_MESSAGE,
};
use aerolink_shared::Flight;
use aerolink_store::app_config::Config;
use aerolink_store::{FileSessionStore, SessionManager};
use aerolink_sync::{PeriodicPoller, RefreshBus};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    "aerolink_app=debug,aerolink_client=debug,aerolink_rebook=debug".into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting aerolink against {}", config.api.base_url);

    let store = Arc::new(FileSessionStore::new(&config.session.storage_path));
    let session = Arc::new(SessionManager::new(store));

    // Restore any persisted session; a token past its expiry is dropped up
    // front instead of bouncing off the backend.
    if let Some(auth) = session.load().await? {
        if token::is_expired(auth.token.as_str()) {
            tracing::info!("Stored session for {} has expired", auth.email);
            session.clear().await?;
        } else {
            tracing::info!("Restored session for {}", auth.email);
            if token::expires_within(auth.token.as_str(), chrono::Duration::minutes(5)) {
                tracing::warn!("Session token expires within five minutes");
            }
        }
    }

    let client = Arc::new(ApiClient::from_config(&config.api, session.clone())?);
    client.on_unauthorized(|| {
        tracing::warn!("Session rejected by backend; returning to the public view");
    });

    let bus = RefreshBus::new();
    let flight_cache: Arc<RwLock<Vec<Flight>>> = Arc::new(RwLock::new(Vec::new()));

    let refresh_flights = {
        let client = client.clone();
        let cache = flight_cache.clone();
        move || {
            let client = client.clone();
            let cache = cache.clone();
            tokio::spawn(async move {
                match client.flights().await {
                    Ok(flights) => {
                        tracing::debug!("Flight cache refreshed ({} flights)", flights.len());
                        *cache.write().unwrap() = flights;
                    }
                    Err(err) => tracing::warn!("Flight refresh failed: {}", err.user_message()),
                }
            });
        }
    };
    let _flights_subscription = bus.register(refresh_flights);

    // Prime the cache once before the poller takes over.
    match client.flights().await {
        Ok(flights) => {
            tracing::info!(
                "{} flights available from {} origins",
                flights.len(),
                unique_origins(&flights).len()
            );
            *flight_cache.write().unwrap() = flights;
        }
        Err(err) => tracing::warn!("Initial flight fetch failed: {}", err.user_message()),
    }

    if let (Some(email), Some(password)) = (&config.demo.email, &config.demo.password) {
        if let Err(err) = run_demo(&config, &client, &session, &bus, &flight_cache, email, password).await {
            tracing::error!("Demo pass aborted: {:#}", err);
        }
    }

    let mut poller = PeriodicPoller::new(Duration::from_millis(config.refresh.poll_interval_ms), {
        let bus = bus.clone();
        move || bus.trigger_now()
    });
    poller.set_enabled(true);

    tracing::info!(
        "Polling every {} ms; press Ctrl-C to exit",
        config.refresh.poll_interval_ms
    );
    tokio::signal::ctrl_c().await?;
    poller.set_enabled(false);
    Ok(())
}

/// Log in with the configured demo account and walk one delay -> rebook
/// pass over its first confirmed booking.
async fn run_demo(
    config: &Config,
    client: &Arc<ApiClient>,
    session: &Arc<SessionManager>,
    bus: &RefreshBus,
    flight_cache: &Arc<RwLock<Vec<Flight>>>,
    email: &str,
    password: &str,
) -> anyhow::Result<()> {
    let response = client.login(email, password).await.map_err(|err| {
        anyhow::anyhow!("Login failed: {}", err.user_message())
    })?;
    session.save(response.into_auth_data()).await?;

    let bookings = client
        .my_bookings()
        .await
        .map_err(|err| anyhow::anyhow!("Booking fetch failed: {}", err.user_message()))?;

    let selectable = selectable_bookings(&bookings);
    let Some(booking) = selectable.first() else {
        tracing::info!(
            "No confirmed bookings to simulate a delay for ({} total)",
            bookings.len()
        );
        return Ok(());
    };

    let flights = flight_cache.read().unwrap().clone();
    if let Some(flight) = booking.resolve_flight(&flights) {
        tracing::info!("Simulating a delay for booking #{} ({})", booking.id, flight.route());

        // Show the filter engine over the cached list for the booking's origin.
        let mut search = FlightSearch::new();
        search.set_search(&flight.origin);
        search.apply_search();
        tracing::debug!(
            "{} cached flights match '{}'",
            search.filter(&flights).len(),
            flight.origin
        );
    }

    let manager = DisruptionManager::new(
        client.clone(),
        client.clone(),
        bus.clone(),
        DisruptionSettings {
            reason: config.disruption.delay_reason.clone(),
            delay_offset: chrono::Duration::minutes(config.disruption.delay_offset_minutes),
            refresh_delay: Duration::from_millis(config.refresh.rebook_refresh_delay_ms),
        },
    );

    match manager.simulate_delay(booking).await {
        Ok(notification) => {
            tracing::info!("{}", DELAY_REPORTED_MESSAGE);
            tracing::info!(
                "Booking #{} delayed by {} min",
                notification.booking_id,
                notification.delay_minutes()
            );
        }
        Err(err) => {
            tracing::error!("{}", err.simulate_failure_message());
            return Ok(());
        }
    }

    for suggestion in manager.suggestions_for(booking.id) {
        tracing::info!(
            "Alternative: flight {} {} -> {} at {} (${:.2}){}",
            suggestion.flight_id,
            suggestion.origin,
            suggestion.destination,
            suggestion.departure_time,
            suggestion.price,
            if suggestion.is_best_option() { " [best option]" } else { "" }
        );
    }

    let Some(best) = manager.best_option(booking.id) else {
        tracing::info!("No alternatives offered for booking #{}", booking.id);
        return Ok(());
    };

    match manager.rebook(booking.id, best.flight_id).await {
        Ok(()) => tracing::info!("{}", REBOOKED_MESSAGE),
        Err(err) => tracing::error!("{}", err.rebook_failure_message()),
    }

    Ok(())
}
