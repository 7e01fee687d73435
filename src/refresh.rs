use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::forecast::ForecastClient;
use crate::store::{CatalogStore, StoreError};

/// One refresh cycle: fan out a current-weather fetch per tracked city,
/// merge the successes into an in-memory working copy of the catalog, then
/// persist it once.
///
/// A failed city keeps its previous weather and does not abort its siblings.
pub async fn refresh_all_cities(
    store: &CatalogStore,
    client: &Arc<dyn ForecastClient>,
) -> Result<(), StoreError> {
    let mut catalog = store.load().await?;

    let mut fetches = Vec::with_capacity(catalog.cities.len());
    for (name, city) in &catalog.cities {
        let client = Arc::clone(client);
        let name = name.clone();
        let (latitude, longitude) = (city.latitude(), city.longitude());
        fetches.push(tokio::spawn(async move {
            let result = client.fetch_current(latitude, longitude).await;
            (name, result)
        }));
    }

    for fetch in fetches {
        match fetch.await {
            Ok((name, Ok(weather))) => {
                if let Some(city) = catalog.cities.get_mut(&name) {
                    city.weather = weather;
                }
            }
            Ok((name, Err(e))) => {
                warn!(city = %name, error = %e, "weather refresh failed; keeping previous data");
            }
            Err(e) => warn!(error = %e, "weather refresh task panicked"),
        }
    }

    store.save(&catalog).await
}

/// Spawn the self-rearming refresh loop: one cycle immediately at startup,
/// then one every `interval`, for the life of the process.
///
/// The returned handle is a forward-looking cancellation hook; nothing
/// aborts it in current scope.
pub fn spawn_refresh_task(
    store: Arc<CatalogStore>,
    client: Arc<dyn ForecastClient>,
    interval: Duration,
) -> JoinHandle<()> {
    info!(
        interval_secs = interval.as_secs(),
        "starting periodic weather refresh task"
    );

    tokio::spawn(async move {
        loop {
            match refresh_all_cities(&store, &client).await {
                Ok(()) => info!("weather refresh cycle finished"),
                Err(e) => error!(error = %e, "weather refresh cycle failed"),
            }
            tokio::time::sleep(interval).await;
        }
    })
}
