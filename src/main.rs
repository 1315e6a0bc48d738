//! Command-line walk through the client: check who is signed in, route to the requested
//! view, and print the menu the way the ordering screen tabs it.

use restaurant_client::api::{ApiClient, HttpBackend, RecoverySink};
use restaurant_client::auth::{CredentialStore, FileCredentials, Session, View};
use restaurant_client::config::ClientConfig;
use restaurant_client::framework::BackendContext;
use restaurant_client::lifecycle::{setup_tracing, DraftStore};
use std::sync::Arc;
use tracing::{info, warn, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    dotenvy::dotenv().ok();
    setup_tracing();
    let config = ClientConfig::from_env().map_err(|e| e.to_string())?;

    let credentials: Arc<dyn CredentialStore> =
        Arc::new(FileCredentials::open(&config.credential_path));
    let backend = HttpBackend::new(&config.api_url, credentials.clone()).map_err(|e| e.to_string())?;
    let api = ApiClient::new(Arc::new(backend));

    let session = Session::check(&api, credentials.as_ref()).await;
    let requested = std::env::args()
        .nth(1)
        .map(|path| View::from_path(&path).ok_or(format!("Unknown view {path:?}")))
        .transpose()?
        .unwrap_or_else(|| session.home());
    let access = session.authorize(requested);
    info!(user = %session.user, role = ?session.role, view = access.view().path(), "Routed");

    let (recovery, mut recoveries) = RecoverySink::channel();
    let context = BackendContext::new(api, credentials, recovery);

    let span = tracing::info_span!("store_startup");
    let store = DraftStore::start(context, &config).instrument(span).await;

    let tabs = store.menu_by_category().await.map_err(|e| e.to_string())?;
    for tab in &tabs {
        println!("== {} ==", tab.category.name);
        for item in &tab.items {
            println!("  {:<32} {:>8.2}", item.name, item.price);
        }
    }

    while let Ok(recovery) = recoveries.try_recv() {
        warn!(?recovery, "Backend asked for recovery");
    }

    store.shutdown().await.map_err(|e| e.to_string())?;
    info!("Done");
    Ok(())
}
