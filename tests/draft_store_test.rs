use restaurant_client::api::mock::{Method, MockBackend};
use restaurant_client::api::{ApiClient, ApiError, Recovery, RecoverySink};
use restaurant_client::auth::{CredentialStore, MemoryCredentials, View};
use restaurant_client::config::ClientConfig;
use restaurant_client::framework::{BackendContext, WritePolicy};
use restaurant_client::lifecycle::DraftStore;
use restaurant_client::model::{CategoryId, Ingredient, IngredientId, MenuItem, MenuItemId};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Notify};

// --- Fixtures ---

fn menu_json() -> Value {
    json!([
        {"id": 1, "name": "Orange Chicken", "price": 3.50, "categoryId": 1},
        {"id": 2, "name": "Chow Mein", "price": 3.00, "categoryId": 2}
    ])
}

fn categories_json() -> Value {
    json!([{"id": 1, "name": "Entrees"}, {"id": 2, "name": "Sides"}])
}

fn ingredients_json() -> Value {
    json!([
        {"id": 10, "name": "Chicken", "stock": 40, "restock": 20, "amountOrdered": 0, "price": 2.0},
        {"id": 11, "name": "Noodles", "stock": 5, "restock": 30, "amountOrdered": 0, "price": 0.5}
    ])
}

fn expect_startup(mock: &MockBackend) {
    mock.expect_get("/menuItems").return_ok(menu_json());
    mock.expect_get("/itemCategories").return_ok(categories_json());
    mock.expect_get("/ingredients").return_ok(ingredients_json());
}

struct Harness {
    mock: Arc<MockBackend>,
    credentials: Arc<MemoryCredentials>,
    recoveries: mpsc::UnboundedReceiver<Recovery>,
    store: DraftStore,
}

async fn start(mock: Arc<MockBackend>, policy: WritePolicy) -> Harness {
    let credentials = Arc::new(MemoryCredentials::with_token("id-token"));
    let (recovery, recoveries) = RecoverySink::channel();
    let context = BackendContext::new(
        ApiClient::new(mock.clone()),
        credentials.clone(),
        recovery,
    );
    let config = ClientConfig {
        write_policy: policy,
        ..ClientConfig::default()
    };
    let store = DraftStore::start(context, &config).await;
    Harness {
        mock,
        credentials,
        recoveries,
        store,
    }
}

async fn started() -> Harness {
    let mock = Arc::new(MockBackend::new());
    expect_startup(&mock);
    start(mock, WritePolicy::default()).await
}

async fn started_reconciling() -> Harness {
    let mock = Arc::new(MockBackend::new());
    expect_startup(&mock);
    start(mock, WritePolicy::Reconcile).await
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

async fn wait_for_pending(store: &DraftStore, expected: usize) {
    use restaurant_client::clients::ActorClient;
    for _ in 0..100 {
        if store.menu_items.inner().pending_writes().await.unwrap() == expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("pending writes never reached {expected}");
}

// --- Cart ---

#[tokio::test]
async fn test_cart_total() {
    let h = started().await;

    h.store.add_entry(MenuItemId(1)).await.unwrap();
    h.store.add_entry(MenuItemId(1)).await.unwrap();
    h.store.add_entry(MenuItemId(2)).await.unwrap();

    assert_close(h.store.cart.total_price().await.unwrap(), 10.00);
    let snapshot = h.store.snapshot().await.unwrap();
    assert_close(snapshot.cart_total(), 10.00);
    assert_eq!(snapshot.cart_lines()[0].name, "Orange Chicken");
    assert_eq!(snapshot.cart_lines()[0].quantity, 2);

    h.store.shutdown().await.unwrap();
    h.mock.verify();
}

#[tokio::test]
async fn test_decrement_to_zero_removes_entry() {
    let h = started().await;

    h.store.add_entry(MenuItemId(2)).await.unwrap();
    let cart = h.store.decrement_quantity(MenuItemId(2)).await.unwrap();
    assert!(cart.is_empty());

    // Incrementing an item that is not in the cart changes nothing.
    let cart = h.store.increment_quantity(MenuItemId(2)).await.unwrap();
    assert!(cart.is_empty());

    h.store.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_concurrent_adds_never_duplicate_entries() {
    let h = started().await;

    let adds: Vec<_> = (0..20)
        .map(|_| {
            let cart = h.store.cart.clone();
            tokio::spawn(async move { cart.add_entry(MenuItemId(1)).await })
        })
        .collect();
    for add in adds {
        add.await.unwrap().unwrap();
    }

    let cart = h.store.cart.snapshot().await.unwrap();
    assert_eq!(cart.entries().len(), 1);
    assert_eq!(cart.quantity_of(MenuItemId(1)), 20);

    h.store.shutdown().await.unwrap();
}

// --- Checkout ---

#[tokio::test]
async fn test_checkout_posts_walk_in_order() {
    let h = started().await;
    h.mock.expect_post("/orders").return_ok(json!({
        "id": 77, "price": 7.0, "time": "2024-05-01T18:30:00", "userId": 0, "items": {"1": 2}
    }));

    h.store.add_entry(MenuItemId(1)).await.unwrap();
    h.store.add_entry(MenuItemId(1)).await.unwrap();
    let receipt = h.store.checkout().await.unwrap();
    assert_close(receipt.order.price, 7.00);
    assert!(h.store.cart.snapshot().await.unwrap().is_empty());

    let placed = receipt.outcome().await.unwrap();
    assert_eq!(placed.id.map(|id| id.0), Some(77));

    let posted = h.mock.requests_to(Method::Post, "/orders");
    let body = posted[0].body.clone().unwrap();
    assert_eq!(body["userId"], json!(0));
    assert_eq!(body["items"], json!({"1": 2}));
    assert!(body.get("status").is_none());
    assert!(body.get("id").is_none());
    assert!(body["time"].as_str().unwrap().ends_with('Z'));

    h.store.shutdown().await.unwrap();
    h.mock.verify();
}

#[tokio::test]
async fn test_checkout_clears_cart_even_when_rejected() {
    let mut h = started().await;
    h.mock.expect_post("/orders").return_err(ApiError::Status {
        status: 500,
        body: "database down".into(),
    });

    h.store.add_entry(MenuItemId(2)).await.unwrap();
    let receipt = h.store.checkout().await.unwrap();

    assert!(receipt.outcome().await.is_err());
    assert!(h.store.cart.snapshot().await.unwrap().is_empty());
    // A plain server error is only logged.
    assert!(h.recoveries.try_recv().is_err());

    h.store.shutdown().await.unwrap();
    h.mock.verify();
}

#[tokio::test]
async fn test_empty_checkout_still_submits() {
    let h = started().await;
    h.mock
        .expect_post("/orders")
        .return_ok(json!({"id": 1, "price": 0.0, "time": "2024-05-01T18:30:00.000Z", "userId": 0}));

    let receipt = h.store.checkout().await.unwrap();
    assert!(receipt.order.items.is_empty());
    drop(receipt);

    // Shutdown waits for the dropped submission.
    h.store.shutdown().await.unwrap();
    h.mock.verify();
}

// --- Reference data ---

#[tokio::test]
async fn test_change_is_visible_before_confirmation() {
    let h = started().await;
    let gate = Arc::new(Notify::new());
    h.mock
        .expect_post("/menuItems")
        .held_by(gate.clone())
        .return_ok(json!({"id": 1, "name": "Orange Chicken", "price": 7.50, "categoryId": 1}));

    let item = MenuItem::new("Orange Chicken", 7.50, CategoryId(1));
    h.store.change_menu_item(MenuItemId(1), item).await.unwrap();

    let snapshot = h.store.snapshot().await.unwrap();
    assert_eq!(snapshot.menu_items[0].id, Some(MenuItemId(1)));
    assert_close(snapshot.menu_items[0].price, 7.50);
    assert_eq!(snapshot.menu_items.len(), 2);

    gate.notify_one();
    h.store.flush().await.unwrap();
    let body = h.mock.requests_to(Method::Post, "/menuItems")[0].body.clone().unwrap();
    assert_eq!(body["id"], json!(1));

    h.store.shutdown().await.unwrap();
    h.mock.verify();
}

#[tokio::test]
async fn test_insert_adopts_server_id() {
    let h = started_reconciling().await;
    let gate = Arc::new(Notify::new());
    h.mock
        .expect_post("/ingredients")
        .held_by(gate.clone())
        .return_ok(json!({
            "id": 12, "name": "Tofu", "stock": 15, "restock": 10, "amountOrdered": 0, "price": 1.25
        }));

    h.store
        .add_ingredient(Ingredient::new("Tofu", 15, 10, 1.25))
        .await
        .unwrap();
    let before = h.store.snapshot().await.unwrap();
    assert_eq!(before.ingredients.last().unwrap().id, None);

    gate.notify_one();
    h.store.flush().await.unwrap();
    let after = h.store.snapshot().await.unwrap();
    assert_eq!(after.ingredients.len(), 3);
    assert_eq!(after.ingredients[2].id, Some(IngredientId(12)));

    h.store.shutdown().await.unwrap();
    h.mock.verify();
}

#[tokio::test]
async fn test_failed_writes_are_reverted() {
    let h = started_reconciling().await;
    h.mock
        .expect_post("/menuItems")
        .return_err(ApiError::Transport("connection reset".into()));
    h.mock
        .expect_delete("/menuItems")
        .with_query(&[("id", "2")])
        .return_err(ApiError::Transport("connection reset".into()));
    h.mock
        .expect_post("/menuItems")
        .return_err(ApiError::Transport("connection reset".into()));

    h.store
        .change_menu_item(MenuItemId(1), MenuItem::new("Orange Chicken", 9.99, CategoryId(1)))
        .await
        .unwrap();
    h.store.delete_menu_item(MenuItemId(2)).await.unwrap();
    h.store
        .add_menu_item(MenuItem::new("Egg Roll", 1.50, CategoryId(2)))
        .await
        .unwrap();

    h.store.flush().await.unwrap();
    let menu = h.store.snapshot().await.unwrap().menu_items;
    let names: Vec<&str> = menu.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, ["Orange Chicken", "Chow Mein"]);
    assert_close(menu[0].price, 3.50);

    h.store.shutdown().await.unwrap();
    h.mock.verify();
}

#[tokio::test]
async fn test_superseded_change_is_not_reverted() {
    let h = started_reconciling().await;
    let gate = Arc::new(Notify::new());
    h.mock
        .expect_post("/menuItems")
        .held_by(gate.clone())
        .return_err(ApiError::Transport("timeout".into()));
    h.mock
        .expect_post("/menuItems")
        .return_ok(json!({"id": 1, "name": "Orange Chicken", "price": 4.25, "categoryId": 1}));

    h.store
        .change_menu_item(MenuItemId(1), MenuItem::new("Orange Chicken", 4.00, CategoryId(1)))
        .await
        .unwrap();
    h.store
        .change_menu_item(MenuItemId(1), MenuItem::new("Orange Chicken", 4.25, CategoryId(1)))
        .await
        .unwrap();

    // The second write settles while the first is still held.
    wait_for_pending(&h.store, 1).await;
    gate.notify_one();
    h.store.flush().await.unwrap();

    let menu = h.store.snapshot().await.unwrap().menu_items;
    assert_close(menu[0].price, 4.25);

    h.store.shutdown().await.unwrap();
    h.mock.verify();
}

#[tokio::test]
async fn test_failed_change_is_kept_by_default() {
    let h = started().await;
    h.mock
        .expect_post("/menuItems")
        .return_err(ApiError::Status {
            status: 500,
            body: String::new(),
        });

    h.store
        .change_menu_item(MenuItemId(1), MenuItem::new("Orange Chicken", 7.50, CategoryId(1)))
        .await
        .unwrap();
    h.store.flush().await.unwrap();

    let menu = h.store.snapshot().await.unwrap().menu_items;
    assert_close(menu[0].price, 7.50);
    assert_eq!(menu[0].id, Some(MenuItemId(1)));

    h.store.shutdown().await.unwrap();
    h.mock.verify();
}

#[tokio::test]
async fn test_default_policy_keeps_local_entity_on_confirmation() {
    let h = started().await;
    h.mock.expect_post("/ingredients").return_ok(json!({
        "id": 12, "name": "Tofu", "stock": 15, "restock": 10, "amountOrdered": 0, "price": 1.25
    }));

    h.store
        .add_ingredient(Ingredient::new("Tofu", 15, 10, 1.25))
        .await
        .unwrap();
    h.store.flush().await.unwrap();

    // No reconciliation: the server id is only picked up by the next load.
    let ingredients = h.store.snapshot().await.unwrap().ingredients;
    assert_eq!(ingredients.len(), 3);
    assert_eq!(ingredients[2].id, None);

    h.store.shutdown().await.unwrap();
    h.mock.verify();
}

#[tokio::test]
async fn test_adoption_keeps_write_only_ingredients() {
    let h = started_reconciling().await;
    h.mock.expect_post("/menuItems").return_ok(json!({
        "id": 1, "name": "Orange Chicken", "price": 4.00, "categoryId": 1
    }));

    let mut item = MenuItem::new("Orange Chicken", 3.75, CategoryId(1));
    item.ingredients.insert(IngredientId(10), 2);
    h.store.change_menu_item(MenuItemId(1), item).await.unwrap();
    h.store.flush().await.unwrap();

    let menu = h.store.snapshot().await.unwrap().menu_items;
    // The stored price is adopted, the ingredient links the backend never echoes are not lost.
    assert_close(menu[0].price, 4.00);
    assert_eq!(menu[0].ingredients.len(), 1);
    assert_eq!(menu[0].ingredients.get(&IngredientId(10)), Some(&2));

    h.store.shutdown().await.unwrap();
    h.mock.verify();
}

#[tokio::test]
async fn test_optimistic_policy_keeps_failed_change() {
    let mock = Arc::new(MockBackend::new());
    expect_startup(&mock);
    let h = start(mock, WritePolicy::Optimistic).await;
    h.mock
        .expect_post("/ingredients")
        .return_err(ApiError::Status {
            status: 500,
            body: String::new(),
        });

    let mut noodles = Ingredient::new("Noodles", 50, 30, 0.5);
    noodles.amount_ordered = 10;
    h.store
        .change_ingredient(IngredientId(11), noodles)
        .await
        .unwrap();
    h.store.flush().await.unwrap();

    let ingredients = h.store.snapshot().await.unwrap().ingredients;
    assert_eq!(ingredients[1].stock, 50);
    assert_eq!(ingredients[1].id, Some(IngredientId(11)));

    h.store.shutdown().await.unwrap();
    h.mock.verify();
}

#[tokio::test]
async fn test_low_stock() {
    let h = started().await;
    let low = h.store.ingredients.low_stock().await.unwrap();
    assert_eq!(low.len(), 1);
    assert_eq!(low[0].name, "Noodles");
    h.store.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_menu_by_category() {
    let h = started().await;
    let tabs = h.store.menu_by_category().await.unwrap();
    assert_eq!(tabs.len(), 2);
    assert_eq!(tabs[0].category.name, "Entrees");
    assert_eq!(tabs[0].items[0].name, "Orange Chicken");
    assert_eq!(tabs[1].items[0].name, "Chow Mein");
    h.store.shutdown().await.unwrap();
}

// --- Errors and lifecycle ---

#[tokio::test]
async fn test_rejected_credential_at_startup_requests_reload() {
    let mock = Arc::new(MockBackend::new());
    mock.expect_get("/menuItems").return_err(ApiError::Unauthorized);
    mock.expect_get("/itemCategories").return_err(ApiError::Unauthorized);
    mock.expect_get("/ingredients").return_ok(ingredients_json());
    let mut h = start(mock, WritePolicy::Reconcile).await;

    assert!(!h.credentials.has_token());
    assert_eq!(h.recoveries.try_recv().ok(), Some(Recovery::Reload));
    // The credential was already cleared by the first failure.
    assert!(h.recoveries.try_recv().is_err());

    let snapshot = h.store.snapshot().await.unwrap();
    assert!(snapshot.menu_items.is_empty());
    assert!(snapshot.item_categories.is_empty());
    assert_eq!(snapshot.ingredients.len(), 2);

    h.store.shutdown().await.unwrap();
    h.mock.verify();
}

#[tokio::test]
async fn test_forbidden_write_redirects() {
    let mut h = started().await;
    h.mock
        .expect_delete("/ingredients")
        .return_err(ApiError::Forbidden);

    h.store.delete_ingredient(IngredientId(10)).await.unwrap();
    h.store.flush().await.unwrap();

    assert_eq!(
        h.recoveries.recv().await,
        Some(Recovery::Redirect(View::Unauthorized))
    );
    assert!(h.credentials.has_token());

    h.store.shutdown().await.unwrap();
    h.mock.verify();
}

#[tokio::test]
async fn test_refresh_replaces_cached_lists() {
    let h = started().await;
    h.mock.expect_get("/menuItems").return_ok(json!([
        {"id": 3, "name": "Honey Walnut Shrimp", "price": 5.00, "categoryId": 1}
    ]));
    h.mock.expect_get("/itemCategories").return_ok(categories_json());
    h.mock.expect_get("/ingredients").return_ok(json!([]));

    h.store.add_entry(MenuItemId(3)).await.unwrap();
    h.store.refresh().await.unwrap();

    let snapshot = h.store.snapshot().await.unwrap();
    assert_eq!(snapshot.menu_items.len(), 1);
    assert!(snapshot.ingredients.is_empty());
    assert_close(snapshot.cart_total(), 5.00);

    h.store.shutdown().await.unwrap();
    h.mock.verify();
}

#[tokio::test]
async fn test_shutdown_waits_for_pending_writes() {
    let h = started().await;
    let gate = Arc::new(Notify::new());
    h.mock
        .expect_delete("/menuItems")
        .held_by(gate.clone())
        .return_ok(Value::Null);

    h.store.delete_menu_item(MenuItemId(1)).await.unwrap();

    let Harness { mock, store, .. } = h;
    let shutdown = tokio::spawn(store.shutdown());
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!shutdown.is_finished());

    gate.notify_one();
    shutdown.await.unwrap().unwrap();
    mock.verify();
}
