use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use showroom_engine::catalog::{
    CatalogItem, ImageRef, Inquiry, ItemId, PropertyDefinition, PropertyKind, PropertyValue,
    StaticCatalog, TypeRef,
};
use showroom_engine::search::SortOrder;
use showroom_engine::storage::JsonFileStore;
use showroom_engine::{EngineConfig, ShowroomEngine, StorefrontError, StorefrontEvent};
use tokio::time::sleep;

#[tokio::main]
async fn main() -> Result<(), StorefrontError> {
    env_logger::init();

    // Configure the engine through the engine config builder. This sets up the main runtime
    // configuration of the engine; the debounce window and display limits are fixed once
    // the engine starts.
    let engine_cfg = EngineConfig::builder()
        .user_agent("ShowroomDemo/0.1")
        .recent_display_limit(4)
        .build()
        .expect("Configuration is not valid");

    // Set up a catalog provider. In this demo we use the StaticCatalog, which serves a fixed
    // furniture list without network access. Pointing the engine at a real CMS is a matter of
    // swapping this for an HttpCatalog.
    let provider = Arc::new(StaticCatalog::new(furniture()).with_properties(
        "seating",
        vec![
            PropertyDefinition {
                name: "Material".into(),
                kind: PropertyKind::Text,
            },
            PropertyDefinition {
                name: "Seats".into(),
                kind: PropertyKind::Number,
            },
        ],
    ));

    // Favorites, viewing history and the consent decision persist into a JSON file, so a
    // second run of this demo starts where the previous one left off.
    let storage_path = std::env::temp_dir().join("showroom-demo.json");
    let store = Arc::new(JsonFileStore::open(&storage_path));

    // Instantiate and start the engine.
    let engine = ShowroomEngine::new(Some(engine_cfg), provider.clone(), store);
    let (engine, engine_join_handle) = engine.start().expect("cannot start engine");

    // Get our event channel to receive events from the engine. Note that you will only receive
    // events sent from this point on.
    let mut event_rx = engine.subscribe_events();

    // A first run has no consent decision recorded yet; accept it the way the banner would.
    let consent = engine.consent();
    if consent.needs_decision() {
        println!("No consent decision on file, accepting cookies");
        consent.accept();
    }

    // Open a searcher and type a query. The text waits out the settle window before the
    // engine fetches, so rapid keystrokes would collapse into a single catalog call.
    let search = engine.open_search().await?;
    search.set_text("oak").await?;
    sleep(Duration::from_millis(600)).await;

    let snapshot = search.snapshot().await?;
    println!("Search for \"oak\": {}", snapshot.status);
    for item in &snapshot.items {
        println!("  {:<12} EUR {:>8.2}", item.name, item.price);
    }

    // Narrow down to seating, ordered cheapest first. Type and sort changes take effect
    // immediately; no settle window applies to them.
    search.set_item_type(Some("seating".into())).await?;
    search.set_sort(SortOrder::PriceAscending).await?;
    sleep(Duration::from_millis(100)).await;

    let snapshot = search.snapshot().await?;
    println!("Seating only, cheapest first: {}", snapshot.status);
    for item in &snapshot.items {
        println!("  {:<12} EUR {:>8.2}", item.name, item.price);
    }

    // Open a detail page for the first hit. Constructing the visit records it in the
    // viewing history; the view beacon fires at most once per visit, no matter how often
    // the page re-renders.
    if let Some(first) = snapshot.items.first() {
        let mut visit = engine.visit(first.clone());
        if let Some(beacon) = visit.record_view() {
            let _ = beacon.await;
        }
        assert!(visit.record_view().is_none());

        println!("Viewing {} ({} view(s) on record)", first.name, provider.view_count(&first.id));
        for entry in visit.other_recent() {
            println!("  also recently viewed: {}", entry.name);
        }

        // Toggle the item on the favorites list. Favorites behave like a set: toggling
        // twice would leave the list as it was.
        let favorites = engine.favorites();
        if favorites.toggle(first) {
            println!("Added {} to favorites ({} total)", first.name, favorites.count());
        } else {
            println!("Removed {} from favorites ({} total)", first.name, favorites.count());
        }

        // Ask the seller about the item.
        engine
            .submit_inquiry(&Inquiry {
                name: "Ada".into(),
                email: "ada@example.com".into(),
                message: format!("Is the {} still available?", first.name),
                item_ref: Some(first.id.clone()),
            })
            .await?;
        println!("Inquiry submitted");
    }

    // This is the application's main loop, where we receive events from the engine and act
    // on them. In a real application this runs for the lifetime of the UI; here we drain
    // for a few intervals and then stop.
    let mut seen_intervals = 0usize;
    let mut interval = tokio::time::interval(Duration::from_secs(1));

    loop {
        tokio::select! {
            Ok(ev) = event_rx.recv() => {
                handle_event(ev);
            }
            _ = tokio::signal::ctrl_c() => {
                println!("Received Ctrl-C, shutting down...");
                break;
            }
            _ = interval.tick() => {
                seen_intervals += 1;
                if seen_intervals >= 3 {
                    println!("Seen {seen_intervals} intervals, exiting main loop");
                    break;
                }
            }
        }
    }

    println!("Shutting down engine...");
    engine.shutdown().await?;

    // Wait for the engine task to finish
    if let Err(join_err) = engine_join_handle.await {
        eprintln!("engine task panicked: {join_err}");
    }

    println!("Done. Exiting. Storage file: {}", storage_path.display());
    Ok(())
}

/// A small furniture catalog for the demo.
fn furniture() -> Vec<CatalogItem> {
    fn entry(
        id: &str,
        name: &str,
        price: f64,
        created_at: &str,
        type_ref: (&str, &str),
        properties: &[(&str, PropertyValue)],
    ) -> CatalogItem {
        CatalogItem {
            id: ItemId::from(id),
            name: name.to_string(),
            price,
            images: vec![ImageRef {
                url: format!("https://cdn.example/images/{id}.jpg"),
                alt: Some(name.to_string()),
            }],
            created_at: created_at.parse().expect("fixture date"),
            item_type: Some(TypeRef {
                id: type_ref.0.to_string(),
                name: type_ref.1.to_string(),
            }),
            properties: properties
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    vec![
        entry(
            "oak-chair",
            "Oak Chair",
            129.50,
            "2024-01-12T09:00:00Z",
            ("seating", "Seating"),
            &[
                ("Material", PropertyValue::Text("Solid Oak".into())),
                ("Seats", PropertyValue::Number(1.0)),
            ],
        ),
        entry(
            "oak-table",
            "Oak Table",
            450.00,
            "2024-02-03T14:30:00Z",
            ("tables", "Tables"),
            &[("Material", PropertyValue::Text("Oak veneer".into()))],
        ),
        entry(
            "walnut-desk",
            "Walnut Desk",
            620.00,
            "2024-02-20T10:15:00Z",
            ("tables", "Tables"),
            &[("Material", PropertyValue::Text("Walnut".into()))],
        ),
        entry(
            "pine-bench",
            "Pine Bench",
            89.00,
            "2024-03-01T16:45:00Z",
            ("seating", "Seating"),
            &[
                ("Material", PropertyValue::Text("Pine".into())),
                ("Seats", PropertyValue::Number(3.0)),
            ],
        ),
    ]
}

fn handle_event(ev: StorefrontEvent) {
    match ev {
        StorefrontEvent::SearchStatusChanged { searcher_id, status } => {
            println!("[event] search {searcher_id} status: {status}");
        }
        StorefrontEvent::SearchResults { searcher_id, items, total } => {
            println!(
                "[event] search {searcher_id} results: {} shown of {total} total",
                items.len()
            );
        }
        StorefrontEvent::FavoriteAdded { entry } => {
            println!("[event] favorite added: {}", entry.name);
        }
        StorefrontEvent::FavoriteRemoved { id } => {
            println!("[event] favorite removed: {id}");
        }
        StorefrontEvent::ViewRecorded { id } => {
            println!("[event] view recorded for {id}");
        }
        other => {
            // Keep this to see what else the engine emits.
            println!("[event] {other:?}");
        }
    }
}
