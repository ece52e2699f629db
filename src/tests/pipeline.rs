//! Offline build through startup wiring, against files in a temp directory.

use std::sync::Arc;

use crate::app::{AppFactory, ItineraryPlanner};
use crate::catalog::Catalog;
use crate::config::Config;
use crate::prompt::ItineraryRequest;
use crate::retriever::ContextRetriever;
use crate::semantic::{self, Embedder, IndexStorage, LabelStorage, MonumentLabel};
use crate::tests::support::{EchoLlm, FixedEmbedder, HashEmbedder};

const CATALOG: &str = r#"[
    {"city": "Jaipur", "monuments": [
        {"name": "Amber Fort", "entry_fee_indian": 100, "entry_fee_foreign": 500,
         "timings": "8 AM - 5:30 PM", "notes": "Hilltop fort with mirror palace"},
        {"name": "Hawa Mahal", "entry_fee": 50, "notes": "Palace of winds"},
        {"name": "Jantar Mantar", "entry_fee": 50, "notes": "Astronomical instruments"}
    ]},
    {"city": "Agra", "monuments": [
        {"name": "Taj Mahal", "entry_fee_indian": 50, "entry_fee_foreign": 1100,
         "notes": "Closed on Fridays"}
    ]}
]"#;

const DIMS: usize = 16;

/// Writes a catalog and default config into a fresh base path.
fn setup() -> (Config, tempfile::TempDir) {
    let tmp = tempfile::tempdir().expect("failed to create temp dir");
    let base_path = tmp.path().to_str().unwrap().to_string();

    let config = Config::load_with(&base_path).expect("failed to load config");
    let catalog_path = config.catalog_path();
    std::fs::create_dir_all(catalog_path.parent().unwrap()).unwrap();
    std::fs::write(&catalog_path, CATALOG).unwrap();

    (config, tmp)
}

fn build(config: &Config, embedder: &dyn Embedder) {
    let catalog = AppFactory::load_catalog(config).unwrap();
    let built = semantic::build_index(&catalog, embedder, 2, false).unwrap();
    built
        .save(
            &IndexStorage::new(config.index_path()),
            &LabelStorage::new(config.labels_path()),
            &embedder.model_id(),
        )
        .unwrap();
}

#[test]
fn test_build_then_retrieve() {
    let (config, _tmp) = setup();
    let embedder = HashEmbedder::new(DIMS);
    build(&config, &embedder);

    assert!(config.index_path().exists());
    assert!(config.labels_path().exists());

    let retriever = AppFactory::create_retriever(&config, Arc::new(HashEmbedder::new(DIMS))).unwrap();

    let catalog = Catalog::from_json(CATALOG).unwrap();
    let hawa = &catalog.records()[1];
    let context = retriever.retrieve(&hawa.embedding_text(), None, 1);

    assert_eq!(context, vec![hawa.detail()]);
}

#[test]
fn test_build_then_retrieve_with_city_filter() {
    let (config, _tmp) = setup();
    build(&config, &HashEmbedder::new(DIMS));

    let retriever = AppFactory::create_retriever(&config, Arc::new(HashEmbedder::new(DIMS))).unwrap();
    let context = retriever.retrieve("forts and palaces", Some("Agra"), 1);

    assert_eq!(context.len(), 1);
    assert!(context[0].contains("Taj Mahal"));
}

#[test]
fn test_labels_out_of_step_with_index() {
    let (config, _tmp) = setup();
    build(&config, &HashEmbedder::new(DIMS));

    let label_storage = LabelStorage::new(config.labels_path());
    let mut labels = label_storage.load().unwrap();
    labels.push(MonumentLabel::new("Delhi", "Red Fort"));
    label_storage.save(&labels).unwrap();

    let err = AppFactory::create_retriever(&config, Arc::new(HashEmbedder::new(DIMS)))
        .err()
        .expect("misaligned files must not load");
    assert!(err.to_string().contains("4 vectors"));
    assert!(err.to_string().contains("5 entries"));
}

#[test]
fn test_missing_index_is_startup_error() {
    let (config, _tmp) = setup();

    let err = AppFactory::create_retriever(&config, Arc::new(HashEmbedder::new(DIMS)))
        .err()
        .expect("missing index must not load");
    assert!(err.to_string().contains("build-index"));
}

#[test]
fn test_index_built_with_other_model_is_rejected() {
    let (config, _tmp) = setup();
    build(&config, &HashEmbedder::new(DIMS));

    let other = FixedEmbedder(vec![0.0; DIMS]);
    assert!(AppFactory::create_retriever(&config, Arc::new(other)).is_err());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_planner_over_built_index() {
    let (config, _tmp) = setup();
    build(&config, &HashEmbedder::new(DIMS));

    let retriever = AppFactory::create_retriever(&config, Arc::new(HashEmbedder::new(DIMS))).unwrap();
    let planner = ItineraryPlanner::new(Arc::new(retriever), Arc::new(EchoLlm), 3);

    let request = ItineraryRequest {
        city: "Jaipur".to_string(),
        trip_duration: "2-day".to_string(),
        budget: "Moderate".to_string(),
        interests: vec!["Forts & Palaces".to_string()],
        location: None,
    };
    let itinerary = planner.generate(&request).await.unwrap();

    assert!(itinerary.contains("Jaipur"));
    assert!(itinerary.contains("2-day"));
    assert!(itinerary.contains("Amber Fort"));
    assert!(itinerary.contains("Hawa Mahal"));
    assert!(itinerary.contains("Jantar Mantar"));
    assert!(!itinerary.contains("Taj Mahal"));
}
