use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use skincare_recommender::{
    api::{create_router, AppState},
    catalog::{
        load_catalog,
        loader::{INGREDIENTS_FILE, PRODUCTS_FILE, PRODUCT_ALLERGENS_FILE},
    },
    db::InMemoryHistoryStore,
    services::{ConcernSynonyms, RecommendationEngine},
};

const PRODUCTS: &str = "\
Label,brand,name,price,ingredients,Combination,Dry,Normal,Oily,Sensitive
Cleanser,Clarity,Blemish Wash,20,\"Water, Salicylic Acid, Glycerin\",0,0,0,1,0
Treatment,Clarity,Spot Gel,18,\"Water, Salicylic Acid, Niacinamide\",0,0,0,1,0
Moisturizer,Dewy,Oil-Free Lotion,25,\"Water, Dimethicone, Glycerin\",0,0,0,1,0
Moisturizer,Dewy,Rich Cream,30,\"Water, Ceramide, Glycerin, Parfum\",0,1,1,0,1
Serum,Night Lab,Renewal Serum,55,\"Water, Hydroxypinacolone Retinoate, Ceramide\",1,1,1,0,0
Eye cream,Night Lab,Eye Fix,40,\"Water, Caffeine, Dimethicone\",1,1,1,1,1
";

const INGREDIENTS: &str = "\
name,what_is_it,who_should_avoid
Retino,A vitamin A derivative,\"['Pregnancy', 'Sensitive skin']\"
Glycerin,A humectant,
";

const ALLERGENS: &str = "\
product_id,allergen_name
3,Fragrance
";

struct TestApp {
    router: Router,
    _data_dir: tempfile::TempDir,
}

fn engine_from_csv() -> (RecommendationEngine, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(PRODUCTS_FILE), PRODUCTS).unwrap();
    std::fs::write(dir.path().join(INGREDIENTS_FILE), INGREDIENTS).unwrap();
    std::fs::write(dir.path().join(PRODUCT_ALLERGENS_FILE), ALLERGENS).unwrap();

    let catalog = load_catalog(dir.path()).unwrap();
    (RecommendationEngine::new(catalog, ConcernSynonyms::default()), dir)
}

fn create_test_app() -> TestApp {
    let (engine, dir) = engine_from_csv();
    let state = AppState::new(Some(engine)).with_history(Arc::new(InMemoryHistoryStore::new()));
    TestApp {
        router: create_router(state),
        _data_dir: dir,
    }
}

async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn names(body: &Value) -> Vec<String> {
    body["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app();
    let (status, body) = get(&app.router, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["products"], 6);
    assert_eq!(body["model_ready"], true);
    assert!(body["vocabulary_size"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = create_test_app();
    let id = "6f1c1c53-5a86-4b1c-9a8e-0b2f1d0c7e11";
    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", id)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.headers()["x-request-id"], id);
}

#[tokio::test]
async fn test_acne_on_oily_skin_ranks_salicylic_products_first() {
    let app = create_test_app();
    let (status, body) = get(&app.router, "/recommend?skin_type=Oily%20Skin&concerns=acne&top_n=3").await;
    assert_eq!(status, StatusCode::OK);

    let names = names(&body);
    assert_eq!(names.len(), 3);
    let mut top_two = names[..2].to_vec();
    top_two.sort();
    assert_eq!(top_two, vec!["Blemish Wash", "Spot Gel"]);

    let results = body["results"].as_array().unwrap();
    assert!(results[1]["score"].as_f64().unwrap() > results[2]["score"].as_f64().unwrap());
    assert!(results[0]["category"].is_string());
    assert!(results[0]["brand"].is_string());
}

#[tokio::test]
async fn test_results_stay_inside_filtered_set() {
    let app = create_test_app();
    let (_, body) = get(&app.router, "/api/v1/recommendations?skin_type=Dry%20Skin&concerns=acne&top_n=10").await;
    let mut names = names(&body);
    names.sort();
    assert_eq!(names, vec!["Eye Fix", "Renewal Serum", "Rich Cream"]);
}

#[tokio::test]
async fn test_unknown_skin_type_matches_no_filter() {
    let app = create_test_app();
    let (_, unfiltered) = get(&app.router, "/recommend?concerns=hydrating").await;
    let (_, unknown) = get(&app.router, "/recommend?skin_type=Unicorn%20Skin&concerns=hydrating").await;
    assert_eq!(unfiltered, unknown);
}

#[tokio::test]
async fn test_pregnancy_safe_excludes_substring_match() {
    let app = create_test_app();
    let (_, body) = get(&app.router, "/recommend?pregnancy_safe=yes&top_n=10").await;
    let names = names(&body);
    assert_eq!(names.len(), 5);
    assert!(!names.contains(&"Renewal Serum".to_string()));
}

#[tokio::test]
async fn test_allergen_exclusion() {
    let app = create_test_app();
    let (_, body) = get(&app.router, "/recommend?allergens_list=fragrance&top_n=10").await;
    assert!(!names(&body).contains(&"Rich Cream".to_string()));
}

#[tokio::test]
async fn test_product_type_filter() {
    let app = create_test_app();
    let (_, body) = get(&app.router, "/recommend?product_type=Cleanser/Eye%20cream&top_n=10").await;
    let mut names = names(&body);
    names.sort();
    assert_eq!(names, vec!["Blemish Wash", "Eye Fix"]);
}

#[tokio::test]
async fn test_top_n_handling() {
    let app = create_test_app();

    let (_, zero) = get(&app.router, "/recommend?top_n=0").await;
    assert!(names(&zero).is_empty());

    let (_, negative) = get(&app.router, "/recommend?top_n=-4").await;
    assert_eq!(names(&negative).len(), 5);

    let (_, garbage) = get(&app.router, "/recommend?top_n=many").await;
    assert_eq!(names(&garbage).len(), 5);

    let (_, missing) = get(&app.router, "/recommend").await;
    assert_eq!(names(&missing).len(), 5);
}

#[tokio::test]
async fn test_repeated_query_parameter_keeps_last_value() {
    let app = create_test_app();
    let (status, body) = get(&app.router, "/recommend?top_n=1&top_n=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body).len(), 2);
}

#[tokio::test]
async fn test_no_matches_message() {
    let app = create_test_app();
    let (status, body) = get(&app.router, "/recommend?product_type=sunscreen").await;
    assert_eq!(status, StatusCode::OK);
    assert!(names(&body).is_empty());
    assert_eq!(body["message"], "No matches found for your filters.");
}

#[tokio::test]
async fn test_recommend_is_idempotent() {
    let app = create_test_app();
    let uri = "/recommend?concerns=wrinkle,dry&skin_type=Normal";
    let (_, first) = get(&app.router, uri).await;
    let (_, second) = get(&app.router, uri).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_catalog_unavailable_returns_503() {
    let router = create_router(AppState::new(None));
    let (status, body) = get(&router, "/recommend?concerns=acne").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].is_string());

    let (status, body) = get(&router, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model_ready"], false);
    assert_eq!(body["vocabulary_size"], 0);
}

#[tokio::test]
async fn test_ingredients_listing() {
    let app = create_test_app();
    let (status, body) = get(&app.router, "/api/v1/ingredients").await;
    assert_eq!(status, StatusCode::OK);
    let ingredients = body.as_array().unwrap();
    assert_eq!(ingredients.len(), 2);
    assert_eq!(ingredients[0]["name"], "Retino");
    assert_eq!(ingredients[0]["what_is_it"], "A vitamin A derivative");
}

#[tokio::test]
async fn test_history_flow() {
    let app = create_test_app();

    get(&app.router, "/recommend?concerns=acne&user_id=alice").await;
    get(&app.router, "/recommend?concerns=dry&user_id=alice").await;
    get(&app.router, "/recommend?concerns=dry&user_id=bob").await;

    let (status, body) = get(&app.router, "/api/v1/history/alice").await;
    assert_eq!(status, StatusCode::OK);
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["request"]["concerns"][0], "dry");
    assert_eq!(entries[1]["request"]["concerns"][0], "acne");

    let id = entries[0]["id"].as_str().unwrap();
    let (status, entry) = get(&app.router, &format!("/api/v1/history/alice/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(entry["user_id"], "alice");
    assert_eq!(entry["results"].as_array().unwrap().len(), 5);

    let (status, _) = get(&app.router, &format!("/api/v1/history/bob/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_history_without_store_returns_503() {
    let (engine, _dir) = engine_from_csv();
    let router = create_router(AppState::new(Some(engine)));
    let (status, _) = get(&router, "/api/v1/history/alice").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}
