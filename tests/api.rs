use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use ndarray::{array, Array2};
use serde_json::{json, Value};
use std::collections::HashMap;
use tower::ServiceExt;

use course_recommender::config::Config;
use course_recommender::recommend::{CollaborativePredictor, Course, Recommender, SimilarityLookup};
use course_recommender::server::{build_router, AppState};

const CODES: [&str; 12] = [
    "IIC1103", "IIC2233", "IIC2133", "IIC2143", "IIC2343", "IIC2413", "IIC2513", "IIC2613",
    "MAT1610", "MAT1620", "FIS1503", "ICS1513",
];

fn recommender() -> Recommender {
    let raw = array![[5.0, 0.0, 3.0, 0.0], [4.0, 2.0, 0.0, 1.0], [0.0, 0.0, 4.0, 5.0]];
    let normalized = raw.mapv(|r| r / 5.0);
    let item_names: HashMap<String, String> = [
        ("101", "Introduccion a la Programacion"),
        ("102", "Programacion Avanzada"),
        ("103", "Estructuras de Datos"),
        ("104", "Ingenieria de Software"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    let predictor = CollaborativePredictor::new(
        vec!["ana".to_string(), "bob".to_string(), "cris".to_string()],
        vec!["101".to_string(), "102".to_string(), "103".to_string(), "104".to_string()],
        item_names,
        normalized,
        raw,
        3,
        5,
    )
    .unwrap();

    let courses = CODES
        .iter()
        .enumerate()
        .map(|(i, code)| Course {
            code: code.to_lowercase(),
            name: format!("Curso {}", i),
            area: "Ingenieria".to_string(),
        })
        .collect();
    let n = CODES.len();
    let similarity = Array2::from_shape_fn((n, n), |(i, j)| {
        if i == j {
            1.0
        } else {
            0.9 - 0.05 * (i as f64 - j as f64).abs()
        }
    });
    let lookup = SimilarityLookup::new(courses, similarity, 10).unwrap();

    Recommender::new(predictor, lookup)
}

fn app(config: Config) -> Router {
    build_router(AppState::new(config, recommender()))
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_recommend() {
    let (status, body) = post_json(app(Config::default()), "/recommend", json!({"name": "ana"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "user": "ana",
            "recommendations": [
                {"rank": 1, "name": "Ingenieria de Software", "rating": 3.0},
                {"rank": 2, "name": "Programacion Avanzada", "rating": 2.0},
            ]
        })
    );
}

#[tokio::test]
async fn test_recommend_legacy_route_and_field() {
    let (status, body) = post_json(app(Config::default()), "/recomendar", json!({"nombre": "bob"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"], "bob");
    let recs = body["recommendations"].as_array().unwrap();
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0]["name"], "Estructuras de Datos");
}

#[tokio::test]
async fn test_recommend_unknown_user() {
    let (status, body) = post_json(app(Config::default()), "/recommend", json!({"name": "zoe"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"error": "User 'zoe' not found"}));
}

#[tokio::test]
async fn test_not_found_status_code() {
    let mut config = Config::default();
    config.api.not_found_status = true;

    let (status, body) = post_json(app(config), "/similar", json!({"code": "zzz999"})).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Course 'ZZZ999' not found"}));
}

#[tokio::test]
async fn test_missing_field_is_bad_request() {
    let (status, body) = post_json(app(Config::default()), "/similar", json!({"name": "IIC2233"})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("code"));
}

#[tokio::test]
async fn test_similar() {
    let (status, body) = post_json(app(Config::default()), "/similares", json!({"sigla": "iic2233"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], "IIC2233");

    let similar = body["similar"].as_array().unwrap();
    assert_eq!(similar.len(), 10);
    assert!(similar.iter().all(|c| c["code"] != "IIC2233"));
    assert_eq!(similar[0], json!({
        "rank": 1,
        "code": "IIC1103",
        "name": "Curso 0",
        "area": "Ingenieria",
        "similarity": 85
    }));
    assert_eq!(similar[1]["code"], "IIC2133");

    let scores: Vec<u64> = similar.iter().map(|c| c["similarity"].as_u64().unwrap()).collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    assert!(scores.iter().all(|&s| s <= 100));
}

#[tokio::test]
async fn test_similar_is_idempotent() {
    let app = app(Config::default());
    let first = post_json(app.clone(), "/similar", json!({"code": "MAT1610"})).await;
    let second = post_json(app, "/similar", json!({"code": "mat1610"})).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_health() {
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = app(Config::default()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({"status": "ok", "users": 3, "items": 4, "courses": 12}));
}

#[tokio::test]
async fn test_unknown_route() {
    let request = Request::builder().uri("/nope").body(Body::empty()).unwrap();
    let response = app(Config::default()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
