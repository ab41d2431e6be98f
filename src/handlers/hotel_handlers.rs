//! HTTP handlers for listing and creating hotels.
//!
//! Both handlers are single-pass: decode, validate, store, respond. There is
//! no cross-request state and no retry logic; downstream failures surface as
//! opaque 500s after being logged by the error conversions.

use crate::{
    errors::AppError,
    models::hotel::Hotel,
    services::claims::IdTokenClaims,
    state::AppState,
};
use axum::{
    Json,
    extract::{Multipart, State},
    http::{HeaderMap, StatusCode, header},
};
use bytes::Bytes;
use chrono::Utc;
use uuid::Uuid;

const ADMIN_GROUP: &str = "Admin";

/// `GET /hotels`
///
/// Returns every hotel owned by the caller, keyed by the token's `sub` claim.
/// No pagination: the full result set comes back in one JSON array.
pub async fn list_hotels(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Hotel>>, AppError> {
    let claims = claims_from(&headers)?;
    let hotels = state.repo.list_for_user(claims.user_id()).await?;
    Ok(Json(hotels))
}

/// `POST /hotels`
///
/// Accepts a multipart form (`hotelName`, `hotelRating`, `hotelCity`,
/// `hotelPrice`, one file part), authorizes the caller against the `Admin`
/// group, writes the image to the object store and then the record to the
/// database. Authorization failure returns before any write happens.
pub async fn add_hotel(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<StatusCode, AppError> {
    let form = HotelForm::collect(multipart).await?;
    let file_key = format!("{}_{}", form.file_name, Utc::now().timestamp_millis());

    let claims = claims_from(&headers)?;
    if !claims.is_in_group(ADMIN_GROUP) {
        return Err(AppError::unauthorized_admin());
    }

    let price: i32 = form
        .price
        .parse()
        .map_err(|_| AppError::bad_request("hotelPrice must be an integer"))?;
    let rating: i32 = form
        .rating
        .parse()
        .map_err(|_| AppError::bad_request("hotelRating must be an integer"))?;

    state.store.put_object(&file_key, form.file_bytes).await?;

    let hotel = Hotel {
        user_id: claims.username().to_string(),
        id: Uuid::new_v4(),
        name: form.name,
        city_name: form.city,
        price,
        rating,
        file_name: file_key,
    };
    state.repo.insert(&hotel).await?;

    Ok(StatusCode::OK)
}

fn claims_from(headers: &HeaderMap) -> Result<IdTokenClaims, AppError> {
    let raw = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    Ok(IdTokenClaims::from_authorization(raw)?)
}

/// Fields collected from the multipart submission.
struct HotelForm {
    name: String,
    city: String,
    rating: String,
    price: String,
    file_name: String,
    file_bytes: Bytes,
}

impl HotelForm {
    /// Drain the multipart stream into named fields.
    ///
    /// Text fields are matched by name; the first part carrying a file name
    /// becomes the image, later file parts are ignored. Every field is
    /// required.
    async fn collect(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut name = None;
        let mut city = None;
        let mut rating = None;
        let mut price = None;
        let mut file: Option<(String, Bytes)> = None;

        while let Some(field) = multipart.next_field().await? {
            if let Some(file_name) = field.file_name().map(str::to_string) {
                if file.is_none() {
                    file = Some((file_name, field.bytes().await?));
                }
                continue;
            }

            let field_name = field.name().map(str::to_string);
            match field_name.as_deref() {
                Some("hotelName") => name = Some(field.text().await?),
                Some("hotelCity") => city = Some(field.text().await?),
                Some("hotelRating") => rating = Some(field.text().await?),
                Some("hotelPrice") => price = Some(field.text().await?),
                _ => {}
            }
        }

        let (file_name, file_bytes) =
            file.ok_or_else(|| AppError::bad_request("file required"))?;

        Ok(Self {
            name: require(name, "hotelName")?,
            city: require(city, "hotelCity")?,
            rating: require(rating, "hotelRating")?,
            price: require(price, "hotelPrice")?,
            file_name,
            file_bytes,
        })
    }
}

fn require(value: Option<String>, field: &str) -> Result<String, AppError> {
    value.ok_or_else(|| AppError::bad_request(format!("{field} required")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        routes::routes::routes,
        services::{hotel_repo::HotelRepo, object_store::ObjectStore},
    };
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Method, Request},
    };
    use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
    use serde_json::{Value, json};
    use sqlx::sqlite::SqlitePoolOptions;
    use std::sync::Arc;
    use tower::ServiceExt;

    const BOUNDARY: &str = "test-boundary";

    async fn test_app() -> (Router, AppState) {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::query(
            "CREATE TABLE hotels (
                user_id TEXT NOT NULL,
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                city_name TEXT NOT NULL,
                price INTEGER NOT NULL,
                rating INTEGER NOT NULL,
                file_name TEXT NOT NULL
            )",
        )
        .execute(&pool)
        .await
        .unwrap();

        let base = std::env::temp_dir().join(format!("hotel-api-handlers-{}", Uuid::new_v4()));
        let state = AppState::new(
            HotelRepo::new(Arc::new(pool)),
            ObjectStore::new(base, "hotel-images").unwrap(),
        );
        (routes().with_state(state.clone()), state)
    }

    fn bearer(payload: Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(payload.to_string().as_bytes());
        format!("Bearer {header}.{body}.signature")
    }

    fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some((file_name, bytes)) = file {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: image/jpeg\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn post_hotel(body: Vec<u8>, token: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/hotels")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .header(header::AUTHORIZATION, token)
            .body(Body::from(body))
            .unwrap()
    }

    fn standard_fields() -> Vec<(&'static str, &'static str)> {
        vec![
            ("hotelName", "Grand"),
            ("hotelRating", "5"),
            ("hotelCity", "Paris"),
            ("hotelPrice", "200"),
        ]
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn admin_upload_creates_record_and_object() {
        let (app, state) = test_app().await;
        let token = bearer(json!({
            "cognito:groups": ["Admin"],
            "cognito:username": "bob",
        }));
        let body = multipart_body(&standard_fields(), Some(("photo.jpg", b"jpeg bytes")));

        let response = app.oneshot(post_hotel(body, &token)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let hotels = state.repo.list_for_user("bob").await.unwrap();
        assert_eq!(hotels.len(), 1);
        let hotel = &hotels[0];
        assert_eq!(hotel.user_id, "bob");
        assert_eq!(hotel.name, "Grand");
        assert_eq!(hotel.city_name, "Paris");
        assert_eq!(hotel.price, 200);
        assert_eq!(hotel.rating, 5);
        assert!(hotel.file_name.starts_with("photo.jpg_"));

        let stored = tokio::fs::read(state.store.bucket_root().join(&hotel.file_name))
            .await
            .unwrap();
        assert_eq!(stored, b"jpeg bytes");
    }

    #[tokio::test]
    async fn non_admin_gets_401_and_no_writes_happen() {
        let (app, state) = test_app().await;
        let token = bearer(json!({
            "cognito:groups": ["Users"],
            "cognito:username": "mallory",
        }));
        let body = multipart_body(&standard_fields(), Some(("photo.jpg", b"jpeg bytes")));

        let response = app.oneshot(post_hotel(body, &token)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_json(response).await,
            json!({ "Error": "Unauthorized. Must be a member of Admin group." })
        );

        assert!(state.repo.list_for_user("mallory").await.unwrap().is_empty());
        assert!(!state.store.bucket_root().exists());
    }

    #[tokio::test]
    async fn missing_group_claim_gets_401() {
        let (app, _state) = test_app().await;
        let token = bearer(json!({ "cognito:username": "bob" }));
        let body = multipart_body(&standard_fields(), Some(("photo.jpg", b"x")));

        let response = app.oneshot(post_hotel(body, &token)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn missing_file_is_a_400() {
        let (app, state) = test_app().await;
        let token = bearer(json!({
            "cognito:groups": ["Admin"],
            "cognito:username": "bob",
        }));
        let body = multipart_body(&standard_fields(), None);

        let response = app.oneshot(post_hotel(body, &token)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["Error"], "file required");
        assert!(state.repo.list_for_user("bob").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn non_numeric_price_is_a_400_with_no_writes() {
        let (app, state) = test_app().await;
        let token = bearer(json!({
            "cognito:groups": ["Admin"],
            "cognito:username": "bob",
        }));
        let fields = vec![
            ("hotelName", "Grand"),
            ("hotelRating", "5"),
            ("hotelCity", "Paris"),
            ("hotelPrice", "abc"),
        ];
        let body = multipart_body(&fields, Some(("photo.jpg", b"x")));

        let response = app.oneshot(post_hotel(body, &token)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        assert!(state.repo.list_for_user("bob").await.unwrap().is_empty());
        assert!(!state.store.bucket_root().exists());
    }

    #[tokio::test]
    async fn malformed_token_is_a_400() {
        let (app, _state) = test_app().await;
        let body = multipart_body(&standard_fields(), Some(("photo.jpg", b"x")));

        let response = app
            .oneshot(post_hotel(body, "Bearer not-a-jwt"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn list_returns_only_the_callers_hotels() {
        let (app, state) = test_app().await;
        state
            .repo
            .insert(&Hotel {
                user_id: "alice".into(),
                id: Uuid::new_v4(),
                name: "Grand".into(),
                city_name: "Paris".into(),
                price: 200,
                rating: 5,
                file_name: "photo.jpg_1".into(),
            })
            .await
            .unwrap();
        state
            .repo
            .insert(&Hotel {
                user_id: "carol".into(),
                id: Uuid::new_v4(),
                name: "Ritz".into(),
                city_name: "London".into(),
                price: 900,
                rating: 5,
                file_name: "ritz.jpg_1".into(),
            })
            .await
            .unwrap();

        let token = bearer(json!({ "sub": "alice" }));
        let request = Request::builder()
            .method(Method::GET)
            .uri("/hotels")
            .header(header::AUTHORIZATION, token)
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let hotels = body_json(response).await;
        let hotels = hotels.as_array().unwrap();
        assert_eq!(hotels.len(), 1);
        assert_eq!(hotels[0]["UserId"], "alice");
        assert_eq!(hotels[0]["Name"], "Grand");
    }

    #[tokio::test]
    async fn list_without_token_uses_default_identity() {
        let (app, state) = test_app().await;
        state
            .repo
            .insert(&Hotel {
                user_id: "defaultUserId".into(),
                id: Uuid::new_v4(),
                name: "Fallback Inn".into(),
                city_name: "Nowhere".into(),
                price: 1,
                rating: 1,
                file_name: "f.jpg_1".into(),
            })
            .await
            .unwrap();

        let request = Request::builder()
            .method(Method::GET)
            .uri("/hotels")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let hotels = body_json(response).await;
        assert_eq!(hotels.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn created_hotel_round_trips_through_list() {
        let (app, _state) = test_app().await;
        let token = bearer(json!({
            "sub": "alice-sub",
            "cognito:groups": ["Admin"],
            "cognito:username": "alice",
        }));
        let body = multipart_body(&standard_fields(), Some(("photo.jpg", b"jpeg")));

        let response = app
            .clone()
            .oneshot(post_hotel(body, &token))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Listing partitions on `sub`; records are owned by the username.
        let list_token = bearer(json!({ "sub": "alice" }));
        let request = Request::builder()
            .method(Method::GET)
            .uri("/hotels")
            .header(header::AUTHORIZATION, list_token)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        let hotels = body_json(response).await;
        let hotels = hotels.as_array().unwrap();
        assert_eq!(hotels.len(), 1);
        assert_eq!(hotels[0]["UserId"], "alice");
        assert!(hotels[0]["FileName"]
            .as_str()
            .unwrap()
            .starts_with("photo.jpg_"));
    }
}
