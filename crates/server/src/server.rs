use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use std::sync::Arc;

use crate::{categories, debts, transactions};
use engine::{Engine, users};

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub db: DatabaseConnection,
}

async fn auth(
    auth_header: TypedHeader<Authorization<Basic>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if auth_header.username().is_empty() || auth_header.password().is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let user: Option<users::Model> = users::Entity::find()
        .filter(users::Column::Username.eq(auth_header.username()))
        .filter(users::Column::Password.eq(auth_header.password()))
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let Some(user) = user else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route(
            "/categories",
            post(categories::create).get(categories::list),
        )
        .route(
            "/categories/{id}",
            get(categories::get).patch(categories::update),
        )
        .route(
            "/transactions",
            post(transactions::create).get(transactions::list),
        )
        .route(
            "/transactions/{id}",
            get(transactions::get)
                .patch(transactions::update)
                .delete(transactions::delete),
        )
        .route("/debts", post(debts::create).get(debts::list))
        .route(
            "/debts/{id}",
            get(debts::get).patch(debts::update).delete(debts::delete),
        )
        .route("/debts/{id}/payments", post(debts::register_payment))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .with_state(state)
}

pub async fn run(engine: Engine, db: DatabaseConnection) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, db, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        db,
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, db, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::{Request as HttpRequest, header};
    use http_body_util::BodyExt;
    use migration::MigratorTrait;
    use sea_orm::{ConnectionTrait, Database, Statement};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    // "alice:password"
    const BASIC_AUTH: &str = "Basic YWxpY2U6cGFzc3dvcmQ=";

    async fn test_router() -> Router {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();
        let backend = db.get_database_backend();
        db.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO users (username, password) VALUES (?, ?)",
            vec!["alice".into(), "password".into()],
        ))
        .await
        .unwrap();

        let engine = Engine::builder().database(db.clone()).build().await.unwrap();
        router(ServerState {
            engine: Arc::new(engine),
            db,
        })
    }

    fn request(method: &str, uri: &str, body: Option<Value>) -> HttpRequest<Body> {
        let builder = HttpRequest::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, BASIC_AUTH);
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn requests_without_credentials_are_unauthorized() {
        let router = test_router().await;

        let response = router
            .oneshot(
                HttpRequest::builder()
                    .method("GET")
                    .uri("/categories")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn credit_sale_round_trip_over_http() {
        let router = test_router().await;

        let response = router
            .clone()
            .oneshot(request(
                "POST",
                "/categories",
                Some(json!({"name": "Groceries"})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let category = json_body(response).await;
        let category_id = category["id"].as_str().unwrap().to_string();

        let response = router
            .clone()
            .oneshot(request(
                "POST",
                "/transactions",
                Some(json!({
                    "kind": "INCOME",
                    "items": [{"category_id": category_id, "amount_minor": 5000}],
                    "credit": {
                        "customer_first_name": "Ana",
                        "customer_last_name": "Lopez",
                        "customer_phone": "555-0100",
                        "customer_document_number": "12345"
                    }
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let tx = json_body(response).await;
        assert_eq!(tx["amount_minor"], 5000);
        assert_eq!(tx["debt_amount_minor"], 5000);
        assert_eq!(tx["counterparty"]["document_number"], "12345");

        let response = router
            .clone()
            .oneshot(request("GET", "/debts", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let debts = json_body(response).await;
        assert_eq!(debts.as_array().unwrap().len(), 1);
        assert_eq!(debts[0]["total_minor"], 5000);
        assert_eq!(debts[0]["status"], "pending");

        let debt_id = debts[0]["id"].as_str().unwrap().to_string();
        let response = router
            .clone()
            .oneshot(request(
                "POST",
                &format!("/debts/{debt_id}/payments"),
                Some(json!({"amount_minor": 2000})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let debt = json_body(response).await;
        assert_eq!(debt["paid_minor"], 2000);
        assert_eq!(debt["remaining_minor"], 3000);
        assert_eq!(debt["status"], "partial");
    }

    #[tokio::test]
    async fn unknown_kind_is_unprocessable() {
        let router = test_router().await;

        let response = router
            .clone()
            .oneshot(request(
                "POST",
                "/categories",
                Some(json!({"name": "Misc"})),
            ))
            .await
            .unwrap();
        let category = json_body(response).await;
        let category_id = category["id"].as_str().unwrap().to_string();

        let response = router
            .oneshot(request(
                "POST",
                "/transactions",
                Some(json!({
                    "kind": "transfer",
                    "items": [{"category_id": category_id, "amount_minor": 100}]
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
