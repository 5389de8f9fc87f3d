// src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::auth_middleware;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .compact()
        .init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas públicas de autenticação
    let auth_routes = Router::new().route("/login", post(handlers::auth::login));

    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ));

    let factory_routes = Router::new()
        .route(
            "/",
            post(handlers::factories::create_factory).get(handlers::factories::list_factories),
        )
        .route("/{id}/account", get(handlers::factories::get_factory_account))
        .route(
            "/{id}/payments",
            post(handlers::factories::create_factory_payment)
                .get(handlers::factories::list_factory_payments),
        )
        .route(
            "/{factory_id}/payments/{payment_id}/void",
            put(handlers::factories::void_factory_payment),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ));

    let send_order_routes = Router::new()
        .route(
            "/",
            post(handlers::send_orders::create_send_order)
                .get(handlers::send_orders::list_send_orders),
        )
        .route(
            "/{id}",
            get(handlers::send_orders::get_send_order)
                .delete(handlers::send_orders::void_send_order),
        )
        .route("/{id}/enable", put(handlers::send_orders::enable_send_order))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ));

    let receive_order_routes = Router::new()
        .route(
            "/",
            post(handlers::receive_orders::create_receive_order)
                .get(handlers::receive_orders::list_receive_orders),
        )
        .route(
            "/{id}",
            get(handlers::receive_orders::get_receive_order)
                .delete(handlers::receive_orders::void_receive_order)
                // editar retorno é sempre 403: anula e recria
                .put(handlers::receive_orders::update_receive_order),
        )
        .route(
            "/{id}/enable",
            put(handlers::receive_orders::enable_receive_order),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ));

    let statement_routes = Router::new()
        .route("/", get(handlers::statement::get_statement))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/factories", factory_routes)
        .nest("/api/send-orders", send_order_routes)
        .nest("/api/receive-orders", receive_order_routes)
        .nest("/api/statement", statement_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .with_state(app_state);

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", addr);
    axum::serve(listener, app).await.expect("Erro no servidor Axum");
}
