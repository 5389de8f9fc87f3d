// src/config.rs

use std::{env, sync::Arc, time::Duration};

use sqlx::{mysql::MySqlPoolOptions, MySqlPool};

use crate::{
    common::i18n::I18nStore,
    db::{
        FactoryRepository, OrderRepository, PaymentRepository, StatementRepository, UserRepository,
    },
    services::{AuthService, FactoryService, OrderService, PaymentService, StatementService},
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: MySqlPool,
    pub i18n_store: Arc<I18nStore>,
    pub auth_service: AuthService,
    pub factory_service: FactoryService,
    pub order_service: OrderService,
    pub payment_service: PaymentService,
    pub statement_service: StatementService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        // Pool dimensionado por ambiente via variáveis; o timeout de 60s é o
        // limite de espera por uma conexão livre, não de execução de query.
        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10);
        let acquire_timeout_secs = env::var("DB_ACQUIRE_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(60);

        let db_pool = MySqlPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(acquire_timeout_secs))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let factory_repo = FactoryRepository::new(db_pool.clone());
        let order_repo = OrderRepository::new(db_pool.clone());
        let payment_repo = PaymentRepository::new(db_pool.clone());
        let statement_repo = StatementRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo, jwt_secret);
        let factory_service = FactoryService::new(factory_repo.clone());
        let payment_service =
            PaymentService::new(payment_repo, factory_repo.clone(), db_pool.clone());
        let order_service = OrderService::new(
            order_repo,
            factory_repo.clone(),
            payment_service.clone(),
            db_pool.clone(),
        );
        let statement_service = StatementService::new(statement_repo, factory_repo);

        Ok(Self {
            db_pool,
            i18n_store: Arc::new(I18nStore::new()),
            auth_service,
            factory_service,
            order_service,
            payment_service,
            statement_service,
        })
    }
}
