// src/services/factory_service.rs

use crate::{
    common::error::AppError,
    db::FactoryRepository,
    models::factory::{CreateFactoryPayload, Factory, FactoryStatus},
};

#[derive(Clone)]
pub struct FactoryService {
    factory_repo: FactoryRepository,
}

impl FactoryService {
    pub fn new(factory_repo: FactoryRepository) -> Self {
        Self { factory_repo }
    }

    // A conta corrente (balance/debt) nasce zerada junto com a facção.
    pub async fn create_factory(
        &self,
        org_id: i64,
        created_by: i64,
        payload: &CreateFactoryPayload,
    ) -> Result<Factory, AppError> {
        self.factory_repo.create(org_id, payload, created_by).await
    }

    pub async fn list_factories(
        &self,
        org_id: i64,
        only_created_by: Option<i64>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Factory>, AppError> {
        self.factory_repo
            .list(org_id, only_created_by, limit, offset)
            .await
    }

    pub async fn get_account(&self, org_id: i64, factory_id: i64) -> Result<FactoryStatus, AppError> {
        let factory = self
            .factory_repo
            .find_by_id(org_id, factory_id)
            .await?
            .ok_or(AppError::FactoryNotFound)?;

        Ok(FactoryStatus {
            balance: factory.balance,
            debt: factory.debt,
        })
    }
}
