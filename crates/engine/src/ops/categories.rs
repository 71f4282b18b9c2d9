use chrono::Utc;
use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{Category, EngineError, ResultEngine, categories};

use super::{Engine, with_tx};

impl Engine {
    /// Creates a category for a user.
    pub async fn new_category(&self, user_id: &str, name: &str) -> ResultEngine<Category> {
        let name = normalize_category_name(name)?;
        with_tx!(self, |db_tx| {
            let category = Category::new(user_id.to_string(), name, Utc::now());
            categories::ActiveModel::from(&category).insert(&db_tx).await?;
            Ok(category)
        })
    }

    /// Returns one category of a user.
    pub async fn category(&self, user_id: &str, category_id: Uuid) -> ResultEngine<Category> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_category_owned(&db_tx, user_id, category_id)
                .await?;
            Category::try_from(model)
        })
    }

    /// Lists a user's categories, oldest first.
    pub async fn categories(&self, user_id: &str) -> ResultEngine<Vec<Category>> {
        with_tx!(self, |db_tx| {
            let models = categories::Entity::find()
                .filter(categories::Column::UserId.eq(user_id))
                .order_by_asc(categories::Column::CreatedAt)
                .all(&db_tx)
                .await?;
            models.into_iter().map(Category::try_from).collect()
        })
    }

    /// Renames a category. Rename is the only supported mutation: a category
    /// referenced by transaction items keeps its identity.
    pub async fn rename_category(
        &self,
        user_id: &str,
        category_id: Uuid,
        name: &str,
    ) -> ResultEngine<Category> {
        let name = normalize_category_name(name)?;
        with_tx!(self, |db_tx| {
            let model = self
                .require_category_owned(&db_tx, user_id, category_id)
                .await?;
            let mut category = Category::try_from(model)?;
            category.name = name;
            categories::ActiveModel::from(&category).update(&db_tx).await?;
            Ok(category)
        })
    }
}

fn normalize_category_name(name: &str) -> ResultEngine<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidAmount(
            "category name must not be empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}
