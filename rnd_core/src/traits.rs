use async_trait::async_trait;
use errors::ApiError;

use crate::types::{
    Characteristic, CharacteristicInput, Ingredient, IngredientInput, Model, ModelInput, Process,
    ProcessInput, Series, SeriesInput
};

pub type ApiResult<T> = Result<T, ApiError>;

#[async_trait]
pub trait CharacteristicsApi: Send + Sync {
    async fn list_characteristics(&self) -> ApiResult<Vec<Characteristic>>;

    async fn create_characteristic(&self, input: &CharacteristicInput)
    -> ApiResult<Characteristic>;

    async fn update_characteristic(
        &self,
        id: &str,
        input: &CharacteristicInput
    ) -> ApiResult<Characteristic>;

    async fn delete_characteristic(&self, id: &str) -> ApiResult<()>;

    /// The microservice has no by-id read for characteristics, so the
    /// collection is fetched and searched.
    async fn find_characteristic(&self, id: &str) -> ApiResult<Characteristic> {
        self.list_characteristics()
            .await?
            .into_iter()
            .find(|characteristic| characteristic.id == id)
            .ok_or_else(|| ApiError::not_found("characteristic", id))
    }
}

#[async_trait]
pub trait IngredientsApi: Send + Sync {
    async fn list_ingredients(&self) -> ApiResult<Vec<Ingredient>>;

    async fn create_ingredient(&self, input: &IngredientInput) -> ApiResult<Ingredient>;

    async fn update_ingredient(&self, id: i64, input: &IngredientInput) -> ApiResult<Ingredient>;
}

#[async_trait]
pub trait ModelsApi: Send + Sync {
    async fn list_models(&self) -> ApiResult<Vec<Model>>;

    async fn get_model(&self, id: i64) -> ApiResult<Model>;

    async fn create_model(&self, input: &ModelInput) -> ApiResult<Model>;

    async fn update_model(&self, id: i64, input: &ModelInput) -> ApiResult<Model>;

    async fn delete_model(&self, id: i64) -> ApiResult<()>;
}

#[async_trait]
pub trait ProcessApi: Send + Sync {
    async fn list_processes(&self) -> ApiResult<Vec<Process>>;

    async fn get_process(&self, id: &str) -> ApiResult<Process>;

    async fn create_process(&self, input: &ProcessInput) -> ApiResult<Process>;

    async fn update_process(&self, id: &str, input: &ProcessInput) -> ApiResult<Process>;

    async fn delete_process(&self, id: &str) -> ApiResult<()>;

    /// Marks the process as validated by a tester.
    async fn validate_process(&self, id: &str) -> ApiResult<Process>;
}

#[async_trait]
pub trait SeriesApi: Send + Sync {
    async fn list_series(&self) -> ApiResult<Vec<Series>>;

    async fn create_series(&self, input: &SeriesInput) -> ApiResult<Series>;

    async fn update_series(&self, id: i64, input: &SeriesInput) -> ApiResult<Series>;
}

/// The complete R&D microservice surface used by the gateway.
pub trait FreezebeeApi:
    CharacteristicsApi + IngredientsApi + ModelsApi + ProcessApi + SeriesApi
{
}

impl<T> FreezebeeApi for T where
    T: CharacteristicsApi + IngredientsApi + ModelsApi + ProcessApi + SeriesApi
{
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    struct FixedCharacteristics(Vec<Characteristic>);

    #[async_trait]
    impl CharacteristicsApi for FixedCharacteristics {
        async fn list_characteristics(&self) -> ApiResult<Vec<Characteristic>> {
            Ok(self.0.clone())
        }

        async fn create_characteristic(
            &self,
            _input: &CharacteristicInput
        ) -> ApiResult<Characteristic> {
            unimplemented!()
        }

        async fn update_characteristic(
            &self,
            _id: &str,
            _input: &CharacteristicInput
        ) -> ApiResult<Characteristic> {
            unimplemented!()
        }

        async fn delete_characteristic(&self, _id: &str) -> ApiResult<()> {
            unimplemented!()
        }
    }

    fn characteristic(id: &str, name: &str) -> Characteristic {
        Characteristic {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            extra: Map::new()
        }
    }

    #[tokio::test]
    async fn test_find_characteristic_filters_collection() {
        let api = FixedCharacteristics(vec![
            characteristic("c-1", "Creamy"),
            characteristic("c-2", "Crunchy"),
        ]);

        let found = api.find_characteristic("c-2").await.unwrap();
        assert_eq!(found.name, "Crunchy");
    }

    #[tokio::test]
    async fn test_find_characteristic_not_found() {
        let api = FixedCharacteristics(vec![characteristic("c-1", "Creamy")]);

        let err = api.find_characteristic("c-9").await.unwrap_err();
        assert_eq!(err, ApiError::not_found("characteristic", "c-9"));
    }
}
