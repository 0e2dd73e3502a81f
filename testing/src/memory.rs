use async_trait::async_trait;
use errors::ApiError;
use rnd_core::{
    ApiResult, Characteristic, CharacteristicInput, CharacteristicsApi, Ingredient,
    IngredientInput, IngredientsApi, Model, ModelInput, ModelsApi, Process, ProcessApi,
    ProcessInput, Series, SeriesApi, SeriesInput
};
use serde_json::Map;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

#[derive(Default)]
struct Store {
    characteristics: Vec<Characteristic>,
    ingredients: Vec<Ingredient>,
    models: Vec<Model>,
    processes: Vec<Process>,
    series: Vec<Series>
}

/// In-memory R&D microservice.
///
/// Mirrors the remote contract: unknown ids yield `ApiError::NotFound`,
/// updates only touch the fields present in the input. [`fail_with`]
/// makes every subsequent call fail with the given error.
///
/// [`fail_with`]: InMemoryFreezebee::fail_with
#[derive(Default)]
pub struct InMemoryFreezebee {
    store: RwLock<Store>,
    next_id: AtomicI64,
    failure: RwLock<Option<ApiError>>
}

impl InMemoryFreezebee {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn fail_with(&self, error: ApiError) {
        *self.failure.write().await = Some(error);
    }

    pub async fn seed_characteristic(&self, name: &str) -> Characteristic {
        self.create_characteristic(&CharacteristicInput {
            name: Some(name.to_string()),
            description: None
        })
        .await
        .unwrap_or_else(|e| panic!("seeding characteristic failed: {e}"))
    }

    pub async fn seed_process(&self, name: &str) -> Process {
        self.create_process(&ProcessInput {
            name: Some(name.to_string()),
            description: Some(format!("{name} process")),
            tests: Some(vec!["visual".to_string()])
        })
        .await
        .unwrap_or_else(|e| panic!("seeding process failed: {e}"))
    }

    pub async fn seed_model(&self, name: &str) -> Model {
        self.create_model(&ModelInput {
            name: Some(name.to_string()),
            series_id: Some(1),
            ingredients: Some(vec![1]),
            characteristics: Some(vec![]),
            ..Default::default()
        })
        .await
        .unwrap_or_else(|e| panic!("seeding model failed: {e}"))
    }

    async fn check(&self) -> ApiResult<()> {
        match self.failure.read().await.as_ref() {
            Some(error) => Err(error.clone()),
            None => Ok(())
        }
    }

    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }
}

fn text(value: Option<&String>) -> String {
    value.cloned().unwrap_or_default()
}

#[async_trait]
impl CharacteristicsApi for InMemoryFreezebee {
    async fn list_characteristics(&self) -> ApiResult<Vec<Characteristic>> {
        self.check().await?;
        Ok(self.store.read().await.characteristics.clone())
    }

    async fn create_characteristic(
        &self,
        input: &CharacteristicInput
    ) -> ApiResult<Characteristic> {
        self.check().await?;
        let characteristic = Characteristic {
            id: format!("c-{}", self.next_id()),
            name: text(input.name.as_ref()),
            description: input.description.clone(),
            extra: Map::new()
        };
        self.store
            .write()
            .await
            .characteristics
            .push(characteristic.clone());
        Ok(characteristic)
    }

    async fn update_characteristic(
        &self,
        id: &str,
        input: &CharacteristicInput
    ) -> ApiResult<Characteristic> {
        self.check().await?;
        let mut store = self.store.write().await;
        let characteristic = store
            .characteristics
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| ApiError::not_found("characteristic", id))?;
        if let Some(name) = &input.name {
            characteristic.name.clone_from(name);
        }
        if input.description.is_some() {
            characteristic.description.clone_from(&input.description);
        }
        Ok(characteristic.clone())
    }

    async fn delete_characteristic(&self, id: &str) -> ApiResult<()> {
        self.check().await?;
        let mut store = self.store.write().await;
        let before = store.characteristics.len();
        store.characteristics.retain(|c| c.id != id);
        if store.characteristics.len() == before {
            return Err(ApiError::not_found("characteristic", id));
        }
        Ok(())
    }
}

#[async_trait]
impl IngredientsApi for InMemoryFreezebee {
    async fn list_ingredients(&self) -> ApiResult<Vec<Ingredient>> {
        self.check().await?;
        Ok(self.store.read().await.ingredients.clone())
    }

    async fn create_ingredient(&self, input: &IngredientInput) -> ApiResult<Ingredient> {
        self.check().await?;
        let ingredient = Ingredient {
            id: self.next_id(),
            name: text(input.name.as_ref()),
            description: input.description.clone(),
            extra: Map::new()
        };
        self.store
            .write()
            .await
            .ingredients
            .push(ingredient.clone());
        Ok(ingredient)
    }

    async fn update_ingredient(&self, id: i64, input: &IngredientInput) -> ApiResult<Ingredient> {
        self.check().await?;
        let mut store = self.store.write().await;
        let ingredient = store
            .ingredients
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| ApiError::not_found("ingredient", id))?;
        if let Some(name) = &input.name {
            ingredient.name.clone_from(name);
        }
        if input.description.is_some() {
            ingredient.description.clone_from(&input.description);
        }
        Ok(ingredient.clone())
    }
}

#[async_trait]
impl ModelsApi for InMemoryFreezebee {
    async fn list_models(&self) -> ApiResult<Vec<Model>> {
        self.check().await?;
        Ok(self.store.read().await.models.clone())
    }

    async fn get_model(&self, id: i64) -> ApiResult<Model> {
        self.check().await?;
        self.store
            .read()
            .await
            .models
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| ApiError::not_found("model", id))
    }

    async fn create_model(&self, input: &ModelInput) -> ApiResult<Model> {
        self.check().await?;
        let model = Model {
            id: self.next_id(),
            name: text(input.name.as_ref()),
            description: input.description.clone(),
            p_uht: input.p_uht,
            series_id: input.series_id,
            ingredients: input.ingredients.clone().unwrap_or_default(),
            characteristics: input.characteristics.clone().unwrap_or_default(),
            extra: Map::new()
        };
        self.store.write().await.models.push(model.clone());
        Ok(model)
    }

    async fn update_model(&self, id: i64, input: &ModelInput) -> ApiResult<Model> {
        self.check().await?;
        let mut store = self.store.write().await;
        let model = store
            .models
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| ApiError::not_found("model", id))?;
        if let Some(name) = &input.name {
            model.name.clone_from(name);
        }
        if input.description.is_some() {
            model.description.clone_from(&input.description);
        }
        if input.p_uht.is_some() {
            model.p_uht = input.p_uht;
        }
        if input.series_id.is_some() {
            model.series_id = input.series_id;
        }
        if let Some(ingredients) = &input.ingredients {
            model.ingredients.clone_from(ingredients);
        }
        if let Some(characteristics) = &input.characteristics {
            model.characteristics.clone_from(characteristics);
        }
        Ok(model.clone())
    }

    async fn delete_model(&self, id: i64) -> ApiResult<()> {
        self.check().await?;
        let mut store = self.store.write().await;
        let before = store.models.len();
        store.models.retain(|m| m.id != id);
        if store.models.len() == before {
            return Err(ApiError::not_found("model", id));
        }
        Ok(())
    }
}

#[async_trait]
impl ProcessApi for InMemoryFreezebee {
    async fn list_processes(&self) -> ApiResult<Vec<Process>> {
        self.check().await?;
        Ok(self.store.read().await.processes.clone())
    }

    async fn get_process(&self, id: &str) -> ApiResult<Process> {
        self.check().await?;
        self.store
            .read()
            .await
            .processes
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| ApiError::not_found("process", id))
    }

    async fn create_process(&self, input: &ProcessInput) -> ApiResult<Process> {
        self.check().await?;
        let process = Process {
            id: format!("p-{}", self.next_id()),
            name: text(input.name.as_ref()),
            description: input.description.clone(),
            tests: input.tests.clone().unwrap_or_default(),
            validated: false,
            extra: Map::new()
        };
        self.store.write().await.processes.push(process.clone());
        Ok(process)
    }

    async fn update_process(&self, id: &str, input: &ProcessInput) -> ApiResult<Process> {
        self.check().await?;
        let mut store = self.store.write().await;
        let process = store
            .processes
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| ApiError::not_found("process", id))?;
        if let Some(name) = &input.name {
            process.name.clone_from(name);
        }
        if input.description.is_some() {
            process.description.clone_from(&input.description);
        }
        if let Some(tests) = &input.tests {
            process.tests.clone_from(tests);
        }
        Ok(process.clone())
    }

    async fn delete_process(&self, id: &str) -> ApiResult<()> {
        self.check().await?;
        let mut store = self.store.write().await;
        let before = store.processes.len();
        store.processes.retain(|p| p.id != id);
        if store.processes.len() == before {
            return Err(ApiError::not_found("process", id));
        }
        Ok(())
    }

    async fn validate_process(&self, id: &str) -> ApiResult<Process> {
        self.check().await?;
        let mut store = self.store.write().await;
        let process = store
            .processes
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| ApiError::not_found("process", id))?;
        process.validated = true;
        Ok(process.clone())
    }
}

#[async_trait]
impl SeriesApi for InMemoryFreezebee {
    async fn list_series(&self) -> ApiResult<Vec<Series>> {
        self.check().await?;
        Ok(self.store.read().await.series.clone())
    }

    async fn create_series(&self, input: &SeriesInput) -> ApiResult<Series> {
        self.check().await?;
        let series = Series {
            id: self.next_id(),
            name: text(input.name.as_ref()),
            description: input.description.clone(),
            extra: Map::new()
        };
        self.store.write().await.series.push(series.clone());
        Ok(series)
    }

    async fn update_series(&self, id: i64, input: &SeriesInput) -> ApiResult<Series> {
        self.check().await?;
        let mut store = self.store.write().await;
        let series = store
            .series
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| ApiError::not_found("series", id))?;
        if let Some(name) = &input.name {
            series.name.clone_from(name);
        }
        if input.description.is_some() {
            series.description.clone_from(&input.description);
        }
        Ok(series.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_update_touches_present_fields_only() {
        let api = InMemoryFreezebee::new();
        let model = api.seed_model("Cone").await;

        let updated = api
            .update_model(
                model.id,
                &ModelInput {
                    p_uht: Some(4.0),
                    ..Default::default()
                }
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Cone");
        assert_eq!(updated.p_uht, Some(4.0));
    }

    #[tokio::test]
    async fn test_unknown_ids_are_not_found() {
        let api = InMemoryFreezebee::new();
        assert!(api.get_process("p-404").await.unwrap_err().is_not_found());
        assert!(api.delete_model(404).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_fail_with() {
        let api = InMemoryFreezebee::new();
        api.fail_with(ApiError::Timeout).await;
        assert_eq!(api.list_series().await.unwrap_err(), ApiError::Timeout);
    }
}
