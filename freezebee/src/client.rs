use async_trait::async_trait;
use config::FreezebeeConfig;
use errors::ApiError;
use reqwest::{Client, RequestBuilder, StatusCode};
use rnd_core::{
    ApiResult, Characteristic, CharacteristicInput, CharacteristicsApi, Ingredient,
    IngredientInput, IngredientsApi, Model, ModelInput, ModelsApi, Process, ProcessApi,
    ProcessInput, Series, SeriesApi, SeriesInput
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Entity addressed by a request, used to build `NotFound` errors.
struct Target<'a> {
    resource: &'static str,
    id: Option<&'a str>
}

impl<'a> Target<'a> {
    fn collection(resource: &'static str) -> Self {
        Self { resource, id: None }
    }

    fn item(resource: &'static str, id: &'a str) -> Self {
        Self {
            resource,
            id: Some(id)
        }
    }
}

#[derive(Debug, Clone)]
pub struct FreezebeeClient {
    client: Client,
    base_url: String,
    api_token: Option<String>
}

impl FreezebeeClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Transport {
                reason: e.to_string()
            })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token: None
        })
    }

    pub fn from_config(config: &FreezebeeConfig) -> ApiResult<Self> {
        let client = Self::new(
            config.base_url.clone(),
            Duration::from_secs(config.timeout_seconds)
        )?;
        Ok(match &config.api_token {
            Some(token) => client.with_api_token(token.clone()),
            None => client
        })
    }

    /// Sends `Authorization: Bearer <token>` with every request.
    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!(method = %method, url = %url, "Making microservice request");

        let request = self
            .client
            .request(method, url)
            .header("Accept", "application/json");
        match &self.api_token {
            Some(token) => request.bearer_auth(token),
            None => request
        }
    }

    async fn execute(&self, request: RequestBuilder, target: Target<'_>) -> ApiResult<Vec<u8>> {
        let response = request.send().await.map_err(transport_error)?;

        match response.status() {
            status if status.is_success() => {
                let body = response.bytes().await.map_err(transport_error)?;
                Ok(body.to_vec())
            }
            StatusCode::NOT_FOUND if target.id.is_some() => {
                let id = target.id.unwrap_or_default();
                debug!(resource = target.resource, id, "Microservice reported entity missing");
                Err(ApiError::not_found(target.resource, id))
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                let message = upstream_message(status, &body);
                warn!(
                    status = status.as_u16(),
                    resource = target.resource,
                    message = %message,
                    "Microservice request failed"
                );
                Err(ApiError::Upstream {
                    status: status.as_u16(),
                    message
                })
            }
        }
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        target: Target<'_>
    ) -> ApiResult<T> {
        let body = self.execute(request, target).await?;
        serde_json::from_slice(&body).map_err(|e| ApiError::Decode {
            reason: e.to_string()
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, target: Target<'_>) -> ApiResult<T> {
        self.fetch(self.request(reqwest::Method::GET, path), target)
            .await
    }

    async fn post<T: DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
        target: Target<'_>
    ) -> ApiResult<T> {
        self.fetch(self.request(reqwest::Method::POST, path).json(body), target)
            .await
    }

    async fn put<T: DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
        target: Target<'_>
    ) -> ApiResult<T> {
        self.fetch(self.request(reqwest::Method::PUT, path).json(body), target)
            .await
    }

    async fn delete(&self, path: &str, target: Target<'_>) -> ApiResult<()> {
        self.execute(self.request(reqwest::Method::DELETE, path), target)
            .await
            .map(|_| ())
    }
}

fn transport_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::Timeout
    } else if e.is_decode() {
        ApiError::Decode {
            reason: e.to_string()
        }
    } else {
        ApiError::Transport {
            reason: e.to_string()
        }
    }
}

/// Best message for a failed response: the `message`, `detail` or `error`
/// field of a JSON body, the raw body, then the status reason.
fn upstream_message(status: StatusCode, body: &str) -> String {
    let from_json = serde_json::from_str::<Value>(body).ok().and_then(|json| {
        ["message", "detail", "error"]
            .iter()
            .find_map(|key| json.get(key).and_then(Value::as_str).map(str::to_string))
    });

    from_json
        .or_else(|| Some(body.trim().to_string()).filter(|b| !b.is_empty()))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string()
        })
}

#[async_trait]
impl CharacteristicsApi for FreezebeeClient {
    async fn list_characteristics(&self) -> ApiResult<Vec<Characteristic>> {
        self.get("/characteristics", Target::collection("characteristic"))
            .await
    }

    async fn create_characteristic(
        &self,
        input: &CharacteristicInput
    ) -> ApiResult<Characteristic> {
        self.post("/characteristics", input, Target::collection("characteristic"))
            .await
    }

    async fn update_characteristic(
        &self,
        id: &str,
        input: &CharacteristicInput
    ) -> ApiResult<Characteristic> {
        self.put(
            &format!("/characteristics/{id}"),
            input,
            Target::item("characteristic", id)
        )
        .await
    }

    async fn delete_characteristic(&self, id: &str) -> ApiResult<()> {
        self.delete(
            &format!("/characteristics/{id}"),
            Target::item("characteristic", id)
        )
        .await
    }
}

#[async_trait]
impl IngredientsApi for FreezebeeClient {
    async fn list_ingredients(&self) -> ApiResult<Vec<Ingredient>> {
        self.get("/ingredients", Target::collection("ingredient"))
            .await
    }

    async fn create_ingredient(&self, input: &IngredientInput) -> ApiResult<Ingredient> {
        self.post("/ingredients", input, Target::collection("ingredient"))
            .await
    }

    async fn update_ingredient(&self, id: i64, input: &IngredientInput) -> ApiResult<Ingredient> {
        let id = id.to_string();
        self.put(
            &format!("/ingredients/{id}"),
            input,
            Target::item("ingredient", &id)
        )
        .await
    }
}

#[async_trait]
impl ModelsApi for FreezebeeClient {
    async fn list_models(&self) -> ApiResult<Vec<Model>> {
        self.get("/models", Target::collection("model")).await
    }

    async fn get_model(&self, id: i64) -> ApiResult<Model> {
        let id = id.to_string();
        self.get(&format!("/models/{id}"), Target::item("model", &id))
            .await
    }

    async fn create_model(&self, input: &ModelInput) -> ApiResult<Model> {
        self.post("/models", input, Target::collection("model"))
            .await
    }

    async fn update_model(&self, id: i64, input: &ModelInput) -> ApiResult<Model> {
        let id = id.to_string();
        self.put(&format!("/models/{id}"), input, Target::item("model", &id))
            .await
    }

    async fn delete_model(&self, id: i64) -> ApiResult<()> {
        let id = id.to_string();
        self.delete(&format!("/models/{id}"), Target::item("model", &id))
            .await
    }
}

#[async_trait]
impl ProcessApi for FreezebeeClient {
    async fn list_processes(&self) -> ApiResult<Vec<Process>> {
        self.get("/processes", Target::collection("process"))
            .await
    }

    async fn get_process(&self, id: &str) -> ApiResult<Process> {
        self.get(&format!("/processes/{id}"), Target::item("process", id))
            .await
    }

    async fn create_process(&self, input: &ProcessInput) -> ApiResult<Process> {
        self.post("/processes", input, Target::collection("process"))
            .await
    }

    async fn update_process(&self, id: &str, input: &ProcessInput) -> ApiResult<Process> {
        self.put(
            &format!("/processes/{id}"),
            input,
            Target::item("process", id)
        )
        .await
    }

    async fn delete_process(&self, id: &str) -> ApiResult<()> {
        self.delete(&format!("/processes/{id}"), Target::item("process", id))
            .await
    }

    async fn validate_process(&self, id: &str) -> ApiResult<Process> {
        self.put(
            &format!("/processes/{id}/validate"),
            &serde_json::json!({}),
            Target::item("process", id)
        )
        .await
    }
}

#[async_trait]
impl SeriesApi for FreezebeeClient {
    async fn list_series(&self) -> ApiResult<Vec<Series>> {
        self.get("/series", Target::collection("series")).await
    }

    async fn create_series(&self, input: &SeriesInput) -> ApiResult<Series> {
        self.post("/series", input, Target::collection("series"))
            .await
    }

    async fn update_series(&self, id: i64, input: &SeriesInput) -> ApiResult<Series> {
        let id = id.to_string();
        self.put(&format!("/series/{id}"), input, Target::item("series", &id))
            .await
    }
}
