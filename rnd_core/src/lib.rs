//! # R&D Gateway Core
//!
//! Shared types and traits for the R&D gateway.
//!
//! This crate provides:
//! - The entities exchanged with the R&D microservice and their inputs
//! - The internal role identifiers used for authorization decisions
//! - The entity API traits implemented by the microservice client

pub mod traits;
pub mod types;

pub use traits::{
    ApiResult, CharacteristicsApi, FreezebeeApi, IngredientsApi, ModelsApi, ProcessApi, SeriesApi
};
pub use types::{
    Characteristic, CharacteristicInput, EntityInput, Ingredient, IngredientInput, Model,
    ModelInput, Process, ProcessInput, Role, Series, SeriesInput
};
