use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumString};
use validator::Validate;

/// Internal role identifiers granted from directory group membership.
///
/// The string forms are the identifiers configured as values of the role
/// mapping, so a mapping `{"RND-Researchers": "ROLE_CHERCHEUR"}` grants
/// [`Role::Researcher`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display,
)]
pub enum Role {
    #[serde(rename = "ROLE_CHERCHEUR")]
    #[strum(serialize = "ROLE_CHERCHEUR")]
    Researcher,
    #[serde(rename = "ROLE_TESTEUR")]
    #[strum(serialize = "ROLE_TESTEUR")]
    Tester
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Researcher => "ROLE_CHERCHEUR",
            Self::Tester => "ROLE_TESTEUR"
        }
    }
}

/// Payload accepted by the gateway for one entity kind.
///
/// Every field of an input is optional on the wire: creation checks the
/// fields listed in [`EntityInput::REQUIRED_ON_CREATE`], updates only need a
/// non-empty payload. Only present fields are forwarded to the microservice.
pub trait EntityInput: Validate + Serialize + Send + Sync {
    const REQUIRED_ON_CREATE: &'static [&'static str];

    /// Names of the fields carried by this payload.
    fn present_fields(&self) -> Vec<&'static str>;

    fn missing_on_create(&self) -> Vec<&'static str> {
        let present = self.present_fields();
        Self::REQUIRED_ON_CREATE
            .iter()
            .filter(|field| !present.contains(field))
            .copied()
            .collect()
    }

    fn is_empty(&self) -> bool {
        self.present_fields().is_empty()
    }
}

fn non_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        let mut err = validator::ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}

macro_rules! present_fields {
    ($input:expr, $($field:ident => $name:literal),+ $(,)?) => {{
        let mut fields = Vec::new();
        $(
            if $input.$field.is_some() {
                fields.push($name);
            }
        )+
        fields
    }};
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Characteristic {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct CharacteristicInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 255), custom(function = "non_blank"))]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 2000))]
    pub description: Option<String>
}

impl EntityInput for CharacteristicInput {
    const REQUIRED_ON_CREATE: &'static [&'static str] = &["name"];

    fn present_fields(&self) -> Vec<&'static str> {
        present_fields!(self, name => "name", description => "description")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct IngredientInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 255), custom(function = "non_blank"))]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "non_blank"))]
    pub description: Option<String>
}

impl EntityInput for IngredientInput {
    const REQUIRED_ON_CREATE: &'static [&'static str] = &["name", "description"];

    fn present_fields(&self) -> Vec<&'static str> {
        present_fields!(self, name => "name", description => "description")
    }
}

/// A product model built from a series, ingredients and characteristics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Unit price excluding tax.
    #[serde(rename = "pUHT", default)]
    pub p_uht: Option<f64>,
    #[serde(default)]
    pub series_id: Option<i64>,
    #[serde(default)]
    pub ingredients: Vec<i64>,
    #[serde(default)]
    pub characteristics: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct ModelInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 255), custom(function = "non_blank"))]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "pUHT", default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0))]
    pub p_uht: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1))]
    pub series_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub characteristics: Option<Vec<String>>
}

impl EntityInput for ModelInput {
    const REQUIRED_ON_CREATE: &'static [&'static str] =
        &["name", "series_id", "ingredients", "characteristics"];

    fn present_fields(&self) -> Vec<&'static str> {
        present_fields!(
            self,
            name => "name",
            description => "description",
            p_uht => "pUHT",
            series_id => "series_id",
            ingredients => "ingredients",
            characteristics => "characteristics"
        )
    }
}

/// A manufacturing process. Validation is the tester's sign-off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Process {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tests: Vec<String>,
    #[serde(default)]
    pub validated: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct ProcessInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 255), custom(function = "non_blank"))]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "non_blank"))]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tests: Option<Vec<String>>
}

impl EntityInput for ProcessInput {
    const REQUIRED_ON_CREATE: &'static [&'static str] = &["name", "description", "tests"];

    fn present_fields(&self) -> Vec<&'static str> {
        present_fields!(self, name => "name", description => "description", tests => "tests")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct SeriesInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 255), custom(function = "non_blank"))]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "non_blank"))]
    pub description: Option<String>
}

impl EntityInput for SeriesInput {
    const REQUIRED_ON_CREATE: &'static [&'static str] = &["name", "description"];

    fn present_fields(&self) -> Vec<&'static str> {
        present_fields!(self, name => "name", description => "description")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_role_identifiers() {
        assert_eq!(Role::Researcher.to_string(), "ROLE_CHERCHEUR");
        assert_eq!(Role::Tester.as_str(), "ROLE_TESTEUR");
        assert_eq!(Role::from_str("ROLE_TESTEUR").unwrap(), Role::Tester);
        assert!(Role::from_str("ROLE_ADMIN").is_err());
    }

    #[test]
    fn test_missing_on_create_lists_absent_required_fields() {
        let input = ModelInput {
            name: Some("Vanilla cone".to_string()),
            ingredients: Some(vec![1, 2]),
            ..Default::default()
        };
        assert_eq!(input.missing_on_create(), vec!["series_id", "characteristics"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(ProcessInput::default().is_empty());
        let input = SeriesInput {
            description: Some("Summer range".to_string()),
            ..Default::default()
        };
        assert!(!input.is_empty());
        assert_eq!(input.missing_on_create(), vec!["name"]);
    }

    #[test]
    fn test_blank_name_fails_validation() {
        let input = CharacteristicInput {
            name: Some("   ".to_string()),
            description: None
        };
        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
    }

    #[test]
    fn test_negative_price_fails_validation() {
        let input = ModelInput {
            p_uht: Some(-1.5),
            ..Default::default()
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_partial_input_serializes_present_fields_only() {
        let input = IngredientInput {
            name: Some("Cocoa".to_string()),
            description: None
        };
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json, serde_json::json!({ "name": "Cocoa" }));
    }

    #[test]
    fn test_model_wire_format() {
        let json = serde_json::json!({
            "id": 7,
            "name": "Cone",
            "pUHT": 2.5,
            "series_id": 3,
            "ingredients": [1, 2],
            "characteristics": ["c-1"],
            "created_by": "alice"
        });
        let model: Model = serde_json::from_value(json).unwrap();
        assert_eq!(model.p_uht, Some(2.5));
        assert_eq!(model.series_id, Some(3));
        assert_eq!(model.extra.get("created_by"), Some(&Value::from("alice")));
    }
}
