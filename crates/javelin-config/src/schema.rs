use schemars::schema::{RootSchema, Schema, SchemaObject, StringValidation};
use schemars::schema_for;

use crate::JavelinConfig;

/// Same rule as [`crate::is_qualified_name`].
const QUALIFIED_NAME_PATTERN: &str =
    r"^[\p{L}_$][\p{L}\p{N}_$]*(\.[\p{L}_$][\p{L}\p{N}_$]*)+$";

/// JSON schema for `javelin.toml`, for editor tooling and CI validation.
#[must_use]
pub fn json_schema() -> RootSchema {
    let mut schema = schema_for!(JavelinConfig);
    constrain_user_annotation_keys(&mut schema);
    schema
}

fn constrain_user_annotation_keys(schema: &mut RootSchema) {
    let Some(Schema::Object(enhancement)) = schema.definitions.get_mut("EnhancementConfig") else {
        return;
    };
    let Some(Schema::Object(user)) = enhancement.object().properties.get_mut("jsr305_user") else {
        return;
    };
    user.object().property_names = Some(Box::new(Schema::Object(SchemaObject {
        string: Some(Box::new(StringValidation {
            pattern: Some(QUALIFIED_NAME_PATTERN.to_owned()),
            ..StringValidation::default()
        })),
        ..SchemaObject::default()
    })));
}
