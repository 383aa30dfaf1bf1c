//! Compiled schema tests

mod common;

use common::hsds_set;
use hsds_schema_tools::{EntitySet, SchemaError};
use hsds_schema_tools::export::{SchemaCompiler, compile_all};
use serde_json::{Value, json};

fn output<'a>(outputs: &'a [(String, Value)], name: &str) -> &'a Value {
    &outputs
        .iter()
        .find(|(file_name, _)| file_name == name)
        .unwrap_or_else(|| panic!("{} not compiled", name))
        .1
}

mod compile_all_tests {
    use super::*;

    #[test]
    fn test_output_files() {
        let outputs = compile_all(&hsds_set()).unwrap();
        let names: Vec<&str> = outputs.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "service_with_definitions.json",
                "service.json",
                "service_list.json",
                "service_package.json",
                "organization.json",
                "organization_list.json",
                "organization_package.json",
                "service_at_location.json",
                "service_at_location_list.json",
                "service_at_location_package.json",
            ]
        );
    }

    #[test]
    fn test_service_is_fully_inlined() {
        let outputs = compile_all(&hsds_set()).unwrap();
        let service = output(&outputs, "service.json");

        assert!(!service.to_string().contains("$ref"));
        let organization = &service["properties"]["organization"];
        assert_eq!(organization["name"], "organization");
        assert_eq!(
            organization["properties"]["phones"]["items"]["properties"]["number"]["type"],
            "string"
        );

        let package = output(&outputs, "service_package.json");
        assert_eq!(package["type"], "array");
        assert_eq!(&package["items"], service);
    }

    #[test]
    fn test_list_variants_drop_arrays() {
        let outputs = compile_all(&hsds_set()).unwrap();
        let list = output(&outputs, "service_list.json");
        let properties = list["properties"].as_object().unwrap();
        assert!(properties.get("phones").is_none());
        assert!(properties.get("metadata").is_none());
        assert!(properties.get("name").is_some());
        assert!(properties["organization"]["properties"].get("locations").is_none());
        assert!(properties["organization"]["properties"].get("id").is_some());
    }

    #[test]
    fn test_organization_embeds_services() {
        let outputs = compile_all(&hsds_set()).unwrap();
        let organization = output(&outputs, "organization.json");
        let service = &organization["properties"]["services"]["items"];
        assert_eq!(service["name"], "service");
        assert_eq!(service["properties"]["organization"]["name"], "organization");

        let list = output(&outputs, "organization_list.json");
        assert!(list["properties"].get("services").is_none());
    }

    #[test]
    fn test_service_at_location_embeds_service() {
        let outputs = compile_all(&hsds_set()).unwrap();
        let service_at_location = output(&outputs, "service_at_location.json");
        let service = &service_at_location["properties"]["service"];
        assert_eq!(service["name"], "service");
        assert!(service["properties"].get("service_at_locations").is_none());
        assert!(service["properties"].get("phones").is_some());

        let list = output(&outputs, "service_at_location_list.json");
        assert!(list["properties"]["service"]["properties"].get("phones").is_none());
    }

    #[test]
    fn test_definitions_variant() {
        let outputs = compile_all(&hsds_set()).unwrap();
        let compiled = output(&outputs, "service_with_definitions.json");
        assert_eq!(
            compiled["properties"]["organization"]["$ref"],
            "#/definitions/organization"
        );
        let definitions: Vec<&String> = compiled["definitions"].as_object().unwrap().keys().collect();
        assert_eq!(definitions.len(), 8);
        assert_eq!(definitions[0], "organization");
        assert!(!definitions.contains(&&"service".to_string()));
        assert_eq!(
            compiled["definitions"]["location"]["properties"]["phones"]["items"]["$ref"],
            "#/definitions/phone"
        );
    }

    #[test]
    fn test_missing_referenced_entity() {
        let entities: Vec<_> = common::hsds_entities()
            .into_iter()
            .filter(|entity| entity.name() != "service_at_location")
            .collect();
        let entities = EntitySet::from_entities(entities).unwrap();
        let err = compile_all(&entities).unwrap_err();
        assert!(
            matches!(err, SchemaError::Reference { ref target, .. } if target == "service_at_location")
        );
    }
}

mod compiler_tests {
    use super::*;

    #[test]
    fn test_compile_detached_document() {
        let compiler = SchemaCompiler::new(&hsds_set());
        let root = json!({
            "type": "object",
            "properties": {"term": {"$ref": "taxonomy_term.json", "description": "Classification"}}
        });
        let compiled = compiler.compile(&root).unwrap();
        let term = &compiled["properties"]["term"];
        assert_eq!(term["description"], "Classification");
        assert_eq!(term["properties"]["taxonomy"]["properties"]["name"]["type"], "string");
    }
}
