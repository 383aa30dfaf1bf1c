//! Flat CSV export and import tests

mod common;

use common::hsds_set;
use hsds_schema_tools::export::{datapackage_to_csv, schemas_to_field_csv};
use hsds_schema_tools::import::{csv_to_datapackage, read_datapackage};
use hsds_schema_tools::{FileSystemStorage, MetadataTables, PackageMetadata, schemas_to_datapackage};
use tempfile::TempDir;

fn header(csv: &str) -> Vec<String> {
    csv.lines()
        .next()
        .unwrap_or_default()
        .split(',')
        .map(str::to_string)
        .collect()
}

mod metadata_table_tests {
    use super::*;

    #[test]
    fn test_datapackage_survives_csv_round_trip() {
        let package = schemas_to_datapackage(&hsds_set(), &PackageMetadata::default()).unwrap();
        let tables = datapackage_to_csv(&package).unwrap();
        let restored = csv_to_datapackage(&tables).unwrap();
        assert_eq!(restored, package);
    }

    #[test]
    fn test_table_columns() {
        let package = schemas_to_datapackage(&hsds_set(), &PackageMetadata::default()).unwrap();
        let tables = datapackage_to_csv(&package).unwrap();

        let package_columns = header(&tables.package);
        assert!(package_columns.contains(&"license.url".to_string()));
        assert_eq!(tables.package.lines().count(), 2);

        assert_eq!(header(&tables.tables)[0], "name");
        assert_eq!(tables.tables.lines().count(), 10);

        let field_columns = header(&tables.fields);
        assert_eq!(field_columns[0], "table_name");
        assert!(field_columns.contains(&"constraints.required".to_string()));
        assert!(field_columns.contains(&"constraints.enum".to_string()));

        assert_eq!(
            header(&tables.foreign_keys),
            vec!["table_name", "fields", "reference.resource", "reference.fields"]
        );
    }

    #[test]
    fn test_round_trip_through_files() {
        let temp = TempDir::new().unwrap();
        let storage = FileSystemStorage::new(temp.path());

        let package = schemas_to_datapackage(&hsds_set(), &PackageMetadata::default()).unwrap();
        storage
            .write_metadata_tables("csv", &datapackage_to_csv(&package).unwrap())
            .unwrap();
        for (file_name, _) in MetadataTables::default().files() {
            assert!(storage.exists(format!("csv/{}", file_name)));
        }

        let tables = storage.read_metadata_tables("csv").unwrap();
        let restored = csv_to_datapackage(&tables).unwrap();
        storage.write_datapackage("datapackage.json", &restored).unwrap();

        let text = storage.read_text("datapackage.json").unwrap();
        assert!(text.starts_with("{\n    \"name\": \"human_services_data\""));
        assert_eq!(read_datapackage(&text).unwrap(), package);
    }
}

mod field_csv_tests {
    use super::*;

    #[test]
    fn test_every_property_is_a_row() {
        let entities = hsds_set();
        let csv = schemas_to_field_csv(&entities).unwrap();
        let properties: usize = entities.iter().map(|entity| entity.properties().len()).sum();
        assert_eq!(csv.lines().count(), properties + 1);
    }

    #[test]
    fn test_required_flags() {
        let csv = schemas_to_field_csv(&hsds_set()).unwrap();
        let columns = header(&csv);
        let position = |name: &str| columns.iter().position(|column| column == name).unwrap();
        let required = position("constraints.required");
        let tabular = position("constraints.tabular_required");
        let table_name = position("table_name");

        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let service_rows: Vec<csv::StringRecord> = reader
            .records()
            .map(Result::unwrap)
            .filter(|record| &record[table_name] == "service")
            .collect();

        let id = &service_rows[0];
        assert_eq!(&id[required], "true");
        assert_eq!(&id[tabular], "false");

        let organization_id = &service_rows[1];
        assert_eq!(&organization_id[required], "false");
        assert_eq!(&organization_id[tabular], "true");
    }
}
