//! Output formatting for CLI

use hsds_schema_tools::validation::{
    EntityValidationResult, PackageValidationResult, RelationshipValidationResult,
};

/// Everything the `check` command found
pub struct CheckReport {
    pub entity_count: usize,
    pub entities: EntityValidationResult,
    pub relationships: RelationshipValidationResult,
    /// Absent when dangling references prevented building the package
    pub package: Option<PackageValidationResult>,
}

impl CheckReport {
    /// Number of problems, counting a split graph once
    pub fn issue_count(&self) -> usize {
        let split = |connected: bool| usize::from(!connected);
        self.entities.issues.len()
            + self.relationships.dangling_references.len()
            + split(self.relationships.is_connected())
            + self.package.as_ref().map_or(0, |package| {
                package.missing_targets.len() + split(package.is_connected())
            })
    }
}

fn format_components(output: &mut String, components: &[Vec<String>]) {
    output.push_str(&format!(
        "\n⚠️  Reference graph is split into {} components:\n",
        components.len()
    ));
    for component in components {
        output.push_str(&format!("  - {}\n", component.join(", ")));
    }
}

/// Human-readable `check` report
pub fn format_check_report(report: &CheckReport) -> String {
    let mut output = String::new();

    if !report.entities.issues.is_empty() {
        output.push_str("\n⚠️  Required fields:\n");
        for issue in &report.entities.issues {
            output.push_str(&format!("  - {}\n", issue));
        }
    }

    if !report.relationships.dangling_references.is_empty() {
        output.push_str("\n⚠️  Dangling references:\n");
        for reference in &report.relationships.dangling_references {
            output.push_str(&format!("  - {}\n", reference));
        }
    }
    if !report.relationships.is_connected() {
        format_components(&mut output, &report.relationships.components);
    }

    if let Some(package) = &report.package {
        if !package.missing_targets.is_empty() {
            output.push_str("\n⚠️  Foreign keys to missing resources:\n");
            for reference in &package.missing_targets {
                output.push_str(&format!("  - {}\n", reference));
            }
        }
        if !package.is_connected() {
            format_components(&mut output, &package.components);
        }
    }

    if report.issue_count() == 0 {
        output.push_str(&format!(
            "\n✅ {} entities checked, all checks passed!\n",
            report.entity_count
        ));
    } else {
        output.push_str(&format!(
            "\n❌ {} entities checked, {} issue(s) found\n",
            report.entity_count,
            report.issue_count()
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use hsds_schema_tools::validation::{DanglingReference, EntityIssue};

    #[test]
    fn test_clean_report() {
        let report = CheckReport {
            entity_count: 3,
            entities: EntityValidationResult::default(),
            relationships: RelationshipValidationResult {
                dangling_references: Vec::new(),
                components: vec![vec!["organization".to_string(), "service".to_string()]],
            },
            package: Some(PackageValidationResult::default()),
        };
        assert_eq!(report.issue_count(), 0);
        assert!(format_check_report(&report).contains("all checks passed"));
    }

    #[test]
    fn test_issues_are_listed() {
        let report = CheckReport {
            entity_count: 2,
            entities: EntityValidationResult {
                issues: vec![EntityIssue::BucketOverlap {
                    entity: "service".to_string(),
                    field: "id".to_string(),
                }],
            },
            relationships: RelationshipValidationResult {
                dangling_references: vec![DanglingReference {
                    entity: "service".to_string(),
                    property: "program".to_string(),
                    target: "program".to_string(),
                }],
                components: vec![vec!["a".to_string()], vec!["b".to_string()]],
            },
            package: None,
        };

        assert_eq!(report.issue_count(), 3);
        let text = format_check_report(&report);
        assert!(text.contains("service.id is in both required and tabular_required"));
        assert!(text.contains("service.program references unknown entity 'program'"));
        assert!(text.contains("split into 2 components"));
    }
}
