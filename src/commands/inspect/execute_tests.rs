//! Execute tests for inspect command.

#[cfg(test)]
mod tests {
    use super::super::InspectCmd;
    use crate::fixtures;
    use crate::schema::{DialectConfig, DialectName, RelationKind};
    use rstest::{fixture, rstest};

    crate::execute_test_fixture! {
        fixture_name: project,
        schemas: [
            ("post.json", fixtures::POST),
            ("user.json", fixtures::USER),
            ("store.json", fixtures::STORE),
        ],
    }

    // =========================================================================
    // Core functionality tests
    // =========================================================================

    crate::execute_test! {
        test_name: test_inspect_post_relations,
        fixture: project,
        cmd: InspectCmd {
            schema: "Post".to_string(),
            dialect: None,
        },
        assertions: |result| {
            assert_eq!(result.dialect, DialectConfig::Postgres);
            assert_eq!(result.naming.table, "posts");
            assert_eq!(result.referenced, vec!["User", "Tag"]);
            assert!(result.preloads.is_empty());

            let author = &result.relations[0];
            assert_eq!(author.field, "author");
            assert_eq!(author.kind, RelationKind::OneToOne);
            assert_eq!(author.foreign_key, "author_id");
            assert!(!author.eager);

            let tags = &result.relations[1];
            assert_eq!(tags.kind, RelationKind::ManyToMany);
            assert_eq!(tags.join_table.as_deref(), Some("post_tags"));
        },
    }

    crate::execute_test! {
        test_name: test_inspect_slug_is_unique,
        fixture: project,
        cmd: InspectCmd {
            schema: "post".to_string(),
            dialect: Some(DialectName::Sqlite),
        },
        assertions: |result| {
            let slug = result.fields.iter().find(|f| f.name == "slug").unwrap();
            assert!(slug.annotation.contains("uniqueIndex"));
            assert_eq!(result.search_fields, vec!["title", "body"]);
            assert!(result.artifacts.contains(&"migrations/000003_create_posts.up.sql".to_string()));
        },
    }

    crate::execute_test! {
        test_name: test_inspect_uses_declared_dialect,
        fixture: project,
        cmd: InspectCmd {
            schema: "Store".to_string(),
            dialect: None,
        },
        assertions: |result| {
            assert_eq!(result.dialect, DialectConfig::Mongodb { database: Some("retail".to_string()) });
            assert!(result.artifacts.iter().all(|a| !a.starts_with("migrations/")));
            let manager = result.fields.iter().find(|f| f.name == "manager").unwrap();
            assert_eq!(manager.go_name, "ManagerID");
        },
    }

    crate::execute_test! {
        test_name: test_inspect_eager_relation_preloads,
        fixture: project,
        cmd: InspectCmd {
            schema: "User".to_string(),
            dialect: None,
        },
        assertions: |result| {
            assert_eq!(result.preloads, vec!["Posts"]);
            assert_eq!(result.relations[0].kind, RelationKind::OneToMany);
        },
    }

    // =========================================================================
    // Error handling tests
    // =========================================================================

    crate::execute_error_test! {
        test_name: test_inspect_missing_schema,
        fixture: project,
        cmd: InspectCmd {
            schema: "Comment".to_string(),
            dialect: None,
        },
        expected: "Schema not found: Comment",
    }
}
