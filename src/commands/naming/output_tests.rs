//! Output formatting tests for naming command.

#[cfg(test)]
mod tests {
    use super::super::execute::NamingResult;
    use rstest::{fixture, rstest};

    // =========================================================================
    // Expected outputs
    // =========================================================================

    const BLOG_POST_TABLE: &str = "\
Naming: blogPost
Words: blog Post

              Singular   Plural
  PascalCase  BlogPost   BlogPosts
  camelCase   blogPost   blogPosts
  snake_case  blog_post  blog_posts
  kebab-case  blog-post  blog-posts

Table: blog_posts
Go name: BlogPost";

    // =========================================================================
    // Fixtures
    // =========================================================================

    #[fixture]
    fn blog_post() -> NamingResult {
        NamingResult::for_identifier("blogPost")
    }

    #[fixture]
    fn author_id() -> NamingResult {
        NamingResult::for_identifier("author_id")
    }

    // =========================================================================
    // Tests
    // =========================================================================

    crate::output_table_test! {
        test_name: test_to_table,
        fixture: blog_post,
        fixture_type: NamingResult,
        expected: BLOG_POST_TABLE,
    }

    crate::output_table_contains_test! {
        test_name: test_to_table_go_initialism,
        fixture: author_id,
        fixture_type: NamingResult,
        contains: ["Go name: AuthorID", "Table: author_ids"],
    }

    crate::output_json_test! {
        test_name: test_format_json,
        fixture: blog_post,
        fixture_type: NamingResult,
        assertions: {
            "identifier": "blogPost",
            "go_name": "BlogPost",
        },
    }

    #[rstest]
    fn test_format_json_nested_conventions(blog_post: NamingResult) {
        use crate::output::{OutputFormat, Outputable};
        let parsed: serde_json::Value = serde_json::from_str(&blog_post.format(OutputFormat::Json)).unwrap();
        assert_eq!(parsed["conventions"]["plural"]["kebab"], "blog-posts");
        assert_eq!(parsed["words"], serde_json::json!(["blog", "Post"]));
    }

    crate::output_toon_test! {
        test_name: test_format_toon,
        fixture: blog_post,
        fixture_type: NamingResult,
        contains: ["identifier: blogPost", "table: blog_posts"],
    }
}
