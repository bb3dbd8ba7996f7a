//! Identifier segmentation and case rendering.
//!
//! Every identifier is split into a word list once; each casing is a pure
//! function over that list, so conversions commute:
//! `snake(pascal(x)) == snake(x)` for ordinary identifiers.
//!
//! | Casing | `blogPost` | `HTTPServer` |
//! |--------|------------|--------------|
//! | Pascal | BlogPost | HttpServer |
//! | camel | blogPost | httpServer |
//! | snake | blog_post | http_server |
//! | kebab | blog-post | http-server |

mod plural;

pub use plural::{pluralize, singularize};

use serde::Serialize;

/// One name rendered in every supported casing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CaseForms {
    pub pascal: String,
    pub camel: String,
    pub snake: String,
    pub kebab: String,
}

impl CaseForms {
    pub fn from_words(words: &[String]) -> Self {
        Self {
            pascal: pascal_case(words),
            camel: camel_case(words),
            snake: snake_case(words),
            kebab: kebab_case(words),
        }
    }
}

/// Singular and plural renderings of an identifier plus its storage name.
///
/// Computed once per schema and per field; a rename means calling
/// [`normalize`] again.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NamingConventions {
    pub singular: CaseForms,
    pub plural: CaseForms,
    /// Table or collection name (plural snake_case).
    pub table: String,
}

impl NamingConventions {
    pub fn is_empty(&self) -> bool {
        self.singular.snake.is_empty()
    }
}

/// Normalize an arbitrary identifier into all naming variants.
///
/// Total over any input; an empty or separator-only identifier yields empty
/// conventions.
pub fn normalize(identifier: &str) -> NamingConventions {
    let words = split_words(identifier);
    if words.is_empty() {
        return NamingConventions::default();
    }

    let singular = CaseForms::from_words(&words);
    let plural_snake = pluralize(&singular.snake);
    let plural_words: Vec<String> = plural_snake
        .split('_')
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect();
    let plural = CaseForms::from_words(&plural_words);

    NamingConventions {
        table: plural.snake.clone(),
        singular,
        plural,
    }
}

/// Split an identifier into words.
///
/// Separators (`_`, `-`, whitespace) collapse to a single break. A boundary is
/// also inserted between a lowercase letter and a following uppercase letter,
/// and before the last capital of an uppercase run that is followed by a
/// lowercase letter (`HTTPServer` -> `HTTP`, `Server`).
pub fn split_words(identifier: &str) -> Vec<String> {
    let mut words = Vec::new();

    for chunk in identifier.split(|c: char| c == '_' || c == '-' || c.is_whitespace()) {
        if chunk.is_empty() {
            continue;
        }

        let chars: Vec<char> = chunk.chars().collect();
        let mut current = String::new();

        for (i, &c) in chars.iter().enumerate() {
            if i > 0 && !current.is_empty() {
                let prev = chars[i - 1];
                let lower_to_upper = prev.is_lowercase() && c.is_uppercase();
                let acronym_end = c.is_uppercase()
                    && prev.is_uppercase()
                    && chars.get(i + 1).is_some_and(|next| next.is_lowercase());

                if lower_to_upper || acronym_end {
                    words.push(std::mem::take(&mut current));
                }
            }
            current.push(c);
        }

        if !current.is_empty() {
            words.push(current);
        }
    }

    words
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

pub fn pascal_case(words: &[String]) -> String {
    words.iter().map(|w| title_case(w)).collect()
}

/// Words rendered fully upper-case in Go identifiers.
const GO_INITIALISMS: &[&str] = &[
    "api", "html", "http", "https", "id", "ip", "json", "sql", "ssh", "uri", "url", "uuid", "xml",
];

/// Exported Go identifier for a name: PascalCase with Go initialisms
/// upper-cased (`author_id` -> `AuthorID`, `image_url` -> `ImageURL`).
pub fn go_identifier(identifier: &str) -> String {
    split_words(identifier)
        .iter()
        .map(|w| {
            let lower = w.to_lowercase();
            if GO_INITIALISMS.contains(&lower.as_str()) {
                lower.to_uppercase()
            } else {
                title_case(w)
            }
        })
        .collect()
}

pub fn camel_case(words: &[String]) -> String {
    let pascal = pascal_case(words);
    let mut chars = pascal.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn snake_case(words: &[String]) -> String {
    words
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

pub fn kebab_case(words: &[String]) -> String {
    words
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("blogPost", &["blog", "Post"])]
    #[case("BlogPost", &["Blog", "Post"])]
    #[case("blog_post", &["blog", "post"])]
    #[case("blog-post", &["blog", "post"])]
    #[case("blog  post", &["blog", "post"])]
    #[case("__blog--post__", &["blog", "post"])]
    #[case("HTTPServer", &["HTTP", "Server"])]
    #[case("parseJSONBody", &["parse", "JSON", "Body"])]
    #[case("userID", &["user", "ID"])]
    #[case("ID", &["ID"])]
    fn test_split_words(#[case] input: &str, #[case] expected: &[&str]) {
        assert_eq!(split_words(input), expected);
    }

    #[rstest]
    fn test_split_words_empty() {
        assert!(split_words("").is_empty());
        assert!(split_words(" _- ").is_empty());
    }

    #[rstest]
    fn test_normalize_all_casings() {
        let names = normalize("blogPost");
        assert_eq!(names.singular.pascal, "BlogPost");
        assert_eq!(names.singular.camel, "blogPost");
        assert_eq!(names.singular.snake, "blog_post");
        assert_eq!(names.singular.kebab, "blog-post");
        assert_eq!(names.plural.pascal, "BlogPosts");
        assert_eq!(names.plural.camel, "blogPosts");
        assert_eq!(names.plural.snake, "blog_posts");
        assert_eq!(names.plural.kebab, "blog-posts");
        assert_eq!(names.table, "blog_posts");
    }

    #[rstest]
    fn test_normalize_acronym() {
        let names = normalize("HTTPServer");
        assert_eq!(names.singular.pascal, "HttpServer");
        assert_eq!(names.singular.snake, "http_server");
        assert_eq!(names.plural.pascal, "HttpServers");
    }

    #[rstest]
    fn test_normalize_irregular_plural() {
        let names = normalize("Child");
        assert_eq!(names.plural.pascal, "Children");
        assert_eq!(names.table, "children");
    }

    #[rstest]
    fn test_normalize_empty_is_empty() {
        let names = normalize("");
        assert!(names.is_empty());
        assert_eq!(names, NamingConventions::default());
    }

    #[rstest]
    #[case("blogPost")]
    #[case("HTTPServer")]
    #[case("user_profile_image")]
    #[case("order-line-item")]
    #[case("XMLHttpRequest")]
    #[case("category")]
    fn test_snake_of_pascal_round_trip(#[case] input: &str) {
        let words = split_words(input);
        let pascal = pascal_case(&words);
        assert_eq!(snake_case(&split_words(&pascal)), snake_case(&words));
    }

    #[rstest]
    #[case("author_id", "AuthorID")]
    #[case("image_url", "ImageURL")]
    #[case("apiKey", "APIKey")]
    #[case("title", "Title")]
    #[case("identity", "Identity")]
    fn test_go_identifier(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(go_identifier(input), expected);
    }

    #[rstest]
    fn test_camel_lowercases_only_first_char() {
        let words = split_words("api_key");
        assert_eq!(camel_case(&words), "apiKey");
    }
}
