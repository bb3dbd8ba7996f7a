//! Type, constraint and relation lowering.
//!
//! All three passes are pure. The type table is exposed on its own so an API
//! documentation generator can reuse the interchange mapping without going
//! through emission.

mod constraints;
mod relations;
mod types;

pub use constraints::{
    FORMAT_PATTERNS, LoweredConstraints, lower_constraints, pattern_var, validation_statements,
};
pub(crate) use constraints::{format_number, go_string_literal};
pub use relations::{
    ResolvedRelation, ResolvedRelations, default_foreign_key, relation_kind_hint, resolve_relations,
};
pub use types::{
    GEO_COMPONENTS, InterchangeType, Primitive, TypeLowering, example_value, interchange_type,
    lower_type, lower_type_sized, primitive, storage_type,
};
