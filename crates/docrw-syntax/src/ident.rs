//! Identifier keys (spec.md §3).

/// Sentinel identifier key for the package-level doc comment.
pub const PACKAGE_IDENT: &str = "package";

/// `<type-name>.<fieldKey>`, applied recursively for nested anonymous
/// struct/interface fields.
pub fn field_ident_key(owner_type_key: &str, field_key: &str) -> String {
    format!("{owner_type_key}.{field_key}")
}
