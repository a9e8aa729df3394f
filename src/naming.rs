//! Identifier case conversion for generated Go code and output file names.

/// Convert an entity or property name to `snake_case`.
///
/// Handles camelCase, PascalCase, kebab-case and space separated words.
/// Any character that is not ASCII alphanumeric becomes a word boundary.
///
/// ```
/// use restprovider::naming::to_snake_case;
/// assert_eq!(to_snake_case("petStore"), "pet_store");
/// assert_eq!(to_snake_case("Pet Store"), "pet_store");
/// assert_eq!(to_snake_case("HTTPHeader"), "http_header");
/// ```
pub fn to_snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if !c.is_ascii_alphanumeric() {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            continue;
        }
        if c.is_ascii_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            let boundary = prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_is_lower);
            if boundary && !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
        }
        out.push(c.to_ascii_lowercase());
    }
    out.trim_end_matches('_').to_string()
}

/// Convert a name to `PascalCase` by way of its snake form.
pub fn to_pascal_case(s: &str) -> String {
    to_snake_case(s)
        .split('_')
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// Convert a name to `camelCase`.
pub fn to_lower_camel_case(s: &str) -> String {
    let pascal = to_pascal_case(s);
    let mut chars = pascal.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Convert a name to `kebab-case`.
pub fn to_kebab_case(s: &str) -> String {
    to_snake_case(s).replace('_', "-")
}

/// Make a snake-case name usable as a Go identifier.
///
/// Leading digits get an underscore prefix; an empty name becomes `_`.
pub fn sanitize_identifier(name: &str) -> String {
    let mut s = name.to_string();
    if s.is_empty() {
        s = "_".to_string();
    }
    if s.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        s.insert(0, '_');
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_case_variants() {
        assert_eq!(to_snake_case("pet"), "pet");
        assert_eq!(to_snake_case("petId"), "pet_id");
        assert_eq!(to_snake_case("PetStore"), "pet_store");
        assert_eq!(to_snake_case("pet-store"), "pet_store");
        assert_eq!(to_snake_case("store order"), "store_order");
        assert_eq!(to_snake_case("photoURLs"), "photo_ur_ls");
        assert_eq!(to_snake_case("already_snake"), "already_snake");
        assert_eq!(to_snake_case("Swagger Petstore - OpenAPI 3.1"), "swagger_petstore_open_api_3_1");
    }

    #[test]
    fn test_pascal_and_camel() {
        assert_eq!(to_pascal_case("pet_id"), "PetId");
        assert_eq!(to_pascal_case("photoUrls"), "PhotoUrls");
        assert_eq!(to_lower_camel_case("store_order"), "storeOrder");
        assert_eq!(to_kebab_case("PetStore"), "pet-store");
    }

    #[test]
    fn test_sanitize_identifier() {
        assert_eq!(sanitize_identifier("3d"), "_3d");
        assert_eq!(sanitize_identifier(""), "_");
        assert_eq!(sanitize_identifier("name"), "name");
    }
}
