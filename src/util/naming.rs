// Type and component naming helpers

/// Last path segment of a type path, generics stripped. Accepts `::` and `.` separators.
pub fn simple_name(type_name: &str) -> &str {
    let base = type_name.split('<').next().unwrap_or(type_name);
    base.rsplit([':', '.']).next().unwrap_or(base)
}

/// Lower-case the first character unless the name starts with two upper-case
/// characters (`URLStore` stays `URLStore`)
pub fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    if chars.next().is_some_and(char::is_uppercase) && first.is_uppercase() {
        return name.to_string();
    }
    first.to_lowercase().chain(name.chars().skip(1)).collect()
}

/// Registry name for a type: its de-capitalized simple name
pub fn component_name(type_name: &str) -> String {
    decapitalize(simple_name(type_name))
}
