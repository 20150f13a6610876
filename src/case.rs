//! Case conversion for display labels: snake_case / SCREAMING_CASE identifiers -> "Title Case".

/// Upper-case the first character, lower-case the rest.
/// e.g. "EMAIL" -> "Email", "users" -> "Users"
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => {
            let mut out = String::with_capacity(s.len());
            out.extend(first.to_uppercase());
            out.extend(chars.flat_map(|c| c.to_lowercase()));
            out
        }
        None => String::new(),
    }
}

/// Split on underscores and title-case each word.
/// e.g. "first_name" -> "First Name", "SENIOR_SPECIALIST" -> "Senior Specialist", "id" -> "Id"
pub fn to_display_name(s: &str) -> String {
    s.split('_')
        .filter(|w| !w.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names() {
        assert_eq!(to_display_name("first_name"), "First Name");
        assert_eq!(to_display_name("created_at"), "Created At");
        assert_eq!(to_display_name("VICE_PRESIDENT"), "Vice President");
        assert_eq!(to_display_name("email"), "Email");
        assert_eq!(to_display_name(""), "");
    }

    #[test]
    fn capitalize_lowers_the_tail() {
        assert_eq!(capitalize("employees"), "Employees");
        assert_eq!(capitalize("MANAGER"), "Manager");
    }
}
