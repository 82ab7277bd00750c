//! Text canonicalization for ingredient names and aliases.
//!
//! The same function runs at write time and at every comparison, so two
//! spellings that differ only in case or surrounding whitespace always
//! collide. Internal whitespace is left alone.

/// Lowercases and trims a raw name.
///
/// Idempotent: normalizing a normalized string returns it unchanged.
///
/// # Examples
///
/// ```
/// use pantry_canon::normalize;
///
/// assert_eq!(normalize("  Garlic Powder "), "garlic powder");
/// ```
#[must_use]
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Normalizes an alias list for storage under `name`.
///
/// Blank entries, duplicates and entries equal to `name` are dropped;
/// first occurrence order is kept.
#[must_use]
pub fn normalize_aliases<I, S>(name: &str, aliases: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for alias in aliases {
        let alias = normalize(alias.as_ref());
        if alias.is_empty() || alias == name || out.contains(&alias) {
            continue;
        }
        out.push(alias);
    }
    out
}

/// Normalizes an optional metadata field, mapping blanks to `None`.
#[must_use]
pub fn normalize_optional(value: Option<&str>) -> Option<String> {
    value.map(normalize).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_lowercases() {
        let cases = [
            ("  garlic  ", "garlic"),
            ("Garlic Powder", "garlic powder"),
            ("  OLIVE OIL  ", "olive oil"),
            ("", ""),
            ("   ", ""),
            ("garlic", "garlic"),
            ("\t\n garlic \n\t", "garlic"),
        ];
        for (input, want) in cases {
            assert_eq!(normalize(input), want, "input {input:?}");
        }
    }

    #[test]
    fn keeps_internal_whitespace() {
        assert_eq!(normalize(" Extra  Virgin "), "extra  virgin");
    }

    #[test]
    fn is_idempotent() {
        for raw in [" Garlic ", "JALAPEÑO", "crème fraîche", "  ", "Ǆ"] {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn lowercases_beyond_ascii() {
        assert_eq!(normalize("JALAPEÑO"), "jalapeño");
    }

    #[test]
    fn alias_list_drops_blanks_duplicates_and_name() {
        let got = normalize_aliases("garlic", [" Garlic Clove", "garlic clove", "", "GARLIC", "clove"]);
        assert_eq!(got, vec!["garlic clove".to_string(), "clove".to_string()]);
    }

    #[test]
    fn optional_blank_becomes_none() {
        assert_eq!(normalize_optional(Some("  ")), None);
        assert_eq!(normalize_optional(Some(" Produce ")), Some("produce".to_string()));
        assert_eq!(normalize_optional(None), None);
    }
}
