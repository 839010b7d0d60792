//! Canonical cache key construction.

/// Builds a canonical string key from named fields.
///
/// Fields are sorted lexicographically by name, so two field sets that differ
/// only in ordering produce the same key. Each field is rendered as
/// `name=value` and fields are joined with `|`. Fields with duplicate names
/// keep their relative input order.
///
/// # Examples
///
/// ```
/// use strata::canonical_key;
///
/// let a = canonical_key([("user", "42"), ("region", "eu")]);
/// let b = canonical_key([("region", "eu"), ("user", "42")]);
/// assert_eq!(a, b);
/// assert_eq!(a, "region=eu|user=42");
/// ```
pub fn canonical_key<'a, I>(fields: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut fields: Vec<_> = fields.into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    let mut key = String::new();
    for (index, (name, value)) in fields.iter().enumerate() {
        if index > 0 {
            key.push('|');
        }
        key.push_str(name);
        key.push('=');
        key.push_str(value);
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_order_does_not_matter() {
        let a = canonical_key([("b", "2"), ("a", "1"), ("c", "3")]);
        let b = canonical_key([("c", "3"), ("a", "1"), ("b", "2")]);
        assert_eq!(a, b);
        assert_eq!(a, "a=1|b=2|c=3");
    }

    #[test]
    fn single_field_has_no_separator() {
        assert_eq!(canonical_key([("id", "7")]), "id=7");
    }

    #[test]
    fn empty_fields_produce_empty_key() {
        assert_eq!(canonical_key([]), "");
    }

    #[test]
    fn duplicate_names_keep_input_order() {
        assert_eq!(
            canonical_key([("tag", "x"), ("tag", "y")]),
            "tag=x|tag=y"
        );
    }
}
