//! Naming helpers for converted countries and colonies.

use encoding_rs::WINDOWS_1252;

/// English ordinal suffix for `n`: 1 → "st", 2 → "nd", 3 → "rd", 11 → "th".
pub fn ordinal_suffix(n: i32) -> &'static str {
    let n = n.unsigned_abs();
    if (11..=13).contains(&(n % 100)) {
        return "th";
    }
    match n % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

/// Lookup key for a colonial flag name.
///
/// Victoria 2 reads its files as Windows-1252; characters outside that
/// codepage come out as `?`. The result is lowercased.
pub fn flag_key(name: &str) -> String {
    let mut buf = [0u8; 4];
    name.chars()
        .map(|c| {
            let (_, _, unmappable) = WINDOWS_1252.encode(c.encode_utf8(&mut buf));
            if unmappable { '?' } else { c }
        })
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_ordinal_suffix() {
        let cases = [
            (1, "st"),
            (2, "nd"),
            (3, "rd"),
            (4, "th"),
            (11, "th"),
            (12, "th"),
            (13, "th"),
            (21, "st"),
            (22, "nd"),
            (101, "st"),
            (111, "th"),
            (0, "th"),
            (-1, "st"),
        ];
        for (n, suffix) in cases {
            assert_eq!(ordinal_suffix(n), suffix, "n = {}", n);
        }
    }

    #[test]
    fn test_flag_key() {
        assert_eq!(flag_key("New England"), "new england");
        assert_eq!(flag_key("Île-de-France"), "île-de-france");
        assert_eq!(flag_key("Nouvelle-Écosse"), "nouvelle-écosse");
        assert_eq!(flag_key("Łódź"), "?ód?");
    }

    proptest! {
        #[test]
        fn prop_ordinal_suffix_ignores_hundreds(n in 0..10_000i32) {
            prop_assert_eq!(ordinal_suffix(n), ordinal_suffix(n % 100));
            prop_assert_eq!(ordinal_suffix(n), ordinal_suffix(-n));
        }

        #[test]
        fn prop_flag_key_is_stable(name in "[A-Za-z ]{0,20}") {
            let key = flag_key(&name);
            prop_assert_eq!(flag_key(&key), key.clone());
            prop_assert_eq!(key, name.to_lowercase());
        }
    }
}
