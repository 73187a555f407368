//! Descriptor string helpers shared by dominance resolution and overrides.

/// Merge qualitative descriptors into one label.
///
/// Empty and repeated descriptors are dropped. Several single-letter
/// descriptors are sorted and concatenated ("B", "A" gives "AB"); anything
/// else is joined with ", " in first-seen order.
pub fn combine_descriptors<S: AsRef<str>>(descriptors: &[S]) -> String {
    let mut unique: Vec<&str> = Vec::with_capacity(descriptors.len());
    for descriptor in descriptors.iter().map(AsRef::as_ref) {
        if !descriptor.is_empty() && !unique.contains(&descriptor) {
            unique.push(descriptor);
        }
    }

    if unique.len() <= 1 {
        return unique.concat();
    }
    if unique.iter().all(|d| is_single_letter(d)) {
        unique.sort_unstable();
        return unique.concat();
    }
    unique.join(", ")
}

fn is_single_letter(descriptor: &str) -> bool {
    let mut chars = descriptor.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_alphabetic())
}

/// Keep only ASCII letters and digits ("X^B" becomes "XB")
pub fn strip_non_alnum(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

/// Normalized allele token for case-insensitive matching
pub fn normalized_token(value: &str) -> String {
    strip_non_alnum(value).to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combine_single_letters() {
        assert_eq!(combine_descriptors(&["B", "A"]), "AB");
        assert_eq!(combine_descriptors(&["A", "A"]), "A");
    }

    #[test]
    fn test_combine_words() {
        assert_eq!(combine_descriptors(&["Red", "", "White", "Red"]), "Red, White");
        assert_eq!(combine_descriptors(&["A", "Roan"]), "A, Roan");
    }

    #[test]
    fn test_combine_empty() {
        let none: [&str; 0] = [];
        assert_eq!(combine_descriptors(&none), "");
        assert_eq!(combine_descriptors(&["", ""]), "");
    }

    #[test]
    fn test_tokens() {
        assert_eq!(strip_non_alnum("X^B"), "XB");
        assert_eq!(normalized_token("w-mask"), "WMASK");
    }
}
