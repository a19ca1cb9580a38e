//! Fixed outcome vocabularies. Values are compared after normalization, so
//! every entry here is already trimmed and upper-cased.

pub const NO_RESPONSE: &[&str] = &["N\u{c3}O RESPONDEU", "VISUALIZOU E N\u{c3}O RESPONDEU"];

pub const POSITIVE: &[&str] = &["POSITIVO", "INTERESSADO", "RESPONDEU E MARCOU CALL"];

pub const NEGATIVE: &str = "NEGATIVO";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_are_already_normalized() {
        for outcome in NO_RESPONSE.iter().chain(POSITIVE).chain([&NEGATIVE]) {
            assert_eq!(*outcome, outcome.trim().to_uppercase());
        }
    }

    #[test]
    fn vocabularies_do_not_overlap() {
        for outcome in NO_RESPONSE {
            assert!(!POSITIVE.contains(outcome));
            assert_ne!(*outcome, NEGATIVE);
        }
        assert!(NO_RESPONSE.contains(&"VISUALIZOU E NÃO RESPONDEU"));
    }
}
