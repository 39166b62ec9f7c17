//! Recipient lists

use std::fmt;

use super::errors::RecipientError;

/// A single recipient address, trimmed and never empty
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Recipient(String);

impl Recipient {
    /// Create a new recipient from raw input
    pub fn new(raw: &str) -> Result<Self, RecipientError> {
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(RecipientError::EmptyRecipient);
        }

        Ok(Self(trimmed.to_string()))
    }

    /// The address as typed, without surrounding whitespace
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Recipient> for String {
    fn from(recipient: Recipient) -> Self {
        recipient.0
    }
}

/// The ordered recipients of a batch.
///
/// Duplicates are kept: an address listed twice is sent to twice.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecipientList(Vec<Recipient>);

impl RecipientList {
    /// Parses a comma separated list of addresses.
    ///
    /// Each piece is trimmed and empty pieces are dropped, so
    /// `"a@x.com, , b@y.com,"` yields `a@x.com` and `b@y.com`.
    pub fn parse(raw: &str) -> Self {
        Self(
            raw.split(',')
                .filter_map(|piece| Recipient::new(piece).ok())
                .collect(),
        )
    }

    /// Appends the CC and BCC addresses, in that order, as plain recipients.
    ///
    /// Blank values are ignored.
    pub fn with_copies(mut self, cc: Option<&str>, bcc: Option<&str>) -> Self {
        self.0.extend(
            [cc, bcc]
                .into_iter()
                .flatten()
                .filter_map(|copy| Recipient::new(copy).ok()),
        );

        self
    }

    /// The number of recipients
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list has no recipients
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the recipients in order
    pub fn iter(&self) -> std::slice::Iter<'_, Recipient> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a RecipientList {
    type Item = &'a Recipient;
    type IntoIter = std::slice::Iter<'a, Recipient>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for RecipientList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, recipient) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }

            write!(f, "{recipient}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn addresses(list: &RecipientList) -> Vec<&str> {
        list.iter().map(Recipient::as_str).collect()
    }

    #[test]
    fn test_recipient_is_trimmed() -> TestResult {
        let recipient = Recipient::new("  email@example.com\t")?;

        assert_eq!(recipient.as_str(), "email@example.com");
        assert_eq!(String::from(recipient), "email@example.com".to_string());

        Ok(())
    }

    #[test]
    fn test_blank_recipient_is_invalid() {
        let result = Recipient::new("   ");

        assert!(matches!(result, Err(RecipientError::EmptyRecipient)));
    }

    #[test]
    fn test_recipient_syntax_is_not_checked() -> TestResult {
        let recipient = Recipient::new("not an address")?;

        assert_eq!(recipient.to_string(), "not an address");

        Ok(())
    }

    #[test]
    fn test_parse_drops_empty_segments() {
        let list = RecipientList::parse("a@x.com, , b@y.com,");

        assert_eq!(addresses(&list), vec!["a@x.com", "b@y.com"]);
    }

    #[test]
    fn test_parse_keeps_order_and_duplicates() {
        let list = RecipientList::parse("c@z.com,a@x.com , c@z.com");

        assert_eq!(addresses(&list), vec!["c@z.com", "a@x.com", "c@z.com"]);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_parse_of_blank_input_is_empty() {
        assert!(RecipientList::parse("").is_empty());
        assert!(RecipientList::parse(" , ,, ").is_empty());
    }

    #[test]
    fn test_parse_is_idempotent() {
        let inputs = [
            "a@x.com, , b@y.com,",
            "  single@example.com  ",
            ",,,",
            "dup@x.com,dup@x.com",
            "\ta@x.com ,\n b@y.com",
        ];

        for input in inputs {
            let once = RecipientList::parse(input);
            let twice = RecipientList::parse(&once.to_string());

            assert_eq!(once, twice, "re-parsing {input:?}");
        }
    }

    #[test]
    fn test_cc_is_appended_and_blank_bcc_ignored() {
        let base = RecipientList::parse("a@x.com, b@y.com");
        let list = base.clone().with_copies(Some(" c@z.com "), Some(""));

        assert_eq!(list.len(), base.len() + 1);
        assert_eq!(list.iter().last().map(Recipient::as_str), Some("c@z.com"));
    }

    #[test]
    fn test_cc_comes_before_bcc() {
        let list = RecipientList::parse("a@x.com").with_copies(Some("cc@z.com"), Some("bcc@z.com"));

        assert_eq!(addresses(&list), vec!["a@x.com", "cc@z.com", "bcc@z.com"]);
    }

    #[test]
    fn test_missing_copies_leave_list_unchanged() {
        let list = RecipientList::parse("a@x.com").with_copies(None, Some("   "));

        assert_eq!(addresses(&list), vec!["a@x.com"]);
    }
}
