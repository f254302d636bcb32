//! Typed backend code sets, built once from the service configuration.

use std::collections::HashSet;

use crate::config::schema::{CodeList, ServiceConfig};
use crate::config::validation::{overlapping_codes, ValidationError};

/// A set of backend codes compared as opaque strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeSet(HashSet<String>);

impl CodeSet {
    pub fn contains(&self, code: &str) -> bool {
        self.0.contains(code)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<&CodeList> for CodeSet {
    fn from(list: &CodeList) -> Self {
        Self(list.iter().map(str::to_string).collect())
    }
}

impl<S: AsRef<str>> FromIterator<S> for CodeSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from(&CodeList::from_items(iter))
    }
}

/// The four code sets the request layer consults.
///
/// Construction fails when a code is listed in more than one set, so
/// category lookup never depends on check order for a valid book.
#[derive(Debug, Clone, Default)]
pub struct CodeBook {
    pub success: CodeSet,
    pub logout: CodeSet,
    pub modal_logout: CodeSet,
    pub expired_token: CodeSet,
}

impl CodeBook {
    pub fn from_config(service: &ServiceConfig) -> Result<Self, Vec<ValidationError>> {
        let overlaps = overlapping_codes(service);
        if !overlaps.is_empty() {
            return Err(overlaps);
        }

        Ok(Self {
            success: CodeSet::from(&service.success_codes),
            logout: CodeSet::from(&service.logout_codes),
            modal_logout: CodeSet::from(&service.modal_logout_codes),
            expired_token: CodeSet::from(&service.expired_token_codes),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_book_from_default_config() {
        let book = CodeBook::from_config(&ServiceConfig::default()).unwrap();
        assert!(book.success.contains("0000"));
        assert!(book.logout.contains("8888"));
        assert!(book.modal_logout.contains("7778"));
        assert_eq!(book.expired_token.len(), 3);
    }

    #[test]
    fn test_code_book_rejects_shared_code() {
        let mut service = ServiceConfig::default();
        service.modal_logout_codes = CodeList::from_csv("7777,9999");
        let errors = CodeBook::from_config(&service).unwrap_err();
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_alphanumeric_codes_are_opaque() {
        let set: CodeSet = ["A-401", "0000"].into_iter().collect();
        assert!(set.contains("A-401"));
        assert!(!set.contains("0"));
    }
}
