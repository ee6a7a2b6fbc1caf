// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Topic filters
//!
//! ZMQ filters are byte prefixes: `"LTC"` also matches `"LTC_USDN"`, and the
//! empty string matches everything.

use std::collections::BTreeSet;

/// The filters one subscribe call applies
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicFilter {
    /// The constructor's default topic, untagged output
    Single(String),
    /// Caller-supplied topics, tagged output
    Multi(BTreeSet<String>),
}

impl TopicFilter {
    pub fn multi<I, T>(topics: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self::Multi(topics.into_iter().map(Into::into).collect())
    }

    /// Topics in application order
    pub fn topics(&self) -> Vec<&str> {
        match self {
            Self::Single(topic) => vec![topic.as_str()],
            Self::Multi(topics) => topics.iter().map(String::as_str).collect(),
        }
    }

    pub fn is_multi(&self) -> bool {
        matches!(self, Self::Multi(_))
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(_) => false,
            Self::Multi(topics) => topics.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multi_deduplicates_and_sorts() {
        let filter = TopicFilter::multi(["WAVES_USDN", "LTC_USDN", "WAVES_USDN"]);
        assert_eq!(filter.topics(), vec!["LTC_USDN", "WAVES_USDN"]);
        assert!(filter.is_multi());
        assert!(!filter.is_empty());
    }

    #[test]
    fn test_single_empty_topic_is_still_a_filter() {
        let filter = TopicFilter::Single(String::new());
        assert_eq!(filter.topics(), vec![""]);
        assert!(!filter.is_empty());
        assert!(TopicFilter::multi(Vec::<String>::new()).is_empty());
    }
}
