//! Approver allow-list
//!
//! The set of usernames whose affirmative votes may commit a block. Injected
//! from configuration; registering an approver in the registry does not add
//! it here.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApproverSet {
    usernames: BTreeSet<String>,
}

impl ApproverSet {
    pub fn new<I, S>(usernames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            usernames: usernames.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, username: &str) -> bool {
        self.usernames.contains(username)
    }

    pub fn len(&self) -> usize {
        self.usernames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.usernames.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.usernames.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for ApproverSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}
