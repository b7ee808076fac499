pub mod member;
pub mod relation;
pub mod relation_category;
pub mod relation_type;

mod queries;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Category name -> relation type name -> the member holding that relation, if any.
pub type FamilyTree = BTreeMap<String, BTreeMap<String, Option<member::Model>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sibling {
    Brother,
    Sister,
}

impl Sibling {
    pub fn relation_type(self) -> &'static str {
        match self {
            Self::Brother => "Brother",
            Self::Sister => "Sister",
        }
    }

    pub fn from_relation_type(name: &str) -> Option<Self> {
        match name {
            "Brother" => Some(Self::Brother),
            "Sister" => Some(Self::Sister),
            _ => None,
        }
    }
}
