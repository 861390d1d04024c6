use hashbrown::HashMap as FastHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::init::StringOrInit;

pub type Groups = FastHashMap<String, String>;

/// The inputs a match was attempted with: `[input]` or `[input, baseURL]`.
pub type Inputs = SmallVec<[StringOrInit; 2]>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentMatch {
    pub input: String,
    pub groups: Groups,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlPatternMatch {
    pub inputs: Inputs,
    pub protocol: ComponentMatch,
    pub username: ComponentMatch,
    pub password: ComponentMatch,
    pub hostname: ComponentMatch,
    pub port: ComponentMatch,
    pub pathname: ComponentMatch,
    pub search: ComponentMatch,
    pub hash: ComponentMatch,
}
