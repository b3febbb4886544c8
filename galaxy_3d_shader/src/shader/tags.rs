/// Key/value tags attached to passes and techniques ("LightMode" = "ForwardBase", ...)

use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderTags {
    tags: BTreeMap<String, String>,
}

impl ShaderTags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tag; returns false (and keeps the old value) if the key exists
    pub fn add(&mut self, key: &str, value: &str) -> bool {
        if self.tags.contains_key(key) {
            return false;
        }
        self.tags.insert(key.to_string(), value.to_string());
        true
    }

    /// Overwrite an existing tag; returns false if the key is unknown
    pub fn set(&mut self, key: &str, value: &str) -> bool {
        match self.tags.get_mut(key) {
            Some(existing) => {
                *existing = value.to_string();
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.tags.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tags.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
