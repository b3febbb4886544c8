/// Pass - the shader variants of one render pass, for every keyword set it was compiled with.
///
/// Each graphics stage (vertex, hull, domain, geometry, pixel) has its own
/// keyword set -> variant map. The offline compiler fills the maps; pass
/// instances look variants up in them when switching keywords.

use std::sync::{Arc, Mutex};

use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::renderer::{Renderer, ShaderStage};
use crate::shader::{ShaderKeyword, ShaderTags, ShaderVariant};

type VariantMap = FxHashMap<ShaderKeyword, Arc<ShaderVariant>>;

#[derive(Clone)]
pub struct Pass {
    name: String,
    tags: ShaderTags,
    /// Indexed by `ShaderStage::pass_index()`
    stages: [VariantMap; 5],
    /// Distinct keyword sets in registration order
    keywords: Vec<ShaderKeyword>,
    default_keyword: Option<ShaderKeyword>,
}

impl Pass {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            tags: ShaderTags::new(),
            stages: Default::default(),
            keywords: Vec::new(),
            default_keyword: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // ===== TAGS =====

    pub fn tags(&self) -> &ShaderTags {
        &self.tags
    }

    pub fn add_tag(&mut self, key: &str, value: &str) -> bool {
        self.tags.add(key, value)
    }

    pub fn remove_tag(&mut self, key: &str) {
        self.tags.remove(key);
    }

    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key)
    }

    // ===== VARIANT REGISTRATION =====

    fn stage_index(stage: ShaderStage) -> Result<usize> {
        stage.pass_index().ok_or_else(|| Error::UnsupportedStage(stage).logged("galaxy3d::Pass"))
    }

    /// Register a variant under its own keyword set
    ///
    /// Returns `Ok(false)` when the stage already holds a variant for that keyword
    /// set: the first registration is kept and a warning is logged. Compute variants
    /// are rejected with `Error::UnsupportedStage`.
    pub fn add_variant(&mut self, variant: Arc<ShaderVariant>) -> Result<bool> {
        let index = Self::stage_index(variant.stage())?;
        let keyword = variant.keyword().clone();
        let map = &mut self.stages[index];

        if map.contains_key(&keyword) {
            crate::engine_warn!("galaxy3d::Pass",
                "Pass '{}': duplicate {} variant for keywords {}, keeping the first one",
                self.name, variant.stage(), keyword);
            return Ok(false);
        }

        map.insert(keyword.clone(), variant);
        if !self.keywords.contains(&keyword) {
            self.keywords.push(keyword);
        }
        Ok(true)
    }

    /// Remove every stage's variant for a keyword set
    ///
    /// Returns the removed variants; `Error::StateError` if no stage had one.
    pub fn remove_variant(&mut self, keyword: &ShaderKeyword) -> Result<Vec<Arc<ShaderVariant>>> {
        let removed: Vec<Arc<ShaderVariant>> = self
            .stages
            .iter_mut()
            .filter_map(|map| map.remove(keyword))
            .collect();

        if removed.is_empty() {
            return Err(Error::StateError(format!(
                "pass '{}' has no variants for keywords {}", self.name, keyword
            ))
            .logged("galaxy3d::Pass"));
        }

        self.keywords.retain(|k| k != keyword);
        if self.default_keyword.as_ref() == Some(keyword) {
            self.default_keyword = None;
        }
        Ok(removed)
    }

    // ===== LOOKUP =====

    /// All variants of a stage (empty for compute)
    pub fn variants(&self, stage: ShaderStage) -> impl Iterator<Item = &Arc<ShaderVariant>> {
        stage
            .pass_index()
            .map(|index| &self.stages[index])
            .into_iter()
            .flat_map(|map| map.values())
    }

    pub fn variant(&self, stage: ShaderStage, keyword: &ShaderKeyword) -> Option<&Arc<ShaderVariant>> {
        stage.pass_index().and_then(|index| self.stages[index].get(keyword))
    }

    pub fn has_stage(&self, stage: ShaderStage) -> bool {
        stage.pass_index().is_some_and(|index| !self.stages[index].is_empty())
    }

    pub fn variant_count(&self) -> usize {
        self.stages.iter().map(|map| map.len()).sum()
    }

    /// Keyword sets in registration order
    pub fn keywords(&self) -> &[ShaderKeyword] {
        &self.keywords
    }

    /// Keyword set new pass instances start with
    ///
    /// The explicitly set default, else the first registered keyword set, else empty.
    pub fn default_keyword(&self) -> ShaderKeyword {
        self.default_keyword
            .clone()
            .or_else(|| self.keywords.first().cloned())
            .unwrap_or_default()
    }

    pub fn set_default_keyword(&mut self, keyword: ShaderKeyword) -> Result<()> {
        if !self.keywords.contains(&keyword) {
            return Err(Error::StateError(format!(
                "pass '{}' has no variants for keywords {}", self.name, keyword
            ))
            .logged("galaxy3d::Pass"));
        }
        self.default_keyword = Some(keyword);
        Ok(())
    }

    // ===== COMPILATION =====

    /// Compile and reflect every variant, stage by stage
    ///
    /// Stops at the first failure. Variants still shared with live instances are
    /// copied before being compiled; the pass ends up holding the compiled copy.
    pub fn compile(&mut self, renderer: &Arc<Mutex<dyn Renderer>>) -> Result<()> {
        let mut renderer = renderer
            .lock()
            .map_err(|_| Error::BackendError("Renderer lock poisoned".to_string()).logged("galaxy3d::Pass"))?;

        for stage in ShaderStage::PASS_STAGES {
            let index = Self::stage_index(stage)?;
            for variant in self.stages[index].values_mut() {
                let variant = Arc::make_mut(variant);
                variant.compile(&mut *renderer)?;
                variant.reflect(&mut *renderer)?;
            }
        }

        crate::engine_debug!("galaxy3d::Pass",
            "Pass '{}': compiled {} variant(s)", self.name, self.variant_count());
        Ok(())
    }
}

#[cfg(test)]
#[path = "pass_tests.rs"]
mod tests;
