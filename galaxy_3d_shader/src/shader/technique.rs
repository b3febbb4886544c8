/// Technique - an ordered list of passes rendered together, and its per-consumer instance.
///
/// A `TechniqueInstance` fans keyword switches and parameter writes out to one
/// `PassInstance` per pass, in pass order. The first failure stops the fan-out;
/// passes already switched stay switched, and the returned `SwitchReport` says
/// exactly which ones so the caller can compensate.

use std::sync::{Arc, Mutex};

use glam::{Mat4, Vec4};

use crate::engine::Engine;
use crate::error::{Error, Result};
use crate::renderer::{Renderer, Texture};
use crate::shader::{
    Color, MissingVariantPolicy, Pass, PassInstance, ShaderKeyword, ShaderTags, SwitchOutcome,
};

// ===== TECHNIQUE =====

#[derive(Clone)]
pub struct Technique {
    name: String,
    lod: u32,
    tags: ShaderTags,
    passes: Vec<Arc<Pass>>,
}

impl Technique {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            lod: 0,
            tags: ShaderTags::new(),
            passes: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Level of detail this technique targets (higher = more expensive)
    pub fn lod(&self) -> u32 {
        self.lod
    }

    pub fn set_lod(&mut self, lod: u32) {
        self.lod = lod;
    }

    pub fn tags(&self) -> &ShaderTags {
        &self.tags
    }

    pub fn add_tag(&mut self, key: &str, value: &str) -> bool {
        self.tags.add(key, value)
    }

    pub fn set_tag(&mut self, key: &str, value: &str) -> bool {
        self.tags.set(key, value)
    }

    pub fn remove_tag(&mut self, key: &str) {
        self.tags.remove(key);
    }

    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key)
    }

    pub fn add_pass(&mut self, pass: Arc<Pass>) {
        self.passes.push(pass);
    }

    pub fn passes(&self) -> &[Arc<Pass>] {
        &self.passes
    }

    pub fn pass(&self, name: &str) -> Option<&Arc<Pass>> {
        self.passes.iter().find(|p| p.name() == name)
    }

    /// Compile every pass in order, stopping at the first failure
    pub fn compile(&mut self, renderer: &Arc<Mutex<dyn Renderer>>) -> Result<()> {
        for pass in &mut self.passes {
            Arc::make_mut(pass).compile(renderer)?;
        }
        crate::engine_debug!("galaxy3d::Technique",
            "Technique '{}': compiled {} pass(es)", self.name, self.passes.len());
        Ok(())
    }
}

// ===== SWITCH REPORT =====

/// What happened to one pass during a technique-wide switch
#[derive(Debug, Clone, PartialEq)]
pub enum PassSwitchResult {
    Switched,
    Unchanged,
    Failed(Error),
    /// Not attempted because an earlier pass failed
    Skipped,
}

/// Per-pass results of `TechniqueInstance::switch_keywords`, in pass order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SwitchReport {
    results: Vec<PassSwitchResult>,
}

impl SwitchReport {
    pub fn results(&self) -> &[PassSwitchResult] {
        &self.results
    }

    pub fn is_success(&self) -> bool {
        self.first_error().is_none()
    }

    pub fn first_error(&self) -> Option<&Error> {
        self.results.iter().find_map(|r| match r {
            PassSwitchResult::Failed(error) => Some(error),
            _ => None,
        })
    }

    /// Indices of passes that committed a new selection
    pub fn switched_passes(&self) -> Vec<usize> {
        self.results
            .iter()
            .enumerate()
            .filter(|(_, r)| **r == PassSwitchResult::Switched)
            .map(|(index, _)| index)
            .collect()
    }

    pub fn into_result(self) -> Result<()> {
        match self.first_error() {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

// ===== TECHNIQUE INSTANCE =====

pub struct TechniqueInstance {
    technique: Arc<Technique>,
    passes: Vec<PassInstance>,
}

impl TechniqueInstance {
    /// Create one pass instance per pass
    pub fn new(
        technique: Arc<Technique>,
        renderer: Arc<Mutex<dyn Renderer>>,
        policy: MissingVariantPolicy,
    ) -> Result<Self> {
        let passes = technique
            .passes()
            .iter()
            .map(|pass| PassInstance::new(pass.clone(), renderer.clone(), policy))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { technique, passes })
    }

    /// Same as `new`, against the engine's active renderer
    pub fn with_active_renderer(technique: Arc<Technique>, policy: MissingVariantPolicy) -> Result<Self> {
        let renderer = Engine::renderer()?;
        Self::new(technique, renderer, policy)
    }

    pub fn technique(&self) -> &Arc<Technique> {
        &self.technique
    }

    pub fn pass_instances(&self) -> &[PassInstance] {
        &self.passes
    }

    pub fn pass_instance(&self, index: usize) -> Option<&PassInstance> {
        self.passes.get(index)
    }

    pub fn pass_instance_mut(&mut self, index: usize) -> Option<&mut PassInstance> {
        self.passes.get_mut(index)
    }

    // ===== SWITCHING =====

    fn switch_each<F>(&mut self, mut switch: F) -> SwitchReport
    where
        F: FnMut(&mut PassInstance) -> Result<SwitchOutcome>,
    {
        let mut results = Vec::with_capacity(self.passes.len());
        let mut failed = false;

        for pass in &mut self.passes {
            if failed {
                results.push(PassSwitchResult::Skipped);
                continue;
            }
            results.push(match switch(pass) {
                Ok(SwitchOutcome::Switched) => PassSwitchResult::Switched,
                Ok(SwitchOutcome::Unchanged) => PassSwitchResult::Unchanged,
                Err(error) => {
                    failed = true;
                    crate::engine_warn!("galaxy3d::TechniqueInstance",
                        "Technique '{}': pass '{}' failed to switch, later passes skipped",
                        self.technique.name(), pass.pass().name());
                    PassSwitchResult::Failed(error)
                }
            });
        }

        SwitchReport { results }
    }

    /// Enable/disable keywords on every pass, in pass order
    pub fn switch_keywords(&mut self, enable: &ShaderKeyword, disable: &ShaderKeyword) -> SwitchReport {
        self.switch_each(|pass| pass.switch_keywords(enable, disable))
    }

    /// Switch every pass to an explicit keyword set
    pub fn switch_keyword(&mut self, keyword: &ShaderKeyword) -> SwitchReport {
        self.switch_each(|pass| pass.switch_keyword(keyword))
    }

    // ===== PARAMETERS =====

    /// Apply `set` to every pass; true if any pass declares the parameter
    fn for_each_pass<F>(&mut self, mut set: F) -> Result<bool>
    where
        F: FnMut(&mut PassInstance) -> Result<bool>,
    {
        let mut found = false;
        for pass in &mut self.passes {
            found |= set(pass)?;
        }
        Ok(found)
    }

    pub fn set_bool(&mut self, name: &str, value: bool) -> Result<bool> {
        self.for_each_pass(|p| p.set_bool(name, value))
    }

    pub fn set_int(&mut self, name: &str, value: i32) -> Result<bool> {
        self.for_each_pass(|p| p.set_int(name, value))
    }

    pub fn set_float(&mut self, name: &str, value: f32) -> Result<bool> {
        self.for_each_pass(|p| p.set_float(name, value))
    }

    pub fn set_color(&mut self, name: &str, value: Color) -> Result<bool> {
        self.for_each_pass(|p| p.set_color(name, value))
    }

    pub fn set_vector(&mut self, name: &str, value: Vec4) -> Result<bool> {
        self.for_each_pass(|p| p.set_vector(name, value))
    }

    pub fn set_matrix(&mut self, name: &str, value: Mat4) -> Result<bool> {
        self.for_each_pass(|p| p.set_matrix(name, value))
    }

    pub fn set_bool_array(&mut self, name: &str, values: &[bool]) -> Result<bool> {
        self.for_each_pass(|p| p.set_bool_array(name, values))
    }

    pub fn set_int_array(&mut self, name: &str, values: &[i32]) -> Result<bool> {
        self.for_each_pass(|p| p.set_int_array(name, values))
    }

    pub fn set_float_array(&mut self, name: &str, values: &[f32]) -> Result<bool> {
        self.for_each_pass(|p| p.set_float_array(name, values))
    }

    pub fn set_color_array(&mut self, name: &str, values: &[Color]) -> Result<bool> {
        self.for_each_pass(|p| p.set_color_array(name, values))
    }

    pub fn set_vector_array(&mut self, name: &str, values: &[Vec4]) -> Result<bool> {
        self.for_each_pass(|p| p.set_vector_array(name, values))
    }

    pub fn set_matrix_array(&mut self, name: &str, values: &[Mat4]) -> Result<bool> {
        self.for_each_pass(|p| p.set_matrix_array(name, values))
    }

    pub fn set_data(&mut self, name: &str, data: &[u8]) -> Result<bool> {
        self.for_each_pass(|p| p.set_data(name, data))
    }

    pub fn set_texture(&mut self, name: &str, texture: &Arc<dyn Texture>) -> Result<bool> {
        self.for_each_pass(|p| p.set_texture(name, texture))
    }

    pub fn update_constant_buffers(&mut self) -> Result<usize> {
        let mut uploaded = 0;
        for pass in &mut self.passes {
            uploaded += pass.update_constant_buffers()?;
        }
        Ok(uploaded)
    }
}

#[cfg(test)]
#[path = "technique_tests.rs"]
mod tests;
