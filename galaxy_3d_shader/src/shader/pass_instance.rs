/// Pass instance - the live variant selection of one pass for one consumer.
///
/// Holds the current keyword set and one `ShaderVariantInstance` per graphics
/// stage. Switching keywords resolves all five stages first and only then
/// replaces keyword set and slots together, so a failed switch changes nothing.

use std::sync::{Arc, Mutex};

use glam::{Mat4, Vec4};

use crate::error::{Error, Result};
use crate::renderer::{Renderer, ShaderStage, Texture};
use crate::shader::{Color, Pass, ShaderKeyword, ShaderVariantInstance};

/// What a switch does when a stage has variants but none for the requested keyword set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingVariantPolicy {
    /// Abort the switch with `Error::LookupMiss`; nothing is committed
    #[default]
    Strict,
    /// Log a warning and keep the stage's previously committed instance
    KeepPrevious,
}

/// Result of a successful switch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// Requested keyword set equals the current one; nothing was done
    Unchanged,
    /// A new selection was committed
    Switched,
}

enum Resolved {
    Empty,
    Fresh(ShaderVariantInstance),
    KeepPrevious,
}

pub struct PassInstance {
    pass: Arc<Pass>,
    renderer: Arc<Mutex<dyn Renderer>>,
    policy: MissingVariantPolicy,
    keyword: ShaderKeyword,
    /// Indexed by `ShaderStage::pass_index()`
    slots: [Option<ShaderVariantInstance>; 5],
}

impl PassInstance {
    /// Create an instance selecting the pass's default keyword set
    pub fn new(
        pass: Arc<Pass>,
        renderer: Arc<Mutex<dyn Renderer>>,
        policy: MissingVariantPolicy,
    ) -> Result<Self> {
        let initial = pass.default_keyword();
        let mut instance = Self {
            pass,
            renderer,
            policy,
            keyword: ShaderKeyword::new(),
            slots: Default::default(),
        };
        instance.commit(initial)?;
        Ok(instance)
    }

    // ===== SWITCHING =====

    /// Enable and disable keywords, then switch to the resulting set
    ///
    /// Keywords in both `enable` and `disable` end up disabled.
    pub fn switch_keywords(&mut self, enable: &ShaderKeyword, disable: &ShaderKeyword) -> Result<SwitchOutcome> {
        let candidate = self.keyword.to_builder().union(enable).difference(disable).build();
        self.switch_keyword(&candidate)
    }

    /// Switch to an explicit keyword set
    pub fn switch_keyword(&mut self, keyword: &ShaderKeyword) -> Result<SwitchOutcome> {
        if *keyword == self.keyword {
            return Ok(SwitchOutcome::Unchanged);
        }
        self.commit(keyword.clone())?;
        Ok(SwitchOutcome::Switched)
    }

    fn commit(&mut self, keyword: ShaderKeyword) -> Result<()> {
        let mut resolved = Vec::with_capacity(ShaderStage::PASS_STAGES.len());
        {
            let mut renderer = self.renderer.lock()
                .map_err(|_| Error::BackendError("Renderer lock poisoned".to_string())
                    .logged("galaxy3d::PassInstance"))?;

            for stage in ShaderStage::PASS_STAGES {
                let next = if !self.pass.has_stage(stage) {
                    Resolved::Empty
                } else if let Some(variant) = self.pass.variant(stage, &keyword) {
                    Resolved::Fresh(ShaderVariantInstance::new(&mut *renderer, variant.clone())?)
                } else {
                    match self.policy {
                        MissingVariantPolicy::Strict => {
                            return Err(Error::LookupMiss { stage, keywords: keyword.to_string() }
                                .logged("galaxy3d::PassInstance"));
                        }
                        MissingVariantPolicy::KeepPrevious => {
                            crate::engine_warn!("galaxy3d::PassInstance",
                                "Pass '{}': no {} variant for keywords {}, keeping the previous one",
                                self.pass.name(), stage, keyword);
                            Resolved::KeepPrevious
                        }
                    }
                };
                resolved.push(next);
            }
        }

        let mut slots: [Option<ShaderVariantInstance>; 5] = Default::default();
        for (index, next) in resolved.into_iter().enumerate() {
            slots[index] = match next {
                Resolved::Empty => None,
                Resolved::Fresh(instance) => Some(instance),
                Resolved::KeepPrevious => self.slots[index].take(),
            };
        }

        crate::engine_trace!("galaxy3d::PassInstance",
            "Pass '{}': {} -> {}", self.pass.name(), self.keyword, keyword);

        self.slots = slots;
        self.keyword = keyword;
        Ok(())
    }

    // ===== ACCESSORS =====

    pub fn pass(&self) -> &Arc<Pass> {
        &self.pass
    }

    pub fn current_keyword(&self) -> &ShaderKeyword {
        &self.keyword
    }

    pub fn policy(&self) -> MissingVariantPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: MissingVariantPolicy) {
        self.policy = policy;
    }

    /// Live instance of a stage (`None` for compute or stages the pass lacks)
    pub fn variant(&self, stage: ShaderStage) -> Option<&ShaderVariantInstance> {
        stage.pass_index().and_then(|index| self.slots[index].as_ref())
    }

    pub fn variant_mut(&mut self, stage: ShaderStage) -> Option<&mut ShaderVariantInstance> {
        stage.pass_index().and_then(|index| self.slots[index].as_mut())
    }

    // ===== PARAMETERS =====

    /// Apply `set` to every live stage; true if any stage declares the parameter
    fn for_each_variant<F>(&mut self, mut set: F) -> Result<bool>
    where
        F: FnMut(&mut ShaderVariantInstance) -> Result<bool>,
    {
        let mut found = false;
        for instance in self.slots.iter_mut().flatten() {
            found |= set(instance)?;
        }
        Ok(found)
    }

    pub fn set_bool(&mut self, name: &str, value: bool) -> Result<bool> {
        self.for_each_variant(|v| v.set_bool(name, value))
    }

    pub fn set_int(&mut self, name: &str, value: i32) -> Result<bool> {
        self.for_each_variant(|v| v.set_int(name, value))
    }

    pub fn set_float(&mut self, name: &str, value: f32) -> Result<bool> {
        self.for_each_variant(|v| v.set_float(name, value))
    }

    pub fn set_color(&mut self, name: &str, value: Color) -> Result<bool> {
        self.for_each_variant(|v| v.set_color(name, value))
    }

    pub fn set_vector(&mut self, name: &str, value: Vec4) -> Result<bool> {
        self.for_each_variant(|v| v.set_vector(name, value))
    }

    pub fn set_matrix(&mut self, name: &str, value: Mat4) -> Result<bool> {
        self.for_each_variant(|v| v.set_matrix(name, value))
    }

    pub fn set_bool_array(&mut self, name: &str, values: &[bool]) -> Result<bool> {
        self.for_each_variant(|v| v.set_bool_array(name, values))
    }

    pub fn set_int_array(&mut self, name: &str, values: &[i32]) -> Result<bool> {
        self.for_each_variant(|v| v.set_int_array(name, values))
    }

    pub fn set_float_array(&mut self, name: &str, values: &[f32]) -> Result<bool> {
        self.for_each_variant(|v| v.set_float_array(name, values))
    }

    pub fn set_color_array(&mut self, name: &str, values: &[Color]) -> Result<bool> {
        self.for_each_variant(|v| v.set_color_array(name, values))
    }

    pub fn set_vector_array(&mut self, name: &str, values: &[Vec4]) -> Result<bool> {
        self.for_each_variant(|v| v.set_vector_array(name, values))
    }

    pub fn set_matrix_array(&mut self, name: &str, values: &[Mat4]) -> Result<bool> {
        self.for_each_variant(|v| v.set_matrix_array(name, values))
    }

    pub fn set_data(&mut self, name: &str, data: &[u8]) -> Result<bool> {
        self.for_each_variant(|v| v.set_data(name, data))
    }

    pub fn set_texture(&mut self, name: &str, texture: &Arc<dyn Texture>) -> Result<bool> {
        self.for_each_variant(|v| v.set_texture(name, texture.clone()))
    }

    /// Upload modified constant buffers of every live stage
    pub fn update_constant_buffers(&mut self) -> Result<usize> {
        let mut uploaded = 0;
        for instance in self.slots.iter_mut().flatten() {
            uploaded += instance.update_constant_buffers()?;
        }
        Ok(uploaded)
    }
}

#[cfg(test)]
#[path = "pass_instance_tests.rs"]
mod tests;
