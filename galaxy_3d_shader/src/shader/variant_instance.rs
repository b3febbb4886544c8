/// Shader variant instance - the per-consumer, mutable side of a shader variant.
///
/// Owns one constant buffer per reflected constant binding plus a CPU shadow copy
/// of each, and the textures bound to the variant's texture/sampler bindings.
/// Parameters are written by variable name into the shadows and uploaded with
/// `update_constant_buffers()`.

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec4};
use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::renderer::{
    Buffer, BufferDesc, BufferUsage, ConstantDataType, CpuAccess, MemoryUsage, Renderer,
    Texture, TextureSamplerBinding,
};
use crate::shader::ShaderVariant;

/// HLSL constant register size; array elements start on a register boundary
const REGISTER_SIZE: usize = 16;

/// Linear RGBA color as laid out in a `float4` constant
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

// ===== INTERNAL SLOTS =====

struct ConstantBufferSlot {
    buffer: Arc<dyn Buffer>,
    shadow: Vec<u8>,
    dirty: bool,
}

#[derive(Clone, Copy)]
struct VariableLocation {
    slot: usize,
    offset: usize,
    size: usize,
    data_type: ConstantDataType,
}

// ===== SHADER VARIANT INSTANCE =====

pub struct ShaderVariantInstance {
    variant: Arc<ShaderVariant>,
    /// Parallel to `variant.constant_bindings()`
    slots: Vec<ConstantBufferSlot>,
    /// Constant buffers by constant-buffer name
    constant_buffers: FxHashMap<String, Arc<dyn Buffer>>,
    /// Parallel to `variant.sampler_bindings()`
    textures: Vec<Option<Arc<dyn Texture>>>,
}

impl ShaderVariantInstance {
    /// Allocate GPU-side state for a reflected variant
    ///
    /// One static, CPU-inaccessible, zero-initialized constant buffer is created per
    /// constant binding, sized to that binding.
    pub fn new(renderer: &mut dyn Renderer, variant: Arc<ShaderVariant>) -> Result<Self> {
        let bindings = variant.constant_bindings();
        let mut slots = Vec::with_capacity(bindings.len());
        let mut constant_buffers = FxHashMap::default();
        let mut scratch: Vec<u8> = Vec::new();

        for binding in bindings {
            if binding.size == 0 {
                crate::engine_bail!("galaxy3d::ShaderVariantInstance",
                    "Constant buffer '{}' of {} variant {} has zero size",
                    binding.name, variant.stage(), variant.keyword());
            }
            let size = binding.size as usize;
            scratch.clear();
            scratch.resize(size, 0);

            let buffer = renderer.create_buffer(BufferDesc {
                size: binding.size as u64,
                usage: BufferUsage::Constant,
                memory: MemoryUsage::Static,
                cpu_access: CpuAccess::empty(),
                initial_data: Some(&scratch),
            }).map_err(|e| e.logged("galaxy3d::ShaderVariantInstance"))?;

            constant_buffers.insert(binding.name.clone(), buffer.clone());
            slots.push(ConstantBufferSlot {
                buffer,
                shadow: vec![0u8; size],
                dirty: false,
            });
        }

        let textures = vec![None; variant.sampler_bindings().len()];

        Ok(Self { variant, slots, constant_buffers, textures })
    }

    pub fn variant(&self) -> &Arc<ShaderVariant> {
        &self.variant
    }

    /// Constant buffers keyed by constant-buffer name
    pub fn constant_buffers(&self) -> &FxHashMap<String, Arc<dyn Buffer>> {
        &self.constant_buffers
    }

    pub fn constant_buffer(&self, name: &str) -> Option<&Arc<dyn Buffer>> {
        self.constant_buffers.get(name)
    }

    // ===== LOOKUP =====

    fn locate(&self, name: &str) -> Option<VariableLocation> {
        self.variant.constant_bindings().iter().enumerate().find_map(|(slot, binding)| {
            binding.variable(name).map(|variable| VariableLocation {
                slot,
                offset: variable.offset as usize,
                size: variable.size as usize,
                data_type: variable.data_type,
            })
        })
    }

    fn check_type(name: &str, location: &VariableLocation, accepted: &[ConstantDataType]) -> Result<()> {
        if accepted.is_empty() || accepted.contains(&location.data_type) {
            Ok(())
        } else {
            Err(Error::InvalidParameter(format!(
                "'{}' is declared as {:?}, expected one of {:?}",
                name, location.data_type, accepted
            )))
        }
    }

    fn shadow_range(&mut self, name: &str, location: &VariableLocation) -> Result<&mut [u8]> {
        let slot = &mut self.slots[location.slot];
        let end = location.offset + location.size;
        if end > slot.shadow.len() {
            return Err(Error::InvalidParameter(format!(
                "'{}' spans bytes {}..{} outside its {}-byte constant buffer",
                name, location.offset, end, slot.shadow.len()
            )));
        }
        slot.dirty = true;
        Ok(&mut slot.shadow[location.offset..end])
    }

    // ===== RAW ACCESS =====

    fn write(&mut self, name: &str, accepted: &[ConstantDataType], data: &[u8]) -> Result<bool> {
        let Some(location) = self.locate(name) else {
            return Ok(false);
        };
        Self::check_type(name, &location, accepted)?;
        if data.len() != location.size {
            return Err(Error::InvalidParameter(format!(
                "'{}' is {} bytes, got {}", name, location.size, data.len()
            )));
        }
        self.shadow_range(name, &location)?.copy_from_slice(data);
        Ok(true)
    }

    /// Write an array, tightly packed or with HLSL 16-byte register stride
    ///
    /// The element size comes from the reflected data type.
    fn write_array(&mut self, name: &str, accepted: &[ConstantDataType], data: &[u8]) -> Result<bool> {
        let Some(location) = self.locate(name) else {
            return Ok(false);
        };
        Self::check_type(name, &location, accepted)?;

        let element_size = location.data_type.element_size().ok_or_else(|| {
            Error::InvalidParameter(format!("'{}' is a struct and cannot be written as an array", name))
        })? as usize;
        if data.len() % element_size != 0 {
            return Err(Error::InvalidParameter(format!(
                "'{}' expects {}-byte elements, got {} bytes", name, element_size, data.len()
            )));
        }

        let count = data.len() / element_size;
        let stride = element_size.next_multiple_of(REGISTER_SIZE);

        if count > 0 && data.len() == location.size {
            self.shadow_range(name, &location)?.copy_from_slice(data);
        } else if count > 0 && (count - 1) * stride + element_size == location.size {
            let target = self.shadow_range(name, &location)?;
            for (index, element) in data.chunks_exact(element_size).enumerate() {
                let start = index * stride;
                target[start..start + element_size].copy_from_slice(element);
            }
        } else {
            return Err(Error::InvalidParameter(format!(
                "'{}' is {} bytes, cannot hold {} element(s) of {} bytes",
                name, location.size, count, element_size
            )));
        }
        Ok(true)
    }

    fn read<T: Pod>(&self, name: &str, accepted: &[ConstantDataType]) -> Option<T> {
        let location = self.locate(name)?;
        if !accepted.contains(&location.data_type) || location.size < std::mem::size_of::<T>() {
            return None;
        }
        let shadow = &self.slots[location.slot].shadow;
        let end = location.offset + std::mem::size_of::<T>();
        shadow.get(location.offset..end).map(bytemuck::pod_read_unaligned)
    }

    /// Write raw bytes (size must match the variable exactly)
    ///
    /// Returns `Ok(false)` when this variant does not declare the variable.
    pub fn set_data(&mut self, name: &str, data: &[u8]) -> Result<bool> {
        self.write(name, &[], data)
    }

    /// Raw bytes of a variable from the CPU shadow
    pub fn data(&self, name: &str) -> Option<&[u8]> {
        let location = self.locate(name)?;
        self.slots[location.slot]
            .shadow
            .get(location.offset..location.offset + location.size)
    }

    pub fn has_constant(&self, name: &str) -> bool {
        self.locate(name).is_some()
    }

    // ===== TYPED SETTERS =====

    pub fn set_bool(&mut self, name: &str, value: bool) -> Result<bool> {
        self.write(name, &[ConstantDataType::Bool], bytemuck::bytes_of(&(value as u32)))
    }

    pub fn set_int(&mut self, name: &str, value: i32) -> Result<bool> {
        self.write(name, &[ConstantDataType::Int, ConstantDataType::UInt], bytemuck::bytes_of(&value))
    }

    pub fn set_float(&mut self, name: &str, value: f32) -> Result<bool> {
        self.write(name, &[ConstantDataType::Float], bytemuck::bytes_of(&value))
    }

    pub fn set_color(&mut self, name: &str, value: Color) -> Result<bool> {
        self.write(name, &[ConstantDataType::Float4], bytemuck::bytes_of(&value))
    }

    pub fn set_vector(&mut self, name: &str, value: Vec4) -> Result<bool> {
        self.write(name, &[ConstantDataType::Float4], bytemuck::bytes_of(&value))
    }

    /// Column-major, matching the default HLSL matrix packing
    pub fn set_matrix(&mut self, name: &str, value: Mat4) -> Result<bool> {
        self.write(name, &[ConstantDataType::Float4x4], bytemuck::bytes_of(&value))
    }

    pub fn set_bool_array(&mut self, name: &str, values: &[bool]) -> Result<bool> {
        let words: Vec<u32> = values.iter().map(|v| *v as u32).collect();
        self.write_array(name, &[ConstantDataType::Bool], bytemuck::cast_slice(&words))
    }

    pub fn set_int_array(&mut self, name: &str, values: &[i32]) -> Result<bool> {
        self.write_array(
            name,
            &[ConstantDataType::Int, ConstantDataType::UInt],
            bytemuck::cast_slice(values),
        )
    }

    pub fn set_float_array(&mut self, name: &str, values: &[f32]) -> Result<bool> {
        self.write_array(name, &[ConstantDataType::Float], bytemuck::cast_slice(values))
    }

    pub fn set_color_array(&mut self, name: &str, values: &[Color]) -> Result<bool> {
        self.write_array(name, &[ConstantDataType::Float4], bytemuck::cast_slice(values))
    }

    pub fn set_vector_array(&mut self, name: &str, values: &[Vec4]) -> Result<bool> {
        self.write_array(name, &[ConstantDataType::Float4], bytemuck::cast_slice(values))
    }

    pub fn set_matrix_array(&mut self, name: &str, values: &[Mat4]) -> Result<bool> {
        self.write_array(name, &[ConstantDataType::Float4x4], bytemuck::cast_slice(values))
    }

    // ===== TYPED GETTERS =====

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.read::<u32>(name, &[ConstantDataType::Bool]).map(|v| v != 0)
    }

    pub fn get_int(&self, name: &str) -> Option<i32> {
        self.read(name, &[ConstantDataType::Int, ConstantDataType::UInt])
    }

    pub fn get_float(&self, name: &str) -> Option<f32> {
        self.read(name, &[ConstantDataType::Float])
    }

    pub fn get_color(&self, name: &str) -> Option<Color> {
        self.read(name, &[ConstantDataType::Float4])
    }

    pub fn get_vector(&self, name: &str) -> Option<Vec4> {
        self.read(name, &[ConstantDataType::Float4])
    }

    pub fn get_matrix(&self, name: &str) -> Option<Mat4> {
        self.read(name, &[ConstantDataType::Float4x4])
    }

    // ===== TEXTURES =====

    /// Bind a texture to a reflected texture binding
    ///
    /// Returns `Ok(false)` when this variant does not declare the texture.
    pub fn set_texture(&mut self, name: &str, texture: Arc<dyn Texture>) -> Result<bool> {
        let Some(index) = self.variant.sampler_bindings().iter().position(|b| b.name == name) else {
            return Ok(false);
        };
        let expected = self.variant.sampler_bindings()[index].texture_type;
        if texture.info().texture_type != expected {
            return Err(Error::InvalidParameter(format!(
                "texture '{}' expects {:?}, got {:?}",
                name, expected, texture.info().texture_type
            )));
        }
        self.textures[index] = Some(texture);
        Ok(true)
    }

    pub fn texture(&self, name: &str) -> Option<&Arc<dyn Texture>> {
        self.variant
            .sampler_bindings()
            .iter()
            .position(|b| b.name == name)
            .and_then(|index| self.textures[index].as_ref())
    }

    /// Texture bindings with whatever is currently bound to them
    pub fn textures(&self) -> impl Iterator<Item = (&TextureSamplerBinding, Option<&Arc<dyn Texture>>)> {
        self.variant
            .sampler_bindings()
            .iter()
            .zip(self.textures.iter().map(|t| t.as_ref()))
    }

    // ===== UPLOAD =====

    /// Upload every modified shadow to its constant buffer
    ///
    /// Returns the number of buffers uploaded.
    pub fn update_constant_buffers(&mut self) -> Result<usize> {
        let mut uploaded = 0;
        for slot in self.slots.iter_mut().filter(|slot| slot.dirty) {
            slot.buffer.update(0, &slot.shadow)
                .map_err(|e| e.logged("galaxy3d::ShaderVariantInstance"))?;
            slot.dirty = false;
            uploaded += 1;
        }
        Ok(uploaded)
    }
}

#[cfg(test)]
#[path = "variant_instance_tests.rs"]
mod tests;
