/// Shader module - keyword sets, variants, passes and techniques

pub mod keyword;
pub mod variant;
pub mod variant_instance;
pub mod tags;
pub mod pass;
pub mod pass_instance;
pub mod technique;

pub use keyword::{ShaderKeyword, ShaderKeywordBuilder};
pub use variant::{ShaderCode, ShaderVariant};
pub use variant_instance::{Color, ShaderVariantInstance};
pub use tags::ShaderTags;
pub use pass::Pass;
pub use pass_instance::{MissingVariantPolicy, PassInstance, SwitchOutcome};
pub use technique::{PassSwitchResult, SwitchReport, Technique, TechniqueInstance};
