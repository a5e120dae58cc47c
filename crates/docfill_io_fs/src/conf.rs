//! Output naming constants and default presets.

use crate::spec::SpecRenderOptions;

/// Default output directory, relative to the working directory.
pub const C_DIR_OUTPUT_DEFAULT: &str = "AutomaticDocEditor";
/// Characters not allowed in output file names.
pub const TUP_FILENAME_ILLEGAL: [char; 9] = [':', '\\', '/', '*', '?', '"', '<', '>', '|'];
/// File stem used when sanitizing leaves nothing.
pub const C_FILE_STEM_FALLBACK: &str = "unnamed";
/// First numeric suffix tried by [`crate::spec::EnumFilenameCollisionStrategy::Suffix`].
pub const N_SUFFIX_COLLISION_START: usize = 2;

/// Build default render options.
pub fn derive_default_render_options() -> SpecRenderOptions {
    SpecRenderOptions::default()
}
