//! Sampler-filter × cull-mode technique state machine.
//!
//! Every combination of the two axes maps to one named, precompiled
//! technique in the host's shader program. The full table is resolved
//! eagerly at construction and toggles swap the active handle by table
//! lookup, so the active technique always matches the current
//! `(filter, cull)` pair by construction — there is no branching that
//! could leave a stale handle behind.

use glam::Mat4;
use log::warn;

use crate::device::{ShaderProgram, TechniqueHandle, TextureHandle};

/// Texture sampling filter axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplerFilter {
    Point,
    Linear,
    Anisotropic,
}

impl SamplerFilter {
    pub const COUNT: usize = 3;
    pub const ALL: [Self; Self::COUNT] = [Self::Point, Self::Linear, Self::Anisotropic];

    /// Advances the axis cyclically.
    #[must_use]
    pub fn next(self) -> Self {
        Self::ALL[(self as usize + 1) % Self::COUNT]
    }

    fn technique_name_part(self) -> &'static str {
        match self {
            Self::Point => "Point",
            Self::Linear => "Linear",
            Self::Anisotropic => "Anisotropic",
        }
    }
}

/// GPU-side face culling axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CullMode {
    Back,
    Front,
    None,
}

impl CullMode {
    pub const COUNT: usize = 3;
    pub const ALL: [Self; Self::COUNT] = [Self::Back, Self::Front, Self::None];

    /// Advances the axis cyclically.
    #[must_use]
    pub fn next(self) -> Self {
        Self::ALL[(self as usize + 1) % Self::COUNT]
    }

    fn technique_name_part(self) -> &'static str {
        match self {
            Self::Back => "BackCull",
            Self::Front => "FrontCull",
            Self::None => "NoCull",
        }
    }
}

/// Which axes the loaded shader program exposes as technique variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TechniqueVariants {
    /// Three techniques, one per sampling filter; culling is fixed in the
    /// shader itself.
    FilterOnly,
    /// Nine techniques, the full filter × cull cross-product.
    FilterAndCull,
}

/// Resolved technique table plus the currently active handle.
pub struct TechniqueSet {
    program: Box<dyn ShaderProgram>,
    variants: TechniqueVariants,
    filter: SamplerFilter,
    cull: CullMode,
    /// Indexed `[filter][cull]`. `None` marks a technique the program
    /// failed to resolve; rendering degrades but does not stop.
    table: [[Option<TechniqueHandle>; CullMode::COUNT]; SamplerFilter::COUNT],
    active: Option<TechniqueHandle>,
}

impl TechniqueSet {
    /// Resolves every axis combination eagerly from the compiled program.
    ///
    /// Unresolved names are logged and left empty; the initial active
    /// technique is the (point sampling, no culling) combination.
    pub fn new(program: Box<dyn ShaderProgram>, variants: TechniqueVariants) -> Self {
        let mut table = [[None; CullMode::COUNT]; SamplerFilter::COUNT];

        for filter in SamplerFilter::ALL {
            for cull in CullMode::ALL {
                let name = technique_name(variants, filter, cull);
                let handle = program.technique(&name);
                if handle.is_none() {
                    warn!("technique `{name}` not found in shader program");
                }
                table[filter as usize][cull as usize] = handle;
            }
        }

        let filter = SamplerFilter::Point;
        let cull = CullMode::None;
        let active = table[filter as usize][cull as usize];

        Self {
            program,
            variants,
            filter,
            cull,
            table,
            active,
        }
    }

    /// Advances the sampling axis and re-resolves the active handle.
    pub fn toggle_filter(&mut self) -> SamplerFilter {
        self.filter = self.filter.next();
        self.active = self.table[self.filter as usize][self.cull as usize];
        self.filter
    }

    /// Advances the culling axis and re-resolves the active handle.
    ///
    /// For [`TechniqueVariants::FilterOnly`] programs all cull columns
    /// share one technique, so this cycles the reported mode without
    /// changing the handle.
    pub fn toggle_cull(&mut self) -> CullMode {
        self.cull = self.cull.next();
        self.active = self.table[self.filter as usize][self.cull as usize];
        self.cull
    }

    /// Currently active technique, if its name resolved at load.
    #[inline]
    pub fn active_technique(&self) -> Option<TechniqueHandle> {
        self.active
    }

    /// Pass count of the active technique (0 when unresolved).
    pub fn active_pass_count(&self) -> u32 {
        self.active.map_or(0, |t| self.program.pass_count(t))
    }

    #[inline]
    pub fn filter(&self) -> SamplerFilter {
        self.filter
    }

    #[inline]
    pub fn cull(&self) -> CullMode {
        self.cull
    }

    #[inline]
    pub fn variants(&self) -> TechniqueVariants {
        self.variants
    }

    /// Writes a named matrix parameter. Missing parameters are a logged
    /// no-op so shader variants that omit optional slots keep working.
    pub fn bind_matrix(&mut self, name: &str, value: &Mat4) {
        if self.program.has_parameter(name) {
            self.program.set_matrix(name, value);
        } else {
            warn!("shader parameter `{name}` not present; skipping matrix bind");
        }
    }

    /// Writes a named texture parameter. Missing parameters are a logged
    /// no-op, like [`bind_matrix`](Self::bind_matrix).
    pub fn bind_texture(&mut self, name: &str, texture: TextureHandle) {
        if self.program.has_parameter(name) {
            self.program.set_texture(name, texture);
        } else {
            warn!("shader parameter `{name}` not present; skipping texture bind");
        }
    }
}

impl std::fmt::Debug for TechniqueSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TechniqueSet")
            .field("variants", &self.variants)
            .field("filter", &self.filter)
            .field("cull", &self.cull)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

fn technique_name(variants: TechniqueVariants, filter: SamplerFilter, cull: CullMode) -> String {
    match variants {
        TechniqueVariants::FilterOnly => format!("{}Technique", filter.technique_name_part()),
        TechniqueVariants::FilterAndCull => format!(
            "{}{}Technique",
            filter.technique_name_part(),
            cull.technique_name_part()
        ),
    }
}
