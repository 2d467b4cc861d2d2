//! Control-panel state: speed multiplier, render mode, wave shape.

use crate::wave::WaveShape;

/// Shader rendering mode, passed as the `mode` uniform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    #[default]
    Normal,
    ThreeD,
}

impl RenderMode {
    pub fn as_uniform(self) -> i32 {
        match self {
            RenderMode::Normal => 1,
            RenderMode::ThreeD => 2,
        }
    }
}

/// Live settings mutated by the panel and read every frame.
#[derive(Debug, Clone, Copy)]
pub struct Settings {
    /// Simulation speed multiplier, panel range [-5, 5].
    pub speed: f32,
    pub mode: RenderMode,
    pub shape: WaveShape,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            speed: 1.0,
            mode: RenderMode::default(),
            shape: WaveShape::default(),
        }
    }
}
