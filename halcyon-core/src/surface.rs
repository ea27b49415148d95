//! Display-surface and rendering-context lifecycle.
//!
//! The [`RenderTarget`] is all-or-nothing: either every handle is live and
//! the target can be drawn to, or it holds nothing. Partially built
//! bindings only exist inside [`SurfaceManager::acquire`] and are torn down
//! there before an error is returned.

use crate::config::EngineConfig;
use crate::error::SurfaceError;
use crate::graphics::{
    BaselineState, ConfigHandle, ConfigRequest, ContextHandle, DisplayHandle, GraphicsBackend,
    SurfaceHandle, WindowHandle,
};
use crate::state::{EngineFlags, PersistableState};

/// A live display/surface/context binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub display: DisplayHandle,
    pub surface: SurfaceHandle,
    pub context: ContextHandle,
    pub width: i32,
    pub height: i32,
}

/// The application window's binding to the graphics backend, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderTarget {
    binding: Option<Binding>,
}

impl RenderTarget {
    /// A torn-down target.
    pub fn invalid() -> Self {
        Self { binding: None }
    }

    pub fn is_valid(&self) -> bool {
        self.binding.is_some()
    }

    pub fn binding(&self) -> Option<&Binding> {
        self.binding.as_ref()
    }

    pub fn size(&self) -> Option<(i32, i32)> {
        self.binding.map(|b| (b.width, b.height))
    }
}

/// Clear color for a frame: pointer x across the width, the animation
/// angle, pointer y down the height. Opaque.
pub fn clear_color(state: &PersistableState, width: i32, height: i32) -> [f32; 4] {
    let ratio = |pos: i32, extent: i32| {
        if extent > 0 {
            pos as f32 / extent as f32
        } else {
            0.0
        }
    };
    [ratio(state.x, width), state.angle, ratio(state.y, height), 1.0]
}

/// Owns the graphics backend and sequences acquisition and teardown on it.
pub struct SurfaceManager {
    backend: Box<dyn GraphicsBackend>,
    request: ConfigRequest,
    log_renderer_info: bool,
}

impl std::fmt::Debug for SurfaceManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurfaceManager")
            .field("backend", &"Box<dyn GraphicsBackend>")
            .field("request", &self.request)
            .finish()
    }
}

impl SurfaceManager {
    pub fn new(backend: Box<dyn GraphicsBackend>, config: &EngineConfig) -> Self {
        Self {
            backend,
            request: ConfigRequest::rgb(config.color_bits),
            log_renderer_info: config.log_renderer_info,
        }
    }

    /// Bind a surface and context to `window`.
    ///
    /// On success the baseline render state is applied and the persisted
    /// angle restarts at 0. On failure every handle created along the way
    /// has already been released.
    pub fn acquire(
        &mut self,
        window: WindowHandle,
        state: &mut PersistableState,
    ) -> Result<RenderTarget, SurfaceError> {
        let backend = self.backend.as_mut();

        let Some(display) = backend.open_display() else {
            tracing::debug!("No display connection");
            return Err(SurfaceError::Config);
        };

        let Some(config) = self.choose_config(display) else {
            self.backend.terminate(display);
            return Err(SurfaceError::Config);
        };

        let backend = self.backend.as_mut();

        // The host reconfigures its window buffers to match this format.
        let visual_id = backend
            .config_info(display, config)
            .map(|info| info.native_visual_id)
            .unwrap_or_default();

        let Some(surface) = backend.create_window_surface(display, config, window, visual_id)
        else {
            backend.terminate(display);
            return Err(SurfaceError::Bind("window surface creation failed".into()));
        };

        let Some(context) = backend.create_context(display, config) else {
            backend.destroy_surface(display, surface);
            backend.terminate(display);
            return Err(SurfaceError::Bind("context creation failed".into()));
        };

        if !backend.make_current(display, Some((surface, context))) {
            backend.destroy_context(display, context);
            backend.destroy_surface(display, surface);
            backend.terminate(display);
            return Err(SurfaceError::Bind("make current failed".into()));
        }

        let (width, height) = backend.surface_size(display, surface);

        if self.log_renderer_info {
            let info = backend.renderer_info();
            tracing::info!("Renderer vendor: {}", info.vendor);
            tracing::info!("Renderer: {}", info.renderer);
            tracing::info!("Renderer version: {}", info.version);
            tracing::info!("Renderer extensions: {}", info.extensions);
        }

        backend.apply_baseline(&BaselineState::default());
        state.angle = 0.0;

        tracing::info!("Render target ready ({}x{})", width, height);

        Ok(RenderTarget {
            binding: Some(Binding {
                display,
                surface,
                context,
                width,
                height,
            }),
        })
    }

    /// Tear down `target`. Safe on a target that was never acquired or has
    /// already been released. Always leaves the target invalid and stops
    /// animation, since nothing can be drawn without a surface.
    pub fn release(&mut self, target: &mut RenderTarget, flags: &mut EngineFlags) {
        if let Some(b) = target.binding.take() {
            let backend = self.backend.as_mut();
            backend.make_current(b.display, None);
            backend.destroy_context(b.display, b.context);
            backend.destroy_surface(b.display, b.surface);
            backend.terminate(b.display);
            tracing::info!("Render target released");
        }
        flags.animating = false;
    }

    /// Clear to the state-derived color and present. Returns whether a frame
    /// reached the display. A failed swap is logged and otherwise ignored;
    /// the target and state are left untouched.
    pub fn present(&mut self, target: &RenderTarget, state: &PersistableState) -> bool {
        let Some(b) = target.binding.as_ref() else {
            return false;
        };
        self.backend.clear(clear_color(state, b.width, b.height));
        let swapped = self.backend.swap_buffers(b.display, b.surface);
        if !swapped {
            tracing::trace!("swap_buffers reported failure");
        }
        swapped
    }

    /// Prefer an exact RGB match with no depth buffer, else the backend's
    /// first offer.
    fn choose_config(&mut self, display: DisplayHandle) -> Option<ConfigHandle> {
        let configs = self.backend.choose_configs(display, &self.request);
        let exact = configs.iter().copied().find(|&cfg| {
            self.backend.config_info(display, cfg).is_some_and(|info| {
                info.red_bits == self.request.red_bits
                    && info.green_bits == self.request.green_bits
                    && info.blue_bits == self.request.blue_bits
                    && info.depth_bits == 0
            })
        });
        if exact.is_none() && !configs.is_empty() {
            tracing::debug!("No exact configuration match; using first of {}", configs.len());
        }
        exact.or_else(|| configs.first().copied())
    }
}
