//! The opaque renderer capability.
//!
//! The engine never talks to a graphics API directly. A backend exposes an
//! EGL-shaped set of calls (display, configurations, window surface,
//! context) plus the two drawing primitives the engine needs: clear and
//! present.

/// Connection to a display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DisplayHandle(pub u64);

/// A pixel-format configuration enumerated by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConfigHandle(pub u64);

/// A drawable bound to a host window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceHandle(pub u64);

/// A rendering context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextHandle(pub u64);

/// Opaque host window reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(pub u64);

/// Minimum attributes a configuration must have to be enumerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigRequest {
    pub window_drawable: bool,
    pub red_bits: u8,
    pub green_bits: u8,
    pub blue_bits: u8,
}

impl ConfigRequest {
    pub fn rgb(bits: u8) -> Self {
        Self {
            window_drawable: true,
            red_bits: bits,
            green_bits: bits,
            blue_bits: bits,
        }
    }
}

/// Attributes of an enumerated configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConfigInfo {
    pub red_bits: u8,
    pub green_bits: u8,
    pub blue_bits: u8,
    pub depth_bits: u8,
    /// Pixel format the host window buffers must use with this config.
    pub native_visual_id: i32,
}

/// Render state applied once after a context becomes current.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaselineState {
    pub cull_face: bool,
    pub depth_test: bool,
}

impl Default for BaselineState {
    fn default() -> Self {
        Self {
            cull_face: true,
            depth_test: false,
        }
    }
}

/// Strings the backend reports about its implementation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RendererInfo {
    pub vendor: String,
    pub renderer: String,
    pub version: String,
    pub extensions: String,
}

/// Graphics backend. Failures are reported as `None`/`false` and turned into
/// [`SurfaceError`](crate::error::SurfaceError)s by the surface manager.
pub trait GraphicsBackend {
    /// Connect to and initialize the default display.
    fn open_display(&mut self) -> Option<DisplayHandle>;

    /// All configurations satisfying `request`, in backend preference order.
    fn choose_configs(&mut self, display: DisplayHandle, request: &ConfigRequest)
    -> Vec<ConfigHandle>;

    fn config_info(&self, display: DisplayHandle, config: ConfigHandle) -> Option<ConfigInfo>;

    fn create_window_surface(
        &mut self,
        display: DisplayHandle,
        config: ConfigHandle,
        window: WindowHandle,
        native_visual_id: i32,
    ) -> Option<SurfaceHandle>;

    fn create_context(
        &mut self,
        display: DisplayHandle,
        config: ConfigHandle,
    ) -> Option<ContextHandle>;

    /// Bind `binding` on the calling thread, or unbind when `None`.
    fn make_current(
        &mut self,
        display: DisplayHandle,
        binding: Option<(SurfaceHandle, ContextHandle)>,
    ) -> bool;

    /// Width and height of the drawable, in pixels.
    fn surface_size(&self, display: DisplayHandle, surface: SurfaceHandle) -> (i32, i32);

    fn destroy_context(&mut self, display: DisplayHandle, context: ContextHandle);

    fn destroy_surface(&mut self, display: DisplayHandle, surface: SurfaceHandle);

    /// Release the display connection.
    fn terminate(&mut self, display: DisplayHandle);

    fn renderer_info(&self) -> RendererInfo;

    fn apply_baseline(&mut self, state: &BaselineState);

    /// Clear the color buffer of the current surface.
    fn clear(&mut self, rgba: [f32; 4]);

    /// Present the back buffer. Blocks on display sync where the backend has it.
    fn swap_buffers(&mut self, display: DisplayHandle, surface: SurfaceHandle) -> bool;
}
