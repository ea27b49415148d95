//! Software graphics backend.
//!
//! Keeps one RGBA8 framebuffer per window surface and emulates display sync
//! by sleeping for one frame interval on every swap.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use halcyon_core::graphics::{
    BaselineState, ConfigHandle, ConfigInfo, ConfigRequest, ContextHandle, DisplayHandle,
    GraphicsBackend, RendererInfo, SurfaceHandle, WindowHandle,
};

/// Counters the bridge reports after a session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameStats {
    pub frames_presented: u64,
    pub last_clear: Option<[u8; 4]>,
    pub displays_opened: u32,
    pub displays_terminated: u32,
    pub live_surfaces: usize,
    pub live_contexts: usize,
}

const CONFIGS: [(ConfigHandle, ConfigInfo); 2] = [
    (
        ConfigHandle(1),
        ConfigInfo {
            red_bits: 8,
            green_bits: 8,
            blue_bits: 8,
            depth_bits: 16,
            native_visual_id: 1,
        },
    ),
    (
        ConfigHandle(2),
        ConfigInfo {
            red_bits: 8,
            green_bits: 8,
            blue_bits: 8,
            depth_bits: 0,
            native_visual_id: 2,
        },
    ),
];

#[derive(Debug)]
pub struct SoftwareBackend {
    width: i32,
    height: i32,
    frame_interval: Duration,
    next_handle: u64,
    surfaces: HashMap<SurfaceHandle, Vec<[u8; 4]>>,
    contexts: Vec<ContextHandle>,
    current: Option<SurfaceHandle>,
    baseline: Option<BaselineState>,
    stats: Rc<RefCell<FrameStats>>,
}

impl SoftwareBackend {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            frame_interval: Duration::ZERO,
            next_handle: 1,
            surfaces: HashMap::new(),
            contexts: Vec::new(),
            current: None,
            baseline: None,
            stats: Rc::new(RefCell::new(FrameStats::default())),
        }
    }

    /// Sleep for `interval` on every swap, like a vsync'd display.
    pub fn with_frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = interval;
        self
    }

    /// Shared view of the counters; stays valid after the backend moves
    /// into the engine.
    pub fn stats(&self) -> Rc<RefCell<FrameStats>> {
        self.stats.clone()
    }

    fn next(&mut self) -> u64 {
        let id = self.next_handle;
        self.next_handle += 1;
        id
    }

    fn sync_counts(&self) {
        let mut stats = self.stats.borrow_mut();
        stats.live_surfaces = self.surfaces.len();
        stats.live_contexts = self.contexts.len();
    }
}

fn to_rgba8(rgba: [f32; 4]) -> [u8; 4] {
    rgba.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
}

impl GraphicsBackend for SoftwareBackend {
    fn open_display(&mut self) -> Option<DisplayHandle> {
        self.stats.borrow_mut().displays_opened += 1;
        Some(DisplayHandle(self.next()))
    }

    fn choose_configs(
        &mut self,
        _display: DisplayHandle,
        request: &ConfigRequest,
    ) -> Vec<ConfigHandle> {
        CONFIGS
            .iter()
            .filter(|(_, info)| {
                request.window_drawable
                    && info.red_bits >= request.red_bits
                    && info.green_bits >= request.green_bits
                    && info.blue_bits >= request.blue_bits
            })
            .map(|(cfg, _)| *cfg)
            .collect()
    }

    fn config_info(&self, _display: DisplayHandle, config: ConfigHandle) -> Option<ConfigInfo> {
        CONFIGS
            .iter()
            .find(|(cfg, _)| *cfg == config)
            .map(|(_, info)| *info)
    }

    fn create_window_surface(
        &mut self,
        _display: DisplayHandle,
        _config: ConfigHandle,
        window: WindowHandle,
        native_visual_id: i32,
    ) -> Option<SurfaceHandle> {
        let surface = SurfaceHandle(self.next());
        let pixels = (self.width * self.height) as usize;
        self.surfaces.insert(surface, vec![[0, 0, 0, 255]; pixels]);
        tracing::debug!(
            "Surface {:?} for window {:?} (visual {})",
            surface,
            window,
            native_visual_id
        );
        self.sync_counts();
        Some(surface)
    }

    fn create_context(
        &mut self,
        _display: DisplayHandle,
        _config: ConfigHandle,
    ) -> Option<ContextHandle> {
        let context = ContextHandle(self.next());
        self.contexts.push(context);
        self.sync_counts();
        Some(context)
    }

    fn make_current(
        &mut self,
        _display: DisplayHandle,
        binding: Option<(SurfaceHandle, ContextHandle)>,
    ) -> bool {
        match binding {
            Some((surface, context)) => {
                if !self.surfaces.contains_key(&surface) || !self.contexts.contains(&context) {
                    return false;
                }
                self.current = Some(surface);
            }
            None => self.current = None,
        }
        true
    }

    fn surface_size(&self, _display: DisplayHandle, _surface: SurfaceHandle) -> (i32, i32) {
        (self.width, self.height)
    }

    fn destroy_context(&mut self, _display: DisplayHandle, context: ContextHandle) {
        self.contexts.retain(|c| *c != context);
        self.sync_counts();
    }

    fn destroy_surface(&mut self, _display: DisplayHandle, surface: SurfaceHandle) {
        self.surfaces.remove(&surface);
        if self.current == Some(surface) {
            self.current = None;
        }
        self.sync_counts();
    }

    fn terminate(&mut self, _display: DisplayHandle) {
        self.stats.borrow_mut().displays_terminated += 1;
    }

    fn renderer_info(&self) -> RendererInfo {
        RendererInfo {
            vendor: "Halcyon".to_string(),
            renderer: "Software Rasterizer".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            extensions: String::new(),
        }
    }

    fn apply_baseline(&mut self, state: &BaselineState) {
        self.baseline = Some(*state);
    }

    fn clear(&mut self, rgba: [f32; 4]) {
        let Some(surface) = self.current else {
            return;
        };
        let color = to_rgba8(rgba);
        if let Some(pixels) = self.surfaces.get_mut(&surface) {
            pixels.fill(color);
            self.stats.borrow_mut().last_clear = Some(color);
        }
    }

    fn swap_buffers(&mut self, _display: DisplayHandle, surface: SurfaceHandle) -> bool {
        if !self.surfaces.contains_key(&surface) {
            return false;
        }
        if !self.frame_interval.is_zero() {
            std::thread::sleep(self.frame_interval);
        }
        self.stats.borrow_mut().frames_presented += 1;
        true
    }
}
