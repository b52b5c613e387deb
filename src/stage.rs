use std::collections::HashMap;
use std::path::{Path, PathBuf};
use raylib::prelude::*;

use crate::constants::*;
use crate::error::ViewerError;
use crate::texture_loader::{load_texture_with_exif_rotation, resolve_asset};
use crate::viewer::{ImageRenderer, ModelRequest, ThreeDRenderer};

const MODEL_EXTENSIONS: [&str; 6] = ["glb", "gltf", "obj", "iqm", "vox", "m3d"];

/// Textures and models keyed by asset reference. Failures are remembered so
/// a broken asset is only attempted once.
pub struct AssetCache {
    base_dir: PathBuf,
    textures: HashMap<String, Option<Texture2D>>,
    models: HashMap<String, Result<Model, ViewerError>>,
}

impl AssetCache {
    pub fn new(base_dir: &Path) -> Self {
        Self {
            base_dir: base_dir.to_path_buf(),
            textures: HashMap::new(),
            models: HashMap::new(),
        }
    }

    pub fn ensure_texture(&mut self, rl: &mut RaylibHandle, thread: &RaylibThread, reference: &str) {
        if self.textures.contains_key(reference) {
            return;
        }
        let loaded = resolve_asset(&self.base_dir, reference)
            .and_then(|path| load_texture_with_exif_rotation(rl, thread, &path));
        let texture = match loaded {
            Ok(texture) => Some(texture),
            Err(e) => {
                log::warn!("skipping image {}: {}", reference, e);
                None
            }
        };
        self.textures.insert(reference.to_string(), texture);
    }

    pub fn texture(&self, reference: &str) -> Option<&Texture2D> {
        self.textures.get(reference).and_then(Option::as_ref)
    }

    fn ensure_model(&mut self, rl: &mut RaylibHandle, thread: &RaylibThread, reference: &str) {
        if self.models.contains_key(reference) {
            return;
        }
        let model = load_model(rl, thread, &self.base_dir, reference);
        self.models.insert(reference.to_string(), model);
    }
}

fn load_model(
    rl: &mut RaylibHandle,
    thread: &RaylibThread,
    base_dir: &Path,
    reference: &str,
) -> Result<Model, ViewerError> {
    let load_error = |reason: String| ViewerError::Load { src: reference.to_string(), reason };

    let path = resolve_asset(base_dir, reference).map_err(|e| load_error(e.to_string()))?;
    let extension = path.extension().and_then(|s| s.to_str()).unwrap_or("").to_lowercase();
    if !MODEL_EXTENSIONS.contains(&extension.as_str()) {
        return Err(ViewerError::UnsupportedFormat(reference.to_string()));
    }
    if !path.is_file() {
        return Err(load_error(format!("{:?} does not exist", path)));
    }
    let path = path.to_str().ok_or_else(|| load_error("path is not valid UTF-8".to_string()))?;

    let model = rl.load_model(thread, path).map_err(|e| load_error(e.to_string()))?;
    log::info!("loaded 3D model {}", reference);
    Ok(model)
}

// Orbit camera around the origin
struct Orbit {
    yaw: f32,
    pitch: f32,
    distance: f32,
}

impl Default for Orbit {
    fn default() -> Self {
        Self { yaw: 0.8, pitch: 0.35, distance: 4.0 }
    }
}

impl Orbit {
    fn camera(&self) -> Camera3D {
        let position = Vector3::new(
            self.distance * self.pitch.cos() * self.yaw.sin(),
            self.distance * self.pitch.sin(),
            self.distance * self.pitch.cos() * self.yaw.cos(),
        );
        Camera3D::perspective(position, Vector3::zero(), Vector3::new(0.0, 1.0, 0.0), 45.0)
    }
}

/// What the draw pass should put on the stage this frame.
#[derive(Debug, Clone, PartialEq)]
enum Staged {
    Empty,
    Model { label: String },
    Image { src: String, label: String },
    Failed { label: String },
}

/// The carousel's display area: an offscreen target for the 3D viewer and
/// the slide staged for drawing.
pub struct Stage {
    pub assets: AssetCache,
    rect: Rectangle,
    render_target: Option<RenderTexture2D>,
    orbit: Orbit,
    orbit_src: Option<String>,
    staged: Staged,
}

impl Stage {
    pub fn new(base_dir: &Path) -> Self {
        Self {
            assets: AssetCache::new(base_dir),
            rect: Rectangle::new(0.0, 0.0, 0.0, 0.0),
            render_target: None,
            orbit: Orbit::default(),
            orbit_src: None,
            staged: Staged::Empty,
        }
    }

    pub fn set_rect(&mut self, rect: Rectangle) {
        self.rect = rect;
    }

    /// Starts a frame: the carousel renders into the returned pass before
    /// drawing begins.
    pub fn pass<'a>(&'a mut self, rl: &'a mut RaylibHandle, thread: &'a RaylibThread) -> StagePass<'a> {
        self.staged = Staged::Empty;
        StagePass { rl, thread, stage: self }
    }

    pub fn draw(&self, d: &mut RaylibDrawHandle) {
        let rect = self.rect;
        d.draw_rectangle_rec(rect, Color::new(250, 250, 250, 255));

        match &self.staged {
            Staged::Empty => {}
            Staged::Model { label } => {
                if let Some(target) = &self.render_target {
                    // Render textures are stored upside down
                    d.draw_texture_pro(
                        target,
                        Rectangle::new(0.0, 0.0, target.width() as f32, -(target.height() as f32)),
                        rect,
                        Vector2::new(0.0, 0.0),
                        0.0,
                        Color::WHITE,
                    );
                }
                d.draw_text(label, rect.x as i32 + 12, (rect.y + rect.height) as i32 - 28, 16, Color::GRAY);
            }
            Staged::Image { src, label } => match self.assets.texture(src) {
                Some(texture) => draw_cover(d, texture, rect),
                None => draw_unavailable(d, rect, label),
            },
            Staged::Failed { label } => draw_unavailable(d, rect, label),
        }

        d.draw_rectangle_lines_ex(rect, 1.0, Color::new(229, 229, 229, 255));
    }
}

pub struct StagePass<'a> {
    rl: &'a mut RaylibHandle,
    thread: &'a RaylibThread,
    stage: &'a mut Stage,
}

impl StagePass<'_> {
    fn update_orbit(&mut self, request: &ModelRequest<'_>) {
        let Stage { orbit, orbit_src, rect, .. } = &mut *self.stage;

        // A different model starts from the default view
        if orbit_src.as_deref() != Some(request.src) {
            *orbit = Orbit::default();
            *orbit_src = Some(request.src.to_string());
            log::debug!("3D viewer mounted: {:?}", request.attributes());
        }

        let mouse = self.rl.get_mouse_position();
        let hovering = contains(*rect, mouse);
        let dragging = request.options.camera_controls
            && hovering
            && self.rl.is_mouse_button_down(MouseButton::MOUSE_BUTTON_RIGHT);

        if dragging {
            let delta = self.rl.get_mouse_delta();
            orbit.yaw -= delta.x * ORBIT_SENSITIVITY;
            orbit.pitch = (orbit.pitch + delta.y * ORBIT_SENSITIVITY).clamp(-1.4, 1.4);
        } else if request.options.auto_rotate {
            orbit.yaw += AUTO_ROTATE_SPEED * self.rl.get_frame_time();
        }

        if request.options.camera_controls && hovering {
            let wheel = self.rl.get_mouse_wheel_move();
            orbit.distance = (orbit.distance - wheel * 0.5).clamp(MIN_ZOOM_DISTANCE, MAX_ZOOM_DISTANCE);
        }
    }

    fn ensure_render_target(&mut self) -> Result<(), ViewerError> {
        let width = self.stage.rect.width.max(1.0) as u32;
        let height = self.stage.rect.height.max(1.0) as u32;
        let resized = match &self.stage.render_target {
            Some(target) => target.width() as u32 != width || target.height() as u32 != height,
            None => true,
        };
        if resized {
            let target = self
                .rl
                .load_render_texture(self.thread, width, height)
                .map_err(|e| ViewerError::Load { src: "render target".to_string(), reason: e.to_string() })?;
            self.stage.render_target = Some(target);
        }
        Ok(())
    }
}

impl ThreeDRenderer for StagePass<'_> {
    fn render_model(&mut self, request: &ModelRequest<'_>) -> Result<(), ViewerError> {
        self.stage.assets.ensure_model(self.rl, self.thread, request.src);
        if let Some(alternate) = request.alternate {
            log::trace!("alternate format {} is not used on desktop", alternate);
        }

        let failure = match self.stage.assets.models.get(request.src) {
            Some(Err(e)) => Some(e.clone()),
            Some(Ok(_)) => None,
            None => Some(ViewerError::Load { src: request.src.to_string(), reason: "not loaded".to_string() }),
        };
        if let Some(e) = failure {
            self.stage.staged = Staged::Failed { label: request.label.to_string() };
            return Err(e);
        }

        self.update_orbit(request);
        if let Err(e) = self.ensure_render_target() {
            self.stage.staged = Staged::Failed { label: request.label.to_string() };
            return Err(e);
        }

        let thread = self.thread;
        let Stage { assets, render_target, orbit, .. } = &mut *self.stage;
        let (Some(Ok(model)), Some(target)) = (assets.models.get(request.src), render_target.as_mut()) else {
            return Ok(());
        };
        let camera = orbit.camera();
        let level = (255.0 * request.options.exposure.unwrap_or(1.0).clamp(0.0, 1.0)) as u8;
        let tint = Color::new(level, level, level, 255);

        self.rl.draw_texture_mode(thread, target, |mut tmd| {
            let mut d = tmd.begin_drawing(thread);
            d.clear_background(Color::new(250, 250, 250, 255));
            let mut d3 = d.begin_mode3D(camera);
            d3.draw_model(model, Vector3::zero(), 1.0, tint);
        });

        self.stage.staged = Staged::Model { label: request.label.to_string() };
        Ok(())
    }
}

impl ImageRenderer for StagePass<'_> {
    fn render_image(&mut self, src: &str, label: &str) {
        self.stage.assets.ensure_texture(self.rl, self.thread, src);
        self.stage.staged = Staged::Image { src: src.to_string(), label: label.to_string() };
    }
}

pub fn contains(rect: Rectangle, point: Vector2) -> bool {
    point.x >= rect.x
        && point.x <= rect.x + rect.width
        && point.y >= rect.y
        && point.y <= rect.y + rect.height
}

/// Scales the texture to cover `rect`, cropping the overflow evenly.
pub fn draw_cover(d: &mut RaylibDrawHandle, texture: &Texture2D, rect: Rectangle) {
    let tex_width = texture.width() as f32;
    let tex_height = texture.height() as f32;
    if tex_width <= 0.0 || tex_height <= 0.0 {
        return;
    }

    let scale = (rect.width / tex_width).max(rect.height / tex_height);
    let src_width = rect.width / scale;
    let src_height = rect.height / scale;
    let source = Rectangle::new(
        (tex_width - src_width) * 0.5,
        (tex_height - src_height) * 0.5,
        src_width,
        src_height,
    );

    d.draw_texture_pro(texture, source, rect, Vector2::new(0.0, 0.0), 0.0, Color::WHITE);
}

fn draw_unavailable(d: &mut RaylibDrawHandle, rect: Rectangle, label: &str) {
    d.draw_text("Unavailable", rect.x as i32 + 12, rect.y as i32 + 12, 20, Color::LIGHTGRAY);
    d.draw_text(label, rect.x as i32 + 12, rect.y as i32 + 38, 16, Color::GRAY);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_inclusive() {
        let rect = Rectangle::new(10.0, 10.0, 100.0, 50.0);
        assert!(contains(rect, Vector2::new(10.0, 10.0)));
        assert!(contains(rect, Vector2::new(110.0, 60.0)));
        assert!(!contains(rect, Vector2::new(9.0, 30.0)));
        assert!(!contains(rect, Vector2::new(50.0, 61.0)));
    }

    #[test]
    fn orbit_camera_keeps_distance() {
        let orbit = Orbit { yaw: 1.2, pitch: -0.4, distance: 6.0 };
        let camera = orbit.camera();
        let p = camera.position;
        let length = (p.x * p.x + p.y * p.y + p.z * p.z).sqrt();
        assert!((length - 6.0).abs() < 1e-4);
    }
}
