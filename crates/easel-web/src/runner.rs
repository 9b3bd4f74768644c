use easel_engine::{
    Game, GameConfig, EngineContext, RenderContext,
    InputEvent, InputQueue, InputState, RenderBuffer,
    FrameClock, FrameTime, ProtocolLayout, SceneManifest, ManifestError, EntityRegistry,
};
use easel_engine::bridge::protocol::{
    HEADER_AMBIENT_B, HEADER_AMBIENT_G, HEADER_AMBIENT_R, HEADER_CAMERA_X, HEADER_CAMERA_Y,
    HEADER_CAMERA_Z, HEADER_FLOATS, HEADER_FRAME_COUNTER, HEADER_INSTANCE_COUNT,
    HEADER_LIGHT_COUNT, HEADER_LOCK, HEADER_MATERIAL_COUNT, HEADER_MAX_INSTANCES,
    HEADER_PROTOCOL_VERSION, HEADER_TOTAL_TIME, HEADER_VIEWPORT_HEIGHT, HEADER_VIEWPORT_WIDTH,
    PROTOCOL_VERSION,
};
use easel_engine::systems::render::build_render_buffer;

/// Generic scene runner that wires up the engine loop.
///
/// Each concrete scene (e.g., `bounce-demo`) creates a `thread_local!`
/// SceneRunner and exports free functions via `#[wasm_bindgen]`, because
/// wasm-bindgen cannot export generic structs directly.
pub struct SceneRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    input: InputQueue,
    input_state: InputState,
    render_buffer: RenderBuffer,
    clock: FrameClock,
    config: GameConfig,
    layout: ProtocolLayout,
    /// Flat buffer the host renderer reads; laid out by `layout`.
    frame_buffer: Vec<f32>,
    registry: EntityRegistry,
    initialized: bool,
}

impl<G: Game> SceneRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        let layout = ProtocolLayout::from_config(&config);

        Self {
            game,
            ctx: EngineContext::from_config(&config),
            input: InputQueue::new(),
            input_state: InputState::new(),
            render_buffer: RenderBuffer::new(config.max_instances),
            clock: FrameClock::with_max_dt(config.max_dt),
            frame_buffer: vec![0.0; layout.buffer_total_floats],
            registry: EntityRegistry::new(),
            layout,
            config,
            initialized: false,
        }
    }

    /// Initialize the scene. Call once after construction.
    pub fn init(&mut self) {
        self.game.init(&mut self.ctx);
        self.initialized = true;
        log::debug!(
            "scene initialized: {} entities, {} floats of frame buffer",
            self.ctx.scene.len(),
            self.layout.buffer_total_floats
        );
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Spawn the entities and animation described by a JSON manifest.
    pub fn load_manifest(&mut self, json: &str) -> Result<(), ManifestError> {
        let manifest = SceneManifest::from_json(json)?;
        let registry = manifest.instantiate(&mut self.ctx)?;
        for (tag, id) in registry.iter() {
            self.registry.insert(tag, id);
        }
        Ok(())
    }

    /// Track a canvas resize.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.config.viewport_width = width;
        self.config.viewport_height = height;
        self.ctx.camera.resize(width, height);
    }

    /// Run one frame: clock, input, camera, scene logic, animation, then
    /// pack camera, lights, materials and instances into the frame buffer.
    pub fn tick(&mut self, dt: f32) {
        if !self.initialized {
            return;
        }

        let frame = self.clock.advance(dt);

        let events = self.input.drain();
        self.input_state.apply(&events);

        self.ctx.camera.update(frame.dt, &self.input_state);

        self.game.update(&mut self.ctx, &frame, &self.input_state);

        self.ctx.animator.update(&frame, &mut self.ctx.transforms);
        let finished = self.ctx.tweens.tick(frame.dt, &mut self.ctx.transforms);
        if finished > 0 {
            log::trace!("{} tweens finished", finished);
        }

        build_render_buffer(&self.ctx.scene, &self.ctx.transforms, &mut self.render_buffer);

        let mut camera = self.ctx.camera.uniform();
        {
            let mut render_ctx = RenderContext {
                render_buffer: &mut self.render_buffer,
                camera: &mut camera,
                transforms: &self.ctx.transforms,
            };
            self.game.render(&mut render_ctx);
        }

        self.write_frame_buffer(&frame, &camera);

        self.input_state.end_frame();
    }

    fn write_frame_buffer(&mut self, frame: &FrameTime, camera: &easel_engine::CameraUniform) {
        let count = self.render_buffer.instances.len().min(self.layout.max_instances);
        let lights = &self.ctx.lights;
        let materials = &self.ctx.materials;
        let ambient = lights.ambient();
        let buf = &mut self.frame_buffer;

        let header = &mut buf[..HEADER_FLOATS];
        header[HEADER_LOCK] = 1.0;
        header[HEADER_FRAME_COUNTER] = frame.frame_index as f32;
        header[HEADER_MAX_INSTANCES] = self.layout.max_instances as f32;
        header[HEADER_INSTANCE_COUNT] = count as f32;
        header[HEADER_TOTAL_TIME] = frame.total;
        header[HEADER_VIEWPORT_WIDTH] = self.config.viewport_width;
        header[HEADER_VIEWPORT_HEIGHT] = self.config.viewport_height;
        header[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        header[HEADER_CAMERA_X] = camera.position.x;
        header[HEADER_CAMERA_Y] = camera.position.y;
        header[HEADER_CAMERA_Z] = camera.position.z;
        header[HEADER_LIGHT_COUNT] = lights.count() as f32;
        header[HEADER_MATERIAL_COUNT] = materials.len().min(self.layout.max_materials) as f32;
        header[HEADER_AMBIENT_R] = ambient[0];
        header[HEADER_AMBIENT_G] = ambient[1];
        header[HEADER_AMBIENT_B] = ambient[2];

        let camera_floats: &[f32] = bytemuck::cast_slice(std::slice::from_ref(camera));
        buf[self.layout.camera_range()].copy_from_slice(camera_floats);

        copy_section(&mut buf[self.layout.light_range()], lights.as_floats());
        copy_section(&mut buf[self.layout.material_range()], materials.as_floats());

        let instance_floats = self.render_buffer.as_floats();
        let range = self.layout.instance_range(count);
        let len = range.len();
        buf[range].copy_from_slice(&instance_floats[..len]);

        buf[HEADER_LOCK] = 0.0;
    }

    // ---- Accessors ----

    pub fn ctx(&self) -> &EngineContext {
        &self.ctx
    }

    pub fn ctx_mut(&mut self) -> &mut EngineContext {
        &mut self.ctx
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    /// Entities spawned from manifests, by tag.
    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn frame_buffer(&self) -> &[f32] {
        &self.frame_buffer
    }

    // ---- Pointer accessors for host reads ----

    pub fn frame_buffer_ptr(&self) -> *const f32 {
        self.frame_buffer.as_ptr()
    }

    pub fn instance_count(&self) -> u32 {
        self.render_buffer.instance_count()
    }

    pub fn viewport_width(&self) -> f32 {
        self.config.viewport_width
    }

    pub fn viewport_height(&self) -> f32 {
        self.config.viewport_height
    }

    // ---- Capacity accessors (read by the host via wasm_bindgen exports) ----

    pub fn max_instances(&self) -> u32 {
        self.layout.max_instances as u32
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.layout.buffer_total_floats as u32
    }

    pub fn camera_data_offset(&self) -> u32 {
        self.layout.camera_data_offset as u32
    }

    pub fn instance_data_offset(&self) -> u32 {
        self.layout.instance_data_offset as u32
    }

    pub fn light_count(&self) -> u32 {
        self.ctx.lights.count() as u32
    }

    pub fn max_lights(&self) -> u32 {
        self.layout.max_lights() as u32
    }

    pub fn light_data_offset(&self) -> u32 {
        self.layout.light_data_offset as u32
    }

    pub fn material_count(&self) -> u32 {
        self.ctx.materials.len().min(self.layout.max_materials) as u32
    }

    pub fn max_materials(&self) -> u32 {
        self.layout.max_materials as u32
    }

    pub fn material_data_offset(&self) -> u32 {
        self.layout.material_data_offset as u32
    }
}

/// Copy as much of `src` as fits and zero the rest of the section.
fn copy_section(section: &mut [f32], src: &[f32]) {
    let len = src.len().min(section.len());
    section[..len].copy_from_slice(&src[..len]);
    section[len..].fill(0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use easel_engine::input::queue::keys;
    use easel_engine::{EasingCurve, EntityId, Light, Material, MeshId, RenderInstance, Tween};
    use glam::Vec3;

    /// Records the camera position each update saw.
    #[derive(Default)]
    struct Recorder {
        cube: Option<EntityId>,
        seen_camera: Vec<Vec3>,
    }

    impl Game for Recorder {
        fn config(&self) -> GameConfig {
            GameConfig {
                max_instances: 2,
                max_dt: 1.0,
                ..Default::default()
            }
        }

        fn init(&mut self, ctx: &mut EngineContext) {
            let id = ctx.spawn("cube");
            ctx.entity_mut(id).unwrap().mesh = Some(MeshId(0));
            self.cube = Some(id);
        }

        fn update(&mut self, ctx: &mut EngineContext, frame: &FrameTime, _input: &InputState) {
            self.seen_camera.push(ctx.camera.transform.position());
            let id = self.cube.unwrap();
            ctx.transform_mut(id).unwrap().set_position((frame.total, 0.0, 0.0));
        }
    }

    fn runner() -> SceneRunner<Recorder> {
        let mut r = SceneRunner::new(Recorder::default());
        r.init();
        r
    }

    #[test]
    fn tick_before_init_does_nothing() {
        let mut r = SceneRunner::new(Recorder::default());
        r.tick(0.1);
        assert!(r.frame_buffer().iter().all(|&f| f == 0.0));
    }

    #[test]
    fn header_is_filled() {
        let mut r = runner();
        r.tick(0.1);
        r.tick(0.1);
        let buf = r.frame_buffer();
        assert_eq!(buf[HEADER_LOCK], 0.0);
        assert_eq!(buf[HEADER_FRAME_COUNTER], 1.0);
        assert_eq!(buf[HEADER_MAX_INSTANCES], 2.0);
        assert_eq!(buf[HEADER_INSTANCE_COUNT], 1.0);
        assert!((buf[HEADER_TOTAL_TIME] - 0.2).abs() < 1e-6);
        assert_eq!(buf[HEADER_PROTOCOL_VERSION], PROTOCOL_VERSION);
        assert_eq!(buf[HEADER_CAMERA_Z], -10.0);
    }

    #[test]
    fn instance_section_holds_world_matrix() {
        let mut r = runner();
        r.tick(0.2);
        r.tick(0.3);
        let off = r.instance_data_offset() as usize;
        let inst = &r.frame_buffer()[off..off + RenderInstance::FLOATS];
        // Translation column of the world matrix.
        assert!((inst[12] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn camera_moves_before_game_update() {
        let mut r = runner();
        r.push_input(InputEvent::KeyDown { key_code: keys::W });
        r.tick(0.1);
        let seen = r.game().seen_camera[0];
        assert!((seen.z - (-9.9)).abs() < 1e-5, "got {:?}", seen);
    }

    #[test]
    fn tweens_run_after_game_update() {
        let mut r = runner();
        let cube = r.game().cube.unwrap();
        let t = r.ctx().transform_id(cube).unwrap();
        r.ctx_mut().tweens.add(t, Tween::scale_uniform(1.0, 3.0, 0.1, EasingCurve::EaseOutQuad));
        r.tick(0.1);
        assert!((r.ctx().transform(cube).unwrap().scale().x - 3.0).abs() < 1e-5);
        assert!(r.ctx().tweens.is_empty());
    }

    #[test]
    fn manifest_entities_are_registered() {
        let mut r = runner();
        r.load_manifest(r#"{ "entities": [ { "tag": "ground", "mesh": 1 } ] }"#).unwrap();
        assert!(r.registry().contains("ground"));
        r.tick(0.1);
        assert_eq!(r.instance_count(), 2);

        assert!(r.load_manifest("{").is_err());
    }

    #[test]
    fn rejected_manifest_leaves_scene_alone() {
        let mut r = runner();
        let cycle = r#"{ "entities": [
            { "tag": "a", "parent": "b", "mesh": 0 },
            { "tag": "b", "parent": "a", "mesh": 0 }
        ] }"#;
        assert!(r.load_manifest(cycle).is_err());
        // Clashes with the game's own entity.
        assert!(r.load_manifest(r#"{ "entities": [ { "tag": "cube" } ] }"#).is_err());

        assert_eq!(r.ctx().scene.len(), 1);
        assert!(r.registry().is_empty());
        r.tick(0.1);
        assert_eq!(r.instance_count(), 1);
    }

    #[test]
    fn lights_and_materials_are_packed() {
        let mut r = runner();
        r.ctx_mut().lights.set_ambient(0.1, 0.2, 0.3);
        r.ctx_mut().lights.add(Light::point((5.0, 0.0, 0.0), [1.0, 0.5, 0.0], 5.0, 20.0));
        r.ctx_mut().lights.add(Light::directional((0.0, -1.0, 0.0), [1.0; 3], 10.0));
        r.ctx_mut().materials.add(Material::new([0.2, 0.4, 0.6, 1.0]));
        r.tick(0.1);

        let buf = r.frame_buffer();
        assert_eq!(buf[HEADER_LIGHT_COUNT], 2.0);
        assert_eq!(buf[HEADER_MATERIAL_COUNT], 1.0);
        assert_eq!(&buf[HEADER_AMBIENT_R..=HEADER_AMBIENT_B], &[0.1, 0.2, 0.3]);

        let lights = r.light_data_offset() as usize;
        assert_eq!(&buf[lights + 5..lights + 8], &[5.0, 0.0, 0.0]);
        assert_eq!(buf[lights + Light::FLOATS], easel_engine::systems::lighting::LIGHT_DIRECTIONAL);

        let mats = r.material_data_offset() as usize;
        assert_eq!(&buf[mats..mats + 4], &[0.2, 0.4, 0.6, 1.0]);
    }

    #[test]
    fn removed_lights_are_zeroed() {
        let mut r = runner();
        r.ctx_mut().lights.add(Light::point((1.0, 2.0, 3.0), [1.0; 3], 1.0, 5.0));
        r.tick(0.1);
        r.ctx_mut().lights.clear();
        r.tick(0.1);

        let off = r.light_data_offset() as usize;
        let section = &r.frame_buffer()[off..off + r.max_lights() as usize * Light::FLOATS];
        assert!(section.iter().all(|&f| f == 0.0));
        assert_eq!(r.light_count(), 0);
    }

    #[test]
    fn resize_updates_header() {
        let mut r = runner();
        r.resize(640.0, 480.0);
        r.tick(0.0);
        assert_eq!(r.frame_buffer()[HEADER_VIEWPORT_WIDTH], 640.0);
        assert!((r.ctx().camera.aspect() - 640.0 / 480.0).abs() < 1e-6);
    }
}
