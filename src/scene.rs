use bevy::{asset::LoadState, pbr::NotShadowCaster, prelude::*};

use crate::{meshing::heightmap_to_grid_mesh, sampler::grid_from_image, settings::TerrainSettings};

/// Loads the configured heightmap and keeps the sun, the paper plane and any spinning
/// cube moving.
pub struct TerrainScenePlugin;

impl Plugin for TerrainScenePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TerrainSettings>()
            .add_startup_system(load_heightmap)
            .add_systems((
                spawn_terrain_when_loaded,
                animate_sun,
                animate_flight,
                animate_spinners,
            ));
    }
}

#[derive(Component)]
pub struct Terrain;

/// Heightmap image still on its way through the asset server.
#[derive(Resource)]
pub struct PendingHeightmap(pub Handle<Image>);

pub fn load_heightmap(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    settings: Res<TerrainSettings>,
) {
    if !settings.view.has_terrain() {
        return;
    }

    info!("loading heightmap {}", settings.heightmap_path);

    let handle = asset_server.load(settings.heightmap_path.as_str());
    commands.insert_resource(PendingHeightmap(handle));
}

pub fn spawn_terrain_when_loaded(
    mut commands: Commands,
    pending: Option<Res<PendingHeightmap>>,
    asset_server: Res<AssetServer>,
    images: Res<Assets<Image>>,
    settings: Res<TerrainSettings>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let Some(pending) = pending else {
        return;
    };

    match asset_server.get_load_state(&pending.0) {
        LoadState::Loaded => {}
        LoadState::Failed => {
            // Nothing to fall back to, the scene just goes without terrain
            error!("failed to load heightmap {}", settings.heightmap_path);
            commands.remove_resource::<PendingHeightmap>();
            return;
        }
        _ => return,
    }

    let Some(image) = images.get(&pending.0) else {
        return;
    };
    commands.remove_resource::<PendingHeightmap>();

    let grid = match grid_from_image(image) {
        Ok(grid) => grid,
        Err(err) => {
            error!("can't sample heightmap {}: {err}", settings.heightmap_path);
            return;
        }
    };

    info!(
        "building {}x{} terrain from {}",
        grid.width(),
        grid.height(),
        settings.heightmap_path
    );

    let mesh = heightmap_to_grid_mesh(&grid, settings.scale_factor, &settings.color_policy)
        .into_render_mesh();

    let mut terrain = commands.spawn((
        PbrBundle {
            mesh: meshes.add(mesh),
            material: materials.add(StandardMaterial {
                // Vertex colors are multiplied with this
                base_color: Color::WHITE,
                perceptual_roughness: 0.9,
                ..default()
            }),
            ..default()
        },
        Terrain,
    ));

    if !settings.cast_shadows {
        terrain.insert(NotShadowCaster);
    }
}

/// Sweeps a light across the sky along x, jumping back to the start once it sets.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct SunCycle {
    pub x: f32,
    pub min_x: f32,
    pub max_x: f32,
    pub height: f32,
    pub speed: f32,
}

impl Default for SunCycle {
    fn default() -> Self {
        Self {
            x: -100.,
            min_x: -100.,
            max_x: 100.,
            height: 100.,
            speed: 6.,
        }
    }
}

impl SunCycle {
    pub fn advance(&mut self, dt: f32) {
        self.x += self.speed * dt;

        if self.x > self.max_x {
            self.x = self.min_x;
        }
    }

    /// Light placed on the arc and aimed at the origin.
    pub fn transform(&self) -> Transform {
        // The arc lies in the xy plane, so +z is never parallel to the view direction
        Transform::from_xyz(self.x, self.height, 0.).looking_at(Vec3::ZERO, Vec3::Z)
    }
}

pub fn animate_sun(time: Res<Time>, mut suns: Query<(&mut SunCycle, &mut Transform)>) {
    for (mut sun, mut transform) in &mut suns {
        sun.advance(time.delta_seconds());
        *transform = sun.transform();
    }
}

/// Straight flight in the xz plane from `start` toward `end` (an `(x, z)` pair),
/// restarting once both axes reach it. `speed` applies to each axis separately.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct FlightPath {
    pub start: Vec3,
    pub end: Vec2,
    pub speed: f32,
}

impl Default for FlightPath {
    fn default() -> Self {
        Self {
            start: Vec3::new(250., 15., 250.),
            end: Vec2::new(-50., -50.),
            speed: 30.,
        }
    }
}

impl FlightPath {
    fn direction(&self) -> Vec2 {
        Vec2::new(self.end.x - self.start.x, self.end.y - self.start.z).signum()
    }

    pub fn heading(&self) -> Vec3 {
        let dir = self.direction();
        Vec3::new(dir.x, 0., dir.y)
    }

    pub fn advance(&self, position: Vec3, dt: f32) -> Vec3 {
        let next = position + self.heading() * self.speed * dt;

        let reached = |pos: f32, start: f32, end: f32| {
            if end < start {
                pos <= end
            } else {
                pos >= end
            }
        };

        if reached(next.x, self.start.x, self.end.x) && reached(next.z, self.start.z, self.end.y)
        {
            self.start
        } else {
            next
        }
    }
}

pub fn animate_flight(time: Res<Time>, mut flyers: Query<(&FlightPath, &mut Transform)>) {
    for (path, mut transform) in &mut flyers {
        transform.translation = path.advance(transform.translation, time.delta_seconds());
    }
}

/// Turns about x and y at the same rate, in radians per second.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Spinner {
    pub rate: f32,
    pub angle: f32,
}

impl Default for Spinner {
    fn default() -> Self {
        Self {
            rate: 1.25,
            angle: 0.,
        }
    }
}

impl Spinner {
    pub fn advance(&mut self, dt: f32) {
        self.angle = (self.angle + self.rate * dt).rem_euclid(std::f32::consts::TAU);
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.angle, self.angle, 0.)
    }
}

pub fn animate_spinners(time: Res<Time>, mut spinners: Query<(&mut Spinner, &mut Transform)>) {
    for (mut spinner, mut transform) in &mut spinners {
        spinner.advance(time.delta_seconds());
        transform.rotation = spinner.rotation();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sun_wraps_after_setting() {
        let mut sun = SunCycle {
            x: 99.,
            ..default()
        };

        sun.advance(0.1);
        assert!((sun.x - 99.6).abs() < 1e-4);

        sun.advance(1.);
        assert_eq!(sun.x, -100.);
    }

    #[test]
    fn sun_points_at_origin() {
        for x in [-100., 0., 42.] {
            let sun = SunCycle { x, ..default() };
            let transform = sun.transform();

            let to_origin = (Vec3::ZERO - transform.translation).normalize();
            assert!((transform.forward() - to_origin).length() < 1e-4);
        }
    }

    #[test]
    fn plane_flies_diagonally_then_restarts() {
        let path = FlightPath::default();

        let next = path.advance(path.start, 1.);
        assert_eq!(next, Vec3::new(220., 15., 220.));

        let near_end = Vec3::new(-40., 15., -40.);
        assert_eq!(path.advance(near_end, 1.), path.start);
    }

    #[test]
    fn plane_keeps_flying_until_both_axes_arrive() {
        let path = FlightPath {
            start: Vec3::new(0., 5., 0.),
            end: Vec2::new(10., -10.),
            speed: 1.,
        };

        assert_eq!(path.heading(), Vec3::new(1., 0., -1.));

        // x is past its target but z isn't yet
        let position = Vec3::new(12., 5., -5.);
        assert_eq!(path.advance(position, 1.), Vec3::new(13., 5., -6.));
    }

    #[test]
    fn spinner_turns_at_its_rate() {
        let mut spinner = Spinner::default();

        spinner.advance(1.);
        assert!((spinner.angle - 1.25).abs() < 1e-6);

        let mut halves = Spinner::default();
        halves.advance(0.5);
        halves.advance(0.5);
        assert!((halves.angle - spinner.angle).abs() < 1e-6);
    }

    #[test]
    fn spinner_angle_wraps_at_full_turn() {
        let mut spinner = Spinner::default();
        spinner.advance(6.);

        assert!((spinner.angle - (7.5 - std::f32::consts::TAU)).abs() < 1e-4);
    }

    #[test]
    fn spinner_system_sets_rotation() {
        let mut app = App::new();
        app.insert_resource(Time::default()).add_system(animate_spinners);

        let spinner = Spinner {
            angle: 0.7,
            ..default()
        };
        let expected = spinner.rotation();
        let cube = app.world.spawn((spinner, Transform::default())).id();
        app.update();

        let transform = app.world.get::<Transform>(cube).unwrap();
        assert!(transform.rotation.abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn sun_system_places_light() {
        let mut app = App::new();
        app.insert_resource(Time::default()).add_system(animate_sun);

        let sun = app
            .world
            .spawn((SunCycle { x: 50., ..default() }, Transform::default()))
            .id();
        app.update();

        let transform = app.world.get::<Transform>(sun).unwrap();
        assert_eq!(transform.translation, Vec3::new(50., 100., 0.));
    }
}
