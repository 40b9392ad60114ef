use heightmap_terrain::{
    scene::{FlightPath, Spinner, SunCycle, TerrainScenePlugin},
    settings::{ArgsError, SceneView, USAGE},
    TerrainSettings,
};

use bevy::{pbr::CascadeShadowConfigBuilder, prelude::*};
use bevy_atmosphere::prelude::*;
use bevy_fly_camera::{FlyCamera, FlyCameraPlugin};

fn main() {
    let settings = match TerrainSettings::from_args(std::env::args().skip(1)) {
        Ok(settings) => settings,
        Err(ArgsError::Help) => {
            println!("{USAGE}");
            return;
        }
        Err(err) => {
            eprintln!("{err}\n{USAGE}");
            std::process::exit(2);
        }
    };

    App::new()
        .insert_resource(settings)
        .add_plugins(DefaultPlugins)
        .add_plugin(AtmospherePlugin)
        .add_plugin(FlyCameraPlugin)
        .add_plugin(TerrainScenePlugin)
        .add_startup_system(setup_scene)
        .run();
}

fn setup_scene(
    mut commands: Commands,
    settings: Res<TerrainSettings>,
    asset_server: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    info!("setting up {:?} view", settings.view);

    match settings.view {
        SceneView::City => {
            add_camera(&mut commands);
            add_sun(&mut commands);
            add_paper_plane(&mut commands, &mut meshes, &mut materials);
        }
        SceneView::Heightmap => {
            add_camera(&mut commands);
            add_spot_light(&mut commands);
            add_normal_mapped_cube(&mut commands, &asset_server, &mut meshes, &mut materials);
        }
        SceneView::Cube => add_spinning_cube(&mut commands, &mut meshes, &mut materials),
    }
}

fn add_camera(commands: &mut Commands) {
    commands
        .spawn(Camera3dBundle {
            transform: Transform::from_xyz(30., 80., 80.),
            ..default()
        })
        .insert(FlyCamera::default())
        .insert(AtmosphereCamera::default());
}

fn add_sun(commands: &mut Commands) {
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 0.3,
    });

    let sun = SunCycle::default();

    commands.spawn((
        DirectionalLightBundle {
            directional_light: DirectionalLight {
                illuminance: 10_000.,
                shadows_enabled: true,
                ..default()
            },
            cascade_shadow_config: CascadeShadowConfigBuilder {
                maximum_distance: 500.,
                ..default()
            }
            .into(),
            transform: sun.transform(),
            ..default()
        },
        sun,
    ));
}

// Flattened box standing in for the paper plane model
fn add_paper_plane(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    let path = FlightPath::default();

    commands.spawn((
        PbrBundle {
            mesh: meshes.add(Mesh::from(shape::Box::new(6., 0.4, 10.))),
            material: materials.add(StandardMaterial {
                base_color: Color::rgb(0.95, 0.95, 0.9),
                ..default()
            }),
            transform: Transform::from_translation(path.start)
                .looking_at(path.start + path.heading(), Vec3::Y),
            ..default()
        },
        path,
    ));
}

fn add_spot_light(commands: &mut Commands) {
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 0.3,
    });

    commands.spawn(SpotLightBundle {
        spot_light: SpotLight {
            intensity: 6000.,
            range: 300.,
            shadows_enabled: true,
            outer_angle: std::f32::consts::FRAC_PI_3,
            ..default()
        },
        transform: Transform::from_xyz(60., 60., 70.).looking_at(Vec3::ZERO, Vec3::Y),
        ..default()
    });
}

fn add_normal_mapped_cube(
    commands: &mut Commands,
    asset_server: &AssetServer,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    let mut cube = Mesh::from(shape::Box::new(10., 10., 10.));
    if let Err(err) = cube.generate_tangents() {
        warn!("cube has no tangents, normal map will be ignored: {err}");
    }

    commands.spawn(PbrBundle {
        mesh: meshes.add(cube),
        material: materials.add(StandardMaterial {
            base_color: Color::hex("0077ff").unwrap_or(Color::BLUE),
            normal_map_texture: Some(asset_server.load("texture/normal.png")),
            ..default()
        }),
        transform: Transform::from_xyz(30., 30., 60.),
        ..default()
    });
}

fn add_spinning_cube(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    commands.spawn(Camera3dBundle {
        transform: Transform::from_xyz(0., 0., 5.).looking_at(Vec3::ZERO, Vec3::Y),
        ..default()
    });

    commands.spawn((
        PbrBundle {
            mesh: meshes.add(Mesh::from(shape::Cube::new(1.))),
            material: materials.add(StandardMaterial {
                base_color: Color::rgb(0., 1., 0.),
                unlit: true,
                ..default()
            }),
            ..default()
        },
        Spinner::default(),
    ));
}
