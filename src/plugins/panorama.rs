//! Panorama plugin
//!
//! Loads the equirectangular image onto the inside of a sphere around the
//! camera and tracks when it has finished loading. Until then the viewer keeps
//! a loading indicator up and the gyro driver leaves the camera alone.

use crate::config::PanoramaConfig;
use crate::prelude::*;
use bevy::asset::LoadState;

/// Whether the panorama image has finished loading this session.
///
/// Opens once and stays open. A load that never finishes, or fails, leaves it
/// closed; the two cases are not told apart.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PanoramaReadiness {
    ready: bool,
}

impl PanoramaReadiness {
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Opens the gate. Returns `true` only on the call that opened it.
    pub fn mark_ready(&mut self) -> bool {
        !std::mem::replace(&mut self.ready, true)
    }
}

/// Run condition: the panorama has loaded.
pub fn panorama_ready(readiness: Res<PanoramaReadiness>) -> bool {
    readiness.is_ready()
}

/// Handle to the image shown this session.
#[derive(Resource, Debug, Clone)]
pub struct PanoramaImage {
    pub handle: Handle<Image>,
    failure_reported: bool,
}

#[derive(Component)]
pub struct PanoramaSphere;

#[derive(Component)]
pub struct LoadingIndicator;

pub struct PanoramaPlugin;

impl Plugin for PanoramaPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PanoramaReadiness>();

        app.add_systems(OnEnter(ViewerState::Open), spawn_panorama);
        app.add_systems(OnExit(ViewerState::Open), despawn_panorama);
        app.add_systems(
            Update,
            (
                track_panorama_load.run_if(not(panorama_ready)),
                hide_loading_indicator.run_if(resource_changed::<PanoramaReadiness>),
            )
                .chain()
                .run_if(in_state(ViewerState::Open)),
        );
    }
}

fn spawn_panorama(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut readiness: ResMut<PanoramaReadiness>,
    config: Res<ViewerConfig>,
) {
    *readiness = PanoramaReadiness::default();

    let panorama = &config.panorama;
    info!(path = %panorama.image_path, "Loading panorama");
    let handle: Handle<Image> = asset_server.load(panorama.image_path.clone());

    let mesh = meshes.add(panorama_sphere_mesh(panorama));
    let material = materials.add(StandardMaterial {
        base_color_texture: Some(handle.clone()),
        unlit: true,
        cull_mode: None,
        ..default()
    });

    // Mirrored on X so the image reads correctly from inside the sphere.
    commands.spawn((
        Name::new("Panorama Sphere"),
        Mesh3d(mesh),
        MeshMaterial3d(material),
        Transform::from_scale(Vec3::new(-1.0, 1.0, 1.0)),
        PanoramaSphere,
    ));

    commands
        .spawn((
            Name::new("Loading Indicator"),
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                position_type: PositionType::Absolute,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.8)),
            ZIndex(1000),
            LoadingIndicator,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("Loading panorama..."),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
        });

    commands.insert_resource(PanoramaImage {
        handle,
        failure_reported: false,
    });
}

/// UV sphere the equirectangular image is wrapped around.
fn panorama_sphere_mesh(panorama: &PanoramaConfig) -> Mesh {
    Sphere::new(panorama.sphere_radius)
        .mesh()
        .uv(panorama.sphere_sectors, panorama.sphere_stacks)
}

fn track_panorama_load(
    asset_server: Res<AssetServer>,
    image: Option<ResMut<PanoramaImage>>,
    mut readiness: ResMut<PanoramaReadiness>,
) {
    let Some(mut image) = image else {
        return;
    };

    match asset_server.load_state(&image.handle) {
        LoadState::Loaded => {
            if readiness.mark_ready() {
                info!("Panorama loaded");
            }
        }
        LoadState::Failed(err) => {
            // Indistinguishable from a slow load for everything downstream.
            if !image.failure_reported {
                warn!("Panorama failed to load: {err}");
                image.failure_reported = true;
            }
        }
        LoadState::NotLoaded | LoadState::Loading => {}
    }
}

fn hide_loading_indicator(
    mut commands: Commands,
    readiness: Res<PanoramaReadiness>,
    indicators: Query<Entity, With<LoadingIndicator>>,
) {
    if !readiness.is_ready() {
        return;
    }

    for entity in &indicators {
        commands.entity(entity).despawn();
    }
}

fn despawn_panorama(
    mut commands: Commands,
    spheres: Query<Entity, Or<(With<PanoramaSphere>, With<LoadingIndicator>)>>,
    mut readiness: ResMut<PanoramaReadiness>,
) {
    for entity in &spheres {
        commands.entity(entity).despawn();
    }

    commands.remove_resource::<PanoramaImage>();
    *readiness = PanoramaReadiness::default();
}
