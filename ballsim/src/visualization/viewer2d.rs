use bevy::prelude::*;
use bevy::sprite::{MaterialMesh2dBundle, Mesh2dHandle};
use bevy::math::primitives::Circle;
use bevy::window::{CursorLeft, CursorMoved, PrimaryWindow, WindowResolution};
use bevy::app::AppExit;

use crate::configuration::config::validate_mass;
use crate::simulation::scenario::Scenario;
use crate::simulation::states::{World, NVec2};

#[derive(Component)]
struct BodyIndex(pub usize);

#[derive(Component)]
struct StatsText;

const BACKGROUND: Color = Color::srgb(0.973, 0.980, 0.988);
const TEXT_COLOR: Color = Color::srgb(0.216, 0.255, 0.318);
const ARROW_COLOR: Color = Color::srgb(0.937, 0.267, 0.267);

const GRAVITY_STEP: f64 = 0.5; // per key press
const DIRECTION_STEP: f64 = 5.0; // degrees per key press
const MASS_STEP: f64 = 0.1;
const MAX_GRAVITY: f64 = 50.0;
const MIN_MASS: f64 = 0.1;
const MAX_MASS: f64 = 5.0;

pub fn run_2d(scenario: Scenario) {
    let world = scenario.engine.system().world;
    println!("run_2d: starting Bevy 2D viewer with {} bodies", scenario.engine.bodies().len());

    App::new()
        .insert_resource(scenario)
        .insert_resource(ClearColor(BACKGROUND))
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "ballsim".to_string(),
                resolution: WindowResolution::new(world.width as f32, world.height as f32),
                resizable: false,
                ..default()
            }),
            ..default()
        }))
        .add_systems(Startup, setup_bodies_system)
        .add_systems(
            Update,
            (
                pointer_input_system,
                keyboard_config_system,
                physics_step_system,
                sync_transforms_system,
                draw_overlay_system,
            )
                .chain(),
        )
        .add_systems(Last, teardown_on_exit_system)
        .run();
}

fn setup_bodies_system(mut commands: Commands, scenario: Res<Scenario>, mut meshes: ResMut<Assets<Mesh>>, mut materials: ResMut<Assets<ColorMaterial>>) {
    // 2D camera, one world unit per logical pixel
    commands.spawn(Camera2dBundle::default());

    let world = scenario.engine.system().world;
    // Unit circle scaled by the body radius so mass changes only touch the transform
    let unit_circle = meshes.add(Circle::new(1.0));

    for (i, body) in scenario.engine.bodies().iter().enumerate() {
        let color = Srgba::hex(&body.label).map(Color::from).unwrap_or(Color::WHITE);
        let pos = world_to_screen(&body.x, &world);

        commands.spawn((
            MaterialMesh2dBundle {
                mesh: Mesh2dHandle(unit_circle.clone()),
                material: materials.add(ColorMaterial::from(color)),
                transform: Transform::from_xyz(pos.x, pos.y, i as f32)
                    .with_scale(Vec3::splat(body.radius as f32)),
                ..Default::default()
            },
            BodyIndex(i),
        ));
    }

    commands.spawn((
        TextBundle::from_section(
            "",
            TextStyle {
                font_size: 16.0,
                color: TEXT_COLOR,
                ..default()
            },
        )
        .with_style(Style {
            position_type: PositionType::Absolute,
            top: Val::Px(8.0),
            left: Val::Px(10.0),
            ..default()
        }),
        StatsText,
    ));
}

/// Translate pointer events into world space and forward them to the engine.
/// The cursor leaving the window releases the drag
fn pointer_input_system(
    mut scenario: ResMut<Scenario>,
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut moved: EventReader<CursorMoved>,
    mut left: EventReader<CursorLeft>,
    time: Res<Time>,
) {
    let Ok(window) = windows.get_single() else {
        return;
    };
    let now_ms = time.elapsed_seconds_f64() * 1000.0;
    let world = scenario.engine.system().world;

    if buttons.just_pressed(MouseButton::Left) {
        if let Some(cursor) = window.cursor_position() {
            let p = cursor_to_world(cursor, window, &world);
            if let Some(i) = scenario.engine.pointer_down(p, now_ms) {
                scenario.selected = i;
            }
        }
    }

    for ev in moved.read() {
        let p = cursor_to_world(ev.position, window, &world);
        scenario.engine.pointer_move(p, now_ms);
    }

    let cursor_left = left.read().count() > 0;
    if buttons.just_released(MouseButton::Left) || cursor_left {
        scenario.engine.pointer_up();
    }
}

/// Gravity: up/down change magnitude, left/right rotate direction.
/// Mass: 1/2 select a body, +/- change its mass
fn keyboard_config_system(mut scenario: ResMut<Scenario>, keys: Res<ButtonInput<KeyCode>>) {
    let (g, dir) = scenario.engine.gravity();

    if keys.just_pressed(KeyCode::ArrowUp) {
        scenario.engine.set_gravity((g + GRAVITY_STEP).min(MAX_GRAVITY));
    }
    if keys.just_pressed(KeyCode::ArrowDown) {
        scenario.engine.set_gravity((g - GRAVITY_STEP).max(0.0));
    }
    if keys.just_pressed(KeyCode::ArrowLeft) {
        scenario.engine.set_gravity_direction(dir + DIRECTION_STEP);
    }
    if keys.just_pressed(KeyCode::ArrowRight) {
        scenario.engine.set_gravity_direction(dir - DIRECTION_STEP);
    }

    let n = scenario.engine.bodies().len();
    if keys.just_pressed(KeyCode::Digit1) && n > 0 {
        scenario.selected = 0;
    }
    if keys.just_pressed(KeyCode::Digit2) && n > 1 {
        scenario.selected = 1;
    }

    let delta = if keys.just_pressed(KeyCode::Equal) {
        MASS_STEP
    } else if keys.just_pressed(KeyCode::Minus) {
        -MASS_STEP
    } else {
        return;
    };
    let idx = scenario.selected;
    let Some(m) = scenario.engine.bodies().get(idx).map(|b| b.m) else {
        return;
    };
    let m = (m + delta).clamp(MIN_MASS, MAX_MASS);
    match validate_mass(m) {
        Ok(()) => {
            scenario.engine.set_mass(idx, m);
        }
        Err(e) => warn!("ignoring mass change: {e}"),
    }
}

fn physics_step_system(mut scenario: ResMut<Scenario>, time: Res<Time>) {
    let now_ms = time.elapsed_seconds_f64() * 1000.0;
    scenario.engine.frame(now_ms);
}

fn sync_transforms_system(scenario: Res<Scenario>, mut query: Query<(&BodyIndex, &mut Transform)>) {
    let world = scenario.engine.system().world;
    for (BodyIndex(i), mut transform) in &mut query {
        if let Some(b) = scenario.engine.bodies().get(*i) {
            let pos = world_to_screen(&b.x, &world);
            transform.translation.x = pos.x;
            transform.translation.y = pos.y;
            transform.scale = Vec3::splat(b.radius as f32);
        }
    }
}

/// Gravity arrow in the top-right corner, outline on dragged and selected bodies, status text
fn draw_overlay_system(scenario: Res<Scenario>, mut gizmos: Gizmos, mut text: Query<&mut Text, With<StatsText>>) {
    let world = scenario.engine.system().world;
    let (g, dir) = scenario.engine.gravity();

    let center = world_to_screen(&NVec2::new(world.width - 50.0, world.height - 50.0), &world);
    let theta = (dir as f32).to_radians();
    let tip = center + Vec2::new(theta.cos(), theta.sin()) * 30.0;
    gizmos.arrow_2d(center, tip, ARROW_COLOR);

    for (i, b) in scenario.engine.bodies().iter().enumerate() {
        let pos = world_to_screen(&b.x, &world);
        if b.dragging {
            gizmos.circle_2d(pos, b.radius as f32 + 2.0, ARROW_COLOR);
        } else if i == scenario.selected {
            gizmos.circle_2d(pos, b.radius as f32 + 2.0, TEXT_COLOR);
        }
    }

    if let Ok(mut text) = text.get_single_mut() {
        let masses: Vec<String> = scenario
            .engine
            .bodies()
            .iter()
            .map(|b| format!("{:.1}", b.m))
            .collect();
        text.sections[0].value = format!(
            "Drag balls to move them\nGravity: {g:.1} at {dir:.0} deg (arrows)\nMass: [{}] (1/2 select, +/- adjust)",
            masses.join(", ")
        );
    }
}

fn teardown_on_exit_system(mut exit: EventReader<AppExit>, mut scenario: ResMut<Scenario>) {
    if exit.read().next().is_some() {
        scenario.engine.teardown();
    }
}

/// Window cursor (top-left origin, y down, logical pixels) to world (bottom-left origin, y up)
fn cursor_to_world(cursor: Vec2, window: &Window, world: &World) -> NVec2 {
    let sx = world.width / window.width() as f64;
    let sy = world.height / window.height() as f64;
    NVec2::new(
        cursor.x as f64 * sx,
        world.height - cursor.y as f64 * sy,
    )
}

/// World position to camera space, the camera looks at the world's center
fn world_to_screen(p: &NVec2, world: &World) -> Vec2 {
    Vec2::new(
        (p.x - world.width / 2.0) as f32,
        (p.y - world.height / 2.0) as f32,
    )
}
