//! Interactive 2-D ray-casting demo.
//!
//! Left half of the window: top-down light view. Right half: the same
//! rays projected as a pseudo-3D strip.
//!
//! Keys: `WASD` move, `←`/`→` turn, `Space` toggle ray drawing,
//! `F` toggle filled light polygon, `Tab` switch casting strategy,
//! `R` reset the scene, `Esc` quit.

use clap::Parser;
use glam::{Vec2, vec2};
use minifb::{Key, KeyRepeat, Window, WindowOptions};
use std::time::{Duration, Instant};

use luxcast::{
    engine::{self, Screen, Strategy},
    renderer::{DrawCall, Renderer, Rgba, grey, software::Software},
    world::{MoveKeys, Scene, Viewer},
};

const BACKGROUND: Rgba = 0x0032_3232;
const WALL: Rgba = 0x00FF_7800;
const RAY: Rgba = 0x0078_8C78;
const LIGHT: Rgba = 0x00C8_C8C8;
const MARKER: Rgba = 0x00FF_FFFF;

const MARKER_RADIUS: f32 = 4.0;
const MOVE_SPEED: f32 = 4.0;
const TURN_SPEED: f32 = 0.05;
const BORDER: f32 = 2.0;

#[derive(Parser, Debug)]
#[command(about = "Interactive 2D ray-casting visibility demo")]
struct Args {
    /// Rays per frame for the uniform-fan strategy.
    #[arg(long, default_value_t = 80, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    rays: usize,

    /// Start with feature-targeted casting (exact corners).
    #[arg(long)]
    exact: bool,

    /// Field of view in degrees.
    #[arg(long, default_value_t = 60.0)]
    fov: f32,

    /// Width of each half-view in pixels.
    #[arg(long, default_value_t = 640)]
    width: usize,

    /// Window height in pixels.
    #[arg(long, default_value_t = 400)]
    height: usize,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let (w, h) = (args.width, args.height);
    let fov = args.fov.to_radians();

    let spawn = vec2(100.0, 300.0).min(vec2(w as f32, h as f32) * 0.5);
    let mut scene = Scene::demo(w as f32, h as f32);
    let mut viewer = Viewer::new(spawn, 0.0, fov);
    let mut strategy = if args.exact {
        Strategy::FeatureTargeted
    } else {
        Strategy::UniformFan { rays: args.rays }
    };
    let mut draw_rays = true;
    let mut fill_light = false;

    // Longest possible in-view distance; doubles as the render limit
    // and the brightness fall-off range.
    let farthest = ((w * w + h * h) as f32).sqrt();
    let height_scale = farthest * 50.0;
    let strip = Screen::new(w, h);

    let mut renderer = Software::default();
    let mut win = Window::new("luxcast", w * 2, h, WindowOptions::default())?;
    win.set_target_fps(35);

    // ────────────────── benchmarking state ─────────────────────────
    let mut acc_time = Duration::ZERO;
    let mut acc_frames = 0usize;
    let mut last_print = Instant::now();

    while win.is_open() && !win.is_key_down(Key::Escape) {
        let t0 = Instant::now();

        /* movement ---------------------------------------------------- */
        let mut keys = MoveKeys::empty();
        if win.is_key_down(Key::W) {
            keys |= MoveKeys::FORWARD;
        }
        if win.is_key_down(Key::S) {
            keys |= MoveKeys::BACK;
        }
        if win.is_key_down(Key::A) {
            keys |= MoveKeys::LEFT;
        }
        if win.is_key_down(Key::D) {
            keys |= MoveKeys::RIGHT;
        }
        if win.is_key_down(Key::Left) {
            viewer.turn(-TURN_SPEED);
        }
        if win.is_key_down(Key::Right) {
            viewer.turn(TURN_SPEED);
        }

        /* toggles & reset --------------------------------------------- */
        if win.is_key_pressed(Key::Space, KeyRepeat::No) {
            draw_rays = !draw_rays;
        }
        if win.is_key_pressed(Key::F, KeyRepeat::No) {
            fill_light = !fill_light;
        }
        if win.is_key_pressed(Key::Tab, KeyRepeat::No) {
            strategy = match strategy {
                Strategy::UniformFan { .. } => Strategy::FeatureTargeted,
                Strategy::FeatureTargeted => Strategy::UniformFan { rays: args.rays },
            };
        }
        if win.is_key_pressed(Key::R, KeyRepeat::No) {
            scene = Scene::demo(w as f32, h as f32);
            viewer = Viewer::new(spawn, 0.0, fov);
        }

        viewer.advance(keys, MOVE_SPEED);
        viewer.clamp_to(
            Vec2::ZERO,
            vec2(w as f32 - BORDER, h as f32 - BORDER),
            MARKER_RADIUS,
        );

        /* visibility pass --------------------------------------------- */
        let vis = engine::compute(&viewer, &scene, strategy)?;

        /* draw --------------------------------------------------------- */
        renderer.begin_frame(w * 2, h, BACKGROUND);

        for shape in scene.shapes() {
            renderer.draw(&DrawCall::Polygon {
                points: shape.points().to_vec(),
                colour: WALL,
                filled: false,
            });
        }
        if draw_rays {
            for hit in &vis.hits {
                renderer.draw(&DrawCall::Line {
                    a: viewer.pos(),
                    b: hit.point,
                    colour: RAY,
                });
            }
        }
        renderer.draw(&DrawCall::Polygon {
            points: vis.polygon.clone(),
            colour: LIGHT,
            filled: fill_light,
        });
        renderer.draw(&DrawCall::Disc {
            centre: viewer.pos(),
            radius: MARKER_RADIUS,
            colour: MARKER,
        });

        // Right half: fish-eye-corrected distances as wall columns.
        let dists = engine::correct_fisheye(&vis.hits);
        for col in engine::project_strip(&dists, &strip, farthest, height_scale) {
            renderer.draw(&DrawCall::Column {
                x: w as f32 + col.x,
                width: col.width,
                height: col.height,
                colour: grey(col.shade),
            });
        }

        renderer.end_frame(|fb, fw, fh| {
            acc_time += t0.elapsed();
            acc_frames += 1;
            win.update_with_buffer(fb, fw, fh).unwrap()
        });

        if last_print.elapsed() >= Duration::from_secs(3) {
            let avg_ms = acc_time.as_secs_f64() * 1000.0 / acc_frames as f64;
            println!("avg frame: {:.2} ms  ({:.1} FPS)", avg_ms, 1000.0 / avg_ms);
            acc_time = Duration::ZERO;
            acc_frames = 0;
            last_print = Instant::now();
        }
    }
    Ok(())
}
