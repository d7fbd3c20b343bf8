//! Helicopter render step (WASM only)
//!
//! Pure read of the simulation state onto a 2D canvas; never mutates
//! state. Best-effort: an idle state just draws the empty field.

use web_sys::CanvasRenderingContext2d;

use super::state::{HeliState, OBSTACLE_WIDTH};
use crate::render::fill_wrapped_text;

/// Draw one frame of the helicopter game
pub fn render(state: &HeliState, ctx: &CanvasRenderingContext2d) {
    let w = state.field_w as f64;
    let h = state.field_h as f64;

    ctx.set_fill_style_str("#0f172a");
    ctx.fill_rect(0.0, 0.0, w, h);

    draw_grid(state, ctx, w, h);
    draw_obstacles(state, ctx, h);
    draw_particles(state, ctx);
    draw_copter(state, ctx);
    draw_hud(state, ctx, w);
    draw_banner(state, ctx, w, h);
}

/// Background grid, scrolled by the camera so the world appears to move
fn draw_grid(state: &HeliState, ctx: &CanvasRenderingContext2d, w: f64, h: f64) {
    ctx.set_stroke_style_str("#334155");
    ctx.set_line_width(0.5);

    let mut x = -((state.camera_x as f64) % 50.0);
    while x < w {
        ctx.begin_path();
        ctx.move_to(x, 0.0);
        ctx.line_to(x, h);
        ctx.stroke();
        x += 50.0;
    }
    let mut y = 0.0;
    while y < h {
        ctx.begin_path();
        ctx.move_to(0.0, y);
        ctx.line_to(w, y);
        ctx.stroke();
        y += 50.0;
    }
}

fn draw_obstacles(state: &HeliState, ctx: &CanvasRenderingContext2d, h: f64) {
    ctx.set_fill_style_str("#1e293b");
    ctx.set_stroke_style_str("#00bcd4");
    ctx.set_line_width(2.0);

    for ob in &state.obstacles {
        let x = ob.x as f64;
        let top = ob.top_height as f64;
        let bottom_y = ob.bottom_y as f64;
        ctx.fill_rect(x, 0.0, OBSTACLE_WIDTH as f64, top);
        ctx.stroke_rect(x, 0.0, OBSTACLE_WIDTH as f64, top);
        ctx.fill_rect(x, bottom_y, OBSTACLE_WIDTH as f64, h - bottom_y);
        ctx.stroke_rect(x, bottom_y, OBSTACLE_WIDTH as f64, h - bottom_y);
    }
}

fn draw_particles(state: &HeliState, ctx: &CanvasRenderingContext2d) {
    for p in state.particles.iter() {
        ctx.save();
        ctx.set_global_alpha(p.life.clamp(0.0, 1.0) as f64);
        ctx.set_fill_style_str(p.color);
        ctx.begin_path();
        let _ = ctx.arc(
            p.pos.x as f64,
            p.pos.y as f64,
            p.size as f64,
            0.0,
            std::f64::consts::TAU,
        );
        ctx.fill();
        ctx.restore();
    }
}

/// Fuselage, cockpit, tail boom, skids, and both rotors with a cheap
/// repeated-stroke motion blur
fn draw_copter(state: &HeliState, ctx: &CanvasRenderingContext2d) {
    let pos = state.copter.pos();
    ctx.save();
    let _ = ctx.translate(pos.x as f64, pos.y as f64);

    // Fuselage
    ctx.set_fill_style_str("#2563eb");
    ctx.begin_path();
    let _ = ctx.ellipse(0.0, 0.0, 18.0, 8.0, 0.0, 0.0, std::f64::consts::TAU);
    ctx.fill();

    // Cockpit glass at the nose
    ctx.set_fill_style_str("rgba(135, 206, 235, 0.7)");
    ctx.begin_path();
    let _ = ctx.ellipse(8.0, -2.0, 6.0, 5.0, 0.0, 0.0, std::f64::consts::TAU);
    ctx.fill();

    ctx.set_stroke_style_str("#1e40af");
    ctx.set_line_width(2.0);
    ctx.begin_path();
    let _ = ctx.ellipse(0.0, 0.0, 18.0, 8.0, 0.0, 0.0, std::f64::consts::TAU);
    ctx.stroke();

    // Tail boom
    ctx.set_fill_style_str("#2563eb");
    ctx.fill_rect(-37.0, -2.0, 25.0, 4.0);
    ctx.stroke_rect(-37.0, -2.0, 25.0, 4.0);

    // Landing skids
    ctx.set_fill_style_str("#374151");
    ctx.fill_rect(-15.0, 6.0, 30.0, 2.0);
    ctx.fill_rect(-12.0, 8.0, 4.0, 2.0);
    ctx.fill_rect(8.0, 8.0, 4.0, 2.0);

    // Rotor mast
    ctx.fill_rect(-1.0, -12.0, 2.0, 8.0);

    // Main rotor
    ctx.save();
    let _ = ctx.translate(0.0, -12.0);
    let _ = ctx.rotate(state.rotor_angle as f64);

    ctx.set_fill_style_str("#1f2937");
    ctx.begin_path();
    let _ = ctx.arc(0.0, 0.0, 3.0, 0.0, std::f64::consts::TAU);
    ctx.fill();

    ctx.set_stroke_style_str("#4b5563");
    ctx.set_line_width(2.0);
    ctx.set_line_cap("round");

    // More ghost strokes when spinning fast
    let blur = if state.thrusting { 3 } else { 1 };
    for i in 0..blur {
        ctx.set_global_alpha(1.0 - (i as f64 / blur as f64) * 0.7);
        ctx.begin_path();
        ctx.move_to(-35.0, 0.0);
        ctx.line_to(35.0, 0.0);
        ctx.stroke();
        ctx.begin_path();
        ctx.move_to(0.0, -35.0);
        ctx.line_to(0.0, 35.0);
        ctx.stroke();
    }
    ctx.set_global_alpha(1.0);
    ctx.restore();

    // Tail rotor
    ctx.save();
    let _ = ctx.translate(-37.0, -1.0);
    let _ = ctx.rotate(state.tail_rotor_angle as f64);
    ctx.set_stroke_style_str("#4b5563");
    ctx.set_line_width(1.5);
    ctx.set_line_cap("round");
    for i in 0..2 {
        ctx.set_global_alpha(1.0 - i as f64 * 0.5);
        ctx.begin_path();
        ctx.move_to(-8.0, 0.0);
        ctx.line_to(8.0, 0.0);
        ctx.stroke();
        ctx.begin_path();
        ctx.move_to(0.0, -8.0);
        ctx.line_to(0.0, 8.0);
        ctx.stroke();
    }
    ctx.set_global_alpha(1.0);
    ctx.restore();

    // Exhaust glow while under power
    if state.thrusting {
        ctx.set_fill_style_str("rgba(255, 165, 0, 0.6)");
        ctx.begin_path();
        let _ = ctx.ellipse(-15.0, 3.0, 4.0, 2.0, 0.0, 0.0, std::f64::consts::TAU);
        ctx.fill();
    }

    ctx.restore();
}

fn draw_hud(state: &HeliState, ctx: &CanvasRenderingContext2d, w: f64) {
    ctx.set_fill_style_str("#e2e8f0");
    ctx.set_font("bold 24px Arial");
    let _ = ctx.fill_text(&format!("Score: {}", state.score), 20.0, 40.0);
    let _ = ctx.fill_text(&format!("High Score: {}", state.best_score), 20.0, 70.0);

    ctx.set_font("bold 16px Arial");
    ctx.set_fill_style_str("#00bcd4");
    let _ = ctx.fill_text(&format!("Level: {:.1}", state.difficulty), w - 120.0, 30.0);
}

fn draw_banner(state: &HeliState, ctx: &CanvasRenderingContext2d, w: f64, h: f64) {
    let Some(message) = state.milestones.current() else {
        return;
    };

    ctx.save();

    let box_w = 400.0_f64.min(w - 40.0);
    let box_h = 60.0;
    let box_x = (w - box_w) / 2.0;
    let box_y = h - 120.0;

    ctx.set_fill_style_str("rgba(0, 0, 0, 0.8)");
    ctx.fill_rect(box_x, box_y, box_w, box_h);
    ctx.set_stroke_style_str("#ffd700");
    ctx.set_line_width(2.0);
    ctx.stroke_rect(box_x, box_y, box_w, box_h);

    ctx.set_fill_style_str("#ffd700");
    ctx.set_font("bold 16px Arial");
    ctx.set_text_align("center");
    fill_wrapped_text(ctx, message, w / 2.0, box_y + 26.0, box_w - 20.0, 20.0);

    ctx.restore();
    ctx.set_text_align("start");
}
