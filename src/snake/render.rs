//! Snake render step (WASM only)
//!
//! Pure read of the simulation state onto a 2D canvas. Grid-space
//! positions scale by [`CELL_SIZE`]; the canvas resolution stays fixed
//! for crisp pixels and CSS handles visual scaling.

use web_sys::CanvasRenderingContext2d;

use super::state::{CELL_SIZE, PowerUpKind, SnakeState};
use crate::Mode;
use crate::render::fill_wrapped_text;

/// Draw one frame of the snake game
pub fn render(state: &SnakeState, ctx: &CanvasRenderingContext2d) {
    let cell = CELL_SIZE;
    let side = state.grid as f64 * cell;

    ctx.set_fill_style_str("#0f172a");
    ctx.fill_rect(0.0, 0.0, side, side);

    draw_grid(state, ctx, cell, side);
    draw_food(state, ctx, cell);
    draw_power_up(state, ctx, cell);
    draw_body(state, ctx, cell);
    draw_particles(state, ctx, cell);
    draw_hud(state, ctx, side);
    draw_banner(state, ctx, side);

    if state.mode == Mode::Paused {
        draw_pause_overlay(ctx, side);
    }
}

fn draw_grid(state: &SnakeState, ctx: &CanvasRenderingContext2d, cell: f64, side: f64) {
    ctx.set_stroke_style_str("#1e293b");
    ctx.set_line_width(1.0);
    for i in 0..=state.grid {
        let offset = i as f64 * cell;
        ctx.begin_path();
        ctx.move_to(offset, 0.0);
        ctx.line_to(offset, side);
        ctx.stroke();
        ctx.begin_path();
        ctx.move_to(0.0, offset);
        ctx.line_to(side, offset);
        ctx.stroke();
    }
}

fn draw_food(state: &SnakeState, ctx: &CanvasRenderingContext2d, cell: f64) {
    ctx.set_fill_style_str("#ff4444");
    ctx.set_shadow_color("#ff4444");
    ctx.set_shadow_blur(10.0);
    ctx.begin_path();
    let _ = ctx.arc(
        (state.food.x as f64 + 0.5) * cell,
        (state.food.y as f64 + 0.5) * cell,
        cell * 0.4,
        0.0,
        std::f64::consts::TAU,
    );
    ctx.fill();
    ctx.set_shadow_blur(0.0);
}

fn draw_power_up(state: &SnakeState, ctx: &CanvasRenderingContext2d, cell: f64) {
    let Some(p) = state.power_up else {
        return;
    };
    ctx.set_fill_style_str(p.kind.color());
    ctx.set_shadow_color(p.kind.color());
    ctx.set_shadow_blur(15.0);
    ctx.begin_path();
    let _ = ctx.arc(
        (p.cell.x as f64 + 0.5) * cell,
        (p.cell.y as f64 + 0.5) * cell,
        cell * 0.35,
        0.0,
        std::f64::consts::TAU,
    );
    ctx.fill();
    ctx.set_shadow_blur(0.0);
}

/// Body rectangles fade with segment index; the head gets eyes
fn draw_body(state: &SnakeState, ctx: &CanvasRenderingContext2d, cell: f64) {
    let len = state.body.len().max(1);
    ctx.set_shadow_color("#00bcd4");

    for (i, seg) in state.body.iter().enumerate() {
        let is_head = i == 0;
        let alpha = 1.0 - (i as f64 / len as f64) * 0.3;
        if is_head {
            ctx.set_fill_style_str("#00bcd4");
        } else {
            ctx.set_fill_style_str(&format!("rgba(0, 188, 212, {alpha:.3})"));
        }
        ctx.set_shadow_blur(if is_head { 15.0 } else { 5.0 });

        let x = seg.x as f64 * cell;
        let y = seg.y as f64 * cell;
        ctx.fill_rect(x + 1.0, y + 1.0, cell - 2.0, cell - 2.0);

        if is_head {
            ctx.set_fill_style_str("#0f172a");
            ctx.set_shadow_blur(0.0);
            let eye = cell * 0.15;
            let off_x = cell * 0.25;
            let off_y = cell * 0.3;
            ctx.fill_rect(x + off_x, y + off_y, eye, eye);
            ctx.fill_rect(x + cell - off_x - eye, y + off_y, eye, eye);
        }
    }
    ctx.set_shadow_blur(0.0);
}

fn draw_particles(state: &SnakeState, ctx: &CanvasRenderingContext2d, cell: f64) {
    for p in state.particles.iter() {
        ctx.save();
        ctx.set_global_alpha(p.life.clamp(0.0, 1.0) as f64);
        ctx.set_fill_style_str(p.color);
        ctx.begin_path();
        let _ = ctx.arc(
            p.pos.x as f64 * cell,
            p.pos.y as f64 * cell,
            p.size as f64 * cell,
            0.0,
            std::f64::consts::TAU,
        );
        ctx.fill();
        ctx.restore();
    }
}

fn draw_hud(state: &SnakeState, ctx: &CanvasRenderingContext2d, side: f64) {
    ctx.set_fill_style_str("#e2e8f0");
    ctx.set_font("bold 20px Arial");
    let _ = ctx.fill_text(&format!("Score: {}", state.score), 10.0, 30.0);
    let _ = ctx.fill_text(&format!("High: {}", state.best_score), 10.0, 55.0);

    if state.combo > 1 {
        ctx.set_fill_style_str("#00ff88");
        let _ = ctx.fill_text(&format!("{}x Combo!", state.combo), 10.0, 80.0);
    }

    if let Some(active) = state.active {
        let secs = (active.remaining / 60.0).ceil() as u32;
        ctx.set_fill_style_str(active.kind.color());
        let label = match active.kind {
            PowerUpKind::SpeedBoost => format!("Speed: {}s", secs),
            PowerUpKind::Invincible => format!("Shield: {}s", secs),
            PowerUpKind::Multiplier => format!("2x Score: {}s", secs),
        };
        let _ = ctx.fill_text(&label, side - 150.0, 30.0);
    }

    ctx.set_fill_style_str("#00bcd4");
    ctx.set_font("bold 16px Arial");
    let _ = ctx.fill_text(&format!("Level: {}", state.difficulty_level()), side - 100.0, 55.0);
}

/// Subtle banner near the top so it never hides the action
fn draw_banner(state: &SnakeState, ctx: &CanvasRenderingContext2d, side: f64) {
    let Some(message) = state.milestones.current() else {
        return;
    };

    ctx.save();

    let box_w = 300.0_f64.min(side - 40.0);
    let box_h = 50.0;
    let box_x = (side - box_w) / 2.0;
    let box_y = 80.0;

    ctx.set_fill_style_str("rgba(0, 0, 0, 0.3)");
    ctx.fill_rect(box_x, box_y, box_w, box_h);
    ctx.set_stroke_style_str("rgba(255, 215, 0, 0.5)");
    ctx.set_line_width(1.0);
    ctx.stroke_rect(box_x, box_y, box_w, box_h);

    ctx.set_fill_style_str("rgba(255, 215, 0, 0.8)");
    ctx.set_font("bold 12px Arial");
    ctx.set_text_align("center");
    fill_wrapped_text(ctx, message, side / 2.0, box_y + 25.0, box_w - 20.0, 18.0);

    ctx.restore();
    ctx.set_text_align("start");
}

fn draw_pause_overlay(ctx: &CanvasRenderingContext2d, side: f64) {
    ctx.set_fill_style_str("rgba(0, 0, 0, 0.7)");
    ctx.fill_rect(0.0, 0.0, side, side);

    ctx.set_text_align("center");
    ctx.set_fill_style_str("#00bcd4");
    ctx.set_font("bold 40px Arial");
    let _ = ctx.fill_text("PAUSED", side / 2.0, side / 2.0);

    ctx.set_font("16px Arial");
    ctx.set_fill_style_str("#e2e8f0");
    let _ = ctx.fill_text("Press SPACE to resume", side / 2.0, side / 2.0 + 40.0);
    ctx.set_text_align("start");
}
