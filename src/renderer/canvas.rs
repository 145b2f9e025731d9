//! Canvas rendering - background, entities, slice trails, popups

use std::f64::consts::TAU;

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{PopupLayer, Snapshot};
use crate::assets::{Sprite, SpriteKind, SpriteSheet};
use crate::error::InitError;
use crate::sim::{Fruit, ParticleKind, Powerup, PowerupKind, SliceTrail};
use crate::css_color;

/// Drawn width of a fruit at scale 1
const FRUIT_DRAW_WIDTH: f64 = 80.0;
const POWERUP_DRAW_SIZE: f64 = 60.0;
const CRITICAL_ZONE: &str = "rgba(255, 215, 0, 0.7)";
const TRAIL_WIDTH: f64 = 8.0;

pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, InitError> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .ok_or(InitError::NoContext2d)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| InitError::NoContext2d)?;

        Ok(Self { canvas, ctx })
    }

    #[inline(always)]
    pub fn width(&self) -> f64 {
        self.canvas.width() as f64
    }

    #[inline(always)]
    pub fn height(&self) -> f64 {
        self.canvas.height() as f64
    }

    /// Draw one frame
    pub fn draw(&self, snap: &Snapshot, sprites: &SpriteSheet, popups: &PopupLayer, trails: bool) {
        self.ctx.clear_rect(0.0, 0.0, self.width(), self.height());

        self.draw_background(snap);
        self.draw_particles(snap);
        for fruit in snap.fruits {
            self.draw_fruit(fruit, sprites);
        }
        for powerup in snap.powerups {
            self.draw_powerup(powerup, sprites);
        }
        if trails {
            for slice in snap.slices {
                self.draw_trail(slice);
            }
        }
        self.draw_pointer_path(snap.pointer);
        self.draw_popups(popups);
    }

    fn draw_background(&self, snap: &Snapshot) {
        for mote in snap.background {
            self.ctx.begin_path();
            let _ = self
                .ctx
                .arc(mote.pos.x as f64, mote.pos.y as f64, mote.size as f64, 0.0, TAU);
            self.ctx
                .set_fill_style_str(&format!("rgba(255, 255, 255, {})", mote.opacity));
            self.ctx.fill();
        }
    }

    fn draw_particles(&self, snap: &Snapshot) {
        let ctx = &self.ctx;
        for p in snap.particles {
            ctx.save();
            let _ = ctx.translate(p.pos.x as f64, p.pos.y as f64);
            let _ = ctx.rotate(p.rotation as f64);
            ctx.set_global_alpha(p.alpha() as f64);
            ctx.set_fill_style_str(&css_color(p.color));

            let size = p.size as f64;
            match p.kind {
                ParticleKind::Juice => {
                    ctx.begin_path();
                    let _ = ctx.arc(0.0, 0.0, size, 0.0, TAU);
                    ctx.fill();
                }
                ParticleKind::Chip => ctx.fill_rect(-size / 2.0, -size / 2.0, size, size),
            }
            ctx.restore();
        }
    }

    fn draw_fruit(&self, fruit: &Fruit, sprites: &SpriteSheet) {
        let Some(sprite) = sprites.get(SpriteKind::Fruit(fruit.kind)) else {
            return;
        };
        let ctx = &self.ctx;
        ctx.save();
        let _ = ctx.translate(fruit.pos.x as f64, fruit.pos.y as f64);
        let _ = ctx.rotate(fruit.rotation as f64);

        let width = FRUIT_DRAW_WIDTH * fruit.scale as f64;
        let height = width / aspect_ratio(sprite);

        if fruit.critical {
            ctx.begin_path();
            let _ = ctx.arc(0.0, 0.0, width / 2.0 + 10.0, 0.0, TAU);
            ctx.set_fill_style_str(CRITICAL_ZONE);
            ctx.fill();
        }

        self.blit(sprite, -width / 2.0, -height / 2.0, width, height);
        ctx.restore();
    }

    fn draw_powerup(&self, powerup: &Powerup, sprites: &SpriteSheet) {
        let Some(sprite) = sprites.get(SpriteKind::Powerup(powerup.kind)) else {
            return;
        };
        let ctx = &self.ctx;
        ctx.save();
        let _ = ctx.translate(powerup.pos.x as f64, powerup.pos.y as f64);
        let _ = ctx.rotate(powerup.rotation as f64);

        ctx.set_shadow_color(match powerup.kind {
            PowerupKind::Freeze => "rgba(0, 150, 255, 0.8)",
            PowerupKind::Double => "rgba(255, 215, 0, 0.8)",
            PowerupKind::Magnet => "rgba(255, 0, 0, 0.8)",
        });
        ctx.set_shadow_blur(15.0 + powerup.glow as f64 * 10.0);

        let size = POWERUP_DRAW_SIZE * powerup.scale as f64;
        self.blit(sprite, -size / 2.0, -size / 2.0, size, size);
        ctx.restore();
    }

    /// Stroke a path with the white-orange-pink blade gradient
    fn stroke_blade(&self, points: &[Vec2], alpha: f32, glow_alpha: f32) {
        let (Some(first), Some(last)) = (points.first(), points.last()) else {
            return;
        };
        let ctx = &self.ctx;
        ctx.begin_path();
        ctx.move_to(first.x as f64, first.y as f64);
        for p in &points[1..] {
            ctx.line_to(p.x as f64, p.y as f64);
        }

        let gradient =
            ctx.create_linear_gradient(first.x as f64, first.y as f64, last.x as f64, last.y as f64);
        let _ = gradient.add_color_stop(0.0, &format!("rgba(255, 255, 255, {})", alpha));
        let _ = gradient.add_color_stop(0.5, &format!("rgba(255, 150, 0, {})", alpha));
        let _ = gradient.add_color_stop(1.0, &format!("rgba(255, 0, 150, {})", alpha));

        ctx.set_stroke_style_canvas_gradient(&gradient);
        ctx.set_line_width(TRAIL_WIDTH);
        ctx.set_line_cap("round");
        ctx.stroke();

        ctx.set_shadow_color(&format!("rgba(255, 255, 255, {})", glow_alpha));
        ctx.set_shadow_blur(15.0);
        ctx.stroke();
        ctx.set_shadow_blur(0.0);
    }

    fn draw_trail(&self, slice: &SliceTrail) {
        self.stroke_blade(&[slice.start, slice.end], slice.alpha(), 0.8);
    }

    fn draw_pointer_path(&self, points: &[Vec2]) {
        if points.len() > 1 {
            self.stroke_blade(points, 0.8, 0.5);
        }
    }

    fn draw_popups(&self, popups: &PopupLayer) {
        let ctx = &self.ctx;
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        for popup in popups.popups() {
            ctx.save();
            ctx.set_global_alpha(popup.alpha() as f64);
            if popup.critical {
                ctx.set_font("bold 28px Arial");
                ctx.set_fill_style_str("#ffcc00");
            } else {
                ctx.set_font("bold 22px Arial");
                ctx.set_fill_style_str("#ffffff");
            }
            let _ = ctx.fill_text(&popup.text, popup.pos.x as f64, popup.pos.y as f64);
            ctx.restore();
        }
    }

    fn blit(&self, sprite: &Sprite, x: f64, y: f64, w: f64, h: f64) {
        let _ = match sprite {
            Sprite::Image(img) => self
                .ctx
                .draw_image_with_html_image_element_and_dw_and_dh(img, x, y, w, h),
            Sprite::Canvas(canvas) => self
                .ctx
                .draw_image_with_html_canvas_element_and_dw_and_dh(canvas, x, y, w, h),
        };
    }
}

/// Width over height, 1.0 when unknown
fn aspect_ratio(sprite: &Sprite) -> f64 {
    let (w, h) = match sprite {
        Sprite::Image(img) => (img.natural_width(), img.natural_height()),
        Sprite::Canvas(canvas) => (canvas.width(), canvas.height()),
    };
    if w == 0 || h == 0 { 1.0 } else { w as f64 / h as f64 }
}
