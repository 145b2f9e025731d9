//! Sprite assets with built-in fallbacks
//!
//! Every sprite has an image path and a placeholder colour. Loading never
//! fails: a missing or broken image is replaced by a coloured square with the
//! sprite's name on it.

use crate::sim::{FruitKind, PowerupKind};

/// Side of the generated placeholder square
pub const PLACEHOLDER_SIZE: u32 = 200;

/// Everything that is drawn from an image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SpriteKind {
    Fruit(FruitKind),
    Powerup(PowerupKind),
}

impl SpriteKind {
    /// All sprites, fruits first
    pub fn all() -> impl Iterator<Item = SpriteKind> {
        FruitKind::REGULAR
            .into_iter()
            .chain(std::iter::once(FruitKind::Bomb))
            .map(SpriteKind::Fruit)
            .chain(PowerupKind::ALL.into_iter().map(SpriteKind::Powerup))
    }

    pub fn name(self) -> &'static str {
        match self {
            SpriteKind::Fruit(k) => k.as_str(),
            SpriteKind::Powerup(k) => k.as_str(),
        }
    }

    /// Image path relative to the page
    pub fn path(self) -> &'static str {
        match self {
            SpriteKind::Fruit(k) => match k {
                FruitKind::Apple => "assets/images/red-apple-fruit.png",
                // Pineapple shares the banana art
                FruitKind::Banana | FruitKind::Pineapple => "assets/images/yellow-banana.png",
                FruitKind::Orange => "assets/images/ripe-orange.png",
                FruitKind::Watermelon => "assets/images/watermelon-slice.png",
                FruitKind::Strawberry => "assets/images/ripe-strawberry.png",
                FruitKind::Bomb => "assets/images/black-bomb-with-fuse.png",
            },
            SpriteKind::Powerup(k) => match k {
                PowerupKind::Freeze => "assets/images/blue-snowflake.png",
                PowerupKind::Double => "assets/images/golden-number-2.png",
                PowerupKind::Magnet => "assets/images/golden-star-powerup.png",
            },
        }
    }

    /// Packed 0xRRGGBB used when the image is unavailable
    pub fn fallback_color(self) -> u32 {
        match self {
            SpriteKind::Fruit(k) => k.traits().color,
            SpriteKind::Powerup(k) => k.traits().color,
        }
    }
}

/// Description of a generated stand-in sprite
#[derive(Debug, Clone, PartialEq)]
pub struct Placeholder {
    pub size: u32,
    /// CSS fill colour
    pub fill: String,
    pub label: &'static str,
}

impl Placeholder {
    pub fn for_sprite(kind: SpriteKind) -> Self {
        Self {
            size: PLACEHOLDER_SIZE,
            fill: crate::css_color(kind.fallback_color()),
            label: kind.name(),
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use loader::{Sprite, SpriteSheet};

#[cfg(target_arch = "wasm32")]
mod loader {
    use std::collections::BTreeMap;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlImageElement};

    use super::{Placeholder, SpriteKind};

    /// A drawable image source
    #[derive(Debug, Clone)]
    pub enum Sprite {
        Image(HtmlImageElement),
        Canvas(HtmlCanvasElement),
    }

    /// Loaded sprites by kind
    #[derive(Debug, Default)]
    pub struct SpriteSheet {
        sprites: BTreeMap<SpriteKind, Sprite>,
    }

    impl SpriteSheet {
        /// Load every sprite; failures are replaced by placeholders
        pub async fn load(document: &Document) -> Self {
            // Start every request before waiting on any of them
            let pending: Vec<_> = SpriteKind::all()
                .map(|kind| (kind, request(kind)))
                .collect();

            let mut sprites = BTreeMap::new();
            let mut fallbacks = 0;
            for (kind, request) in pending {
                let sprite = match request {
                    Some((img, promise)) => match JsFuture::from(promise).await {
                        Ok(v) if v.as_bool() == Some(true) => Some(Sprite::Image(img)),
                        _ => None,
                    },
                    None => None,
                };
                let sprite = match sprite {
                    Some(s) => s,
                    None => {
                        log::warn!("Failed to load image: {} from {}", kind.name(), kind.path());
                        fallbacks += 1;
                        match placeholder(document, &Placeholder::for_sprite(kind)) {
                            Some(canvas) => Sprite::Canvas(canvas),
                            None => continue,
                        }
                    }
                };
                sprites.insert(kind, sprite);
            }

            log::info!(
                "Loaded {} sprites ({} placeholders)",
                sprites.len(),
                fallbacks
            );
            Self { sprites }
        }

        pub fn get(&self, kind: SpriteKind) -> Option<&Sprite> {
            self.sprites.get(&kind)
        }
    }

    /// Start loading an image; the promise resolves to true on load, false on error
    fn request(kind: SpriteKind) -> Option<(HtmlImageElement, js_sys::Promise)> {
        let img = HtmlImageElement::new().ok()?;
        img.set_cross_origin(Some("anonymous"));

        let promise = js_sys::Promise::new(&mut |resolve, _reject| {
            let on_load = resolve.clone();
            let onload = Closure::once_into_js(move || {
                let _ = on_load.call1(&JsValue::NULL, &JsValue::TRUE);
            });
            let onerror = Closure::once_into_js(move || {
                let _ = resolve.call1(&JsValue::NULL, &JsValue::FALSE);
            });
            img.set_onload(Some(onload.unchecked_ref()));
            img.set_onerror(Some(onerror.unchecked_ref()));
        });

        img.set_src(kind.path());
        Some((img, promise))
    }

    /// Paint a labelled coloured square
    fn placeholder(document: &Document, look: &Placeholder) -> Option<HtmlCanvasElement> {
        let canvas: HtmlCanvasElement = document.create_element("canvas").ok()?.dyn_into().ok()?;
        canvas.set_width(look.size);
        canvas.set_height(look.size);
        let ctx: CanvasRenderingContext2d = canvas.get_context("2d").ok()??.dyn_into().ok()?;

        let size = look.size as f64;
        ctx.set_fill_style_str(&look.fill);
        ctx.fill_rect(0.0, 0.0, size, size);

        ctx.set_fill_style_str("#ffffff");
        ctx.set_font("24px Arial");
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        ctx.fill_text(look.label, size / 2.0, size / 2.0).ok()?;

        Some(canvas)
    }
}
