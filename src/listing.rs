use raylib::prelude::*;

use crate::catalog::{card_price, format_date, Card, Catalog};
use crate::input::Key;
use crate::screen::*;
use crate::stage::{draw_cover, AssetCache};

const HEADER_HEIGHT: f32 = 96.0;
const CARD_INFO_HEIGHT: f32 = 64.0;

/// The collection grid.
pub struct ListingScreen {
    cards: Vec<Card>,
    assets: AssetCache,
    rects: Vec<Rectangle>,
    scroll: f32,
    press: Option<Vector2>,
}

impl ListingScreen {
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            cards: catalog.listing(),
            assets: AssetCache::new(catalog.base_dir()),
            rects: Vec::new(),
            scroll: 0.0,
            press: None,
        }
    }
}

impl Screen for ListingScreen {
    fn update(&mut self, rl: &mut RaylibHandle, thread: &RaylibThread, _keys: &[Key]) -> Option<Route> {
        let width = rl.get_screen_width() as f32;
        let height = rl.get_screen_height() as f32;
        let content_width = width - MARGIN * 2.0;

        let layout = |scroll: f32| {
            grid(
                Vector2::new(MARGIN, MARGIN + HEADER_HEIGHT + scroll),
                content_width,
                columns_for(content_width, 4),
                0.75,
                CARD_INFO_HEIGHT,
                self.cards.len(),
            )
        };

        let bottom = layout(0.0).last().map_or(0.0, |r| r.y + r.height) + MARGIN;
        self.scroll = clamp_scroll(self.scroll + rl.get_mouse_wheel_move() * 48.0, bottom, height);
        self.rects = layout(self.scroll);

        for card in &self.cards {
            if let Some(thumb) = &card.thumb_url {
                self.assets.ensure_texture(rl, thread, thumb);
            }
        }

        let mouse = rl.get_mouse_position();
        if rl.is_mouse_button_pressed(MouseButton::MOUSE_BUTTON_LEFT) {
            self.press = Some(mouse);
        }
        if rl.is_mouse_button_released(MouseButton::MOUSE_BUTTON_LEFT) {
            let press = self.press.take()?;
            let hit = clicked(&self.rects, press, mouse)?;
            log::debug!("opening {} ({})", self.cards[hit].slug, self.cards[hit].id);
            return Some(Route::Detail(self.cards[hit].slug.clone()));
        }
        None
    }

    fn draw(&self, d: &mut RaylibDrawHandle) {
        d.clear_background(Color::WHITE);

        let top = (MARGIN + self.scroll) as i32;
        d.draw_text("Collection", MARGIN as i32, top, 36, TEXT);
        d.draw_text(
            "Hand-picked items - updated automatically from the catalog.",
            MARGIN as i32,
            top + 46,
            16,
            MUTED,
        );

        if self.cards.is_empty() {
            d.draw_text("Nothing here yet.", MARGIN as i32, top + HEADER_HEIGHT as i32, 20, MUTED);
        }

        for (card, rect) in self.cards.iter().zip(&self.rects) {
            let price = card_price(card.price).unwrap_or_else(|| "View".to_string());
            let subtitle = format_date(card.published_at.as_deref());
            draw_card(d, &self.assets, card, *rect, CARD_INFO_HEIGHT, &subtitle, &price);
        }
    }
}

/// Product card: thumbnail with "3D" and first-tag badges, then title,
/// a muted subtitle and the price (or "View").
pub fn draw_card(
    d: &mut RaylibDrawHandle,
    assets: &AssetCache,
    card: &Card,
    rect: Rectangle,
    info_height: f32,
    subtitle: &str,
    price: &str,
) {
    let image = Rectangle::new(rect.x, rect.y, rect.width, rect.height - info_height);
    d.draw_rectangle_rec(image, SURFACE);
    match card.thumb_url.as_deref().and_then(|t| assets.texture(t)) {
        Some(texture) => draw_cover(d, texture, image),
        None => d.draw_text(
            "No image",
            (image.x + image.width / 2.0) as i32 - 40,
            (image.y + image.height / 2.0) as i32 - 8,
            16,
            Color::LIGHTGRAY,
        ),
    }

    let mut badge_x = image.x as i32 + 12;
    let badge_y = image.y as i32 + 12;
    if card.has_3d {
        d.draw_rectangle(badge_x, badge_y, 30, 20, Color::new(0, 0, 0, 180));
        d.draw_text("3D", badge_x + 6, badge_y + 5, 10, Color::WHITE);
        badge_x += 38;
    }
    if let Some(tag) = card.tags.first() {
        let tag_width = tag.chars().count() as i32 * 7 + 12;
        d.draw_rectangle(badge_x, badge_y, tag_width, 20, Color::new(255, 255, 255, 205));
        d.draw_text(tag, badge_x + 6, badge_y + 5, 10, Color::DARKGRAY);
    }

    let info_y = (image.y + image.height) as i32;
    d.draw_text(&card.title, rect.x as i32 + 12, info_y + 12, 18, TEXT);
    d.draw_text(subtitle, rect.x as i32 + 12, info_y + 38, 12, MUTED);
    d.draw_text(price, (rect.x + rect.width) as i32 - 12 - price.len() as i32 * 9, info_y + 36, 16, TEXT);

    d.draw_rectangle_lines_ex(rect, 1.0, BORDER);
}
