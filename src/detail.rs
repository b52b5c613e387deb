use std::rc::Rc;
use raylib::prelude::*;

use crate::carousel::{CarouselView, MediaCarousel};
use crate::catalog::{detail_price, format_date, order_email_link, related_price, whatsapp_link, Card, Catalog, Product};
use crate::input::{Key, KeyboardHub};
use crate::listing::draw_card;
use crate::screen::*;
use crate::stage::{contains, draw_cover, Stage};
use crate::viewer::ViewerOptions;

const THUMB_SIZE: f32 = 80.0;
const ARROW_SIZE: f32 = 40.0;
const DOT_SIZE: f32 = 10.0;
const DOT_SPACING: f32 = 18.0;
const BODY_LINE_HEIGHT: f32 = 22.0;
const RELATED_INFO_HEIGHT: f32 = 52.0;

#[derive(Debug, Clone)]
struct DetailLayout {
    back: Rectangle,
    thumbs: Vec<Rectangle>,
    stage: Rectangle,
    // present only with more than one slide
    arrows: Option<(Rectangle, Rectangle)>,
    dots: Vec<Rectangle>,
    details: Rectangle,
    order: Rectangle,
    whatsapp: Rectangle,
    related_title_y: f32,
    related: Vec<Rectangle>,
    bottom: f32,
}

struct LayoutInput {
    width: f32,
    scroll: f32,
    thumbs: usize,
    slides: usize,
    body_lines: usize,
    related: usize,
}

fn column_width(width: f32) -> f32 {
    let content_width = width - MARGIN * 2.0;
    if width >= 1024.0 { (content_width - GAP * 2.0) / 2.0 } else { content_width }
}

// Approximate characters per body line for the details column
fn wrap_width(width: f32) -> usize {
    (column_width(width) / 9.0).max(20.0) as usize
}

fn layout(input: &LayoutInput) -> DetailLayout {
    let content_width = input.width - MARGIN * 2.0;
    let two_columns = input.width >= 1024.0;
    let column_width = column_width(input.width);

    let top = MARGIN + input.scroll;
    let back = Rectangle::new(MARGIN, top, 200.0, 20.0);
    let mut media_y = top + 44.0;

    // Thumbnail strip only when there is more than one preview
    let thumbs: Vec<Rectangle> = if input.thumbs > 1 {
        (0..input.thumbs)
            .map(|i| Rectangle::new(MARGIN + i as f32 * (THUMB_SIZE + 12.0), media_y, THUMB_SIZE, THUMB_SIZE))
            .collect()
    } else {
        Vec::new()
    };
    if !thumbs.is_empty() {
        media_y += THUMB_SIZE + 12.0;
    }

    let stage = Rectangle::new(MARGIN, media_y, column_width, column_width);
    let (arrows, dots) = if input.slides > 1 {
        let arrow_y = stage.y + stage.height / 2.0 - ARROW_SIZE / 2.0;
        let previous = Rectangle::new(stage.x + 12.0, arrow_y, ARROW_SIZE, ARROW_SIZE);
        let next = Rectangle::new(stage.x + stage.width - 12.0 - ARROW_SIZE, arrow_y, ARROW_SIZE, ARROW_SIZE);

        let row_width = input.slides as f32 * DOT_SPACING - (DOT_SPACING - DOT_SIZE);
        let start_x = stage.x + stage.width / 2.0 - row_width / 2.0;
        let dots = (0..input.slides)
            .map(|i| Rectangle::new(start_x + i as f32 * DOT_SPACING, stage.y + stage.height + 12.0, DOT_SIZE, DOT_SIZE))
            .collect();
        (Some((previous, next)), dots)
    } else {
        (None, Vec::new())
    };
    let media_bottom = stage.y + stage.height + 12.0 + DOT_SIZE;

    let (details_x, details_y) = if two_columns {
        (MARGIN + column_width + GAP * 2.0, top + 44.0)
    } else {
        (MARGIN, media_bottom + 32.0)
    };
    // title, tags, price row, then the body
    let body_top = details_y + 36.0 + 32.0 + 44.0;
    let cta_y = body_top + input.body_lines.max(1) as f32 * BODY_LINE_HEIGHT + 32.0;
    let order = Rectangle::new(details_x, cta_y, 170.0, 44.0);
    let whatsapp = Rectangle::new(details_x + 182.0, cta_y, 190.0, 44.0);
    let details = Rectangle::new(details_x, details_y, column_width, cta_y + 44.0 - details_y);

    let related_title_y = media_bottom.max(cta_y + 44.0 + 24.0) + 56.0;
    let related = grid(
        Vector2::new(MARGIN, related_title_y + 36.0),
        content_width,
        if input.width >= 1024.0 { 4 } else { columns_for(content_width, 2) },
        1.0,
        RELATED_INFO_HEIGHT,
        input.related,
    );
    let bottom = related.last().map_or(related_title_y, |r| r.y + r.height) + MARGIN;

    DetailLayout {
        back,
        thumbs,
        stage,
        arrows,
        dots,
        details,
        order,
        whatsapp,
        related_title_y,
        related,
        bottom,
    }
}

/// Product page: media column with the carousel, details column, related
/// products.
pub struct DetailScreen {
    catalog: Rc<Catalog>,
    site_url: String,
    product: Option<Product>,
    slug: String,
    related: Vec<Card>,
    // wrapped description and the line width it was wrapped at
    body: Vec<String>,
    wrapped_at: usize,
    carousel: MediaCarousel,
    stage: Stage,
    layout: DetailLayout,
    scroll: f32,
    press: Option<Vector2>,
    status: Option<String>,
}

impl DetailScreen {
    pub fn new(catalog: Rc<Catalog>, hub: &KeyboardHub, viewer: ViewerOptions, site_url: &str, slug: &str) -> Self {
        let stage = Stage::new(catalog.base_dir());
        let mut carousel = MediaCarousel::new(Default::default(), viewer);
        carousel.mount(hub);

        let mut screen = Self {
            catalog,
            site_url: site_url.to_string(),
            product: None,
            slug: String::new(),
            related: Vec::new(),
            body: Vec::new(),
            wrapped_at: 0,
            carousel,
            stage,
            layout: layout(&LayoutInput { width: 0.0, scroll: 0.0, thumbs: 0, slides: 0, body_lines: 0, related: 0 }),
            scroll: 0.0,
            press: None,
            status: None,
        };
        screen.show(slug);
        screen
    }

    /// Switches to another product; the carousel is re-propped in place.
    pub fn show(&mut self, slug: &str) {
        self.slug = slug.to_string();
        self.product = match self.catalog.product(slug) {
            Ok(product) => Some(product.clone()),
            Err(e) => {
                log::warn!("{}", e);
                None
            }
        };
        self.related = self.catalog.related(slug);
        let props = self.product.as_ref().map(Product::carousel_props).unwrap_or_default();
        self.carousel.set_props(props);
        self.wrapped_at = 0;
        self.scroll = 0.0;
        self.press = None;
        self.status = None;
    }

    /// Re-wraps the description when the product or the line width changed.
    fn rewrap(&mut self, width: f32) {
        let chars = wrap_width(width);
        if chars == self.wrapped_at {
            return;
        }
        self.body = match self.product.as_ref().and_then(|p| p.body.as_ref()) {
            Some(body) => body.iter().flat_map(|p| wrap_text(p, chars)).collect(),
            None => vec!["No description.".to_string()],
        };
        self.wrapped_at = chars;
    }

    fn thumb_strip(&self) -> Vec<&str> {
        self.product.as_ref().map(Product::thumb_strip).unwrap_or_default()
    }

    fn model_active(&self) -> bool {
        self.carousel.active_slide().is_some_and(|active| active.slide.is_model())
    }

    fn click(&mut self, press: Vector2, release: Vector2) -> Option<Route> {
        let hit = |r: Rectangle| contains(r, press) && contains(r, release);

        if hit(self.layout.back) {
            return Some(Route::Listing);
        }
        if let Some((previous, next)) = self.layout.arrows {
            if hit(previous) {
                self.carousel.go_to_previous();
                return None;
            }
            if hit(next) {
                self.carousel.go_to_next();
                return None;
            }
        }
        if let Some(dot) = clicked(&self.layout.dots, press, release) {
            let target = match self.carousel.view() {
                CarouselView::Stage { controls: Some(controls), .. } => {
                    controls.indicators.get(dot).map(|indicator| indicator.index)
                }
                _ => None,
            };
            if let Some(index) = target {
                self.carousel.go_to_index(index);
            }
            return None;
        }
        if let Some(product) = &self.product {
            let link = if hit(self.layout.order) {
                Some(order_email_link(&product.title, &self.site_url, &self.slug))
            } else if hit(self.layout.whatsapp) {
                Some(whatsapp_link(&product.title))
            } else {
                None
            };
            if let Some(link) = link {
                log::info!("order link: {}", link);
                self.status = Some(link);
                return None;
            }
        }
        let card = clicked(&self.layout.related, press, release)?;
        Some(Route::Detail(self.related[card].slug.clone()))
    }
}

impl Screen for DetailScreen {
    fn update(&mut self, rl: &mut RaylibHandle, thread: &RaylibThread, keys: &[Key]) -> Option<Route> {
        if keys.contains(&Key::Back) {
            return Some(Route::Listing);
        }

        let width = rl.get_screen_width() as f32;
        let height = rl.get_screen_height() as f32;
        let mouse = rl.get_mouse_position();
        self.rewrap(width);

        let mut input = LayoutInput {
            width,
            scroll: self.scroll,
            thumbs: self.thumb_strip().len(),
            slides: self.carousel.len(),
            body_lines: self.body.len(),
            related: self.related.len(),
        };
        self.layout = layout(&input);

        // The wheel zooms the 3D viewer while the pointer is over it
        if !(self.model_active() && contains(self.layout.stage, mouse)) {
            let bottom = self.layout.bottom - self.scroll;
            self.scroll = clamp_scroll(self.scroll + rl.get_mouse_wheel_move() * 48.0, bottom, height);
            input.scroll = self.scroll;
            self.layout = layout(&input);
        }
        self.stage.set_rect(self.layout.stage);

        if rl.is_mouse_button_pressed(MouseButton::MOUSE_BUTTON_LEFT) {
            self.press = Some(mouse);
            if contains(self.layout.stage, mouse) {
                self.carousel.touch_start(mouse.x);
            }
        }
        if rl.is_mouse_button_released(MouseButton::MOUSE_BUTTON_LEFT) {
            self.carousel.touch_end(mouse.x);
            if let Some(press) = self.press.take() {
                if let Some(route) = self.click(press, mouse) {
                    return Some(route);
                }
            }
        }

        let thumbs: Vec<String> = self.thumb_strip().into_iter().map(str::to_string).collect();
        for thumb in &thumbs {
            self.stage.assets.ensure_texture(rl, thread, thumb);
        }
        for card in &self.related {
            if let Some(thumb) = &card.thumb_url {
                self.stage.assets.ensure_texture(rl, thread, thumb);
            }
        }

        let mut pass = self.stage.pass(rl, thread);
        self.carousel.render(&mut pass);
        None
    }

    fn draw(&self, d: &mut RaylibDrawHandle) {
        d.clear_background(Color::WHITE);
        let layout = &self.layout;
        // not laid out yet
        if layout.stage.width <= 0.0 {
            return;
        }

        d.draw_text("< Back to collection", layout.back.x as i32, layout.back.y as i32, 16, MUTED);

        let Some(product) = &self.product else {
            d.draw_text("Product not found.", MARGIN as i32, (layout.back.y + 44.0) as i32, 20, Color::RED);
            return;
        };

        let date = format_date(product.published_at.as_deref());
        if !date.is_empty() {
            let x = d.get_screen_width() - MARGIN as i32 - 80;
            d.draw_text(&date, x, layout.back.y as i32, 12, Color::GRAY);
        }

        // --- Media column ---
        for (src, rect) in self.thumb_strip().iter().zip(&layout.thumbs) {
            d.draw_rectangle_rec(*rect, SURFACE);
            if let Some(texture) = self.stage.assets.texture(src) {
                draw_cover(d, texture, *rect);
            }
            d.draw_rectangle_lines_ex(*rect, 1.0, BORDER);
        }

        self.stage.draw(d);

        if let CarouselView::Stage { controls: Some(controls), .. } = self.carousel.view() {
            if let Some((previous, next)) = layout.arrows {
                for (rect, glyph) in [(previous, "<"), (next, ">")] {
                    d.draw_rectangle_rounded(rect, 0.3, 6, Color::new(0, 0, 0, 166));
                    d.draw_text(glyph, rect.x as i32 + 14, rect.y as i32 + 10, 20, Color::WHITE);
                }
            }
            for (indicator, rect) in controls.indicators.iter().zip(&layout.dots) {
                let color = if indicator.active { Color::BLACK } else { Color::new(212, 212, 212, 255) };
                let center = Vector2::new(rect.x + DOT_SIZE / 2.0, rect.y + DOT_SIZE / 2.0);
                d.draw_circle_v(center, DOT_SIZE / 2.0, color);
                if contains(*rect, d.get_mouse_position()) {
                    d.draw_text(&indicator.label, rect.x as i32, (rect.y + 16.0) as i32, 10, MUTED);
                }
            }
        }

        // --- Details column ---
        let x = layout.details.x as i32;
        let mut y = layout.details.y as i32;
        d.draw_text(&product.title, x, y, 30, TEXT);
        y += 36;

        let mut tag_x = x;
        for tag in product.tags() {
            let tag_width = tag.chars().count() as i32 * 7 + 16;
            d.draw_rectangle_lines_ex(Rectangle::new(tag_x as f32, y as f32, tag_width as f32, 20.0), 1.0, BORDER);
            d.draw_text(tag, tag_x + 8, y + 5, 10, MUTED);
            tag_x += tag_width + 8;
        }
        y += 32;

        match detail_price(product.price) {
            Some(price) => d.draw_text(&price, x, y + 8, 24, TEXT),
            None => d.draw_text("Contact for price", x, y + 12, 16, MUTED),
        }
        if product.has_3d() {
            d.draw_rectangle(x + 180, y + 10, 80, 20, Color::BLACK);
            d.draw_text("3D preview", x + 186, y + 15, 10, Color::WHITE);
        }
        y += 44;

        for line in &self.body {
            d.draw_text(line, x, y, 16, Color::new(64, 64, 64, 255));
            y += BODY_LINE_HEIGHT as i32;
        }

        d.draw_rectangle_rounded(layout.order, 0.3, 6, Color::BLACK);
        d.draw_text("Order via Email", layout.order.x as i32 + 16, layout.order.y as i32 + 14, 16, Color::WHITE);
        d.draw_rectangle_lines_ex(layout.whatsapp, 1.0, Color::new(212, 212, 212, 255));
        d.draw_text("Chat on WhatsApp", layout.whatsapp.x as i32 + 16, layout.whatsapp.y as i32 + 14, 16, TEXT);
        if let Some(status) = &self.status {
            d.draw_text(status, layout.order.x as i32, (layout.order.y + 56.0) as i32, 10, MUTED);
        }

        // --- Related ---
        if !self.related.is_empty() {
            d.draw_text("You may also like", MARGIN as i32, layout.related_title_y as i32, 20, TEXT);
            for (card, rect) in self.related.iter().zip(&layout.related) {
                let price = related_price(card.price).unwrap_or_else(|| "View".to_string());
                draw_card(d, &self.stage.assets, card, *rect, RELATED_INFO_HEIGHT, "", &price);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    // Two variants sharing one gallery
    const VARIANTS: &str = r#"{
        "products": [
            {
                "_id": "blue",
                "title": "Blue vase",
                "slug": "blue-vase",
                "publishedAt": "2024-03-01",
                "image": "vase.jpg",
                "gallery": ["side.jpg", "top.jpg"],
                "body": ["Wheel thrown stoneware with a speckled satin glaze in a deep blue."]
            },
            {
                "_id": "green",
                "title": "Green vase",
                "slug": "green-vase",
                "publishedAt": "2024-02-01",
                "image": "vase.jpg",
                "gallery": ["side.jpg", "top.jpg"]
            }
        ]
    }"#;

    fn screen(hub: &KeyboardHub, slug: &str) -> DetailScreen {
        let catalog = Catalog::from_json(VARIANTS, PathBuf::from("/srv/catalog")).unwrap();
        DetailScreen::new(Rc::new(catalog), hub, ViewerOptions::default(), "", slug)
    }

    fn input(slides: usize, thumbs: usize) -> LayoutInput {
        LayoutInput { width: 1280.0, scroll: 0.0, thumbs, slides, body_lines: 3, related: 5 }
    }

    #[test]
    fn controls_only_with_several_slides() {
        for slides in [0, 1] {
            let layout = layout(&input(slides, 0));
            assert!(layout.arrows.is_none());
            assert!(layout.dots.is_empty());
        }
        let layout = layout(&input(3, 0));
        assert!(layout.arrows.is_some());
        assert_eq!(layout.dots.len(), 3);
    }

    #[test]
    fn arrows_sit_on_the_stage() {
        let layout = layout(&input(2, 0));
        let (previous, next) = layout.arrows.unwrap();
        let inside = |r: Rectangle| {
            contains(layout.stage, Vector2::new(r.x, r.y))
                && contains(layout.stage, Vector2::new(r.x + r.width, r.y + r.height))
        };
        assert!(inside(previous) && inside(next));
    }

    #[test]
    fn single_thumb_hides_the_strip() {
        assert!(layout(&input(1, 1)).thumbs.is_empty());
        let layout = layout(&input(3, 3));
        assert_eq!(layout.thumbs.len(), 3);
        assert!(layout.stage.y >= layout.thumbs[0].y + THUMB_SIZE);
    }

    #[test]
    fn narrow_window_stacks_columns() {
        let layout = layout(&LayoutInput { width: 800.0, ..input(2, 0) });
        assert!(layout.details.y > layout.stage.y + layout.stage.height);
        assert_eq!(layout.details.x, MARGIN);
    }

    #[test]
    fn related_follows_content() {
        let layout = layout(&input(2, 0));
        assert_eq!(layout.related.len(), 5);
        assert!(layout.related[0].y > layout.related_title_y);
        assert!(layout.bottom > layout.related[4].y);
        assert!(layout.order.width > 0.0 && layout.order.y > layout.details.y);
    }

    #[test]
    fn switching_to_a_variant_starts_at_the_first_slide() {
        let hub = KeyboardHub::new();
        let mut screen = screen(&hub, "blue-vase");
        screen.carousel.go_to_index(2);

        screen.show("green-vase");
        assert_eq!(screen.carousel.cursor(), 0);
        assert_eq!(screen.carousel.len(), 3);
        assert_eq!(hub.listener_count(), 1);
    }

    #[test]
    fn description_is_wrapped_once_per_width() {
        let hub = KeyboardHub::new();
        let mut screen = screen(&hub, "blue-vase");

        screen.rewrap(1280.0);
        assert_eq!(screen.wrapped_at, wrap_width(1280.0));
        assert!(screen.body.iter().all(|line| line.chars().count() <= screen.wrapped_at));
        let wide = screen.body.clone();

        screen.rewrap(300.0);
        assert!(screen.body.len() > wide.len());

        screen.show("green-vase");
        screen.rewrap(300.0);
        assert_eq!(screen.body, ["No description."]);
    }
}
