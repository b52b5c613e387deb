//! Product documents exported from the hosted content store, plus the
//! queries and formatting the listing and detail pages need.

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use crate::carousel::CarouselProps;
use crate::constants::*;
use crate::error::CatalogError;

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub slug: Option<String>,
    pub published_at: Option<String>,
    pub price: Option<f64>,
    pub tags: Option<Vec<String>>,
    pub image: Option<String>,
    pub thumbnail: Option<String>,
    pub gallery: Option<Vec<Option<String>>>,
    // broadly compatible model (glb)
    pub model3d: Option<String>,
    // platform-native AR format (usdz)
    pub model3d_usdz: Option<String>,
    pub body: Option<Vec<String>>,
}

fn present(reference: &Option<String>) -> Option<&str> {
    reference.as_deref().filter(|s| !s.trim().is_empty())
}

impl Product {
    pub fn slug(&self) -> Option<&str> {
        present(&self.slug)
    }

    pub fn thumb_url(&self) -> Option<&str> {
        present(&self.thumbnail).or_else(|| present(&self.image))
    }

    pub fn main_image(&self) -> Option<&str> {
        present(&self.image).or_else(|| self.thumb_url())
    }

    pub fn gallery_urls(&self) -> Vec<&str> {
        self.gallery
            .iter()
            .flatten()
            .filter_map(|entry| entry.as_deref())
            .filter(|s| !s.trim().is_empty())
            .collect()
    }

    pub fn has_3d(&self) -> bool {
        present(&self.model3d).is_some()
    }

    pub fn tags(&self) -> &[String] {
        self.tags.as_deref().unwrap_or_default()
    }

    /// Main image followed by the whole gallery.
    pub fn carousel_images(&self) -> Vec<String> {
        self.main_image()
            .into_iter()
            .chain(self.gallery_urls())
            .map(str::to_string)
            .collect()
    }

    /// Main image followed by the first few gallery entries.
    pub fn thumb_strip(&self) -> Vec<&str> {
        self.main_image()
            .into_iter()
            .chain(self.gallery_urls().into_iter().take(THUMB_STRIP_GALLERY_LIMIT))
            .collect()
    }

    pub fn carousel_props(&self) -> CarouselProps {
        CarouselProps {
            item_key: self.id.clone(),
            title: self.title.clone(),
            primary_3d: present(&self.model3d).map(str::to_string),
            alternate_3d: present(&self.model3d_usdz).map(str::to_string),
            images: self.carousel_images(),
            class_name: None,
        }
    }

    fn published(&self) -> Option<DateTime<Utc>> {
        self.published_at.as_deref().and_then(parse_date)
    }
}

/// Summary shown on the collection grid and in "You may also like".
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub published_at: Option<String>,
    pub thumb_url: Option<String>,
    pub price: Option<f64>,
    pub tags: Vec<String>,
    pub has_3d: bool,
}

impl Card {
    fn from_product(product: &Product, slug: &str) -> Self {
        Self {
            id: product.id.clone(),
            title: product.title.clone(),
            slug: slug.to_string(),
            published_at: product.published_at.clone(),
            thumb_url: product.thumb_url().map(str::to_string),
            price: product.price,
            tags: product.tags().to_vec(),
            has_3d: product.has_3d(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    products: Vec<Product>,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    base_dir: PathBuf,
}

impl Catalog {
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let text = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let catalog = Self::from_json(&text, base_dir)?;
        log::info!("loaded {} products from {:?}", catalog.products.len(), path);
        Ok(catalog)
    }

    pub fn from_json(text: &str, base_dir: PathBuf) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(text)?;
        Ok(Self { products: file.products, base_dir })
    }

    /// Directory relative asset references are resolved against.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    // Products with a slug, newest first, undated last
    fn published(&self) -> Vec<(&Product, &str)> {
        let mut products: Vec<(&Product, &str)> = self
            .products
            .iter()
            .filter_map(|p| p.slug().map(|slug| (p, slug)))
            .collect();
        products.sort_by(|(a, _), (b, _)| match (a.published(), b.published()) {
            (Some(a), Some(b)) => b.cmp(&a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        products
    }

    pub fn listing(&self) -> Vec<Card> {
        self.published()
            .into_iter()
            .take(LISTING_LIMIT)
            .map(|(p, slug)| Card::from_product(p, slug))
            .collect()
    }

    pub fn product(&self, slug: &str) -> Result<&Product, CatalogError> {
        self.products
            .iter()
            .find(|p| p.slug() == Some(slug))
            .ok_or_else(|| CatalogError::NotFound(slug.to_string()))
    }

    pub fn related(&self, slug: &str) -> Vec<Card> {
        self.published()
            .into_iter()
            .filter(|(_, s)| *s != slug)
            .take(RELATED_LIMIT)
            .map(|(p, s)| Card::from_product(p, s))
            .collect()
    }
}

fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| d.and_utc())
}

/// `YYYY-MM-DD` of the UTC instant, or an empty string.
pub fn format_date(raw: Option<&str>) -> String {
    raw.and_then(parse_date)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn group_thousands(mut value: u64) -> String {
    let mut groups = Vec::new();
    loop {
        if value < 1000 {
            groups.push(value.to_string());
            break;
        }
        groups.push(format!("{:03}", value % 1000));
        value /= 1000;
    }
    groups.reverse();
    groups.join(",")
}

/// Canadian dollars, en-CA style: `$1,250.00`, `-$5`.
pub fn format_cad(amount: f64, fraction_digits: u32) -> String {
    let scale = 10u64.pow(fraction_digits);
    // f64::round rounds half away from zero, like Intl
    let units = (amount.abs() * scale as f64).round() as u64;
    let sign = if amount < 0.0 && units != 0 { "-" } else { "" };

    let mut out = format!("{}${}", sign, group_thousands(units / scale));
    if fraction_digits > 0 {
        out.push_str(&format!(".{:0width$}", units % scale, width = fraction_digits as usize));
    }
    out
}

/// Collection card price, whole dollars.
pub fn card_price(price: Option<f64>) -> Option<String> {
    price.filter(|p| p.is_finite()).map(|p| format_cad(p, 0))
}

/// Detail page price, with cents.
pub fn detail_price(price: Option<f64>) -> Option<String> {
    price.filter(|p| p.is_finite()).map(|p| format_cad(p, 2))
}

/// Related card price; a zero price reads as "View".
pub fn related_price(price: Option<f64>) -> Option<String> {
    detail_price(price.filter(|p| *p != 0.0))
}

pub fn order_email_link(title: &str, site_url: &str, slug: &str) -> String {
    let subject = format!("Order: {}", title);
    let body = format!(
        "Hi,\nI\u{2019}d like to order \"{}\".\n\nLink: {}/{}",
        title, site_url, slug
    );
    format!(
        "mailto:{}?subject={}&body={}",
        ORDER_EMAIL,
        urlencoding::encode(&subject),
        urlencoding::encode(&body)
    )
}

pub fn whatsapp_link(title: &str) -> String {
    let text = format!("Hi, I'm interested in {}", title);
    format!("https://wa.me/{}?text={}", WHATSAPP_NUMBER, urlencoding::encode(&text))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"{
        "products": [
            {
                "_id": "p1",
                "title": "Vase",
                "slug": "vase",
                "publishedAt": "2024-03-01T12:00:00Z",
                "price": 1250,
                "tags": ["ceramic", "blue"],
                "image": "vase.jpg",
                "gallery": ["v1.jpg", null, "", "v2.jpg"],
                "model3d": "vase.glb",
                "model3dUsdz": "vase.usdz",
                "body": ["Hand thrown."]
            },
            {
                "_id": "p2",
                "title": "Bowl",
                "slug": "bowl",
                "publishedAt": "2024-05-10T08:30:00+02:00",
                "price": 0,
                "thumbnail": "bowl-thumb.jpg",
                "gallery": null
            },
            { "_id": "p3", "title": "Draft", "slug": "" },
            { "_id": "p4", "title": "Plate", "slug": "plate" }
        ]
    }"#;

    fn catalog() -> Catalog {
        Catalog::from_json(CATALOG, PathBuf::from("/srv/catalog")).unwrap()
    }

    #[test]
    fn listing_skips_unslugged_and_orders_newest_first() {
        let cards = catalog().listing();
        let slugs: Vec<&str> = cards.iter().map(|c| c.slug.as_str()).collect();
        assert_eq!(slugs, ["bowl", "vase", "plate"]);
        assert!(cards[1].has_3d);
        assert!(!cards[0].has_3d);
        assert_eq!(cards[0].thumb_url.as_deref(), Some("bowl-thumb.jpg"));
        assert_eq!(cards[1].thumb_url.as_deref(), Some("vase.jpg"));
    }

    #[test]
    fn related_excludes_current() {
        let related = catalog().related("vase");
        assert!(related.iter().all(|c| c.slug != "vase"));
        assert_eq!(related.len(), 2);
    }

    #[test]
    fn unknown_slug_is_not_found() {
        let catalog = catalog();
        assert!(matches!(catalog.product("nope"), Err(CatalogError::NotFound(_))));
    }

    #[test]
    fn detail_media() {
        let catalog = catalog();
        let vase = catalog.product("vase").unwrap();
        assert_eq!(vase.carousel_images(), ["vase.jpg", "v1.jpg", "v2.jpg"]);
        assert_eq!(vase.thumb_strip(), ["vase.jpg", "v1.jpg", "v2.jpg"]);

        let props = vase.carousel_props();
        assert_eq!(props.primary_3d.as_deref(), Some("vase.glb"));
        assert_eq!(props.alternate_3d.as_deref(), Some("vase.usdz"));
        assert_eq!(props.item_key, "p1");

        let bowl = catalog.product("bowl").unwrap();
        assert_eq!(bowl.main_image(), Some("bowl-thumb.jpg"));
        assert_eq!(bowl.carousel_props().primary_3d, None);
    }

    #[test]
    fn thumb_strip_caps_gallery() {
        let product = Product {
            image: Some("main.jpg".into()),
            gallery: Some((0..8).map(|i| Some(format!("g{}.jpg", i))).collect()),
            ..Product::default()
        };
        assert_eq!(product.thumb_strip().len(), 1 + THUMB_STRIP_GALLERY_LIMIT);
        assert_eq!(product.carousel_images().len(), 9);
    }

    #[test]
    fn prices() {
        assert_eq!(format_cad(1250.0, 0), "$1,250");
        assert_eq!(format_cad(1250.0, 2), "$1,250.00");
        assert_eq!(format_cad(1234567.891, 2), "$1,234,567.89");
        assert_eq!(format_cad(99.5, 0), "$100");
        assert_eq!(format_cad(-5.0, 2), "-$5.00");
        assert_eq!(card_price(Some(0.0)).as_deref(), Some("$0"));
        assert_eq!(card_price(None), None);
        assert_eq!(related_price(Some(0.0)), None);
        assert_eq!(related_price(Some(12.0)).as_deref(), Some("$12.00"));
    }

    #[test]
    fn dates() {
        assert_eq!(format_date(Some("2024-05-10T01:30:00+02:00")), "2024-05-09");
        assert_eq!(format_date(Some("2024-05-10")), "2024-05-10");
        assert_eq!(format_date(Some("yesterday")), "");
        assert_eq!(format_date(None), "");
    }

    #[test]
    fn order_links_are_encoded() {
        assert_eq!(
            whatsapp_link("Blue Vase"),
            "https://wa.me/212710777000?text=Hi%2C%20I%27m%20interested%20in%20Blue%20Vase"
        );
        let mail = order_email_link("Vase", "https://shop.example", "vase");
        assert!(mail.starts_with("mailto:orders@yourdomain.com?subject=Order%3A%20Vase&body=Hi%2C%0A"));
        assert!(mail.ends_with("https%3A%2F%2Fshop.example%2Fvase"));
    }
}
