pub const WINDOW_WIDTH: i32 = 1280;            // Default window width
pub const WINDOW_HEIGHT: i32 = 800;            // Default window height
pub const FPS: u32 = 60;                       // Frames per second

pub const SWIPE_THRESHOLD: f32 = 40.0;         // Horizontal travel (pixels) beyond which a touch is a swipe

pub const LISTING_LIMIT: usize = 24;           // Cards on the collection page
pub const RELATED_LIMIT: usize = 8;            // Cards in "You may also like"
pub const THUMB_STRIP_GALLERY_LIMIT: usize = 5; // Gallery previews next to the main image

pub const AUTO_ROTATE_SPEED: f32 = 0.35;       // Radians per second
pub const ORBIT_SENSITIVITY: f32 = 0.01;       // Radians per pixel of drag
pub const MIN_ZOOM_DISTANCE: f32 = 1.5;
pub const MAX_ZOOM_DISTANCE: f32 = 20.0;

pub const ORDER_EMAIL: &str = "orders@yourdomain.com";
pub const WHATSAPP_NUMBER: &str = "212710777000";
