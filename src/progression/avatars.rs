//! Avatar catalogs: bubble avatars, level shapes and the shape shop

use once_cell::sync::Lazy;
use serde::Serialize;

use super::progress::UserProgress;

/// Bubble avatars, picked once from level 2 on
pub static BUBBLE_AVATARS: &[&str] = &[
    "bubble_skull",
    "bubble_alien",
    "bubble_cat",
    "bubble_robot",
    "bubble_ghost",
    "bubble_frog",
    "bubble_shark",
    "bubble_owl",
    "bubble_panda",
    "bubble_fox",
    "bubble_octopus",
    "bubble_bear",
    "bubble_dino",
];

/// Shape avatars granted automatically, one per level from 3 to 20
pub static LEVEL_SHAPES: &[(u32, &str)] = &[
    (3, "shape_circle"),
    (4, "shape_triangle"),
    (5, "shape_square"),
    (6, "shape_diamond"),
    (7, "shape_pentagon"),
    (8, "shape_hexagon"),
    (9, "shape_star"),
    (10, "shape_heart"),
    (11, "shape_bolt"),
    (12, "shape_crescent"),
    (13, "shape_cross"),
    (14, "shape_shield"),
    (15, "shape_crown"),
    (16, "shape_flame"),
    (17, "shape_wave"),
    (18, "shape_spiral"),
    (19, "shape_comet"),
    (20, "shape_infinity"),
];

/// Shop family; sets the price of every item in it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShopFamily {
    Neon,
    Chrome,
    Graffiti,
}

impl ShopFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Neon => "neon",
            Self::Chrome => "chrome",
            Self::Graffiti => "graffiti",
        }
    }

    pub fn price(&self) -> u64 {
        match self {
            Self::Neon => 50,
            Self::Chrome => 120,
            Self::Graffiti => 200,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopShape {
    pub id: String,
    pub family: ShopFamily,
    pub price: u64,
}

const NEON: &[&str] = &[
    "bolt", "ring", "orb", "arrow", "pulse", "halo", "spark", "grid", "beam", "tube", "glow",
    "laser", "vortex", "prism", "flare", "signal",
];
const CHROME: &[&str] = &[
    "bearing", "gear", "bolt", "rivet", "axle", "spring", "chain", "hubcap", "piston", "valve",
    "socket", "blade", "coil", "hinge", "trophy", "mirror",
];
const GRAFFITI: &[&str] = &[
    "tag", "throwie", "drip", "crown", "arrow", "bubble", "wildstyle", "stencil", "spray",
    "splat", "burner", "halo", "eyes", "skull", "star", "heart", "piece",
];

/// Purchasable shapes, 49 items across three families
pub static SHAPE_SHOP: Lazy<Vec<ShopShape>> = Lazy::new(|| {
    [
        (ShopFamily::Neon, NEON),
        (ShopFamily::Chrome, CHROME),
        (ShopFamily::Graffiti, GRAFFITI),
    ]
    .into_iter()
    .flat_map(|(family, names)| {
        names.iter().map(move |name| ShopShape {
            id: format!("shop_{}_{}", family.as_str(), name),
            family,
            price: family.price(),
        })
    })
    .collect()
});

pub fn find_shop_shape(id: &str) -> Option<&'static ShopShape> {
    SHAPE_SHOP.iter().find(|s| s.id == id)
}

pub fn is_bubble(id: &str) -> bool {
    BUBBLE_AVATARS.contains(&id)
}

/// Bubble choices on offer: all of them once the level allows, none once chosen
pub fn offered_bubbles(progress: &UserProgress, level: u32, min_level: u32) -> Vec<&'static str> {
    if progress.bubble_avatar_id.is_some() || level < min_level {
        return Vec::new();
    }
    BUBBLE_AVATARS.to_vec()
}

/// Grant every level shape up to `level`.
///
/// Returns the newly granted ids in level order. The highest newly granted
/// shape becomes the active one.
pub fn sync_level_shapes(progress: &mut UserProgress, level: u32) -> Vec<&'static str> {
    let granted: Vec<&'static str> = LEVEL_SHAPES
        .iter()
        .filter(|(min_level, _)| *min_level <= level)
        .filter(|(_, id)| progress.unlocked_shape_avatar_ids.insert(id.to_string()))
        .map(|(_, id)| *id)
        .collect();

    if let Some(latest) = granted.last() {
        progress.shape_avatar_id = Some(latest.to_string());
    }
    granted
}
