//! Synthetic listings for searches that produced no live results.
//!
//! The generated set always has the regular `Listing` shape: six offers across
//! three sellers, sorted by price, with the cheapest marked as the best deal.
//! Values are drawn from an RNG seeded by the query, so the same query always
//! yields the same listings.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};
use unicode_segmentation::UnicodeSegmentation;

use crate::models::{BEST_DEAL_BADGE, Listing};
use crate::pipeline::rank_listings;

/// Badge selection for one template.
#[derive(Debug, Clone, Copy)]
enum BadgeRule {
    Fixed(&'static str),
    /// `first` with the given probability, otherwise `second`.
    Either {
        first: &'static str,
        second: &'static str,
        first_chance: f64,
    },
}

/// Blueprint for one synthetic listing.
#[derive(Debug, Clone, Copy)]
struct Template {
    id: &'static str,
    seller: &'static str,
    url: &'static str,
    variant: usize,
    /// Inclusive price bounds
    price: (f64, f64),
    rating: (f64, f64),
    badge: BadgeRule,
}

const TEMPLATES: [Template; 6] = [
    Template {
        id: "amazon_1",
        seller: "Amazon",
        url: "https://amazon.com",
        variant: 1,
        price: (50.0, 300.0),
        rating: (4.2, 5.0),
        badge: BadgeRule::Either {
            first: "Prime",
            second: "Best Seller",
            first_chance: 0.5,
        },
    },
    Template {
        id: "amazon_2",
        seller: "Amazon",
        url: "https://amazon.com",
        variant: 2,
        price: (40.0, 250.0),
        rating: (4.0, 4.9),
        badge: BadgeRule::Fixed("Amazon Choice"),
    },
    Template {
        id: "ebay_1",
        seller: "eBay",
        url: "https://ebay.com",
        variant: 1,
        price: (30.0, 200.0),
        rating: (3.8, 4.8),
        badge: BadgeRule::Either {
            first: "Auction",
            second: "Buy It Now",
            first_chance: 0.4,
        },
    },
    Template {
        id: "ebay_2",
        seller: "eBay",
        url: "https://ebay.com",
        variant: 2,
        price: (25.0, 180.0),
        rating: (3.9, 4.7),
        badge: BadgeRule::Fixed("Free Returns"),
    },
    Template {
        id: "walmart_1",
        seller: "Walmart",
        url: "https://walmart.com",
        variant: 1,
        price: (35.0, 220.0),
        rating: (4.1, 4.8),
        badge: BadgeRule::Either {
            first: "Free Pickup",
            second: "Rollback",
            first_chance: 0.6,
        },
    },
    Template {
        id: "walmart_2",
        seller: "Walmart",
        url: "https://walmart.com",
        variant: 2,
        price: (45.0, 190.0),
        rating: (4.0, 4.8),
        badge: BadgeRule::Fixed("Great Value"),
    },
];

/// Known product families and the titles used for them.
const CATEGORIES: [(&str, [&str; 5]); 4] = [
    (
        "iphone",
        [
            "Apple iPhone 15 Pro Max 256GB - Natural Titanium",
            "iPhone 14 Plus 128GB Blue - Unlocked",
            "Apple iPhone 13 mini 256GB Pink - Certified Refurbished",
            "iPhone 15 Pro 512GB Black Titanium - Factory Unlocked",
            "Apple iPhone 12 64GB Purple - Verizon",
        ],
    ),
    (
        "laptop",
        [
            "Dell XPS 13 Laptop - Intel i7, 16GB RAM, 512GB SSD",
            "MacBook Air M2 13-inch 8GB 256GB - Space Gray",
            "HP Pavilion 15.6\" Laptop AMD Ryzen 5 8GB 256GB",
            "Lenovo ThinkPad E15 Business Laptop i5 16GB 512GB",
            "ASUS VivoBook 14\" FHD Laptop Intel i3 8GB 128GB",
        ],
    ),
    (
        "headphones",
        [
            "Sony WH-1000XM5 Wireless Noise Canceling Headphones",
            "Apple AirPods Pro (2nd Generation) with MagSafe Case",
            "Bose QuietComfort 45 Bluetooth Wireless Headphones",
            "JBL Tune 760NC Wireless Over-Ear Headphones",
            "Beats Studio3 Wireless Noise Cancelling Headphones",
        ],
    ),
    (
        "watch",
        [
            "Apple Watch Series 9 GPS 45mm Midnight Aluminum",
            "Samsung Galaxy Watch6 Classic 47mm Black",
            "Fitbit Versa 4 Health & Fitness Smartwatch",
            "Garmin Venu 3 GPS Smartwatch with AMOLED Display",
            "Amazfit GTR 4 Smart Watch for Men Women",
        ],
    ),
];

const BRANDS: [&str; 7] = ["Samsung", "Apple", "Sony", "LG", "HP", "Dell", "Lenovo"];
const ADJECTIVES: [&str; 7] = [
    "Pro",
    "Plus",
    "Ultra",
    "Max",
    "Premium",
    "Essential",
    "Advanced",
];

/// Generates schema-valid listings when live sources return nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackGenerator;

impl FallbackGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Produce the synthetic result set for a query.
    pub fn generate(&self, query: &str) -> Vec<Listing> {
        let term = Self::normalize(query);
        let mut rng = StdRng::seed_from_u64(Self::seed(&term));

        let listings: Vec<Listing> = TEMPLATES
            .iter()
            .map(|template| Self::build(template, &term, &mut rng))
            .collect();

        let mut ranked = rank_listings(listings, TEMPLATES.len());
        if let Some(best) = ranked.first_mut() {
            best.badge = Some(BEST_DEAL_BADGE.to_string());
        }
        ranked
    }

    fn build(template: &Template, term: &str, rng: &mut StdRng) -> Listing {
        let title = Self::title(term, template.seller, template.variant, rng);
        let (min, max) = template.price;
        let price = (rng.gen_range(min..max) * 100.0).round() / 100.0;
        let (low, high) = template.rating;
        let rating = rng.gen_range(low..high);
        let badge = match template.badge {
            BadgeRule::Fixed(label) => label,
            BadgeRule::Either {
                first,
                second,
                first_chance,
            } => {
                if rng.gen_bool(first_chance) {
                    first
                } else {
                    second
                }
            }
        };

        Listing {
            id: template.id.to_string(),
            title,
            price,
            currency: "USD".to_string(),
            seller: template.seller.to_string(),
            rating,
            url: template.url.to_string(),
            best_deal: false,
            badge: Some(badge.to_string()),
        }
    }

    fn title(term: &str, seller: &str, variant: usize, rng: &mut StdRng) -> String {
        if let Some((_, titles)) = CATEGORIES.iter().find(|(name, _)| term.contains(name)) {
            return titles[(variant - 1) % titles.len()].to_string();
        }

        let brand = BRANDS[rng.gen_range(0..BRANDS.len())];
        let adjective = ADJECTIVES[rng.gen_range(0..ADJECTIVES.len())];
        let suffix = match seller {
            "Amazon" => "Prime Eligible",
            "eBay" => "Certified",
            _ => "Great Value",
        };
        format!("{brand} {} {adjective} - {suffix}", Self::capitalize(term))
    }

    fn normalize(query: &str) -> String {
        let term = query.trim().to_lowercase();
        if term.is_empty() {
            "product".to_string()
        } else {
            term
        }
    }

    fn seed(term: &str) -> u64 {
        let digest = Sha256::digest(term.as_bytes());
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&digest[..8]);
        u64::from_le_bytes(bytes)
    }

    /// Uppercase the first grapheme.
    fn capitalize(term: &str) -> String {
        let mut graphemes = term.graphemes(true);
        match graphemes.next() {
            Some(first) => format!("{}{}", first.to_uppercase(), graphemes.as_str()),
            None => String::new(),
        }
    }
}
