//! # Demo Catalog
//!
//! The fixed product data backing the mocked recognition pipeline.
//!
//! ## Resolution Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Demo Catalog Lookups                               │
//! │                                                                         │
//! │  Barcode "8801043032197" ──► known_product() ──► Honey Butter Chip     │
//! │  Barcode "8801043126359" ──► known_product() ──► Shin Ramyun           │
//! │  Any other barcode ────────► fallback_for_barcode() ──► demo record    │
//! │                              (stable per code, keyed by the code)      │
//! │  Image / search query ─────► demo_set() pick  ──► demo record          │
//! │                              (keyed by product name)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No real product database exists behind this module; every record is a
//! hardcoded demo. Display strings stay in their original Korean because the
//! engine passes them through unchanged.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{NutritionFacts, ProductRecord};

/// Barcode of the Honey Butter Chip demo record.
pub const HONEY_BUTTER_CHIP_BARCODE: &str = "8801043032197";

/// Barcode of the Shin Ramyun demo record.
pub const SHIN_RAMYUN_BARCODE: &str = "8801043126359";

// =============================================================================
// Demo Records
// =============================================================================

/// The Honey Butter Chip demo record, keyed by name.
pub fn honey_butter_chip() -> ProductRecord {
    ProductRecord {
        key: "허니버터칩".to_string(),
        name: "허니버터칩".to_string(),
        name_en: "Honey Butter Chip".to_string(),
        price: "₩2,500".to_string(),
        rating: 4.6,
        reviews: 1_857,
        description: "달콤한 꿀과 고소한 버터맛이 만난 대한민국 대표 스낵! 바삭한 감자칩에 특별한 허니버터 시즈닝을 입혀 중독적인 맛을 자랑합니다."
            .to_string(),
        tags: vec![
            "스낵".to_string(),
            "인기상품".to_string(),
            "선물추천".to_string(),
            "한국대표".to_string(),
            "달콤함".to_string(),
        ],
        category: "과자/스낵".to_string(),
        nutrition: NutritionFacts {
            calories: "555kcal/100g".to_string(),
            fat: "32g".to_string(),
            sodium: "500mg".to_string(),
            carbs: "58g".to_string(),
        },
        image: "data:image/svg+xml;base64,PHN2ZyB3aWR0aD0iMTgwIiBoZWlnaHQ9IjE4MCIgeG1sbnM9Imh0dHA6Ly93d3cudzMub3JnLzIwMDAvc3ZnIj48cmVjdCB3aWR0aD0iMTAwJSIgaGVpZ2h0PSIxMDAlIiBmaWxsPSIjZmZkNzAwIiByeD0iMTYiLz48dGV4dCB4PSI1MCUiIHk9IjUwJSIgZm9udC1mYW1pbHk9IkFyaWFsLCBzYW5zLXNlcmlmIiBmb250LXNpemU9IjE4IiBmaWxsPSIjMzMzIiB0ZXh0LWFuY2hvcj0ibWlkZGxlIiBkeT0iMC4zZW0iIGZvbnQtd2VpZ2h0PSJib2xkIj7smojsnpAg7ISc64+EPC90ZXh0Pjwvc3ZnPg=="
            .to_string(),
        barcode: None,
    }
}

/// The Shin Ramyun demo record, keyed by name.
pub fn shin_ramyun() -> ProductRecord {
    ProductRecord {
        key: "신라면".to_string(),
        name: "신라면".to_string(),
        name_en: "Shin Ramyun".to_string(),
        price: "₩900".to_string(),
        rating: 4.7,
        reviews: 4_521,
        description: "매콤하고 얼큰한 맛으로 전 세계인들이 사랑하는 한국의 대표 인스턴트 라면입니다. 1986년 출시 이래 한국인의 소울푸드로 자리잡았습니다."
            .to_string(),
        tags: vec![
            "라면".to_string(),
            "매운맛".to_string(),
            "한국음식".to_string(),
            "간편식".to_string(),
            "인기".to_string(),
        ],
        category: "식품".to_string(),
        nutrition: NutritionFacts {
            calories: "500kcal/120g".to_string(),
            fat: "16g".to_string(),
            sodium: "1790mg".to_string(),
            carbs: "80g".to_string(),
        },
        image: "data:image/svg+xml;base64,PHN2ZyB3aWR0aD0iMTgwIiBoZWlnaHQ9IjE4MCIgeG1sbnM9Imh0dHA6Ly93d3cudzMub3JnLzIwMDAvc3ZnIj48cmVjdCB3aWR0aD0iMTAwJSIgaGVpZ2h0PSIxMDAlIiBmaWxsPSIjZGQwMDAwIiByeD0iMTYiLz48dGV4dCB4PSI1MCUiIHk9IjUwJSIgZm9udC1mYW1pbHk9IkFyaWFsLCBzYW5zLXNlcmlmIiBmb250LXNpemU9IjIwIiBmaWxsPSIjZmZmIiB0ZXh0LWFuY2hvcj0ibWlkZGxlIiBkeT0iMC4zZW0iIGZvbnQtd2VpZ2h0PSJib2xkIj7si6DrnbzrqbQ8L3RleHQ+PC9zdmc+"
            .to_string(),
        barcode: None,
    }
}

/// The fixed demo set image and search resolutions pick from.
pub fn demo_set() -> Vec<ProductRecord> {
    vec![honey_butter_chip(), shin_ramyun()]
}

// =============================================================================
// Barcode Lookups
// =============================================================================

/// Exact lookup in the known-barcode table.
///
/// The returned record is keyed by the barcode so that two scans of the same
/// code deduplicate in history while distinct codes never collide.
pub fn known_product(code: &str) -> Option<ProductRecord> {
    let base = match code {
        HONEY_BUTTER_CHIP_BARCODE => honey_butter_chip(),
        SHIN_RAMYUN_BARCODE => shin_ramyun(),
        _ => return None,
    };
    Some(rekey_for_barcode(base, code))
}

/// Fallback for barcodes outside the known table.
///
/// Deterministic: the same code always maps to the same demo base record, so
/// re-scanning an unknown code refreshes its history entry instead of
/// creating a sibling. The record is tagged with and keyed by the code.
pub fn fallback_for_barcode(code: &str) -> ProductRecord {
    let set = demo_set();
    let index = fold_hash(code) as usize % set.len();
    let base = set.into_iter().nth(index).expect("demo set is non-empty");
    rekey_for_barcode(base, code)
}

fn rekey_for_barcode(mut record: ProductRecord, code: &str) -> ProductRecord {
    record.key = code.to_string();
    record.barcode = Some(code.to_string());
    record
}

/// FNV-1a over the code bytes. Stability matters here, not distribution.
fn fold_hash(code: &str) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in code.bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

// =============================================================================
// Search Suggestions
// =============================================================================

/// A search suggestion row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub name: String,
    pub icon: String,
}

/// Common products offered as type-ahead suggestions.
fn common_products() -> Vec<Suggestion> {
    let rows = [
        ("허니버터칩", "cookie-bite"),
        ("신라면", "utensils"),
        ("불닭볶음면", "fire"),
        ("마스크팩", "spa"),
        ("김치", "leaf"),
        ("한복", "tshirt"),
    ];
    rows.iter()
        .map(|(name, icon)| Suggestion {
            name: (*name).to_string(),
            icon: (*icon).to_string(),
        })
        .collect()
}

/// Case-insensitive substring match over the common-product list.
///
/// Queries shorter than 2 characters yield nothing; at most 4 rows come back.
pub fn suggestions(query: &str) -> Vec<Suggestion> {
    let query = query.trim();
    if query.chars().count() < 2 {
        return Vec::new();
    }
    let needle = query.to_lowercase();
    common_products()
        .into_iter()
        .filter(|s| s.name.to_lowercase().contains(&needle))
        .take(4)
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
