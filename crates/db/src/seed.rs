//! Idempotent seeding of system default categories and locations.
//!
//! Rows are matched by name (and parent) among live system rows, so running
//! the seed repeatedly only inserts what is missing.

use sqlx::PgPool;

use crate::repositories::{CategoryRepo, LocationRepo};

/// System category tree: each parent with its children.
pub const DEFAULT_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Technology",
        &[
            "Computers",
            "Laptops",
            "Mobile Devices",
            "Tablets",
            "Audio & Video",
            "Gaming",
            "Smart Home",
            "Electronics",
        ],
    ),
    (
        "Home & Living",
        &[
            "Furniture",
            "Appliances",
            "Kitchen",
            "Bathroom",
            "Bedroom",
            "Living Room",
            "Home Decor",
            "Storage",
        ],
    ),
    (
        "Transportation",
        &["Vehicles", "Cars", "Motorcycles", "Bicycles", "Auto Parts"],
    ),
    (
        "Tools & Equipment",
        &[
            "Hand Tools",
            "Power Tools",
            "Garden Tools",
            "Construction",
            "Safety Equipment",
        ],
    ),
    (
        "Personal Items",
        &["Jewelry", "Watches", "Clothing", "Accessories", "Personal Care"],
    ),
    (
        "Entertainment",
        &[
            "Books",
            "Movies & Music",
            "Sports Equipment",
            "Musical Instruments",
            "Art & Crafts",
            "Photography",
            "Games",
            "Fitness Equipment",
        ],
    ),
    (
        "Office & Business",
        &["Office Equipment", "Computers & IT", "Stationery", "Documents"],
    ),
    (
        "Health & Beauty",
        &["Medical Equipment", "Fitness", "Beauty Products", "Wellness"],
    ),
    (
        "Miscellaneous",
        &["Collectibles", "Emergency Supplies", "Seasonal Items", "Others"],
    ),
];

/// System locations.
pub const DEFAULT_LOCATIONS: &[&str] = &[
    "Living Room",
    "Bedroom",
    "Kitchen",
    "Bathroom",
    "Garage",
    "Office",
    "Storage",
    "Basement",
    "Attic",
    "Garden",
];

/// Counts of rows inserted by one seeding run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub categories_created: usize,
    pub locations_created: usize,
}

/// Insert any missing system categories and locations.
pub async fn seed_defaults(pool: &PgPool) -> Result<SeedReport, sqlx::Error> {
    let mut report = SeedReport::default();

    for (parent_name, children) in DEFAULT_CATEGORIES {
        let parent = match CategoryRepo::find_system(pool, parent_name, None).await? {
            Some(existing) => existing,
            None => {
                report.categories_created += 1;
                CategoryRepo::create_system(pool, parent_name, None).await?
            }
        };

        for child_name in *children {
            if CategoryRepo::find_system(pool, child_name, Some(parent.id))
                .await?
                .is_none()
            {
                CategoryRepo::create_system(pool, child_name, Some(parent.id)).await?;
                report.categories_created += 1;
            }
        }
    }

    for name in DEFAULT_LOCATIONS {
        if LocationRepo::find_system(pool, name).await?.is_none() {
            LocationRepo::create_system(pool, name).await?;
            report.locations_created += 1;
        }
    }

    tracing::info!(
        categories_created = report.categories_created,
        locations_created = report.locations_created,
        "System defaults seeded"
    );
    Ok(report)
}
