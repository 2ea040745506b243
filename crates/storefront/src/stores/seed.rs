//! The sample catalog used when no valid catalog has been persisted.

use metamart_core::{Price, ProductId};

use crate::models::Product;

struct SeedProduct {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    long_description: &'static str,
    price: u64,
    original_price: u64,
    images: &'static [&'static str],
    category: &'static str,
    rating: f64,
    reviews: u32,
    stock: u32,
    sales: u32,
}

const SEED: &[SeedProduct] = &[
    SeedProduct {
        id: "1",
        name: "Wireless Bluetooth Headphones",
        description: "Immersive sound with noise cancellation.",
        long_description: "Premium over-ear wireless headphones with active noise cancellation, up to 30 hours of battery life and quick charge.",
        price: 8999,
        original_price: 12999,
        images: &[
            "https://images.unsplash.com/photo-1505740420928-5e560c06d30e?w=800&h=800&fit=crop",
            "https://images.unsplash.com/photo-1484704849700-f032a568e944?w=800&h=800&fit=crop",
            "https://images.unsplash.com/photo-1583394838336-acd977736f90?w=800&h=800&fit=crop",
        ],
        category: "electronics",
        rating: 4.5,
        reviews: 128,
        stock: 25,
        sales: 150,
    },
    SeedProduct {
        id: "2",
        name: "Smart Fitness Watch",
        description: "Track your health and fitness seamlessly.",
        long_description: "Tracks heart rate, sleep and daily activity, and mirrors phone notifications on your wrist.",
        price: 15999,
        original_price: 22999,
        images: &[
            "https://images.unsplash.com/photo-1523275335684-37898b6baf30?w=800&h=800&fit=crop",
            "https://images.unsplash.com/photo-1546868871-7041f2a55e12?w=800&h=800&fit=crop",
        ],
        category: "electronics",
        rating: 4.8,
        reviews: 256,
        stock: 15,
        sales: 220,
    },
    SeedProduct {
        id: "3",
        name: "Organic Cotton T-Shirt",
        description: "Comfortable and sustainable everyday essential.",
        long_description: "Classic fit t-shirt made from 100% GOTS certified organic cotton.",
        price: 2499,
        original_price: 3499,
        images: &["https://images.unsplash.com/photo-1521572163474-6864f9cf17ab?w=800&h=800&fit=crop"],
        category: "fashion",
        rating: 4.2,
        reviews: 89,
        stock: 50,
        sales: 300,
    },
    SeedProduct {
        id: "4",
        name: "Modern Table Lamp",
        description: "Stylish LED lamp for any modern room.",
        long_description: "Minimalist table lamp with warm, flicker-free light for reading or working.",
        price: 6999,
        original_price: 8000,
        images: &["https://images.unsplash.com/photo-1543508282-6319a3e2621f?w=800&h=800&fit=crop"],
        category: "home",
        rating: 4.6,
        reviews: 45,
        stock: 30,
        sales: 95,
    },
    SeedProduct {
        id: "5",
        name: "Professional DSLR Camera",
        description: "Capture stunning photos with this professional DSLR.",
        long_description: "Full-frame DSLR with a high-resolution sensor, fast autofocus, 4K video and a weather-sealed body.",
        price: 149_999,
        original_price: 179_999,
        images: &["https://images.unsplash.com/photo-1512756290469-ec264b7fbf87?w=800&h=800&fit=crop"],
        category: "electronics",
        rating: 4.9,
        reviews: 312,
        stock: 10,
        sales: 50,
    },
    SeedProduct {
        id: "6",
        name: "Leather Weekend Bag",
        description: "Travel in style with this genuine leather bag.",
        long_description: "Full-grain leather weekender with a large main compartment, organiser pockets and a detachable strap.",
        price: 18999,
        original_price: 24999,
        images: &["https://images.unsplash.com/photo-1584917865442-de89df76afd3?w=800&h=800&fit=crop"],
        category: "fashion",
        rating: 4.7,
        reviews: 76,
        stock: 22,
        sales: 80,
    },
    SeedProduct {
        id: "7",
        name: "Ergonomic Office Chair",
        description: "Support your back with this ergonomic chair.",
        long_description: "Adjustable lumbar support, armrests and seat height with a breathable mesh back.",
        price: 24999,
        original_price: 32000,
        images: &["https://images.unsplash.com/photo-1580480055273-228ff5388ef8?w=800&h=800&fit=crop"],
        category: "home",
        rating: 4.8,
        reviews: 150,
        stock: 18,
        sales: 120,
    },
    SeedProduct {
        id: "8",
        name: "Gourmet Coffee Beans",
        description: "Start your day with freshly roasted coffee.",
        long_description: "Small-batch roasted Arabica blend from South America and Africa with notes of chocolate and citrus.",
        price: 1999,
        original_price: 1899,
        images: &["https://images.unsplash.com/photo-1559493132-23423719e543?w=800&h=800&fit=crop"],
        category: "home",
        rating: 4.6,
        reviews: 95,
        stock: 100,
        sales: 400,
    },
];

/// The eight sample products.
#[must_use]
pub fn seed_catalog() -> Vec<Product> {
    SEED.iter()
        .map(|seed| Product {
            id: ProductId::new(seed.id),
            name: seed.name.to_string(),
            description: seed.description.to_string(),
            long_description: seed.long_description.to_string(),
            price: Price::from_rupees(seed.price),
            original_price: Some(Price::from_rupees(seed.original_price)),
            images: seed.images.iter().map(|url| (*url).to_string()).collect(),
            category: seed.category.to_string(),
            rating: seed.rating,
            reviews: seed.reviews,
            stock: seed.stock,
            sales: seed.sales,
            stock_version: 0,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_seed_has_eight_unique_products() {
        let catalog = seed_catalog();
        assert_eq!(catalog.len(), 8);
        let ids: HashSet<_> = catalog.iter().map(|p| p.id.clone()).collect();
        assert_eq!(ids.len(), 8);
        assert!(catalog.iter().all(|p| !p.images.is_empty()));
    }
}
