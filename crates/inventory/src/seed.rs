//! Fixed sample data used when no persisted snapshot exists yet.

use chrono::NaiveDate;

use stockdesk_core::ProductId;

use crate::record::{ProductRecord, derive_status};

/// The 15-product sample set the dashboard ships with. Statuses are derived
/// from stock, never hardcoded, so the seed always satisfies the invariant.
pub fn sample_products() -> Vec<ProductRecord> {
    const ROWS: [(u32, &str, &str, u32, f64, u32); 15] = [
        (1, "Laptop Dell XPS 13", "Computadoras", 15, 2_500_000.0, 1),
        (2, "Monitor LG 24\"", "Monitores", 22, 800_000.0, 2),
        (3, "Teclado Mecánico", "Periféricos", 35, 300_000.0, 3),
        (4, "Mouse Inalámbrico", "Periféricos", 42, 150_000.0, 4),
        (5, "Router WiFi 6", "Redes", 8, 500_000.0, 5),
        (6, "Disco Duro SSD 500GB", "Almacenamiento", 5, 400_000.0, 6),
        (7, "Memoria RAM 8GB", "Componentes", 3, 200_000.0, 7),
        (8, "Adaptador USB-C", "Accesorios", 7, 100_000.0, 8),
        (9, "Cargador Laptop", "Accesorios", 9, 120_000.0, 9),
        (10, "Switch 8 Puertos", "Redes", 4, 350_000.0, 10),
        (11, "Cable HDMI", "Cables", 50, 50_000.0, 11),
        (12, "Webcam 1080p", "Periféricos", 18, 250_000.0, 12),
        (13, "Tableta Gráfica", "Periféricos", 12, 800_000.0, 13),
        (14, "Impresora Láser", "Impresión", 6, 1_200_000.0, 14),
        (15, "Silla Ergonómica", "Mobiliario", 8, 1_500_000.0, 15),
    ];

    ROWS.iter()
        .map(|&(id, name, category, stock, price, day)| ProductRecord {
            id: ProductId::new(id),
            name: name.to_string(),
            category: category.to_string(),
            stock,
            price,
            status: derive_status(stock),
            date_added: seed_date(day),
        })
        .collect()
}

fn seed_date(day: u32) -> NaiveDate {
    // Seed days are 1..=15 of a fixed month; always valid.
    NaiveDate::from_ymd_opt(2023, 9, day).unwrap_or(NaiveDate::MIN)
}
