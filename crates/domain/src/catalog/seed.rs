use super::{ComponentSpec, FormFactor, NewComponent, PerformanceTier, PsuEfficiency, StorageType};
use rust_decimal::Decimal;

fn part(
    name: &str,
    manufacturer: &str,
    cents: i64,
    tdp: Option<u32>,
    tier: Option<PerformanceTier>,
    spec: ComponentSpec,
) -> NewComponent {
    NewComponent {
        name: name.to_string(),
        manufacturer: manufacturer.to_string(),
        price: Some(Decimal::new(cents, 2)),
        tdp,
        performance_tier: tier,
        spec,
    }
}

fn cpu(cores: u32, ghz: f64, socket: &str) -> ComponentSpec {
    ComponentSpec::Cpu {
        core_count: cores,
        clock_speed: ghz,
        socket: socket.to_string(),
    }
}

fn gpu(vram_gb: u32, mhz: f64) -> ComponentSpec {
    ComponentSpec::Gpu {
        vram_gb,
        gpu_clock_speed: mhz,
    }
}

fn board(socket: &str, form_factor: FormFactor, ram_slots: u32) -> ComponentSpec {
    ComponentSpec::Motherboard {
        socket: socket.to_string(),
        form_factor,
        ram_slots,
    }
}

/// Demonstration catalog loaded by `catalog seed`
pub fn seed_catalog() -> Vec<NewComponent> {
    use crate::catalog::PerformanceTier::*;

    vec![
        // CPUs
        part("Core i3-12100F", "Intel", 10000, Some(58), Some(Entry), cpu(4, 3.3, "LGA1700")),
        part("Ryzen 5 5600X", "AMD", 15000, Some(65), Some(Mid), cpu(6, 3.7, "AM4")),
        part("Core i5-13600K", "Intel", 30000, Some(125), Some(Mid), cpu(14, 3.5, "LGA1700")),
        part("Ryzen 9 7950X", "AMD", 55000, Some(170), Some(High), cpu(16, 4.5, "AM5")),
        part("Core i9-13900K", "Intel", 58000, Some(125), Some(High), cpu(24, 3.0, "LGA1700")),
        // GPUs
        part("Radeon RX 6500 XT", "AMD", 16000, Some(107), Some(Entry), gpu(4, 2610.0)),
        part("GeForce RTX 3060", "NVIDIA", 35000, Some(170), Some(Mid), gpu(12, 1320.0)),
        part("GeForce RTX 4070", "NVIDIA", 60000, Some(200), Some(Mid), gpu(12, 1920.0)),
        part("Radeon RX 7900 XTX", "AMD", 99900, Some(355), Some(High), gpu(24, 2300.0)),
        part("GeForce RTX 4090", "NVIDIA", 159900, Some(450), Some(High), gpu(24, 2230.0)),
        // Motherboards
        part("B660M DS3H", "Gigabyte", 11000, None, None, board("LGA1700", FormFactor::MicroAtx, 4)),
        part("B550 Tomahawk", "MSI", 17000, None, None, board("AM4", FormFactor::Atx, 4)),
        part("X670E Hero", "ASUS", 69900, None, None, board("AM5", FormFactor::Atx, 4)),
        // RAM
        part(
            "Vengeance LPX 16GB",
            "Corsair",
            5000,
            None,
            None,
            ComponentSpec::Ram {
                capacity_gb: 16,
                speed_mhz: 3200,
            },
        ),
        part(
            "Trident Z5 32GB",
            "G.Skill",
            12000,
            None,
            None,
            ComponentSpec::Ram {
                capacity_gb: 32,
                speed_mhz: 6000,
            },
        ),
        // Storage
        part(
            "970 Evo Plus 1TB",
            "Samsung",
            6000,
            None,
            None,
            ComponentSpec::Storage {
                capacity_gb: 1000,
                storage_type: StorageType::Nvme,
            },
        ),
        part(
            "Barracuda 2TB",
            "Seagate",
            5000,
            None,
            None,
            ComponentSpec::Storage {
                capacity_gb: 2000,
                storage_type: StorageType::Hdd,
            },
        ),
        // PSUs
        part(
            "CV650",
            "Corsair",
            6000,
            None,
            None,
            ComponentSpec::Psu {
                wattage: 650,
                efficiency_rating: PsuEfficiency::Bronze,
            },
        ),
        part(
            "RM850x",
            "Corsair",
            13000,
            None,
            None,
            ComponentSpec::Psu {
                wattage: 850,
                efficiency_rating: PsuEfficiency::Gold,
            },
        ),
        part(
            "Dark Power 13 1000W",
            "be quiet!",
            25000,
            None,
            None,
            ComponentSpec::Psu {
                wattage: 1000,
                efficiency_rating: PsuEfficiency::Titanium,
            },
        ),
        // Cases
        part(
            "4000D Airflow",
            "Corsair",
            10500,
            None,
            None,
            ComponentSpec::Case {
                form_factor: FormFactor::Atx,
                max_gpu_length: Some(360),
            },
        ),
        part(
            "NR200P",
            "Cooler Master",
            10000,
            None,
            None,
            ComponentSpec::Case {
                form_factor: FormFactor::MiniItx,
                max_gpu_length: Some(330),
            },
        ),
    ]
}
