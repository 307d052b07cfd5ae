mod support;

use domain::{
    AllocationOutcome, BottleneckLevel, ComponentCategory, DomainError, RemovalOutcome,
};
use rust_decimal::Decimal;
use support::fixture;

#[tokio::test]
async fn test_unique_slot_swaps_previous_occupant() {
    let fx = fixture().await;
    let build = fx.new_build("alice").await;
    let i3 = fx.part(ComponentCategory::Cpu, "Core i3-12100F").await;
    let i5 = fx.part(ComponentCategory::Cpu, "Core i5-13600K").await;

    fx.service.add_component("alice", build, i3).await.unwrap();
    let outcome = fx.service.add_component("alice", build, i5).await.unwrap();

    assert_eq!(
        outcome,
        AllocationOutcome::Swapped {
            replaced: vec![i3],
            trimmed_ram: vec![],
        }
    );

    let summary = fx.service.build_summary("alice", build).await.unwrap();
    let cpus: Vec<_> = summary
        .items
        .iter()
        .filter(|item| item.category() == ComponentCategory::Cpu)
        .collect();
    assert_eq!(cpus.len(), 1);
    assert_eq!(cpus[0].component.id, i5);
    assert_eq!(summary.scaffold.cpu.as_ref().map(|i| i.component.id), Some(i5));
}

#[tokio::test]
async fn test_ram_stacks_up_to_default_slots() {
    let fx = fixture().await;
    let build = fx.new_build("alice").await;
    let ram = fx.part(ComponentCategory::Ram, "Vengeance LPX 16GB").await;

    for expected in 1..=4 {
        let outcome = fx.service.add_component("alice", build, ram).await.unwrap();
        assert_eq!(outcome, AllocationOutcome::Stacked { quantity: expected });
    }

    let outcome = fx.service.add_component("alice", build, ram).await.unwrap();
    assert_eq!(outcome, AllocationOutcome::CapacityReached { capacity: 4 });

    let summary = fx.service.build_summary("alice", build).await.unwrap();
    assert_eq!(summary.items.len(), 1);
    assert_eq!(summary.items[0].quantity, 4);
    assert_eq!(summary.scaffold.ram.len(), 4);
    assert!(summary.scaffold.ram.iter().all(Option::is_some));
}

#[tokio::test]
async fn test_storage_capacity_spans_different_drives() {
    let fx = fixture().await;
    let build = fx.new_build("alice").await;
    let nvme = fx.part(ComponentCategory::Storage, "970 Evo Plus 1TB").await;
    let hdd = fx.part(ComponentCategory::Storage, "Barracuda 2TB").await;

    fx.service.add_component("alice", build, nvme).await.unwrap();
    fx.service.add_component("alice", build, hdd).await.unwrap();
    let outcome = fx.service.add_component("alice", build, nvme).await.unwrap();

    assert_eq!(outcome, AllocationOutcome::CapacityReached { capacity: 2 });

    let summary = fx.service.build_summary("alice", build).await.unwrap();
    assert_eq!(summary.scaffold.storage.len(), 2);
    assert!(summary.items.iter().all(|item| item.quantity == 1));
}

#[tokio::test]
async fn test_small_motherboard_trims_newest_ram_first() {
    let fx = fixture().await;
    fx.service
        .import_json(
            ComponentCategory::Motherboard,
            r#"[{"name": "A620I Mini", "manufacturer": "ASRock", "socket": "AM5",
                 "form_factor": "Mini-ITX", "ram_slots": 2, "price": "129.99"}]"#,
        )
        .await
        .unwrap();

    let build = fx.new_build("alice").await;
    let older = fx.part(ComponentCategory::Ram, "Vengeance LPX 16GB").await;
    let newer = fx.part(ComponentCategory::Ram, "Trident Z5 32GB").await;
    let board = fx.part(ComponentCategory::Motherboard, "A620I Mini").await;

    for _ in 0..3 {
        fx.service.add_component("alice", build, older).await.unwrap();
    }
    fx.service.add_component("alice", build, newer).await.unwrap();

    let outcome = fx.service.add_component("alice", build, board).await.unwrap();
    assert_eq!(
        outcome,
        AllocationOutcome::Swapped {
            replaced: vec![],
            trimmed_ram: vec![(newer, 1), (older, 1)],
        }
    );

    let summary = fx.service.build_summary("alice", build).await.unwrap();
    let ram: Vec<_> = summary
        .items
        .iter()
        .filter(|item| item.category() == ComponentCategory::Ram)
        .map(|item| (item.component.id, item.quantity))
        .collect();
    assert_eq!(ram, vec![(older, 2)]);
    assert_eq!(summary.scaffold.ram.len(), 2);

    // the smaller board now caps further RAM
    let outcome = fx.service.add_component("alice", build, newer).await.unwrap();
    assert_eq!(outcome, AllocationOutcome::CapacityReached { capacity: 2 });
}

#[tokio::test]
async fn test_remove_decrements_then_deletes() {
    let fx = fixture().await;
    let build = fx.new_build("alice").await;
    let ram = fx.part(ComponentCategory::Ram, "Trident Z5 32GB").await;

    fx.service.add_component("alice", build, ram).await.unwrap();
    fx.service.add_component("alice", build, ram).await.unwrap();

    assert_eq!(
        fx.service.remove_component("alice", build, ram).await.unwrap(),
        RemovalOutcome::Decremented { remaining: 1 }
    );
    assert_eq!(
        fx.service.remove_component("alice", build, ram).await.unwrap(),
        RemovalOutcome::Removed
    );
    assert_eq!(
        fx.service.remove_component("alice", build, ram).await.unwrap(),
        RemovalOutcome::NotPresent
    );

    let summary = fx.service.build_summary("alice", build).await.unwrap();
    assert!(summary.items.is_empty());
}

#[tokio::test]
async fn test_summary_advisor_and_total() {
    let fx = fixture().await;
    let build = fx.new_build("alice").await;
    let cpu = fx.part(ComponentCategory::Cpu, "Core i5-13600K").await;
    let gpu = fx.part(ComponentCategory::Gpu, "GeForce RTX 4070").await;
    let ram = fx.part(ComponentCategory::Ram, "Vengeance LPX 16GB").await;

    for id in [cpu, gpu, ram, ram] {
        fx.service.add_component("alice", build, id).await.unwrap();
    }

    let summary = fx.service.build_summary("alice", build).await.unwrap();

    assert_eq!(summary.bottleneck.level, BottleneckLevel::Good);
    assert_eq!(summary.bottleneck.message, "CPU and GPU are well-balanced.");
    // 50 + 125 + 200 = 375W, x1.4 = 525W
    assert_eq!(summary.psu.to_string(), "~550W (Estimated Load: 375W)");
    assert_eq!(summary.total_price, Decimal::new(100000, 2));
}

#[tokio::test]
async fn test_entry_cpu_with_high_gpu_is_major_bottleneck() {
    let fx = fixture().await;
    let build = fx.new_build("alice").await;
    let cpu = fx.part(ComponentCategory::Cpu, "Core i3-12100F").await;
    let gpu = fx.part(ComponentCategory::Gpu, "GeForce RTX 4090").await;

    fx.service.add_component("alice", build, cpu).await.unwrap();
    fx.service.add_component("alice", build, gpu).await.unwrap();

    let summary = fx.service.build_summary("alice", build).await.unwrap();
    assert_eq!(summary.bottleneck.level, BottleneckLevel::Major);
    assert!(summary.bottleneck.message.contains("'GeForce RTX 4090'"));
    assert!(summary.bottleneck.message.contains("The CPU will severely limit"));
}

#[tokio::test]
async fn test_empty_build_summary() {
    let fx = fixture().await;
    let build = fx.new_build("alice").await;

    let summary = fx.service.build_summary("alice", build).await.unwrap();

    assert_eq!(summary.bottleneck.level, BottleneckLevel::None);
    assert_eq!(
        summary.psu.to_string(),
        "Add components with TDP to estimate wattage."
    );
    assert_eq!(summary.total_price, Decimal::ZERO);
    assert_eq!(summary.scaffold.ram.len(), 4);
    assert_eq!(summary.scaffold.storage.len(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_adds_never_exceed_capacity() {
    let fx = fixture().await;
    let build = fx.new_build("alice").await;
    let ram = fx.part(ComponentCategory::Ram, "Vengeance LPX 16GB").await;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let service = fx.service.clone();
        handles.push(tokio::spawn(async move {
            service.add_component("alice", build, ram).await
        }));
    }

    let mut rejected = 0;
    for handle in handles {
        if let AllocationOutcome::CapacityReached { .. } = handle.await.unwrap().unwrap() {
            rejected += 1;
        }
    }

    let summary = fx.service.build_summary("alice", build).await.unwrap();
    assert_eq!(summary.items.len(), 1);
    assert_eq!(summary.items[0].quantity, 4);
    assert_eq!(rejected, 4);
}

#[tokio::test]
async fn test_available_excludes_installed_unique_parts() {
    let fx = fixture().await;
    let build = fx.new_build("alice").await;
    let cpu = fx.part(ComponentCategory::Cpu, "Ryzen 5 5600X").await;
    let ram = fx.part(ComponentCategory::Ram, "Trident Z5 32GB").await;

    fx.service.add_component("alice", build, cpu).await.unwrap();
    fx.service.add_component("alice", build, ram).await.unwrap();

    let available = fx
        .service
        .available_components("alice", build, None)
        .await
        .unwrap();
    assert!(available.iter().all(|c| c.id != cpu));
    assert!(available.iter().any(|c| c.id == ram));

    let names: Vec<_> = available.iter().map(|c| c.name.to_lowercase()).collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);

    let searched = fx
        .service
        .available_components("alice", build, Some("ryzen".to_string()))
        .await
        .unwrap();
    let searched: Vec<_> = searched.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(searched, vec!["Ryzen 9 7950X"]);
}

#[tokio::test]
async fn test_only_owner_can_modify_build() {
    let fx = fixture().await;
    fx.service.create_user("bob", None).await.unwrap();
    let build = fx.new_build("alice").await;
    let cpu = fx.part(ComponentCategory::Cpu, "Ryzen 5 5600X").await;

    let err = fx.service.add_component("bob", build, cpu).await.unwrap_err();
    assert!(matches!(err, DomainError::NotOwner { .. }));

    let err = fx.service.delete_build("bob", build).await.unwrap_err();
    assert!(err.is_business_rule_error());
}

#[tokio::test]
async fn test_missing_build_and_component() {
    let fx = fixture().await;
    let build = fx.new_build("alice").await;

    let err = fx.service.add_component("alice", 999, 1).await.unwrap_err();
    assert_eq!(err, DomainError::BuildNotFound(999));

    let err = fx.service.add_component("alice", build, 999).await.unwrap_err();
    assert_eq!(err, DomainError::ComponentNotFound(999));
}

#[tokio::test]
async fn test_build_rename_and_delete() {
    let fx = fixture().await;
    let build = fx.new_build("alice").await;

    let updated = fx
        .service
        .update_build(
            "alice",
            build,
            domain::BuildUpdate {
                name: Some("Streaming box".to_string()),
                description: Some(Some("quiet".to_string())),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Streaming box");
    assert_eq!(updated.description.as_deref(), Some("quiet"));

    fx.service.delete_build("alice", build).await.unwrap();
    let err = fx.service.build_summary("alice", build).await.unwrap_err();
    assert!(err.is_not_found());
    assert!(fx.service.builds_for("alice").await.unwrap().is_empty());
}
