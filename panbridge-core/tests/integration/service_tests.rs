//! Domain services end to end over the scripted appliance

use std::sync::Arc;

use panbridge_core::config::ApplianceConfig;
use panbridge_core::models::{AlertFilter, AlertStatus, CreateVolumeRequest, PoolStatus};
use panbridge_core::parser::values::{GIB, TIB};
use panbridge_core::service::ApplianceServices;

use super::support::FakeAppliance;

const BLADESETS: &str = "\
BladeSet Name  Capacity  Used   Available  Status
Set 1          120 TB    72 TB  48 TB      12/12 OSDs online
Archive        40 TB     10 TB             10/12 OSDs online
";

const VOLUMES: &str = "
                                             Space    Soft     Hard
Volume              BladeSet  RAID            Used   Quota    Quota  Status
/                   Set 1     Object RAID6+   0 MB  524 MB   524 MB  Online
/home               Set 1     Object RAID6+   2 GB      --    10 GB  Online
Displayed 2 out of 2 volumes in the system.
";

const VOLUMES_WITH_SCRATCH: &str = "
                                             Space    Soft     Hard
Volume              BladeSet  RAID            Used   Quota    Quota  Status
/                   Set 1     Object RAID6+   0 MB  524 MB   524 MB  Online
/home               Set 1     Object RAID6+   2 GB      --    10 GB  Online
/scratch            Set 1     Object RAID6+   0 MB      --     5 GB  Online
Displayed 3 out of 3 volumes in the system.
";

fn services(appliance: &FakeAppliance) -> ApplianceServices {
    let config = ApplianceConfig::new("fake-appliance", "admin").with_perf_poll_ms(0);
    ApplianceServices::with_transport(Arc::new(appliance.clone()), &config)
}

#[tokio::test]
async fn test_bladeset_capacity_scenario() {
    let appliance = FakeAppliance::new();
    appliance.respond("bladeset list allcolumns", BLADESETS);
    let services = services(&appliance);

    let pools = services.pools.list_pools().await.unwrap();
    assert_eq!(pools.len(), 2);

    let set1 = &pools[0];
    assert_eq!(set1.id, "pool-set-1");
    assert_eq!(set1.total_capacity_bytes, 120 * TIB);
    assert_eq!(set1.used_capacity_bytes, 72 * TIB);
    assert_eq!(set1.available_capacity_bytes, 48 * TIB);
    assert_eq!(set1.status, PoolStatus::Online);

    let archive = &pools[1];
    assert_eq!(archive.available_capacity_bytes, 30 * TIB);
    assert_eq!(archive.status, PoolStatus::Degraded);
    services.shutdown().await;
}

#[tokio::test]
async fn test_delete_unknown_volume_issues_no_command() {
    let appliance = FakeAppliance::new();
    appliance.respond("volume list show all", VOLUMES);
    let services = services(&appliance);

    assert!(!services.volumes.delete_volume("vol-missing").await.unwrap());
    assert!(
        appliance
            .received()
            .iter()
            .all(|c| !c.starts_with("volume delete"))
    );
    services.shutdown().await;
}

#[tokio::test]
async fn test_create_and_delete_volume() {
    let appliance = FakeAppliance::new();
    appliance
        .respond("bladeset list allcolumns", BLADESETS)
        .respond("volume list show all", VOLUMES)
        .respond(
            "volume create scratch bladeset \"Set 1\" size 5GB",
            "Volume /scratch created",
        );
    let services = services(&appliance);

    let before = services.volumes.list_volumes().await.unwrap();
    assert_eq!(before.len(), 2);

    appliance.respond("volume list show all", VOLUMES_WITH_SCRATCH);
    let request = CreateVolumeRequest {
        name: "scratch".into(),
        capacity_bytes: 5 * GIB,
        pool_id: "pool-set-1".into(),
        tiering_policy: None,
        compressed: false,
    };
    let created = services.volumes.create_volume(&request).await.unwrap();
    assert_eq!(created.id, "vol-scratch");
    assert_eq!(created.name, "/scratch");
    assert_eq!(created.capacity_bytes, 5 * GIB);

    appliance.respond_with_confirmation("volume delete /scratch", "Volume /scratch deleted");
    assert!(services.volumes.delete_volume("vol-scratch").await.unwrap());
    assert_eq!(appliance.count("volume delete /scratch"), 1);
    services.shutdown().await;
}

#[tokio::test]
async fn test_volume_reads_are_cached() {
    let appliance = FakeAppliance::new();
    appliance.respond("volume list show all", VOLUMES);
    let services = services(&appliance);

    services.volumes.list_volumes().await.unwrap();
    services.volumes.list_volumes().await.unwrap();
    let home = services.volumes.get_volume("vol-home").await.unwrap().unwrap();
    assert_eq!(home.capacity_bytes, 10 * GIB);
    assert_eq!(appliance.count("volume list show all"), 1);
    services.shutdown().await;
}

#[tokio::test]
async fn test_acknowledgements_survive_refresh() {
    let appliance = FakeAppliance::new();
    appliance.respond(
        "eventlog -output tab -count 200",
        "CODE\tTIME\tCATEGORY\tMESSAGE\n7\t2026-02-26T21:05:22Z\tWarning\tFan degraded",
    );
    let services = services(&appliance);

    let alerts = services.alerts.list_alerts(AlertFilter::default()).await.unwrap();
    assert_eq!(alerts.len(), 1);
    let acked = services.alerts.acknowledge(&alerts[0].id).await.unwrap().unwrap();
    assert_eq!(acked.status, AlertStatus::Acknowledged);

    let again = services.alerts.list_alerts(AlertFilter::default()).await.unwrap();
    assert_eq!(again[0].status, AlertStatus::Acknowledged);
    assert!(services.hosts.list_hosts().await.unwrap().is_empty());
    services.shutdown().await;
}

#[tokio::test]
async fn test_performance_without_polling_reads_on_demand() {
    let appliance = FakeAppliance::new();
    appliance.respond("sysstat storage", "Read IOPS: 10\nWrite IOPS: 20");
    let services = services(&appliance);
    assert!(services.accumulator().is_none());

    let summary = services.performance.summary().await.unwrap();
    assert!((summary.current_iops - 30.0).abs() < f64::EPSILON);
    assert_eq!(summary.history.len(), 1);
    services.shutdown().await;
}

#[tokio::test]
async fn test_shutdown_rejects_later_calls() {
    let appliance = FakeAppliance::new();
    appliance.respond("bladeset list allcolumns", BLADESETS);
    let services = services(&appliance);
    services.shutdown().await;

    assert!(services.pools.list_pools().await.is_err());
    assert!(services.client().is_destroyed());
}
