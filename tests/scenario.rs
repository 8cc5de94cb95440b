use antworld::{scenario::ScenarioLoader, DispersalKind};

fn scenario_loader() -> ScenarioLoader {
    ScenarioLoader::new(env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn scenario_loader_reads_fixture() {
    let scenario = scenario_loader()
        .load("scenarios/small_meadow.yaml")
        .expect("scenario parses");
    assert_eq!(scenario.name, "small_meadow");
    assert_eq!(scenario.ticks(None), 300);
    assert_eq!(scenario.world.dispersal.policy, DispersalKind::NeighbourAverage);

    let world = scenario.build_world().expect("world builds");
    assert_eq!((world.width(), world.height()), (120, 80));
    assert_eq!(world.remaining_food(), 4 * 5_000);
    assert!(world.is_home(world.home()));
}
