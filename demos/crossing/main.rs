//! Crossway demo: builds a four-way and a three-way junction and prints the result.
//!
//! Usage:
//! ```text
//! cargo run --example crossing
//! RUST_LOG=crossway=debug cargo run --example crossing
//! ```

use std::collections::BTreeMap;

use crossway::geometry::{CubicCenterline, StraightCenterline};
use crossway::math::Point3;
use crossway::network::{
    CornerSlot, CurveData, IntersectionData, IntersectionId, LaneStrip, RoadProfile, RoadType, SpecialFlags, StopType,
};
use crossway::{BuildIntersections, CrosswayError, IntersectionConfig, RadialFalloff, RoadNetwork};

fn main() -> Result<(), CrosswayError> {
    // Default: WARN for everything. Override with RUST_LOG.
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let mut network = RoadNetwork::new();

    // Four-way: a straight avenue crossed by a gently curving street.
    let avenue = network.add_curve(CurveData::new(
        "Avenue",
        Box::new(StraightCenterline::new(
            Point3::new(-80.0, 0.0, 0.0),
            Point3::new(80.0, 0.0, 0.0),
        )?),
        RoadProfile::new(12.0, 4)?,
    ));
    let street = network.add_curve(CurveData::new(
        "Elm Street",
        Box::new(CubicCenterline::new(
            Point3::new(-10.0, -60.0, 1.0),
            Point3::new(0.0, -20.0, 1.0),
            Point3::new(0.0, 20.0, 1.0),
            Point3::new(10.0, 60.0, 1.0),
        )?),
        RoadProfile::new(8.0, 2)?,
    ));
    let a = network.add_endpoint(avenue, 0.5, "Avenue @ Elm")?;
    let b = network.add_endpoint(street, 0.5, "Elm @ Avenue")?;
    let four_way = network.add_intersection(
        IntersectionData::new("Avenue & Elm", a, b)
            .with_road_type(RoadType::SingleTurnLane)
            .with_stop_type(StopType::TrafficLight1),
    )?;

    // Three-way: a lane that begins at the avenue.
    let lane = network.add_curve(CurveData::new(
        "Oak Lane",
        Box::new(StraightCenterline::new(
            Point3::new(50.0, 0.0, 0.0),
            Point3::new(50.0, 70.0, 0.0),
        )?),
        RoadProfile::new(8.0, 2)?,
    ));
    let c = network.add_endpoint(avenue, 130.0 / 160.0, "Avenue @ Oak")?;
    let d = network.add_endpoint(lane, 0.0, "Oak @ Avenue")?;
    let three_way = network.add_intersection(
        IntersectionData::new("Avenue & Oak", c, d)
            .with_special(SpecialFlags {
                second_special_first: true,
                ..SpecialFlags::default()
            })
            .with_stop_type(StopType::StopSignAllWay),
    )?;

    let config = IntersectionConfig::default();
    let strength = RadialFalloff::new(config.strength_inner_fraction);
    let report = BuildIntersections::new(config, &strength).execute(&mut network);

    for id in [four_way, three_way] {
        print_intersection(&network, id)?;
    }
    println!("finalized {} intersection(s)", report.finalized.len());
    for diagnostic in &report.diagnostics {
        println!("diagnostic: {diagnostic}");
    }
    Ok(())
}

fn print_intersection(network: &RoadNetwork, id: IntersectionId) -> Result<(), CrosswayError> {
    let data = network.intersection(id)?;
    println!("{} ({:?}, flipped: {})", data.name, data.classification.kind, data.flipped);
    if let Some(corners) = &data.corners {
        for slot in CornerSlot::ALL {
            let p = corners.get(slot);
            println!("  {slot}: ({:.2}, {:.2}, {:.2})", p.x, p.y, p.z);
        }
    }
    if let Some(outline) = &data.outline {
        println!("  radius: {:.2}", outline.radius);
    }
    for strips in &data.output.endpoints {
        let name = &network.endpoint(strips.endpoint)?.name;
        println!(
            "  {name}: front {} points, back {} points",
            point_count(strips.front.as_ref()),
            point_count(strips.back.as_ref())
        );
    }
    Ok(())
}

fn point_count(half: Option<&BTreeMap<usize, LaneStrip>>) -> usize {
    half.map_or(0, |lanes| lanes.values().map(|s| s.points.len()).sum())
}
