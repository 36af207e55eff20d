use std::collections::VecDeque;

use tracing::{debug, warn};

use crate::config::IntersectionConfig;
use crate::diagnostics::Diagnostic;
use crate::error::Result;
use crate::network::{IntersectionId, RoadNetwork};
use crate::operations::{
    BuildLaneStrips, BuildOutline, FinalizeIntersection, Readiness, ResolveOrientation, ResolveWindow,
    SampleEdges, ScratchMap, SolveCorners,
};
use crate::strength::IntersectionStrength;

/// Outcome of one sweep over a road network.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildReport {
    /// Intersections finalized by this sweep.
    pub finalized: Vec<IntersectionId>,
    /// Everything recoverable that went wrong, in the order it happened.
    pub diagnostics: Vec<Diagnostic>,
}

/// Builds every unfinished intersection of a road network.
///
/// The sweep resolves all endpoint windows first, so that neighbors on the
/// same curve see each other, and samples the road edges inside them. It then
/// solves the geometry of each intersection from a work queue, re-queuing
/// intersections whose endpoints report they are not ready. Lane strips are built last, once every pad
/// outline exists, and the intersections are finalized.
///
/// Failures are contained per intersection and reported as diagnostics.
/// Finalized intersections are skipped, so running the sweep twice is a no-op.
pub struct BuildIntersections<'a> {
    config: IntersectionConfig,
    strength: &'a dyn IntersectionStrength,
}

impl<'a> BuildIntersections<'a> {
    /// Creates a new sweep.
    #[must_use]
    pub fn new(config: IntersectionConfig, strength: &'a dyn IntersectionStrength) -> Self {
        Self { config, strength }
    }

    /// Executes the sweep.
    pub fn execute(&self, network: &mut RoadNetwork) -> BuildReport {
        let mut report = BuildReport::default();
        let pending: Vec<IntersectionId> = network
            .intersections()
            .filter(|(_, data)| !data.is_finalized())
            .map(|(id, _)| id)
            .collect();
        if pending.is_empty() {
            debug!("no unfinished intersections");
            return report;
        }
        debug!(count = pending.len(), "building intersections");

        let mut scratch = ScratchMap::new();

        let mut windowed = Vec::with_capacity(pending.len());
        for id in pending {
            match self.resolve_windows(network, &mut scratch, id) {
                Ok(()) => windowed.push(id),
                Err(e) => report.diagnostics.push(failed(network, id, &e)),
            }
        }

        let mut queue = VecDeque::with_capacity(windowed.len());
        for id in windowed {
            match self.sample_edges(network, &mut scratch, id) {
                Ok(()) => queue.push_back(id),
                Err(e) => report.diagnostics.push(failed(network, id, &e)),
            }
        }

        let mut ready = Vec::with_capacity(queue.len());
        while !queue.is_empty() {
            let mut progress = false;
            for id in queue.drain(..).collect::<Vec<_>>() {
                match self.solve_geometry(network, &mut scratch, id) {
                    Ok(Readiness::Ready(diagnostics)) => {
                        progress = true;
                        report.diagnostics.extend(diagnostics);
                        ready.push(id);
                    }
                    // Every queued endpoint is sampled, so this only holds back
                    // an intersection whose scratch lost its samples.
                    Ok(Readiness::NotYetReady) => queue.push_back(id),
                    Err(e) => {
                        progress = true;
                        report.diagnostics.push(failed(network, id, &e));
                    }
                }
            }
            if !progress {
                for id in queue.drain(..) {
                    let intersection = display_name(network, id);
                    warn!(%intersection, "partner endpoint never became ready");
                    report.diagnostics.push(Diagnostic::Deferred { intersection });
                }
            }
        }
        debug!(count = ready.len(), "geometry solved");

        for id in ready {
            match self.build_strips(network, &mut scratch, id) {
                Ok(diagnostics) => {
                    report.diagnostics.extend(diagnostics);
                    report.finalized.push(id);
                }
                Err(e) => report.diagnostics.push(failed(network, id, &e)),
            }
        }
        debug!(
            finalized = report.finalized.len(),
            diagnostics = report.diagnostics.len(),
            "sweep finished"
        );
        report
    }

    fn resolve_windows(&self, network: &RoadNetwork, scratch: &mut ScratchMap, id: IntersectionId) -> Result<()> {
        let data = network.intersection(id)?;
        for endpoint in [data.first, data.second] {
            ResolveWindow::new(endpoint, self.config.sampling()).execute(network, scratch)?;
        }
        Ok(())
    }

    fn sample_edges(&self, network: &RoadNetwork, scratch: &mut ScratchMap, id: IntersectionId) -> Result<()> {
        let data = network.intersection(id)?;
        for endpoint in [data.first, data.second] {
            SampleEdges::new(endpoint, data.road_type, self.config.sampling()).execute(network, scratch)?;
        }
        Ok(())
    }

    fn solve_geometry(
        &self,
        network: &mut RoadNetwork,
        scratch: &mut ScratchMap,
        id: IntersectionId,
    ) -> Result<Readiness<Vec<Diagnostic>>> {
        if network.intersection(id)?.geometry_done {
            return Ok(Readiness::Ready(Vec::new()));
        }

        let Readiness::Ready(orientation) =
            ResolveOrientation::new(id, self.config.match_tolerance()).execute(network, scratch)?
        else {
            return Ok(Readiness::NotYetReady);
        };
        {
            let data = network.intersection_mut(id)?;
            data.flipped = orientation.flipped;
            data.classification = orientation.classification;
            data.turn_lanes = orientation.turn_lanes;
        }

        let Readiness::Ready(solution) = SolveCorners::new(id, &self.config).execute(network, scratch)? else {
            return Ok(Readiness::NotYetReady);
        };
        let name = {
            let data = network.intersection_mut(id)?;
            data.corners = Some(solution.corners);
            data.center = solution.center;
            data.name.clone()
        };

        let outline = BuildOutline::new(id, &self.config).execute(network)?;
        let data = network.intersection_mut(id)?;
        data.outline = Some(outline);
        data.geometry_done = true;

        Ok(Readiness::Ready(
            solution
                .missing
                .into_iter()
                .map(|slot| Diagnostic::MissingCorner {
                    intersection: name.clone(),
                    slot,
                })
                .collect(),
        ))
    }

    fn build_strips(
        &self,
        network: &mut RoadNetwork,
        scratch: &mut ScratchMap,
        id: IntersectionId,
    ) -> Result<Vec<Diagnostic>> {
        let data = network.intersection(id)?;
        let mut diagnostics = Vec::new();
        for endpoint in [data.first, data.second] {
            if let Some(d) = BuildLaneStrips::new(endpoint, &self.config, self.strength).execute(network, scratch)? {
                diagnostics.push(d);
            }
        }
        FinalizeIntersection::new(id, self.config.end_epsilon).execute(network, scratch)?;
        Ok(diagnostics)
    }
}

fn display_name(network: &RoadNetwork, id: IntersectionId) -> String {
    network
        .intersection(id)
        .map_or_else(|_| format!("{id:?}"), |d| d.name.clone())
}

fn failed(network: &RoadNetwork, id: IntersectionId, error: &crate::error::CrosswayError) -> Diagnostic {
    let intersection = display_name(network, id);
    warn!(%intersection, %error, "intersection build failed");
    Diagnostic::Failed {
        intersection,
        message: error.to_string(),
    }
}
