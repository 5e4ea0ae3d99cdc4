//! Schematic layout: graph + projection + tier -> [`RenderModel`].
//!
//! The builder projects every platform at most once per pass and expresses all output
//! relative to the network's pixel bounds, so the result does not depend on the map's current pan
//! offset (the synchronizer applies that separately).

use crate::LayoutOptions;
use crate::lod::{Style, Tier, style_for};
use crate::model::{
    ClusterCircle, CurveSegment, HitRegion, Marker, MarkerOwner, RenderModel, SpanPath,
    TransferLine, Whiskers, hit_region_id, line_class, platform_marker_id, station_marker_id,
};
use metromap_core::geom::{self, Box2D, Point, Vector};
use metromap_core::{
    Graph, PlatformId, Projector, RouteId, SpanId, StationId, find_interchange_cluster,
};
use rustc_hash::FxHashSet;

/// Lays out `graph` for the given tier.
///
/// `bounds` is the pixel box of the whole network under `projector`; its minimum corner becomes
/// the local origin. The hidden tier yields an empty model.
pub fn build<P: Projector + ?Sized>(
    graph: &Graph,
    projector: &P,
    bounds: &Box2D,
    tier: Tier,
    options: &LayoutOptions,
) -> RenderModel {
    let size = bounds.size();
    let Some(style) = style_for(tier, projector.zoom()) else {
        tracing::debug!(zoom = projector.zoom(), "hidden tier, nothing to lay out");
        return RenderModel::empty(tier, None, size);
    };

    let mut builder = Builder {
        graph,
        projector,
        origin: bounds.min.to_vector(),
        style,
        options,
        positions: vec![None; graph.platforms().len()],
        whiskers: vec![None; graph.platforms().len()],
        model: RenderModel::empty(tier, Some(style), size),
    };
    match tier {
        Tier::Hidden => {}
        Tier::Simplified => builder.simplified(),
        Tier::Detailed => builder.detailed(),
    }

    let model = builder.model;
    tracing::debug!(
        tier = ?model.tier,
        markers = model.markers.len(),
        curves = model.curves.len(),
        clusters = model.clusters.len(),
        transfers = model.transfers.len(),
        "layout pass complete"
    );
    model
}

struct Builder<'a, P: Projector + ?Sized> {
    graph: &'a Graph,
    projector: &'a P,
    origin: Vector,
    style: Style,
    options: &'a LayoutOptions,
    positions: Vec<Option<Point>>,
    whiskers: Vec<Option<[Point; 2]>>,
    model: RenderModel,
}

impl<P: Projector + ?Sized> Builder<'_, P> {
    /// Surface-local position of a platform, projected once per pass.
    fn pos(&mut self, platform: PlatformId) -> Point {
        if let Some(p) = self.positions[platform.index()] {
            return p;
        }
        let p = self
            .projector
            .project(self.graph.platform(platform).location)
            - self.origin;
        self.positions[platform.index()] = Some(p);
        p
    }

    fn route_colors(&self, routes: impl IntoIterator<Item = RouteId>) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for r in routes {
            if let Some(c) = self.graph.route_color(r) {
                if !out.iter().any(|x| x == c) {
                    out.push(c.to_string());
                }
            }
        }
        out
    }

    fn push_marker(
        &mut self,
        id: String,
        owner: MarkerOwner,
        station: StationId,
        center: Point,
        routes: Vec<RouteId>,
    ) {
        let mut classes = vec!["station-circle".to_string()];
        for &r in &routes {
            let class = line_class(&self.graph.route(r).line);
            if !classes.contains(&class) {
                classes.push(class);
            }
        }
        let colors = self.route_colors(routes);
        let hit_id = hit_region_id(&id);
        let radius = self.style.circle_radius;
        self.model.hit_regions.push(HitRegion {
            id: hit_id.clone(),
            marker: id.clone(),
            center,
            radius: radius * self.options.overlay.hit_radius_factor,
        });
        self.model.markers.push(Marker {
            id,
            owner,
            station,
            center,
            radius,
            border_width: self.style.circle_border,
            classes,
            colors,
            hit_region: hit_id,
        });
    }

    /// One roundel per station, placed at its first platform.
    fn simplified(&mut self) {
        let graph = self.graph;
        for sid in graph.station_ids() {
            let station = graph.station(sid);
            let first = station.platforms[0];
            let center = self.pos(first);
            let mut routes: Vec<RouteId> = Vec::new();
            for &p in &station.platforms {
                for r in graph.platform_routes(p) {
                    if !routes.contains(&r) {
                        routes.push(r);
                    }
                }
            }
            self.push_marker(
                station_marker_id(sid),
                MarkerOwner::Station(sid),
                sid,
                center,
                routes,
            );
        }
    }

    fn detailed(&mut self) {
        let graph = self.graph;
        let mut covered: FxHashSet<PlatformId> = FxHashSet::default();

        for sid in graph.station_ids() {
            let station = graph.station(sid);
            for &p in &station.platforms {
                let center = self.pos(p);
                self.push_marker(
                    platform_marker_id(p),
                    MarkerOwner::Platform(p),
                    sid,
                    center,
                    graph.platform_routes(p),
                );
                if graph.platform(p).is_pass_through() {
                    self.compute_whiskers(p);
                }
            }

            if let Some(members) = find_interchange_cluster(graph, sid) {
                if let Some(circle) = self.cluster_circle(sid, members) {
                    covered.extend(circle.members.iter().copied());
                    self.model.clusters.push(circle);
                }
            }
        }

        for span in graph.span_ids() {
            self.span_geometry(span);
        }

        for tid in graph.transfer_ids() {
            let t = *graph.transfer(tid);
            if covered.contains(&t.source) && covered.contains(&t.target) {
                continue;
            }
            let from = self.pos(t.source);
            let to = self.pos(t.target);
            self.model.transfers.push(TransferLine {
                transfer: tid,
                from,
                to,
                stroke_width: self.style.circle_border,
                opacity: self.options.overlay.transfer_opacity,
            });
        }
    }

    fn compute_whiskers(&mut self, platform: PlatformId) {
        let graph = self.graph;
        let spans = &graph.platform(platform).spans;
        let pos = self.pos(platform);
        let mut midpoints = [pos; 2];
        let mut lengths = [0.0; 2];
        for i in 0..2 {
            let neighbor = self.pos(graph.neighbor(platform, spans[i]));
            lengths[i] = geom::distance(pos, neighbor);
            midpoints[i] = geom::midpoint(pos, neighbor);
        }
        let total = lengths[0] + lengths[1];
        let t = if total > 0.0 { lengths[0] / total } else { 0.5 };
        let mm = geom::lerp(midpoints[0], midpoints[1], t);
        let diff = pos - mm;
        let controls = [midpoints[0] + diff, midpoints[1] + diff];

        self.whiskers[platform.index()] = Some(controls);
        self.model.whiskers.push(Whiskers {
            platform,
            midpoints,
            mm,
            diff,
            controls,
        });
    }

    /// Circumscribed circle for a detected cluster, or `None` when its points are collinear (the
    /// station then keeps its individual transfer lines).
    fn cluster_circle(
        &mut self,
        station: StationId,
        members: Vec<PlatformId>,
    ) -> Option<ClusterCircle> {
        let coords = members.iter().map(|&p| self.pos(p)).collect::<Vec<_>>();
        let triple = geom::representative_triple(&coords)?;
        let points = triple.map(|i| coords[i]);
        match geom::circumcenter(&points) {
            Ok(center) => Some(ClusterCircle {
                station,
                center,
                radius: geom::distance(center, points[0]),
                members,
                stroke_width: self.style.circle_border,
                opacity: self.options.overlay.transfer_opacity,
            }),
            Err(err) => {
                tracing::warn!(
                    station = station.index(),
                    %err,
                    "interchange cluster falls back to transfer lines"
                );
                None
            }
        }
    }

    /// The platform one step beyond `platform` when leaving it away from `span`; the platform
    /// itself unless it is a pass-through platform.
    fn beyond(&self, platform: PlatformId, span: SpanId) -> PlatformId {
        let p = self.graph.platform(platform);
        if !p.is_pass_through() {
            return platform;
        }
        let other = if p.spans[0] == span {
            p.spans[1]
        } else {
            p.spans[0]
        };
        self.graph.neighbor(platform, other)
    }

    /// The whisker of `platform` on the side of `span`, or the platform itself.
    fn control_towards(&mut self, platform: PlatformId, span: SpanId) -> Point {
        let side = self
            .graph
            .platform(platform)
            .spans
            .iter()
            .position(|&s| s == span);
        match (self.whiskers[platform.index()], side) {
            (Some(controls), Some(i)) if i < 2 => controls[i],
            _ => self.pos(platform),
        }
    }

    fn span_geometry(&mut self, span: SpanId) {
        let graph = self.graph;
        let s = graph.span(span);
        let (source, target) = (s.source, s.target);

        let before = self.beyond(source, span);
        let after = self.beyond(target, span);
        let path = [
            self.pos(before),
            self.pos(source),
            self.pos(target),
            self.pos(after),
        ];
        self.model.span_paths.push(SpanPath {
            span,
            points: path,
        });

        let c_source = self.control_towards(source, span);
        let c_target = self.control_towards(target, span);
        self.model.curves.push(CurveSegment {
            span,
            points: [path[1], c_source, c_target, path[2]],
            width: self.style.line_width,
            routes: s.routes.clone(),
            colors: self.route_colors(s.routes.iter().copied()),
        });
    }
}
