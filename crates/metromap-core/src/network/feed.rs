use super::{
    Graph, Platform, PlatformId, Route, RouteId, Span, SpanId, Station, StationId, Transfer,
};
use crate::error::{Error, Result};
use crate::geo::LatLng;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Wire shape of the network document: flat arrays whose positions are the ids.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkFeed {
    pub platforms: Vec<PlatformFeed>,
    pub stations: Vec<StationFeed>,
    #[serde(default)]
    pub spans: Vec<SpanFeed>,
    #[serde(default)]
    pub transfers: Vec<TransferFeed>,
    #[serde(default)]
    pub routes: Vec<RouteFeed>,
    #[serde(default)]
    pub lines: IndexMap<String, LineFeed>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformFeed {
    pub name: String,
    #[serde(default)]
    pub alt_names: IndexMap<String, String>,
    pub location: LatLng,
    /// Incident spans. Derived from the span list when omitted.
    #[serde(default)]
    pub spans: Option<Vec<usize>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationFeed {
    /// Defaults to the first platform's name.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub alt_names: IndexMap<String, String>,
    pub platforms: Vec<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpanFeed {
    pub source: usize,
    pub target: usize,
    #[serde(default)]
    pub routes: Vec<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferFeed {
    pub source: usize,
    pub target: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteFeed {
    pub line: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub spans: Vec<usize>,
}

/// A line entry is either a bare color or an object carrying one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LineFeed {
    Color(String),
    Object {
        #[serde(default)]
        color: Option<String>,
    },
}

impl LineFeed {
    fn color(self) -> Option<String> {
        match self {
            LineFeed::Color(c) => Some(c),
            LineFeed::Object { color } => color,
        }
    }
}

fn check_ref(
    collection: &'static str,
    index: usize,
    field: &'static str,
    target: usize,
    len: usize,
) -> Result<()> {
    if target < len {
        Ok(())
    } else {
        Err(Error::DanglingReference {
            collection,
            index,
            field,
            target,
        })
    }
}

impl Graph {
    /// Builds the arena from a decoded feed, resolving platform back-references and checking
    /// every id. Any integrity violation is fatal.
    pub fn from_feed(feed: NetworkFeed) -> Result<Self> {
        let NetworkFeed {
            platforms,
            stations,
            spans,
            transfers,
            routes,
            lines,
        } = feed;

        if platforms.is_empty() {
            return Err(Error::EmptyNetwork);
        }
        let n_platforms = platforms.len();
        let n_spans = spans.len();
        let n_routes = routes.len();

        for (i, p) in platforms.iter().enumerate() {
            if !p.location.is_valid() {
                return Err(Error::InvalidLocation {
                    platform: i,
                    lat: p.location.lat,
                    lng: p.location.lng,
                });
            }
        }

        let mut owner: Vec<Option<StationId>> = vec![None; n_platforms];
        for (si, s) in stations.iter().enumerate() {
            if s.platforms.is_empty() {
                return Err(Error::StationWithoutPlatforms { station: si });
            }
            for &p in &s.platforms {
                check_ref("stations", si, "platforms", p, n_platforms)?;
                if let Some(first) = owner[p] {
                    return Err(Error::PlatformInSeveralStations {
                        platform: p,
                        first: first.0,
                        second: si,
                    });
                }
                owner[p] = Some(StationId(si));
            }
        }

        for (i, s) in spans.iter().enumerate() {
            check_ref("spans", i, "source", s.source, n_platforms)?;
            check_ref("spans", i, "target", s.target, n_platforms)?;
            for &r in &s.routes {
                check_ref("spans", i, "routes", r, n_routes)?;
            }
        }
        for (i, t) in transfers.iter().enumerate() {
            check_ref("transfers", i, "source", t.source, n_platforms)?;
            check_ref("transfers", i, "target", t.target, n_platforms)?;
        }
        for (i, r) in routes.iter().enumerate() {
            for &s in &r.spans {
                check_ref("routes", i, "spans", s, n_spans)?;
            }
        }

        let spans = spans
            .into_iter()
            .map(|s| Span {
                source: PlatformId(s.source),
                target: PlatformId(s.target),
                routes: s.routes.into_iter().map(RouteId).collect(),
            })
            .collect::<Vec<_>>();

        let mut out_platforms = Vec::with_capacity(n_platforms);
        for (i, p) in platforms.into_iter().enumerate() {
            let Some(station) = owner[i] else {
                return Err(Error::PlatformWithoutStation { platform: i });
            };
            let id = PlatformId(i);
            let incident = match p.spans {
                Some(listed) => {
                    let mut out = Vec::with_capacity(listed.len());
                    for s in listed {
                        check_ref("platforms", i, "spans", s, n_spans)?;
                        if !spans[s].touches(id) {
                            return Err(Error::SpanNotIncident {
                                platform: i,
                                span: s,
                            });
                        }
                        out.push(SpanId(s));
                    }
                    out
                }
                None => spans
                    .iter()
                    .enumerate()
                    .filter(|(_, s)| s.touches(id))
                    .map(|(si, _)| SpanId(si))
                    .collect(),
            };
            out_platforms.push(Platform {
                name: p.name,
                alt_names: p.alt_names,
                location: p.location,
                spans: incident,
                station,
            });
        }

        let stations = stations
            .into_iter()
            .map(|s| {
                let platforms = s.platforms.into_iter().map(PlatformId).collect::<Vec<_>>();
                let name = s
                    .name
                    .unwrap_or_else(|| out_platforms[platforms[0].0].name.clone());
                Station {
                    name,
                    alt_names: s.alt_names,
                    platforms,
                }
            })
            .collect::<Vec<_>>();

        let graph = Graph {
            platforms: out_platforms,
            stations,
            spans,
            transfers: transfers
                .into_iter()
                .map(|t| Transfer {
                    source: PlatformId(t.source),
                    target: PlatformId(t.target),
                })
                .collect(),
            routes: routes
                .into_iter()
                .map(|r| Route {
                    line: r.line,
                    color: r.color,
                    spans: r.spans.into_iter().map(SpanId).collect(),
                })
                .collect(),
            lines: lines
                .into_iter()
                .filter_map(|(line, entry)| entry.color().map(|c| (line, c)))
                .collect(),
        };

        tracing::debug!(
            platforms = graph.platforms.len(),
            stations = graph.stations.len(),
            spans = graph.spans.len(),
            transfers = graph.transfers.len(),
            routes = graph.routes.len(),
            "network loaded"
        );
        Ok(graph)
    }
}
