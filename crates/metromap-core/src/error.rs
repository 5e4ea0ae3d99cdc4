pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Malformed network feed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Network feed contains no platforms")]
    EmptyNetwork,

    #[error("Dangling reference: {collection}[{index}].{field} points at missing {target}")]
    DanglingReference {
        collection: &'static str,
        index: usize,
        field: &'static str,
        target: usize,
    },

    #[error("Station {station} has no platforms")]
    StationWithoutPlatforms { station: usize },

    #[error("Platform {platform} does not belong to any station")]
    PlatformWithoutStation { platform: usize },

    #[error("Platform {platform} is listed by stations {first} and {second}")]
    PlatformInSeveralStations {
        platform: usize,
        first: usize,
        second: usize,
    },

    #[error("Platform {platform} lists span {span}, which does not touch it")]
    SpanNotIncident { platform: usize, span: usize },

    #[error("Invalid location for platform {platform}: ({lat}, {lng})")]
    InvalidLocation { platform: usize, lat: f64, lng: f64 },

    #[error("Degenerate geometry: {message}")]
    DegenerateGeometry { message: String },

    #[error("Invalid config value at `{path}`: {message}")]
    InvalidConfig { path: String, message: String },
}
