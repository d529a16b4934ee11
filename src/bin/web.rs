use axum::{
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use thiserror::Error;

use orbitals::atomic_data::{atom_name, atomic_number, Species, SUPPORTED_SPECIES};
use orbitals::formula::{orbital_name, wavefunction_formula, WavefunctionFormula};
use orbitals::physics::{max_radius, QuantumNumbers};
use orbitals::sampling::{
    calculate_slice, generate_random_points, DensityGrid, SamplePoint, SlicePlane,
};
use orbitals::OrbitalError;

const DEFAULT_COUNT: usize = 30_000;
const MAX_COUNT: usize = 500_000;
const DEFAULT_RESOLUTION: usize = 150;
const MAX_RESOLUTION: usize = 1_000;

#[derive(Deserialize, Default)]
struct OrbitalQuery {
    n: Option<u32>,
    l: Option<u32>,
    m: Option<i32>,
    atom: Option<String>,
    count: Option<usize>,
    resolution: Option<usize>,
    max: Option<f64>,
    plane: Option<String>,
}

struct Selection {
    qn: QuantumNumbers,
    atom: String,
    z: u32,
}

impl OrbitalQuery {
    fn selection(&self) -> Selection {
        let atom = self.atom.clone().unwrap_or_else(|| "H".to_string());
        let z = atomic_number(&atom);
        let qn = QuantumNumbers::clamped(
            self.n.unwrap_or(3),
            self.l.unwrap_or(0),
            self.m.unwrap_or(0),
        );
        Selection { qn, atom, z }
    }

    fn max_radius(&self, sel: &Selection) -> f64 {
        self.max.unwrap_or_else(|| max_radius(sel.qn.n, sel.z as f64))
    }
}

#[derive(Debug, Error)]
enum ApiError {
    #[error(transparent)]
    Orbital(#[from] OrbitalError),
    #[error("worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::Orbital(_) => StatusCode::BAD_REQUEST,
            ApiError::Worker(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[derive(Serialize)]
struct SampleResponse {
    n: u32,
    l: u32,
    m: i32,
    z: u32,
    atom: String,
    orbital: String,
    requested: usize,
    count: usize,
    max_radius: f64,
    points: Vec<SamplePoint>,
}

#[derive(Serialize)]
struct SliceResponse {
    n: u32,
    l: u32,
    m: i32,
    z: u32,
    atom: String,
    orbital: String,
    max_density: f64,
    #[serde(flatten)]
    grid: DensityGrid,
}

#[derive(Serialize)]
struct InfoResponse {
    n: u32,
    l: u32,
    m: i32,
    z: u32,
    atom: String,
    atom_name: String,
    orbital: String,
    max_radius: f64,
    formula: WavefunctionFormula,
}

async fn samples(Query(q): Query<OrbitalQuery>) -> Result<Json<SampleResponse>, ApiError> {
    let sel = q.selection();
    let requested = q.count.unwrap_or(DEFAULT_COUNT).clamp(1, MAX_COUNT);
    let max_r = q.max_radius(&sel);
    let qn = sel.qn;
    let z = sel.z as f64;

    let points =
        tokio::task::spawn_blocking(move || generate_random_points(qn, z, requested, max_r))
            .await??;

    let orbital = orbital_name(qn.n, qn.l);
    println!(
        "samples {orbital} m={} Z={}: {}/{requested} points",
        qn.m_l,
        sel.z,
        points.len()
    );

    Ok(Json(SampleResponse {
        n: qn.n,
        l: qn.l,
        m: qn.m_l,
        z: sel.z,
        atom: sel.atom,
        orbital,
        requested,
        count: points.len(),
        max_radius: max_r,
        points,
    }))
}

async fn slice(Query(q): Query<OrbitalQuery>) -> Result<Json<SliceResponse>, ApiError> {
    let sel = q.selection();
    let resolution = q
        .resolution
        .unwrap_or(DEFAULT_RESOLUTION)
        .clamp(1, MAX_RESOLUTION);
    let plane = SlicePlane::from_query(q.plane.as_deref());
    let max_r = q.max_radius(&sel);
    let qn = sel.qn;
    let z = sel.z as f64;

    let grid =
        tokio::task::spawn_blocking(move || calculate_slice(qn, z, resolution, max_r, plane))
            .await??;

    Ok(Json(SliceResponse {
        n: qn.n,
        l: qn.l,
        m: qn.m_l,
        z: sel.z,
        atom: sel.atom,
        orbital: orbital_name(qn.n, qn.l),
        max_density: grid.max_density(),
        grid,
    }))
}

async fn info(Query(q): Query<OrbitalQuery>) -> Json<InfoResponse> {
    let sel = q.selection();
    let qn = sel.qn;
    Json(InfoResponse {
        n: qn.n,
        l: qn.l,
        m: qn.m_l,
        z: sel.z,
        atom_name: atom_name(&sel.atom),
        orbital: orbital_name(qn.n, qn.l),
        max_radius: max_radius(qn.n, sel.z as f64),
        formula: wavefunction_formula(qn.n, qn.l, qn.m_l),
        atom: sel.atom,
    })
}

async fn species() -> Json<Vec<Species>> {
    Json(SUPPORTED_SPECIES.to_vec())
}

fn router() -> Router {
    Router::new()
        .route("/samples", get(samples))
        .route("/slice", get(slice))
        .route("/info", get(info))
        .route("/species", get(species))
}

/// `ORBITALS_ADDR` if it parses as a socket address, else localhost:3000.
fn bind_addr(value: Option<&str>) -> SocketAddr {
    value
        .and_then(|v| v.parse().ok())
        .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 3000)))
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let addr = bind_addr(std::env::var("ORBITALS_ADDR").ok().as_deref());
    println!("Serving on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router()).await
}
